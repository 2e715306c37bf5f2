//! Recipient resolution.
//!
//! A public form may carry either a plaintext address (a recipient the site
//! owner configured in the open) or an opaque token (a recipient bound at
//! render time and encrypted so the client never learns it). The two are
//! indistinguishable to the client; the relay tells them apart by syntax.

use crate::cipher::AddressCipher;
use crate::syntax::is_email;
use crate::Secret;

/// Separator for multi-recipient fields.
pub const LIST_SEPARATOR: char = ';';

/// A raw recipient value, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address<'a> {
    /// Already a syntactically valid address.
    Plain(&'a str),
    /// Anything else; assumed to be an encrypted token.
    Token(&'a str),
}

impl<'a> Address<'a> {
    /// Classifies a raw value by email syntax.
    pub fn classify(raw: &'a str) -> Self {
        if is_email(raw) {
            Address::Plain(raw)
        } else {
            Address::Token(raw)
        }
    }

    /// Resolves the value to a plaintext address.
    ///
    /// Plain addresses are returned unchanged. Tokens are decrypted; when
    /// decryption fails the token itself is returned, and since it is not an
    /// address it fails validation downstream.
    pub fn resolve<C: AddressCipher>(&self, cipher: &C, key: &Secret<String>) -> String {
        match self {
            Address::Plain(address) => (*address).to_string(),
            Address::Token(token) => match cipher.decrypt(token, key) {
                Ok(address) => address,
                Err(err) => {
                    tracing::debug!(error = %err, "recipient token left unresolved");
                    (*token).to_string()
                }
            },
        }
    }
}

/// Resolves a single-recipient field value.
///
/// # Examples
///
/// ```
/// use formrelay_core::{address::resolve, PlaintextOnly, Secret};
///
/// let key = Secret::new("k".to_string());
/// assert_eq!(resolve("Jo@X.com", &PlaintextOnly, &key), "Jo@X.com");
/// ```
pub fn resolve<C: AddressCipher>(raw: &str, cipher: &C, key: &Secret<String>) -> String {
    Address::classify(raw).resolve(cipher, key)
}

/// Resolves a `;`-delimited field value, preserving order.
pub fn resolve_list<C: AddressCipher>(raw: &str, cipher: &C, key: &Secret<String>) -> Vec<String> {
    raw.split(LIST_SEPARATOR)
        .map(|piece| resolve(piece, cipher, key))
        .collect()
}
