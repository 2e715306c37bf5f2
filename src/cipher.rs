//! The decryption seam for recipient tokens.

use thiserror::Error;

use crate::Secret;

/// Error returned when a recipient token cannot be decrypted.
///
/// The message describes the failure without including the token or the
/// key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("decryption failed: {message}")]
pub struct CipherError {
    message: String,
}

impl CipherError {
    /// Creates a new cipher error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Decrypts recipient tokens that a public form carries instead of addresses.
///
/// The relay treats the primitive as a black box: whatever scheme produced
/// the token on the way out is undone here. Implementations must be pure;
/// the same token and key always yield the same result.
///
/// # Examples
///
/// ```
/// use formrelay_core::{AddressCipher, CipherError, Secret};
///
/// struct Reversed;
///
/// impl AddressCipher for Reversed {
///     fn decrypt(&self, token: &str, _key: &Secret<String>) -> Result<String, CipherError> {
///         Ok(token.chars().rev().collect())
///     }
/// }
///
/// let key = Secret::new("k".to_string());
/// assert_eq!(Reversed.decrypt("cba", &key).unwrap(), "abc");
/// ```
pub trait AddressCipher {
    /// Decrypts `token` with `key` and returns the plaintext address.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` when the token is not valid ciphertext for `key`.
    fn decrypt(&self, token: &str, key: &Secret<String>) -> Result<String, CipherError>;
}

impl<C: AddressCipher + ?Sized> AddressCipher for &C {
    fn decrypt(&self, token: &str, key: &Secret<String>) -> Result<String, CipherError> {
        (**self).decrypt(token, key)
    }
}

/// A cipher that refuses every token.
///
/// Useful for forms that only ever carry plaintext recipients: every
/// non-address value then fails validation as an invalid recipient.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextOnly;

impl AddressCipher for PlaintextOnly {
    fn decrypt(&self, _token: &str, _key: &Secret<String>) -> Result<String, CipherError> {
        Err(CipherError::new("encrypted recipients are not enabled"))
    }
}
