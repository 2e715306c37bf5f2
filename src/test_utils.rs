//! Shared fixtures for unit tests.

use std::cell::Cell;

use proptest::prelude::*;

use crate::cipher::{AddressCipher, CipherError};
use crate::Secret;

/// Stub cipher: XOR with the key bytes, hex-encoded.
///
/// Hex output never contains `@`, so tokens never look like addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct XorHexCipher;

impl XorHexCipher {
    pub fn encrypt(address: &str, key: &Secret<String>) -> String {
        hex::encode(xor(address.as_bytes(), key.expose_secret().as_bytes()))
    }
}

impl AddressCipher for XorHexCipher {
    fn decrypt(&self, token: &str, key: &Secret<String>) -> Result<String, CipherError> {
        let bytes = hex::decode(token).map_err(|_| CipherError::new("token is not hex"))?;
        let plain = xor(&bytes, key.expose_secret().as_bytes());
        String::from_utf8(plain).map_err(|_| CipherError::new("plaintext is not UTF-8"))
    }
}

fn xor(data: &[u8], key: &[u8]) -> Vec<u8> {
    data.iter()
        .zip(key.iter().cycle())
        .map(|(byte, k)| byte ^ k)
        .collect()
}

/// Counts decrypt calls and refuses every token.
#[derive(Debug, Default)]
pub struct CountingCipher {
    calls: Cell<usize>,
}

impl CountingCipher {
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl AddressCipher for CountingCipher {
    fn decrypt(&self, _token: &str, _key: &Secret<String>) -> Result<String, CipherError> {
        self.calls.set(self.calls.get() + 1);
        Err(CipherError::new("counting cipher"))
    }
}

/// Generates syntactically valid addresses.
pub fn arb_email() -> impl Strategy<Value = String> {
    (
        "[a-zA-Z0-9][a-zA-Z0-9_+-]{0,15}",
        "[a-z][a-z0-9]{0,10}",
        "[a-z]{2,6}",
    )
        .prop_map(|(local, host, tld)| format!("{local}@{host}.{tld}"))
}

/// Generates custom field names that are neither reserved nor anti-automation.
pub fn arb_custom_field() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,11}".prop_filter("must not name the challenge", |name| {
        !name.contains("recaptcha")
    })
}
