//! Bearer credential for the reservation service

use crate::error::{Error, Result};
use std::fmt;

/// Authorization token sent verbatim in the `authorization` header
///
/// `Debug` and `Display` never print the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token, rejecting values that are empty or cannot be sent
    ///
    /// A header value may not hold control characters other than tab.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(Error::MissingCredential);
        }
        if trimmed.bytes().any(is_forbidden_header_byte) {
            return Err(Error::invalid_credential("token contains control characters"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The raw token
    pub fn expose(&self) -> &str {
        &self.0
    }
}

fn is_forbidden_header_byte(b: u8) -> bool {
    (b < 0x20 && b != b'\t') || b == 0x7f
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}
