use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Display;

/// A content address: the SHA-256 digest of an input, hex encoded.
///
/// Addressing is deterministic, so the same input always lands on the
/// same address and the address can serve as a storage key. Collision
/// resistance comes from the hash; accidental collisions are treated as
/// computationally infeasible rather than detected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentAddress(String);

impl ContentAddress {
    /// Length of an address in hex characters.
    pub const LENGTH: usize = 64;

    /// Computes the address of an input.
    ///
    /// Pure function: no store interaction, never fails.
    pub fn of(input: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(input.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Validates an externally supplied address string.
    ///
    /// Accepts exactly [`Self::LENGTH`] lowercase hex characters.
    pub fn parse(address: impl Into<String>) -> Result<Self, ValidationError> {
        let address = address.into();
        if address.len() != Self::LENGTH {
            return Err(ValidationError::InvalidAddress(format!(
                "expected {} hex characters, got {}",
                Self::LENGTH,
                address.len()
            )));
        }
        if !address
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        {
            return Err(ValidationError::InvalidAddress(format!(
                "must contain only lowercase hex characters: '{}'",
                address
            )));
        }
        Ok(Self(address))
    }

    /// Returns the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ContentAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
