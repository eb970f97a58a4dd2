//! Identifier parsing and the digest-backed pseudo-random stream

use num_bigint::BigUint;
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::RenderError;

const DIGEST_LEN: usize = 32;
const CHUNK_LEN: usize = 4;
const CHUNK_SPAN: f64 = 4_294_967_296.0;

/// A non-negative integer of arbitrary size, the sole seed input
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Identifier(BigUint);

impl Identifier {
    /// Strict parse: surrounding whitespace is ignored, anything but ASCII
    /// digits is rejected.
    pub fn try_parse(raw: &str) -> Result<Self, RenderError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RenderError::InvalidIdentifier(raw.to_string()));
        }
        BigUint::parse_bytes(trimmed.as_bytes(), 10)
            .map(Self)
            .ok_or_else(|| RenderError::InvalidIdentifier(raw.to_string()))
    }

    /// Fail-soft parse: invalid input becomes zero
    pub fn parse(raw: &str) -> Self {
        Self::try_parse(raw).unwrap_or_else(|e| {
            log::warn!("{}", e);
            Self::default()
        })
    }

    #[cfg(test)]
    pub fn is_zero(&self) -> bool {
        self.0 == BigUint::default()
    }
}

impl From<u64> for Identifier {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numbers in [0, 1) read from successive 4-byte chunks of
/// `sha256(identifier || salt)`. The cursor wraps when the digest runs out,
/// so the period is eight draws.
#[derive(Debug, Clone)]
pub struct SeedStream {
    digest: [u8; DIGEST_LEN],
    cursor: usize,
}

impl SeedStream {
    pub fn new(identifier: &Identifier, salt: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(identifier.to_string().as_bytes());
        hasher.update(salt.as_bytes());

        let mut digest = [0u8; DIGEST_LEN];
        digest.copy_from_slice(&hasher.finalize());
        Self { digest, cursor: 0 }
    }

    pub fn next_unit(&mut self) -> f64 {
        let mut chunk = [0u8; CHUNK_LEN];
        for (i, byte) in chunk.iter_mut().enumerate() {
            *byte = self.digest[(self.cursor + i) % DIGEST_LEN];
        }
        self.cursor = (self.cursor + CHUNK_LEN) % DIGEST_LEN;
        f64::from(u32::from_be_bytes(chunk)) / CHUNK_SPAN
    }
}
