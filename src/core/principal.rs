//! Caller Identity
//!
//! Principals identify requesters and the administrator. Key management is
//! external; the protocol only compares and hashes these bytes.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Width of a principal in bytes.
pub const PRINCIPAL_BYTES: usize = 20;

/// Domain prefix for name-derived principals.
const PRINCIPAL_DOMAIN: &[u8] = b"random-settlement-principal:";

/// Opaque 20-byte caller identity.
///
/// Implements Ord for deterministic BTreeMap ordering.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Principal(pub [u8; PRINCIPAL_BYTES]);

impl Principal {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; PRINCIPAL_BYTES]) -> Self {
        Self(bytes)
    }

    /// Derive a deterministic principal from a human-readable name.
    pub fn from_name(name: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(PRINCIPAL_DOMAIN);
        hasher.update(name.as_bytes());
        let hash = hasher.finalize();

        let mut id = [0u8; PRINCIPAL_BYTES];
        id.copy_from_slice(&hash[..PRINCIPAL_BYTES]);
        Self(id)
    }

    /// Parse a `0x`-prefixed 40-digit hex string.
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut id = [0u8; PRINCIPAL_BYTES];
        hex::decode_to_slice(digits, &mut id).ok()?;
        Some(Self(id))
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; PRINCIPAL_BYTES] {
        &self.0
    }

    /// Short hex prefix for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Principal({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_derivation() {
        let a1 = Principal::from_name("alice");
        let a2 = Principal::from_name("alice");
        let b = Principal::from_name("bob");

        assert_eq!(a1, a2);
        assert_ne!(a1, b);
    }

    #[test]
    fn test_hex_roundtrip() {
        let p = Principal::from_name("admin");
        let text = p.to_string();
        assert!(text.starts_with("0x"));
        assert_eq!(text.len(), 2 + PRINCIPAL_BYTES * 2);
        assert_eq!(Principal::from_hex(&text), Some(p));
    }

    #[test]
    fn test_bad_hex_rejected() {
        assert_eq!(Principal::from_hex("0x1234"), None);
        assert_eq!(Principal::from_hex("admin"), None);
    }
}
