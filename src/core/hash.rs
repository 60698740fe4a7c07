//! Domain-Separated Hashing
//!
//! Provides deterministic SHA-256 hashing over fixed encodings for:
//! - Request commitments
//! - Keyed proof digests
//! - Principal derivation

use sha2::{Digest, Sha256};

use super::principal::Principal;
use super::word::Word;

/// Hash output type (256 bits / 32 bytes)
pub type Digest32 = [u8; 32];

/// Domain separator for request commitments.
pub const COMMITMENT_DOMAIN: &[u8] = b"RANDOM_SETTLEMENT_COMMIT_V1";

/// Domain separator for keyed proof digests.
pub const PROOF_DOMAIN: &[u8] = b"RANDOM_SETTLEMENT_PROOF_V1";

/// Deterministic hasher with a domain separator.
///
/// Wraps SHA-256 with helpers for protocol types.
/// Order of updates is part of the encoding.
pub struct DomainHasher {
    hasher: Sha256,
}

impl DomainHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for request commitments.
    pub fn for_commitment() -> Self {
        Self::new(COMMITMENT_DOMAIN)
    }

    /// Create hasher for keyed proofs.
    pub fn for_proof() -> Self {
        Self::new(PROOF_DOMAIN)
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with a 256-bit word (32 bytes, big-endian).
    #[inline]
    pub fn update_word(&mut self, word: &Word) {
        self.hasher.update(word.as_bytes());
    }

    /// Update with a principal (20 bytes).
    #[inline]
    pub fn update_principal(&mut self, principal: &Principal) {
        self.hasher.update(principal.as_bytes());
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> Digest32 {
        self.hasher.finalize().into()
    }
}

/// Compute a simple hash of arbitrary data.
pub fn hash_bytes(data: &[u8]) -> Digest32 {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hasher_determinism() {
        let make_hash = || {
            let mut hasher = DomainHasher::for_commitment();
            hasher.update_word(&Word::from_u64(1234));
            hasher.update_principal(&Principal::from_name("alice"));
            hasher.update_word(&Word::from_u64(7));
            hasher.finalize()
        };

        assert_eq!(make_hash(), make_hash());
    }

    #[test]
    fn test_hash_order_matters() {
        let hash1 = {
            let mut h = DomainHasher::new(b"test");
            h.update_bytes(b"one");
            h.update_bytes(b"two");
            h.finalize()
        };

        let hash2 = {
            let mut h = DomainHasher::new(b"test");
            h.update_bytes(b"two");
            h.update_bytes(b"one");
            h.finalize()
        };

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_domain_separation() {
        let data = [1u8, 2, 3, 4];

        let with_domain = |domain: &[u8]| {
            let mut h = DomainHasher::new(domain);
            h.update_bytes(&data);
            h.finalize()
        };

        assert_ne!(with_domain(b"DOMAIN_A"), with_domain(b"DOMAIN_B"));
        assert_ne!(with_domain(COMMITMENT_DOMAIN), hash_bytes(&data));
        assert_ne!(with_domain(COMMITMENT_DOMAIN), with_domain(PROOF_DOMAIN));
    }

    #[test]
    fn test_word_encoding_is_fixed_width() {
        let a = {
            let mut h = DomainHasher::new(b"test");
            h.update_word(&Word::from_u64(1));
            h.update_word(&Word::from_u64(2));
            h.finalize()
        };
        let b = {
            let mut h = DomainHasher::new(b"test");
            h.update_word(&Word::from_u64(0x0102));
            h.update_word(&Word::ZERO);
            h.finalize()
        };
        assert_ne!(a, b);
    }
}
