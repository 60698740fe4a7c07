//! Request Commitments
//!
//! At registration the protocol binds the seed, the requester, and freshly
//! drawn entropy into one digest and hands it back to the requester. The
//! registry does not keep it; it exists so the requester can later check,
//! out of band, that the entropy it was told about is the entropy used.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::hash::{Digest32, DomainHasher};
use crate::core::{Principal, Seed, Word};

/// Commitment digest returned by registration.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(pub Digest32);

impl Commitment {
    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &Digest32 {
        &self.0
    }

    /// Check an opening against this commitment.
    pub fn verify(&self, opening: &CommitmentOpening) -> bool {
        opening.commitment() == *self
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", self)
    }
}

/// Derive the commitment for a request.
///
/// Encoding: `COMMITMENT_DOMAIN || seed (32 bytes) || requester (20 bytes) ||
/// entropy (32 bytes)`. Every field is fixed-width, so no two distinct
/// inputs share an encoding.
pub fn derive_commitment(seed: &Seed, requester: &Principal, entropy: &Word) -> Commitment {
    let mut hasher = DomainHasher::for_commitment();
    hasher.update_word(seed.word());
    hasher.update_principal(requester);
    hasher.update_word(entropy);
    Commitment(hasher.finalize())
}

/// The values a commitment was computed from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentOpening {
    /// Registered seed.
    pub seed: Seed,
    /// Principal that registered the seed.
    pub requester: Principal,
    /// Entropy drawn at registration.
    pub entropy: Word,
}

impl CommitmentOpening {
    /// Recompute the commitment.
    pub fn commitment(&self) -> Commitment {
        derive_commitment(&self.seed, &self.requester, &self.entropy)
    }

    /// Verify against a published commitment.
    pub fn verify(&self, commitment: &Commitment) -> Result<(), CommitmentError> {
        let computed = self.commitment();
        if computed != *commitment {
            return Err(CommitmentError::Mismatch {
                expected: *commitment,
                computed,
            });
        }
        Ok(())
    }
}

/// Errors during commitment verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitmentError {
    /// Opening does not hash to the commitment.
    #[error("commitment mismatch: expected {expected}, computed {computed}")]
    Mismatch {
        /// Published commitment.
        expected: Commitment,
        /// Commitment recomputed from the opening.
        computed: Commitment,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opening() -> CommitmentOpening {
        CommitmentOpening {
            seed: Seed::from(1234u64),
            requester: Principal::from_name("alice"),
            entropy: Word::from_u64(0xfeed),
        }
    }

    #[test]
    fn test_commitment_determinism() {
        let o = opening();
        assert_eq!(
            derive_commitment(&o.seed, &o.requester, &o.entropy),
            derive_commitment(&o.seed, &o.requester, &o.entropy)
        );
    }

    #[test]
    fn test_opening_verifies() {
        let o = opening();
        let commitment = o.commitment();

        assert!(commitment.verify(&o));
        assert_eq!(o.verify(&commitment), Ok(()));
    }

    #[test]
    fn test_each_input_is_bound() {
        let o = opening();
        let commitment = o.commitment();

        let mut wrong_seed = o.clone();
        wrong_seed.seed = Seed::from(1235u64);
        assert!(!commitment.verify(&wrong_seed));

        let mut wrong_requester = o.clone();
        wrong_requester.requester = Principal::from_name("mallory");
        assert!(!commitment.verify(&wrong_requester));

        let mut wrong_entropy = o;
        wrong_entropy.entropy = Word::from_u64(0xbeef);
        assert!(matches!(
            wrong_entropy.verify(&commitment),
            Err(CommitmentError::Mismatch { .. })
        ));
    }
}
