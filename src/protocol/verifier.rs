//! Verifier Capability
//!
//! Proof checking is an opaque, pluggable capability. The registry stores a
//! [`VerifierRef`] per request and the settlement engine calls it; neither
//! knows which scheme sits behind the handle.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::core::hash::{Digest32, DomainHasher};
use crate::core::{RandomNumber, Seed};

/// Interface for proof verification schemes.
///
/// Implementations must be deterministic and side-effect free.
pub trait ProofVerifier: Send + Sync {
    /// Short scheme name for logs and the protocol log.
    fn name(&self) -> &str;

    /// Check `proof` for `random_number` under `seed`.
    ///
    /// `Ok(false)` is a well-formed but rejected proof; `Err` means the
    /// proof could not be evaluated at all.
    fn validate(
        &self,
        seed: &Seed,
        random_number: &RandomNumber,
        proof: &[u8],
    ) -> Result<bool, ProofVerificationError>;
}

/// Errors during proof verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofVerificationError {
    /// Proof format is invalid.
    #[error("invalid proof format")]
    InvalidProofFormat,
    /// Proof has the wrong length for this scheme.
    #[error("proof length {got}, expected {expected}")]
    InvalidLength {
        /// Length the scheme requires.
        expected: usize,
        /// Length supplied.
        got: usize,
    },
}

/// Shared handle to a verifier capability.
///
/// Two handles are equal only if they point at the same verifier object.
#[derive(Clone)]
pub struct VerifierRef(Arc<dyn ProofVerifier>);

impl VerifierRef {
    /// Wrap a verifier in a new handle.
    pub fn new<V: ProofVerifier + 'static>(verifier: V) -> Self {
        Self(Arc::new(verifier))
    }

    /// Wrap an already shared verifier.
    pub fn from_arc(verifier: Arc<dyn ProofVerifier>) -> Self {
        Self(verifier)
    }

    /// Scheme name.
    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// Delegate to the underlying verifier.
    pub fn validate(
        &self,
        seed: &Seed,
        random_number: &RandomNumber,
        proof: &[u8],
    ) -> Result<bool, ProofVerificationError> {
        self.0.validate(seed, random_number, proof)
    }
}

impl PartialEq for VerifierRef {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl Eq for VerifierRef {}

impl fmt::Debug for VerifierRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VerifierRef({} @ {:p})", self.name(), Arc::as_ptr(&self.0) as *const ())
    }
}

/// Accepts every proof. Development and test double.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllVerifier;

impl ProofVerifier for AcceptAllVerifier {
    fn name(&self) -> &str {
        "accept-all"
    }

    fn validate(&self, _: &Seed, _: &RandomNumber, _: &[u8]) -> Result<bool, ProofVerificationError> {
        Ok(true)
    }
}

/// Rejects every proof.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectAllVerifier;

impl ProofVerifier for RejectAllVerifier {
    fn name(&self) -> &str {
        "reject-all"
    }

    fn validate(&self, _: &Seed, _: &RandomNumber, _: &[u8]) -> Result<bool, ProofVerificationError> {
        Ok(false)
    }
}

/// Accepts any non-empty proof; an empty proof is malformed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonEmptyProofVerifier;

impl ProofVerifier for NonEmptyProofVerifier {
    fn name(&self) -> &str {
        "non-empty"
    }

    fn validate(&self, _: &Seed, _: &RandomNumber, proof: &[u8]) -> Result<bool, ProofVerificationError> {
        if proof.is_empty() {
            return Err(ProofVerificationError::InvalidProofFormat);
        }
        Ok(true)
    }
}

/// Keyed-digest scheme.
///
/// A proof is `SHA-256(PROOF_DOMAIN || key || seed || random_number)`. Anyone
/// holding the key can produce proofs, so this binds a value to a settlement
/// authority but is not a VRF.
#[derive(Clone)]
pub struct DigestProofVerifier {
    key: Digest32,
}

impl DigestProofVerifier {
    /// Create a verifier for the given key.
    pub fn new(key: Digest32) -> Self {
        Self { key }
    }

    /// Produce the proof this verifier accepts.
    pub fn prove(&self, seed: &Seed, random_number: &RandomNumber) -> Digest32 {
        let mut hasher = DomainHasher::for_proof();
        hasher.update_bytes(&self.key);
        hasher.update_word(seed.word());
        hasher.update_word(random_number.word());
        hasher.finalize()
    }
}

impl fmt::Debug for DigestProofVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the key
        f.debug_struct("DigestProofVerifier").finish_non_exhaustive()
    }
}

impl ProofVerifier for DigestProofVerifier {
    fn name(&self) -> &str {
        "digest-v1"
    }

    fn validate(
        &self,
        seed: &Seed,
        random_number: &RandomNumber,
        proof: &[u8],
    ) -> Result<bool, ProofVerificationError> {
        if proof.len() != 32 {
            return Err(ProofVerificationError::InvalidLength {
                expected: 32,
                got: proof.len(),
            });
        }
        Ok(self.prove(seed, random_number).as_slice() == proof)
    }
}
