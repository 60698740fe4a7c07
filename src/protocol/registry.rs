//! Request Registry
//!
//! Maps each pending seed to its callback and verifier handles. Uses
//! BTreeMap so pending seeds iterate in ascending order.
//!
//! Only registration inserts and only the settlement engine removes; the
//! removal path is crate-private.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{EntropySource, Principal, Seed, Word};
use crate::protocol::callback::CallbackRef;
use crate::protocol::commitment::{derive_commitment, Commitment, CommitmentOpening};
use crate::protocol::error::{ProtocolError, Result};
use crate::protocol::verifier::VerifierRef;

/// A pending randomness request.
///
/// The verifier is captured at registration and never changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    /// Request key.
    pub seed: Seed,
    /// Where the random number goes.
    pub callback: CallbackRef,
    /// Who checks the proof.
    pub verifier: VerifierRef,
}

/// Receipt returned by a successful registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Registered seed.
    pub seed: Seed,
    /// Principal that registered it.
    pub requester: Principal,
    /// Entropy drawn for the commitment.
    pub entropy: Word,
    /// `derive_commitment(seed, requester, entropy)`.
    pub commitment: Commitment,
}

impl Registration {
    /// Values needed to re-check the commitment out of band.
    pub fn opening(&self) -> CommitmentOpening {
        CommitmentOpening {
            seed: self.seed,
            requester: self.requester,
            entropy: self.entropy,
        }
    }
}

/// Seed-keyed store of pending requests.
pub struct RequestRegistry {
    requests: BTreeMap<Seed, Request>,
    entropy: Box<dyn EntropySource>,
}

impl RequestRegistry {
    /// Create an empty registry drawing entropy from `entropy`.
    pub fn new(entropy: Box<dyn EntropySource>) -> Self {
        Self {
            requests: BTreeMap::new(),
            entropy,
        }
    }

    /// Register a new pending request.
    ///
    /// Fails with `Conflict` if `seed` is already pending; nothing is drawn
    /// or written in that case.
    pub fn register(
        &mut self,
        seed: Seed,
        requester: &Principal,
        callback: CallbackRef,
        verifier: VerifierRef,
    ) -> Result<Registration> {
        if self.contains(&seed) {
            return Err(ProtocolError::Conflict { seed });
        }

        let entropy = self.entropy.next_entropy();
        let commitment = derive_commitment(&seed, requester, &entropy);

        debug!(
            "Registered seed {} for {} (verifier={}, commitment={})",
            seed,
            requester.short(),
            verifier.name(),
            commitment
        );

        self.requests.insert(
            seed,
            Request {
                seed,
                callback,
                verifier,
            },
        );

        Ok(Registration {
            seed,
            requester: *requester,
            entropy,
            commitment,
        })
    }

    /// Pending request for `seed`, or `NotFound`.
    pub fn lookup(&self, seed: &Seed) -> Result<&Request> {
        self.requests
            .get(seed)
            .ok_or(ProtocolError::NotFound { seed: *seed })
    }

    /// Pending request for `seed`, if any.
    pub fn get(&self, seed: &Seed) -> Option<&Request> {
        self.requests.get(seed)
    }

    /// True if `seed` is pending.
    pub fn contains(&self, seed: &Seed) -> bool {
        self.requests.contains_key(seed)
    }

    /// Retire a request. Settlement engine only.
    pub(crate) fn remove(&mut self, seed: &Seed) -> Option<Request> {
        self.requests.remove(seed)
    }

    /// Number of pending requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// True if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Pending seeds in ascending order.
    pub fn pending_seeds(&self) -> impl Iterator<Item = &Seed> {
        self.requests.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DeterministicEntropy;
    use crate::protocol::callback::RecordingCallback;
    use crate::protocol::verifier::AcceptAllVerifier;

    fn registry() -> RequestRegistry {
        RequestRegistry::new(Box::new(DeterministicEntropy::new(42)))
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = registry();
        let alice = Principal::from_name("alice");
        let callback = RecordingCallback::new().handle();
        let verifier = VerifierRef::new(AcceptAllVerifier);

        let registration = registry
            .register(Seed::from(1234u64), &alice, callback.clone(), verifier.clone())
            .unwrap();

        let request = registry.lookup(&Seed::from(1234u64)).unwrap();
        assert_eq!(request.callback, callback);
        assert_eq!(request.verifier, verifier);
        assert_eq!(registration.requester, alice);
        assert_eq!(
            registration.commitment,
            derive_commitment(&registration.seed, &alice, &registration.entropy)
        );
        assert_eq!(registration.opening().verify(&registration.commitment), Ok(()));
    }

    #[test]
    fn test_duplicate_seed_conflicts() {
        let mut registry = registry();
        let alice = Principal::from_name("alice");
        let first_callback = RecordingCallback::new().handle();

        registry
            .register(Seed::from(1u64), &alice, first_callback.clone(), VerifierRef::new(AcceptAllVerifier))
            .unwrap();

        let err = registry
            .register(
                Seed::from(1u64),
                &alice,
                RecordingCallback::new().handle(),
                VerifierRef::new(AcceptAllVerifier),
            )
            .unwrap_err();

        assert!(matches!(err, ProtocolError::Conflict { .. }));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup(&Seed::from(1u64)).unwrap().callback, first_callback);
    }

    #[test]
    fn test_lookup_missing() {
        let registry = registry();
        assert!(matches!(
            registry.lookup(&Seed::from(12u64)),
            Err(ProtocolError::NotFound { .. })
        ));
        assert!(registry.get(&Seed::from(12u64)).is_none());
    }

    #[test]
    fn test_remove_once() {
        let mut registry = registry();
        let alice = Principal::from_name("alice");
        registry
            .register(Seed::from(5u64), &alice, RecordingCallback::new().handle(), VerifierRef::new(AcceptAllVerifier))
            .unwrap();

        assert!(registry.remove(&Seed::from(5u64)).is_some());
        assert!(registry.remove(&Seed::from(5u64)).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_entropy_differs_per_registration() {
        let mut registry = registry();
        let alice = Principal::from_name("alice");

        let a = registry
            .register(Seed::from(1u64), &alice, RecordingCallback::new().handle(), VerifierRef::new(AcceptAllVerifier))
            .unwrap();
        let b = registry
            .register(Seed::from(2u64), &alice, RecordingCallback::new().handle(), VerifierRef::new(AcceptAllVerifier))
            .unwrap();

        assert_ne!(a.entropy, b.entropy);
        assert_ne!(a.commitment, b.commitment);
    }

    #[test]
    fn test_pending_seeds_sorted() {
        let mut registry = registry();
        let alice = Principal::from_name("alice");
        for seed in [30u64, 10, 20] {
            registry
                .register(Seed::from(seed), &alice, RecordingCallback::new().handle(), VerifierRef::new(AcceptAllVerifier))
                .unwrap();
        }

        let seeds: Vec<Seed> = registry.pending_seeds().copied().collect();
        assert_eq!(seeds, vec![Seed::from(10u64), Seed::from(20u64), Seed::from(30u64)]);
    }
}
