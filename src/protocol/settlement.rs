//! Settlement Engine
//!
//! `RandomnessProtocol` owns the registry, the access control, the default
//! verifier, and the protocol log, and runs every operation to completion
//! before the next one starts.
//!
//! ## Settlement order
//!
//! ```text
//! settle(seed, value, proof)
//!   1. lookup(seed)            -> NotFound
//!   2. verifier.validate(...)  -> InvalidProof / MalformedProof
//!   3. registry.remove(seed)      (state committed)
//!   4. log Settled(seed, value)
//!   5. callback.receive(host, seed, value)
//! ```
//!
//! Steps 1-2 never write. Step 3 happens before any external code runs, so a
//! callback that re-enters `settle` for the same seed finds nothing to settle.

use tracing::{debug, info, warn};

use crate::core::{EntropySource, Principal, RandomNumber, Seed};
use crate::protocol::access::AccessControl;
use crate::protocol::callback::{CallbackError, CallbackRef};
use crate::protocol::error::{ProtocolError, Result};
use crate::protocol::events::{EventLog, ProtocolEventData};
use crate::protocol::registry::{Registration, Request, RequestRegistry};
use crate::protocol::verifier::VerifierRef;

/// Outcome of handing the value to the callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Callback accepted the value.
    Delivered,
    /// Callback reported a failure. The request stays settled.
    Failed(CallbackError),
}

/// Receipt of a successful settlement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    /// Settled seed.
    pub seed: Seed,
    /// Value delivered.
    pub random_number: RandomNumber,
    /// Callback outcome.
    pub delivery: Delivery,
}

/// The randomness request/settlement protocol.
pub struct RandomnessProtocol {
    registry: RequestRegistry,
    access: AccessControl,
    default_verifier: Option<VerifierRef>,
    log: EventLog,
}

impl RandomnessProtocol {
    /// Create a protocol administered by `admin`.
    ///
    /// No default verifier is assigned; until one is, only
    /// [`register_with_verifier`](Self::register_with_verifier) can register.
    pub fn new(admin: Principal, entropy: Box<dyn EntropySource>) -> Self {
        info!("Randomness protocol initialized (admin={})", admin);
        Self {
            registry: RequestRegistry::new(entropy),
            access: AccessControl::new(admin),
            default_verifier: None,
            log: EventLog::new(),
        }
    }

    // =========================================================================
    // Access-controlled configuration
    // =========================================================================

    /// Current administrator.
    pub fn admin(&self) -> &Principal {
        self.access.admin()
    }

    /// Verifier captured by [`register`](Self::register).
    pub fn default_verifier(&self) -> Option<&VerifierRef> {
        self.default_verifier.as_ref()
    }

    /// Assign the default verifier. Administrator only.
    ///
    /// Requests already pending keep the verifier they were registered with.
    /// Returns the previous default.
    pub fn set_admin_verifier(
        &mut self,
        caller: &Principal,
        verifier: VerifierRef,
    ) -> Result<Option<VerifierRef>> {
        self.access.authorize(caller)?;

        info!("Default verifier set to {}", verifier.name());
        self.log.push(ProtocolEventData::VerifierAssigned {
            admin: *caller,
            verifier: verifier.name().to_string(),
        });
        Ok(self.default_verifier.replace(verifier))
    }

    /// Hand the administrator role to `new_admin`. Administrator only.
    pub fn transfer_admin(&mut self, caller: &Principal, new_admin: Principal) -> Result<()> {
        let previous = self.access.transfer(caller, new_admin)?;

        info!("Admin transferred from {} to {}", previous, new_admin);
        self.log.push(ProtocolEventData::AdminTransferred {
            from: previous,
            to: new_admin,
        });
        Ok(())
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register `seed` using the default verifier.
    ///
    /// Fails with `VerifierNotConfigured` if no default is assigned and with
    /// `Conflict` if the seed is pending.
    pub fn register(
        &mut self,
        caller: &Principal,
        seed: Seed,
        callback: CallbackRef,
    ) -> Result<Registration> {
        let verifier = self
            .default_verifier
            .clone()
            .ok_or(ProtocolError::VerifierNotConfigured { seed })?;
        self.register_with_verifier(caller, seed, callback, verifier)
    }

    /// Register `seed` with its own verifier.
    pub fn register_with_verifier(
        &mut self,
        caller: &Principal,
        seed: Seed,
        callback: CallbackRef,
        verifier: VerifierRef,
    ) -> Result<Registration> {
        let verifier_name = verifier.name().to_string();
        let registration = self.registry.register(seed, caller, callback, verifier)?;

        self.log.push(ProtocolEventData::RequestRegistered {
            seed,
            requester: *caller,
            commitment: registration.commitment,
            verifier: verifier_name,
        });
        Ok(registration)
    }

    // =========================================================================
    // Settlement
    // =========================================================================

    /// Validate `proof` and deliver `random_number` to the seed's callback.
    ///
    /// The request is removed and the `Settled` entry logged before the
    /// callback runs. A failing callback does not undo either.
    pub fn settle(
        &mut self,
        seed: Seed,
        random_number: RandomNumber,
        proof: &[u8],
    ) -> Result<Settlement> {
        let verifier = self.registry.lookup(&seed)?.verifier.clone();

        let accepted = verifier
            .validate(&seed, &random_number, proof)
            .map_err(|source| ProtocolError::MalformedProof { seed, source })?;
        if !accepted {
            warn!("Proof for seed {} rejected by {}", seed, verifier.name());
            return Err(ProtocolError::InvalidProof { seed });
        }

        let request = self
            .registry
            .remove(&seed)
            .ok_or(ProtocolError::NotFound { seed })?;
        self.log.push(ProtocolEventData::Settled {
            seed,
            random_number,
        });
        info!("Settled seed {} with {}", seed, random_number);

        let delivery = match request.callback.receive(self, seed, random_number) {
            Ok(()) => {
                debug!("Callback for seed {} accepted delivery", seed);
                Delivery::Delivered
            }
            Err(err) => {
                warn!("Callback for seed {} failed: {}", seed, err);
                self.log.push(ProtocolEventData::CallbackFailed {
                    seed,
                    reason: err.to_string(),
                });
                Delivery::Failed(err)
            }
        };

        Ok(Settlement {
            seed,
            random_number,
            delivery,
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Pending request for `seed`, if any.
    pub fn query(&self, seed: &Seed) -> Option<&Request> {
        self.registry.get(seed)
    }

    /// Number of pending requests.
    pub fn pending_count(&self) -> usize {
        self.registry.len()
    }

    /// Pending seeds in ascending order.
    pub fn pending_seeds(&self) -> impl Iterator<Item = &Seed> {
        self.registry.pending_seeds()
    }

    /// Protocol log.
    pub fn events(&self) -> &EventLog {
        &self.log
    }
}
