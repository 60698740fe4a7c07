//! Protocol Errors
//!
//! Every variant is detected before any write, so an operation that returns
//! an error has left the registry, access control, and log untouched.

use thiserror::Error;

use crate::core::{Principal, Seed};
use crate::protocol::verifier::ProofVerificationError;

/// Errors returned by registry, settlement, and access-control operations.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Seed is already pending.
    #[error("seed already exists: {seed}")]
    Conflict {
        /// Seed that was re-registered.
        seed: Seed,
    },

    /// Seed is not pending (never registered, or already settled).
    #[error("seed not found: {seed}")]
    NotFound {
        /// Seed that was looked up.
        seed: Seed,
    },

    /// Verifier rejected the proof.
    #[error("invalid proof for seed {seed}")]
    InvalidProof {
        /// Seed being settled.
        seed: Seed,
    },

    /// Verifier could not evaluate the proof.
    #[error("malformed proof for seed {seed}: {source}")]
    MalformedProof {
        /// Seed being settled.
        seed: Seed,
        /// Verifier failure.
        #[source]
        source: ProofVerificationError,
    },

    /// Privileged operation by a non-administrator.
    #[error("authority: require admin (caller {caller})")]
    Unauthorized {
        /// Rejected caller.
        caller: Principal,
    },

    /// Registration without a per-request verifier and no default assigned.
    #[error("no verifier configured for seed {seed}")]
    VerifierNotConfigured {
        /// Seed being registered.
        seed: Seed,
    },
}

impl ProtocolError {
    /// Seed the error refers to, if any.
    pub fn seed(&self) -> Option<&Seed> {
        match self {
            Self::Conflict { seed }
            | Self::NotFound { seed }
            | Self::InvalidProof { seed }
            | Self::MalformedProof { seed, .. }
            | Self::VerifierNotConfigured { seed } => Some(seed),
            Self::Unauthorized { .. } => None,
        }
    }
}

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
