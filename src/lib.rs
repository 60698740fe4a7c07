//! # Random Settlement
//!
//! Verifiable randomness request/fulfillment protocol.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    RANDOM SETTLEMENT                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── word.rs     - 256-bit Word, Seed, RandomNumber          │
//! │  ├── principal.rs- Caller identity                           │
//! │  ├── hash.rs     - Domain-separated SHA-256                  │
//! │  └── entropy.rs  - OS and seeded entropy sources             │
//! │                                                              │
//! │  protocol/       - Request/settlement protocol               │
//! │  ├── registry.rs - Pending requests keyed by seed            │
//! │  ├── settlement.rs- Validate, retire, then dispatch          │
//! │  ├── verifier.rs - Pluggable proof verifiers                 │
//! │  ├── callback.rs - Callback sink contract                    │
//! │  ├── access.rs   - Single-administrator authority            │
//! │  ├── commitment.rs- Request commitments                      │
//! │  └── events.rs   - Protocol log                              │
//! │                                                              │
//! │  config.rs       - Environment / JSON configuration          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle
//!
//! ```text
//! Unregistered --register--> Pending --settle(valid proof)--> Settled (removed)
//! ```
//!
//! A requester registers a seed with a callback and a verifier and receives a
//! commitment over the seed, its own identity, and fresh entropy. A settlement
//! authority later submits a random number and a proof. The request's own
//! verifier checks the proof; on success the request is removed **before** the
//! callback is invoked, so the value is delivered at most once even if the
//! callback re-enters the protocol.
//!
//! Execution is strictly sequential: every operation takes `&mut self` and
//! runs to completion.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod protocol;

// Re-export commonly used types
pub use crate::config::{ConfigError, ProtocolConfig};
pub use crate::core::{Principal, RandomNumber, Seed, Word};
pub use crate::protocol::{
    CallbackRef, CallbackSink, Delivery, ProofVerifier, ProtocolError, RandomnessProtocol,
    Registration, Settlement, VerifierRef,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
