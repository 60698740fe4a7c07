//! Randomness Request/Settlement Protocol
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SETTLEMENT PROTOCOL                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  settlement.rs  - Engine: validate, retire, then dispatch   │
//! │  registry.rs    - Pending requests keyed by seed            │
//! │  access.rs      - Single-administrator authority            │
//! │  commitment.rs  - hash(seed, requester, entropy)            │
//! │  verifier.rs    - Pluggable proof verifiers                 │
//! │  callback.rs    - Callback sink contract                    │
//! │  events.rs      - Append-only protocol log                  │
//! │  error.rs       - Error taxonomy                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod access;
pub mod callback;
pub mod commitment;
pub mod error;
pub mod events;
pub mod registry;
pub mod settlement;
pub mod verifier;

// Re-export key types
pub use access::AccessControl;
pub use callback::{CallbackError, CallbackRef, CallbackSink, RecordingCallback};
pub use commitment::{derive_commitment, Commitment, CommitmentError, CommitmentOpening};
pub use error::{ProtocolError, Result};
pub use events::{EventLog, ProtocolEvent, ProtocolEventData};
pub use registry::{Registration, Request, RequestRegistry};
pub use settlement::{Delivery, RandomnessProtocol, Settlement};
pub use verifier::{
    AcceptAllVerifier, DigestProofVerifier, NonEmptyProofVerifier, ProofVerificationError,
    ProofVerifier, RejectAllVerifier, VerifierRef,
};
