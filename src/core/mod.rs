//! Core deterministic primitives.
//!
//! Value types and hashing shared by every protocol component.

pub mod entropy;
pub mod hash;
pub mod principal;
pub mod word;

// Re-export core types
pub use entropy::{DeterministicEntropy, EntropySource, OsEntropy};
pub use hash::{Digest32, DomainHasher};
pub use principal::Principal;
pub use word::{ParseWordError, RandomNumber, Seed, Word};
