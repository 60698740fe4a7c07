//! Protocol Configuration
//!
//! Loaded from environment variables or a JSON document. Deployment concerns
//! (networking, key storage) are out of scope; this only selects the
//! administrator, the entropy source, the default verifier, and logging.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::hash::{hash_bytes, Digest32};
use crate::core::{DeterministicEntropy, EntropySource, OsEntropy, Principal};
use crate::protocol::verifier::{
    AcceptAllVerifier, DigestProofVerifier, NonEmptyProofVerifier, RejectAllVerifier, VerifierRef,
};
use crate::protocol::RandomnessProtocol;

/// Environment variable for the administrator.
pub const ENV_ADMIN: &str = "RANDOM_SETTLEMENT_ADMIN";
/// Environment variable selecting deterministic entropy.
pub const ENV_ENTROPY_SEED: &str = "RANDOM_SETTLEMENT_ENTROPY_SEED";
/// Environment variable for the default verifier.
pub const ENV_VERIFIER: &str = "RANDOM_SETTLEMENT_VERIFIER";
/// Environment variable for the log filter.
pub const ENV_LOG: &str = "RANDOM_SETTLEMENT_LOG";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// Config document is not valid JSON for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A setting has an unusable value.
    #[error("invalid value for {key}: {value}")]
    InvalidValue {
        /// Setting name.
        key: &'static str,
        /// Rejected value.
        value: String,
    },
}

/// Where registration entropy comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EntropyMode {
    /// Operating system RNG.
    #[default]
    Os,
    /// Seeded stream, for reproducible runs only.
    Deterministic {
        /// Stream seed.
        seed: u64,
    },
}

impl EntropyMode {
    /// Build the configured source.
    pub fn build(&self) -> Box<dyn EntropySource> {
        match self {
            Self::Os => Box::new(OsEntropy),
            Self::Deterministic { seed } => Box::new(DeterministicEntropy::new(*seed)),
        }
    }
}

/// Built-in verifier selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VerifierKind {
    /// [`AcceptAllVerifier`].
    AcceptAll,
    /// [`RejectAllVerifier`].
    RejectAll,
    /// [`NonEmptyProofVerifier`].
    NonEmpty,
    /// [`DigestProofVerifier`]. `key` is 64 hex digits, or any other string
    /// which is hashed into a key.
    Digest {
        /// Key material.
        key: String,
    },
}

impl VerifierKind {
    /// Parse the compact form used in environment variables:
    /// `accept-all`, `reject-all`, `non-empty`, or `digest:<key>`.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim() {
            "accept-all" => Ok(Self::AcceptAll),
            "reject-all" => Ok(Self::RejectAll),
            "non-empty" => Ok(Self::NonEmpty),
            other => match other.strip_prefix("digest:") {
                Some(key) if !key.is_empty() => Ok(Self::Digest { key: key.to_string() }),
                _ => Err(ConfigError::InvalidValue {
                    key: ENV_VERIFIER,
                    value: s.to_string(),
                }),
            },
        }
    }

    /// Construct a fresh verifier handle.
    pub fn build(&self) -> Result<VerifierRef, ConfigError> {
        Ok(match self {
            Self::AcceptAll => VerifierRef::new(AcceptAllVerifier),
            Self::RejectAll => VerifierRef::new(RejectAllVerifier),
            Self::NonEmpty => VerifierRef::new(NonEmptyProofVerifier),
            Self::Digest { key } => VerifierRef::new(DigestProofVerifier::new(digest_key(key)?)),
        })
    }
}

/// Decode a 32-byte hex key, or hash arbitrary key material into one.
///
/// A `0x`-prefixed value must be exactly 64 hex digits.
pub fn digest_key(key: &str) -> Result<Digest32, ConfigError> {
    let mut out = [0u8; 32];
    if let Some(digits) = key.strip_prefix("0x") {
        return hex::decode_to_slice(digits, &mut out)
            .map(|()| out)
            .map_err(|_| ConfigError::InvalidValue {
                key: ENV_VERIFIER,
                value: key.to_string(),
            });
    }
    match hex::decode_to_slice(key, &mut out) {
        Ok(()) => Ok(out),
        Err(_) => Ok(hash_bytes(key.as_bytes())),
    }
}

/// Protocol configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Administrator: `0x` + 40 hex digits, or a name for `Principal::from_name`.
    #[serde(default = "default_admin")]
    pub admin: String,

    /// Entropy source.
    #[serde(default)]
    pub entropy: EntropyMode,

    /// Default verifier assigned at startup.
    #[serde(default)]
    pub default_verifier: Option<VerifierKind>,

    /// Tracing filter directive.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_admin() -> String {
    "admin".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            admin: default_admin(),
            entropy: EntropyMode::default(),
            default_verifier: None,
            log_filter: default_log_filter(),
        }
    }
}

impl ProtocolConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup (environment-shaped).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(admin) = lookup(ENV_ADMIN) {
            config.admin = admin;
        }
        if let Some(seed) = lookup(ENV_ENTROPY_SEED) {
            let seed = seed.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: ENV_ENTROPY_SEED,
                value: seed.clone(),
            })?;
            config.entropy = EntropyMode::Deterministic { seed };
        }
        if let Some(verifier) = lookup(ENV_VERIFIER) {
            config.default_verifier = Some(VerifierKind::parse(&verifier)?);
        }
        if let Some(filter) = lookup(ENV_LOG) {
            config.log_filter = filter;
        }

        Ok(config)
    }

    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Resolve the administrator principal.
    ///
    /// A `0x`-prefixed value must be exactly 40 hex digits; anything else is
    /// treated as a name.
    pub fn admin_principal(&self) -> Result<Principal, ConfigError> {
        if self.admin.starts_with("0x") {
            return Principal::from_hex(&self.admin).ok_or_else(|| ConfigError::InvalidValue {
                key: ENV_ADMIN,
                value: self.admin.clone(),
            });
        }
        Ok(Principal::from_name(&self.admin))
    }

    /// Build a protocol with this configuration applied.
    pub fn build_protocol(&self) -> Result<RandomnessProtocol, ConfigError> {
        let admin = self.admin_principal()?;
        let mut protocol = RandomnessProtocol::new(admin, self.entropy.build());

        if let Some(kind) = &self.default_verifier {
            protocol
                .set_admin_verifier(&admin, kind.build()?)
                .map_err(|e| ConfigError::InvalidValue {
                    key: "default_verifier",
                    value: e.to_string(),
                })?;
        }

        Ok(protocol)
    }
}
