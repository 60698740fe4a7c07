//! Protocol Log
//!
//! Append-only record of what the protocol did, in the order it happened.
//! Settlement writes its `Settled` entry before the callback runs, so the log
//! and the sink always see the same `(seed, random_number)` pairs.

use serde::{Deserialize, Serialize};

use crate::core::{Principal, RandomNumber, Seed};
use crate::protocol::commitment::Commitment;

/// Protocol event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolEventData {
    /// A request became pending.
    RequestRegistered {
        seed: Seed,
        requester: Principal,
        commitment: Commitment,
        verifier: String,
    },

    /// A request was settled and its value dispatched.
    Settled {
        seed: Seed,
        random_number: RandomNumber,
    },

    /// The callback of a settled request reported a failure.
    CallbackFailed {
        seed: Seed,
        reason: String,
    },

    /// The default verifier was assigned.
    VerifierAssigned {
        admin: Principal,
        verifier: String,
    },

    /// The administrator role moved to another principal.
    AdminTransferred {
        from: Principal,
        to: Principal,
    },
}

/// A logged event with its position in the log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolEvent {
    /// Strictly increasing sequence number, starting at 0.
    pub sequence: u64,

    /// Event data.
    pub data: ProtocolEventData,
}

impl ProtocolEvent {
    /// Seed this event concerns, if any.
    pub fn seed(&self) -> Option<&Seed> {
        match &self.data {
            ProtocolEventData::RequestRegistered { seed, .. }
            | ProtocolEventData::Settled { seed, .. }
            | ProtocolEventData::CallbackFailed { seed, .. } => Some(seed),
            ProtocolEventData::VerifierAssigned { .. }
            | ProtocolEventData::AdminTransferred { .. } => None,
        }
    }
}

/// Append-only protocol log.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<ProtocolEvent>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event and return its sequence number.
    pub(crate) fn push(&mut self, data: ProtocolEventData) -> u64 {
        let sequence = self.events.len() as u64;
        self.events.push(ProtocolEvent { sequence, data });
        sequence
    }

    /// All events in order.
    pub fn iter(&self) -> impl Iterator<Item = &ProtocolEvent> {
        self.events.iter()
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Most recent event.
    pub fn last(&self) -> Option<&ProtocolEvent> {
        self.events.last()
    }

    /// Every `(seed, random_number)` settlement notification, in order.
    pub fn settlements(&self) -> Vec<(Seed, RandomNumber)> {
        self.events
            .iter()
            .filter_map(|event| match &event.data {
                ProtocolEventData::Settled { seed, random_number } => Some((*seed, *random_number)),
                _ => None,
            })
            .collect()
    }

    /// Settlement notifications for one seed.
    pub fn settlements_for(&self, seed: &Seed) -> Vec<RandomNumber> {
        self.settlements()
            .into_iter()
            .filter(|(s, _)| s == seed)
            .map(|(_, value)| value)
            .collect()
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Serialize to binary (bincode).
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize from binary (bincode).
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}
