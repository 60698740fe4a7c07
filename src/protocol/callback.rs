//! Callback Sinks
//!
//! The external recipient of a settled random number. The engine hands the
//! sink a mutable reference to the protocol itself, so a sink may re-enter
//! `settle` or `register` while it is being notified. By then the request
//! has already been removed.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::core::{RandomNumber, Seed};
use crate::protocol::settlement::RandomnessProtocol;

/// Recipient of settled random numbers.
///
/// Invoked at most once per live request. A failure returned here is
/// recorded but never rolls back the settlement.
pub trait CallbackSink: Send + Sync {
    /// Deliver `random_number` for `seed`.
    fn receive(
        &self,
        host: &mut RandomnessProtocol,
        seed: Seed,
        random_number: RandomNumber,
    ) -> Result<(), CallbackError>;
}

/// Failure reported by a callback sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackError {
    /// Sink failed while handling the delivery.
    #[error("callback failed: {0}")]
    Failed(String),
}

/// Shared handle to a callback sink.
///
/// Two handles are equal only if they point at the same sink object.
#[derive(Clone)]
pub struct CallbackRef(Arc<dyn CallbackSink>);

impl CallbackRef {
    /// Wrap a sink in a new handle.
    pub fn new<C: CallbackSink + 'static>(sink: C) -> Self {
        Self(Arc::new(sink))
    }

    /// Wrap an already shared sink.
    pub fn from_arc(sink: Arc<dyn CallbackSink>) -> Self {
        Self(sink)
    }

    /// Deliver through the handle.
    pub fn receive(
        &self,
        host: &mut RandomnessProtocol,
        seed: Seed,
        random_number: RandomNumber,
    ) -> Result<(), CallbackError> {
        self.0.receive(host, seed, random_number)
    }
}

impl PartialEq for CallbackRef {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl Eq for CallbackRef {}

impl fmt::Debug for CallbackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallbackRef({:p})", Arc::as_ptr(&self.0) as *const ())
    }
}

/// Sink that stores every delivery.
///
/// Keeps the latest value per seed plus the full delivery sequence. Share it
/// with [`RecordingCallback::handle`] and inspect the original afterwards.
#[derive(Debug, Default)]
pub struct RecordingCallback {
    values: Mutex<BTreeMap<Seed, RandomNumber>>,
    deliveries: Mutex<Vec<(Seed, RandomNumber)>>,
}

impl RecordingCallback {
    /// Create an empty recorder.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Handle pointing at this recorder.
    pub fn handle(self: &Arc<Self>) -> CallbackRef {
        CallbackRef::from_arc(self.clone())
    }

    /// Last value delivered for `seed`.
    pub fn value_for(&self, seed: &Seed) -> Option<RandomNumber> {
        self.values.lock().get(seed).copied()
    }

    /// Every delivery in arrival order.
    pub fn deliveries(&self) -> Vec<(Seed, RandomNumber)> {
        self.deliveries.lock().clone()
    }

    /// Number of deliveries received.
    pub fn delivery_count(&self) -> usize {
        self.deliveries.lock().len()
    }
}

impl CallbackSink for RecordingCallback {
    fn receive(
        &self,
        _host: &mut RandomnessProtocol,
        seed: Seed,
        random_number: RandomNumber,
    ) -> Result<(), CallbackError> {
        self.values.lock().insert(seed, random_number);
        self.deliveries.lock().push((seed, random_number));
        Ok(())
    }
}
