use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};

use crate::error::EngineError;

/// Authoritative run state. `active_vus` is only meaningful while `running`
/// is true; a transition to `running = false` is terminal for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub running: bool,
    pub active_vus: u64,
}

/// Static descriptive metadata about the running instance, served by
/// `GET /v1/info`. Immutable for the process lifetime.
#[derive(Debug, Clone, Serialize)]
pub struct Info {
    pub version: String,
}

impl Info {
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

impl Default for Info {
    fn default() -> Self {
        Self::new()
    }
}

/// A named metric with its sample freshly formatted from the owning sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub name: String,
    pub sample: String,
}

/// Produces a formatted aggregate sample on demand. Samples are recomputed
/// on every read, never cached, so implementations must tolerate concurrent
/// readers alongside engine-side writers.
pub trait Sink: Send + Sync {
    fn format(&self) -> String;
}

/// Engine-side hook that reschedules virtual users.
pub trait Scaler: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the engine cannot reschedule to `active_vus`
    /// workers; the control plane aborts the status commit in that case.
    fn scale(&self, active_vus: u64) -> Result<(), EngineError>;
}

impl<S: Scaler + ?Sized> Scaler for Arc<S> {
    fn scale(&self, active_vus: u64) -> Result<(), EngineError> {
        self.as_ref().scale(active_vus)
    }
}

/// Handle to the engine state shared with the control plane.
///
/// The status lives behind a mutex so the status controller's
/// precondition-check-then-commit is atomic with respect to concurrent
/// PATCHes. The sink registry is fixed at construction and keyed by metric
/// name, which makes enumeration deterministic.
pub struct Engine {
    status: Mutex<Status>,
    sinks: BTreeMap<String, Box<dyn Sink>>,
    scaler: Box<dyn Scaler>,
}

impl Engine {
    #[must_use]
    pub fn new(status: Status, scaler: Box<dyn Scaler>) -> Self {
        Self {
            status: Mutex::new(status),
            sinks: BTreeMap::new(),
            scaler,
        }
    }

    /// Registers a metric sink under `name`, replacing any previous sink
    /// with the same name.
    #[must_use]
    pub fn with_sink(mut self, name: impl Into<String>, sink: Box<dyn Sink>) -> Self {
        self.sinks.insert(name.into(), sink);
        self
    }

    /// Snapshot of the current status.
    pub async fn status(&self) -> Status {
        *self.status.lock().await
    }

    /// Locks the status for an atomic read-modify-write. The guard must not
    /// be held across await points.
    pub async fn lock_status(&self) -> MutexGuard<'_, Status> {
        self.status.lock().await
    }

    /// # Errors
    ///
    /// Propagates the scaler's failure.
    pub fn scale(&self, active_vus: u64) -> Result<(), EngineError> {
        self.scaler.scale(active_vus)
    }

    /// Every registered metric with a refreshed sample, sorted by name.
    #[must_use]
    pub fn metrics(&self) -> Vec<Metric> {
        self.sinks
            .iter()
            .map(|(name, sink)| Metric {
                name: name.clone(),
                sample: sink.format(),
            })
            .collect()
    }

    /// Exact-name lookup with a refreshed sample.
    #[must_use]
    pub fn metric(&self, name: &str) -> Option<Metric> {
        self.sinks.get(name).map(|sink| Metric {
            name: name.to_owned(),
            sample: sink.format(),
        })
    }
}
