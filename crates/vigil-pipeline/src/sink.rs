//! Alert persistence hand-off

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use vigil_common::VigilResult;

use crate::alert::{Alert, PersistedAlert};

/// Persistence collaborator for accepted alerts
///
/// Called exactly once per created alert, before broadcast. Storage schema and
/// query shape live behind this boundary and are no concern of the core.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Persist one alert, assigning its sequence number
    async fn store(&self, alert: Alert) -> VigilResult<PersistedAlert>;
}

/// In-memory sink, insertion-ordered
///
/// Default sink for tests and demos.
#[derive(Default)]
pub struct MemorySink {
    alerts: RwLock<Vec<Alert>>,
    sequence: AtomicU64,
}

impl MemorySink {
    /// Empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of alerts stored so far
    pub fn len(&self) -> usize {
        self.alerts.read().len()
    }

    /// True when nothing has been stored
    pub fn is_empty(&self) -> bool {
        self.alerts.read().is_empty()
    }

    /// Copy of the stored alerts, oldest first
    pub fn snapshot(&self) -> Vec<Alert> {
        self.alerts.read().clone()
    }
}

#[async_trait]
impl AlertSink for MemorySink {
    async fn store(&self, alert: Alert) -> VigilResult<PersistedAlert> {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        self.alerts.write().push(alert.clone());
        Ok(PersistedAlert { alert, sequence })
    }
}
