//! Non-blocking alert fan-out to subscribers
//!
//! Delivery is at-most-once per subscriber per alert, taken over a snapshot of
//! the registry at publish time. There is no history replay: a subscriber sees
//! only alerts published after it registered.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use uuid::Uuid;

use crate::alert::Alert;

/// Default per-subscriber queue capacity
pub const DEFAULT_QUEUE_DEPTH: usize = 64;

type Registry = Arc<DashMap<Uuid, mpsc::Sender<Arc<Alert>>>>;

/// Delivery counters
#[derive(Debug, Default)]
pub struct BroadcastStats {
    /// Alerts handed to `publish`
    pub published: AtomicU64,
    /// Per-subscriber deliveries that were enqueued
    pub delivered: AtomicU64,
    /// Per-subscriber deliveries dropped on a full queue
    pub dropped: AtomicU64,
    /// Closed receivers removed during publication
    pub pruned: AtomicU64,
}

/// One subscriber's receive side
///
/// Dropping the handle unsubscribes. A receiver that goes away mid-publish is
/// also pruned lazily when delivery finds its channel closed.
pub struct Subscription {
    id: Uuid,
    rx: mpsc::Receiver<Arc<Alert>>,
    registry: Registry,
}

impl Subscription {
    /// Subscriber id
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Wait for the next published alert; `None` once unsubscribed
    pub async fn recv(&mut self) -> Option<Arc<Alert>> {
        self.rx.recv().await
    }

    /// Take a queued alert without waiting
    pub fn try_recv(&mut self) -> Option<Arc<Alert>> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.remove(&self.id);
    }
}

/// Fan-out of created alerts to live subscribers
pub struct AlertBroadcaster {
    registry: Registry,
    queue_depth: usize,
    stats: BroadcastStats,
}

impl AlertBroadcaster {
    /// Broadcaster with the default queue depth
    pub fn new() -> Self {
        Self::with_queue_depth(DEFAULT_QUEUE_DEPTH)
    }

    /// Broadcaster with an explicit per-subscriber queue depth
    pub fn with_queue_depth(queue_depth: usize) -> Self {
        Self {
            registry: Arc::new(DashMap::new()),
            queue_depth,
            stats: BroadcastStats::default(),
        }
    }

    /// Register a subscriber; it only sees alerts published afterwards
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(self.queue_depth);
        let id = Uuid::new_v4();
        self.registry.insert(id, tx);
        tracing::debug!(subscriber = %id, "subscriber registered");
        Subscription {
            id,
            rx,
            registry: Arc::clone(&self.registry),
        }
    }

    /// Remove a subscriber by id; returns whether it was registered
    pub fn unsubscribe(&self, id: Uuid) -> bool {
        self.registry.remove(&id).is_some()
    }

    /// Number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.registry.len()
    }

    /// Publish one alert to the current subscribers; returns deliveries
    ///
    /// Best effort per subscriber and never blocking: a full queue drops this
    /// alert for that subscriber only, a closed receiver is pruned.
    pub fn publish(&self, alert: &Arc<Alert>) -> usize {
        self.stats.published.fetch_add(1, Ordering::Relaxed);

        // Pruning while iterating would re-enter the shard lock, so delivery
        // works from a snapshot of the registry.
        let snapshot: Vec<(Uuid, mpsc::Sender<Arc<Alert>>)> = self
            .registry
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        let mut deliveries = 0;
        for (id, tx) in snapshot {
            match tx.try_send(Arc::clone(alert)) {
                Ok(()) => {
                    deliveries += 1;
                    self.stats.delivered.fetch_add(1, Ordering::Relaxed);
                }
                Err(TrySendError::Full(_)) => {
                    self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(subscriber = %id, alert = %alert.id, "subscriber queue full, alert dropped");
                }
                Err(TrySendError::Closed(_)) => {
                    self.registry.remove(&id);
                    self.stats.pruned.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
        deliveries
    }

    /// Delivery counters
    pub fn stats(&self) -> &BroadcastStats {
        &self.stats
    }
}

impl Default for AlertBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
