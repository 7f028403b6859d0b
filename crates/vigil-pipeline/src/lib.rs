//! Vigil Alert Pipeline
//!
//! Turns classification verdicts into alerts and fans them out.
//!
//! ## Components
//!
//! - **Decision Gate**: per-domain confidence thresholds and severity tiers
//! - **Alert Sink**: persistence hand-off, called exactly once per alert,
//!   synchronously before broadcast
//! - **Broadcaster**: at-most-once, non-blocking delivery to subscribers
//! - **Synthetic Source**: periodic drill alerts through the same ingest path
//!
//! ## Flow
//!
//! verdict → gate → alert → sink → broadcaster → subscribers

pub mod alert;
pub mod broadcast;
pub mod gate;
pub mod pipeline;
pub mod sink;
pub mod synthetic;

pub use alert::{Alert, PersistedAlert};
pub use broadcast::{AlertBroadcaster, BroadcastStats, Subscription, DEFAULT_QUEUE_DEPTH};
pub use gate::{DecisionGate, GateConfig};
pub use pipeline::{PipelineStats, ScanOutcome, ThreatPipeline};
pub use sink::{AlertSink, MemorySink};
pub use synthetic::{SyntheticConfig, SyntheticSource};
