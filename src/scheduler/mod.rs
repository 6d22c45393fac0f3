//! The event-driven engine and its run statistics.
//!
//! `Scheduler` reacts to arrival, completion and quantum-expiry events and
//! decides which job holds which core; `RunMetrics` folds each finished job
//! into the three classic averages (waiting, turnaround, response).
//!
//! # References
//!
//! - Silberschatz, Galvin & Gagne, "Operating System Concepts", Ch. 5.2-5.3
//! - Arpaci-Dusseau, "Operating Systems: Three Easy Pieces", Ch. 7-8

mod engine;
mod metrics;

pub use engine::Scheduler;
pub use metrics::RunMetrics;
