//! Driving simulations end to end.
//!
//! [`Workload`] describes what arrives; [`Simulation`] feeds it to the
//! engine tick by tick and reports a [`SimSummary`]. The engine itself
//! stays event-driven and clock-free; everything clock-shaped lives here,
//! including the one decision the engine refuses to make, namely when a
//! time slice has run out.

mod driver;
mod workload;

pub use driver::{SimError, SimSummary, Simulation};
pub use workload::{JobSpec, Workload, WorkloadConfig, WorkloadError};
