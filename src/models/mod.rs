//! Core data types for the simulation.
//!
//! | Type | Role |
//! |------|------|
//! | [`Job`] | one unit of work and its scheduling bookkeeping |
//! | [`CoreTable`] | which job each execution slot is running |
//!
//! Times are integer ticks ([`SimTime`]); anything that may not have
//! happened yet (first start, core assignment) is an `Option`, never an
//! in-band sentinel value.

mod core;
mod job;

pub use self::core::{CoreId, CoreTable};
pub use self::job::{Job, JobId, SimTime};
