//! Multi-core CPU scheduling simulation.
//!
//! Simulates how the classic scheduling disciplines place jobs on cores. A
//! driver reports arrivals, completions and quantum expiries at integer
//! ticks; the engine answers each event with a dispatch decision and folds
//! every finished job into the three standard averages (waiting,
//! turnaround, response). All calls are synchronous: one event resolves at
//! a time, and one `Scheduler` value is one independent run.
//!
//! # Modules
//!
//! - **`models`**: `Job` records and the `CoreTable`
//! - **`policy`**: the six disciplines and their comparators
//! - **`queue`**: the comparator-ordered ready queue
//! - **`scheduler`**: the event-driven engine and run statistics
//! - **`sim`**: workload generation and the tick-driving simulation loop
//! - **`error`**: driver-contract violations
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroUsize;
//! use core_sim::{Policy, Scheduler};
//!
//! let mut scheduler = Scheduler::new(NonZeroUsize::new(2).unwrap(), Policy::Sjf);
//! assert_eq!(scheduler.job_arrived(1, 0, 40, 0), Ok(Some(0)));
//! assert_eq!(scheduler.job_arrived(2, 1, 10, 0), Ok(Some(1)));
//! // Both cores busy; shortest-job-first does not preempt.
//! assert_eq!(scheduler.job_arrived(3, 2, 25, 0), Ok(None));
//! // Job 2 finishes; the freed core goes to the shortest waiter.
//! assert_eq!(scheduler.job_finished(1, 2, 11), Ok(Some(3)));
//! ```
//!
//! # References
//!
//! - Silberschatz, Galvin & Gagne, "Operating System Concepts", Ch. 5
//! - Arpaci-Dusseau, "Operating Systems: Three Easy Pieces", Ch. 7-8

pub mod error;
pub mod models;
pub mod policy;
pub mod queue;
pub mod scheduler;
pub mod sim;

pub use error::SchedulerError;
pub use models::{CoreId, Job, JobId, SimTime};
pub use policy::Policy;
pub use queue::ReadyQueue;
pub use scheduler::{RunMetrics, Scheduler};
pub use sim::{JobSpec, SimError, SimSummary, Simulation, Workload, WorkloadConfig};
