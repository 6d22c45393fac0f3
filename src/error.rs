//! Driver-contract violations.
//!
//! The engine takes event times as given and never second-guesses their
//! ordering; what it does verify is that each event names real things: a
//! core that exists, a job actually occupying it, a policy that has quanta
//! at all. A violation comes back as a typed error instead of corrupting
//! the run.

use thiserror::Error;

use crate::models::{CoreId, JobId};
use crate::policy::Policy;

/// An event the scheduler cannot accept.
///
/// Every variant indicates a bug in the driver, not a scheduling outcome;
/// correct drivers never see these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// Core index past the end of the core table.
    #[error("core {core} does not exist ({cores} cores configured)")]
    InvalidCore { core: CoreId, cores: usize },

    /// A job arrived under an id that is still in flight.
    #[error("job {job} is already in flight")]
    DuplicateJob { job: JobId },

    /// Completion reported for a job that is not what the named core runs.
    #[error("job {job} is not running on core {core}")]
    NotOnCore { job: JobId, core: CoreId },

    /// Quantum expiry reported for a core with nothing on it.
    #[error("core {core} is idle; no quantum can expire there")]
    CoreIdle { core: CoreId },

    /// Quantum expiry reported under a policy without time slices.
    #[error("policy {policy:?} has no time slices")]
    NotTimeSliced { policy: Policy },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let error = SchedulerError::InvalidCore { core: 5, cores: 2 };
        assert_eq!(error.to_string(), "core 5 does not exist (2 cores configured)");

        let error = SchedulerError::NotOnCore { job: 9, core: 0 };
        assert_eq!(error.to_string(), "job 9 is not running on core 0");

        let error = SchedulerError::NotTimeSliced {
            policy: Policy::Fcfs,
        };
        assert!(error.to_string().contains("Fcfs"));
    }
}
