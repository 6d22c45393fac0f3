//! Tick-by-tick simulation driver.
//!
//! The engine decides *where* jobs run; the driver decides *when* things
//! happen. [`Simulation`] walks the clock one tick at a time, reports
//! arrivals, completions and quantum expiries to a
//! [`Scheduler`](crate::scheduler::Scheduler), and mirrors just enough
//! state (remaining service per job, slice age per core) to know when the
//! next completions and expiries fall. The mirror is fed purely by the engine's
//! return values; the driver never reaches into engine internals.
//!
//! Within one tick, events resolve in a fixed order: completions first,
//! then quantum expiries, then the arrival. A job finishing exactly at its
//! slice boundary completes; no expiry is reported for it.

use std::collections::HashMap;
use std::num::{NonZeroI64, NonZeroUsize};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::SchedulerError;
use crate::models::{JobId, SimTime};
use crate::policy::Policy;
use crate::scheduler::Scheduler;

use super::workload::{Workload, WorkloadError};

/// Why a run could not be carried out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// The workload failed validation before the run started.
    #[error("invalid workload: {0:?}")]
    InvalidWorkload(Vec<WorkloadError>),

    /// Round-robin runs need a quantum.
    #[error("round-robin requires a quantum")]
    MissingQuantum,

    /// Time slices must be positive tick counts.
    #[error("quantum {quantum} is not positive")]
    InvalidQuantum { quantum: i64 },

    /// The engine rejected an event the driver produced; if this ever
    /// happens the driver's mirror is wrong, not the engine.
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// Results of one complete run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSummary {
    /// Jobs that ran to completion.
    pub jobs_finished: usize,
    /// Tick at which the last job completed.
    pub makespan: SimTime,
    /// Mean waiting time across finished jobs.
    pub average_waiting_time: f64,
    /// Mean turnaround time across finished jobs.
    pub average_turnaround_time: f64,
    /// Mean response time across finished jobs.
    pub average_response_time: f64,
}

/// What one core is running, as the driver sees it.
#[derive(Debug, Clone, Copy)]
struct Slice {
    job: JobId,
    /// Ticks of service consumed since the job last got this core.
    age: SimTime,
}

/// A configured simulation run.
///
/// Builder-style: construct over a workload, optionally set a quantum, then
/// [`run`](Simulation::run) to completion.
pub struct Simulation {
    scheduler: Scheduler,
    workload: Workload,
    quantum: Option<NonZeroI64>,
    /// Remaining service per in-flight job, driver's view.
    remaining: HashMap<JobId, SimTime>,
    /// Per-core slice state, driver's view.
    slices: Vec<Option<Slice>>,
}

impl Simulation {
    /// Creates a run of `workload` on `cores` cores under `policy`.
    pub fn new(cores: NonZeroUsize, policy: Policy, workload: Workload) -> Self {
        Self {
            scheduler: Scheduler::new(cores, policy),
            slices: vec![None; cores.get()],
            workload,
            quantum: None,
            remaining: HashMap::new(),
        }
    }

    /// Sets the time slice length, in ticks. Policies without time slicing
    /// ignore it; a round-robin run rejects a negative length at start.
    pub fn with_quantum(mut self, quantum: NonZeroI64) -> Self {
        self.quantum = Some(quantum);
        self
    }

    /// Runs the whole workload to completion and reports the summary.
    ///
    /// # Errors
    /// [`SimError::InvalidWorkload`] for structural workload problems;
    /// [`SimError::MissingQuantum`] or [`SimError::InvalidQuantum`] for
    /// round-robin without a positive quantum;
    /// [`SimError::Scheduler`] if the engine rejects an event.
    pub fn run(mut self) -> Result<SimSummary, SimError> {
        self.workload.validate().map_err(SimError::InvalidWorkload)?;
        let quantum = if self.scheduler.policy().is_time_sliced() {
            let quantum = self.quantum.ok_or(SimError::MissingQuantum)?;
            if quantum.get() < 0 {
                // A negative length would fail the age test on every tick
                // and rotate every busy core, fresh slices included.
                return Err(SimError::InvalidQuantum {
                    quantum: quantum.get(),
                });
            }
            Some(quantum)
        } else {
            None
        };

        let specs = std::mem::take(&mut self.workload.jobs);
        let total_jobs = specs.len();
        let mut arrivals = specs.into_iter().peekable();
        let mut finished = 0usize;
        let mut makespan: SimTime = 0;
        let mut now: SimTime = 0;

        while finished < total_jobs {
            // Completions due this tick.
            for core in 0..self.slices.len() {
                let Some(slice) = self.slices[core] else { continue };
                let done = matches!(self.remaining.get(&slice.job), Some(&rem) if rem <= 0);
                if !done {
                    continue;
                }
                let next = self.scheduler.job_finished(core, slice.job, now)?;
                self.remaining.remove(&slice.job);
                finished += 1;
                makespan = now;
                self.slices[core] = next.map(|job| Slice { job, age: 0 });
            }

            // Quantum expiries. A slice promoted this very tick has age 0
            // and cannot expire yet.
            if let Some(quantum) = quantum {
                for core in 0..self.slices.len() {
                    let Some(slice) = self.slices[core] else { continue };
                    if slice.age < quantum.get() {
                        continue;
                    }
                    let next = self.scheduler.quantum_expired(core, now)?;
                    self.slices[core] = next.map(|job| Slice { job, age: 0 });
                }
            }

            // The arrival, at most one per tick.
            if arrivals.peek().is_some_and(|spec| spec.arrival_time == now) {
                if let Some(spec) = arrivals.next() {
                    self.remaining.insert(spec.id, spec.service_time);
                    let assigned =
                        self.scheduler
                            .job_arrived(spec.id, now, spec.service_time, spec.priority)?;
                    if let Some(core) = assigned {
                        self.slices[core] = Some(Slice {
                            job: spec.id,
                            age: 0,
                        });
                    }
                }
            }

            // Burn one tick of service on every busy core.
            for slice in self.slices.iter_mut().flatten() {
                if let Some(rem) = self.remaining.get_mut(&slice.job) {
                    *rem -= 1;
                    slice.age += 1;
                }
            }

            let stalled = self.slices.iter().all(Option::is_none) && arrivals.peek().is_none();
            if stalled && finished < total_jobs {
                debug_assert!(false, "driver stalled at tick {now}");
                break;
            }
            now += 1;
        }

        let metrics = self.scheduler.metrics();
        Ok(SimSummary {
            jobs_finished: metrics.finished(),
            makespan,
            average_waiting_time: metrics.average_waiting_time(),
            average_turnaround_time: metrics.average_turnaround_time(),
            average_response_time: metrics.average_response_time(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::WorkloadConfig;

    fn make_cores(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn make_quantum(q: i64) -> NonZeroI64 {
        NonZeroI64::new(q).unwrap()
    }

    #[test]
    fn test_fcfs_single_core_textbook_run() {
        // The classic convoy: one long job in front of two short ones.
        let workload = Workload::new()
            .with_job(0, 0, 24, 0)
            .with_job(1, 1, 3, 0)
            .with_job(2, 2, 3, 0);
        let summary = Simulation::new(make_cores(1), Policy::Fcfs, workload)
            .run()
            .unwrap();

        assert_eq!(summary.jobs_finished, 3);
        assert_eq!(summary.makespan, 30);
        // Waiting 0/23/25, turnaround 24/26/28; FCFS responds when it serves.
        assert!((summary.average_waiting_time - 16.0).abs() < 1e-10);
        assert!((summary.average_turnaround_time - 26.0).abs() < 1e-10);
        assert!((summary.average_response_time - 16.0).abs() < 1e-10);
    }

    #[test]
    fn test_psjf_staggered_arrivals_textbook_run() {
        // Shortest-remaining-time-first staple: 8/4/9/5 arriving one tick apart.
        let workload = Workload::new()
            .with_job(0, 0, 8, 0)
            .with_job(1, 1, 4, 0)
            .with_job(2, 2, 9, 0)
            .with_job(3, 3, 5, 0);
        let summary = Simulation::new(make_cores(1), Policy::Psjf, workload)
            .run()
            .unwrap();

        assert_eq!(summary.jobs_finished, 4);
        assert_eq!(summary.makespan, 26);
        // Completions at 5/10/17/26 give waiting 9/0/15/2.
        assert!((summary.average_waiting_time - 6.5).abs() < 1e-10);
        assert!((summary.average_turnaround_time - 13.0).abs() < 1e-10);
        assert!((summary.average_response_time - 4.25).abs() < 1e-10);
    }

    #[test]
    fn test_round_robin_textbook_run() {
        let workload = Workload::new()
            .with_job(0, 0, 24, 0)
            .with_job(1, 1, 3, 0)
            .with_job(2, 2, 3, 0);
        let summary = Simulation::new(make_cores(1), Policy::Rr, workload)
            .with_quantum(make_quantum(4))
            .run()
            .unwrap();

        assert_eq!(summary.jobs_finished, 3);
        assert_eq!(summary.makespan, 30);
        // Slices rotate at 4; completions land at 7/10/30.
        assert!((summary.average_waiting_time - 14.0 / 3.0).abs() < 1e-10);
        assert!((summary.average_response_time - 8.0 / 3.0).abs() < 1e-10);
        assert!((summary.average_turnaround_time - 44.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_preemptive_priority_run() {
        let workload = Workload::new()
            .with_job(0, 0, 5, 3)
            .with_job(1, 1, 3, 1);
        let summary = Simulation::new(make_cores(1), Policy::Ppri, workload)
            .run()
            .unwrap();

        // Job 1 preempts at t=1, finishes at 4; job 0 resumes and ends at 8.
        assert_eq!(summary.makespan, 8);
        assert!((summary.average_waiting_time - 1.5).abs() < 1e-10);
        assert!((summary.average_response_time - 0.0).abs() < 1e-10);
        assert!((summary.average_turnaround_time - 5.5).abs() < 1e-10);
    }

    #[test]
    fn test_two_cores_share_the_load() {
        let workload = Workload::new()
            .with_job(0, 0, 6, 0)
            .with_job(1, 1, 6, 0)
            .with_job(2, 2, 2, 0);
        let summary = Simulation::new(make_cores(2), Policy::Fcfs, workload)
            .run()
            .unwrap();

        // Job 2 waits for core 0 to free at t=6 and finishes at 8.
        assert_eq!(summary.makespan, 8);
        assert!((summary.average_waiting_time - 4.0 / 3.0).abs() < 1e-10);
        assert!((summary.average_turnaround_time - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_workload_yields_empty_summary() {
        let summary = Simulation::new(make_cores(2), Policy::Sjf, Workload::new())
            .run()
            .unwrap();
        assert_eq!(summary.jobs_finished, 0);
        assert_eq!(summary.makespan, 0);
        assert_eq!(summary.average_waiting_time, 0.0);
    }

    #[test]
    fn test_round_robin_without_quantum_is_rejected() {
        let workload = Workload::new().with_job(0, 0, 4, 0);
        let result = Simulation::new(make_cores(1), Policy::Rr, workload).run();
        assert_eq!(result.unwrap_err(), SimError::MissingQuantum);
    }

    #[test]
    fn test_negative_quantum_is_rejected() {
        // A negative length passes the non-zero gate but would expire every
        // slice at age 0; the run must refuse it, not finish with skewed
        // rotations.
        let workload = Workload::new().with_job(0, 0, 4, 0).with_job(1, 1, 4, 0);
        let result = Simulation::new(make_cores(1), Policy::Rr, workload)
            .with_quantum(make_quantum(-4))
            .run();
        assert_eq!(result.unwrap_err(), SimError::InvalidQuantum { quantum: -4 });
    }

    #[test]
    fn test_invalid_workload_is_rejected() {
        let workload = Workload::new().with_job(3, 0, 4, 0).with_job(3, 1, 2, 0);
        let result = Simulation::new(make_cores(1), Policy::Fcfs, workload).run();
        match result.unwrap_err() {
            SimError::InvalidWorkload(problems) => {
                assert_eq!(problems, vec![WorkloadError::DuplicateId { id: 3 }]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_metric_identities_hold_across_policies() {
        let config = WorkloadConfig {
            jobs: 12,
            arrival_probability: 0.4,
            max_service: 9,
            priority_levels: 4,
            seed: 7,
        };
        let workload = Workload::random(&config);
        let mean_service = workload.total_service() as f64 / workload.len() as f64;

        for policy in [
            Policy::Fcfs,
            Policy::Sjf,
            Policy::Psjf,
            Policy::Pri,
            Policy::Ppri,
            Policy::Rr,
        ] {
            let summary = Simulation::new(make_cores(2), policy, workload.clone())
                .with_quantum(make_quantum(3))
                .run()
                .unwrap();

            assert_eq!(summary.jobs_finished, workload.len(), "{policy:?}");
            // Turnaround decomposes into waiting plus service, exactly.
            assert!(
                (summary.average_turnaround_time
                    - summary.average_waiting_time
                    - mean_service)
                    .abs()
                    < 1e-9,
                "{policy:?}"
            );
            // A job never responds later than it stops waiting.
            assert!(
                summary.average_response_time <= summary.average_waiting_time + 1e-9,
                "{policy:?}"
            );
            if !policy.is_preemptive() && !policy.is_time_sliced() {
                // Run-to-completion: response and waiting coincide.
                assert!(
                    (summary.average_response_time - summary.average_waiting_time).abs() < 1e-9,
                    "{policy:?}"
                );
            }
        }
    }
}
