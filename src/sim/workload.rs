//! Workload description and generation.
//!
//! A workload is the driver's input: which jobs arrive when, how much
//! service each wants, at what priority. Build one by hand for targeted
//! scenarios or generate one stochastically for soak-style runs; either way
//! [`Workload::validate`] checks the structural rules the engine relies on
//! before a run starts.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{JobId, SimTime};

/// One job the driver will submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Identifier the driver and engine both use for this job.
    pub id: JobId,
    /// Tick the job arrives at.
    pub arrival_time: SimTime,
    /// Total service the job demands, in ticks (must be positive).
    pub service_time: SimTime,
    /// Scheduling priority; lower numbers are more important.
    pub priority: i32,
}

/// A structural problem in a workload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkloadError {
    /// Two jobs share an id.
    #[error("job id {id} appears more than once")]
    DuplicateId { id: JobId },

    /// Arrival times must be strictly increasing: at most one arrival per
    /// tick, and the list ordered by arrival.
    #[error("job {id} does not arrive strictly after its predecessor")]
    ArrivalOrder { id: JobId },

    /// Service demands must be positive.
    #[error("job {id} has non-positive service time {service}")]
    InvalidService { id: JobId, service: SimTime },
}

/// Parameters for [`Workload::random`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// How many jobs to generate.
    pub jobs: usize,
    /// Chance of an arrival on any given tick (0.0..=1.0).
    pub arrival_probability: f64,
    /// Service times are uniform in `1..=max_service`.
    pub max_service: SimTime,
    /// Priorities are uniform in `0..priority_levels`.
    pub priority_levels: i32,
    /// RNG seed; equal seeds reproduce equal workloads.
    pub seed: u64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            jobs: 100,
            arrival_probability: 0.3,
            max_service: 20,
            priority_levels: 10,
            seed: 0,
        }
    }
}

/// A full arrival plan, ordered by arrival time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    /// Jobs in arrival order.
    pub jobs: Vec<JobSpec>,
}

impl Workload {
    /// Creates an empty workload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one job (builder style).
    pub fn with_job(
        mut self,
        id: JobId,
        arrival_time: SimTime,
        service_time: SimTime,
        priority: i32,
    ) -> Self {
        self.jobs.push(JobSpec {
            id,
            arrival_time,
            service_time,
            priority,
        });
        self
    }

    /// Generates a stochastic workload.
    ///
    /// Arrivals follow a Bernoulli process: every tick flips a coin with the
    /// configured probability, so at most one job arrives per tick and
    /// arrival times come out unique, which the tie-breaking in the engine's
    /// comparators relies on. Service and priority are uniform. The
    /// same config always produces the same workload; a non-positive
    /// arrival probability produces an empty one.
    pub fn random(config: &WorkloadConfig) -> Self {
        if config.jobs == 0 || !(config.arrival_probability > 0.0) {
            return Self::new();
        }
        let mut rng = StdRng::seed_from_u64(config.seed);
        let max_service = config.max_service.max(1);
        let priority_levels = config.priority_levels.max(1);

        let mut jobs = Vec::with_capacity(config.jobs);
        let mut tick: SimTime = 0;
        while jobs.len() < config.jobs {
            if rng.random::<f64>() < config.arrival_probability {
                jobs.push(JobSpec {
                    id: jobs.len() as JobId,
                    arrival_time: tick,
                    service_time: rng.random_range(1..=max_service),
                    priority: rng.random_range(0..priority_levels),
                });
            }
            tick += 1;
        }
        Self { jobs }
    }

    /// Number of jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether there are no jobs.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Total service across all jobs.
    pub fn total_service(&self) -> SimTime {
        self.jobs.iter().map(|job| job.service_time).sum()
    }

    /// Checks the structural rules a run depends on.
    ///
    /// Collects every problem rather than stopping at the first: duplicate
    /// ids, arrival times out of order or colliding, and non-positive
    /// service demands.
    pub fn validate(&self) -> Result<(), Vec<WorkloadError>> {
        let mut problems = Vec::new();
        let mut seen = HashSet::new();
        let mut last_arrival: Option<SimTime> = None;

        for job in &self.jobs {
            if !seen.insert(job.id) {
                problems.push(WorkloadError::DuplicateId { id: job.id });
            }
            if last_arrival.is_some_and(|last| job.arrival_time <= last) {
                problems.push(WorkloadError::ArrivalOrder { id: job.id });
            }
            last_arrival = Some(job.arrival_time);
            if job.service_time <= 0 {
                problems.push(WorkloadError::InvalidService {
                    id: job.id,
                    service: job.service_time,
                });
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }
}
