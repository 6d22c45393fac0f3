//! The scheduling engine.
//!
//! One [`Scheduler`] value is one simulation run: it owns the ready queue,
//! the core table and the run statistics, and reacts to the three events a
//! driver reports: a job arrived, a job finished, a time slice ran out.
//! Calls are synchronous and single-threaded. The engine decides *where*
//! work runs; the driver decides *when* events happen, and the engine takes
//! the event times it is handed as ground truth.
//!
//! # Event Handling
//!
//! An arrival is ranked into the queue by the policy's comparator. A rank
//! inside the first `cores` positions entitles it to run at once: it takes
//! the lowest-indexed idle core if one exists, and under a preemptive
//! policy it may instead evict the weakest running job. Completions and
//! quantum expiries free a core and hand it to the highest-ranked job
//! currently without one.
//!
//! # References
//! - Silberschatz, Galvin & Gagne, "Operating System Concepts", Ch. 5
//! - Tanenbaum & Bos, "Modern Operating Systems", Ch. 2.4

use std::fmt;
use std::num::NonZeroUsize;

use log::{debug, info};

use crate::error::SchedulerError;
use crate::models::{CoreId, CoreTable, Job, JobId, SimTime};
use crate::policy::Policy;
use crate::queue::ReadyQueue;

use super::metrics::RunMetrics;

/// A multi-core scheduling simulation run.
///
/// Create one per run and drop it when done; there is no shared or global
/// state to reset. The queue holds every in-flight job, waiting and running
/// alike, sorted by the policy's comparator, while the core table tracks
/// occupancy by id.
pub struct Scheduler {
    policy: Policy,
    queue: ReadyQueue<Job>,
    cores: CoreTable,
    metrics: RunMetrics,
}

impl Scheduler {
    /// Creates an idle scheduler with `cores` cores under `policy`.
    pub fn new(cores: NonZeroUsize, policy: Policy) -> Self {
        info!("scheduler up: {} cores, {:?} policy", cores, policy);
        Self {
            policy,
            queue: ReadyQueue::new(policy.comparator()),
            cores: CoreTable::new(cores),
            metrics: RunMetrics::new(),
        }
    }

    /// The active policy.
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Number of simulated cores.
    pub fn cores(&self) -> usize {
        self.cores.cores()
    }

    /// Job currently on `core`, if the core exists and is busy.
    pub fn occupant(&self, core: CoreId) -> Option<JobId> {
        self.cores.occupant(core)
    }

    /// Jobs in flight, waiting and running combined.
    pub fn in_flight(&self) -> usize {
        self.queue.len()
    }

    /// Statistics over the jobs finished so far.
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// Mean waiting time of finished jobs; `0.0` before any finish.
    pub fn average_waiting_time(&self) -> f64 {
        self.metrics.average_waiting_time()
    }

    /// Mean turnaround time of finished jobs; `0.0` before any finish.
    pub fn average_turnaround_time(&self) -> f64 {
        self.metrics.average_turnaround_time()
    }

    /// Mean response time of finished jobs; `0.0` before any finish.
    pub fn average_response_time(&self) -> f64 {
        self.metrics.average_response_time()
    }

    /// Admits a job at `time` and decides where it runs.
    ///
    /// Returns the core the job starts on right away (an idle core, or one
    /// it wins by preemption), or `None` if it has to wait. Under PSJF the
    /// remaining-time bookkeeping of every running job is brought up to date
    /// first, since the comparator ranks against live remaining times.
    ///
    /// # Errors
    /// [`SchedulerError::DuplicateJob`] if `id` is already in flight.
    pub fn job_arrived(
        &mut self,
        id: JobId,
        time: SimTime,
        service_time: SimTime,
        priority: i32,
    ) -> Result<Option<CoreId>, SchedulerError> {
        if self.queue.position(|job| job.id() == id).is_some() {
            return Err(SchedulerError::DuplicateJob { job: id });
        }

        if self.policy == Policy::Psjf {
            for running in self.queue.iter_mut() {
                running.account_progress(time);
            }
        }

        let rank = self.queue.insert(Job::new(id, time, service_time, priority));
        let decision = if rank >= self.cores.cores() {
            // Outside the runnable prefix; nothing to decide.
            None
        } else if let Some(core) = self.cores.first_idle() {
            Some(core)
        } else {
            self.find_victim(id)
        };

        if let Some(core) = decision {
            if let Some(victim) = self.cores.occupant(core) {
                debug!("job {} preempts job {} on core {}", id, victim, core);
                self.evict(victim, core, time);
            }
            self.dispatch_to(id, core, time);
        }
        self.debug_check();
        Ok(decision)
    }

    /// Retires the job on `core` at `time` and promotes the next waiter.
    ///
    /// The finished job's outcome folds into the statistics; the freed core
    /// then goes to the highest-ranked job without one. Returns the promoted
    /// job's id, or `None` if the core goes idle.
    ///
    /// # Errors
    /// [`SchedulerError::InvalidCore`] for a core index out of range;
    /// [`SchedulerError::NotOnCore`] if `job` is not what `core` is running.
    pub fn job_finished(
        &mut self,
        core: CoreId,
        job: JobId,
        time: SimTime,
    ) -> Result<Option<JobId>, SchedulerError> {
        self.check_core(core)?;
        if self.cores.occupant(core) != Some(job) {
            return Err(SchedulerError::NotOnCore { job, core });
        }

        self.cores.release(core);
        let rank = self.queue.position(|stored| stored.id() == job);
        debug_assert!(rank.is_some(), "occupant {job} missing from the queue");
        if let Some(finished) = rank.and_then(|rank| self.queue.remove_at(rank)) {
            self.metrics.record(&finished, time);
        }

        let next = self.promote(core, time);
        self.debug_check();
        Ok(next)
    }

    /// Rotates the job on `core` at the end of its time slice.
    ///
    /// The incumbent goes back into the queue, landing behind every other
    /// job under round-robin's all-equal ordering, and the freed core goes
    /// to the highest-ranked job without one, which is the incumbent itself
    /// when nothing else waits. Returns the id now running on `core`.
    ///
    /// # Errors
    /// [`SchedulerError::NotTimeSliced`] unless the policy slices time;
    /// [`SchedulerError::InvalidCore`] or [`SchedulerError::CoreIdle`] for a
    /// bad or idle core.
    pub fn quantum_expired(
        &mut self,
        core: CoreId,
        time: SimTime,
    ) -> Result<Option<JobId>, SchedulerError> {
        if !self.policy.is_time_sliced() {
            return Err(SchedulerError::NotTimeSliced {
                policy: self.policy,
            });
        }
        self.check_core(core)?;
        let Some(incumbent) = self.cores.occupant(core) else {
            return Err(SchedulerError::CoreIdle { core });
        };

        self.cores.release(core);
        if let Some(rank) = self.queue.position(|job| job.id() == incumbent) {
            if let Some(mut job) = self.queue.remove_at(rank) {
                job.preempt(time);
                self.queue.insert(job); // all-equal comparator: lands at the back
            }
        }
        debug!("quantum over on core {}: job {} requeued", core, incumbent);

        let next = self.promote(core, time);
        self.debug_check();
        Ok(next)
    }

    fn job_mut(&mut self, id: JobId) -> Option<&mut Job> {
        self.queue.iter_mut().find(|job| job.id() == id)
    }

    fn check_core(&self, core: CoreId) -> Result<(), SchedulerError> {
        if self.cores.contains(core) {
            Ok(())
        } else {
            Err(SchedulerError::InvalidCore {
                core,
                cores: self.cores.cores(),
            })
        }
    }

    /// Picks the core whose job the arrival `id` beats, if any.
    ///
    /// Scans cores in ascending order for the strictly largest preemption
    /// key (remaining service under PSJF, priority number under PPRI), so
    /// the lowest-indexed core wins key ties. The arrival takes the core
    /// only when the victim's key strictly exceeds its own; equal keys never
    /// preempt.
    fn find_victim(&self, id: JobId) -> Option<CoreId> {
        let arriving = self.queue.iter().find(|job| job.id() == id)?;
        let new_key = self.policy.preemption_key(arriving)?;

        let mut weakest: Option<(CoreId, i64)> = None;
        for (core, occupant) in self.cores.running() {
            let running = self.queue.iter().find(|job| job.id() == occupant)?;
            let key = self.policy.preemption_key(running)?;
            match weakest {
                Some((_, max)) if key <= max => {}
                _ => weakest = Some((core, key)),
            }
        }
        match weakest {
            Some((core, max)) if max > new_key => Some(core),
            _ => None,
        }
    }

    fn evict(&mut self, id: JobId, core: CoreId, time: SimTime) {
        self.cores.release(core);
        if let Some(job) = self.job_mut(id) {
            job.preempt(time);
        }
    }

    fn dispatch_to(&mut self, id: JobId, core: CoreId, time: SimTime) {
        if let Some(job) = self.job_mut(id) {
            job.dispatch(core, time);
        }
        self.cores.assign(core, id);
    }

    /// Gives `core` to the highest-ranked job not already running.
    fn promote(&mut self, core: CoreId, time: SimTime) -> Option<JobId> {
        let id = self
            .queue
            .iter()
            .find(|job| !job.is_running())
            .map(|job| job.id())?;
        self.dispatch_to(id, core, time);
        Some(id)
    }

    /// Cross-checks queue and core table; free in release builds.
    fn debug_check(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        for (core, id) in self.cores.running() {
            let job = self.queue.iter().find(|job| job.id() == id);
            debug_assert!(
                job.is_some_and(|job| job.core() == Some(core)),
                "core {core} claims job {id} but the job disagrees"
            );
        }
        let running = self.queue.iter().filter(|job| job.is_running()).count();
        debug_assert_eq!(running, self.cores.busy_count(), "occupancy out of sync");
        for job in self.queue.iter() {
            let copies = self
                .queue
                .iter()
                .filter(|other| other.id() == job.id())
                .count();
            debug_assert_eq!(copies, 1, "job {} stored more than once", job.id());
        }
    }
}

impl fmt::Display for Scheduler {
    /// Queue snapshot in rank order: one `id(core)` entry per job, with `-`
    /// standing in for "waiting". Empty queue, empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for job in self.queue.iter() {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            match job.core() {
                Some(core) => write!(f, "{}({})", job.id(), core)?,
                None => write!(f, "{}(-)", job.id())?,
            }
        }
        Ok(())
    }
}
