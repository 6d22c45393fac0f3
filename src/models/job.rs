//! In-flight job record.
//!
//! A job is one unit of work moving through a simulation run: it arrives,
//! waits, runs on a core (possibly in several separate stretches under a
//! preemptive or time-sliced policy), and finishes. The scheduler owns these
//! records and keeps their bookkeeping current; drivers refer to jobs by id.
//!
//! # Time Representation
//! All times are integer simulation ticks ([`SimTime`]). What one tick means
//! in wall-clock terms is the driver's business; nothing here assumes
//! milliseconds or seconds.

use super::core::CoreId;

/// Identifier for a job, unique among the jobs in flight.
pub type JobId = u64;

/// A point or span on the simulated clock, in ticks.
pub type SimTime = i64;

/// One in-flight job and its scheduling bookkeeping.
///
/// The static part (`id`, `arrival_time`, `service_time`, `priority`) is
/// fixed at arrival; the dynamic part (`remaining_time`, `core`, the start
/// marks) changes as the scheduler dispatches, preempts and accounts work.
/// "Never happened yet" is an absent value, not a sentinel: a job that has
/// not run has no first start, and a waiting job has no core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    id: JobId,
    arrival_time: SimTime,
    service_time: SimTime,
    remaining_time: SimTime,
    priority: i32,
    core: Option<CoreId>,
    first_start: Option<SimTime>,
    last_start: Option<SimTime>,
}

impl Job {
    /// Creates a job as of its arrival: full service outstanding, no core,
    /// never started.
    pub fn new(id: JobId, arrival_time: SimTime, service_time: SimTime, priority: i32) -> Self {
        Self {
            id,
            arrival_time,
            service_time,
            remaining_time: service_time,
            priority,
            core: None,
            first_start: None,
            last_start: None,
        }
    }

    /// Job identifier.
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Tick at which the job entered the system.
    pub fn arrival_time(&self) -> SimTime {
        self.arrival_time
    }

    /// Total service the job demands.
    pub fn service_time(&self) -> SimTime {
        self.service_time
    }

    /// Service still outstanding, current as of the last bookkeeping sync.
    pub fn remaining_time(&self) -> SimTime {
        self.remaining_time
    }

    /// Scheduling priority; lower numbers are more important.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Core currently running this job, if any.
    pub fn core(&self) -> Option<CoreId> {
        self.core
    }

    /// Tick of the first dispatch, if the job ever ran.
    pub fn first_start(&self) -> Option<SimTime> {
        self.first_start
    }

    /// Tick of the most recent dispatch or progress sync.
    pub fn last_start(&self) -> Option<SimTime> {
        self.last_start
    }

    /// Whether the job currently holds a core.
    pub fn is_running(&self) -> bool {
        self.core.is_some()
    }

    /// Puts the job on `core` at `time`.
    pub(crate) fn dispatch(&mut self, core: CoreId, time: SimTime) {
        self.core = Some(core);
        if self.first_start.is_none() {
            self.first_start = Some(time);
        }
        self.last_start = Some(time);
    }

    /// Takes the job off its core at `time`.
    ///
    /// A job evicted at the very tick it was dispatched never actually ran,
    /// so its first-start mark is cleared again; response time will be
    /// measured from whichever dispatch finally sticks.
    pub(crate) fn preempt(&mut self, time: SimTime) {
        self.core = None;
        if self.first_start == Some(time) {
            self.first_start = None;
        }
    }

    /// Charges the service delivered since the last sync and moves the sync
    /// point to `now`. Jobs not currently on a core are left untouched.
    pub(crate) fn account_progress(&mut self, now: SimTime) {
        if let (Some(_), Some(last)) = (self.core, self.last_start) {
            self.remaining_time -= now - last;
            self.last_start = Some(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_job_is_waiting() {
        let job = Job::new(7, 3, 10, 2);
        assert_eq!(job.id(), 7);
        assert_eq!(job.arrival_time(), 3);
        assert_eq!(job.service_time(), 10);
        assert_eq!(job.remaining_time(), 10);
        assert_eq!(job.priority(), 2);
        assert_eq!(job.core(), None);
        assert_eq!(job.first_start(), None);
        assert_eq!(job.last_start(), None);
        assert!(!job.is_running());
    }

    #[test]
    fn test_dispatch_marks_first_start_once() {
        let mut job = Job::new(0, 0, 5, 0);
        job.dispatch(1, 4);
        assert!(job.is_running());
        assert_eq!(job.core(), Some(1));
        assert_eq!(job.first_start(), Some(4));
        assert_eq!(job.last_start(), Some(4));

        job.preempt(9);
        job.dispatch(0, 12);
        assert_eq!(job.first_start(), Some(4)); // only the first dispatch counts
        assert_eq!(job.last_start(), Some(12));
    }

    #[test]
    fn test_preempt_at_dispatch_tick_clears_first_start() {
        let mut job = Job::new(0, 0, 5, 0);
        job.dispatch(0, 6);
        job.preempt(6);
        assert_eq!(job.core(), None);
        assert_eq!(job.first_start(), None);
    }

    #[test]
    fn test_preempt_later_keeps_first_start() {
        let mut job = Job::new(0, 0, 5, 0);
        job.dispatch(0, 2);
        job.preempt(5);
        assert_eq!(job.core(), None);
        assert_eq!(job.first_start(), Some(2));
    }

    #[test]
    fn test_account_progress_charges_elapsed_service() {
        let mut job = Job::new(0, 0, 10, 0);
        job.dispatch(0, 2);
        job.account_progress(6);
        assert_eq!(job.remaining_time(), 6);
        assert_eq!(job.last_start(), Some(6));

        job.account_progress(8);
        assert_eq!(job.remaining_time(), 4);
    }

    #[test]
    fn test_account_progress_ignores_waiting_jobs() {
        let mut job = Job::new(0, 0, 10, 0);
        job.account_progress(5);
        assert_eq!(job.remaining_time(), 10);

        job.dispatch(0, 5);
        job.account_progress(7);
        job.preempt(7);
        job.account_progress(9);
        assert_eq!(job.remaining_time(), 8); // nothing charged while off-core
    }
}
