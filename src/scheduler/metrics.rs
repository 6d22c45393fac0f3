//! Run statistics.
//!
//! Per-job outcomes fold into three running sums as jobs finish; the three
//! classic averages divide out at query time.
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Waiting | completion - arrival - service |
//! | Turnaround | completion - arrival |
//! | Response | first start - arrival |
//!
//! Sums stay integral; floating point enters only in the final division.
//!
//! # Reference
//! Silberschatz, Galvin & Gagne, "Operating System Concepts", Ch. 5.2:
//! Scheduling Criteria

use crate::models::{Job, SimTime};

/// Running aggregates over finished jobs.
#[derive(Debug, Clone, Default)]
pub struct RunMetrics {
    total_waiting: i64,
    total_turnaround: i64,
    total_response: i64,
    finished: usize,
}

impl RunMetrics {
    /// Fresh aggregates with nothing finished.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one finished job in.
    ///
    /// A job cannot finish without ever holding a core, so its first-start
    /// mark is always present by the time the scheduler gets here.
    pub(crate) fn record(&mut self, job: &Job, completion: SimTime) {
        let first_start = job
            .first_start()
            .expect("a finished job has run at least once");
        self.total_waiting += completion - job.arrival_time() - job.service_time();
        self.total_turnaround += completion - job.arrival_time();
        self.total_response += first_start - job.arrival_time();
        self.finished += 1;
    }

    /// Jobs finished so far.
    pub fn finished(&self) -> usize {
        self.finished
    }

    /// Mean waiting time over finished jobs; `0.0` before any finish.
    pub fn average_waiting_time(&self) -> f64 {
        self.average(self.total_waiting)
    }

    /// Mean turnaround time over finished jobs; `0.0` before any finish.
    pub fn average_turnaround_time(&self) -> f64 {
        self.average(self.total_turnaround)
    }

    /// Mean response time over finished jobs; `0.0` before any finish.
    pub fn average_response_time(&self) -> f64 {
        self.average(self.total_response)
    }

    fn average(&self, total: i64) -> f64 {
        if self.finished == 0 {
            0.0
        } else {
            total as f64 / self.finished as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_finished_job(id: u64, arrival: i64, service: i64, start: i64) -> Job {
        let mut job = Job::new(id, arrival, service, 0);
        job.dispatch(0, start);
        job
    }

    #[test]
    fn test_averages_before_any_finish_are_zero() {
        let metrics = RunMetrics::new();
        assert_eq!(metrics.finished(), 0);
        assert_eq!(metrics.average_waiting_time(), 0.0);
        assert_eq!(metrics.average_turnaround_time(), 0.0);
        assert_eq!(metrics.average_response_time(), 0.0);
    }

    #[test]
    fn test_record_folds_exact_averages() {
        let mut metrics = RunMetrics::new();
        // Ran immediately: no waiting at all.
        metrics.record(&make_finished_job(0, 0, 4, 0), 4);
        // Arrived at 1, started at 4, done at 6.
        metrics.record(&make_finished_job(1, 1, 2, 4), 6);

        assert_eq!(metrics.finished(), 2);
        assert!((metrics.average_waiting_time() - 1.5).abs() < 1e-10); // (0 + 3) / 2
        assert!((metrics.average_turnaround_time() - 4.5).abs() < 1e-10); // (4 + 5) / 2
        assert!((metrics.average_response_time() - 1.5).abs() < 1e-10); // (0 + 3) / 2
    }

    #[test]
    fn test_uninterrupted_job_waits_exactly_its_response() {
        let mut metrics = RunMetrics::new();
        metrics.record(&make_finished_job(0, 2, 5, 9), 14);
        assert!((metrics.average_waiting_time() - 7.0).abs() < 1e-10);
        assert!((metrics.average_response_time() - 7.0).abs() < 1e-10);
        assert!((metrics.average_turnaround_time() - 12.0).abs() < 1e-10);
    }
}
