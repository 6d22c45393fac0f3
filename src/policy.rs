//! Scheduling disciplines and their job orderings.
//!
//! Each policy is a total order over jobs, expressed as a pure comparator
//! the ready queue sorts by; lower means "runs sooner". Arrival time is the
//! final tie-break wherever the primary key can collide, and arrival times
//! themselves are unique by driver contract, so every ordering below is
//! total in practice.
//!
//! | Policy | Primary key | Preemptive | Time-sliced |
//! |--------|-------------|------------|-------------|
//! | [`Fcfs`](Policy::Fcfs) | arrival order | no | no |
//! | [`Sjf`](Policy::Sjf) | total service | no | no |
//! | [`Psjf`](Policy::Psjf) | remaining service | yes | no |
//! | [`Pri`](Policy::Pri) | priority number | no | no |
//! | [`Ppri`](Policy::Ppri) | priority number | yes | no |
//! | [`Rr`](Policy::Rr) | arrival order | no | yes |
//!
//! `Fcfs` and `Rr` compare every pair equal: the queue's stable-tie rule
//! then keeps pure insertion order, which is FIFO for `Fcfs` and places a
//! requeued incumbent at the back for `Rr`.
//!
//! # References
//! - Silberschatz, Galvin & Gagne, "Operating System Concepts", Ch. 5.3
//! - Arpaci-Dusseau, "Operating Systems: Three Easy Pieces", Ch. 7

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::Job;

/// A CPU scheduling discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Policy {
    /// First-come first-served: run in arrival order, never preempt.
    Fcfs,
    /// Shortest job first: smallest total service next, never preempt.
    Sjf,
    /// Preemptive shortest job first, also known as shortest remaining time
    /// first: an arrival with less remaining service displaces the running
    /// job with the most.
    Psjf,
    /// Priority: numerically lowest priority next, never preempt.
    Pri,
    /// Preemptive priority: an arrival with a numerically lower priority
    /// displaces the running job with the highest number.
    Ppri,
    /// Round-robin: arrival order under time slicing; a job whose quantum
    /// expires requeues at the back.
    Rr,
}

impl Policy {
    /// The comparator the ready queue orders by under this policy.
    pub fn comparator(self) -> fn(&Job, &Job) -> Ordering {
        match self {
            Policy::Fcfs | Policy::Rr => arrival_order,
            Policy::Sjf => by_service,
            Policy::Psjf => by_remaining,
            Policy::Pri | Policy::Ppri => by_priority,
        }
    }

    /// The key preemption compares, when this policy preempts at all.
    ///
    /// An arriving job displaces the running job with the largest key,
    /// provided that key strictly exceeds the arrival's own; equal keys
    /// never preempt.
    pub fn preemption_key(self, job: &Job) -> Option<i64> {
        match self {
            Policy::Psjf => Some(job.remaining_time()),
            Policy::Ppri => Some(i64::from(job.priority())),
            _ => None,
        }
    }

    /// Whether an arriving job may displace a running one.
    pub fn is_preemptive(self) -> bool {
        matches!(self, Policy::Psjf | Policy::Ppri)
    }

    /// Whether jobs run in bounded time slices.
    pub fn is_time_sliced(self) -> bool {
        matches!(self, Policy::Rr)
    }
}

/// FCFS/RR: no reordering at all; stable insertion is the schedule.
fn arrival_order(_a: &Job, _b: &Job) -> Ordering {
    Ordering::Equal
}

/// SJF: ascending total service, arrival breaks ties.
fn by_service(a: &Job, b: &Job) -> Ordering {
    a.service_time()
        .cmp(&b.service_time())
        .then_with(|| a.arrival_time().cmp(&b.arrival_time()))
}

/// PSJF: ascending remaining service, arrival breaks ties.
fn by_remaining(a: &Job, b: &Job) -> Ordering {
    a.remaining_time()
        .cmp(&b.remaining_time())
        .then_with(|| a.arrival_time().cmp(&b.arrival_time()))
}

/// PRI/PPRI: ascending priority number, arrival breaks ties.
fn by_priority(a: &Job, b: &Job) -> Ordering {
    a.priority()
        .cmp(&b.priority())
        .then_with(|| a.arrival_time().cmp(&b.arrival_time()))
}
