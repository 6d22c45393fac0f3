//! Core occupancy table.
//!
//! Tracks which job, if any, each execution slot is running. The table only
//! stores ids; the job records themselves stay in the ready queue, and the
//! engine keeps the two views consistent (every busy slot names a stored job
//! whose own `core` field points back at the slot).

use std::num::NonZeroUsize;

use super::job::JobId;

/// Index of an execution slot (a simulated CPU core).
pub type CoreId = usize;

/// Fixed-size table of per-core occupancy.
#[derive(Debug, Clone)]
pub struct CoreTable {
    slots: Vec<Option<JobId>>,
}

impl CoreTable {
    /// Creates a table of `cores` idle slots.
    pub fn new(cores: NonZeroUsize) -> Self {
        Self {
            slots: vec![None; cores.get()],
        }
    }

    /// Number of cores.
    pub fn cores(&self) -> usize {
        self.slots.len()
    }

    /// Whether `core` is a valid slot index.
    pub fn contains(&self, core: CoreId) -> bool {
        core < self.slots.len()
    }

    /// Job currently running on `core`; `None` for an idle or unknown slot.
    pub fn occupant(&self, core: CoreId) -> Option<JobId> {
        self.slots.get(core).copied().flatten()
    }

    /// Lowest-indexed idle core, if any.
    pub fn first_idle(&self) -> Option<CoreId> {
        self.slots.iter().position(Option::is_none)
    }

    /// Busy cores and their occupants, in ascending core order.
    pub fn running(&self) -> impl Iterator<Item = (CoreId, JobId)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(core, slot)| slot.map(|job| (core, job)))
    }

    /// Number of busy cores.
    pub fn busy_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Marks `core` as running `job`. The slot must be valid and idle.
    pub(crate) fn assign(&mut self, core: CoreId, job: JobId) {
        debug_assert!(self.slots[core].is_none(), "core {core} already busy");
        debug_assert!(
            !self.slots.contains(&Some(job)),
            "job {job} already on a core"
        );
        self.slots[core] = Some(job);
    }

    /// Marks `core` as idle. The slot must be valid.
    pub(crate) fn release(&mut self, core: CoreId) {
        self.slots[core] = None;
    }
}
