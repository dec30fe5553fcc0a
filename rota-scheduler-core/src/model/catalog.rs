use crate::error::ModelError;
use crate::model::configuration::Configuration;
use indexmap::{IndexMap, IndexSet};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A worker identity and the set of role ids it is eligible for.
#[derive(Debug, Clone)]
pub struct Worker {
    pub id: Box<str>,
    pub roles: Vec<Box<str>>,
}

impl Worker {
    pub fn new(id: impl Into<Box<str>>, roles: impl IntoIterator<Item = impl Into<Box<str>>>) -> Self {
        Worker {
            id: id.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

/// Which days of a week the off-day slot lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffDayScope {
    Daily,
    Weekend,
    Weekday,
}

/// The rest-day slot: a scope flag and the weekly quota bounds enforced per
/// worker and week bucket.
#[derive(Debug, Clone)]
pub struct OffDay {
    pub id: Box<str>,
    pub scope: OffDayScope,
    pub weekly_min: i64,
    pub weekly_max: i64,
}

/// Canonical identifiers of the model: workers, duty types, leave types, the
/// off-day slot and the duty-by-shift grouping. Worker and slot identifier
/// strings are interned once; model internals operate on the dense indices.
///
/// The worker list is shuffled once at construction with the configured
/// seed, so variable creation order (and with it solver behavior) is
/// reproducible while still avoiding a bias towards the first-listed
/// workers.
#[derive(Debug)]
pub struct Catalog {
    workers: Vec<Worker>,
    worker_index: HashMap<Box<str>, usize>,
    slots: IndexSet<Box<str>>,
    duty_types: Vec<usize>,
    leave_types: Vec<usize>,
    off_day: OffDay,
    off_day_slot: usize,
    duties_by_shift: IndexMap<Box<str>, Vec<usize>>,
}

impl Catalog {
    pub fn new(
        mut workers: Vec<Worker>,
        duty_ids: Vec<Box<str>>,
        leave_ids: Vec<Box<str>>,
        shifts: Vec<(Box<str>, Vec<Box<str>>)>,
        off_day: OffDay,
        config: &Configuration,
    ) -> Result<Self, ModelError> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        workers.shuffle(&mut rng);

        let worker_index = workers
            .iter()
            .enumerate()
            .map(|(i, w)| (w.id.clone(), i))
            .collect();

        let mut slots = IndexSet::new();
        let duty_types: Vec<usize> = duty_ids.into_iter().map(|id| slots.insert_full(id).0).collect();
        let leave_types: Vec<usize> = leave_ids.into_iter().map(|id| slots.insert_full(id).0).collect();
        let off_day_slot = slots.insert_full(off_day.id.clone()).0;

        let mut duties_by_shift = IndexMap::new();
        for (shift_id, members) in shifts {
            let mut resolved = Vec::with_capacity(members.len());
            for member in members {
                let slot = slots
                    .get_index_of(member.as_ref())
                    .ok_or_else(|| ModelError::UnknownSlot(member.clone()))?;
                resolved.push(slot);
            }
            duties_by_shift.insert(shift_id, resolved);
        }

        Ok(Catalog {
            workers,
            worker_index,
            slots,
            duty_types,
            leave_types,
            off_day,
            off_day_slot,
            duties_by_shift,
        })
    }

    /// Appends synthetic workers holding every given role, to absorb rosters
    /// that would otherwise be infeasible for lack of headcount.
    pub fn add_dummy_workers(&mut self, count: usize, roles: Vec<Box<str>>) {
        for i in 0..count {
            let id: Box<str> = format!("dummy_{}", i + 1).into();
            self.worker_index.insert(id.clone(), self.workers.len());
            self.workers.push(Worker { id, roles: roles.clone() });
        }
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn worker_idx(&self, id: &str) -> Result<usize, ModelError> {
        self.worker_index
            .get(id)
            .copied()
            .ok_or_else(|| ModelError::UnknownWorker(id.into()))
    }

    pub fn worker_id(&self, idx: usize) -> &str {
        &self.workers[idx].id
    }

    pub fn worker_has_role(&self, idx: usize, role: &str) -> bool {
        self.workers[idx].roles.iter().any(|r| r.as_ref() == role)
    }

    pub fn slot_idx(&self, id: &str) -> Result<usize, ModelError> {
        self.slots
            .get_index_of(id)
            .ok_or_else(|| ModelError::UnknownSlot(id.into()))
    }

    pub fn slot_id(&self, idx: usize) -> &str {
        self.slots.get_index(idx).expect("slot index out of range")
    }

    pub fn duty_types(&self) -> &[usize] {
        &self.duty_types
    }

    pub fn leave_types(&self) -> &[usize] {
        &self.leave_types
    }

    pub fn off_day(&self) -> &OffDay {
        &self.off_day
    }

    pub fn off_day_slot(&self) -> usize {
        self.off_day_slot
    }

    /// The member duties of a shift.
    pub fn duties_of_shift(&self, shift: &str) -> Result<&[usize], ModelError> {
        self.duties_by_shift
            .get(shift)
            .map(Vec::as_slice)
            .ok_or_else(|| ModelError::UnknownShift(shift.into()))
    }

    /// All duty types that do not belong to a shift.
    pub fn duties_outside_shift(&self, shift: &str) -> Result<Vec<usize>, ModelError> {
        let members = self.duties_of_shift(shift)?;
        Ok(self
            .duty_types
            .iter()
            .copied()
            .filter(|s| !members.contains(s))
            .collect())
    }
}
