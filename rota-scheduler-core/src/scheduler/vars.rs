//! Sparse store of the Boolean assignment variables.

use chrono::NaiveDate;
use rota_scheduler_sat::{BoolVar, Model};
use std::collections::HashMap;

/// Variables keyed by (worker index, date, slot index). Only valid triples
/// exist; `get` returns `None` for absent ones and callers skip the
/// constraint instance rather than fail.
#[derive(Debug, Default)]
pub struct VarStore {
    vars: HashMap<(usize, NaiveDate, usize), BoolVar>,
}

impl VarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the variable for the triple, creating it on first use.
    pub fn ensure(
        &mut self,
        model: &mut Model,
        worker: usize,
        date: NaiveDate,
        slot: usize,
        name: impl FnOnce() -> String,
    ) -> BoolVar {
        *self
            .vars
            .entry((worker, date, slot))
            .or_insert_with(|| model.new_bool_var(name()))
    }

    pub fn get(&self, worker: usize, date: NaiveDate, slot: usize) -> Option<BoolVar> {
        self.vars.get(&(worker, date, slot)).copied()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
