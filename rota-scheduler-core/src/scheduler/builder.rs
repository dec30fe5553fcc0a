//! The policy layer: materializes assignment variables and posts the
//! high-level rostering constraints onto the underlying model.

use crate::error::ModelError;
use crate::model::catalog::{Catalog, OffDayScope};
use crate::model::configuration::{Configuration, ObjectiveMode};
use crate::model::rules::{
    Request, RequestStrategy, RulePeriod, SequenceRule, SlotKind, SumRule, TransitionRule,
};
use crate::model::tables::{DutyTable, PriorTimeslot, RosterOverride, SlotCategory};
use crate::scheduler::calendar::Calendar;
use crate::scheduler::objective::ObjectiveSink;
use crate::scheduler::vars::VarStore;
use crate::scheduler::{sequences, sums, transitions};
use chrono::NaiveDate;
use log::{debug, info};
use rota_scheduler_sat::{BoolVar, LinearExpr, Model, Operand};
use std::collections::HashSet;

/// Objective weight of an affirmed request: satisfying one lowers the
/// objective by 50.
pub const REQUEST_WEIGHT: i64 = -50;

/// A roster model under construction.
///
/// Owns the variables and constraints; catalog, calendar, duty table and
/// configuration are read-only inputs. Building is single-threaded; to run
/// several scenarios, build independent models.
pub struct RosterModel<'a> {
    pub(crate) catalog: &'a Catalog,
    pub(crate) calendar: &'a Calendar,
    pub(crate) duty_table: &'a DutyTable,
    pub(crate) config: &'a Configuration,
    pub(crate) model: Model,
    pub(crate) store: VarStore,
    pub(crate) objective: ObjectiveSink,
    pub(crate) requested: HashSet<(usize, NaiveDate, usize)>,
}

impl<'a> RosterModel<'a> {
    pub fn new(
        catalog: &'a Catalog,
        calendar: &'a Calendar,
        duty_table: &'a DutyTable,
        config: &'a Configuration,
    ) -> Self {
        info!(
            "building roster model: {} workers, {} planning days, {} prior days",
            catalog.worker_count(),
            calendar.planning_days().len(),
            calendar.prior_days().len()
        );
        RosterModel {
            catalog,
            calendar,
            duty_table,
            config,
            model: Model::new(),
            store: VarStore::new(),
            objective: ObjectiveSink::new(),
            requested: HashSet::new(),
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn store(&self) -> &VarStore {
        &self.store
    }

    /// Creates one Boolean per (worker, planning day, valid duty).
    pub fn create_duty_vars(&mut self) -> Result<(), ModelError> {
        let catalog = self.catalog;
        let table = self.duty_table;
        for w in 0..catalog.worker_count() {
            for &d in self.calendar.planning_days() {
                for duty_id in table.duties_on(d) {
                    let slot = catalog.slot_idx(duty_id)?;
                    self.store.ensure(&mut self.model, w, d, slot, || {
                        format!("work_{}_{}_{}", catalog.worker_id(w), d, duty_id)
                    });
                }
            }
        }
        Ok(())
    }

    /// Creates one Boolean per (worker, planning day, valid leave).
    pub fn create_leave_vars(&mut self) -> Result<(), ModelError> {
        let catalog = self.catalog;
        let table = self.duty_table;
        for w in 0..catalog.worker_count() {
            for &d in self.calendar.planning_days() {
                for leave_id in table.leaves_on(d) {
                    let slot = catalog.slot_idx(leave_id)?;
                    self.store.ensure(&mut self.model, w, d, slot, || {
                        format!("work_{}_{}_{}", catalog.worker_id(w), d, leave_id)
                    });
                }
            }
        }
        Ok(())
    }

    /// Creates one Boolean per (worker, off-day date).
    pub fn create_off_day_vars(&mut self) {
        let catalog = self.catalog;
        let slot = catalog.off_day_slot();
        for w in 0..catalog.worker_count() {
            for &d in self.calendar.off_day_dates() {
                self.store.ensure(&mut self.model, w, d, slot, || {
                    format!("work_{}_{}_{}", catalog.worker_id(w), d, catalog.off_day().id)
                });
            }
        }
    }

    /// Each worker holds at most one duty-or-leave slot per day.
    pub fn add_exclusivity(&mut self) -> Result<(), ModelError> {
        info!("constraint: each worker holds at most one slot per day");
        let catalog = self.catalog;
        let table = self.duty_table;
        for w in 0..catalog.worker_count() {
            for &d in self.calendar.planning_days() {
                let mut slots: Vec<BoolVar> = Vec::new();
                for id in table.leaves_on(d).iter().chain(table.duties_on(d)) {
                    let slot = catalog.slot_idx(id)?;
                    if let Some(var) = self.store.get(w, d, slot) {
                        slots.push(var);
                    }
                }
                if slots.len() > 1 {
                    self.model.add_at_most_one(slots);
                }
            }
        }
        Ok(())
    }

    /// Headcount of every duty stays within its staffing bounds. Both
    /// bounds are hard.
    pub fn add_coverage(&mut self) -> Result<(), ModelError> {
        info!("constraint: staffing bounds per duty and day");
        let catalog = self.catalog;
        let table = self.duty_table;
        for &d in self.calendar.planning_days() {
            for row in table.rows_on(d) {
                if row.category != SlotCategory::Duty {
                    continue;
                }
                let slot = catalog.slot_idx(&row.slot_id)?;
                let works: Vec<BoolVar> = (0..catalog.worker_count())
                    .filter_map(|w| self.store.get(w, d, slot))
                    .collect();
                self.model
                    .add_linear(LinearExpr::sum(works), row.min_staff, row.max_staff);
            }
        }
        Ok(())
    }

    /// Workers without the duty's required role never take it.
    pub fn add_role_match(&mut self) -> Result<(), ModelError> {
        info!("constraint: worker roles match duty requirements");
        let catalog = self.catalog;
        let table = self.duty_table;
        for w in 0..catalog.worker_count() {
            for &d in self.calendar.planning_days() {
                for duty_id in table.duties_on(d) {
                    let Some(role) = table.role_on(d, duty_id) else {
                        debug!("slot {duty_id} on {d} carries no role");
                        continue;
                    };
                    if catalog.worker_has_role(w, role) {
                        continue;
                    }
                    let slot = catalog.slot_idx(duty_id)?;
                    if let Some(var) = self.store.get(w, d, slot) {
                        self.model.fix(var, false);
                    }
                }
            }
        }
        Ok(())
    }

    /// Soft variant of the role match: a mismatched assignment stays
    /// possible but charges `cost`. Not part of the default policy.
    pub fn add_role_match_soft(&mut self, cost: i64) -> Result<(), ModelError> {
        let catalog = self.catalog;
        let table = self.duty_table;
        for w in 0..catalog.worker_count() {
            for &d in self.calendar.planning_days() {
                for duty_id in table.duties_on(d) {
                    let Some(role) = table.role_on(d, duty_id) else {
                        continue;
                    };
                    if catalog.worker_has_role(w, role) {
                        continue;
                    }
                    let slot = catalog.slot_idx(duty_id)?;
                    let Some(var) = self.store.get(w, d, slot) else {
                        continue;
                    };
                    let mismatch = self.model.new_bool_var(format!(
                        "role_{}_{}_{duty_id}",
                        catalog.worker_id(w),
                        d
                    ));
                    self.model.add_bool_or([var.negated(), mismatch.lit()]);
                    self.objective.push_bool(mismatch, cost);
                }
            }
        }
        Ok(())
    }

    /// Per worker and week bucket, the number of off days stays within the
    /// weekly quota. The bucket partition follows the off-day scope.
    pub fn add_off_day_quota(&mut self) {
        info!("constraint: weekly off-day quotas");
        let catalog = self.catalog;
        let off = catalog.off_day();
        let slot = catalog.off_day_slot();
        let dates = self.calendar.off_day_dates();
        let buckets: Vec<Vec<NaiveDate>> = match off.scope {
            OffDayScope::Daily => dates.chunks(7).map(<[NaiveDate]>::to_vec).collect(),
            OffDayScope::Weekend => Calendar::weekend_buckets(dates),
            OffDayScope::Weekday => dates.chunks(5).map(<[NaiveDate]>::to_vec).collect(),
        };
        for w in 0..catalog.worker_count() {
            for bucket in &buckets {
                let works: Vec<BoolVar> = bucket
                    .iter()
                    .filter_map(|&d| self.store.get(w, d, slot))
                    .collect();
                if works.is_empty() {
                    continue;
                }
                self.model
                    .add_linear(LinearExpr::sum(works), off.weekly_min, off.weekly_max);
            }
        }
    }

    /// Creates the dense prior-period variables (every duty and leave type
    /// on every prior day) and pins each to its historic value.
    pub fn pin_prior_roster(&mut self, history: &[PriorTimeslot]) -> Result<(), ModelError> {
        let catalog = self.catalog;
        let calendar = self.calendar;
        info!(
            "pinning {} prior timeslots over {} days",
            history.len(),
            calendar.prior_days().len()
        );
        let prior_slots: Vec<usize> = catalog
            .duty_types()
            .iter()
            .chain(catalog.leave_types())
            .copied()
            .collect();
        for w in 0..catalog.worker_count() {
            for &d in calendar.prior_days() {
                for &slot in &prior_slots {
                    let slot_id = catalog.slot_id(slot);
                    self.store.ensure(&mut self.model, w, d, slot, || {
                        format!("work_{}_{}_{}", catalog.worker_id(w), d, slot_id)
                    });
                }
            }
        }

        let mut pinned: HashSet<(usize, NaiveDate, usize)> = HashSet::new();
        for timeslot in history {
            let w = catalog.worker_idx(&timeslot.worker)?;
            let slot = catalog.slot_idx(&timeslot.slot)?;
            if !calendar.is_prior(timeslot.date) {
                debug!("prior timeslot on {} is outside the prior window, ignored", timeslot.date);
                continue;
            }
            pinned.insert((w, timeslot.date, slot));
        }
        for w in 0..catalog.worker_count() {
            for &d in calendar.prior_days() {
                for &slot in &prior_slots {
                    if let Some(var) = self.store.get(w, d, slot) {
                        self.model.fix(var, pinned.contains(&(w, d, slot)));
                    }
                }
            }
        }
        Ok(())
    }

    /// Forces all variables of the override's category to 0 for the
    /// (worker, date) pair.
    pub fn apply_overrides(&mut self, overrides: &[RosterOverride]) -> Result<(), ModelError> {
        for entry in overrides {
            let w = self.catalog.worker_idx(&entry.worker)?;
            let slots = match entry.category {
                SlotCategory::Leave => self.catalog.leave_types().to_vec(),
                SlotCategory::Duty => self.catalog.duty_types().to_vec(),
            };
            for slot in slots {
                if let Some(var) = self.store.get(w, entry.date, slot) {
                    self.model.fix(var, false);
                }
            }
        }
        Ok(())
    }

    fn resolve_rule_slots(&self, slot: &str, kind: SlotKind) -> Result<Vec<usize>, ModelError> {
        match kind {
            SlotKind::Shift => self.catalog.duties_of_shift(slot).map(<[usize]>::to_vec),
            SlotKind::Duty | SlotKind::Leave => Ok(vec![self.catalog.slot_idx(slot)?]),
        }
    }

    /// Bounded totals per worker and period bucket. MONTH rules span the
    /// prior and planning days as one bucket, WEEK rules chunk the same
    /// union by 7 days.
    pub fn apply_sum_rules(&mut self, rules: &[SumRule]) -> Result<(), ModelError> {
        info!("applying {} sum rules", rules.len());
        for rule in rules {
            let duties = self.resolve_rule_slots(&rule.slot, rule.kind)?;
            for w in 0..self.catalog.worker_count() {
                match rule.period {
                    RulePeriod::Month => {
                        self.post_sum_bucket(w, &duties, self.calendar.all_days(), "1_month", rule);
                    }
                    RulePeriod::Week => {
                        let weeks: Vec<&[NaiveDate]> = self.calendar.all_days().chunks(7).collect();
                        for (index, week) in weeks.into_iter().enumerate() {
                            self.post_sum_bucket(w, &duties, week, &index.to_string(), rule);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn post_sum_bucket(
        &mut self,
        w: usize,
        duties: &[usize],
        dates: &[NaiveDate],
        bucket: &str,
        rule: &SumRule,
    ) {
        let mut works: Vec<BoolVar> = Vec::new();
        for &slot in duties {
            for &d in dates {
                if let Some(var) = self.store.get(w, d, slot) {
                    works.push(var);
                }
            }
        }
        let prefix = format!(
            "sum_rule({}, {}, {bucket})",
            self.catalog.worker_id(w),
            rule.slot
        );
        sums::add_soft_sum(&mut self.model, &works, &rule.bounds, &prefix, &mut self.objective);
    }

    /// Bounded contiguous-run lengths per worker over the planning days.
    pub fn apply_sequence_rules(&mut self, rules: &[SequenceRule]) -> Result<(), ModelError> {
        info!("applying {} sequence rules", rules.len());
        for rule in rules {
            let duties = self.resolve_rule_slots(&rule.slot, rule.kind)?;
            for w in 0..self.catalog.worker_count() {
                let mut works: Vec<BoolVar> = Vec::new();
                for &d in self.calendar.planning_days() {
                    for &slot in &duties {
                        if let Some(var) = self.store.get(w, d, slot) {
                            works.push(var);
                        }
                    }
                }
                let prefix = format!(
                    "sequence_rule({}, {})",
                    self.catalog.worker_id(w),
                    rule.slot
                );
                sequences::add_soft_sequence(
                    &mut self.model,
                    &works,
                    &rule.bounds,
                    &prefix,
                    &mut self.objective,
                );
            }
        }
        Ok(())
    }

    /// Pairwise transition rules over the prior and planning days.
    pub fn apply_transition_rules(&mut self, rules: &[TransitionRule]) -> Result<(), ModelError> {
        info!("applying {} transition rules", rules.len());
        for (index, rule) in rules.iter().enumerate() {
            transitions::apply_transition_rule(
                &mut self.model,
                &self.store,
                &mut self.objective,
                self.catalog,
                self.calendar.all_days(),
                rule,
                index,
            )?;
        }
        Ok(())
    }

    /// Materializes user requests: NEGATE as hard exclusions, AFFIRM as
    /// weighted preferences. Shift requests expand to the member duties; an
    /// affirmed shift also excludes every other duty and the off day for
    /// that (worker, day), committing the worker to the requested shift.
    pub fn apply_requests(&mut self, requests: &[Request]) -> Result<(), ModelError> {
        info!("populating {} requests", requests.len());
        for request in requests {
            let w = self.catalog.worker_idx(&request.worker)?;
            match request.kind {
                SlotKind::Shift => self.apply_shift_request(w, request)?,
                SlotKind::Duty | SlotKind::Leave => {
                    let slot = self.catalog.slot_idx(&request.slot)?;
                    let Some(var) = self.store.get(w, request.date, slot) else {
                        debug!(
                            "request ({}, {}, {}) has no variable, skipping",
                            request.worker, request.date, request.slot
                        );
                        continue;
                    };
                    self.requested.insert((w, request.date, slot));
                    match request.strategy {
                        RequestStrategy::Negate => self.model.fix(var, false),
                        RequestStrategy::Affirm => self.objective.push_bool(var, REQUEST_WEIGHT),
                    }
                }
            }
        }
        Ok(())
    }

    fn apply_shift_request(&mut self, w: usize, request: &Request) -> Result<(), ModelError> {
        let d = request.date;
        let duties = self.catalog.duties_of_shift(&request.slot)?.to_vec();
        match request.strategy {
            RequestStrategy::Affirm => {
                let others = self.catalog.duties_outside_shift(&request.slot)?;
                for slot in others {
                    if let Some(var) = self.store.get(w, d, slot) {
                        self.model.fix(var, false);
                    }
                }
                if let Some(var) = self.store.get(w, d, self.catalog.off_day_slot()) {
                    self.model.fix(var, false);
                }
                for slot in duties {
                    if let Some(var) = self.store.get(w, d, slot) {
                        self.requested.insert((w, d, slot));
                        self.objective.push_bool(var, REQUEST_WEIGHT);
                    }
                }
            }
            RequestStrategy::Negate => {
                for slot in duties {
                    if let Some(var) = self.store.get(w, d, slot) {
                        self.model.fix(var, false);
                    }
                }
            }
        }
        Ok(())
    }

    /// Penalizes headcount above each duty's minimum, linearly.
    pub fn add_excess_cover_penalty(&mut self) {
        let penalty = self.config.excess_cover_penalty;
        if penalty <= 0 {
            return;
        }
        let catalog = self.catalog;
        let table = self.duty_table;
        let num_workers = catalog.worker_count() as i64;
        for &d in self.calendar.planning_days() {
            for row in table.rows_on(d) {
                if row.category != SlotCategory::Duty {
                    continue;
                }
                let Ok(slot) = catalog.slot_idx(&row.slot_id) else {
                    continue;
                };
                let works: Vec<BoolVar> = (0..catalog.worker_count())
                    .filter_map(|w| self.store.get(w, d, slot))
                    .collect();
                if works.is_empty() {
                    continue;
                }
                let worked = self.model.new_int_var(
                    row.min_staff,
                    num_workers,
                    format!("worked(day={d}, slot={})", row.slot_id),
                );
                let mut total = LinearExpr::sum(works);
                total.add_term(worked, -1);
                self.model.add_eq(total, 0);
                let excess = self.model.new_int_var(
                    0,
                    (num_workers - row.min_staff).max(0),
                    format!("excess_demand(shift={}, day={d})", row.slot_id),
                );
                // excess == worked - min_staff
                self.model.add_eq(
                    LinearExpr::new().term(excess, 1).term(worked, -1),
                    -row.min_staff,
                );
                self.objective.push_int(excess, penalty);
            }
        }
    }

    /// Per duty type, the per-worker planning totals may differ by at most
    /// one across the workforce.
    pub fn add_fairness(&mut self) {
        info!("constraint: fair allocation per duty type");
        let catalog = self.catalog;
        let num_days = self.calendar.planning_days().len() as i64;
        for &slot in catalog.duty_types() {
            let mut totals = Vec::new();
            for w in 0..catalog.worker_count() {
                let mut works: Vec<BoolVar> = Vec::new();
                for &d in self.calendar.planning_days() {
                    if let Some(var) = self.store.get(w, d, slot) {
                        works.push(var);
                    }
                }
                let total = self.model.new_int_var(
                    0,
                    num_days,
                    format!("sum_of_shifts_{}_{}", catalog.worker_id(w), catalog.slot_id(slot)),
                );
                let mut expr = LinearExpr::sum(works);
                expr.add_term(total, -1);
                self.model.add_eq(expr, 0);
                totals.push(total);
            }
            if totals.len() < 2 {
                continue;
            }
            let min_fair = self.model.new_int_var(
                0,
                num_days,
                format!("min_fair_shift_{}", catalog.slot_id(slot)),
            );
            let max_fair = self.model.new_int_var(
                0,
                num_days,
                format!("max_fair_shift_{}", catalog.slot_id(slot)),
            );
            self.model
                .add_min_equality(min_fair, totals.iter().map(|&t| Operand::Var(t.into())));
            self.model
                .add_max_equality(max_fair, totals.iter().map(|&t| Operand::Var(t.into())));
            self.model
                .add_le(LinearExpr::new().term(max_fair, 1).term(min_fair, -1), 1);
        }
    }

    /// Installs the single minimize directive according to the configured
    /// objective mode.
    pub fn install_objective(&mut self) {
        let expr = match self.config.objective {
            ObjectiveMode::Penalties => self.objective.to_expr(),
            ObjectiveMode::MinimizeOffDays => self.off_day_expr(1),
            ObjectiveMode::MaximizeOffDays => self.off_day_expr(-1),
            ObjectiveMode::MaximizeCover => self.cover_expr(-1),
        };
        self.model.minimize(expr);
    }

    fn off_day_expr(&self, coeff: i64) -> LinearExpr {
        let slot = self.catalog.off_day_slot();
        let mut expr = LinearExpr::new();
        for w in 0..self.catalog.worker_count() {
            for &d in self.calendar.off_day_dates() {
                if let Some(var) = self.store.get(w, d, slot) {
                    expr.add_term(var, coeff);
                }
            }
        }
        expr
    }

    fn cover_expr(&self, coeff: i64) -> LinearExpr {
        let mut expr = LinearExpr::new();
        for &d in self.calendar.planning_days() {
            for duty_id in self.duty_table.duties_on(d) {
                let Ok(slot) = self.catalog.slot_idx(duty_id) else {
                    continue;
                };
                for w in 0..self.catalog.worker_count() {
                    if let Some(var) = self.store.get(w, d, slot) {
                        expr.add_term(var, coeff);
                    }
                }
            }
        }
        expr
    }
}
