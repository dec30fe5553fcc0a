/*
 * Copyright (c) 2025 Clément GRENNERAT
 *
 * This program is free software: you can redistribute it and/or modify it under the terms of the
 * GNU General Public License as published by the Free Software Foundation, version 3.
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without
 * even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
 * See the GNU General Public License for more details.
 * You should have received a copy of the GNU General Public License along with this program.
 * If not, see https://www.gnu.org/licenses/.
 *
 */

//! The solver driver: assembles the model in policy order, solves it and
//! decodes the solution into a day-indexed schedule and the roster payload.

use crate::error::ModelError;
use crate::model::catalog::Catalog;
use crate::model::configuration::Configuration;
use crate::model::rules::{Request, SequenceRule, SumRule, TransitionRule};
use crate::model::tables::{DutyTable, PriorTimeslot, RosterOverride, RosterRecord, SlotCategory};
use crate::scheduler::builder::RosterModel;
use crate::scheduler::calendar::Calendar;
use chrono::NaiveDate;
use indexmap::IndexMap;
use log::info;
use rota_scheduler_sat::{SolveStatus, Solver};
use std::time::Duration;

/// Everything one roster run consumes.
#[derive(Debug)]
pub struct RosterProblem {
    pub catalog: Catalog,
    pub calendar: Calendar,
    pub duty_table: DutyTable,
    pub requests: Vec<Request>,
    pub transition_rules: Vec<TransitionRule>,
    pub sum_rules: Vec<SumRule>,
    pub sequence_rules: Vec<SequenceRule>,
    pub prior_timeslots: Vec<PriorTimeslot>,
    pub overrides: Vec<RosterOverride>,
}

/// Day-indexed decoded schedule: date, then slot id, then assigned workers.
pub type Schedule = IndexMap<NaiveDate, IndexMap<Box<str>, Vec<Box<str>>>>;

/// Status, decoded schedule and the serializable record array of one solve.
#[derive(Debug)]
pub struct RosterOutcome {
    pub status: Box<str>,
    pub objective: i64,
    pub schedule: Schedule,
    pub records: Vec<RosterRecord>,
}

impl RosterOutcome {
    pub fn is_feasible(&self) -> bool {
        self.status.as_ref() != "INFEASIBLE"
    }

    /// Serializes the record array.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.records)
    }
}

/// Builds the default roster model, solves it and decodes the solution.
///
/// Configuration errors are returned immediately; infeasibility is reported
/// through the outcome status, never as an error.
pub fn schedule_roster(
    problem: &RosterProblem,
    config: &Configuration,
) -> Result<RosterOutcome, ModelError> {
    let mut roster = RosterModel::new(&problem.catalog, &problem.calendar, &problem.duty_table, config);
    roster.create_duty_vars()?;
    roster.create_leave_vars()?;
    roster.create_off_day_vars();
    roster.add_off_day_quota();
    roster.add_exclusivity()?;
    roster.pin_prior_roster(&problem.prior_timeslots)?;
    roster.apply_overrides(&problem.overrides)?;
    roster.add_coverage()?;
    roster.add_role_match()?;
    roster.apply_sequence_rules(&problem.sequence_rules)?;
    roster.apply_sum_rules(&problem.sum_rules)?;
    roster.apply_transition_rules(&problem.transition_rules)?;
    if config.fairness {
        roster.add_fairness();
    }
    roster.apply_requests(&problem.requests)?;
    roster.add_excess_cover_penalty();
    roster.install_objective();
    Ok(solve_and_decode(roster, problem, config))
}

fn solve_and_decode(
    roster: RosterModel<'_>,
    problem: &RosterProblem,
    config: &Configuration,
) -> RosterOutcome {
    let solver = match config.time_limit_ms {
        Some(ms) => Solver::with_time_limit(Duration::from_millis(ms)),
        None => Solver::new(),
    };
    let solution = solver.solve(&roster.model);
    let stats = solution.stats();
    info!(
        "solve statistics: objective={} branches={} conflicts={} wall_time={:?}",
        solution.objective_value(),
        stats.branches,
        stats.conflicts,
        stats.wall_time
    );

    let status: Box<str> = match solution.status() {
        SolveStatus::Optimal => "OPTIMAL",
        SolveStatus::Feasible => "FEASIBLE",
        SolveStatus::Infeasible | SolveStatus::Unknown => "INFEASIBLE",
    }
    .into();
    if !solution.is_feasible() {
        info!("no roster found: {status}");
        return RosterOutcome {
            status,
            objective: 0,
            schedule: Schedule::new(),
            records: Vec::new(),
        };
    }

    let catalog = &problem.catalog;
    let table = &problem.duty_table;
    let mut schedule = Schedule::new();
    for &d in problem.calendar.planning_days() {
        let day = schedule.entry(d).or_default();
        if config.include_leaves {
            for leave_id in table.leaves_on(d) {
                let Ok(slot) = catalog.slot_idx(leave_id) else {
                    continue;
                };
                let workers = assigned_workers(&roster, catalog, d, slot, &solution);
                day.insert(leave_id.clone(), workers);
            }
        }
        for duty_id in table.duties_on(d) {
            let Ok(slot) = catalog.slot_idx(duty_id) else {
                continue;
            };
            let workers = assigned_workers(&roster, catalog, d, slot, &solution);
            day.entry(duty_id.clone()).or_default().extend(workers);
        }
    }

    let mut records = Vec::new();
    for (&d, day_slots) in &schedule {
        for row in table.rows_on(d) {
            if row.category == SlotCategory::Leave && !config.include_leaves {
                continue;
            }
            let Some(workers) = day_slots.get(&row.slot_id) else {
                continue;
            };
            let Ok(slot) = catalog.slot_idx(&row.slot_id) else {
                continue;
            };
            for worker_id in workers {
                let requested = catalog
                    .worker_idx(worker_id)
                    .is_ok_and(|w| roster.requested.contains(&(w, d, slot)));
                // Rows satisfying a request can be filtered out of the
                // payload; the assignment itself stays in the schedule.
                if requested && !config.include_requests {
                    continue;
                }
                let id = problem
                    .requests
                    .iter()
                    .find(|r| r.date == d && r.worker == *worker_id)
                    .and_then(|r| r.id.clone())
                    .unwrap_or_else(|| row.slot_id.clone());
                let date_text: Box<str> = d.format("%Y-%m-%d").to_string().into();
                records.push(RosterRecord {
                    id,
                    start: date_text.clone(),
                    end: date_text,
                    duty_id: row.duty_id.clone(),
                    duty_name: row.duty_name.clone(),
                    role_id: row.role_id.clone(),
                    role_name: row.role_name.clone(),
                    category: row.category,
                    worker_id: worker_id.clone(),
                    requested,
                    leave_id: if config.include_leaves { row.leave_id.clone() } else { None },
                    leave_name: if config.include_leaves { row.leave_name.clone() } else { None },
                });
            }
        }
    }

    RosterOutcome {
        status,
        objective: solution.objective_value(),
        schedule,
        records,
    }
}

fn assigned_workers(
    roster: &RosterModel<'_>,
    catalog: &Catalog,
    date: NaiveDate,
    slot: usize,
    solution: &rota_scheduler_sat::Solution,
) -> Vec<Box<str>> {
    (0..catalog.worker_count())
        .filter(|&w| {
            roster
                .store
                .get(w, date, slot)
                .is_some_and(|var| solution.bool_value(var))
        })
        .map(|w| catalog.worker_id(w).into())
        .collect()
}
