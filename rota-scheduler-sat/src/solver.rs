//! Exact depth-first branch-and-bound search over a [`Model`].
//!
//! Propagation runs bounds consistency on linear constraints, unit
//! propagation on clauses and at-most-one groups, and interval tightening
//! on min/max equalities; a full assignment surviving propagation is a
//! solution. The incumbent objective prunes the search, so an exhausted
//! search proves optimality or infeasibility.

use crate::model::{Constraint, Literal, Model, Operand, VarId};
use log::debug;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// A solution was found and the search space was exhausted.
    Optimal,
    /// A solution was found but the time limit cut the search short.
    Feasible,
    /// The search space was exhausted without finding any solution.
    Infeasible,
    /// The time limit expired before any solution was found.
    Unknown,
}

/// Search counters, reported alongside the solution.
#[derive(Debug, Clone, Default)]
pub struct SolveStats {
    pub branches: u64,
    pub conflicts: u64,
    pub wall_time: Duration,
}

#[derive(Debug)]
pub struct Solution {
    status: SolveStatus,
    values: Vec<i64>,
    objective: i64,
    stats: SolveStats,
}

impl Solution {
    pub fn status(&self) -> SolveStatus {
        self.status
    }

    pub fn is_feasible(&self) -> bool {
        matches!(self.status, SolveStatus::Optimal | SolveStatus::Feasible)
    }

    /// Value of a variable in the found solution.
    ///
    /// Panics if the solve did not produce a solution.
    pub fn value(&self, var: impl Into<VarId>) -> i64 {
        assert!(self.is_feasible(), "no solution available");
        self.values[var.into().0 as usize]
    }

    pub fn bool_value(&self, var: crate::model::BoolVar) -> bool {
        self.value(var) == 1
    }

    pub fn objective_value(&self) -> i64 {
        self.objective
    }

    pub fn stats(&self) -> &SolveStats {
        &self.stats
    }
}

/// Solver configuration; `solve` is a blocking call.
#[derive(Debug, Default)]
pub struct Solver {
    time_limit: Option<Duration>,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_limit(time_limit: Duration) -> Self {
        Solver { time_limit: Some(time_limit) }
    }

    pub fn solve(&self, model: &Model) -> Solution {
        let started = Instant::now();
        let mut search = Search {
            model,
            domains: model.domains.clone(),
            best: None,
            deadline: self.time_limit.map(|limit| started + limit),
            timed_out: false,
            stats: SolveStats::default(),
        };
        search.dfs();

        let status = match (&search.best, search.timed_out) {
            (Some(_), false) => SolveStatus::Optimal,
            (Some(_), true) => SolveStatus::Feasible,
            (None, false) => SolveStatus::Infeasible,
            (None, true) => SolveStatus::Unknown,
        };
        let (values, objective) = search.best.unwrap_or((Vec::new(), 0));
        let stats = SolveStats { wall_time: started.elapsed(), ..search.stats };
        debug!(
            "search done: status={:?} objective={} branches={} conflicts={} wall_time={:?}",
            status, objective, stats.branches, stats.conflicts, stats.wall_time
        );
        Solution { status, values, objective, stats }
    }
}

struct Search<'m> {
    model: &'m Model,
    domains: Vec<(i64, i64)>,
    best: Option<(Vec<i64>, i64)>,
    deadline: Option<Instant>,
    timed_out: bool,
    stats: SolveStats,
}

impl<'m> Search<'m> {
    fn dfs(&mut self) {
        if self.timed_out || self.deadline.is_some_and(|d| Instant::now() >= d) {
            self.timed_out = true;
            return;
        }
        if !self.propagate() {
            self.stats.conflicts += 1;
            return;
        }
        if let Some((_, best)) = &self.best {
            if self.objective_lower_bound() >= *best {
                return;
            }
        }
        let Some(var) = self.pick_branch_var() else {
            self.record_solution();
            return;
        };
        let (lo, hi) = self.domains[var];
        for value in lo..=hi {
            self.stats.branches += 1;
            let saved = self.domains.clone();
            self.domains[var] = (value, value);
            self.dfs();
            self.domains = saved;
            if self.timed_out {
                return;
            }
        }
    }

    fn pick_branch_var(&self) -> Option<usize> {
        self.domains.iter().position(|(lo, hi)| lo < hi)
    }

    fn record_solution(&mut self) {
        let values: Vec<i64> = self.domains.iter().map(|(lo, _)| *lo).collect();
        let objective = self.model.objective_constant
            + self
                .model
                .objective
                .iter()
                .map(|&(v, c)| c * values[v as usize])
                .sum::<i64>();
        if self.best.as_ref().is_none_or(|(_, best)| objective < *best) {
            self.best = Some((values, objective));
        }
    }

    fn objective_lower_bound(&self) -> i64 {
        self.model.objective_constant
            + self
                .model
                .objective
                .iter()
                .map(|&(v, c)| {
                    let (lo, hi) = self.domains[v as usize];
                    if c >= 0 { c * lo } else { c * hi }
                })
                .sum::<i64>()
    }

    /// Runs all propagators to a fixpoint. Returns false on conflict.
    fn propagate(&mut self) -> bool {
        if self.domains.iter().any(|(lo, hi)| lo > hi) {
            return false;
        }
        loop {
            let mut changed = false;
            for constraint in &self.model.constraints {
                let outcome = match constraint {
                    Constraint::BoolOr(literals) => propagate_clause(&mut self.domains, literals),
                    Constraint::AtMostOne(vars) => propagate_at_most_one(&mut self.domains, vars),
                    Constraint::Linear { terms, lo, hi } => {
                        propagate_linear(&mut self.domains, terms, *lo, *hi)
                    }
                    Constraint::MaxEq { target, operands } => {
                        propagate_max_eq(&mut self.domains, *target, operands)
                    }
                    Constraint::MinEq { target, operands } => {
                        propagate_min_eq(&mut self.domains, *target, operands)
                    }
                };
                match outcome {
                    None => return false,
                    Some(c) => changed |= c,
                }
            }
            if !changed {
                return true;
            }
        }
    }
}

/// Tightens `var` to at least `lo`. None on empty domain.
fn tighten_lo(domains: &mut [(i64, i64)], var: u32, lo: i64) -> Option<bool> {
    let dom = &mut domains[var as usize];
    if lo > dom.1 {
        return None;
    }
    if lo > dom.0 {
        dom.0 = lo;
        return Some(true);
    }
    Some(false)
}

/// Tightens `var` to at most `hi`. None on empty domain.
fn tighten_hi(domains: &mut [(i64, i64)], var: u32, hi: i64) -> Option<bool> {
    let dom = &mut domains[var as usize];
    if hi < dom.0 {
        return None;
    }
    if hi < dom.1 {
        dom.1 = hi;
        return Some(true);
    }
    Some(false)
}

fn propagate_clause(domains: &mut [(i64, i64)], literals: &[Literal]) -> Option<bool> {
    let mut unassigned = None;
    let mut unassigned_count = 0;
    for lit in literals {
        let (lo, hi) = domains[lit.var as usize];
        if lo == hi {
            if (lo == 1) != lit.negated {
                return Some(false); // satisfied
            }
        } else {
            unassigned_count += 1;
            unassigned = Some(*lit);
        }
    }
    match (unassigned_count, unassigned) {
        (0, _) => None,
        (1, Some(lit)) => {
            let value = if lit.negated { 0 } else { 1 };
            domains[lit.var as usize] = (value, value);
            Some(true)
        }
        _ => Some(false),
    }
}

fn propagate_at_most_one(domains: &mut [(i64, i64)], vars: &[u32]) -> Option<bool> {
    let fixed_true = vars.iter().filter(|&&v| domains[v as usize].0 == 1).count();
    if fixed_true > 1 {
        return None;
    }
    let mut changed = false;
    if fixed_true == 1 {
        for &v in vars {
            let (lo, hi) = domains[v as usize];
            if lo == 0 && hi == 1 {
                domains[v as usize] = (0, 0);
                changed = true;
            }
        }
    }
    Some(changed)
}

fn propagate_linear(domains: &mut [(i64, i64)], terms: &[(u32, i64)], lo: i64, hi: i64) -> Option<bool> {
    let mut min_sum = 0;
    let mut max_sum = 0;
    for &(v, c) in terms {
        let (l, h) = domains[v as usize];
        if c >= 0 {
            min_sum += c * l;
            max_sum += c * h;
        } else {
            min_sum += c * h;
            max_sum += c * l;
        }
    }
    if min_sum > hi || max_sum < lo {
        return None;
    }
    let mut changed = false;
    for &(v, c) in terms {
        if c == 0 {
            continue;
        }
        let (l, h) = domains[v as usize];
        let (contrib_min, contrib_max) = if c >= 0 { (c * l, c * h) } else { (c * h, c * l) };
        let others_min = min_sum - contrib_min;
        let others_max = max_sum - contrib_max;
        // c * x must lie in [lo - others_max, hi - others_min].
        let t_lo = lo - others_max;
        let t_hi = hi - others_min;
        let (new_lo, new_hi) = if c > 0 {
            (div_ceil(t_lo, c), div_floor(t_hi, c))
        } else {
            (div_ceil(t_hi, c), div_floor(t_lo, c))
        };
        changed |= tighten_lo(domains, v, new_lo)?;
        changed |= tighten_hi(domains, v, new_hi)?;
    }
    Some(changed)
}

fn operand_bounds(domains: &[(i64, i64)], operand: &Operand) -> (i64, i64) {
    match operand {
        Operand::Var(v) => domains[v.0 as usize],
        Operand::Const(k) => (*k, *k),
    }
}

fn propagate_max_eq(domains: &mut [(i64, i64)], target: u32, operands: &[Operand]) -> Option<bool> {
    let mut max_lo = i64::MIN;
    let mut max_hi = i64::MIN;
    for op in operands {
        let (lo, hi) = operand_bounds(domains, op);
        max_lo = max_lo.max(lo);
        max_hi = max_hi.max(hi);
    }
    let mut changed = false;
    changed |= tighten_lo(domains, target, max_lo)?;
    changed |= tighten_hi(domains, target, max_hi)?;
    let target_hi = domains[target as usize].1;
    for op in operands {
        if let Operand::Var(v) = op {
            changed |= tighten_hi(domains, v.0, target_hi)?;
        } else if let Operand::Const(k) = op {
            if *k > target_hi {
                return None;
            }
        }
    }
    Some(changed)
}

fn propagate_min_eq(domains: &mut [(i64, i64)], target: u32, operands: &[Operand]) -> Option<bool> {
    let mut min_lo = i64::MAX;
    let mut min_hi = i64::MAX;
    for op in operands {
        let (lo, hi) = operand_bounds(domains, op);
        min_lo = min_lo.min(lo);
        min_hi = min_hi.min(hi);
    }
    let mut changed = false;
    changed |= tighten_lo(domains, target, min_lo)?;
    changed |= tighten_hi(domains, target, min_hi)?;
    let target_lo = domains[target as usize].0;
    for op in operands {
        if let Operand::Var(v) = op {
            changed |= tighten_lo(domains, v.0, target_lo)?;
        } else if let Operand::Const(k) = op {
            if *k < target_lo {
                return None;
            }
        }
    }
    Some(changed)
}

fn div_floor(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && (a < 0) != (b < 0) { q - 1 } else { q }
}

fn div_ceil(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && (a < 0) == (b < 0) { q + 1 } else { q }
}
