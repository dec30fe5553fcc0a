//! Soft-bounded sum constraints over a worker-scoped variable list.

use crate::model::rules::SoftBounds;
use crate::scheduler::objective::ObjectiveSink;
use log::debug;
use rota_scheduler_sat::{BoolVar, LinearExpr, Model, Operand};

/// Sum constraint with soft and hard bounds.
///
/// Counts the variables of `works` assigned to true. Sums outside
/// `[hard_min, hard_max]` are forbidden. A sum below `soft_min` contributes
/// `min_cost * (soft_min - sum)` to the objective, a sum above `soft_max`
/// contributes `max_cost * (sum - soft_max)`.
pub fn add_soft_sum(
    model: &mut Model,
    works: &[BoolVar],
    bounds: &SoftBounds,
    prefix: &str,
    sink: &mut ObjectiveSink,
) {
    if works.is_empty() {
        debug!("{prefix}: no variables resolved, skipping");
        return;
    }
    let sum_var = model.new_int_var(bounds.hard_min, bounds.hard_max, format!("{prefix}: sum"));
    let mut total = LinearExpr::sum(works.iter().copied());
    total.add_term(sum_var, -1);
    model.add_eq(total, 0);

    // Penalize sums below the soft_min target.
    if bounds.soft_min > bounds.hard_min && bounds.min_cost > 0 {
        let delta = model.new_int_var(
            bounds.soft_min - bounds.hard_max,
            bounds.soft_min - bounds.hard_min,
            format!("{prefix}: under_delta"),
        );
        // delta == soft_min - sum
        model.add_eq(LinearExpr::new().term(delta, 1).term(sum_var, 1), bounds.soft_min);
        let excess = model.new_int_var(
            0,
            bounds.soft_min - bounds.hard_min,
            format!("{prefix}: under_sum"),
        );
        model.add_max_equality(excess, [Operand::Var(delta.into()), Operand::Const(0)]);
        sink.push_int(excess, bounds.min_cost);
    }

    // Penalize sums above the soft_max target.
    if bounds.soft_max < bounds.hard_max && bounds.max_cost > 0 {
        let delta = model.new_int_var(
            bounds.hard_min - bounds.soft_max,
            bounds.hard_max - bounds.soft_max,
            format!("{prefix}: over_delta"),
        );
        // delta == sum - soft_max
        model.add_eq(
            LinearExpr::new().term(delta, 1).term(sum_var, -1),
            -bounds.soft_max,
        );
        let excess = model.new_int_var(
            0,
            bounds.hard_max - bounds.soft_max,
            format!("{prefix}: over_sum"),
        );
        model.add_max_equality(excess, [Operand::Var(delta.into()), Operand::Const(0)]);
        sink.push_int(excess, bounds.max_cost);
    }
}
