//! Soft-bounded constraints on contiguous true-runs of a variable list.

use crate::model::rules::SoftBounds;
use crate::scheduler::objective::ObjectiveSink;
use rota_scheduler_sat::{BoolVar, Literal, Model};

/// Filters an isolated sub-sequence of variables assigned to true.
///
/// Extracts the span `[start, start + length)`, negates it, and when there
/// are variables to the left/right of the span surrounds it with them in
/// non-negated form. The returned literals form a clause that is violated
/// exactly when the span is an isolated true-run of this length, correctly
/// bounded by false variables or by the ends of `works`.
pub fn negated_bounded_span(works: &[BoolVar], start: usize, length: usize) -> Vec<Literal> {
    let mut sequence = Vec::with_capacity(length + 2);
    // Left border (start of works, or works[start - 1])
    if start > 0 {
        sequence.push(works[start - 1].lit());
    }
    for i in 0..length {
        sequence.push(works[start + i].negated());
    }
    // Right border (end of works or works[start + length])
    if start + length < works.len() {
        sequence.push(works[start + length].lit());
    }
    sequence
}

/// Sequence constraint on true variables with soft and hard bounds.
///
/// Looks at every maximal contiguous run of variables assigned to true.
/// Runs of length outside `[hard_min, hard_max]` are forbidden; runs inside
/// the hard band but outside `[soft_min, soft_max]` add a penalty term
/// proportional to the delta with the crossed soft bound.
pub fn add_soft_sequence(
    model: &mut Model,
    works: &[BoolVar],
    bounds: &SoftBounds,
    prefix: &str,
    sink: &mut ObjectiveSink,
) {
    if works.is_empty() {
        return;
    }
    let hard_min = bounds.hard_min.max(0) as usize;
    let soft_min = bounds.soft_min.max(0) as usize;
    let soft_max = bounds.soft_max.max(0) as usize;
    let hard_max = bounds.hard_max.max(0) as usize;

    // Forbid runs that are too short.
    for length in 1..hard_min {
        if length > works.len() {
            break;
        }
        for start in 0..=(works.len() - length) {
            model.add_bool_or(negated_bounded_span(works, start, length));
        }
    }

    // Penalize runs that are below the soft limit.
    if bounds.min_cost > 0 {
        for length in hard_min..soft_min {
            if length == 0 || length > works.len() {
                continue;
            }
            for start in 0..=(works.len() - length) {
                let mut span = negated_bounded_span(works, start, length);
                let lit = model
                    .new_bool_var(format!("{prefix}: under_span(start={start}, length={length})"));
                span.push(lit.lit());
                model.add_bool_or(span);
                // The penalty is proportional to the delta with soft_min.
                sink.push_bool(lit, bounds.min_cost * (soft_min - length) as i64);
            }
        }
    }

    // Penalize runs that are above the soft limit.
    if bounds.max_cost > 0 {
        for length in (soft_max + 1)..=hard_max {
            if length > works.len() {
                break;
            }
            for start in 0..=(works.len() - length) {
                let mut span = negated_bounded_span(works, start, length);
                let lit = model
                    .new_bool_var(format!("{prefix}: over_span(start={start}, length={length})"));
                span.push(lit.lit());
                model.add_bool_or(span);
                sink.push_bool(lit, bounds.max_cost * (length - soft_max) as i64);
            }
        }
    }

    // Just forbid any run of true variables with length hard_max + 1.
    if works.len() > hard_max {
        for start in 0..(works.len() - hard_max) {
            model.add_bool_or((start..=start + hard_max).map(|i| works[i].negated()));
        }
    }
}
