//! Pairwise day-offset transition rules between dated slot variables.

use crate::error::ModelError;
use crate::model::catalog::Catalog;
use crate::model::rules::{SlotKind, TransitionRule, TransitionStep, TransitionStrategy};
use crate::scheduler::objective::ObjectiveSink;
use crate::scheduler::vars::VarStore;
use chrono::{Duration, NaiveDate};
use log::debug;
use rota_scheduler_sat::Model;

/// A rule resolved against the catalog: the slot sets and day offsets of its
/// first and last steps. Interior steps are ignored by contract.
#[derive(Debug)]
pub(crate) struct ExpandedTransition {
    pub prev_slots: Vec<usize>,
    pub next_slots: Vec<usize>,
    pub prev_offset: i64,
    pub next_offset: i64,
}

pub(crate) fn expand_rule(
    catalog: &Catalog,
    rule: &TransitionRule,
) -> Result<ExpandedTransition, ModelError> {
    let (Some(first), Some(last)) = (rule.sequence.first(), rule.sequence.last()) else {
        return Err(ModelError::EmptyTransitionSequence);
    };
    let expand = |step: &TransitionStep| -> Result<Vec<usize>, ModelError> {
        match step.kind {
            SlotKind::Shift => catalog.duties_of_shift(&step.id).map(<[usize]>::to_vec),
            SlotKind::Duty | SlotKind::Leave => Ok(vec![catalog.slot_idx(&step.id)?]),
        }
    };
    Ok(ExpandedTransition {
        prev_slots: expand(first)?,
        next_slots: expand(last)?,
        prev_offset: first.day,
        next_offset: last.day,
    })
}

/// Posts one rule for every worker, reference date and (prev, next) slot
/// pair. Pairs whose dated variables were never created are skipped.
pub(crate) fn apply_transition_rule(
    model: &mut Model,
    store: &VarStore,
    sink: &mut ObjectiveSink,
    catalog: &Catalog,
    dates: &[NaiveDate],
    rule: &TransitionRule,
    rule_index: usize,
) -> Result<(), ModelError> {
    let expanded = expand_rule(catalog, rule)?;
    let mut skipped = 0u64;
    for worker in 0..catalog.worker_count() {
        for &date in dates {
            let prev_date = date + Duration::days(expanded.prev_offset);
            let next_date = date + Duration::days(expanded.next_offset);
            for &prev_slot in &expanded.prev_slots {
                for &next_slot in &expanded.next_slots {
                    let (Some(prev_var), Some(next_var)) = (
                        store.get(worker, prev_date, prev_slot),
                        store.get(worker, next_date, next_slot),
                    ) else {
                        skipped += 1;
                        continue;
                    };
                    match rule.strategy {
                        TransitionStrategy::Never => {
                            model.add_bool_or([prev_var.negated(), next_var.negated()]);
                        }
                        TransitionStrategy::Always => {
                            model.add_implication(prev_var, next_var);
                        }
                        TransitionStrategy::Min => {
                            let trans_var = model.new_bool_var(format!(
                                "transition(rule={rule_index}, w={}, day={date})",
                                catalog.worker_id(worker)
                            ));
                            model.add_bool_or([
                                prev_var.negated(),
                                next_var.negated(),
                                trans_var.lit(),
                            ]);
                            sink.push_bool(trans_var, rule.cost);
                        }
                        TransitionStrategy::Max => {
                            model.add_implication(prev_var, next_var);
                            let trans_var = model.new_bool_var(format!(
                                "transition(rule={rule_index}, w={}, day={date})",
                                catalog.worker_id(worker)
                            ));
                            sink.push_bool(trans_var, -rule.cost);
                        }
                    }
                }
            }
        }
    }
    if skipped > 0 {
        debug!("transition rule {rule_index}: skipped {skipped} undated pairings");
    }
    Ok(())
}
