use crate::scheduler::objective::ObjectiveSink;
use crate::scheduler::sequences::{add_soft_sequence, negated_bounded_span};
use crate::scheduler::tests::roster_mock::bounds;
use rota_scheduler_sat::{Model, SolveStatus, Solver};

fn fix_pattern(model: &mut Model, works: &[rota_scheduler_sat::BoolVar], pattern: &[bool]) {
    for (&w, &value) in works.iter().zip(pattern) {
        model.fix(w, value);
    }
}

#[test]
fn span_is_bounded_by_its_neighbours() {
    let mut model = Model::new();
    let works: Vec<_> = (0..4).map(|i| model.new_bool_var(format!("w{i}"))).collect();
    // Interior span: left and right borders plus the negated interior.
    assert_eq!(negated_bounded_span(&works, 1, 2).len(), 4);
    // Span at the start of works has no left border.
    assert_eq!(negated_bounded_span(&works, 0, 2).len(), 3);
    // Span covering the whole list has no borders at all.
    assert_eq!(negated_bounded_span(&works, 0, 4).len(), 4);
}

#[test]
fn runs_shorter_than_hard_min_are_forbidden() {
    let mut model = Model::new();
    let works: Vec<_> = (0..4).map(|i| model.new_bool_var(format!("w{i}"))).collect();
    let mut sink = ObjectiveSink::new();
    add_soft_sequence(&mut model, &works, &bounds(2, 2, 0, 4, 4, 0), "seq", &mut sink);
    fix_pattern(&mut model, &works, &[false, true, false, false]);
    let solution = Solver::new().solve(&model);
    assert_eq!(solution.status(), SolveStatus::Infeasible);
}

#[test]
fn runs_at_hard_min_are_allowed() {
    let mut model = Model::new();
    let works: Vec<_> = (0..4).map(|i| model.new_bool_var(format!("w{i}"))).collect();
    let mut sink = ObjectiveSink::new();
    add_soft_sequence(&mut model, &works, &bounds(2, 2, 0, 4, 4, 0), "seq", &mut sink);
    fix_pattern(&mut model, &works, &[false, true, true, false]);
    let solution = Solver::new().solve(&model);
    assert_eq!(solution.status(), SolveStatus::Optimal);
}

#[test]
fn runs_longer_than_hard_max_are_forbidden() {
    let mut model = Model::new();
    let works: Vec<_> = (0..4).map(|i| model.new_bool_var(format!("w{i}"))).collect();
    let mut sink = ObjectiveSink::new();
    add_soft_sequence(&mut model, &works, &bounds(1, 1, 0, 2, 2, 0), "seq", &mut sink);
    fix_pattern(&mut model, &works, &[false, true, true, true]);
    let solution = Solver::new().solve(&model);
    assert_eq!(solution.status(), SolveStatus::Infeasible);
}

#[test]
fn short_runs_inside_the_soft_band_pay_the_min_cost_delta() {
    let mut model = Model::new();
    let works: Vec<_> = (0..4).map(|i| model.new_bool_var(format!("w{i}"))).collect();
    let mut sink = ObjectiveSink::new();
    add_soft_sequence(&mut model, &works, &bounds(1, 3, 4, 4, 4, 0), "seq", &mut sink);
    fix_pattern(&mut model, &works, &[true, false, false, false]);
    model.minimize(sink.to_expr());
    let solution = Solver::new().solve(&model);
    assert_eq!(solution.status(), SolveStatus::Optimal);
    // An isolated run of length 1 against soft_min 3: cost 4 * (3 - 1).
    assert_eq!(solution.objective_value(), 8);
}

#[test]
fn long_runs_inside_the_soft_band_pay_the_max_cost_delta() {
    let mut model = Model::new();
    let works: Vec<_> = (0..3).map(|i| model.new_bool_var(format!("w{i}"))).collect();
    let mut sink = ObjectiveSink::new();
    add_soft_sequence(&mut model, &works, &bounds(1, 1, 0, 1, 3, 5), "seq", &mut sink);
    fix_pattern(&mut model, &works, &[true, true, false]);
    model.minimize(sink.to_expr());
    let solution = Solver::new().solve(&model);
    assert_eq!(solution.status(), SolveStatus::Optimal);
    // A run of length 2 against soft_max 1: cost 5 * (2 - 1).
    assert_eq!(solution.objective_value(), 5);
}

#[test]
fn runs_matching_the_soft_band_cost_nothing() {
    let mut model = Model::new();
    let works: Vec<_> = (0..4).map(|i| model.new_bool_var(format!("w{i}"))).collect();
    let mut sink = ObjectiveSink::new();
    add_soft_sequence(&mut model, &works, &bounds(1, 2, 7, 3, 4, 7), "seq", &mut sink);
    fix_pattern(&mut model, &works, &[false, true, true, false]);
    model.minimize(sink.to_expr());
    let solution = Solver::new().solve(&model);
    assert_eq!(solution.objective_value(), 0);
}
