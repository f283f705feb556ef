mod common;

use common::{approx_eq, toy_state};
use rstest::rstest;
use teamforge::partition::PartitionView;

#[rstest]
#[case::contiguous(vec![0, 0, 1, 1], 1.6)]
#[case::balanced(vec![0, 1, 0, 1], 0.0)]
#[case::extremes_paired(vec![0, 1, 1, 0], 0.4)]
#[case::single_group(vec![0, 0, 0, 0], 0.0)]
fn test_attribute_terms(#[case] groups: Vec<usize>, #[case] expected: f64) {
    let mut state = toy_state(&[], &[]);
    state.assign(groups).unwrap();
    let cost = state.cost().unwrap();
    assert!(approx_eq(cost, expected), "cost {} != {}", cost, expected);
}

#[rstest]
// a,b together: 2^2 in one group, or 1 + 1 when split.
#[case::colocated(vec![0, 0, 1, 1], 4.0)]
#[case::split(vec![0, 1, 0, 1], 2.0)]
fn test_constraint_terms(#[case] groups: Vec<usize>, #[case] squared: f64) {
    let mut state = toy_state(&[&["a", "b"]], &[&["a", "b"]]);
    state.assign(groups).unwrap();
    let b = state.cost_breakdown().unwrap();

    assert!(approx_eq(b.separate, squared));
    assert!(approx_eq(b.together, -squared));
    // The two constraint terms cancel, leaving the attribute terms.
    assert!(approx_eq(b.total, b.categorical + b.continuous));
}

#[test]
fn test_cost_may_be_negative() {
    let mut state = toy_state(&[&["a", "b", "c", "d"]], &[]);
    state.assign(vec![0, 0, 0, 0]).unwrap();
    assert!(approx_eq(state.cost().unwrap(), -16.0));
}

#[test]
fn test_group_costs_sum_to_total() {
    let mut state = toy_state(&[&["a", "c"]], &[&["b", "d"], &["a", "d"]]);
    state.assign(vec![1, 0, 1, 2]).unwrap();

    let total = state.cost().unwrap();
    let summed: f64 = (0..state.group_count())
        .map(|g| state.group_cost(g).unwrap())
        .sum();
    assert!(approx_eq(total, summed));
    assert!(state.group_cost(3).is_err());
}

fn largest_group(view: &PartitionView<'_>) -> f64 {
    view.group_sizes().into_iter().max().unwrap_or(0) as f64
}

#[test]
fn test_custom_cost_function() {
    let mut state = toy_state(&[], &[]);
    state.assign(vec![0, 0, 0, 1]).unwrap();
    assert!(approx_eq(state.cost_with(&largest_group).unwrap(), 3.0));
}

#[test]
fn test_cost_requires_assignment() {
    let state = toy_state(&[], &[]);
    assert!(state.cost().is_err());
    assert!(state.stats().is_err());
}
