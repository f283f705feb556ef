use super::Optimizer;
use crate::error::TfResult;
use crate::partition::PartitionState;
use crate::scorer::{CostFunction, FairnessCost};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolveSummary {
    pub initial_cost: f64,
    pub final_cost: f64,
    pub steps: usize,
    pub accepted: usize,
}

/// Receives periodic updates during a solve.
/// Returning `false` stops the run before the next step.
pub trait ProgressCallback {
    fn on_progress(&mut self, iteration: usize, cost: f64) -> bool;
}

impl<F> ProgressCallback for F
where
    F: FnMut(usize, f64) -> bool,
{
    fn on_progress(&mut self, iteration: usize, cost: f64) -> bool {
        self(iteration, cost)
    }
}

/// Logs progress through `tracing` and never cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressCallback for LogProgress {
    fn on_progress(&mut self, iteration: usize, cost: f64) -> bool {
        info!("step = {:6}: cost = {:.3}", iteration, cost);
        true
    }
}

impl Optimizer {
    pub fn solve(
        &mut self,
        state: &mut PartitionState,
        group_sizes: &[usize],
        iterations: usize,
    ) -> TfResult<SolveSummary> {
        self.solve_with(state, group_sizes, iterations, &FairnessCost, &mut LogProgress)
    }

    /// Initializes `state` from `group_sizes` unless it already has an
    /// assignment, then runs `iterations` steps. Progress is reported on
    /// every `progress_interval`-th iteration, starting with the first.
    pub fn solve_with<C, P>(
        &mut self,
        state: &mut PartitionState,
        group_sizes: &[usize],
        iterations: usize,
        cost_fn: &C,
        progress: &mut P,
    ) -> TfResult<SolveSummary>
    where
        C: CostFunction + ?Sized,
        P: ProgressCallback + ?Sized,
    {
        if state.is_initialized() {
            debug!("Partition already assigned; ignoring requested group sizes");
        } else {
            state.initialize(group_sizes)?;
        }

        let initial_cost = state.cost_with(cost_fn)?;
        let interval = self.options.progress_interval.max(1);
        let mut summary = SolveSummary {
            initial_cost,
            final_cost: initial_cost,
            steps: 0,
            accepted: 0,
        };

        for i in 0..iterations {
            let outcome = self.step_with(state, cost_fn)?;
            summary.steps += 1;
            if outcome.accepted {
                summary.accepted += 1;
            }
            summary.final_cost = outcome.cost;

            if i % interval == 0 && !progress.on_progress(i, outcome.cost) {
                info!("Solve cancelled after {} steps", summary.steps);
                break;
            }
        }

        debug!(
            "Solve finished: {} steps, {} accepted, cost {:.4} -> {:.4}",
            summary.steps, summary.accepted, summary.initial_cost, summary.final_cost
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::OptimizerOptions;
    use crate::population::{Entity, Population};

    fn state(n: usize) -> PartitionState {
        let entities = (0..n)
            .map(|i| Entity {
                id: format!("p{}", i),
                categorical: vec![i < n / 2],
                continuous: vec![(i * 7 % 13) as f64],
            })
            .collect();
        let pop =
            Population::new("name", vec!["c".into()], vec!["v".into()], entities).unwrap();
        PartitionState::new(pop, vec![], vec![]).unwrap()
    }

    #[test]
    fn test_progress_every_interval() {
        let mut s = state(20);
        let mut opt = Optimizer::new(
            OptimizerOptions::builder()
                .seed(Some(4))
                .progress_interval(10)
                .build(),
        );
        let mut seen = Vec::new();
        let mut record = |i: usize, _cost: f64| {
            seen.push(i);
            true
        };
        let summary = opt
            .solve_with(&mut s, &[10, 10], 35, &FairnessCost, &mut record)
            .unwrap();
        assert_eq!(seen, vec![0, 10, 20, 30]);
        assert_eq!(summary.steps, 35);
    }

    #[test]
    fn test_callback_can_cancel() {
        let mut s = state(20);
        let mut opt = Optimizer::new(
            OptimizerOptions::builder()
                .seed(Some(4))
                .progress_interval(5)
                .build(),
        );
        let mut stop_at_five = |i: usize, _cost: f64| i < 5;
        let summary = opt
            .solve_with(&mut s, &[10, 10], 100, &FairnessCost, &mut stop_at_five)
            .unwrap();
        assert_eq!(summary.steps, 6);
    }

    #[test]
    fn test_existing_assignment_is_kept() {
        let mut s = state(6);
        s.assign(vec![0, 1, 2, 0, 1, 2]).unwrap();
        let mut opt = Optimizer::with_seed(8);
        // Sizes are ignored once an assignment exists, even invalid ones.
        opt.solve(&mut s, &[1], 10).unwrap();
        assert_eq!(s.group_sizes(), vec![2, 2, 2]);
    }

    #[test]
    fn test_zero_iterations_only_initializes() {
        let mut s = state(6);
        let mut opt = Optimizer::with_seed(8);
        let summary = opt.solve(&mut s, &[3, 3], 0).unwrap();
        assert_eq!(summary.steps, 0);
        assert_eq!(summary.initial_cost, summary.final_cost);
        assert_eq!(s.assignment().unwrap(), &[0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn test_summary_cost_matches_state() {
        let mut s = state(20);
        let mut opt = Optimizer::with_seed(12);
        let summary = opt.solve(&mut s, &[5, 5, 10], 300).unwrap();
        assert!(summary.final_cost <= summary.initial_cost);
        assert_eq!(summary.final_cost, s.cost().unwrap());
    }
}
