pub mod mutation;
pub mod runner;

pub use self::runner::{LogProgress, ProgressCallback, SolveSummary};

use crate::config::Config;
use crate::consts::{DEFAULT_MAX_SWAP_ATTEMPTS, PROGRESS_INTERVAL};
use crate::error::{TeamForgeError, TfResult};
use crate::partition::PartitionState;
use crate::scorer::{CostFunction, FairnessCost};
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, TypedBuilder)]
pub struct OptimizerOptions {
    #[builder(default)]
    pub seed: Option<u64>,
    #[builder(default = DEFAULT_MAX_SWAP_ATTEMPTS)]
    pub max_swap_attempts: usize,
    #[builder(default = PROGRESS_INTERVAL)]
    pub progress_interval: usize,
}

impl Default for OptimizerOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl From<&Config> for OptimizerOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            seed: cfg.search.seed,
            max_swap_attempts: cfg.search.max_swap_attempts,
            progress_interval: cfg.search.progress_interval,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Row indices of the proposed swap.
    pub pair: (usize, usize),
    pub accepted: bool,
    pub cost_before: f64,
    pub cost_proposed: f64,
    /// Cost of the live partition after the step.
    pub cost: f64,
}

/// First-improvement hill climber over pairwise swaps.
///
/// Owns its random source, so two optimizers built with the same seed
/// propose the same swaps.
pub struct Optimizer {
    options: OptimizerOptions,
    rng: fastrand::Rng,
}

impl Optimizer {
    pub fn new(options: OptimizerOptions) -> Self {
        let rng = match options.seed {
            Some(s) => fastrand::Rng::with_seed(s),
            None => fastrand::Rng::new(),
        };
        Self { options, rng }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(OptimizerOptions::builder().seed(Some(seed)).build())
    }

    pub fn options(&self) -> &OptimizerOptions {
        &self.options
    }

    pub fn step(&mut self, state: &mut PartitionState) -> TfResult<StepOutcome> {
        self.step_with(state, &FairnessCost)
    }

    /// Proposes one swap between two unfixed entities of different groups
    /// and keeps it only if `cost_fn` strictly decreases. The state is left
    /// untouched on error or rejection.
    pub fn step_with<C: CostFunction + ?Sized>(
        &mut self,
        state: &mut PartitionState,
        cost_fn: &C,
    ) -> TfResult<StepOutcome> {
        let live = state.assignment().ok_or_else(|| {
            TeamForgeError::Precondition("step() called before initialize()".to_string())
        })?;
        if state.group_count() < 2 {
            return Err(TeamForgeError::Precondition(format!(
                "there must be at least two groups in the partition (found {})",
                state.group_count()
            )));
        }

        let (a, b) = mutation::sample_swap_pair(
            &mut self.rng,
            live,
            state.fixed_flags(),
            self.options.max_swap_attempts,
        )?;

        let cost_before = cost_fn.evaluate(&state.view_of(live));
        let mut candidate = live.to_vec();
        candidate.swap(a, b);
        let cost_proposed = cost_fn.evaluate(&state.view_of(&candidate));

        let accepted = cost_proposed < cost_before;
        if accepted {
            state.commit(candidate);
        }

        Ok(StepOutcome {
            pair: (a, b),
            accepted,
            cost_before,
            cost_proposed,
            cost: if accepted { cost_proposed } else { cost_before },
        })
    }
}
