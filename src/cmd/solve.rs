use crate::reports::{self, OutputFormat};
use clap::Args;
use teamforge::config::Config;
use teamforge::optimizer::{Optimizer, OptimizerOptions};
use teamforge::partition::PartitionState;
use teamforge::population::loader;
use teamforge::TfResult;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct SolveArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(short, long)]
    pub input: String,

    /// Write the input table with a trailing `group` column
    #[arg(short, long)]
    pub output: Option<String>,

    /// Resume from an existing assignment stored in this column
    #[arg(long)]
    pub group_column: Option<String>,

    #[arg(long, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

pub fn run(args: &SolveArgs, config: &Config) -> TfResult<()> {
    let table = loader::load_table(&args.input)?;
    let mut state = PartitionState::from_config(&table, config)?;

    if let Some(col) = &args.group_column {
        state.assign(loader::parse_group_column(&table, col)?)?;
        info!("🧩 Resuming from column '{}': sizes {:?}", col, state.group_sizes());
    }

    let sizes = if state.is_initialized() {
        state.group_sizes()
    } else {
        config.search.resolve_group_sizes(state.len())?
    };

    if !config.search.skip_shuffle {
        state.shuffle(config.search.effective_shuffle_seed());
    }

    info!(
        "🔥 Solving {} entities into {} groups for {} iterations",
        state.len(),
        sizes.len(),
        config.search.iterations
    );

    let mut optimizer = Optimizer::new(OptimizerOptions::from(config));
    let summary = optimizer.solve(&mut state, &sizes, config.search.iterations)?;

    reports::render_solution(&state, Some(&summary), args.format)?;

    if let Some(path) = &args.output {
        let out = loader::with_assignment(&table, &state)?;
        loader::save_table(&out, path)?;
    }
    Ok(())
}
