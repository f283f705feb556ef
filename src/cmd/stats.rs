use crate::reports::{self, OutputFormat};
use clap::Args;
use teamforge::config::Config;
use teamforge::consts::GROUP_COLUMN;
use teamforge::partition::PartitionState;
use teamforge::population::loader;
use teamforge::TfResult;

#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(short, long)]
    pub input: String,

    #[arg(long, default_value = GROUP_COLUMN)]
    pub group_column: String,

    #[arg(long, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Scores an assignment that already lives in the table.
pub fn run(args: &StatsArgs, config: &Config) -> TfResult<()> {
    let table = loader::load_table(&args.input)?;
    let mut state = PartitionState::from_config(&table, config)?;
    state.assign(loader::parse_group_column(&table, &args.group_column)?)?;
    reports::render_solution(&state, None, args.format)
}
