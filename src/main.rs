use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use teamforge::config::Config;
use teamforge::TfResult;
use tracing::{error, info};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file; flags given on the command line override it
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Solve(cmd::solve::SolveArgs),
    Stats(cmd::stats::StatsArgs),
    Generate(cmd::generate::GenerateArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("🚀 Initializing TeamForge...");

    let result = match &cli.command {
        Commands::Solve(args) => resolve_config(&cli, &args.config, &matches, "solve")
            .and_then(|config| cmd::solve::run(args, &config)),
        Commands::Stats(args) => resolve_config(&cli, &args.config, &matches, "stats")
            .and_then(|config| cmd::stats::run(args, &config)),
        Commands::Generate(args) => cmd::generate::run(args),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}

/// File config (if any) with explicit CLI flags layered on top.
fn resolve_config(
    cli: &Cli,
    cli_config: &Config,
    matches: &ArgMatches,
    subcommand: &str,
) -> TfResult<Config> {
    let config = match (&cli.config, matches.subcommand_matches(subcommand)) {
        (Some(path), Some(sub_matches)) => {
            info!("⚙️  Loading config from: {}", path);
            let mut file_config = Config::load_from_file(path)?;
            file_config.merge_from_cli(cli_config, sub_matches);
            file_config
        }
        _ => cli_config.clone(),
    };
    config.validate()?;
    Ok(config)
}
