use clap::Args;
use std::io;
use teamforge::config::split_list;
use teamforge::population::{loader, synthetic};
use teamforge::TfResult;

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(short = 'n', long)]
    pub count: usize,

    #[arg(long, default_value = "")]
    pub categorical: String,

    #[arg(long, default_value = "")]
    pub continuous: String,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Defaults to stdout
    #[arg(short, long)]
    pub output: Option<String>,
}

pub fn run(args: &GenerateArgs) -> TfResult<()> {
    let mut rng = match args.seed {
        Some(s) => fastrand::Rng::with_seed(s),
        None => fastrand::Rng::new(),
    };
    let table = synthetic::generate(
        &mut rng,
        args.count,
        &split_list(&args.categorical),
        &split_list(&args.continuous),
    );

    match &args.output {
        Some(path) => loader::save_table(&table, path),
        None => loader::write_table(&table, io::stdout().lock()),
    }
}
