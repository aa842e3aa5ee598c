use clap::Parser;
use env_logger::{Builder, Env};
use log::{error, LevelFilter};
use std::path::Path;
use std::process;

use stpg_with_sa::experiment::{Experiment, RunReport};
use stpg_with_sa::experiment_config::ExperimentConfig;

/// Steiner tree search with simulated annealing
#[derive(Parser, Debug)]
#[clap(about, long_about = None)]
struct Args {
    /// Path to the YAML or RON experiment config
    #[clap(long, short)]
    config: String,

    /// Directory for trajectories, summary and DOT files
    #[clap(long, short)]
    output: Option<String>,

    /// Print execution trace
    #[clap(long)]
    debug: bool,
}

fn init_logger(debug: bool) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    if debug {
        builder.filter_level(LevelFilter::Trace);
    }
    builder.init();
}

fn print_reports(reports: &[RunReport]) {
    println!(
        "{:<24} {:<6} {:>12} {:>12} {:>12} {:>12} {:>10}",
        "instance", "moves", "approx", "initial", "final", "best", "secs"
    );
    for report in reports.iter() {
        println!(
            "{:<24} {:<6} {:>12} {:>12} {:>12} {:>12} {:>10.3}",
            report.instance,
            report.move_family,
            report
                .approximation_cost
                .map_or_else(|| "-".to_string(), |cost| cost.to_string()),
            report.initial_cost,
            report.final_cost,
            report.best_cost,
            report.elapsed_secs
        );
    }
}

fn main() {
    let args = Args::parse();
    init_logger(args.debug);

    let config = match ExperimentConfig::from_path(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    match Experiment::run(&config, args.output.as_deref().map(Path::new)) {
        Ok(reports) => print_reports(&reports),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}
