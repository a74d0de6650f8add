//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use sweepgen_core::config::Preset;
use sweepgen_core::pipeline::SweepPlan;

#[derive(Parser, Debug)]
#[command(name = "sweepgen")]
#[command(about = "Generate batched simulation commands and launcher scripts for a parameter sweep")]
pub struct Args {
    /// Sweep config file (YAML). A built-in preset is used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Built-in sweep used when no config file is given
    #[arg(short, long, value_enum, default_value_t = PresetArg::Hydrochory)]
    pub preset: PresetArg,

    /// Override the execution target
    #[arg(short, long, value_enum)]
    pub target: Option<TargetArg>,

    /// Directory the batches, launchers and scripts are written to
    #[arg(short, long, default_value = "tmp")]
    pub out_dir: PathBuf,

    /// Launcher template file (default: built-in SLURM launcher)
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Override the number of replicates per tuple
    #[arg(long)]
    pub runs: Option<u32>,

    /// Override the number of batch files (cluster target only)
    #[arg(long)]
    pub files: Option<usize>,

    /// Master seed for per-command seeds and shuffling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Append a random `-seed` to every command
    #[arg(long)]
    pub random_seeds: bool,

    /// Shuffle commands before partitioning
    #[arg(long)]
    pub shuffle: bool,

    /// Keep the intermediate pool file
    #[arg(long)]
    pub keep_intermediate: bool,

    /// Print the counts without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Directory for the log file (default: ~/.sweepgen/)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PresetArg {
    Hydrochory,
    Stochasticity,
    Adjustment,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Hydrochory => Preset::Hydrochory,
            PresetArg::Stochasticity => Preset::Stochasticity,
            PresetArg::Adjustment => Preset::Adjustment,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetArg {
    Local,
    Cluster,
}

pub fn default_log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sweepgen")
}

/// Human-readable summary of a plan
pub fn plan_summary(plan: &SweepPlan) -> String {
    let mut out = format!(
        "{} tuples x {} runs = {} commands\n{} batch files requested, {} realized, {} commands per file\n",
        plan.tuple_count,
        plan.redundant_runs,
        plan.command_count,
        plan.requested_batches,
        plan.realized_batches,
        plan.per_file,
    );
    for collision in &plan.collisions {
        out.push_str(&format!(
            "warning: {} tuples share output key {}\n",
            collision.count, collision.key
        ));
    }
    out
}
