//! Run manifest written next to the generated artifacts

use std::path::{Path, PathBuf};

use color_eyre::eyre::{WrapErr, eyre};
use serde::{Deserialize, Serialize};
use sweepgen_core::config::SweepConfig;
use sweepgen_core::io::atomic_write;
use sweepgen_core::pipeline::SweepReport;

pub const MANIFEST_FILE_NAME: &str = "manifest.yaml";

/// Record of what a run produced and with which settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub generated_at: jiff::Timestamp,
    pub target: String,
    pub tuples: usize,
    pub redundant_runs: u32,
    pub commands: usize,
    pub requested_batches: usize,
    pub commands_per_file: usize,
    pub batches: Vec<String>,
    pub launchers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_collisions: Vec<String>,
}

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .filter_map(|p| p.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect()
}

impl Manifest {
    pub fn from_report(config: &SweepConfig, report: &SweepReport, generated_at: jiff::Timestamp) -> Self {
        let plan = &report.plan;
        Self {
            generated_at,
            target: config.target.name().to_string(),
            tuples: plan.tuple_count,
            redundant_runs: plan.redundant_runs,
            commands: plan.command_count,
            requested_batches: plan.requested_batches,
            commands_per_file: plan.per_file,
            batches: file_names(&report.batch_files),
            launchers: file_names(&report.launcher_files),
            rng_seed: config.rng_seed,
            key_collisions: plan.collisions.iter().map(|c| c.key.clone()).collect(),
        }
    }

    /// Write `manifest.yaml` into `out_dir`
    pub fn write(&self, out_dir: &Path) -> color_eyre::Result<PathBuf> {
        let yaml = serde_saphyr::to_string(self)
            .map_err(|e| eyre!("failed to serialize manifest: {e}"))?;
        let path = out_dir.join(MANIFEST_FILE_NAME);
        atomic_write(&path, &yaml)
            .wrap_err_with(|| format!("failed to write manifest {}", path.display()))?;
        Ok(path)
    }
}
