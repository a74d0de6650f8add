//! Sweep pipeline
//!
//! expand → replicate → render → (shuffle) → pool file → partition → batch
//! files → launchers → compile script → queue script → cleanup.
//!
//! All configuration checks run before the first file is written. After
//! that, any filesystem failure aborts the run and leaves whatever was
//! already written in place; there is no rollback and no retry.

use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::StdRng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::SweepConfig;
use crate::error::{ConfigError, FilesystemError, Stage, SweepError};
use crate::expand::{KeyCollision, expand, find_key_collisions, replicate};
use crate::io::{create_dir, remove_file, write_artifact};
use crate::launcher::LauncherTemplate;
use crate::model::{Command, ParameterTuple};
use crate::partition::{Batch, partition, per_file_count, realized_batch_count, shuffle_commands};
use crate::render::CommandRenderer;
use crate::scripts::{compile_script, queue_script};

/// Counts a run will produce, computed without touching the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepPlan {
    pub tuple_count: usize,
    pub redundant_runs: u32,
    pub command_count: usize,
    pub requested_batches: usize,
    pub per_file: usize,
    pub realized_batches: usize,
    pub collisions: Vec<KeyCollision>,
}

/// `tuples * redundant_runs`, refusing counts that overflow `usize`
pub(crate) fn command_count(tuples: usize, redundant_runs: u32) -> Result<usize, ConfigError> {
    usize::try_from(redundant_runs)
        .ok()
        .and_then(|runs| tuples.checked_mul(runs))
        .ok_or(ConfigError::SweepTooLarge)
}

impl SweepPlan {
    fn new(
        config: &SweepConfig,
        tuples: &[ParameterTuple],
        collisions: Vec<KeyCollision>,
    ) -> Result<Self, ConfigError> {
        let redundant_runs = config.redundant_runs();
        let command_count = command_count(tuples.len(), redundant_runs)?;
        let requested_batches = config.file_count();
        Ok(Self {
            tuple_count: tuples.len(),
            redundant_runs,
            command_count,
            requested_batches,
            per_file: per_file_count(command_count, requested_batches),
            realized_batches: realized_batch_count(command_count, requested_batches),
            collisions,
        })
    }
}

/// Everything a finished run wrote
#[derive(Debug, Clone)]
pub struct SweepReport {
    pub plan: SweepPlan,
    pub out_dir: PathBuf,
    pub batch_files: Vec<PathBuf>,
    pub launcher_files: Vec<PathBuf>,
    pub compile_script: PathBuf,
    pub queue_script: PathBuf,
    /// Present only when the intermediate pool file was kept
    pub pool_file: Option<PathBuf>,
}

/// Validate the config and compute the run's counts
pub fn plan_sweep(config: &SweepConfig) -> Result<SweepPlan, ConfigError> {
    config.validate()?;
    let tuples = expand(&config.grid)?;
    let collisions = check_keys(config, &tuples)?;
    SweepPlan::new(config, &tuples, collisions)
}

fn check_keys(
    config: &SweepConfig,
    tuples: &[ParameterTuple],
) -> Result<Vec<KeyCollision>, ConfigError> {
    let collisions = find_key_collisions(tuples);

    for collision in &collisions {
        tracing::warn!(
            key = %collision.key,
            count = collision.count,
            "distinct parameter tuples share an output key; their results will be mixed"
        );
    }

    if config.strict_keys
        && let Some(first) = collisions.first()
    {
        return Err(ConfigError::KeyCollision {
            key: first.key.clone(),
            count: first.count,
        });
    }

    Ok(collisions)
}

/// Render the full command pool for the given tuples.
///
/// One generator drives both per-command seeds and the optional shuffle, so a
/// fixed `rng_seed` reproduces the pool exactly.
pub fn generate_commands(config: &SweepConfig, tuples: &[ParameterTuple]) -> Vec<Command> {
    let mut rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let pairs = replicate(tuples, config.redundant_runs(), config.replicate_order);
    let mut commands = CommandRenderer::with_rng(config.render_config(), &mut rng).render_all(&pairs);

    if config.shuffle {
        shuffle_commands(&mut commands, &mut rng);
    }

    commands
}

fn pool_contents(commands: &[Command]) -> String {
    let mut out = String::with_capacity(commands.iter().map(|c| c.line.len() + 1).sum());
    for command in commands {
        out.push_str(&command.line);
        out.push('\n');
    }
    out
}

/// Write every batch file. Partitioning is already fixed, so write order
/// does not matter.
fn write_batches(
    batches: &[Batch],
    out_dir: &Path,
    prefix: &str,
) -> Result<Vec<PathBuf>, FilesystemError> {
    let write = |batch: &Batch| -> Result<PathBuf, FilesystemError> {
        let path = out_dir.join(batch.file_name(prefix));
        write_artifact(Stage::Batches, &path, &batch.contents())?;
        Ok(path)
    };

    #[cfg(feature = "parallel")]
    let written = batches.par_iter().map(write).collect();

    #[cfg(not(feature = "parallel"))]
    let written = batches.iter().map(write).collect();

    written
}

/// Run the whole pipeline into `out_dir`.
///
/// Without a template the built-in SLURM launcher is used, keyed on the batch
/// prefix so each launcher's job file is its own batch file.
pub fn run_sweep(
    config: &SweepConfig,
    out_dir: &Path,
    template: Option<&LauncherTemplate>,
) -> Result<SweepReport, SweepError> {
    config.validate()?;

    let default_template;
    let template = match template {
        Some(template) => {
            if template.placeholder() != config.files.batch_prefix {
                tracing::warn!(
                    placeholder = template.placeholder(),
                    batch_prefix = %config.files.batch_prefix,
                    "launcher placeholder differs from the batch prefix; launchers will not name their batch files"
                );
            }
            template
        }
        None => {
            default_template = LauncherTemplate::default_slurm(&config.files.batch_prefix)?;
            &default_template
        }
    };

    let tuples = expand(&config.grid)?;
    let collisions = check_keys(config, &tuples)?;
    let plan = SweepPlan::new(config, &tuples, collisions)?;

    tracing::info!(
        target_kind = config.target.name(),
        tuples = plan.tuple_count,
        redundant_runs = plan.redundant_runs,
        commands = plan.command_count,
        requested_batches = plan.requested_batches,
        "starting sweep generation"
    );

    create_dir(Stage::Prepare, out_dir)?;

    let commands = generate_commands(config, &tuples);
    let pool_path = out_dir.join(&config.files.pool_file);
    write_artifact(Stage::Pool, &pool_path, &pool_contents(&commands))?;

    let batches = partition(commands, config.file_count())?;
    let batch_files = write_batches(&batches, out_dir, &config.files.batch_prefix)?;
    tracing::info!(
        realized = batches.len(),
        per_file = plan.per_file,
        "wrote batch files"
    );

    let launchers = template.render_all(&batches);
    let mut launcher_names = Vec::with_capacity(launchers.len());
    let mut launcher_files = Vec::with_capacity(launchers.len());
    for launcher in &launchers {
        let name = launcher.file_name(&config.files.launcher_prefix);
        let path = out_dir.join(&name);
        write_artifact(Stage::Launchers, &path, &launcher.contents)?;
        launcher_names.push(name);
        launcher_files.push(path);
    }
    tracing::info!(count = launcher_files.len(), "wrote launcher scripts");

    let classpath = config.render_config().classpath();
    let compile_path = out_dir.join(&config.files.compile_file);
    write_artifact(
        Stage::CompileScript,
        &compile_path,
        &compile_script(
            &config.compile.compiler,
            classpath.as_deref(),
            &config.compile.sources,
        ),
    )?;

    let queue_path = out_dir.join(&config.files.queue_file);
    write_artifact(
        Stage::QueueScript,
        &queue_path,
        &queue_script(&config.scheduler, &launcher_names),
    )?;

    let pool_file = if config.files.keep_intermediate {
        Some(pool_path)
    } else {
        remove_file(Stage::Cleanup, &pool_path)?;
        None
    };

    tracing::info!(out_dir = %out_dir.display(), "sweep generation complete");

    Ok(SweepReport {
        plan,
        out_dir: out_dir.to_path_buf(),
        batch_files,
        launcher_files,
        compile_script: compile_path,
        queue_script: queue_path,
        pool_file,
    })
}
