//! Sweep configuration
//!
//! `SweepConfig` holds everything a run needs: the parameter grid, the
//! execution target, how commands are rendered and where artifacts go. It is
//! built once per sweep (from YAML or with `SweepBuilder`) and passed by
//! reference into the pipeline; nothing mutates it mid-run.
//!
//! In YAML, grid values are rendered from what the parser sees: `0.0010`
//! arrives as a float and renders as `0.001`, while `"0.0010"` is kept
//! verbatim. Quote values whose exact spelling matters.
//!
//! # Builder DSL
//!
//! ```ignore
//! use sweepgen_core::config::{SweepBuilder, Target};
//! use sweepgen_core::model::Dimension;
//!
//! let config = SweepBuilder::new()
//!     .dimension(Dimension::ints("stochasticity", [2]))
//!     .dimension(Dimension::bools("hydrochory", [true, false]))
//!     .dimension(Dimension::floats("implantation", [0.0005, 0.001]))
//!     .target(Target::cluster().with_file_count(10))
//!     .random_seeds()
//!     .build()?;
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::expand::ReplicateOrder;
use crate::launcher::DEFAULT_PLACEHOLDER;
use crate::model::ParameterGrid;
use crate::render::{RenderConfig, SeedMode};

pub mod builder;
pub mod presets;

pub use builder::SweepBuilder;
pub use presets::Preset;

fn default_local_runs() -> u32 {
    30
}

fn default_cluster_runs() -> u32 {
    300
}

fn default_file_count() -> usize {
    50
}

fn default_output_root() -> String {
    "results/".to_string()
}

fn default_cluster_suffix() -> String {
    ".txt".to_string()
}

fn default_classpath() -> Vec<String> {
    presets::jointvetch_classpath()
}

fn default_true() -> bool {
    true
}

/// Where the generated commands will run.
///
/// The variants carry only the fields that differ between environments; the
/// rendering and partitioning logic is shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Target {
    /// A single shared machine: one batch file, no explicit classpath
    Local {
        #[serde(default = "default_local_runs")]
        redundant_runs: u32,
        #[serde(default = "default_output_root")]
        output_root: String,
        #[serde(default)]
        output_suffix: String,
    },
    /// A batch-scheduled cluster: many batch files, explicit classpath
    Cluster {
        #[serde(default = "default_cluster_runs")]
        redundant_runs: u32,
        #[serde(default = "default_file_count")]
        file_count: usize,
        #[serde(default = "default_classpath")]
        classpath_entries: Vec<String>,
        #[serde(default = "default_output_root")]
        output_root: String,
        #[serde(default = "default_cluster_suffix")]
        output_suffix: String,
    },
}

impl Target {
    #[must_use]
    pub fn local() -> Self {
        Target::Local {
            redundant_runs: default_local_runs(),
            output_root: default_output_root(),
            output_suffix: String::new(),
        }
    }

    #[must_use]
    pub fn cluster() -> Self {
        Target::Cluster {
            redundant_runs: default_cluster_runs(),
            file_count: default_file_count(),
            classpath_entries: default_classpath(),
            output_root: default_output_root(),
            output_suffix: default_cluster_suffix(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Target::Local { .. } => "local",
            Target::Cluster { .. } => "cluster",
        }
    }

    pub fn redundant_runs(&self) -> u32 {
        match self {
            Target::Local { redundant_runs, .. } | Target::Cluster { redundant_runs, .. } => {
                *redundant_runs
            }
        }
    }

    /// Requested batch count; always 1 on a local target
    pub fn file_count(&self) -> usize {
        match self {
            Target::Local { .. } => 1,
            Target::Cluster { file_count, .. } => *file_count,
        }
    }

    pub fn classpath_entries(&self) -> &[String] {
        match self {
            Target::Local { .. } => &[],
            Target::Cluster {
                classpath_entries, ..
            } => classpath_entries,
        }
    }

    pub fn output_root(&self) -> &str {
        match self {
            Target::Local { output_root, .. } | Target::Cluster { output_root, .. } => output_root,
        }
    }

    pub fn output_suffix(&self) -> &str {
        match self {
            Target::Local { output_suffix, .. } | Target::Cluster { output_suffix, .. } => {
                output_suffix
            }
        }
    }

    #[must_use]
    pub fn with_redundant_runs(mut self, runs: u32) -> Self {
        match &mut self {
            Target::Local { redundant_runs, .. } | Target::Cluster { redundant_runs, .. } => {
                *redundant_runs = runs;
            }
        }
        self
    }

    /// Set the requested batch count. Local targets keep their single file.
    #[must_use]
    pub fn with_file_count(mut self, count: usize) -> Self {
        if let Target::Cluster { file_count, .. } = &mut self {
            *file_count = count;
        }
        self
    }

    #[must_use]
    pub fn with_output_root(mut self, root: impl Into<String>) -> Self {
        match &mut self {
            Target::Local { output_root, .. } | Target::Cluster { output_root, .. } => {
                *output_root = root.into();
            }
        }
        self
    }
}

impl Default for Target {
    fn default() -> Self {
        Target::cluster()
    }
}

/// How the simulation program is invoked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Invocation {
    pub invocation_prefix: String,
    pub program: String,
    pub quiet: bool,
    pub seed_mode: SeedMode,
}

impl Default for Invocation {
    fn default() -> Self {
        Self {
            invocation_prefix: "java -Xmx16g".to_string(),
            program: "jointvetch.HoltsCreek".to_string(),
            quiet: default_true(),
            seed_mode: SeedMode::None,
        }
    }
}

/// Names of the files a run produces inside the output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLayout {
    pub batch_prefix: String,
    pub launcher_prefix: String,
    /// Intermediate file holding the whole command pool
    pub pool_file: String,
    pub compile_file: String,
    pub queue_file: String,
    /// Keep the pool file after batches are written
    pub keep_intermediate: bool,
}

impl Default for FileLayout {
    fn default() -> Self {
        Self {
            batch_prefix: DEFAULT_PLACEHOLDER.to_string(),
            launcher_prefix: "launch".to_string(),
            pool_file: "runs.sh".to_string(),
            compile_file: "compile.sh".to_string(),
            queue_file: "submit.sh".to_string(),
            keep_intermediate: false,
        }
    }
}

/// `name` is `prefix` followed by a batch label
fn numbered_by(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

impl FileLayout {
    /// Every file a run writes must get a distinct name: batch and launcher
    /// families may not overlap, and no fixed file may look like a numbered
    /// one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("batch_prefix", &self.batch_prefix),
            ("launcher_prefix", &self.launcher_prefix),
            ("pool_file", &self.pool_file),
            ("compile_file", &self.compile_file),
            ("queue_file", &self.queue_file),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, value)| value.is_empty()) {
            return Err(ConfigError::EmptyFileName { field: *field });
        }

        let clash = |a: &str, b: &str| ConfigError::FileNameClash {
            a: a.to_string(),
            b: b.to_string(),
        };

        let (batch, launcher) = (&self.batch_prefix, &self.launcher_prefix);
        if batch == launcher || numbered_by(batch, launcher) || numbered_by(launcher, batch) {
            return Err(clash(&format!("{batch}NN"), &format!("{launcher}NN")));
        }

        let fixed = [&self.pool_file, &self.compile_file, &self.queue_file];
        for (i, name) in fixed.iter().enumerate() {
            if let Some(other) = fixed[i + 1..].iter().find(|other| *other == name) {
                return Err(clash(name, other));
            }
            for prefix in [batch, launcher] {
                if numbered_by(name, prefix) {
                    return Err(clash(name, &format!("{prefix}NN")));
                }
            }
        }

        Ok(())
    }
}

/// Compiler invocation written to the compile script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileSettings {
    pub compiler: String,
    pub sources: String,
}

impl Default for CompileSettings {
    fn default() -> Self {
        Self {
            compiler: "javac".to_string(),
            sources: "jointvetch/*.java".to_string(),
        }
    }
}

fn default_scheduler() -> String {
    "sbatch".to_string()
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}

/// Complete description of one sweep run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub grid: ParameterGrid,

    #[serde(default)]
    pub target: Target,

    #[serde(default)]
    pub invocation: Invocation,

    #[serde(default)]
    pub replicate_order: ReplicateOrder,

    /// Shuffle the command pool before partitioning
    #[serde(default)]
    pub shuffle: bool,

    /// Master seed for per-command seeds and shuffling; OS entropy when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,

    #[serde(default)]
    pub files: FileLayout,

    #[serde(default)]
    pub compile: CompileSettings,

    /// Command the queue script submits each launcher with
    #[serde(default = "default_scheduler")]
    pub scheduler: String,

    /// Token replaced in a user-supplied launcher template. The built-in
    /// launcher uses `files.batch_prefix` instead.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Refuse to run when distinct tuples share an output key
    #[serde(default)]
    pub strict_keys: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            grid: ParameterGrid::default(),
            target: Target::default(),
            invocation: Invocation::default(),
            replicate_order: ReplicateOrder::default(),
            shuffle: false,
            rng_seed: None,
            files: FileLayout::default(),
            compile: CompileSettings::default(),
            scheduler: default_scheduler(),
            placeholder: default_placeholder(),
            strict_keys: false,
        }
    }
}

impl SweepConfig {
    #[must_use]
    pub fn new(grid: ParameterGrid) -> Self {
        Self {
            grid,
            ..Self::default()
        }
    }

    pub fn redundant_runs(&self) -> u32 {
        self.target.redundant_runs()
    }

    pub fn file_count(&self) -> usize {
        self.target.file_count()
    }

    /// Flatten target and invocation settings into a renderer config
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            invocation_prefix: self.invocation.invocation_prefix.clone(),
            classpath_entries: self.target.classpath_entries().to_vec(),
            program: self.invocation.program.clone(),
            quiet: self.invocation.quiet,
            seed_mode: self.invocation.seed_mode,
            output_root: self.target.output_root().to_string(),
            output_suffix: self.target.output_suffix().to_string(),
        }
    }

    /// Checks that do not depend on the launcher template
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        if self.file_count() == 0 {
            return Err(ConfigError::ZeroFileCount);
        }
        if self.placeholder.is_empty() {
            return Err(ConfigError::EmptyPlaceholder);
        }
        self.files.validate()
    }
}
