//! Sweep Builder
//!
//! Fluent construction of a `SweepConfig`. Validation runs in `build`, so a
//! builder that returns `Ok` is safe to hand to the pipeline.
//!
//! # Example
//!
//! ```ignore
//! use sweepgen_core::config::{SweepBuilder, Target};
//! use sweepgen_core::model::Dimension;
//!
//! let config = SweepBuilder::new()
//!     .dimension(Dimension::ints("stochasticity", [2]))
//!     .dimension(Dimension::bools("hydrochory", [true, false]))
//!     .target(Target::cluster())
//!     .redundant_runs(10)
//!     .file_count(4)
//!     .build()?;
//! ```

use super::{Preset, SweepConfig, Target};
use crate::error::ConfigError;
use crate::expand::ReplicateOrder;
use crate::model::{Dimension, ParameterGrid};
use crate::render::SeedMode;

/// Builder for `SweepConfig`
#[derive(Debug, Clone, Default)]
pub struct SweepBuilder {
    config: SweepConfig,
}

impl SweepBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from one of the built-in studies
    #[must_use]
    pub fn preset(preset: Preset) -> Self {
        Self {
            config: SweepConfig::new(preset.grid()),
        }
    }

    // =========================================================================
    // Grid
    // =========================================================================

    #[must_use]
    pub fn grid(mut self, grid: ParameterGrid) -> Self {
        self.config.grid = grid;
        self
    }

    /// Append a dimension; order decides the positional argument it binds to
    #[must_use]
    pub fn dimension(mut self, dimension: Dimension) -> Self {
        self.config.grid.dimensions.push(dimension);
        self
    }

    // =========================================================================
    // Target
    // =========================================================================

    #[must_use]
    pub fn target(mut self, target: Target) -> Self {
        self.config.target = target;
        self
    }

    #[must_use]
    pub fn local(self) -> Self {
        self.target(Target::local())
    }

    #[must_use]
    pub fn cluster(self) -> Self {
        self.target(Target::cluster())
    }

    #[must_use]
    pub fn redundant_runs(mut self, runs: u32) -> Self {
        self.config.target = self.config.target.with_redundant_runs(runs);
        self
    }

    #[must_use]
    pub fn file_count(mut self, count: usize) -> Self {
        self.config.target = self.config.target.with_file_count(count);
        self
    }

    #[must_use]
    pub fn output_root(mut self, root: impl Into<String>) -> Self {
        self.config.target = self.config.target.with_output_root(root);
        self
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    #[must_use]
    pub fn invocation_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.invocation.invocation_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.config.invocation.program = program.into();
        self
    }

    #[must_use]
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.config.invocation.quiet = quiet;
        self
    }

    #[must_use]
    pub fn seed_mode(mut self, mode: SeedMode) -> Self {
        self.config.invocation.seed_mode = mode;
        self
    }

    /// Alias for `seed_mode(SeedMode::Random)`
    #[must_use]
    pub fn random_seeds(self) -> Self {
        self.seed_mode(SeedMode::Random)
    }

    #[must_use]
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.config.rng_seed = Some(seed);
        self
    }

    // =========================================================================
    // Ordering
    // =========================================================================

    #[must_use]
    pub fn replicate_order(mut self, order: ReplicateOrder) -> Self {
        self.config.replicate_order = order;
        self
    }

    #[must_use]
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.config.shuffle = shuffle;
        self
    }

    // =========================================================================
    // Artifacts
    // =========================================================================

    #[must_use]
    pub fn batch_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.files.batch_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn launcher_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.files.launcher_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn keep_intermediate(mut self, keep: bool) -> Self {
        self.config.files.keep_intermediate = keep;
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.config.placeholder = placeholder.into();
        self
    }

    #[must_use]
    pub fn scheduler(mut self, scheduler: impl Into<String>) -> Self {
        self.config.scheduler = scheduler.into();
        self
    }

    #[must_use]
    pub fn compiler(mut self, compiler: impl Into<String>, sources: impl Into<String>) -> Self {
        self.config.compile.compiler = compiler.into();
        self.config.compile.sources = sources.into();
        self
    }

    #[must_use]
    pub fn strict_keys(mut self, strict: bool) -> Self {
        self.config.strict_keys = strict;
        self
    }

    /// Validate and return the finished config
    pub fn build(self) -> Result<SweepConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Return the config without validating it
    #[must_use]
    pub fn build_unchecked(self) -> SweepConfig {
        self.config
    }
}
