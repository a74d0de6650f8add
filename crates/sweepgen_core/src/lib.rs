//! Parameter sweep generation library
//!
//! This crate turns a multi-dimensional parameter grid into batches of
//! simulation command lines ready for submission to a cluster scheduler.
//! It supports:
//! - Cartesian expansion of any number of dimensions, crossed with replicates
//! - Command rendering with optional classpath, quiet flag and per-run seeds
//! - Even partitioning of the command pool into a bounded number of files
//! - Launcher script templating, one launcher per batch
//! - Compile and queue helper scripts
//!
//! # Builder DSL
//!
//! ```ignore
//! use sweepgen_core::config::{SweepBuilder, Target};
//! use sweepgen_core::model::Dimension;
//! use sweepgen_core::pipeline::run_sweep;
//!
//! let config = SweepBuilder::new()
//!     .dimension(Dimension::ints("stochasticity", [2]))
//!     .dimension(Dimension::bools("hydrochory", [true, false]))
//!     .dimension(Dimension::floats("implantation", [0.0, 0.1]))
//!     .target(Target::cluster())
//!     .redundant_runs(1)
//!     .file_count(2)
//!     .build()?;
//!
//! let report = run_sweep(&config, Path::new("tmp"), None)?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod expand;
pub mod io;
pub mod launcher;
pub mod partition;
pub mod pipeline;
pub mod render;
pub mod scripts;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{Preset, SweepBuilder, SweepConfig, Target};
pub use error::{ConfigError, FilesystemError, Stage, SweepError};
pub use pipeline::{SweepPlan, SweepReport, plan_sweep, run_sweep};
