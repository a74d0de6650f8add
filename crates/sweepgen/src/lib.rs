//! Command-line front end for the sweep generator
//!
//! Loads a sweep config (YAML file or built-in preset), applies command-line
//! overrides, runs the `sweepgen_core` pipeline and records a manifest of
//! what was written.

pub mod cli;
pub mod logging;
pub mod manifest;
pub mod settings;

pub use cli::{Args, plan_summary};
pub use logging::init_logging;
pub use manifest::Manifest;
pub use settings::{load_template, resolve_config};
