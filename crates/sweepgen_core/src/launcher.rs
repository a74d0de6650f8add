//! Launcher script templating
//!
//! A launcher template is an opaque submission script containing a
//! placeholder token. Each realized batch gets its own copy with every
//! occurrence of the token replaced by the token plus the batch label, so
//! `testrun` becomes `testrun07` for batch 7. Nothing else is touched.

use crate::error::ConfigError;
use crate::partition::{Batch, batch_label};

pub const DEFAULT_PLACEHOLDER: &str = "testrun";

/// Submission script template with one placeholder token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherTemplate {
    text: String,
    placeholder: String,
}

impl LauncherTemplate {
    pub fn new(text: impl Into<String>, placeholder: impl Into<String>) -> Result<Self, ConfigError> {
        let text = text.into();
        let placeholder = placeholder.into();

        if placeholder.is_empty() {
            return Err(ConfigError::EmptyPlaceholder);
        }
        if !text.contains(&placeholder) {
            return Err(ConfigError::MissingPlaceholder { placeholder });
        }

        Ok(Self { text, placeholder })
    }

    /// SLURM script driving TACC's `launcher` module over one batch file.
    ///
    /// Pass the batch prefix as `placeholder` so `LAUNCHER_JOB_FILE` resolves
    /// to the batch file with the same label.
    pub fn default_slurm(placeholder: &str) -> Result<Self, ConfigError> {
        let text = format!(
            r#"#!/bin/bash
#SBATCH -J {placeholder}
#SBATCH -o {placeholder}.o%j
#SBATCH -e {placeholder}.e%j
#SBATCH -p normal
#SBATCH -N 1
#SBATCH -n 16
#SBATCH -t 24:00:00

module load launcher
export LAUNCHER_PLUGIN_DIR=$LAUNCHER_DIR/plugins
export LAUNCHER_RMI=SLURM
export LAUNCHER_JOB_FILE={placeholder}

$LAUNCHER_DIR/paramrun
"#
        );
        Self::new(text, placeholder)
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Substitute the batch label into every placeholder occurrence
    pub fn render(&self, batch_index: usize) -> String {
        let replacement = format!("{}{}", self.placeholder, batch_label(batch_index));
        self.text.replace(&self.placeholder, &replacement)
    }

    /// One launcher per realized batch, same index
    pub fn render_all(&self, batches: &[Batch]) -> Vec<LauncherScript> {
        batches
            .iter()
            .map(|batch| LauncherScript {
                index: batch.index(),
                contents: self.render(batch.index()),
            })
            .collect()
    }
}

/// A rendered submission script bound to one batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherScript {
    pub index: usize,
    pub contents: String,
}

impl LauncherScript {
    pub fn label(&self) -> String {
        batch_label(self.index)
    }

    pub fn file_name(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.label())
    }
}
