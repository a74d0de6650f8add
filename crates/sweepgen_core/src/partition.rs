//! Batch partitioning
//!
//! Splits the command pool into at most `target_file_count` contiguous
//! batches of `ceil(L / F)` commands each. The last batch takes the
//! remainder; batches that would be empty are never produced, so fewer
//! batches than requested come back when the pool is small.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::ConfigError;
use crate::model::Command;

/// Zero-padded batch label shared by batch and launcher file names
pub fn batch_label(index: usize) -> String {
    format!("{index:02}")
}

/// A non-empty, contiguous run of commands written to one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    index: usize,
    commands: Vec<Command>,
}

impl Batch {
    /// 1-based position of the batch
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn label(&self) -> String {
        batch_label(self.index)
    }

    pub fn file_name(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.label())
    }

    /// File contents: one command per line, UNIX newlines
    pub fn contents(&self) -> String {
        let mut out = String::with_capacity(self.commands.iter().map(|c| c.line.len() + 1).sum());
        for command in &self.commands {
            out.push_str(&command.line);
            out.push('\n');
        }
        out
    }
}

/// Commands per non-terminal batch
pub fn per_file_count(total_commands: usize, target_file_count: usize) -> usize {
    if target_file_count == 0 {
        return 0;
    }
    total_commands.div_ceil(target_file_count)
}

/// Number of batches `partition` will realize
pub fn realized_batch_count(total_commands: usize, target_file_count: usize) -> usize {
    match per_file_count(total_commands, target_file_count) {
        0 => 0,
        per_file => total_commands.div_ceil(per_file),
    }
}

/// Distribute commands over at most `target_file_count` batches, in order
pub fn partition(
    commands: Vec<Command>,
    target_file_count: usize,
) -> Result<Vec<Batch>, ConfigError> {
    if target_file_count == 0 {
        return Err(ConfigError::ZeroFileCount);
    }

    let per_file = per_file_count(commands.len(), target_file_count);
    let mut batches = Vec::with_capacity(realized_batch_count(commands.len(), target_file_count));
    let mut pool = commands.into_iter();

    for index in 1..=target_file_count {
        let chunk: Vec<Command> = pool.by_ref().take(per_file).collect();
        if chunk.is_empty() {
            tracing::debug!(
                index,
                target_file_count,
                "command pool exhausted, dropping remaining batches"
            );
            break;
        }
        batches.push(Batch {
            index,
            commands: chunk,
        });
    }

    Ok(batches)
}

/// Shuffle the pool in place before partitioning
pub fn shuffle_commands<R: Rng + ?Sized>(commands: &mut [Command], rng: &mut R) {
    commands.shuffle(rng);
}
