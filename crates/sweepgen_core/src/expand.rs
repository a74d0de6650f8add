//! Grid expansion
//!
//! Produces the cartesian product of a `ParameterGrid` in odometer order (the
//! last dimension varies fastest) and crosses it with a replicate count.
//! Every combination is emitted; whether a combination is meaningful to the
//! simulation is not this module's concern.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{ParameterGrid, ParameterTuple, ReplicateIndex};

/// How replicates are interleaved with tuples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplicateOrder {
    /// Replicate 0 of every tuple, then replicate 1 of every tuple, ...
    #[default]
    ReplicateMajor,
    /// All replicates of the first tuple, then all of the second, ...
    TupleMajor,
}

/// Iterator over all index vectors of a grid shape, last dimension fastest
pub struct GridIndices {
    shape: Vec<usize>,
    current: Vec<usize>,
    done: bool,
}

impl GridIndices {
    pub fn new(shape: Vec<usize>) -> Self {
        let done = shape.is_empty() || shape.contains(&0);
        Self {
            current: vec![0; shape.len()],
            shape,
            done,
        }
    }
}

impl Iterator for GridIndices {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current.clone();

        for i in (0..self.shape.len()).rev() {
            self.current[i] += 1;
            if self.current[i] < self.shape[i] {
                break;
            }
            self.current[i] = 0;
            if i == 0 {
                self.done = true;
            }
        }

        Some(result)
    }
}

/// Number of tuples `expand` would produce, `None` on overflow
pub fn tuple_count(grid: &ParameterGrid) -> Option<usize> {
    if grid.dimensions.is_empty() {
        return Some(0);
    }
    grid.dimensions
        .iter()
        .try_fold(1usize, |acc, d| acc.checked_mul(d.len()))
}

/// Full cartesian product of the grid
pub fn expand(grid: &ParameterGrid) -> Result<Vec<ParameterTuple>, ConfigError> {
    grid.validate()?;

    let count = tuple_count(grid).ok_or(ConfigError::SweepTooLarge)?;
    let mut tuples = Vec::with_capacity(count);
    for indices in GridIndices::new(grid.shape()) {
        let values = indices
            .iter()
            .zip(&grid.dimensions)
            .map(|(&idx, dim)| dim.values[idx].clone())
            .collect();
        tuples.push(ParameterTuple::new(values));
    }

    Ok(tuples)
}

/// Cross the expanded tuples with `redundant_runs` replicates
pub fn replicate(
    tuples: &[ParameterTuple],
    redundant_runs: u32,
    order: ReplicateOrder,
) -> Vec<(ParameterTuple, ReplicateIndex)> {
    let mut out = Vec::with_capacity(tuples.len().saturating_mul(redundant_runs as usize));

    match order {
        ReplicateOrder::ReplicateMajor => {
            for run in 0..redundant_runs {
                for tuple in tuples {
                    out.push((tuple.clone(), ReplicateIndex(run)));
                }
            }
        }
        ReplicateOrder::TupleMajor => {
            for tuple in tuples {
                for run in 0..redundant_runs {
                    out.push((tuple.clone(), ReplicateIndex(run)));
                }
            }
        }
    }

    out
}

/// A derived key produced by more than one position of the expansion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCollision {
    pub key: String,
    pub count: usize,
}

/// Keys shared by several tuples, in order of first appearance.
///
/// Tuples sharing a key append their results to the same file, so the
/// outputs of different parameter settings would be mixed.
pub fn find_key_collisions(tuples: &[ParameterTuple]) -> Vec<KeyCollision> {
    let mut counts: FxHashMap<String, usize> = FxHashMap::default();
    let mut first_seen = Vec::new();

    for tuple in tuples {
        let key = tuple.derived_key();
        let count = counts.entry(key.clone()).or_insert(0);
        if *count == 0 {
            first_seen.push(key);
        }
        *count += 1;
    }

    first_seen
        .into_iter()
        .filter_map(|key| {
            let count = counts.get(&key).copied().unwrap_or(0);
            (count > 1).then_some(KeyCollision { key, count })
        })
        .collect()
}
