//! Parameter grid, tuples and replicate indices

use serde::{Deserialize, Serialize};

use super::values::ParamValue;
use crate::error::ConfigError;

/// Separator between values in a derived key
pub const KEY_SEPARATOR: &str = "_";

/// One axis of the sweep.
///
/// The position of a dimension inside the grid decides which positional
/// argument of the simulation its values bind to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub values: Vec<ParamValue>,
}

impl Dimension {
    #[must_use]
    pub fn new(values: Vec<ParamValue>) -> Self {
        Self { name: None, values }
    }

    #[must_use]
    pub fn named(name: impl Into<String>, values: Vec<ParamValue>) -> Self {
        Self {
            name: Some(name.into()),
            values,
        }
    }

    #[must_use]
    pub fn ints(name: impl Into<String>, values: impl IntoIterator<Item = i64>) -> Self {
        Self::named(name, values.into_iter().map(ParamValue::int).collect())
    }

    #[must_use]
    pub fn floats(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::named(name, values.into_iter().map(ParamValue::float).collect())
    }

    #[must_use]
    pub fn bools(name: impl Into<String>, values: impl IntoIterator<Item = bool>) -> Self {
        Self::named(name, values.into_iter().map(ParamValue::bool).collect())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordered list of dimensions describing a full sweep
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterGrid {
    pub dimensions: Vec<Dimension>,
}

impl ParameterGrid {
    #[must_use]
    pub fn new(dimensions: Vec<Dimension>) -> Self {
        Self { dimensions }
    }

    /// Append a dimension (builder style)
    #[must_use]
    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimensions.push(dimension);
        self
    }

    /// Cardinality of each dimension, in order
    pub fn shape(&self) -> Vec<usize> {
        self.dimensions.iter().map(Dimension::len).collect()
    }

    pub fn ndim(&self) -> usize {
        self.dimensions.len()
    }

    /// Fails on the first dimension without values
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.dimensions.iter().position(Dimension::is_empty) {
            Some(index) => Err(ConfigError::EmptyDimension {
                index,
                name: self.dimensions[index].name.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Exactly one value from each dimension of a grid
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterTuple(Vec<ParamValue>);

impl ParameterTuple {
    #[must_use]
    pub fn new(values: Vec<ParamValue>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[ParamValue] {
        &self.0
    }

    /// Underscore-joined values; names the tuple's accumulated result file
    pub fn derived_key(&self) -> String {
        self.join(KEY_SEPARATOR)
    }

    /// Space-joined values, in dimension order
    pub fn positional_args(&self) -> String {
        self.join(" ")
    }

    fn join(&self, sep: &str) -> String {
        self.0
            .iter()
            .map(ParamValue::as_str)
            .collect::<Vec<_>>()
            .join(sep)
    }
}

/// Repetition number of a tuple, in `[0, redundant_runs)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReplicateIndex(pub u32);
