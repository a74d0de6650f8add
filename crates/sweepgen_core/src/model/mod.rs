mod command;
mod grid;
mod values;

pub use command::Command;
pub use grid::{Dimension, KEY_SEPARATOR, ParameterGrid, ParameterTuple, ReplicateIndex};
pub use values::ParamValue;
