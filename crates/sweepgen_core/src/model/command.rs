use super::grid::ReplicateIndex;

/// A fully rendered invocation line plus the key of the tuple it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub line: String,
    /// Derived key of the source tuple; independent of replicate and seed
    pub key: String,
    pub replicate: ReplicateIndex,
}

impl Command {
    pub fn as_str(&self) -> &str {
        &self.line
    }
}
