use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised while validating a sweep before anything is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A parameter dimension has no candidate values
    EmptyDimension { index: usize, name: Option<String> },
    /// The requested number of batch files is zero
    ZeroFileCount,
    /// The launcher placeholder token is the empty string
    EmptyPlaceholder,
    /// The launcher template never mentions the placeholder token
    MissingPlaceholder { placeholder: String },
    /// Distinct tuples render to the same derived key (strict mode only)
    KeyCollision { key: String, count: usize },
    /// A file name or prefix in the output layout is empty
    EmptyFileName { field: &'static str },
    /// Two output files of one run could end up with the same name
    FileNameClash { a: String, b: String },
    /// Tuple or command count does not fit in `usize`
    SweepTooLarge,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyDimension { index, name } => match name {
                Some(name) => write!(f, "parameter dimension {index} ({name}) has no values"),
                None => write!(f, "parameter dimension {index} has no values"),
            },
            ConfigError::ZeroFileCount => write!(f, "target file count must be at least 1"),
            ConfigError::EmptyPlaceholder => write!(f, "launcher placeholder must not be empty"),
            ConfigError::MissingPlaceholder { placeholder } => {
                write!(f, "launcher template does not contain placeholder {placeholder:?}")
            }
            ConfigError::KeyCollision { key, count } => {
                write!(f, "{count} parameter tuples share the output key {key:?}")
            }
            ConfigError::EmptyFileName { field } => write!(f, "file layout {field} must not be empty"),
            ConfigError::FileNameClash { a, b } => {
                write!(f, "output files {a:?} and {b:?} would overwrite each other")
            }
            ConfigError::SweepTooLarge => write!(f, "sweep has more commands than can be addressed"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Pipeline stage that touched the filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Prepare,
    Pool,
    Batches,
    Launchers,
    CompileScript,
    QueueScript,
    Cleanup,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Prepare => "prepare",
            Stage::Pool => "pool",
            Stage::Batches => "batches",
            Stage::Launchers => "launchers",
            Stage::CompileScript => "compile-script",
            Stage::QueueScript => "queue-script",
            Stage::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file could not be created, written, read or removed
#[derive(Debug)]
pub struct FilesystemError {
    pub stage: Stage,
    pub path: PathBuf,
    pub source: io::Error,
}

impl FilesystemError {
    pub fn new(stage: Stage, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            stage,
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for FilesystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} stage failed on {}: {}",
            self.stage,
            self.path.display(),
            self.source
        )
    }
}

impl std::error::Error for FilesystemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Any failure that aborts a sweep run
#[derive(Debug)]
pub enum SweepError {
    Config(ConfigError),
    Filesystem(FilesystemError),
}

impl fmt::Display for SweepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepError::Config(e) => write!(f, "configuration error: {e}"),
            SweepError::Filesystem(e) => write!(f, "filesystem error: {e}"),
        }
    }
}

impl std::error::Error for SweepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SweepError::Config(e) => Some(e),
            SweepError::Filesystem(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SweepError {
    fn from(err: ConfigError) -> Self {
        SweepError::Config(err)
    }
}

impl From<FilesystemError> for SweepError {
    fn from(err: FilesystemError) -> Self {
        SweepError::Filesystem(err)
    }
}
