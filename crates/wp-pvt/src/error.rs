//! Conversion errors.

use crate::property::PvtColumn;
use std::path::PathBuf;
use thiserror::Error;
use wp_core::{UnitError, WpError};

/// Result type for PVT table conversion.
pub type PvtResult<T> = Result<T, PvtError>;

/// Errors that stop a conversion.
///
/// Missing input files and singular derivatives are not errors: the former
/// become zero columns, the latter NaN cells.
#[derive(Error, Debug)]
pub enum PvtError {
    /// A file exists but could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A present wellprop file is malformed.
    #[error("Parse error in {path} at line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A grid's shape disagrees with the shared axes.
    #[error(
        "Dimension mismatch for {what}: expected shape {expected:?} (pressure, secondary), got {actual:?}"
    )]
    DimensionMismatch {
        what: String,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// A composed column does not have one value per table row.
    #[error("Column {column} has {actual} values, expected {expected}")]
    ColumnLength {
        column: PvtColumn,
        expected: usize,
        actual: usize,
    },

    /// Invalid conversion settings.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unit error: {0}")]
    Unit(#[from] UnitError),

    #[error(transparent)]
    Core(#[from] WpError),
}

impl PvtError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
