//! Error types for the analysis pipeline.
//!
//! Every variant is fatal for the benchmark group being analyzed: the pipeline
//! surfaces the first error it meets and emits no views for that group.

use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for speedup analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    // === Artifact Errors ===
    /// A group root, variant directory, or run record file is absent.
    #[error("missing artifact: '{}'", path.display())]
    MissingArtifact { path: PathBuf },

    /// A record file exists but its contents are unusable.
    #[error("malformed record '{}': {detail}", path.display())]
    MalformedRecord { path: PathBuf, detail: String },

    /// A parameter descriptor could not be decoded.
    #[error("malformed parameter descriptor \"{descriptor}\": {detail}")]
    MalformedParameter { descriptor: String, detail: String },

    // === Integrity Errors ===
    /// Observations of one group do not share the same parameter key set.
    #[error(
        "parameter schema mismatch for scheduler '{scheduler}': expected {expected:?}, found {found:?}"
    )]
    SchemaMismatch {
        scheduler: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// A comparison scope contains no baseline row.
    #[error("no '{baseline}' baseline in scope [{scope}]")]
    BaselineNotFound { baseline: String, scope: String },

    /// A comparison scope contains more than one baseline row.
    #[error("{count} '{baseline}' baselines in scope [{scope}], expected exactly one")]
    AmbiguousBaseline {
        baseline: String,
        scope: String,
        count: usize,
    },

    /// An observation with a zero wallclock needs its reciprocal.
    #[error("zero wallclock for scheduler '{scheduler}' in scope [{scope}]")]
    DivisionByZero { scheduler: String, scope: String },

    /// Two records land on the same point of a view or the same pivot cell.
    #[error("duplicate observation for scheduler '{scheduler}' at {location}")]
    DuplicateObservation { scheduler: String, location: String },

    /// A pivot cell has no record.
    #[error("incomplete pivot for scheduler '{scheduler}': no record at {location}")]
    IncompletePivot { scheduler: String, location: String },

    // === Configuration Errors ===
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // === Underlying Errors ===
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or export failure.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl AnalysisError {
    /// Build a `MalformedParameter` error for `descriptor`.
    pub fn malformed_parameter(descriptor: &str, detail: impl Into<String>) -> Self {
        Self::MalformedParameter {
            descriptor: descriptor.to_string(),
            detail: detail.into(),
        }
    }

    /// Build a `MalformedRecord` error for the record at `path`.
    pub fn malformed_record(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::MalformedRecord {
            path: path.into(),
            detail: detail.into(),
        }
    }

    /// Build a `MissingArtifact` error for `path`.
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        Self::MissingArtifact { path: path.into() }
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, AnalysisError>;
