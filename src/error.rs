use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Failure to turn a source path into a [`Chain`](crate::data::model::Chain).
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot open {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The format reader rejected the file. The source chain carries the detail.
    #[error("failed to read {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("unsupported chain file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("{path} does not contain a '{table}' table")]
    MissingTable { path: PathBuf, table: String },

    #[error("table in {path} has no 'step' column")]
    MissingStepColumn { path: PathBuf },
}

/// Errors raised by the numeric kernels in [`crate::stats`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("histogram needs at least two bin edges, got {0}")]
    TooFewEdges(usize),

    #[error("histogram bin edges must increase monotonically")]
    NonMonotonicEdges,

    #[error("histogram range is not finite: ({0}, {1})")]
    InvalidRange(f64, f64),
}

/// Errors raised when querying a loaded chain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainError {
    #[error("chain '{chain}' has no parameter '{name}'")]
    UnknownParameter { chain: String, name: String },

    #[error("parameter '{name}' of chain '{chain}' has no samples after the burn-in cut")]
    EmptyParameter { chain: String, name: String },

    #[error("chain '{0}' has no parameters to average")]
    NoParameters(String),

    #[error(transparent)]
    Stats(#[from] StatsError),
}

/// Errors raised while drawing pages or writing the output document.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to draw page: {0}")]
    Drawing(String),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("failed to write document: {0}")]
    Io(#[from] std::io::Error),
}

impl<E: std::error::Error + Send + Sync> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for RenderError
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        RenderError::Drawing(err.to_string())
    }
}
