use std::path::PathBuf;

use crate::backend::BackendError;
use crate::step::StepKind;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification used by callers to pick an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Rejected before any timed work begins.
    Config,
    /// The working set could not be created.
    Setup,
    /// A create/stat/open/remove call failed mid-run.
    Operation,
    /// Metrics were requested but could not be captured.
    Metrics,
    Runtime,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("`threads` must be a positive integer")]
    InvalidThreads,

    #[error("`files` must be a positive integer")]
    InvalidFiles,

    #[error("no steps to run")]
    NoSteps,

    #[error("unknown step `{0}` (expected create, stat, open or remove)")]
    UnknownStep(String),

    #[error("invalid repeat count in step `{0}` (expected NAME*N with N >= 1)")]
    InvalidRepeat(String),

    #[error("dropping kernel caches is not supported on `{0}` (only linux and macos)")]
    UnsupportedPlatform(&'static str),

    #[error("unsupported metadata engine: `{0}` (expected memkv://NAME)")]
    UnsupportedEngine(String),

    #[error("invalid metrics endpoint: `{0}`")]
    InvalidMetricsEndpoint(String),

    #[error("failed to create {}: {source}", .path.display())]
    Prepare {
        path: PathBuf,
        #[source]
        source: BackendError,
    },

    #[error("failed to {kind} {}: {source}", .path.display())]
    Operation {
        kind: StepKind,
        path: PathBuf,
        #[source]
        source: BackendError,
    },

    #[error("failed to fetch metrics from {url}: {source}")]
    MetricsFetch {
        url: String,
        #[source]
        source: crate::http::Error,
    },

    #[error("failed to write metrics snapshot {}: {source}", .path.display())]
    MetricsWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn worker thread: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    #[error("worker thread {thread} panicked")]
    WorkerPanicked { thread: u64 },

    #[error("worker join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidThreads
            | Self::InvalidFiles
            | Self::NoSteps
            | Self::UnknownStep(_)
            | Self::InvalidRepeat(_)
            | Self::UnsupportedPlatform(_)
            | Self::UnsupportedEngine(_)
            | Self::InvalidMetricsEndpoint(_) => ErrorKind::Config,
            Self::Prepare { .. } => ErrorKind::Setup,
            Self::Operation { .. } => ErrorKind::Operation,
            Self::MetricsFetch { .. } | Self::MetricsWrite { .. } => ErrorKind::Metrics,
            Self::WorkerSpawn(_) | Self::WorkerPanicked { .. } | Self::Join(_) => {
                ErrorKind::Runtime
            }
        }
    }
}
