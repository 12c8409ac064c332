mod local;
mod remote;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::client::{self, ClientError};
use crate::error::Result;

pub use local::LocalBackend;
pub use remote::RemoteBackend;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// The four measured operations plus directory setup, implemented once per
/// target. Implementations are called from many workers at once.
pub trait Backend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Creates `path` (and parents) unless it already exists as a directory.
    fn ensure_dir(&self, path: &Path) -> std::result::Result<(), BackendError>;

    fn create(&self, path: &Path) -> std::result::Result<(), BackendError>;

    fn stat(&self, path: &Path) -> std::result::Result<(), BackendError>;

    fn open(&self, path: &Path) -> std::result::Result<(), BackendError>;

    fn remove(&self, path: &Path) -> std::result::Result<(), BackendError>;
}

/// Which target to benchmark.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BackendSelector {
    #[default]
    Local,

    /// Metadata engine URL, e.g. `memkv://bench`.
    Remote(String),
}

impl BackendSelector {
    /// An empty (or blank) URL selects the local filesystem.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        let url = url.trim();
        if url.is_empty() {
            Self::Local
        } else {
            Self::Remote(url.to_string())
        }
    }

    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local)
    }
}

impl fmt::Display for BackendSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Remote(url) => f.write_str(url),
        }
    }
}

pub fn connect(selector: &BackendSelector) -> Result<Arc<dyn Backend>> {
    match selector {
        BackendSelector::Local => Ok(Arc::new(LocalBackend)),
        BackendSelector::Remote(url) => Ok(Arc::new(RemoteBackend::new(client::connect(url)?))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_url_selects_local() {
        assert_eq!(BackendSelector::from_url(""), BackendSelector::Local);
        assert_eq!(BackendSelector::from_url("  "), BackendSelector::Local);
        assert_eq!(
            BackendSelector::from_url("memkv://x"),
            BackendSelector::Remote("memkv://x".to_string())
        );
    }

    #[test]
    fn connect_picks_backend() {
        let local = connect(&BackendSelector::Local).map(|b| b.name()).ok();
        assert_eq!(local, Some("local"));

        let remote = connect(&BackendSelector::from_url("memkv://x"))
            .map(|b| b.name())
            .ok();
        assert_eq!(remote, Some("remote"));

        assert!(connect(&BackendSelector::from_url("tikv://pd:2379")).is_err());
    }
}
