//! Capability surface of a metadata engine client.
//!
//! The benchmark only needs to create, stat, open and delete files and to
//! create directories; any engine exposing these calls (safe for concurrent
//! use) can be benchmarked through [`crate::RemoteBackend`].

mod memkv;

use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};

pub use memkv::MemKvClient;

pub const MEMKV_SCHEME: &str = "memkv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attr {
    pub kind: EntryKind,
    pub mode: u32,
    pub length: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpenMode {
    pub read: bool,
    pub write: bool,
}

impl OpenMode {
    pub const READ: Self = Self {
        read: true,
        write: false,
    };

    pub const READ_WRITE: Self = Self {
        read: true,
        write: true,
    };

    /// Owner permission bits this mode requires.
    #[must_use]
    pub fn required_bits(self) -> u32 {
        let mut bits = 0;
        if self.read {
            bits |= 0o400;
        }
        if self.write {
            bits |= 0o200;
        }
        bits
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("no such file or directory")]
    NotFound,

    #[error("file exists")]
    AlreadyExists,

    #[error("not a directory")]
    NotADirectory,

    #[error("is a directory")]
    IsADirectory,

    #[error("permission denied")]
    PermissionDenied,

    #[error("invalid path: {0}")]
    InvalidPath(String),
}

pub trait FileHandle: Send {
    fn close(self: Box<Self>) -> std::result::Result<(), ClientError>;
}

pub trait MetaClient: Send + Sync {
    fn create_file(
        &self,
        path: &Path,
        mode: u32,
    ) -> std::result::Result<Box<dyn FileHandle>, ClientError>;

    fn stat(&self, path: &Path) -> std::result::Result<Attr, ClientError>;

    fn open_file(
        &self,
        path: &Path,
        mode: OpenMode,
    ) -> std::result::Result<Box<dyn FileHandle>, ClientError>;

    fn delete_file(&self, path: &Path) -> std::result::Result<(), ClientError>;

    /// Creates `path` and any missing parents. Succeeds if it already exists
    /// as a directory.
    fn mkdir_all(&self, path: &Path, mode: u32) -> std::result::Result<(), ClientError>;
}

/// Opens a client for a metadata engine URL.
pub fn connect(url: &str) -> Result<Arc<dyn MetaClient>> {
    let parsed = url::Url::parse(url).map_err(|_| Error::UnsupportedEngine(url.to_string()))?;
    match parsed.scheme() {
        MEMKV_SCHEME => Ok(Arc::new(MemKvClient::new())),
        _ => Err(Error::UnsupportedEngine(url.to_string())),
    }
}
