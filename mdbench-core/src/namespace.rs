use std::path::{Path, PathBuf};

use crate::backend::Backend;
use crate::error::{Error, Result};

pub const THREAD_DIR_PREFIX: &str = "meta-bench-";
pub const FILE_PREFIX: &str = "file-";

/// Per-thread working directories under a common root.
///
/// Thread `i` owns `root/meta-bench-{i}` and every file below it, so workers
/// never touch each other's paths.
#[derive(Debug, Clone)]
pub struct Namespace {
    root: PathBuf,
    threads: u64,
}

impl Namespace {
    pub fn new(root: impl Into<PathBuf>, threads: u64) -> Self {
        Self {
            root: root.into(),
            threads,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn threads(&self) -> u64 {
        self.threads
    }

    pub fn thread_dir(&self, thread: u64) -> PathBuf {
        self.root.join(format!("{THREAD_DIR_PREFIX}{thread}"))
    }

    pub fn file(dir: &Path, index: u64) -> PathBuf {
        dir.join(format!("{FILE_PREFIX}{index}"))
    }

    pub fn thread_dirs(&self) -> impl Iterator<Item = PathBuf> + '_ {
        (0..self.threads).map(|i| self.thread_dir(i))
    }

    /// Files `0..files` of one thread, in the order workers visit them.
    pub fn thread_files(&self, thread: u64, files: u64) -> impl Iterator<Item = PathBuf> {
        let dir = self.thread_dir(thread);
        (0..files).map(move |i| Self::file(&dir, i))
    }

    /// Creates the root and every thread directory that does not exist yet.
    ///
    /// Existing directories are left alone, so steps can run against files
    /// created by an earlier invocation.
    pub fn prepare(&self, backend: &dyn Backend) -> Result<()> {
        backend
            .ensure_dir(&self.root)
            .map_err(|source| Error::Prepare {
                path: self.root.clone(),
                source,
            })?;

        for dir in self.thread_dirs() {
            backend
                .ensure_dir(&dir)
                .map_err(|source| Error::Prepare { path: dir, source })?;
        }

        tracing::debug!(
            root = %self.root.display(),
            threads = self.threads,
            backend = backend.name(),
            "namespace ready"
        );
        Ok(())
    }
}
