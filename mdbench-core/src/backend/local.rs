use std::fs::{self, File};
use std::path::Path;

use super::{Backend, BackendError};

/// The host filesystem through plain std calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalBackend;

impl Backend for LocalBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    fn ensure_dir(&self, path: &Path) -> Result<(), BackendError> {
        if path.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(path)?;
        Ok(())
    }

    fn create(&self, path: &Path) -> Result<(), BackendError> {
        drop(File::create(path)?);
        Ok(())
    }

    fn stat(&self, path: &Path) -> Result<(), BackendError> {
        fs::metadata(path)?;
        Ok(())
    }

    fn open(&self, path: &Path) -> Result<(), BackendError> {
        drop(File::open(path)?);
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<(), BackendError> {
        fs::remove_file(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn file_lifecycle() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("file-0");
        let backend = LocalBackend;

        backend.create(&path).unwrap();
        assert!(path.is_file());
        backend.stat(&path).unwrap();
        backend.open(&path).unwrap();
        backend.remove(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn create_truncates_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("file-0");
        fs::write(&path, b"data").unwrap();

        LocalBackend.create(&path).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn missing_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing");
        let backend = LocalBackend;

        for res in [backend.stat(&path), backend.open(&path), backend.remove(&path)] {
            match res {
                Err(BackendError::Io(err)) => {
                    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
                }
                other => panic!("expected NotFound, got {other:?}"),
            }
        }
    }
}
