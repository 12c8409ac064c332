use std::path::Path;
use std::sync::Arc;

use crate::client::{MetaClient, OpenMode};

use super::{Backend, BackendError};

const FILE_MODE: u32 = 0o666;
const DIR_MODE: u32 = 0o777;

/// A metadata engine reached through its client.
///
/// The client is shared by every worker and must tolerate concurrent calls.
#[derive(Clone)]
pub struct RemoteBackend {
    client: Arc<dyn MetaClient>,
}

impl RemoteBackend {
    pub fn new(client: Arc<dyn MetaClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<dyn MetaClient> {
        &self.client
    }
}

impl std::fmt::Debug for RemoteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteBackend").finish_non_exhaustive()
    }
}

impl Backend for RemoteBackend {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn ensure_dir(&self, path: &Path) -> Result<(), BackendError> {
        self.client.mkdir_all(path, DIR_MODE)?;
        Ok(())
    }

    fn create(&self, path: &Path) -> Result<(), BackendError> {
        self.client.create_file(path, FILE_MODE)?.close()?;
        Ok(())
    }

    fn stat(&self, path: &Path) -> Result<(), BackendError> {
        self.client.stat(path)?;
        Ok(())
    }

    fn open(&self, path: &Path) -> Result<(), BackendError> {
        self.client.open_file(path, OpenMode::READ_WRITE)?.close()?;
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<(), BackendError> {
        self.client.delete_file(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::client::{ClientError, MemKvClient};

    #[test]
    fn file_lifecycle_closes_handles() {
        let client = Arc::new(MemKvClient::new());
        let backend = RemoteBackend::new(client.clone());
        let dir = Path::new("/bench/meta-bench-0");
        let path = dir.join("file-0");

        backend.ensure_dir(dir).unwrap();
        backend.ensure_dir(dir).unwrap();
        backend.create(&path).unwrap();
        backend.stat(&path).unwrap();
        backend.open(&path).unwrap();
        backend.remove(&path).unwrap();

        assert_eq!(client.open_handles(), 0);
        assert!(client.list(dir).unwrap().is_empty());
    }

    #[test]
    fn client_errors_surface() {
        let backend = RemoteBackend::new(Arc::new(MemKvClient::new()));
        let err = backend.stat(Path::new("/nope")).unwrap_err();
        assert!(matches!(err, BackendError::Client(ClientError::NotFound)));
    }
}
