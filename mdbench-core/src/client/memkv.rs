use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::{Attr, ClientError, EntryKind, FileHandle, MetaClient, OpenMode};

type ClientResult<T> = std::result::Result<T, ClientError>;

/// In-process metadata engine keyed by absolute path.
///
/// Entries live in a sharded map so concurrent workers on disjoint
/// directories rarely contend. Relative paths are resolved against `/`.
#[derive(Debug)]
pub struct MemKvClient {
    entries: DashMap<PathBuf, Attr>,
    open_handles: Arc<AtomicU64>,
}

impl Default for MemKvClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MemKvClient {
    #[must_use]
    pub fn new() -> Self {
        let entries = DashMap::new();
        entries.insert(
            PathBuf::from("/"),
            Attr {
                kind: EntryKind::Directory,
                mode: 0o777,
                length: 0,
            },
        );
        Self {
            entries,
            open_handles: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Handles returned by create/open that have not been closed yet.
    pub fn open_handles(&self) -> u64 {
        self.open_handles.load(Ordering::Relaxed)
    }

    /// Names of the direct children of `dir`, sorted.
    pub fn list(&self, dir: &Path) -> ClientResult<Vec<String>> {
        let dir = normalize(dir)?;
        let mut names: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.key().parent() == Some(dir.as_path()))
            .filter_map(|e| e.key().file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Changes the permission bits of an existing entry.
    pub fn chmod(&self, path: &Path, mode: u32) -> ClientResult<()> {
        let path = normalize(path)?;
        let mut attr = self.entries.get_mut(&path).ok_or(ClientError::NotFound)?;
        attr.mode = mode;
        Ok(())
    }

    fn check_parent(&self, path: &Path) -> ClientResult<()> {
        let Some(parent) = path.parent() else {
            return Err(ClientError::AlreadyExists);
        };
        match self.entries.get(parent).map(|a| a.kind) {
            Some(EntryKind::Directory) => Ok(()),
            Some(EntryKind::File) => Err(ClientError::NotADirectory),
            None => Err(ClientError::NotFound),
        }
    }

    fn handle(&self) -> Box<dyn FileHandle> {
        self.open_handles.fetch_add(1, Ordering::Relaxed);
        Box::new(MemKvHandle {
            open_handles: self.open_handles.clone(),
        })
    }
}

impl MetaClient for MemKvClient {
    fn create_file(&self, path: &Path, mode: u32) -> ClientResult<Box<dyn FileHandle>> {
        let path = normalize(path)?;
        self.check_parent(&path)?;

        match self.entries.entry(path) {
            Entry::Occupied(_) => Err(ClientError::AlreadyExists),
            Entry::Vacant(v) => {
                v.insert(Attr {
                    kind: EntryKind::File,
                    mode,
                    length: 0,
                });
                Ok(self.handle())
            }
        }
    }

    fn stat(&self, path: &Path) -> ClientResult<Attr> {
        let path = normalize(path)?;
        self.entries
            .get(&path)
            .map(|a| *a)
            .ok_or(ClientError::NotFound)
    }

    fn open_file(&self, path: &Path, mode: OpenMode) -> ClientResult<Box<dyn FileHandle>> {
        let attr = self.stat(path)?;
        if attr.kind == EntryKind::Directory {
            return Err(ClientError::IsADirectory);
        }
        let required = mode.required_bits();
        if attr.mode & required != required {
            return Err(ClientError::PermissionDenied);
        }
        Ok(self.handle())
    }

    fn delete_file(&self, path: &Path) -> ClientResult<()> {
        let path = normalize(path)?;
        if self
            .entries
            .remove_if(&path, |_, attr| attr.kind == EntryKind::File)
            .is_some()
        {
            return Ok(());
        }

        match self.entries.get(&path) {
            Some(_) => Err(ClientError::IsADirectory),
            None => Err(ClientError::NotFound),
        }
    }

    fn mkdir_all(&self, path: &Path, mode: u32) -> ClientResult<()> {
        let path = normalize(path)?;

        let mut cur = PathBuf::from("/");
        for component in path.components().skip(1) {
            cur.push(component);
            match self.entries.entry(cur.clone()) {
                Entry::Occupied(o) => {
                    if o.get().kind != EntryKind::Directory {
                        return Err(ClientError::NotADirectory);
                    }
                }
                Entry::Vacant(v) => {
                    v.insert(Attr {
                        kind: EntryKind::Directory,
                        mode,
                        length: 0,
                    });
                }
            }
        }
        Ok(())
    }
}

struct MemKvHandle {
    open_handles: Arc<AtomicU64>,
}

impl FileHandle for MemKvHandle {
    fn close(self: Box<Self>) -> ClientResult<()> {
        self.open_handles.fetch_sub(1, Ordering::Relaxed);
        Ok(())
    }
}

fn normalize(path: &Path) -> ClientResult<PathBuf> {
    let mut out = PathBuf::from("/");
    for component in path.components() {
        match component {
            Component::RootDir | Component::CurDir => {}
            Component::Normal(name) => out.push(name),
            Component::ParentDir => {
                out.pop();
            }
            Component::Prefix(_) => {
                return Err(ClientError::InvalidPath(path.display().to_string()));
            }
        }
    }
    Ok(out)
}
