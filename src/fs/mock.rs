// src/fs/mock.rs

use super::FileSystem;
use anyhow::{Result, anyhow, bail};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
enum MockEntry {
    File(String),
    Dir(BTreeSet<PathBuf>),
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    unreadable: HashSet<PathBuf>,
}

/// In-memory directory tree.
///
/// Paths are stored exactly as given (no normalisation), so tests should use
/// one consistent root such as `/base`.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, creating all parent directories.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.lock();
        Self::link_into_parent(&mut state, &path);
        state.entries.insert(path, MockEntry::File(content.into()));
    }

    /// Add an empty directory, creating all parent directories.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.lock();
        Self::ensure_dir(&mut state, &path);
    }

    /// Make reads of `path` (file contents or directory listing) fail.
    pub fn mark_unreadable(&self, path: impl AsRef<Path>) {
        self.lock().unreadable.insert(path.as_ref().to_path_buf());
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A poisoned mock only happens after a test already panicked.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn ensure_dir(state: &mut MockState, path: &Path) {
        if state.entries.contains_key(path) {
            return;
        }
        Self::link_into_parent(state, path);
        state
            .entries
            .insert(path.to_path_buf(), MockEntry::Dir(BTreeSet::new()));
    }

    fn link_into_parent(state: &mut MockState, path: &Path) {
        let Some(parent) = path.parent() else {
            return;
        };
        if parent.as_os_str().is_empty() {
            return;
        }
        Self::ensure_dir(state, parent);
        if let Some(MockEntry::Dir(children)) = state.entries.get_mut(parent) {
            children.insert(path.to_path_buf());
        }
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let state = self.lock();
        if state.unreadable.contains(path) {
            bail!("permission denied: {:?}", path);
        }
        match state.entries.get(path) {
            Some(MockEntry::File(content)) => Ok(content.clone()),
            Some(MockEntry::Dir(_)) => Err(anyhow!("is a directory: {:?}", path)),
            None => Err(anyhow!("file not found: {:?}", path)),
        }
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.lock().entries.get(path), Some(MockEntry::File(_)))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().entries.get(path), Some(MockEntry::Dir(_)))
    }

    fn is_symlink(&self, _path: &Path) -> bool {
        false
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let state = self.lock();
        if state.unreadable.contains(path) {
            bail!("permission denied: {:?}", path);
        }
        match state.entries.get(path) {
            Some(MockEntry::Dir(children)) => Ok(children.iter().cloned().collect()),
            Some(MockEntry::File(_)) => Err(anyhow!("not a directory: {:?}", path)),
            None => Err(anyhow!("directory not found: {:?}", path)),
        }
    }
}
