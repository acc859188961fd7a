//! Storage trait and implementations
//!
//! Keys are paths relative to the data directory, e.g. `details_January/urls.txt`.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

pub trait Storage: Send + Sync {
    fn read(&self, key: &str) -> io::Result<String>;
    fn write(&self, key: &str, contents: &str) -> io::Result<()>;
    fn exists(&self, key: &str) -> bool;
}

/// Text files under a root directory.
#[derive(Clone, Debug)]
pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Storage for DiskStorage {
    fn read(&self, key: &str) -> io::Result<String> {
        std::fs::read_to_string(self.root.join(key))
    }

    // tmp + rename: readers never see a truncated file
    fn write(&self, key: &str, contents: &str) -> io::Result<()> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp = path.with_file_name(format!(".{file_name}.tmp"));
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &path)
    }

    fn exists(&self, key: &str) -> bool {
        self.root.join(key).is_file()
    }
}

/// In-memory storage (for testing and demos)
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    files: Arc<RwLock<HashMap<String, String>>>,
    writes: Arc<AtomicUsize>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a file without counting it as a write.
    pub fn insert(&self, key: &str, contents: &str) {
        if let Ok(mut files) = self.files.write() {
            files.insert(key.to_string(), contents.to_string());
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.files.read().ok()?.get(key).cloned()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

fn poisoned() -> io::Error {
    io::Error::other("in-memory storage lock poisoned")
}

impl Storage for InMemoryStorage {
    fn read(&self, key: &str) -> io::Result<String> {
        let files = self.files.read().map_err(|_| poisoned())?;
        files
            .get(key)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{key}: no such file")))
    }

    fn write(&self, key: &str, contents: &str) -> io::Result<()> {
        let mut files = self.files.write().map_err(|_| poisoned())?;
        files.insert(key.to_string(), contents.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn exists(&self, key: &str) -> bool {
        self.files
            .read()
            .map(|files| files.contains_key(key))
            .unwrap_or(false)
    }
}
