//! File system collaborators.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Source of model files.
///
/// Implementations must be usable from several loading threads at once.
pub trait FileSystem: Send + Sync {
    /// Whether a file with this name exists.
    fn exists(&self, name: &str) -> bool;

    /// Read the whole file.
    fn read(&self, name: &str) -> io::Result<Vec<u8>>;
}

/// Files on local disk, resolved relative to a root directory.
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    root: PathBuf,
}

impl LocalFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl FileSystem for LocalFileSystem {
    fn exists(&self, name: &str) -> bool {
        self.resolve(name).is_file()
    }

    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        std::fs::read(self.resolve(name))
    }
}

/// In-memory file map, for tests and bundled assets.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryFileSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(name.into(), bytes);
    }

    #[must_use]
    pub fn with_file(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(name, bytes);
        self
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_owned()))
    }
}
