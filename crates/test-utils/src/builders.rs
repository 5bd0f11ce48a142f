use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

/// Temporary directory tree for watcher and end-to-end tests.
///
/// The tree is removed when the value is dropped.
pub struct TempProject {
    dir: TempDir,
}

impl TempProject {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Raw (possibly symlinked) root path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Canonicalized root path.
    ///
    /// The OS temp dir is often reached through a symlink while the watcher
    /// reports canonical paths; compare against this one.
    pub fn root(&self) -> PathBuf {
        self.dir
            .path()
            .canonicalize()
            .unwrap_or_else(|_| self.dir.path().to_path_buf())
    }

    /// Create or overwrite a file, creating parent directories as needed.
    pub fn write(&self, rel: impl AsRef<Path>, contents: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Create a directory (and any missing parents).
    pub fn mkdir(&self, rel: impl AsRef<Path>) -> Result<PathBuf> {
        let path = self.dir.path().join(rel);
        fs::create_dir_all(&path)?;
        Ok(path)
    }
}
