//! Shared osbuild store
//!
//! One store is created per suite run and handed to every build, so cases
//! can reuse each other's cached trees. Execution is sequential, so the
//! store needs no locking; concurrent cases would need one store each.

use crate::error::HarnessError;
use crate::paths;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Scoped build store, removed on release or drop
#[derive(Debug)]
pub struct BuildStore {
    path: PathBuf,
    /// Cleared once the store is released or kept
    owned: bool,
}

impl BuildStore {
    /// Create a fresh, uniquely named store under `scratch`
    pub fn acquire(scratch: &Path) -> Result<Self, HarnessError> {
        fs::create_dir_all(scratch).map_err(|e| {
            HarnessError::io(format!("Failed to create scratch dir {}", scratch.display()), e)
        })?;

        // Removal is handled here, so that a vanished store is not an error
        let dir = tempfile::Builder::new()
            .prefix(paths::STORE_PREFIX)
            .keep(true)
            .tempdir_in(scratch)
            .map_err(|e| {
                HarnessError::io(format!("Failed to create build store in {}", scratch.display()), e)
            })?;

        let path = dir.path().to_path_buf();
        tracing::info!(store = %path.display(), "acquired build store");
        Ok(Self { path, owned: true })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the store and everything in it.
    /// A store that has already disappeared counts as released.
    pub fn release(mut self) -> Result<(), HarnessError> {
        self.remove()
    }

    /// Leave the store on disk and return its location
    pub fn keep(mut self) -> PathBuf {
        self.owned = false;
        tracing::info!(store = %self.path.display(), "keeping build store");
        self.path.clone()
    }

    fn remove(&mut self) -> Result<(), HarnessError> {
        if !self.owned {
            return Ok(());
        }
        self.owned = false;

        let path = &self.path;
        match remove_tree(path) {
            Ok(()) => {
                tracing::info!(store = %path.display(), "released build store");
                Ok(())
            }
            Err(e) => Err(HarnessError::io(
                format!("Failed to remove build store {}", path.display()),
                e,
            )),
        }
    }
}

impl Drop for BuildStore {
    fn drop(&mut self) {
        if let Err(e) = self.remove() {
            tracing::warn!(error = %e, "build store cleanup failed");
        }
    }
}

/// Recursive removal that treats "already gone" as success
pub fn remove_tree(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
