//! Artifact delivery.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::errors::AppError;

/// Where generated artifacts go. Implementations own the destination and
/// must not leave partial files behind on failure.
pub trait FileOperations: Send + Sync {
    fn save_artifact(&self, name: &str, data: &[u8]) -> Result<(), AppError>;
}

/// Saves artifacts into a local directory.
#[derive(Debug, Clone)]
pub struct LocalFileOperations {
    root: PathBuf,
}

impl LocalFileOperations {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileOperations for LocalFileOperations {
    fn save_artifact(&self, name: &str, data: &[u8]) -> Result<(), AppError> {
        std::fs::create_dir_all(&self.root)?;
        let target = self.root.join(name);

        // Write next to the target so persist is a same-filesystem rename.
        let mut file = NamedTempFile::new_in(&self.root)?;
        file.write_all(data)?;
        file.flush()?;
        file.persist(&target).map_err(|e| AppError::Io(e.error))?;

        tracing::info!(path = %target.display(), bytes = data.len(), "Saved artifact");
        Ok(())
    }
}
