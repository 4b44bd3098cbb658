//! Body file sources.

use crate::error::TransformError;
use std::path::{Path, PathBuf};

/// Supplies the raw bytes of response body files.
pub trait FileSource: Send + Sync {
    fn binary_file_named(&self, name: &str) -> Result<Vec<u8>, TransformError>;
}

/// Reads body files relative to a root directory (e.g. `__files/`).
#[derive(Debug, Clone)]
pub struct DirectoryFileSource {
    root: PathBuf,
}

impl DirectoryFileSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileSource for DirectoryFileSource {
    fn binary_file_named(&self, name: &str) -> Result<Vec<u8>, TransformError> {
        std::fs::read(self.root.join(name)).map_err(|source| TransformError::FileRead {
            name: name.to_string(),
            source,
        })
    }
}
