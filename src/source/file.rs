//! Local directory source.

use super::DataSource;
use crate::utils::error::SourceError;
use log::debug;
use std::path::PathBuf;

/// Reads tables from files below a root directory
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DataSource for FileSource {
    fn fetch(&self, location: &str) -> Result<String, SourceError> {
        let path = self.root.join(location);
        debug!("Reading table from {}", path.display());

        std::fs::read_to_string(&path).map_err(|source| SourceError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
