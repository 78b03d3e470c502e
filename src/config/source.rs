//! Resource sources for configuration documents.
//!
//! All configuration (base settings, legacy section documents, pattern
//! resources and manifests) is addressed by a relative path such as
//! `ue5.1/patterns/stat_memory.json`. A [`ResourceSource`] turns that path into
//! text; the resolver never touches the filesystem directly.

use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Abstract access to configuration resources.
pub trait ResourceSource: Send + Sync + 'static {
    /// Load the resource at a relative path as text.
    fn load(&self, path: &str) -> impl Future<Output = io::Result<String>> + Send;
}

/// Resources stored in a directory tree.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Create a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceSource for DirSource {
    fn load(&self, path: &str) -> impl Future<Output = io::Result<String>> + Send {
        let full = self.root.join(path);
        async move { tokio::fs::read_to_string(full).await }
    }
}

/// Resources held in memory.
///
/// Counts every load per path, which makes cache behavior observable.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: HashMap<String, String>,
    loads: Mutex<HashMap<String, usize>>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource and return self.
    pub fn with(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Add or replace a resource.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    /// Number of times `path` has been requested, whether or not it exists.
    pub fn load_count(&self, path: &str) -> usize {
        self.loads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    /// Total number of requests across all paths.
    pub fn total_loads(&self) -> usize {
        self.loads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .sum()
    }
}

impl ResourceSource for MemorySource {
    fn load(&self, path: &str) -> impl Future<Output = io::Result<String>> + Send {
        *self
            .loads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(path.to_string())
            .or_insert(0) += 1;

        let result = self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("resource not found: {}", path))
        });
        std::future::ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_source_counts_loads() {
        let source = MemorySource::new().with("ue5.1/memreport.ini", "[MemReportCommands]");

        assert_eq!(
            source.load("ue5.1/memreport.ini").await.unwrap(),
            "[MemReportCommands]"
        );
        let missing = source.load("ue5.1/missing.json").await.unwrap_err();
        assert_eq!(missing.kind(), io::ErrorKind::NotFound);

        assert_eq!(source.load_count("ue5.1/memreport.ini"), 1);
        assert_eq!(source.load_count("ue5.1/missing.json"), 1);
        assert_eq!(source.total_loads(), 2);
    }

    #[tokio::test]
    async fn test_dir_source_reads_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("ue5.3/patterns")).unwrap();
        std::fs::write(dir.path().join("ue5.3/patterns/manifest.txt"), "stat_memory\n").unwrap();

        let source = DirSource::new(dir.path());
        assert_eq!(
            source.load("ue5.3/patterns/manifest.txt").await.unwrap(),
            "stat_memory\n"
        );
        assert!(source.load("ue5.3/memreport.ini").await.is_err());
    }
}
