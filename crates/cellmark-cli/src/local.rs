//! Filesystem-backed content source.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cellmark_core::{ContentSource, Resource, SourceError};

/// Reads documents from a directory; a resource's path is relative to it.
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn locate(&self, resource: &Resource) -> PathBuf {
        self.root.join(&resource.path)
    }
}

#[async_trait]
impl ContentSource for LocalSource {
    async fn get_content(&self, resource: &Resource) -> Result<String, SourceError> {
        let path = self.locate(resource);
        tracing::debug!("Reading {}", path.display());

        tokio::fs::read_to_string(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::NotFound(path.display().to_string()),
            _ => SourceError::Io(e),
        })
    }
}

/// Path of `file` relative to `root`, with `/` separators.
pub fn relative_path(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?;
    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    (!segments.is_empty()).then(|| segments.join("/"))
}
