//! Image blob store. The kennel only tracks image keys; bytes live in a
//! blob store behind this trait.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

use crate::domain::models::is_placeholder_image;

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Delete the blob behind `key`. Releasing a missing blob succeeds.
    async fn release(&self, key: &str) -> Result<()>;

    async fn exists(&self, key: &str) -> Result<bool>;
}

/// Blobs stored as files under one uploads directory
#[derive(Debug, Clone)]
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a key to a file under the root, refusing anything that could escape it
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let is_plain = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            anyhow::bail!("Invalid image key '{}'", key);
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn release(&self, key: &str) -> Result<()> {
        if is_placeholder_image(key) {
            return Ok(());
        }
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Released image {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Image {} already gone", path.display());
                Ok(())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to remove image {}", path.display())),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let path = self.path_for(key)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }
}
