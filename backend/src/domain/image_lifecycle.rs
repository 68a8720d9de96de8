//! Releases image blobs once the rows that owned them are gone.
//!
//! Deletes record the keys they orphan in the release queue within the same
//! transaction as the row removal. This service then releases each key,
//! retrying once, and clears it from the queue on success. Keys that still
//! fail stay queued and are drained again at the next startup.

use std::sync::Arc;
use tracing::{error, info, warn};

use super::errors::KennelResult;
use super::models::is_placeholder_image;
use crate::storage::{ImageReleaseStorage, ImageStore};

const RELEASE_ATTEMPTS: usize = 2;

#[derive(Clone)]
pub struct ImageLifecycle {
    queue: Arc<dyn ImageReleaseStorage>,
    store: Arc<dyn ImageStore>,
}

impl ImageLifecycle {
    pub fn new(queue: Arc<dyn ImageReleaseStorage>, store: Arc<dyn ImageStore>) -> Self {
        Self { queue, store }
    }

    /// Release queued keys. Returns the keys that could not be released.
    pub async fn release(&self, keys: &[String]) -> Vec<String> {
        let mut unreleased = Vec::new();

        for key in keys {
            if self.release_one(key).await {
                if let Err(e) = self.queue.mark_released(key).await {
                    // The blob is gone; a leftover queue row only causes a no-op release later
                    warn!("Released image {} but could not clear it from the queue: {}", key, e);
                }
            } else {
                unreleased.push(key.clone());
            }
        }

        if !unreleased.is_empty() {
            error!("{} image(s) left in the release queue: {:?}", unreleased.len(), unreleased);
        }
        unreleased
    }

    async fn release_one(&self, key: &str) -> bool {
        for attempt in 1..=RELEASE_ATTEMPTS {
            match self.store.release(key).await {
                Ok(()) => return true,
                Err(e) => warn!(
                    "Failed to release image {} (attempt {}/{}): {}",
                    key, attempt, RELEASE_ATTEMPTS, e
                ),
            }
        }
        false
    }

    /// Retry everything still queued from earlier runs
    pub async fn drain_pending(&self) -> KennelResult<usize> {
        let pending = self.queue.pending_keys().await?;
        if pending.is_empty() {
            return Ok(0);
        }

        info!("Releasing {} queued image(s)", pending.len());
        let unreleased = self.release(&pending).await;
        Ok(pending.len() - unreleased.len())
    }

    /// Warn when a newly referenced image key has no blob behind it
    pub async fn check_reference(&self, key: &str) {
        if is_placeholder_image(key) {
            return;
        }
        match self.store.exists(key).await {
            Ok(true) => {}
            Ok(false) => warn!("Image {} is referenced but not present in the image store", key),
            Err(e) => warn!("Could not check image {}: {}", key, e),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::memory_lifecycle;
    use crate::storage::repositories::image_release_repository::queue_images;
    use crate::storage::{DbConnection, ImageReleaseRepository, ImageReleaseStorage};

    async fn queue(db: &DbConnection, keys: &[&str]) {
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        let mut tx = db.pool().begin().await.unwrap();
        queue_images(&mut *tx, &keys, "test").await.unwrap();
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_release_retries_once() {
        let db = DbConnection::init_test().await.unwrap();
        let (lifecycle, store) = memory_lifecycle(&db);
        store.add("a.jpg");
        store.fail_releases("a.jpg", 1);
        queue(&db, &["a.jpg"]).await;

        let unreleased = lifecycle.release(&["a.jpg".to_string()]).await;
        assert!(unreleased.is_empty());
        assert!(!store.contains("a.jpg"));
        assert!(ImageReleaseRepository::new(db).pending_keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persistent_failure_stays_queued_until_drained() {
        let db = DbConnection::init_test().await.unwrap();
        let (lifecycle, store) = memory_lifecycle(&db);
        store.add("a.jpg");
        store.add("b.jpg");
        store.fail_releases("b.jpg", 2);
        queue(&db, &["a.jpg", "b.jpg"]).await;

        let unreleased = lifecycle.release(&["a.jpg".to_string(), "b.jpg".to_string()]).await;
        assert_eq!(unreleased, vec!["b.jpg"]);

        let queue_repo = ImageReleaseRepository::new(db.clone());
        assert_eq!(queue_repo.pending_keys().await.unwrap(), vec!["b.jpg"]);

        // Next startup: the store has recovered
        assert_eq!(lifecycle.drain_pending().await.unwrap(), 1);
        assert!(!store.contains("b.jpg"));
        assert!(queue_repo.pending_keys().await.unwrap().is_empty());
    }
}
