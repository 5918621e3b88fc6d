//! Expiry Sweep Task
//!
//! Periodically removes expired entries from the in-memory store, the way a
//! memcached node reclaims space from items nobody reads again. Entries
//! orphaned by a namespace invalidation are reclaimed here too.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::store::MemoryStore;

/// Spawns a background task that sweeps expired entries every
/// `cleanup_interval_secs` seconds.
///
/// Returns the task's JoinHandle so shutdown can abort it.
///
/// # Example
/// ```ignore
/// let store = Arc::new(MemoryStore::new(10_000));
/// let cleanup_handle = spawn_cleanup_task(store.clone(), 1);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(store: Arc<MemoryStore>, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.cleanup_expired().await;
            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::KeyComposer;
    use crate::store::RemoteStore;

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let store = Arc::new(MemoryStore::new(100));
        let composer = KeyComposer::new("sweep", 250).unwrap();

        store
            .set(
                &composer.compose("ns", 0, b"expire_soon"),
                b"value".to_vec(),
                Duration::from_millis(200),
            )
            .await
            .unwrap();
        store
            .set(
                &composer.compose("ns", 0, b"long_lived"),
                b"value".to_vec(),
                Duration::from_secs(3600),
            )
            .await
            .unwrap();

        let handle = spawn_cleanup_task(store.clone(), 1);

        // Wait for the entry to expire and one sweep to run
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(store.len().await, 1, "Only the long-lived entry should remain");

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let store = Arc::new(MemoryStore::new(100));

        let handle = spawn_cleanup_task(store, 1);
        handle.abort();

        // Wait a bit and verify task is finished
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
