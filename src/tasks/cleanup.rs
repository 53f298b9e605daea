//! TTL Sweep Task
//!
//! Background task that periodically removes expired entries from the
//! in-process cache backend.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryStore;

/// Spawns a background task that periodically drops expired entries.
///
/// Reads never return expired entries anyway; the sweep only bounds memory
/// held by entries nobody asks for again.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task(store: Arc<MemoryStore>, cleanup_interval_secs: u64) -> JoinHandle<()> {
    // A zero interval would spin
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.cleanup_expired().await;

            if removed > 0 {
                info!("Cache sweep: removed {} expired entries", removed);
            } else {
                debug!("Cache sweep: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::KeyValueStore;

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let store = Arc::new(MemoryStore::new());
        store
            .set("expire_soon", b"value".to_vec(), Duration::from_millis(200))
            .await
            .unwrap();

        let handle = spawn_cleanup_task(store.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        // Swept without anyone reading the key
        assert!(store.is_empty().await, "Expired entry should have been swept");

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let store = Arc::new(MemoryStore::new());
        store
            .set("long_lived", b"value".to_vec(), Duration::from_secs(3600))
            .await
            .unwrap();

        let handle = spawn_cleanup_task(store.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        let value = store.get("long_lived").await.unwrap();
        assert_eq!(value.as_deref(), Some(&b"value"[..]));

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let store = Arc::new(MemoryStore::new());

        let handle = spawn_cleanup_task(store, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
