//! Cache Engine Module
//!
//! Main cache engine: an identifier -> item table with count-based admission,
//! size-based storage tiering, and a background expiry sweeper.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{oneshot, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{codec, Blob, Item, Payload, StorageDir};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::models::WriteRequest;
use crate::tasks::spawn_sweeper;

/// Identifier -> item table, shared with the sweeper task.
pub(crate) type ItemTable = Arc<RwLock<HashMap<String, Item>>>;

// == Lifecycle ==
enum Lifecycle {
    Idle,
    Running {
        shutdown: oneshot::Sender<()>,
        sweeper: JoinHandle<()>,
    },
    Stopped,
}

// == Cache Engine ==
/// Concurrent item store with expiry sweeping and file-backed storage for
/// oversized values.
///
/// Reads share the table lock; writes, erases and sweeps take it exclusively.
/// Expiry is enforced only by sweeps: [`CacheEngine::read`] returns expired
/// items until the next sweep removes them.
///
/// Dropping the engine ends the sweeper. The storage directory is removed
/// once the engine and every item read from it are gone.
pub struct CacheEngine {
    config: CacheConfig,
    storage: Arc<StorageDir>,
    items: ItemTable,
    lifecycle: Mutex<Lifecycle>,
}

impl CacheEngine {
    // == Constructor ==
    /// Creates an engine with an empty table.
    ///
    /// Applies config defaults, then deletes and recreates the storage
    /// directory. Engines in the same process must use distinct ids.
    pub fn new(config: CacheConfig) -> Result<Self> {
        let config = config.normalized();
        let storage = StorageDir::create(config.storage_dir())?;

        info!(
            "Cache '{}' initialized: max_items={}, size_limit={}B, cleanup_interval={:?}, dir={}",
            config.id,
            config.max_items,
            config.size_limit,
            config.cleanup_interval,
            storage.path().display()
        );

        Ok(Self {
            config,
            storage,
            items: Arc::new(RwLock::new(HashMap::new())),
            lifecycle: Mutex::new(Lifecycle::Idle),
        })
    }

    /// Returns the normalized configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the directory holding file-backed items.
    pub fn storage_dir(&self) -> &Path {
        self.storage.path()
    }

    // == Start ==
    /// Launches the expiry sweeper.
    ///
    /// Calling it on a running engine does nothing. A stopped engine stays
    /// stopped.
    pub async fn start(&self) {
        let mut lifecycle = self.lifecycle.lock().await;
        match *lifecycle {
            Lifecycle::Idle => {
                let (shutdown, signal) = oneshot::channel();
                let sweeper = spawn_sweeper(
                    Arc::clone(&self.items),
                    self.config.cleanup_interval,
                    signal,
                );
                *lifecycle = Lifecycle::Running { shutdown, sweeper };
                info!("Cache '{}' started", self.config.id);
            }
            Lifecycle::Running { .. } => warn!("Cache '{}' is already running", self.config.id),
            Lifecycle::Stopped => warn!("Cache '{}' was stopped and cannot restart", self.config.id),
        }
    }

    // == Stop ==
    /// Stops the expiry sweeper and waits for it to exit.
    ///
    /// Safe to call repeatedly and on an engine that was never started.
    pub async fn stop(&self) {
        let previous = {
            let mut lifecycle = self.lifecycle.lock().await;
            std::mem::replace(&mut *lifecycle, Lifecycle::Stopped)
        };

        if let Lifecycle::Running { shutdown, sweeper } = previous {
            // Err only if the sweeper already exited
            let _ = shutdown.send(());
            if let Err(e) = sweeper.await {
                warn!("Expiry sweeper for '{}' ended abnormally: {}", self.config.id, e);
            }
            info!("Cache '{}' stopped", self.config.id);
        }
    }

    // == Write ==
    /// Stores a value, replacing any item under the same id.
    ///
    /// Fails with [`CacheError::CapacityExceeded`] while the table holds
    /// `max_items` items, even when `id` is already present. Values whose
    /// encoding exceeds `size_limit` bytes are written to a blob file;
    /// smaller ones stay in memory. Blob I/O runs before the table lock is
    /// taken, and admission is checked again right before insertion.
    pub async fn write<T: Serialize>(&self, request: WriteRequest<T>) -> Result<()> {
        let WriteRequest { id, value, expiry } = request;

        self.check_admission(&*self.items.read().await)?;

        let encoded = codec::encode(&value)?;
        let payload = if encoded.len() > self.config.size_limit {
            debug!("Item '{}' is {} bytes, storing to file", id, encoded.len());
            Payload::File(Arc::new(self.write_blob(encoded).await?))
        } else {
            Payload::Memory(encoded.into())
        };
        let item = Item::new(id.clone(), payload, expiry);

        let mut items = self.items.write().await;
        if let Err(e) = self.check_admission(&items) {
            drop(items);
            release(vec![item]).await;
            return Err(e);
        }
        let replaced = items.insert(id, item);
        drop(items);

        release(replaced.into_iter().collect()).await;
        Ok(())
    }

    // == Read ==
    /// Returns the item stored under `id`.
    ///
    /// Expiry is not checked. Decode the value with [`Item::decode`].
    pub async fn read(&self, id: &str) -> Result<Item> {
        self.items
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| CacheError::NotFound(id.to_string()))
    }

    // == Erase ==
    /// Removes the item stored under `id`.
    ///
    /// A blob backing the item is deleted once no reader holds the item.
    pub async fn erase(&self, id: &str) -> Result<()> {
        let removed = self.items.write().await.remove(id);
        match removed {
            Some(item) => {
                release(vec![item]).await;
                Ok(())
            }
            None => Err(CacheError::NotFound(id.to_string())),
        }
    }

    // == Remove Expired ==
    /// Runs one sweep pass now and returns the number of items removed.
    pub async fn remove_expired(&self) -> usize {
        remove_expired(&self.items, Utc::now()).await
    }

    // == Length ==
    /// Returns the current number of items.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    // == Is Empty ==
    /// Returns true if the table holds no items.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    fn check_admission(&self, items: &HashMap<String, Item>) -> Result<()> {
        if items.len() >= self.config.max_items {
            return Err(CacheError::CapacityExceeded {
                max_items: self.config.max_items,
            });
        }
        Ok(())
    }

    async fn write_blob(&self, encoded: Vec<u8>) -> Result<Blob> {
        let storage = Arc::clone(&self.storage);
        tokio::task::spawn_blocking(move || storage.write_blob(&encoded))
            .await
            .map_err(|e| CacheError::Internal(format!("Blob write task failed: {}", e)))?
    }
}

/// Drops items taken out of the table. Dropping the last reference to a
/// blob deletes its file, so file-tier items are dropped on the blocking pool.
async fn release(removed: Vec<Item>) {
    if !removed.iter().any(Item::is_file_backed) {
        return;
    }
    if let Err(e) = tokio::task::spawn_blocking(move || drop(removed)).await {
        warn!("Failed to release removed items: {}", e);
    }
}

// == Sweep ==
/// Removes every item whose expiry is before `now`. Returns the number removed.
///
/// Removed items are released after the lock is dropped, so blob deletion
/// never blocks other operations.
pub(crate) async fn remove_expired(
    items: &RwLock<HashMap<String, Item>>,
    now: DateTime<Utc>,
) -> usize {
    let expired: Vec<Item> = {
        let mut items = items.write().await;
        let ids: Vec<String> = items
            .iter()
            .filter(|(_, item)| item.is_expired_at(now))
            .map(|(id, _)| id.clone())
            .collect();
        ids.iter().filter_map(|id| items.remove(id)).collect()
    };
    let removed = expired.len();
    release(expired).await;
    removed
}
