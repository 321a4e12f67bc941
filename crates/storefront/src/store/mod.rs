//! Client-side state containers persisted through a [`Storage`] backend.
//!
//! Each store owns its items, notifies subscribers synchronously through a
//! `tokio::sync::watch` channel, and writes a snapshot after every mutation.

mod cart;
mod wishlist;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::{Storage, StorageError};

pub use cart::{CART_STORAGE_KEY, CartLine, CartStore};
pub use wishlist::{WISHLIST_STORAGE_KEY, WishlistStore};

/// Snapshot format version written by this crate.
pub const SNAPSHOT_VERSION: u32 = 1;

/// On-disk envelope around a store's items.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot<T> {
    version: u32,
    updated_at: DateTime<Utc>,
    items: T,
}

/// Read a store's items, starting empty on a missing, unreadable or
/// incompatible snapshot.
fn load_items<I: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Vec<I> {
    let raw = match storage.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "failed to read snapshot, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Snapshot<Vec<I>>>(&raw) {
        Ok(snapshot) if snapshot.version == SNAPSHOT_VERSION => snapshot.items,
        Ok(snapshot) => {
            warn!(
                key,
                version = snapshot.version,
                "unsupported snapshot version, starting empty"
            );
            Vec::new()
        }
        Err(e) => {
            warn!(key, error = %e, "corrupt snapshot, starting empty");
            Vec::new()
        }
    }
}

/// Write a store's items under `key`.
fn save_items<I: Serialize>(
    storage: &dyn Storage,
    key: &str,
    items: &[I],
) -> Result<(), StorageError> {
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        updated_at: Utc::now(),
        items,
    };
    let json = serde_json::to_string(&snapshot).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    storage.save(key, &json)
}

/// Persist after a mutation; a failed write leaves the in-memory state
/// authoritative.
fn persist_or_warn<I: Serialize>(storage: &dyn Storage, key: &str, items: &[I]) {
    if let Err(e) = save_items(storage, key, items) {
        warn!(key, error = %e, "failed to persist snapshot");
    }
}
