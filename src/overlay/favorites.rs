//! Favorite users
//!
//! An ordered set of user ids stored under its own key, independent of the
//! overlay patches.

use crate::storage::{KeyValueStore, StorageResult};
use std::sync::Arc;

/// Storage key of the favorite id list
pub const FAVORITES_KEY: &str = "favorites";

/// Persistent set of favorite user ids
#[derive(Clone)]
pub struct FavoritesStore {
    kv: Arc<dyn KeyValueStore>,
}

impl FavoritesStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Current favorites in insertion order, empty if unreadable
    pub fn get(&self) -> Vec<i64> {
        match self.kv.get_item(FAVORITES_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Ignoring malformed favorites");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read favorites");
                Vec::new()
            }
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.get().contains(&id)
    }

    /// Flip membership of `id` and return whether it is now a favorite
    pub fn toggle(&self, id: i64) -> StorageResult<bool> {
        let mut favorites = self.get();

        let now_favorite = match favorites.iter().position(|&f| f == id) {
            Some(idx) => {
                favorites.remove(idx);
                false
            }
            None => {
                favorites.push(id);
                true
            }
        };

        let json = serde_json::to_string(&favorites)?;
        self.kv.set_item(FAVORITES_KEY, &json)?;

        tracing::debug!(id, favorite = now_favorite, "Toggled favorite");
        Ok(now_favorite)
    }
}
