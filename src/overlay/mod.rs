//! Local Overlay Store
//!
//! Persists overlay patches per entity kind as one JSON array per storage
//! key. Reads fail soft: a missing, unreadable or malformed value is an
//! empty patch list. Writes replace the whole list and report failures.
//!
//! Invariants kept by the mutators:
//! - at most one patch per id
//! - `upsert` on an existing patch clears its soft-deletion
//! - `mark_deleted` is idempotent

mod favorites;

pub use favorites::{FavoritesStore, FAVORITES_KEY};

use crate::model::Patch;
use crate::storage::{KeyValueStore, StorageResult};
use std::sync::Arc;

/// Keyed store of overlay patches on top of a durable key-value store
#[derive(Clone)]
pub struct OverlayStore {
    kv: Arc<dyn KeyValueStore>,
}

impl OverlayStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load every patch of kind `P`
    pub fn get<P: Patch>(&self) -> Vec<P> {
        let key = P::KIND.storage_key();

        let raw = match self.kv.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read local patches");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(patches) => patches,
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring malformed local patches");
                Vec::new()
            }
        }
    }

    /// Persist the full patch list of kind `P`, replacing prior contents
    pub fn set<P: Patch>(&self, patches: &[P]) -> StorageResult<()> {
        let json = serde_json::to_string(patches)?;
        self.kv.set_item(P::KIND.storage_key(), &json)
    }

    /// Create or update the patch for `id`
    ///
    /// A new patch is `fields` itself; an existing one becomes
    /// `{...old, ...fields, deleted: false}`.
    pub fn upsert<P: Patch>(&self, id: i64, mut fields: P) -> StorageResult<()> {
        fields.set_id(id);
        let mut patches = self.get::<P>();

        match patches.iter_mut().find(|p| p.id() == id) {
            Some(existing) => {
                existing.overlay(fields);
                existing.set_deleted(false);
            }
            None => patches.push(fields),
        }

        tracing::debug!(kind = %P::KIND, id, "Upserted local patch");
        self.set(&patches)
    }

    /// Soft-delete `id`, creating `{id, deleted: true}` if no patch exists
    pub fn mark_deleted<P: Patch>(&self, id: i64) -> StorageResult<()> {
        let mut patches = self.get::<P>();

        match patches.iter_mut().find(|p| p.id() == id) {
            Some(existing) => existing.set_deleted(true),
            None => patches.push(P::tombstone(id)),
        }

        tracing::debug!(kind = %P::KIND, id, "Marked local patch deleted");
        self.set(&patches)
    }

    /// Synthetic id for the next locally-created entity of kind `P`
    ///
    /// One below the smallest stored id when that is negative, otherwise -1.
    /// Tombstoned local ids still count, so ids are never reused.
    pub fn next_local_id<P: Patch>(&self) -> i64 {
        next_local_id(&self.get::<P>())
    }

    /// Append a locally-created entity and return its id
    pub fn insert_local<P: Patch>(&self, mut patch: P) -> StorageResult<i64> {
        let mut patches = self.get::<P>();
        let id = next_local_id(&patches);
        patch.set_id(id);
        patches.push(patch);

        tracing::debug!(kind = %P::KIND, id, "Added local entity");
        self.set(&patches)?;
        Ok(id)
    }
}

fn next_local_id<P: Patch>(patches: &[P]) -> i64 {
    match patches.iter().map(|p| p.id()).min() {
        Some(min) if min < 0 => min.saturating_sub(1),
        _ => -1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PostPatch, UserPatch};
    use crate::storage::MemoryStore;

    fn store() -> (Arc<MemoryStore>, OverlayStore) {
        let kv = Arc::new(MemoryStore::new());
        (kv.clone(), OverlayStore::new(kv))
    }

    #[test]
    fn test_get_missing_is_empty() {
        let (_, overlay) = store();
        assert!(overlay.get::<PostPatch>().is_empty());
        assert!(overlay.get::<UserPatch>().is_empty());
    }

    #[test]
    fn test_get_malformed_is_empty() {
        let (kv, overlay) = store();
        kv.set_item("posts_local", "{not json").unwrap();
        assert!(overlay.get::<PostPatch>().is_empty());

        kv.set_item("posts_local", "null").unwrap();
        assert!(overlay.get::<PostPatch>().is_empty());
    }

    #[test]
    fn test_set_then_get_round_trips() {
        let (_, overlay) = store();
        let mut edited = PostPatch::edit(2, "t", "b");
        edited.set_deleted(false);
        let patches = vec![
            PostPatch::tombstone(3),
            edited,
            PostPatch::local(-1, 1, "T", "B"),
        ];

        overlay.set(&patches).unwrap();
        assert_eq!(overlay.get::<PostPatch>(), patches);
    }

    #[test]
    fn test_user_patches_round_trip() {
        let (kv, overlay) = store();
        let city_only = UserPatch {
            id: 2,
            address: Some(crate::model::AddressPatch {
                city: Some("Luxor".to_string()),
            }),
            ..UserPatch::default()
        };
        let patches = vec![
            city_only,
            UserPatch::fields(-1, "Mona", "m@example.com", "", "Aswan"),
        ];

        overlay.set(&patches).unwrap();
        assert_eq!(overlay.get::<UserPatch>(), patches);

        let raw = kv.get_item("users_local").unwrap().unwrap();
        assert!(raw.starts_with(r#"[{"id":2,"address":{"city":"Luxor"}},"#));
        assert!(!raw.contains("deleted"));
    }

    #[test]
    fn test_next_local_id_saturates_at_min() {
        let (_, overlay) = store();
        overlay.set(&[PostPatch::tombstone(i64::MIN)]).unwrap();

        assert_eq!(overlay.next_local_id::<PostPatch>(), i64::MIN);
    }

    #[test]
    fn test_kinds_use_separate_keys() {
        let (kv, overlay) = store();
        overlay.mark_deleted::<PostPatch>(1).unwrap();

        assert!(overlay.get::<UserPatch>().is_empty());
        assert!(kv.get_item("users_local").unwrap().is_none());
        assert!(kv.get_item("posts_local").unwrap().is_some());
    }

    #[test]
    fn test_mark_deleted_creates_tombstone() {
        let (kv, overlay) = store();
        overlay.mark_deleted::<PostPatch>(3).unwrap();

        assert_eq!(
            kv.get_item("posts_local").unwrap().as_deref(),
            Some(r#"[{"id":3,"deleted":true}]"#)
        );
    }

    #[test]
    fn test_mark_deleted_is_idempotent() {
        let (_, overlay) = store();
        overlay.upsert(4, PostPatch::edit(4, "t", "b")).unwrap();

        overlay.mark_deleted::<PostPatch>(4).unwrap();
        let once = overlay.get::<PostPatch>();
        overlay.mark_deleted::<PostPatch>(4).unwrap();
        let twice = overlay.get::<PostPatch>();

        assert_eq!(once, twice);
        assert_eq!(twice.len(), 1);
        assert!(twice[0].is_deleted());
        assert_eq!(twice[0].title.as_deref(), Some("t"));
    }

    #[test]
    fn test_upsert_undeletes_and_keeps_one_patch_per_id() {
        let (_, overlay) = store();
        overlay.mark_deleted::<UserPatch>(2).unwrap();
        overlay
            .upsert(2, UserPatch::fields(2, "Ahmed", "a@example.com", "", "Giza"))
            .unwrap();

        let patches = overlay.get::<UserPatch>();
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].deleted, Some(false));
        assert_eq!(patches[0].name.as_deref(), Some("Ahmed"));
    }

    #[test]
    fn test_upsert_appends_new_patch_as_given() {
        let (_, overlay) = store();
        overlay.upsert(5, PostPatch::edit(0, "t", "b")).unwrap();

        let patches = overlay.get::<PostPatch>();
        assert_eq!(patches, vec![PostPatch::edit(5, "t", "b")]);
    }

    #[test]
    fn test_next_local_id_sequence() {
        let (_, overlay) = store();
        assert_eq!(overlay.next_local_id::<PostPatch>(), -1);

        // positive ids alone do not move the sequence
        overlay.mark_deleted::<PostPatch>(3).unwrap();
        assert_eq!(overlay.next_local_id::<PostPatch>(), -1);

        for expected in [-1, -2, -3] {
            let id = overlay
                .insert_local(PostPatch::local(0, 1, "t", "b"))
                .unwrap();
            assert_eq!(id, expected);
        }
        assert_eq!(overlay.next_local_id::<PostPatch>(), -4);
    }

    #[test]
    fn test_deleted_local_id_is_not_reused() {
        let (_, overlay) = store();
        let id = overlay
            .insert_local(PostPatch::local(0, 1, "t", "b"))
            .unwrap();
        overlay.mark_deleted::<PostPatch>(id).unwrap();

        assert_eq!(overlay.next_local_id::<PostPatch>(), -2);
    }
}
