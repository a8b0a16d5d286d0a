//! Overlay Merge Engine
//!
//! Combines a base collection from a data source with the local overlay:
//!
//! ```text
//! base (positive ids) ──► drop soft-deleted ──► apply field overrides ─┐
//!                                                                     ├──► merged view
//! patches (negative ids, not deleted) ──► materialize ────────────────┘
//! ```
//!
//! Base entities keep their source order, local entities follow in patch
//! order. Nothing is re-sorted.

mod entities;

pub use entities::LOCAL_NAME_PLACEHOLDER;

use crate::model::Patch;
use std::collections::HashMap;

/// An entity kind that can be reconciled with its overlay patches
pub trait OverlayEntity: Sized {
    type Patch: Patch;

    fn id(&self) -> i64;

    /// Apply the overridable fields of `patch` onto `self`
    fn apply_patch(&mut self, patch: &Self::Patch);

    /// Build a full entity from a locally-created patch, defaulting
    /// display fields the patch does not carry
    fn materialize(patch: &Self::Patch) -> Self;
}

/// Merge `base` with `patches` into the list the pages render
pub fn merge<E: OverlayEntity>(base: Vec<E>, patches: &[E::Patch]) -> Vec<E> {
    // later duplicates win, matching a keyed lookup built in order
    let lookup: HashMap<i64, &E::Patch> = patches.iter().map(|p| (p.id(), p)).collect();

    let mut merged: Vec<E> = base
        .into_iter()
        .filter(|entity| {
            !lookup
                .get(&entity.id())
                .map(|patch| patch.is_deleted())
                .unwrap_or(false)
        })
        .map(|mut entity| {
            if let Some(patch) = lookup.get(&entity.id()) {
                entity.apply_patch(patch);
            }
            entity
        })
        .collect();

    merged.extend(
        patches
            .iter()
            .filter(|patch| patch.id() < 0 && !patch.is_deleted())
            .map(E::materialize),
    );

    merged
}
