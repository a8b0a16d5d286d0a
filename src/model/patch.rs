//! Overlay patches
//!
//! A patch is a local, durable record of field overrides and/or a
//! soft-deletion for one entity id. Every field except `id` is optional so
//! that a stored patch round-trips exactly: an absent `deleted` stays absent.

use super::types::EntityKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Behaviour shared by the per-kind patch types
pub trait Patch: Serialize + DeserializeOwned + Clone + std::fmt::Debug {
    /// Entity collection this patch belongs to
    const KIND: EntityKind;

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);

    /// Soft-deletion flag, absent counts as not deleted
    fn is_deleted(&self) -> bool;

    fn set_deleted(&mut self, deleted: bool);

    /// A patch carrying nothing but `{id, deleted: true}`
    fn tombstone(id: i64) -> Self;

    /// Layer `fields` over `self`: every field present in `fields` wins,
    /// every absent one keeps its current value.
    fn overlay(&mut self, fields: Self);
}

/// Local changes to a post
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
}

impl PostPatch {
    /// Patch for a post created locally
    pub fn local(id: i64, user_id: i64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            user_id: Some(user_id),
            title: Some(title.into()),
            body: Some(body.into()),
            deleted: None,
        }
    }

    /// Patch produced by the edit form
    pub fn edit(id: i64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            title: Some(title.into()),
            body: Some(body.into()),
            ..Self::default()
        }
    }
}

impl Patch for PostPatch {
    const KIND: EntityKind = EntityKind::Posts;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn is_deleted(&self) -> bool {
        self.deleted.unwrap_or(false)
    }

    fn set_deleted(&mut self, deleted: bool) {
        self.deleted = Some(deleted);
    }

    fn tombstone(id: i64) -> Self {
        Self {
            id,
            deleted: Some(true),
            ..Self::default()
        }
    }

    fn overlay(&mut self, fields: Self) {
        self.id = fields.id;
        self.user_id = fields.user_id.or(self.user_id);
        self.title = fields.title.or(self.title.take());
        self.body = fields.body.or(self.body.take());
        self.deleted = fields.deleted.or(self.deleted);
    }
}

/// Nested address overrides; only the city is editable
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddressPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Local changes to a user
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserPatch {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
}

impl UserPatch {
    /// Patch carrying every editable user field
    pub fn fields(
        id: i64,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: Some(name.into()),
            email: Some(email.into()),
            phone: Some(phone.into()),
            address: Some(AddressPatch {
                city: Some(city.into()),
            }),
            deleted: None,
        }
    }

    /// City override, if any
    pub fn city(&self) -> Option<&str> {
        self.address.as_ref().and_then(|a| a.city.as_deref())
    }
}

impl Patch for UserPatch {
    const KIND: EntityKind = EntityKind::Users;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn is_deleted(&self) -> bool {
        self.deleted.unwrap_or(false)
    }

    fn set_deleted(&mut self, deleted: bool) {
        self.deleted = Some(deleted);
    }

    fn tombstone(id: i64) -> Self {
        Self {
            id,
            deleted: Some(true),
            ..Self::default()
        }
    }

    fn overlay(&mut self, fields: Self) {
        self.id = fields.id;
        self.name = fields.name.or(self.name.take());
        self.email = fields.email.or(self.email.take());
        self.phone = fields.phone.or(self.phone.take());
        // the address object is replaced as a whole, like any other field
        self.address = fields.address.or(self.address.take());
        self.deleted = fields.deleted.or(self.deleted);
    }
}
