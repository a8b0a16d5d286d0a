//! Per-kind merge rules
//!
//! Each kind enumerates its overridable fields explicitly. A patch field
//! only overrides when it is present and non-empty.

use super::OverlayEntity;
use crate::model::{Address, Post, PostPatch, User, UserPatch};

/// Display name given to a local user created without one
pub const LOCAL_NAME_PLACEHOLDER: &str = "(local) No name";

fn override_text(target: &mut String, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        *target = value.to_string();
    }
}

impl OverlayEntity for Post {
    type Patch = PostPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn apply_patch(&mut self, patch: &PostPatch) {
        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
        override_text(&mut self.title, patch.title.as_deref());
        override_text(&mut self.body, patch.body.as_deref());
    }

    fn materialize(patch: &PostPatch) -> Self {
        Post {
            user_id: patch.user_id.unwrap_or(0),
            id: patch.id,
            title: patch.title.clone().unwrap_or_default(),
            body: patch.body.clone().unwrap_or_default(),
        }
    }
}

impl OverlayEntity for User {
    type Patch = UserPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn apply_patch(&mut self, patch: &UserPatch) {
        override_text(&mut self.name, patch.name.as_deref());
        override_text(&mut self.email, patch.email.as_deref());
        override_text(&mut self.phone, patch.phone.as_deref());
        override_text(&mut self.address.city, patch.city());
    }

    fn materialize(patch: &UserPatch) -> Self {
        let name = patch
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(LOCAL_NAME_PLACEHOLDER);

        User {
            id: patch.id,
            name: name.to_string(),
            username: String::new(),
            email: patch.email.clone().unwrap_or_default(),
            phone: patch.phone.clone().unwrap_or_default(),
            website: String::new(),
            address: Address::city(patch.city().unwrap_or_default()),
        }
    }
}
