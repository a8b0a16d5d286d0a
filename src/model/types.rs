//! Entity types shared by the data sources, the merge engine and the pages
//!
//! JSON field names follow the remote API (`userId`, `postId`), so the same
//! types decode both fixture copies and live responses. Fields the dashboard
//! never displays are dropped on decode.

use serde::{Deserialize, Serialize};

/// Postal address of a user
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub suite: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zipcode: String,
}

impl Address {
    /// Address with only a city set
    pub fn city(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            ..Self::default()
        }
    }
}

/// A user record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub address: Address,
}

impl User {
    /// Create a user with the fields the dashboard displays
    pub fn new(
        id: i64,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            username: String::new(),
            email: email.into(),
            phone: phone.into(),
            website: String::new(),
            address: Address::city(city),
        }
    }
}

/// A post record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default)]
    pub user_id: i64,
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl Post {
    pub fn new(user_id: i64, id: i64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            user_id,
            id,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// A comment attached to a post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub post_id: i64,
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub body: String,
}

/// The two entity collections the dashboard manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Users,
    Posts,
}

impl EntityKind {
    /// Key under which the overlay patches of this kind are persisted
    pub fn storage_key(&self) -> &'static str {
        match self {
            EntityKind::Users => "users_local",
            EntityKind::Posts => "posts_local",
        }
    }

    /// Singular display name ("User", "Post")
    pub fn singular(&self) -> &'static str {
        match self {
            EntityKind::Users => "User",
            EntityKind::Posts => "Post",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Users => write!(f, "users"),
            EntityKind::Posts => write!(f, "posts"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_remote_user_ignores_extra_fields() {
        let json = r#"{
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "address": {
                "street": "Kulas Light",
                "suite": "Apt. 556",
                "city": "Gwenborough",
                "zipcode": "92998-3874",
                "geo": { "lat": "-37.3159", "lng": "81.1496" }
            },
            "phone": "1-770-736-8031 x56442",
            "website": "hildegard.org",
            "company": { "name": "Romaguera-Crona" }
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.address.city, "Gwenborough");
        assert_eq!(user.address.street, "Kulas Light");
        assert_eq!(user.website, "hildegard.org");
    }

    #[test]
    fn test_post_uses_camel_case_fields() {
        let post = Post::new(3, 7, "t", "b");
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["userId"], 3);
        assert_eq!(json["id"], 7);

        let back: Post = serde_json::from_value(json).unwrap();
        assert_eq!(back, post);
    }

    #[test]
    fn test_storage_keys() {
        assert_eq!(EntityKind::Posts.storage_key(), "posts_local");
        assert_eq!(EntityKind::Users.storage_key(), "users_local");
        assert_eq!(EntityKind::Users.to_string(), "users");
    }
}
