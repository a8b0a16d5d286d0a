//! Dashboard data model
//!
//! - **types**: entities as delivered by a data source (`User`, `Post`, `Comment`)
//! - **patch**: local overlay records layered on top of them

mod patch;
mod types;

pub use patch::{AddressPatch, Patch, PostPatch, UserPatch};
pub use types::{Address, Comment, EntityKind, Post, User};
