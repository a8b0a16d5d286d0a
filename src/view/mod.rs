//! Presentation Layer
//!
//! Page view-models for the posts and users screens plus the collaborators
//! they are wired to:
//!
//! - [`Notifier`]: fire-and-forget toasts ([`ToastLog`])
//! - [`Loader`]: loading indicator, shown through [`LoaderGuard`]
//! - [`TableWidget`]: paginated users table ([`DataTable`])
//!
//! Every mutating action writes the overlay, then re-runs fetch + merge +
//! render.

pub mod html;
mod loader;
mod notify;
mod posts;
pub mod table;
mod users;

pub use html::escape_html;
pub use loader::{Loader, LoaderGuard, LoadingIndicator};
pub use notify::{Notifier, Toast, ToastLevel, ToastLog};
pub use posts::{
    CommentsPanel, CommentsView, PostCard, PostForm, PostsEvent, PostsPage, LOCAL_POST_AUTHOR,
};
pub use table::{DataTable, TableWidget, UserRow};
pub use users::{UserForm, UsersEvent, UsersPage};

use crate::model::EntityKind;
use crate::source::SourceError;
use crate::storage::StorageError;
use thiserror::Error;

/// Why a page action did not complete
///
/// The user has already been notified by the time one of these is returned.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{} {id} not found", .kind.singular())]
    NotFound { kind: EntityKind, id: i64 },

    #[error("Fetch failed: {0}")]
    Fetch(#[from] SourceError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type ActionResult<T> = Result<T, ActionError>;
