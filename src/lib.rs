//! # Userdash
//!
//! Users and posts dashboard over a read-only data source. Local edits,
//! additions and deletions never reach the source: they are stored as
//! overlay patches and merged onto every fresh fetch.
//!
//! ## Modules
//!
//! - [`source`]: fixture and remote data sources
//! - [`storage`]: durable key-value backends (SQLite, in-memory)
//! - [`overlay`]: patch and favorites stores on top of a backend
//! - [`merge`]: the overlay merge of base entities and patches
//! - [`view`]: posts and users page view-models, rendering, toasts
//! - [`app`]: wiring from [`Config`] to ready-to-use pages
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use userdash::{AppContext, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ctx = AppContext::ephemeral(Config::default())?;
//!
//!     let mut posts = ctx.posts_page();
//!     posts.refresh().await?;
//!     posts.delete(3).await?;
//!     let id = posts.add("Derby recap", "Late winner in stoppage time").await?;
//!
//!     println!("added local post {} ({} posts shown)", id, posts.cards().len());
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod config;
pub mod merge;
pub mod model;
pub mod overlay;
pub mod source;
pub mod storage;
pub mod view;

pub use app::{AppContext, AppError};

pub use config::{Config, ConfigError, LoggingConfig, SourceConfig, UiConfig};

pub use model::{Address, Comment, EntityKind, Post, PostPatch, User, UserPatch};

pub use merge::{merge, OverlayEntity};

pub use overlay::{FavoritesStore, OverlayStore};

pub use source::{build_source, DataSource, FixtureSource, RemoteSource, SourceError};

pub use storage::{KeyValueStore, MemoryStore, SqliteStore, StorageError, StorageResult};

pub use view::{
    ActionError, ActionResult, Notifier, PostsEvent, PostsPage, ToastLevel, ToastLog, UsersEvent,
    UsersPage,
};
