//! Application Context
//!
//! Wires configuration, data source, storage and collaborators together
//! and hands out the page view-models.

use crate::config::Config;
use crate::overlay::{FavoritesStore, OverlayStore};
use crate::source::{build_source, DataSource, SourceError};
use crate::storage::{KeyValueStore, MemoryStore, SqliteStore, StorageError};
use crate::view::{DataTable, LoadingIndicator, PostsPage, ToastLog, UsersPage};
use std::sync::Arc;
use thiserror::Error;

/// Shared state every page is built from
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub source: Arc<dyn DataSource>,
    pub store: Arc<dyn KeyValueStore>,
    pub toasts: Arc<ToastLog>,
    pub loader: Arc<LoadingIndicator>,
}

impl AppContext {
    /// Build from config, persisting to SQLite under `storage.data_dir`
    pub fn new(config: Config) -> Result<Self, AppError> {
        let store = SqliteStore::open(config.storage.resolved_data_dir())?;
        tracing::info!("Local storage: {:?}", store.path());
        Self::with_store(config, Arc::new(store))
    }

    /// Build from config with nothing written to disk
    pub fn ephemeral(config: Config) -> Result<Self, AppError> {
        tracing::info!("Using in-memory local storage");
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// Build from config with an explicit storage backend
    pub fn with_store(config: Config, store: Arc<dyn KeyValueStore>) -> Result<Self, AppError> {
        let source = build_source(&config.source)?;
        Ok(Self::from_parts(config, source, store))
    }

    pub fn from_parts(
        config: Config,
        source: Arc<dyn DataSource>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            source,
            store,
            toasts: Arc::new(ToastLog::new()),
            loader: Arc::new(LoadingIndicator::new()),
        }
    }

    pub fn overlay(&self) -> OverlayStore {
        OverlayStore::new(self.store.clone())
    }

    pub fn favorites(&self) -> FavoritesStore {
        FavoritesStore::new(self.store.clone())
    }

    pub fn posts_page(&self) -> PostsPage {
        PostsPage::new(
            self.source.clone(),
            self.overlay(),
            self.toasts.clone(),
            self.loader.clone(),
        )
    }

    pub fn users_page(&self) -> UsersPage {
        UsersPage::new(
            self.source.clone(),
            self.overlay(),
            self.favorites(),
            self.toasts.clone(),
            self.loader.clone(),
            Box::new(DataTable::users(self.config.ui.page_length)),
        )
    }
}

/// Errors raised while starting the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data source error: {0}")]
    Source(#[from] SourceError),
}
