//! Data Sources
//!
//! Supplies the base collections the overlay is merged onto:
//!
//! - **fixture**: hardcoded seed dataset (5 users, 6 posts, 8 comments)
//! - **remote**: JSONPlaceholder-style REST API over HTTP
//!
//! Which one backs the dashboard is decided once, from the
//! `source.use_fixtures` config flag.

mod fixture;
mod remote;

pub use fixture::FixtureSource;
pub use remote::{RemoteConfig, RemoteSource, DEFAULT_BASE_URL};

use crate::config::SourceConfig;
use crate::model::{Comment, Post, User};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Common trait for every data source
///
/// Every call returns freshly owned values; callers may mutate the result
/// without affecting later calls.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Short name for logs ("fixture", "remote")
    fn name(&self) -> &str;

    async fn fetch_users(&self) -> Result<Vec<User>, SourceError>;

    async fn fetch_posts(&self) -> Result<Vec<Post>, SourceError>;

    /// Comments of a single post
    async fn fetch_comments(&self, post_id: i64) -> Result<Vec<Comment>, SourceError>;

    /// Comments of every post
    async fn fetch_all_comments(&self) -> Result<Vec<Comment>, SourceError>;
}

/// Build the data source selected by the configuration
pub fn build_source(config: &SourceConfig) -> Result<Arc<dyn DataSource>, SourceError> {
    if config.use_fixtures {
        tracing::info!("Using fixture data source");
        Ok(Arc::new(FixtureSource::new()))
    } else {
        tracing::info!("Using remote data source at {}", config.base_url);
        let remote = RemoteSource::new(RemoteConfig {
            base_url: config.base_url.clone(),
            request_timeout_ms: config.request_timeout_secs.saturating_mul(1000),
        })?;
        Ok(Arc::new(remote))
    }
}

/// Errors that can occur while fetching from a data source
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Data source unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Failed to decode response: {0}")]
    Decode(String),
}
