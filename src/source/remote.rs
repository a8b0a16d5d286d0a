//! Remote REST data source
//!
//! HTTP client for a JSONPlaceholder-compatible API:
//! `GET /users`, `GET /posts`, `GET /comments` and `GET /comments?postId=N`.

use super::{DataSource, SourceError};
use crate::model::{Comment, Post, User};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Public endpoint used when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Configuration for the remote source
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the API (e.g., "https://jsonplaceholder.typicode.com")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

/// Data source backed by the remote REST API
pub struct RemoteSource {
    client: Client,
    config: RemoteConfig,
}

impl RemoteSource {
    /// Create a new remote source with the given configuration
    pub fn new(config: RemoteConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(concat!("userdash/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// GET `path` and decode a JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let url = self.url(path);
        tracing::debug!(url = %url, "Fetching from remote source");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SourceError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let body = response.text().await.map_err(classify)?;
        serde_json::from_str(&body).map_err(|e| SourceError::Decode(e.to_string()))
    }
}

fn classify(e: reqwest::Error) -> SourceError {
    if e.is_timeout() {
        SourceError::Timeout
    } else if e.is_connect() {
        SourceError::Unavailable
    } else {
        SourceError::Request(e)
    }
}

#[async_trait]
impl DataSource for RemoteSource {
    fn name(&self) -> &str {
        "remote"
    }

    async fn fetch_users(&self) -> Result<Vec<User>, SourceError> {
        self.get_json("users", &[]).await
    }

    async fn fetch_posts(&self) -> Result<Vec<Post>, SourceError> {
        self.get_json("posts", &[]).await
    }

    async fn fetch_comments(&self, post_id: i64) -> Result<Vec<Comment>, SourceError> {
        self.get_json("comments", &[("postId", post_id.to_string())])
            .await
    }

    async fn fetch_all_comments(&self) -> Result<Vec<Comment>, SourceError> {
        self.get_json("comments", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve one canned HTTP response and report the request line
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                if n == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            let text = String::from_utf8_lossy(&request).to_string();
            let request_line = text.lines().next().unwrap_or_default().to_string();
            tx.send(request_line).ok();
        });

        (format!("http://{}", addr), rx)
    }

    fn source(base_url: String) -> RemoteSource {
        RemoteSource::new(RemoteConfig {
            base_url,
            request_timeout_ms: 5_000,
        })
        .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = RemoteConfig::default();
        assert_eq!(config.base_url, "https://jsonplaceholder.typicode.com");
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let remote = source("http://example.test/".to_string());
        assert_eq!(remote.url("posts"), "http://example.test/posts");
    }

    #[tokio::test]
    async fn test_fetch_posts_decodes_array() {
        let (base, request) = serve_once(
            "200 OK",
            r#"[{"userId":1,"id":1,"title":"hello","body":"world"}]"#,
        )
        .await;

        let posts = source(base).fetch_posts().await.unwrap();
        assert_eq!(posts, vec![Post::new(1, 1, "hello", "world")]);
        assert!(request.await.unwrap().starts_with("GET /posts "));
    }

    #[tokio::test]
    async fn test_fetch_comments_sends_post_id_query() {
        let (base, request) = serve_once("200 OK", "[]").await;

        let comments = source(base).fetch_comments(5).await.unwrap();
        assert!(comments.is_empty());
        assert!(request.await.unwrap().starts_with("GET /comments?postId=5 "));
    }

    #[tokio::test]
    async fn test_error_status_is_api_error() {
        let (base, _request) = serve_once("500 Internal Server Error", "boom").await;

        let err = source(base).fetch_users().await.unwrap_err();
        assert!(matches!(err, SourceError::ApiError { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_non_array_body_is_decode_error() {
        let (base, _request) = serve_once("200 OK", r#"{"error":"nope"}"#).await;

        let err = source(base).fetch_users().await.unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
    }
}
