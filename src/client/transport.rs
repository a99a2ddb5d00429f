//! HTTP transport for bootstrap documents and RDAP queries

use crate::error::{RdapError, Result};
use crate::response::ErrorResponse;
use crate::types::ClientConfig;
use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::header::{HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// `Accept` header sent with every request
pub const RDAP_ACCEPT: &str = "application/rdap+json,application/json";

/// Process-unique identity of a transport, shared by its clones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransportId(u64);

impl TransportId {
    /// Allocate a fresh identity
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Something that can fetch a URL and hand back the response body
#[async_trait]
pub trait Transport: Send + Sync {
    /// Identity used to key cached bootstrap registries
    fn id(&self) -> TransportId;

    /// Fetch `url` and return the body of a successful response
    async fn get(&self, url: &str) -> Result<String>;
}

/// reqwest-backed transport that attaches the RDAP `Accept` and `User-Agent` headers
#[derive(Clone)]
pub struct HttpTransport {
    id: TransportId,
    client: Client,
    user_agent: HeaderValue,
}

impl HttpTransport {
    /// Create a transport with its own connection pool
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(config.connection_pool_size)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| RdapError::config(format!("Failed to create HTTP client: {}", e)))?;

        Self::from_client(client, &config.user_agent)
    }

    /// Wrap an existing reqwest client
    pub fn from_client(client: Client, user_agent: &str) -> Result<Self> {
        let user_agent = HeaderValue::from_str(user_agent)
            .map_err(|_| RdapError::config(format!("Invalid User-Agent '{}'", user_agent)))?;

        Ok(Self {
            id: TransportId::next(),
            client,
            user_agent,
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn id(&self) -> TransportId {
        self.id
    }

    async fn get(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, RDAP_ACCEPT)
            .header(USER_AGENT, self.user_agent.clone())
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            RdapError::transport(e.to_string(), Some(status.as_u16()), Some(url.to_string()))
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .ok()
                .and_then(|body| body.title)
                .unwrap_or_else(|| format!("Request failed with status {}", status));
            return Err(RdapError::transport(
                message,
                Some(status.as_u16()),
                Some(url.to_string()),
            ));
        }

        tracing::debug!(url = %url, status = %status.as_u16(), bytes = %text.len(), "RDAP request completed");
        Ok(text)
    }
}

/// In-memory transport serving fixed documents, for pinned bootstrap snapshots and offline use
pub struct StaticTransport {
    id: TransportId,
    documents: RwLock<HashMap<String, String>>,
    fetches: AtomicUsize,
}

impl StaticTransport {
    pub fn new() -> Self {
        Self {
            id: TransportId::next(),
            documents: RwLock::new(HashMap::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Serve `body` for `url`
    pub fn with_document(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.insert(url, body);
        self
    }

    /// Serve `body` for `url`, replacing whatever was served before
    pub fn insert(&self, url: impl Into<String>, body: impl Into<String>) {
        self.documents.write().insert(url.into(), body.into());
    }

    /// Number of `get` calls made so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Default for StaticTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for StaticTransport {
    fn id(&self) -> TransportId {
        self.id
    }

    async fn get(&self, url: &str) -> Result<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.documents.read().get(url).cloned().ok_or_else(|| {
            RdapError::transport("Not Found", Some(404), Some(url.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// One-shot HTTP server answering with `status` and `body`; yields the raw request head
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/autnum/13335", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/rdap+json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).to_lowercase()
        });

        (url, server)
    }

    fn local_transport(user_agent: &str) -> HttpTransport {
        let client = Client::builder().no_proxy().build().unwrap();
        HttpTransport::from_client(client, user_agent).unwrap()
    }

    #[test]
    fn test_transport_ids_are_unique() {
        let a = StaticTransport::new();
        let b = StaticTransport::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_http_transport_clone_keeps_identity() {
        let transport = HttpTransport::new(&ClientConfig::default()).unwrap();
        let clone = transport.clone();
        assert_eq!(transport.id(), clone.id());
    }

    #[test]
    fn test_http_transport_rejects_bad_user_agent() {
        let result = HttpTransport::from_client(Client::new(), "bad\nagent");
        assert!(matches!(result, Err(RdapError::Config { .. })));
    }

    #[tokio::test]
    async fn test_static_transport_serves_documents() {
        let transport = StaticTransport::new().with_document("https://a.example/x", "{}");

        assert_eq!(transport.get("https://a.example/x").await.unwrap(), "{}");
        let err = transport.get("https://a.example/y").await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        assert!(err.is_retryable());
        assert_eq!(transport.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_http_transport_sends_rdap_headers() {
        let (url, server) = serve_once("200 OK", r#"{"objectClassName":"autnum"}"#).await;
        let transport = local_transport("rdap-bootstrap-test/1.0");

        let body = transport.get(&url).await.unwrap();
        assert_eq!(body, r#"{"objectClassName":"autnum"}"#);

        let request = server.await.unwrap();
        assert!(request.starts_with("get /autnum/13335 "), "{}", request);
        assert!(request.contains("accept: application/rdap+json,application/json\r\n"), "{}", request);
        assert!(request.contains("user-agent: rdap-bootstrap-test/1.0\r\n"), "{}", request);
    }

    #[tokio::test]
    async fn test_http_transport_error_body_title() {
        let (url, server) = serve_once(
            "404 Not Found",
            r#"{"errorCode":404,"title":"Object not found","description":["No such autnum"]}"#,
        )
        .await;
        let transport = local_transport(&ClientConfig::default().user_agent);

        let err = transport.get(&url).await.unwrap_err();
        match err {
            RdapError::Transport { message, status_code, url: failed } => {
                assert_eq!(message, "Object not found");
                assert_eq!(status_code, Some(404));
                assert_eq!(failed.as_deref(), Some(url.as_str()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_http_transport_error_without_rdap_body() {
        let (url, server) = serve_once("503 Service Unavailable", "<html>busy</html>").await;
        let transport = local_transport(&ClientConfig::default().user_agent);

        let err = transport.get(&url).await.unwrap_err();
        assert_eq!(err.status_code(), Some(503));
        assert!(err.to_string().contains("503"), "{}", err);
        server.await.unwrap();
    }
}
