/// HTTP client for the spreadsheet-backed ideas endpoint.
///
/// One GET per call, no retry. A non-success response is turned into
/// `ClientError::Upstream` when its body carries an `error`, `detail` or `message` field.
use std::future::Future;
use std::time::Duration;

use futures::StreamExt;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::CommonError;
use crate::model::Idea;

pub use reqwest::StatusCode;

/// Message surfaced when the response carries no usable error field.
pub const GENERIC_LOAD_FAILURE: &str = "Failed to fetch ideas";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_ERROR_BODY_BYTES: usize = 8 * 1024;

#[derive(Clone, Debug)]
pub struct IdeasClientConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub max_error_body_bytes: usize,
}

impl IdeasClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: DEFAULT_TIMEOUT,
            max_error_body_bytes: DEFAULT_MAX_ERROR_BODY_BYTES,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("upstream returned error: status={status} message={message}")]
    Upstream { status: StatusCode, message: String },

    #[error("upstream returned non-JSON error: status={status} body={body}")]
    UpstreamBody { status: StatusCode, body: String },
}

impl ClientError {
    /// The human-readable message a failed load reports.
    pub fn load_failure_message(&self) -> String {
        match self {
            ClientError::Upstream { message, .. } => message.clone(),
            _ => GENERIC_LOAD_FAILURE.to_string(),
        }
    }
}

/// Anything that can produce the full idea collection in one call.
pub trait IdeaSource: Send + Sync + 'static {
    fn fetch_ideas(&self) -> impl Future<Output = Result<Vec<Idea>, ClientError>> + Send;
}

#[derive(Clone)]
pub struct IdeasClient {
    config: IdeasClientConfig,
    http: reqwest::Client,
}

impl IdeasClient {
    pub fn new(config: IdeasClientConfig) -> Result<Self, CommonError> {
        let http = reqwest::Client::builder()
            .user_agent("idea-gallery")
            .build()
            .map_err(|e| CommonError::ClientSetup(e.to_string()))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &IdeasClientConfig {
        &self.config
    }
}

impl IdeaSource for IdeasClient {
    async fn fetch_ideas(&self) -> Result<Vec<Idea>, ClientError> {
        let resp = self
            .http
            .get(&self.config.endpoint)
            .timeout(self.config.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(to_upstream_error(resp, self.config.max_error_body_bytes).await);
        }

        let body = resp.bytes().await?;
        match serde_json::from_slice::<Vec<Idea>>(&body) {
            Ok(ideas) => {
                info!(ideas = ideas.len(), "fetched ideas");
                Ok(ideas)
            }
            Err(e) => {
                // Some spreadsheet APIs answer 200 with an error object instead of rows.
                if let Some(message) = error_message_from_body(&body) {
                    return Err(ClientError::Upstream { status, message });
                }
                Err(ClientError::InvalidJson(e))
            }
        }
    }
}

async fn to_upstream_error(resp: reqwest::Response, max_error_body_bytes: usize) -> ClientError {
    let status = resp.status();
    let body = read_limited_text(resp, max_error_body_bytes).await;
    match error_message_from_body(body.as_bytes()) {
        Some(message) => ClientError::Upstream { status, message },
        None => ClientError::UpstreamBody { status, body },
    }
}

/// Pull the first non-empty of `error`, `detail`, `message` out of a JSON error body.
/// `error` may itself be an object with a `message` field.
pub fn error_message_from_body(body: &[u8]) -> Option<String> {
    let envelope: ErrorEnvelope = serde_json::from_slice(body).ok()?;
    [envelope.error, envelope.detail, envelope.message]
        .iter()
        .flatten()
        .find_map(text_of)
}

fn text_of(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Object(map) => map.get("message").and_then(text_of),
        _ => None,
    }
}

async fn read_limited_text(resp: reqwest::Response, max_bytes: usize) -> String {
    let mut stream = resp.bytes_stream();
    let mut buf: Vec<u8> = Vec::new();
    while let Some(next) = stream.next().await {
        match next {
            Ok(chunk) => {
                let room = max_bytes.saturating_sub(buf.len());
                buf.extend_from_slice(&chunk[..chunk.len().min(room)]);
                if buf.len() >= max_bytes {
                    break;
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to read ideas error body");
                if buf.is_empty() {
                    return "<failed to read error body>".to_string();
                }
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<serde_json::Value>,
    detail: Option<serde_json::Value>,
    message: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serve a single canned HTTP response and return the URL to hit.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}/ideas")
    }

    fn client_for(url: String) -> IdeasClient {
        IdeasClient::new(IdeasClientConfig::new(url)).unwrap()
    }

    #[test]
    fn test_error_message_field_precedence() {
        assert_eq!(
            error_message_from_body(br#"{"error": "rate limited", "detail": "slow down"}"#),
            Some("rate limited".to_string())
        );
        assert_eq!(
            error_message_from_body(br#"{"detail": "sheet not found"}"#),
            Some("sheet not found".to_string())
        );
        assert_eq!(
            error_message_from_body(br#"{"error": {"message": "quota exceeded"}}"#),
            Some("quota exceeded".to_string())
        );
        assert_eq!(
            error_message_from_body(br#"{"error": "", "message": "bad key"}"#),
            Some("bad key".to_string())
        );
        assert_eq!(error_message_from_body(br#"{"status": 500}"#), None);
        assert_eq!(error_message_from_body(b"<html>oops</html>"), None);
    }

    #[test]
    fn test_load_failure_message_falls_back_to_generic() {
        let upstream = ClientError::Upstream {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: "rate limited".to_string(),
        };
        assert_eq!(upstream.load_failure_message(), "rate limited");

        let body = ClientError::UpstreamBody {
            status: StatusCode::BAD_GATEWAY,
            body: "<html>".to_string(),
        };
        assert_eq!(body.load_failure_message(), GENERIC_LOAD_FAILURE);

        let json = serde_json::from_str::<Vec<Idea>>("nope").unwrap_err();
        assert_eq!(
            ClientError::InvalidJson(json).load_failure_message(),
            GENERIC_LOAD_FAILURE
        );
    }

    #[tokio::test]
    async fn test_fetch_ideas_success() {
        let url = serve_once(
            "200 OK",
            r#"[{"id":"1","title":"Chess coach","description":"","category":["AI"],"prize":100,"difficulty":"Hard"}]"#,
        )
        .await;
        let ideas = client_for(url).fetch_ideas().await.unwrap();
        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0].title, "Chess coach");
    }

    #[tokio::test]
    async fn test_fetch_ideas_error_body_is_surfaced() {
        let url = serve_once("429 Too Many Requests", r#"{"error":"rate limited"}"#).await;
        let err = client_for(url).fetch_ideas().await.unwrap_err();
        match &err {
            ClientError::Upstream { status, message } => {
                assert_eq!(*status, StatusCode::TOO_MANY_REQUESTS);
                assert_eq!(message, "rate limited");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.load_failure_message(), "rate limited");
    }

    #[tokio::test]
    async fn test_fetch_ideas_error_object_with_ok_status() {
        let url = serve_once("200 OK", r#"{"error":"invalid api key"}"#).await;
        let err = client_for(url).fetch_ideas().await.unwrap_err();
        assert_eq!(err.load_failure_message(), "invalid api key");
    }

    #[tokio::test]
    async fn test_fetch_ideas_malformed_payload() {
        let url = serve_once("200 OK", r#"[{"title": "missing id"}]"#).await;
        let err = client_for(url).fetch_ideas().await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidJson(_)));
        assert_eq!(err.load_failure_message(), GENERIC_LOAD_FAILURE);
    }

    #[tokio::test]
    async fn test_fetch_ideas_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(format!("http://{addr}/ideas"))
            .fetch_ideas()
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Request(_)));
        assert_eq!(err.load_failure_message(), GENERIC_LOAD_FAILURE);
    }
}
