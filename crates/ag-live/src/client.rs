//! Liveness endpoint client.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use ag_core::EventId;
use serde::Deserialize;
use url::Url;

use crate::LiveError;

/// Default request timeout for status calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Answers whether an event's stream is still broadcasting.
pub trait LivenessSource: Send + Sync + 'static {
    fn is_stream_live(
        &self,
        event_id: &EventId,
    ) -> impl Future<Output = Result<bool, LiveError>> + Send;
}

/// Body returned by the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamStatus {
    pub is_stream_live: bool,
}

/// HTTP client for `GET {status_url}?eventId={id}`.
///
/// The client is safe to clone; clones share the connection pool.
#[derive(Clone)]
pub struct StatusClient {
    http: reqwest::Client,
    status_url: Url,
}

impl fmt::Debug for StatusClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusClient")
            .field("status_url", &self.status_url.as_str())
            .finish_non_exhaustive()
    }
}

impl StatusClient {
    /// Creates a client for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not http(s) or the HTTP client
    /// fails to build.
    pub fn new(status_url: Url, timeout: Duration) -> Result<Self, LiveError> {
        if !matches!(status_url.scheme(), "http" | "https") {
            return Err(LiveError::InvalidEndpoint {
                url: status_url.to_string(),
                reason: "scheme must be http or https",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LiveError::ClientBuild)?;

        Ok(Self { http, status_url })
    }

    pub const fn status_url(&self) -> &Url {
        &self.status_url
    }

    /// Fetches the stream status for one event.
    pub async fn stream_status(&self, event_id: &EventId) -> Result<StreamStatus, LiveError> {
        let url = self.request_url(event_id);
        tracing::debug!(%url, "polling stream status");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(LiveError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_stream_status(&body)
    }

    fn request_url(&self, event_id: &EventId) -> Url {
        let mut url = self.status_url.clone();
        url.query_pairs_mut()
            .append_pair("eventId", event_id.as_str());
        url
    }
}

impl LivenessSource for StatusClient {
    async fn is_stream_live(&self, event_id: &EventId) -> Result<bool, LiveError> {
        Ok(self.stream_status(event_id).await?.is_stream_live)
    }
}

fn parse_stream_status(body: &str) -> Result<StreamStatus, LiveError> {
    serde_json::from_str(body).map_err(|err| LiveError::InvalidResponse(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> StatusClient {
        StatusClient::new(Url::parse(url).unwrap(), DEFAULT_TIMEOUT).unwrap()
    }

    #[test]
    fn client_rejects_non_http_endpoint() {
        let result = StatusClient::new(Url::parse("ftp://status.example.com").unwrap(), DEFAULT_TIMEOUT);
        assert!(matches!(result, Err(LiveError::InvalidEndpoint { .. })));
    }

    #[test]
    fn request_url_appends_event_id() {
        let client = client("https://api.example.com/v1/stream-status");
        let url = client.request_url(&EventId::new("evt 42").unwrap());
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v1/stream-status?eventId=evt+42"
        );
    }

    #[test]
    fn request_url_keeps_existing_query() {
        let client = client("https://api.example.com/status?region=eu");
        let url = client.request_url(&EventId::new("evt-1").unwrap());
        assert_eq!(
            url.as_str(),
            "https://api.example.com/status?region=eu&eventId=evt-1"
        );
    }

    #[test]
    fn parse_stream_status_accepts_camel_case() {
        let status = parse_stream_status(r#"{"isStreamLive": false, "viewers": 12}"#).unwrap();
        assert!(!status.is_stream_live);
    }

    #[test]
    fn parse_stream_status_rejects_garbage() {
        let err = parse_stream_status("<html>").unwrap_err();
        assert!(matches!(err, LiveError::InvalidResponse(_)));
    }

    #[test]
    fn debug_shows_endpoint() {
        let client = client("https://api.example.com/status");
        let debug = format!("{client:?}");
        assert!(debug.contains("api.example.com/status"));
    }
}
