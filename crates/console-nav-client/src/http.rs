use std::time::Duration;

use async_trait::async_trait;
use console_nav_core::status::{STATUS_PATH, StatusEnvelope, StatusTransport};
use reqwest::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{ConfigError, normalize_base_url};

#[derive(Debug, Error)]
pub enum StatusClientError {
    #[error("status_client_invalid_base_url:{0}")]
    InvalidBaseUrl(#[from] ConfigError),
    #[error("status_request_failed:{message}")]
    Request { message: String },
    #[error("status_read_failed:{message}")]
    Read { message: String },
    #[error("status_http_{status}:{body}")]
    Http { status: StatusCode, body: String },
    #[error("status_json_decode_failed:{message}")]
    Decode { message: String },
}

/// `GET /api/status` over HTTP. The client sends one request per call and
/// never retries; `timeout` is optional and off by default.
#[derive(Debug, Clone)]
pub struct HttpStatusTransport {
    base_url: String,
    timeout: Option<Duration>,
    http: reqwest::Client,
}

impl HttpStatusTransport {
    pub fn new(base_url: &str) -> Result<Self, StatusClientError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            timeout: None,
            http: reqwest::Client::new(),
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn status_url(&self) -> String {
        format!("{}{STATUS_PATH}", self.base_url)
    }

    async fn get_status(&self) -> Result<StatusEnvelope, StatusClientError> {
        let mut request = self
            .http
            .get(self.status_url())
            .header("x-request-id", format!("req_{}", Uuid::new_v4().simple()));
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|error| StatusClientError::Request {
                message: error.to_string(),
            })?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|error| StatusClientError::Read {
                message: error.to_string(),
            })?;
        if !status.is_success() {
            return Err(format_http_error(status, &bytes));
        }
        decode_envelope(&bytes)
    }
}

#[async_trait(?Send)]
impl StatusTransport for HttpStatusTransport {
    type Error = StatusClientError;

    async fn fetch_status(&self) -> Result<StatusEnvelope, Self::Error> {
        tracing::debug!(url = %self.status_url(), "fetching console status");
        self.get_status().await
    }
}

pub fn decode_envelope(bytes: &[u8]) -> Result<StatusEnvelope, StatusClientError> {
    serde_json::from_slice::<StatusEnvelope>(bytes).map_err(|error| StatusClientError::Decode {
        message: error.to_string(),
    })
}

pub fn format_http_error(status: StatusCode, body: &[u8]) -> StatusClientError {
    let body = String::from_utf8_lossy(body).trim().to_string();
    let body = if body.is_empty() {
        "<empty>".to_string()
    } else {
        body
    };
    StatusClientError::Http { status, body }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_url_joins_normalized_base() {
        let transport = HttpStatusTransport::new("https://console.example.com/").expect("transport");
        assert_eq!(transport.status_url(), "https://console.example.com/api/status");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = HttpStatusTransport::new("console.example.com");
        assert!(matches!(
            result,
            Err(StatusClientError::InvalidBaseUrl(ConfigError::InvalidBaseUrl))
        ));
    }

    #[test]
    fn http_error_mapping_preserves_shape() {
        let error = format_http_error(StatusCode::BAD_GATEWAY, b" gateway failed ");
        assert_eq!(error.to_string(), "status_http_502 Bad Gateway:gateway failed");

        let empty_body = format_http_error(StatusCode::SERVICE_UNAVAILABLE, b" ");
        assert_eq!(
            empty_body.to_string(),
            "status_http_503 Service Unavailable:<empty>"
        );
    }

    #[test]
    fn envelope_decoding_reports_bad_payloads() {
        let envelope =
            decode_envelope(br#"{"success":false,"message":"down","data":null}"#).expect("decode");
        assert!(!envelope.success);
        assert_eq!(envelope.message, "down");

        assert!(matches!(
            decode_envelope(b"<html>"),
            Err(StatusClientError::Decode { .. })
        ));
    }
}
