use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::preferences::{
    KEY_CHAT_LINK, KEY_CHAT_LINK_SECONDARY, KEY_CHATS, KEY_DEFAULT_COLLAPSE_SIDEBAR,
    KEY_ENABLE_DATA_EXPORT, KEY_ENABLE_DRAWING, KEY_ENABLE_TASK, PreferenceStore,
    remove_preference, write_preference,
};

pub const STATUS_PATH: &str = "/api/status";
pub const KEY_STATUS: &str = "status";
pub const STATUS_UNREACHABLE_NOTICE: &str = "Unable to connect to the server";

/// Scalar fields copied from the status payload into the store.
pub const PROJECTED_STATUS_FIELDS: [&str; 10] = [
    "system_name",
    "logo",
    "footer_html",
    "quota_per_unit",
    "display_in_currency",
    KEY_ENABLE_DRAWING,
    KEY_ENABLE_TASK,
    KEY_ENABLE_DATA_EXPORT,
    "data_export_default_time",
    KEY_DEFAULT_COLLAPSE_SIDEBAR,
];
pub const KEY_MJ_NOTIFY_ENABLED: &str = "mj_notify_enabled";

/// Server-advertised status. Opaque to the navigation core apart from the
/// fields it projects into the preference store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppStatus(Map<String, Value>);

impl AppStatus {
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn from_value(value: Value) -> Result<Self, StatusLoadError> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(StatusLoadError::Decode {
                message: format!("status data must be an object, got {}", json_kind(&other)),
            }),
        }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Wire shape of `GET /api/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusLoadError {
    #[error("status request failed: {message}")]
    Transport { message: String },
    #[error("status request rejected: {message}")]
    Rejected { message: String },
    #[error("status payload could not be decoded: {message}")]
    Decode { message: String },
}

impl StatusLoadError {
    /// Text shown to the user for any failed load.
    #[must_use]
    pub fn notice(&self) -> &'static str {
        STATUS_UNREACHABLE_NOTICE
    }
}

#[async_trait(?Send)]
pub trait StatusTransport {
    type Error: std::fmt::Display;

    async fn fetch_status(&self) -> Result<StatusEnvelope, Self::Error>;
}

/// Performs one status request. No retry and no timeout: a transport that
/// never resolves leaves the caller waiting.
pub async fn load_status<T: StatusTransport + ?Sized>(
    transport: &T,
) -> Result<AppStatus, StatusLoadError> {
    let envelope = transport
        .fetch_status()
        .await
        .map_err(|error| StatusLoadError::Transport {
            message: error.to_string(),
        })?;
    decode_status(envelope)
}

pub fn decode_status(envelope: StatusEnvelope) -> Result<AppStatus, StatusLoadError> {
    if !envelope.success {
        let message = if envelope.message.trim().is_empty() {
            "success=false".to_string()
        } else {
            envelope.message
        };
        return Err(StatusLoadError::Rejected { message });
    }
    AppStatus::from_value(envelope.data)
}

/// Writes the normalized projection of `status` into the store so other
/// parts of the page can read flags without fetching again. Write failures
/// are logged and skipped.
pub fn persist_status_projection<S: PreferenceStore + ?Sized>(store: &S, status: &AppStatus) {
    match serde_json::to_string(status) {
        Ok(encoded) => write_preference(store, KEY_STATUS, &encoded),
        Err(error) => tracing::warn!(error = %error, "status payload could not be encoded"),
    }

    for field in PROJECTED_STATUS_FIELDS
        .iter()
        .copied()
        .chain(std::iter::once(KEY_MJ_NOTIFY_ENABLED))
    {
        if let Some(value) = status.field(field).and_then(scalar_string) {
            write_preference(store, field, &value);
        }
    }

    if let Some(chats) = status.field(KEY_CHATS).filter(|value| !value.is_null()) {
        match serde_json::to_string(chats) {
            Ok(encoded) => write_preference(store, KEY_CHATS, &encoded),
            Err(error) => tracing::warn!(error = %error, "chat list could not be encoded"),
        }
    }

    for key in [KEY_CHAT_LINK, KEY_CHAT_LINK_SECONDARY] {
        match status
            .field(key)
            .and_then(Value::as_str)
            .filter(|link| !link.trim().is_empty())
        {
            Some(link) => write_preference(store, key, link),
            None => remove_preference(store, key),
        }
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
