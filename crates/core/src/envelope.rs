//! Normalization of the backend's response envelopes
//!
//! Most endpoints answer with `{ "meta": { "code", "message" }, "data" }`,
//! some with `{ "status", "message", "data" }`. Both are mapped into one
//! [`Envelope`] at the client boundary so call sites never sniff shapes.

use crate::error::{CoreError, CoreResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized response envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    /// Application status code, falling back to the HTTP status
    pub code: u16,
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StatusField {
    Code(u16),
    Flag(bool),
    Text(String),
}

impl StatusField {
    fn code(&self) -> Option<u16> {
        match self {
            Self::Code(code) => Some(*code),
            Self::Text(text) => text.trim().parse().ok(),
            Self::Flag(_) => None,
        }
    }

    /// Explicit success marker, when the field is not a numeric code
    fn success(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            Self::Text(text) if text.trim().parse::<u16>().is_err() => Some(matches!(
                text.trim().to_ascii_lowercase().as_str(),
                "success" | "ok"
            )),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Meta {
    code: Option<StatusField>,
    status: Option<StatusField>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEnvelope<T> {
    Meta {
        meta: Meta,
        data: Option<T>,
    },
    Status {
        status: StatusField,
        message: Option<String>,
        data: Option<T>,
    },
}

const fn is_success_code(code: u16) -> bool {
    code >= 200 && code < 300
}

impl<T> Envelope<T> {
    /// Build an envelope directly
    pub const fn new(code: u16, success: bool, message: Option<String>, data: Option<T>) -> Self {
        Self {
            code,
            success,
            message,
            data,
        }
    }

    /// Take the payload, failing when the envelope carries none
    pub fn into_data(self) -> CoreResult<T> {
        self.data
            .ok_or_else(|| CoreError::envelope("envelope has no data"))
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Normalize a decoded body. `http_status` fills in a missing code.
    pub fn from_value(body: Value, http_status: u16) -> CoreResult<Self> {
        if !body.is_object() {
            return Err(CoreError::envelope("body is not a JSON object"));
        }
        let raw: RawEnvelope<T> = serde_json::from_value(body)
            .map_err(|e| CoreError::envelope(format!("neither meta nor status shape: {e}")))?;

        Ok(match raw {
            RawEnvelope::Meta { meta, data } => {
                let code = meta
                    .code
                    .as_ref()
                    .and_then(StatusField::code)
                    .unwrap_or(http_status);
                let success = meta
                    .status
                    .as_ref()
                    .and_then(StatusField::success)
                    .unwrap_or_else(|| is_success_code(code));
                Self::new(code, success, meta.message, data)
            }
            RawEnvelope::Status {
                status,
                message,
                data,
            } => {
                let code = status.code().unwrap_or(http_status);
                let success = status
                    .success()
                    .unwrap_or_else(|| is_success_code(code));
                Self::new(code, success, message, data)
            }
        })
    }
}

/// Best-effort human message carried by a body of either shape
pub fn message_of(body: &Value) -> Option<String> {
    let candidates = [
        body.pointer("/meta/message"),
        body.get("message"),
        body.get("error"),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|value| value.as_str())
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(ToString::to_string)
}
