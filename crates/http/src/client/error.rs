//! Client error types

use carecom_core::{CoreError, message_of};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Messages reported for one field of a 422 response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub messages: Vec<String>,
}

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// 400
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// 401
    #[error("Authentication failed: {message}")]
    Unauthorized { message: String },

    /// 403
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// 404
    #[error("Resource not found: {message}")]
    NotFound { message: String },

    /// 409
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// 422, `message` is the flattened field messages when the body has them
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    /// 429
    #[error("Too many requests: {message}")]
    RateLimited { message: String },

    /// 500
    #[error("Server error: {message}")]
    Server { message: String },

    /// 503
    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    /// Any other non-success status
    #[error("Unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    /// No response was received
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The per-request deadline elapsed
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The caller cancelled the request
    #[error("Request cancelled")]
    Cancelled,

    /// The request could not be constructed, nothing was sent
    #[error("Request could not be built: {0}")]
    Request(String),

    /// The response body did not have the expected shape
    #[error("Response could not be decoded: {0}")]
    Decode(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Credential store or token failure
    #[error("Credential error: {0}")]
    Credentials(#[from] CoreError),

    /// A daily monitoring code that is not a UUID
    #[error("Invalid monitoring code: {0}")]
    InvalidMonitoringCode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_builder() {
            Self::Request(error.to_string())
        } else {
            Self::Network(error)
        }
    }
}

impl ClientError {
    /// Create error from an HTTP status and the decoded error body
    pub fn from_status(status: StatusCode, body: &Value) -> Self {
        let message = message_of(body)
            .or_else(|| body.as_str().map(str::trim).filter(|s| !s.is_empty()).map(String::from))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .map_or_else(|| status.to_string(), String::from)
            });

        match status.as_u16() {
            400 => Self::BadRequest { message },
            401 => Self::Unauthorized { message },
            403 => Self::Forbidden { message },
            404 => Self::NotFound { message },
            409 => Self::Conflict { message },
            422 => {
                let errors = field_errors(body);
                let message = if errors.is_empty() {
                    message
                } else {
                    flatten_field_errors(&errors)
                };
                Self::Validation { message, errors }
            }
            429 => Self::RateLimited { message },
            500 => Self::Server { message },
            503 => Self::ServiceUnavailable { message },
            status => Self::Status { status, message },
        }
    }

    /// HTTP status of the failed response, when one was received
    pub fn status(&self) -> Option<StatusCode> {
        let code = match self {
            Self::BadRequest { .. } => 400,
            Self::Unauthorized { .. } => 401,
            Self::Forbidden { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::Conflict { .. } => 409,
            Self::Validation { .. } => 422,
            Self::RateLimited { .. } => 429,
            Self::Server { .. } => 500,
            Self::ServiceUnavailable { .. } => 503,
            Self::Status { status, .. } => *status,
            _ => return None,
        };
        StatusCode::from_u16(code).ok()
    }

    /// Server-provided or derived message for status errors
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::BadRequest { message }
            | Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::Conflict { message }
            | Self::Validation { message, .. }
            | Self::RateLimited { message }
            | Self::Server { message }
            | Self::ServiceUnavailable { message }
            | Self::Status { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Whether the backend rejected the credentials
    pub const fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Read the `errors` map of a 422 body, keeping body order.
///
/// Values may be a list of messages or a single message.
pub fn field_errors(body: &Value) -> Vec<FieldError> {
    let Some(map) = body
        .get("errors")
        .or_else(|| body.pointer("/data/errors"))
        .and_then(Value::as_object)
    else {
        return Vec::new();
    };

    map.iter()
        .filter_map(|(field, value)| {
            let messages: Vec<String> = match value {
                Value::String(message) => vec![message.clone()],
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect(),
                _ => Vec::new(),
            };
            (!messages.is_empty()).then(|| FieldError {
                field: field.clone(),
                messages,
            })
        })
        .collect()
}

/// Join every field message into one newline-separated string
pub fn flatten_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .flat_map(|error| error.messages.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_taxonomy() {
        let body = json!({"message": "x"});
        let cases = [
            (400, "BadRequest"),
            (401, "Unauthorized"),
            (403, "Forbidden"),
            (404, "NotFound"),
            (409, "Conflict"),
            (429, "RateLimited"),
            (500, "Server"),
            (503, "ServiceUnavailable"),
            (418, "Status"),
        ];
        for (code, expected) in cases {
            let error = ClientError::from_status(StatusCode::from_u16(code).unwrap(), &body);
            assert!(
                format!("{error:?}").starts_with(expected),
                "{code} mapped to {error:?}"
            );
            assert_eq!(error.status().map(|s| s.as_u16()), Some(code));
            assert_eq!(error.server_message(), Some("x"));
        }
    }

    #[test]
    fn test_message_falls_back_to_reason() {
        let error = ClientError::from_status(StatusCode::FORBIDDEN, &Value::Null);
        assert_eq!(error.server_message(), Some("Forbidden"));

        let error = ClientError::from_status(StatusCode::BAD_GATEWAY, &json!("upstream down"));
        assert_eq!(error.server_message(), Some("upstream down"));
    }

    #[test]
    fn test_validation_flattening_keeps_body_order() {
        let body = json!({
            "message": "The given data was invalid.",
            "errors": {
                "nik": ["NIK wajib diisi.", "NIK harus 16 digit."],
                "email": "Email sudah terdaftar.",
                "ignored": 3
            }
        });
        let error = ClientError::from_status(StatusCode::UNPROCESSABLE_ENTITY, &body);
        let ClientError::Validation { message, errors } = error else {
            panic!("expected validation error");
        };
        assert_eq!(
            message,
            "NIK wajib diisi.\nNIK harus 16 digit.\nEmail sudah terdaftar."
        );
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "nik");
    }

    #[test]
    fn test_validation_without_field_map_uses_message() {
        let body = json!({"meta": {"code": 422, "message": "Data tidak lengkap"}});
        let error = ClientError::from_status(StatusCode::UNPROCESSABLE_ENTITY, &body);
        assert_eq!(error.server_message(), Some("Data tidak lengkap"));
    }

    #[test]
    fn test_auth_expired_only_for_401() {
        assert!(
            ClientError::Unauthorized {
                message: String::new()
            }
            .is_auth_expired()
        );
        assert!(!ClientError::Cancelled.is_auth_expired());
        assert!(ClientError::Cancelled.status().is_none());
    }
}
