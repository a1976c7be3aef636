//! Remote-call errors.
//!
//! ERROR HANDLING
//! ==============
//! The backend reports failures as JSON bodies of varying shape (REST
//! handlers use `message`, which may be a list of validation messages;
//! Postgrest and the auth provider use `message`, `error_description`,
//! `error` or `details`). `extract_message` folds them into one
//! human-readable string so the view layer never inspects bodies itself.

use serde_json::Value;

const MESSAGE_KEYS: [&str; 4] = ["message", "error_description", "error", "details"];

/// Errors produced by remote calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// A request URL could not be built (e.g. unscoped resource).
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The session token was rejected; the session has been cleared.
    #[error("unauthorized, sign in again")]
    Unauthorized,

    /// The remote answered with a non-success status.
    #[error("remote returned status {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status { status: u16, message: Option<String> },

    /// The response body did not have the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),
}

impl ApiError {
    /// Human-readable message reported by the remote, if any.
    #[must_use]
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// Map an HTTP status and body to success or a typed error.
///
/// # Errors
///
/// Returns `Unauthorized` for 401 and `Status` for any other non-2xx code.
pub fn classify_status(status: u16, body: &str) -> Result<(), ApiError> {
    match status {
        200..=299 => Ok(()),
        401 => Err(ApiError::Unauthorized),
        _ => Err(ApiError::Status { status, message: extract_message(body) }),
    }
}

/// Pull a human-readable message out of an error body.
#[must_use]
pub fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    MESSAGE_KEYS.iter().find_map(|key| value.get(key).and_then(message_text))
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim()).filter(|s| !s.is_empty()).map(str::to_owned),
        Value::Array(items) => {
            let parts: Vec<&str> = items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;
