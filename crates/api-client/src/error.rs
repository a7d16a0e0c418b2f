//! Error types for the API client
//!
//! Every failure the client produces converges on a single [`ApiError`] shape:
//! a status code, a human-readable message and an optional map of per-field
//! validation messages. Callers render `message` and never have to branch on
//! where the failure came from.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Field name to validation message
pub type FieldErrors = BTreeMap<String, String>;

/// Message used when an error response carries neither `error` nor `message`
pub const DEFAULT_SERVER_MESSAGE: &str = "An error occurred";

/// Message used when a request was sent but no response arrived
pub const NETWORK_ERROR_MESSAGE: &str = "Network error - please check your connection";

/// Message used when a request failed before sending and no detail is available
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Where a failure originated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The server answered with an error status
    Server,
    /// The request was sent but no response arrived (connect failure, timeout)
    Network,
    /// The request could not be built or sent, or its reply could not be decoded
    Request,
    /// The client configuration is invalid
    Config,
    /// The session token could not be persisted or removed
    Storage,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Server => "server",
            Self::Network => "network",
            Self::Request => "request",
            Self::Config => "config",
            Self::Storage => "storage",
        };
        f.write_str(name)
    }
}

/// Normalized API error
///
/// `status` is the HTTP status for server errors and `0` for everything else.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    /// HTTP status code, `0` when no response was received
    pub status: u16,
    /// Human-readable message suitable for display
    pub message: String,
    /// Per-field validation messages reported by the server
    pub field_errors: Option<FieldErrors>,
    kind: ErrorKind,
}

impl ApiError {
    fn new(kind: ErrorKind, status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            field_errors: None,
            kind,
        }
    }

    /// Translate an error response from the server.
    ///
    /// The message comes from the body's `error` field, then `message`, then
    /// [`DEFAULT_SERVER_MESSAGE`]. A body that is not JSON yields the default
    /// message.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let data: Value = serde_json::from_str(body).unwrap_or(Value::Null);
        Self::from_response_value(status, &data)
    }

    /// Translate an already-parsed error response body
    #[must_use]
    pub fn from_response_value(status: u16, data: &Value) -> Self {
        let message = data
            .get("error")
            .and_then(text_of)
            .or_else(|| data.get("message").and_then(text_of))
            .unwrap_or_else(|| DEFAULT_SERVER_MESSAGE.to_string());

        let field_errors = data.get("errors").and_then(Value::as_object).map(|map| {
            map.iter()
                .map(|(field, value)| (field.clone(), field_message(value)))
                .collect::<FieldErrors>()
        });

        Self {
            field_errors,
            ..Self::new(ErrorKind::Server, status, message)
        }
    }

    /// A request that was sent but never answered
    #[must_use]
    pub fn network() -> Self {
        Self::new(ErrorKind::Network, 0, NETWORK_ERROR_MESSAGE)
    }

    /// A request that could not be constructed or sent
    pub fn request(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self::new(ErrorKind::Request, 0, UNEXPECTED_ERROR_MESSAGE)
        } else {
            Self::new(ErrorKind::Request, 0, message)
        }
    }

    /// A request rejected before sending because required fields are missing
    pub fn validation(message: impl Into<String>, field_errors: FieldErrors) -> Self {
        Self {
            field_errors: Some(field_errors),
            ..Self::request(message)
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, 0, message)
    }

    /// Create a token storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, 0, message)
    }

    /// Classify a transport failure from `reqwest`.
    ///
    /// Builder and decode failures mean the request never made sense on our
    /// side; every other transport failure means the server could not be
    /// reached or did not answer in time.
    #[must_use]
    pub fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_builder() || error.is_decode() {
            Self::request(error.to_string())
        } else {
            Self::network()
        }
    }

    /// Where this error originated
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Validation message for a single field, if the server reported one
    #[must_use]
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors
            .as_ref()
            .and_then(|errors| errors.get(field))
            .map(String::as_str)
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }

    /// Check if no response was received
    #[must_use]
    pub fn is_network_error(&self) -> bool {
        self.kind == ErrorKind::Network
    }

    /// Check if the server rejected the credentials
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status, 401 | 403)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::from_transport(&error)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        Self::request(error.to_string())
    }
}

/// Message for one entry of an `errors` map.
///
/// Validation layers commonly send a list of messages per field; the string
/// entries are joined with `"; "`. Other shapes fall back to their JSON text.
fn field_message(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

/// Text of a JSON value the way a loosely typed caller would read it:
/// empty strings, `null` and `false` count as absent.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_server_error_with_field_errors() {
        let body = r#"{"error": "Invalid email", "errors": {"email": "bad format"}}"#;
        let err = ApiError::from_response(422, body);

        assert_eq!(err.status, 422);
        assert_eq!(err.message, "Invalid email");
        assert_eq!(err.field_error("email"), Some("bad format"));
        assert_eq!(err.field_errors.as_ref().map(BTreeMap::len), Some(1));
        assert_eq!(err.kind(), ErrorKind::Server);
        assert!(err.is_client_error());
    }

    #[test]
    fn test_server_error_message_fallbacks() {
        let err = ApiError::from_response_value(404, &json!({"message": "Project not found"}));
        assert_eq!(err.message, "Project not found");
        assert!(err.field_errors.is_none());

        let err = ApiError::from_response_value(500, &json!({"error": "", "message": "Boom"}));
        assert_eq!(err.message, "Boom");

        let err = ApiError::from_response_value(500, &json!({}));
        assert_eq!(err.message, DEFAULT_SERVER_MESSAGE);
        assert!(err.is_server_error());
    }

    #[test]
    fn test_server_error_non_json_body() {
        let err = ApiError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.status, 502);
        assert_eq!(err.message, DEFAULT_SERVER_MESSAGE);
        assert!(err.field_errors.is_none());
    }

    #[test]
    fn test_field_error_lists_are_joined() {
        let err = ApiError::from_response_value(
            400,
            &json!({
                "error": "Validation failed",
                "errors": {
                    "email": ["Not a valid email address."],
                    "name": ["Missing data for required field.", "Too short."]
                }
            }),
        );
        assert_eq!(err.field_error("email"), Some("Not a valid email address."));
        assert_eq!(
            err.field_error("name"),
            Some("Missing data for required field.; Too short.")
        );
    }

    #[test]
    fn test_other_field_error_shapes_are_stringified() {
        let err = ApiError::from_response_value(
            400,
            &json!({"error": "Invalid", "errors": {"order": 3, "links": {"github": "bad"}}}),
        );
        assert_eq!(err.field_error("order"), Some("3"));
        assert_eq!(err.field_error("links"), Some(r#"{"github":"bad"}"#));
    }

    #[test]
    fn test_network_error() {
        let err = ApiError::network();
        assert_eq!(err.status, 0);
        assert_eq!(err.message, NETWORK_ERROR_MESSAGE);
        assert!(err.field_errors.is_none());
        assert!(err.is_network_error());
    }

    #[test]
    fn test_request_error_fallback_message() {
        let err = ApiError::request("relative URL without a base");
        assert_eq!(err.status, 0);
        assert_eq!(err.message, "relative URL without a base");

        let err = ApiError::request("");
        assert_eq!(err.message, UNEXPECTED_ERROR_MESSAGE);
        assert_eq!(err.kind(), ErrorKind::Request);
    }

    #[test]
    fn test_display_is_message() {
        let err = ApiError::from_response_value(401, &json!({"error": "Invalid credentials"}));
        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(err.is_unauthorized());
    }
}
