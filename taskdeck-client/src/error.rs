/// Client-side error handling
///
/// API failures carry the server-provided message when the response body
/// parses as the API's error shape; anything else falls back to a generic
/// message so the user never sees raw transport or serialization noise.

use serde::Deserialize;

/// Fallback shown when the server gives us nothing usable
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

/// Error type for client operations
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with an error status
    #[error("{message}")]
    Api {
        /// HTTP status code
        status: u16,

        /// Server-provided message, or the generic fallback
        message: String,
    },

    /// The request never completed (connection, TLS, timeout)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// True when the server said the session is missing or invalid
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Api { status: 401, .. })
    }

    /// True when the server said the resource does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

/// The API's error body, as much of it as the client cares about
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Converts a non-success response into a `ClientError`
///
/// Reads the body and prefers the server's `message` field; a body that
/// is missing or unparseable yields the generic fallback.
pub(crate) async fn error_from_response(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();

    let message = match response.json::<ApiErrorBody>().await {
        Ok(ApiErrorBody {
            message: Some(message),
        }) if !message.is_empty() => message,
        _ => GENERIC_ERROR.to_string(),
    };

    ClientError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_uses_message() {
        let err = ClientError::Api {
            status: 400,
            message: "Task title cannot be empty".to_string(),
        };
        assert_eq!(err.to_string(), "Task title cannot be empty");
    }

    #[test]
    fn test_status_predicates() {
        let unauthorized = ClientError::Api {
            status: 401,
            message: GENERIC_ERROR.to_string(),
        };
        assert!(unauthorized.is_unauthorized());
        assert!(!unauthorized.is_not_found());

        let not_found = ClientError::Api {
            status: 404,
            message: GENERIC_ERROR.to_string(),
        };
        assert!(not_found.is_not_found());
        assert!(!not_found.is_unauthorized());
    }
}
