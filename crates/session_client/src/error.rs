//! Client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Non-2xx response. `message` prefers the backend's body-provided
    /// `error` string over the generic description.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// A streamed payload that is neither a token nor a completion event.
    #[error("malformed stream event: {0}")]
    MalformedEvent(String),

    /// The server-push channel dropped or misbehaved at transport level.
    #[error("stream error: {0}")]
    Stream(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    pub(crate) fn api(status: u16, body: Option<serde_json::Value>, fallback: &str) -> Self {
        let message = body
            .as_ref()
            .and_then(|b| b.get("error"))
            .and_then(|e| e.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string());
        ClientError::Api { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_prefers_body_message() {
        let body = serde_json::json!({"error": "Session not found"});
        let err = ClientError::api(404, Some(body), "Failed to get session status.");
        assert_eq!(err.to_string(), "Session not found");
    }

    #[test]
    fn api_error_falls_back_to_generic_message() {
        let err = ClientError::api(502, None, "Failed to end session.");
        assert_eq!(err.to_string(), "Failed to end session.");

        let non_string = serde_json::json!({"error": {"question": ["too long"]}});
        let err = ClientError::api(422, Some(non_string), "Failed to send message.");
        assert_eq!(err.to_string(), "Failed to send message.");
    }
}
