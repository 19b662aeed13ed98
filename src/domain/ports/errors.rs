use thiserror::Error;

/// Text-generation transport errors
#[derive(Debug, Error)]
pub enum TextGenError {
    /// Request rejected by the server (4xx)
    #[error("Invalid request (HTTP {status}): {body}")]
    InvalidRequest { status: u16, body: String },

    /// Server failed to produce a completion (5xx)
    #[error("Server error (HTTP {status}): {body}")]
    ServerError { status: u16, body: String },

    /// Connection, timeout or body transfer failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Anything else, including non-error statuses we do not handle
    #[error("Unexpected status (HTTP {status}): {body}")]
    Unknown { status: u16, body: String },
}

impl TextGenError {
    /// Map a non-success HTTP status and its body to an error.
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        let code = status.as_u16();
        if status.is_client_error() {
            Self::InvalidRequest { status: code, body }
        } else if status.is_server_error() {
            Self::ServerError { status: code, body }
        } else {
            Self::Unknown { status: code, body }
        }
    }

    /// HTTP status carried by the error, if any.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidRequest { status, .. }
            | Self::ServerError { status, .. }
            | Self::Unknown { status, .. } => Some(*status),
            Self::Network(_) | Self::UnexpectedResponse(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_classification() {
        let err = TextGenError::from_status(StatusCode::BAD_REQUEST, "bad".into());
        assert!(matches!(err, TextGenError::InvalidRequest { status: 400, .. }));

        let err = TextGenError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".into());
        assert!(matches!(err, TextGenError::ServerError { status: 500, .. }));

        let err = TextGenError::from_status(StatusCode::MOVED_PERMANENTLY, String::new());
        assert_eq!(err.status(), Some(301));
    }

    #[test]
    fn test_error_display_includes_body() {
        let err = TextGenError::from_status(StatusCode::NOT_FOUND, "no such route".into());
        assert_eq!(err.to_string(), "Invalid request (HTTP 404): no such route");
    }
}
