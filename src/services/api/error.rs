use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a REST call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Not authenticated: {0}")]
    Unauthorized(String),
    #[error("Not allowed: {0}")]
    Forbidden(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Sync is disabled - working in offline mode")]
    Offline,
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Map a non-success HTTP status and the server's message.
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        match status.as_u16() {
            400 | 422 => Self::Validation(message),
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            code => Self::Server {
                status: code,
                message,
            },
        }
    }

    /// Worth retrying: the request may not have reached the server.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Server { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(400, "Validation")]
    #[test_case(401, "Unauthorized")]
    #[test_case(403, "Forbidden")]
    #[test_case(404, "NotFound")]
    #[test_case(409, "Conflict")]
    #[test_case(500, "Server")]
    #[test_case(503, "Server")]
    fn test_from_status(code: u16, variant: &str) {
        let status = StatusCode::from_u16(code).unwrap();
        let error = ApiError::from_status(status, "boom");
        assert!(format!("{:?}", error).starts_with(variant));
    }

    #[test]
    fn test_transient_errors() {
        assert!(ApiError::Network("reset".into()).is_transient());
        assert!(ApiError::Server { status: 503, message: String::new() }.is_transient());
        assert!(!ApiError::Server { status: 500, message: String::new() }.is_transient());
        assert!(!ApiError::Offline.is_transient());
    }
}
