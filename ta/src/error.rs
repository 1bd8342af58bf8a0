//! API error types

use thiserror::Error;

/// Errors from talking to the training-management API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not signed in")]
    Unauthorized,

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// Check if this is an authentication/authorization failure
    pub fn is_auth(&self) -> bool {
        match self {
            Self::Unauthorized => true,
            Self::Api { status, .. } => matches!(status, 401 | 403),
            _ => false,
        }
    }

    /// The message to show the user: the server-provided one when the server
    /// reported a business error, a generic fallback otherwise.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized => "Not signed in. Run `pb login` first.".to_string(),
            Self::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Api { status, .. } => format!("Request failed with status {}", status),
            Self::Network(_) => "Network error. Please try again.".to_string(),
            Self::InvalidResponse(_) | Self::Json(_) => "Unexpected response from the server.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_auth() {
        assert!(ApiError::Unauthorized.is_auth());
        assert!(
            ApiError::Api {
                status: 401,
                message: String::new()
            }
            .is_auth()
        );
        assert!(
            ApiError::Api {
                status: 403,
                message: String::new()
            }
            .is_auth()
        );
        assert!(
            !ApiError::Api {
                status: 500,
                message: String::new()
            }
            .is_auth()
        );
    }

    #[test]
    fn test_user_message_prefers_server_message() {
        let err = ApiError::Api {
            status: 400,
            message: "Plan already reviewed".to_string(),
        };
        assert_eq!(err.user_message(), "Plan already reviewed");
    }

    #[test]
    fn test_user_message_generic_fallbacks() {
        let err = ApiError::Api {
            status: 502,
            message: "  ".to_string(),
        };
        assert_eq!(err.user_message(), "Request failed with status 502");

        let err = ApiError::InvalidResponse("truncated".to_string());
        assert_eq!(err.user_message(), "Unexpected response from the server.");
    }
}
