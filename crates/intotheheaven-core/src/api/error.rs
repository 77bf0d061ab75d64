use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Error code the backend puts in `error` when the access token has expired.
const JWT_EXPIRED_CODE: &str = "JWT_EXPIRED";

/// Message the backend uses for the same condition on older endpoints.
const JWT_EXPIRED_MESSAGE: &str = "JWT token has expired";

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    Http {
        status: StatusCode,
        message: String,
        body: Option<Value>,
    },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let cut = (0..=MAX_ERROR_BODY_LENGTH)
                .rev()
                .find(|&i| body.is_char_boundary(i))
                .unwrap_or(0);
            format!("{}... (truncated, {} total bytes)", &body[..cut], body.len())
        }
    }

    /// Build an error from a non-success response. The message is the body's
    /// `message` field when present, otherwise `HTTP <status>`.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let message = parsed
            .as_ref()
            .and_then(|v| v.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(Self::truncate_body)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

        ApiError::Http {
            status,
            message,
            body: parsed,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::NetworkError(e) => e.status(),
            ApiError::InvalidResponse(_) => None,
        }
    }

    /// The backend's machine-readable error code, if it sent one.
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Http { body: Some(body), .. } => body.get("error").and_then(Value::as_str),
            _ => None,
        }
    }

    /// True when the backend says the access token is no longer valid.
    pub fn is_session_expired(&self) -> bool {
        let ApiError::Http { status, message, .. } = self else {
            return false;
        };

        if self.code() == Some(JWT_EXPIRED_CODE) {
            return true;
        }
        if message.contains(JWT_EXPIRED_MESSAGE) {
            return true;
        }
        *status == StatusCode::UNAUTHORIZED && message.to_lowercase().contains("jwt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from_body() {
        let err = ApiError::from_status(
            StatusCode::CONFLICT,
            r#"{"message":"이미 가입된 이메일입니다.","error":"DUPLICATE_EMAIL"}"#,
        );
        assert_eq!(err.to_string(), "이미 가입된 이메일입니다.");
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
        assert_eq!(err.code(), Some("DUPLICATE_EMAIL"));
    }

    #[test]
    fn test_message_falls_back_to_status() {
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(err.to_string(), "HTTP 502");
        assert!(matches!(err, ApiError::Http { body: None, .. }));
    }

    #[test]
    fn test_session_expired_detection() {
        let by_code = ApiError::from_status(
            StatusCode::UNAUTHORIZED,
            r#"{"message":"만료","error":"JWT_EXPIRED"}"#,
        );
        assert!(by_code.is_session_expired());

        let by_message = ApiError::from_status(
            StatusCode::FORBIDDEN,
            r#"{"message":"JWT token has expired at 2025-01-01"}"#,
        );
        assert!(by_message.is_session_expired());

        let by_status = ApiError::from_status(
            StatusCode::UNAUTHORIZED,
            r#"{"message":"Invalid JWT signature"}"#,
        );
        assert!(by_status.is_session_expired());

        let wrong_password = ApiError::from_status(
            StatusCode::UNAUTHORIZED,
            r#"{"message":"비밀번호가 일치하지 않습니다."}"#,
        );
        assert!(!wrong_password.is_session_expired());

        assert!(!ApiError::InvalidResponse("x".to_string()).is_session_expired());
    }

    #[test]
    fn test_long_messages_are_truncated() {
        let long = "가".repeat(400);
        let body = format!(r#"{{"message":"{}"}}"#, long);
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, &body);
        assert!(err.to_string().contains("truncated"));
    }
}
