use thiserror::Error;

use crate::models::{ConfigError, SelectionError};

/// Main error type for threadsmith
#[derive(Error, Debug)]
pub enum ThreadsmithError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),

    #[error("Gemini error: {0}")]
    Gemini(#[from] GeminiError),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Could not open compose link: {0}")]
    OpenCompose(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors reported by the Gemini provider
#[derive(Error, Debug)]
pub enum GeminiError {
    /// Missing or invalid credential. The provider signals an invalid key as
    /// an "entity not found" condition on the model path.
    #[error("Invalid or missing API credential: {0}")]
    Auth(String),

    /// Payload could not be parsed against the declared response schema
    #[error("Response did not match the declared schema: {0}")]
    SchemaMismatch(String),

    #[error("Provider error{}: {message}", .status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    Provider {
        status: Option<u16>,
        message: String,
    },

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Connection refused: {0}")]
    ConnectionRefused(String),

    #[error("Video generation did not complete after {attempts} polls")]
    PollExhausted { attempts: u32 },

    #[error("Failed to fetch generated video: {0}")]
    VideoFetch(String),
}

impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeminiError::Timeout(0)
        } else if err.is_connect() {
            GeminiError::ConnectionRefused(err.to_string())
        } else if let Some(status) = err.status() {
            GeminiError::Provider {
                status: Some(status.as_u16()),
                message: err.to_string(),
            }
        } else {
            GeminiError::Provider {
                status: None,
                message: err.to_string(),
            }
        }
    }
}

impl GeminiError {
    /// Whether re-entering the credential could fix this error
    pub fn is_auth(&self) -> bool {
        matches!(self, GeminiError::Auth(_))
    }

    /// Short retry-later notice shown inside the session; never crashes a card.
    pub fn user_notice(&self) -> String {
        match self {
            GeminiError::Auth(_) => "API 金鑰無效或未設定，請重新輸入。".to_string(),
            GeminiError::SchemaMismatch(_) => "生成失敗，請稍後再試。".to_string(),
            GeminiError::PollExhausted { .. } | GeminiError::VideoFetch(_) => {
                "無法生成圖片/影片，請稍後再試。".to_string()
            }
            _ => "生成失敗，請稍後再試。".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ThreadsmithError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display_includes_status() {
        let err = GeminiError::Provider {
            status: Some(503),
            message: "overloaded".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("503"));
        assert!(text.contains("overloaded"));

        let err = GeminiError::Provider {
            status: None,
            message: "boom".to_string(),
        };
        assert!(!err.to_string().contains("HTTP"));
    }

    #[test]
    fn test_auth_error_is_recoverable() {
        let err = GeminiError::Auth("entity not found".to_string());
        assert!(err.is_auth());
        assert!(!GeminiError::Timeout(30).is_auth());
    }

    #[test]
    fn test_user_notice_never_exposes_internals() {
        let err = GeminiError::SchemaMismatch("expected array at line 1".to_string());
        assert_eq!(err.user_notice(), "生成失敗，請稍後再試。");

        let err = GeminiError::PollExhausted { attempts: 60 };
        assert!(err.user_notice().contains("稍後再試"));
    }

    #[test]
    fn test_top_level_conversions() {
        let err: ThreadsmithError = GeminiError::Timeout(30).into();
        assert!(matches!(err, ThreadsmithError::Gemini(_)));

        let err: ThreadsmithError = SelectionError::EmptyKeyword.into();
        assert!(matches!(err, ThreadsmithError::Selection(_)));
    }
}
