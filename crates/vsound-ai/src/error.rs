//! Recommendation client error types.

use thiserror::Error;

pub type AiResult<T> = Result<T, AiError>;

/// Message shown to users for any AI service failure.
pub const SERVICE_FAILURE_MESSAGE: &str =
    "Failed to get music recommendations from the AI. Please try again.";

#[derive(Debug, Error)]
pub enum AiError {
    /// Transport failure, non-success status, or an empty reply.
    #[error("AI service failed: {0}")]
    Service(String),

    /// The reply did not have the requested shape.
    #[error("Invalid response format from AI service: {0}")]
    Validation(String),

    #[error("No frames to analyze")]
    NoFrames,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AiError {
    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Message safe to show to the user.
    pub fn user_message(&self) -> &'static str {
        SERVICE_FAILURE_MESSAGE
    }
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Service(format!("request timed out: {}", e))
        } else {
            Self::Service(format!("request failed: {}", e))
        }
    }
}
