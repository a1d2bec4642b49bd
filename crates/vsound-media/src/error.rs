//! Error types for frame extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for frame extraction.
pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Errors that can occur while sampling frames from a video.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("FFmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("FFprobe command failed: {message}")]
    FfprobeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Invalid video file: {0}")]
    InvalidVideo(String),

    #[error("Could not acquire a {width}x{height} rendering surface")]
    SurfaceUnavailable { width: u32, height: u32 },

    #[error("Frame capture at {timestamp:.3}s failed: {message}")]
    CaptureFailed { timestamp: f64, message: String },

    #[error("JPEG encoding failed: {0}")]
    Encode(String),

    #[error("Could not extract frames from the video")]
    NoFrames,

    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl ExtractionError {
    /// Create an FFmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Create a capture failure error.
    pub fn capture_failed(timestamp: f64, message: impl Into<String>) -> Self {
        Self::CaptureFailed {
            timestamp,
            message: message.into(),
        }
    }

    pub fn invalid_video(message: impl Into<String>) -> Self {
        Self::InvalidVideo(message.into())
    }

    /// Whether the media itself could not be loaded (as opposed to tooling
    /// or capture problems).
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound(_) | Self::InvalidVideo(_) | Self::FfprobeFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_failed_message() {
        let err = ExtractionError::capture_failed(1.6667, "short read");
        assert_eq!(err.to_string(), "Frame capture at 1.667s failed: short read");
        assert!(!err.is_load_failure());
    }

    #[test]
    fn test_load_failures() {
        assert!(ExtractionError::invalid_video("no stream").is_load_failure());
        assert!(ExtractionError::FileNotFound(PathBuf::from("/x.mp4")).is_load_failure());
        assert!(!ExtractionError::NoFrames.is_load_failure());
    }
}
