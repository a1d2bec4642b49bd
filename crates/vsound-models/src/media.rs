//! Uploaded media handle.

use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// MIME prefix every upload must carry.
pub const VIDEO_MIME_PREFIX: &str = "video/";

/// User-facing message for rejected uploads.
pub const INVALID_UPLOAD_MESSAGE: &str = "Please upload a valid video file.";

/// Errors raised while accepting an upload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Uploaded file is empty")]
    Empty,
}

impl UploadError {
    /// Message shown to the uploader.
    pub fn user_message(&self) -> &'static str {
        INVALID_UPLOAD_MESSAGE
    }
}

/// Check whether a MIME type names a video container.
///
/// Parameters such as `; codecs=...` are ignored and the comparison is
/// case-insensitive.
pub fn is_video_mime(mime_type: &str) -> bool {
    let essence = mime_type.split(';').next().unwrap_or_default().trim();
    essence.len() > VIDEO_MIME_PREFIX.len()
        && essence
            .get(..VIDEO_MIME_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(VIDEO_MIME_PREFIX))
}

/// A video file handed to one analysis run.
///
/// Every upload path goes through [`MediaInput::new`], so the video MIME gate
/// is applied uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MediaInput {
    /// Location of the media bytes on disk
    pub path: PathBuf,
    /// Declared MIME type (e.g. `video/mp4`)
    pub mime_type: String,
    /// Size in bytes
    pub byte_len: u64,
    /// Original file name, if the uploader sent one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl MediaInput {
    /// Accept a media file, rejecting non-video or empty uploads.
    pub fn new(
        path: impl Into<PathBuf>,
        mime_type: impl Into<String>,
        byte_len: u64,
    ) -> Result<Self, UploadError> {
        let mime_type = mime_type.into();
        if !is_video_mime(&mime_type) {
            return Err(UploadError::UnsupportedMediaType(mime_type));
        }
        if byte_len == 0 {
            return Err(UploadError::Empty);
        }

        Ok(Self {
            path: path.into(),
            mime_type,
            byte_len,
            file_name: None,
        })
    }

    /// Attach the original file name.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
