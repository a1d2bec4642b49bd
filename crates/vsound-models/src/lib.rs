//! Shared data models for the video soundtrack recommender.
//!
//! This crate provides Serde-serializable types for:
//! - Uploaded media handles and the video MIME gate
//! - Sampled frame sets and capture constants
//! - AI analysis results (song or genre recommendations)
//! - The genre vocabulary and its stock tracks
//! - Analysis run status and progress

pub mod analysis;
pub mod frames;
pub mod genre;
pub mod media;
pub mod status;

// Re-export common types
pub use analysis::{
    AnalysisReport, AnalysisResult, RecommendationMode, Recommendations, SongRecommendation,
    RECOMMENDATION_COUNT, YOUTUBE_SEARCH_URL,
};
pub use frames::{
    sample_timestamps, EncodedFrame, FrameSet, FRAME_COUNT, FRAME_JPEG_QUALITY,
    FRAME_MIME_TYPE, FRAME_SETTLE_DELAY_MS,
};
pub use genre::{genre_tracks, Genre, GenreTrack};
pub use media::{is_video_mime, MediaInput, UploadError, INVALID_UPLOAD_MESSAGE};
pub use status::{AnalysisStatus, ExtractionProgress};
