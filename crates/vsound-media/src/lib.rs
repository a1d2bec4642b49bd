//! Frame extraction and soundtrack playback for the video soundtrack recommender.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building and FFprobe metadata loading
//! - The [`FrameSource`] seam over a seekable media element
//! - Sequential seek-and-capture sampling with JPEG encoding
//! - A progress channel for capture status
//! - Genre soundtrack playback synced to video transport events

pub mod command;
pub mod error;
pub mod extractor;
pub mod ffmpeg_source;
pub mod probe;
pub mod progress;
pub mod soundtrack;
pub mod source;
pub mod surface;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use error::{ExtractionError, ExtractionResult};
pub use extractor::{ExtractorConfig, FrameExtractor};
pub use ffmpeg_source::FfmpegFrameSource;
pub use probe::{probe_media, MediaMetadata};
pub use progress::{ProgressReceiver, ProgressReporter};
pub use soundtrack::{AudioOutput, SoundtrackPlayer, VideoTransport};
pub use source::{FrameSource, SeekCompletion};
pub use surface::RasterSurface;
