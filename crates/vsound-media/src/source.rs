//! The seekable media seam the extractor drives.

use async_trait::async_trait;

use crate::error::ExtractionResult;
use crate::probe::MediaMetadata;
use crate::surface::RasterSurface;

/// How a seek completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekCompletion {
    /// The frame at the requested position is decoded and ready to draw.
    FrameReady,
    /// The seek finished but the source cannot confirm the frame has been
    /// rendered; the caller waits the settle delay before drawing.
    Pending,
}

/// A single seekable media element.
///
/// Seeks on one element are not ordered with respect to each other, so
/// callers issue them one at a time and draw before seeking again.
#[async_trait]
pub trait FrameSource: Send {
    /// Load duration and natural dimensions.
    async fn load_metadata(&mut self) -> ExtractionResult<MediaMetadata>;

    /// Move the playhead to `timestamp` seconds.
    async fn seek(&mut self, timestamp: f64) -> ExtractionResult<SeekCompletion>;

    /// Draw the frame at the playhead onto `surface`.
    async fn snapshot(&mut self, surface: &mut RasterSurface) -> ExtractionResult<()>;

    /// Stop playback and drop transient handles. Called once, after the
    /// last capture or on failure.
    async fn release(&mut self);
}
