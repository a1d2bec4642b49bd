//! Evenly spaced frame sampling.

use std::time::Duration;

use tracing::{debug, info};
use vsound_models::{
    sample_timestamps, EncodedFrame, FrameSet, FRAME_COUNT, FRAME_JPEG_QUALITY,
    FRAME_SETTLE_DELAY_MS,
};

use crate::error::{ExtractionError, ExtractionResult};
use crate::ffmpeg_source::DEFAULT_CAPTURE_TIMEOUT;
use crate::progress::ProgressReporter;
use crate::source::{FrameSource, SeekCompletion};
use crate::surface::RasterSurface;

/// Frame extraction settings.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Frames to sample per video
    pub frame_count: usize,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
    /// Wait after a seek whose frame is not confirmed ready
    pub settle_delay: Duration,
    /// Upper bound on each FFmpeg or FFprobe process
    pub capture_timeout: Duration,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            frame_count: FRAME_COUNT,
            jpeg_quality: FRAME_JPEG_QUALITY,
            settle_delay: Duration::from_millis(FRAME_SETTLE_DELAY_MS),
            capture_timeout: DEFAULT_CAPTURE_TIMEOUT,
        }
    }
}

impl ExtractorConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            frame_count: std::env::var("FRAME_COUNT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.frame_count),
            jpeg_quality: std::env::var("FRAME_JPEG_QUALITY")
                .ok()
                .and_then(|s| s.parse::<u8>().ok())
                .map(|q| q.clamp(1, 100))
                .unwrap_or(defaults.jpeg_quality),
            settle_delay: std::env::var("FRAME_SETTLE_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.settle_delay),
            capture_timeout: std::env::var("FRAME_CAPTURE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.capture_timeout),
        }
    }
}

/// Samples `frame_count` stills at `i * duration / (frame_count + 1)`.
#[derive(Debug, Clone, Default)]
pub struct FrameExtractor {
    config: ExtractorConfig,
    progress: Option<ProgressReporter>,
}

impl FrameExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    /// Publish `captured/total` after every capture.
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract the frame set from `source`.
    ///
    /// The source is released whether or not extraction succeeds. An empty
    /// result is reported as [`ExtractionError::NoFrames`].
    pub async fn extract<S>(&self, source: &mut S) -> ExtractionResult<FrameSet>
    where
        S: FrameSource + ?Sized,
    {
        let result = self.capture_all(source).await;
        source.release().await;

        let frames = result?;
        if frames.is_empty() {
            return Err(ExtractionError::NoFrames);
        }
        Ok(frames)
    }

    async fn capture_all<S>(&self, source: &mut S) -> ExtractionResult<FrameSet>
    where
        S: FrameSource + ?Sized,
    {
        let metadata = source.load_metadata().await?;
        metadata.ensure_playable()?;

        let total = self.config.frame_count;
        let timestamps = sample_timestamps(metadata.duration, total);
        info!(
            duration = metadata.duration,
            width = metadata.width,
            height = metadata.height,
            frames = total,
            "Extracting frames"
        );

        let mut surface = RasterSurface::acquire(metadata.width, metadata.height)?;
        let mut frames = Vec::with_capacity(total);

        for (index, timestamp) in timestamps.into_iter().enumerate() {
            match source.seek(timestamp).await? {
                SeekCompletion::FrameReady => {}
                SeekCompletion::Pending => {
                    if !self.config.settle_delay.is_zero() {
                        tokio::time::sleep(self.config.settle_delay).await;
                    }
                }
            }

            source.snapshot(&mut surface).await?;
            let jpeg = surface.encode_jpeg(self.config.jpeg_quality)?;
            debug!(index, timestamp, bytes = jpeg.len(), "Captured frame");

            frames.push(EncodedFrame {
                index,
                timestamp,
                width: surface.width(),
                height: surface.height(),
                jpeg,
            });

            if let Some(progress) = &self.progress {
                progress.report(frames.len(), total);
            }
        }

        Ok(FrameSet::new(frames))
    }
}
