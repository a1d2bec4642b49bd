//! [`FrameSource`] backed by the FFmpeg CLI.

use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempPath;
use tracing::{debug, warn};
use vsound_models::MediaInput;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{ExtractionError, ExtractionResult};
use crate::probe::{probe_media, MediaMetadata};
use crate::source::{FrameSource, SeekCompletion};
use crate::surface::RasterSurface;

/// Default timeout for one FFmpeg or FFprobe invocation.
pub const DEFAULT_CAPTURE_TIMEOUT: Duration = Duration::from_secs(30);

/// Decodes frames from a file on disk, one FFmpeg invocation per seek.
///
/// FFmpeg exits only after the frame is fully decoded, so every seek
/// completes with [`SeekCompletion::FrameReady`].
pub struct FfmpegFrameSource {
    media: MediaInput,
    /// Upload owned by this source, deleted on release
    owned_file: Option<TempPath>,
    runner: FfmpegRunner,
    /// Bound on each child process, probe included
    timeout: Duration,
    metadata: Option<MediaMetadata>,
    /// Last requested seek position
    playhead: f64,
    /// Decoded RGB24 frame at the playhead
    decoded: Option<Vec<u8>>,
}

impl FfmpegFrameSource {
    pub fn new(media: MediaInput) -> Self {
        Self {
            media,
            owned_file: None,
            runner: FfmpegRunner::new().with_timeout(DEFAULT_CAPTURE_TIMEOUT),
            timeout: DEFAULT_CAPTURE_TIMEOUT,
            metadata: None,
            playhead: 0.0,
            decoded: None,
        }
    }

    /// Take ownership of the temp file backing `media`; it is removed on release.
    pub fn with_owned_file(mut self, file: TempPath) -> Self {
        self.owned_file = Some(file);
        self
    }

    /// Override the per-process timeout used for probing and each capture.
    pub fn with_capture_timeout(mut self, timeout: Duration) -> Self {
        self.runner = FfmpegRunner::new().with_timeout(timeout);
        self.timeout = timeout;
        self
    }

    pub fn media(&self) -> &MediaInput {
        &self.media
    }

    async fn metadata(&mut self) -> ExtractionResult<MediaMetadata> {
        match &self.metadata {
            Some(meta) => Ok(meta.clone()),
            None => self.load_metadata().await,
        }
    }
}

#[async_trait]
impl FrameSource for FfmpegFrameSource {
    async fn load_metadata(&mut self) -> ExtractionResult<MediaMetadata> {
        let metadata = probe_media(self.media.path(), self.timeout).await?;
        self.metadata = Some(metadata.clone());
        Ok(metadata)
    }

    async fn seek(&mut self, timestamp: f64) -> ExtractionResult<SeekCompletion> {
        let metadata = self.metadata().await?;
        self.playhead = timestamp;
        self.decoded = None;

        let cmd = FfmpegCommand::frame_grab(self.media.path(), timestamp);
        let pixels = self
            .runner
            .capture_stdout(&cmd)
            .await
            .map_err(|e| match e {
                ExtractionError::FfmpegFailed { stderr, .. } => ExtractionError::capture_failed(
                    timestamp,
                    stderr.unwrap_or_else(|| "FFmpeg exited with non-zero status".to_string()),
                ),
                other => other,
            })?;

        let expected = metadata.width as usize * metadata.height as usize * 3;
        if pixels.len() < expected {
            return Err(ExtractionError::capture_failed(
                timestamp,
                format!("decoded {} bytes, expected {}", pixels.len(), expected),
            ));
        }

        debug!(timestamp, bytes = pixels.len(), "Decoded frame");
        self.decoded = Some(pixels);
        Ok(SeekCompletion::FrameReady)
    }

    async fn snapshot(&mut self, surface: &mut RasterSurface) -> ExtractionResult<()> {
        match &self.decoded {
            Some(pixels) => surface.draw_rgb24(pixels),
            None => Err(ExtractionError::capture_failed(
                self.playhead,
                "no decoded frame at the playhead",
            )),
        }
    }

    async fn release(&mut self) {
        self.decoded = None;
        if let Some(file) = self.owned_file.take() {
            let path = file.to_path_buf();
            if let Err(e) = file.close() {
                warn!(path = %path.display(), "Failed to remove upload: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;
    use std::io::Write;
    use std::path::{Path, PathBuf};

    #[tokio::test]
    async fn test_release_removes_owned_upload() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not really a video").unwrap();
        let path = file.path().to_path_buf();

        let media = MediaInput::new(&path, "video/mp4", 18).unwrap();
        let mut source = FfmpegFrameSource::new(media).with_owned_file(file.into_temp_path());

        assert!(path.exists());
        source.release().await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_snapshot_without_seek_fails() {
        let media = MediaInput::new("/tmp/none.mp4", "video/mp4", 1).unwrap();
        let mut source = FfmpegFrameSource::new(media);
        let mut surface = RasterSurface::acquire(2, 2).unwrap();

        let err = source.snapshot(&mut surface).await.unwrap_err();
        assert!(matches!(err, ExtractionError::CaptureFailed { .. }));
    }

    #[tokio::test]
    async fn test_seek_on_missing_file_is_load_failure() {
        let media = MediaInput::new("/definitely/not/here.mp4", "video/mp4", 1).unwrap();
        let mut source = FfmpegFrameSource::new(media);

        let err = source.seek(1.0).await.unwrap_err();
        assert!(err.is_load_failure());
    }

    /// Encode a synthetic clip with FFmpeg's test source.
    fn make_clip(dir: &Path, name: &str, size: &str) -> PathBuf {
        let path = dir.join(name);
        let status = std::process::Command::new("ffmpeg")
            .args(["-y", "-v", "error", "-f", "lavfi", "-i"])
            .arg(format!("testsrc=size={}:rate=10:duration=2", size))
            .args(["-c:v", "mpeg4", "-pix_fmt", "yuv420p"])
            .arg(&path)
            .status()
            .unwrap();
        assert!(status.success());
        path
    }

    fn source_for(path: &Path) -> FfmpegFrameSource {
        let len = std::fs::metadata(path).unwrap().len();
        FfmpegFrameSource::new(MediaInput::new(path, "video/mp4", len).unwrap())
    }

    #[tokio::test]
    #[ignore = "requires ffmpeg"]
    async fn test_extracts_five_jpegs_at_source_size() {
        let dir = tempfile::tempdir().unwrap();
        let clip = make_clip(dir.path(), "clip.mp4", "64x48");
        let mut source = source_for(&clip);

        let config = crate::extractor::ExtractorConfig {
            settle_delay: Duration::ZERO,
            ..Default::default()
        };
        let frames = crate::extractor::FrameExtractor::new(config)
            .extract(&mut source)
            .await
            .unwrap();

        assert_eq!(frames.len(), 5);
        for frame in &frames {
            assert_eq!((frame.width, frame.height), (64, 48));
            let decoded =
                image::load_from_memory_with_format(&frame.jpeg, image::ImageFormat::Jpeg)
                    .unwrap();
            assert_eq!((decoded.width(), decoded.height()), (64, 48));
        }
        assert!(frames.timestamps().windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    #[ignore = "requires ffmpeg"]
    async fn test_seek_past_end_is_capture_failure() {
        let dir = tempfile::tempdir().unwrap();
        let clip = make_clip(dir.path(), "clip.mp4", "32x32");
        let mut source = source_for(&clip);

        let metadata = source.load_metadata().await.unwrap();
        let err = source.seek(metadata.duration + 30.0).await.unwrap_err();

        assert!(matches!(err, ExtractionError::CaptureFailed { .. }), "{err}");
    }

    #[tokio::test]
    #[ignore = "requires ffmpeg 6.1+ (-display_rotation)"]
    async fn test_rotated_clip_uses_display_size() {
        let dir = tempfile::tempdir().unwrap();
        let plain = make_clip(dir.path(), "plain.mp4", "64x48");
        let rotated = dir.path().join("rotated.mp4");
        let status = std::process::Command::new("ffmpeg")
            .args(["-y", "-v", "error", "-display_rotation", "90", "-i"])
            .arg(&plain)
            .args(["-c", "copy"])
            .arg(&rotated)
            .status()
            .unwrap();
        assert!(status.success());

        let mut source = source_for(&rotated);
        let metadata = source.load_metadata().await.unwrap();
        assert_eq!((metadata.width, metadata.height), (48, 64));

        source.seek(metadata.duration / 2.0).await.unwrap();
        let mut surface = RasterSurface::acquire(metadata.width, metadata.height).unwrap();
        source.snapshot(&mut surface).await.unwrap();
        source.release().await;
    }
}
