//! FFprobe metadata loading.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use crate::command::{check_ffprobe, output_with_timeout};
use crate::error::{ExtractionError, ExtractionResult};

/// Playable properties of a video, known once metadata has loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
    /// Duration in seconds
    pub duration: f64,
    /// Natural width in pixels
    pub width: u32,
    /// Natural height in pixels
    pub height: u32,
    /// Frame rate (fps)
    pub fps: f64,
    /// Video codec
    pub codec: String,
    /// File size in bytes
    pub size: u64,
}

impl MediaMetadata {
    /// Reject metadata that cannot be sampled.
    pub fn ensure_playable(&self) -> ExtractionResult<()> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(ExtractionError::invalid_video(format!(
                "media has no playable duration ({})",
                self.duration
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ExtractionError::invalid_video(format!(
                "media has no visible frame size ({}x{})",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
    size: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    #[serde(default)]
    tags: HashMap<String, String>,
    #[serde(default)]
    side_data_list: Vec<FfprobeSideData>,
}

#[derive(Debug, Deserialize)]
struct FfprobeSideData {
    rotation: Option<f64>,
}

impl FfprobeStream {
    /// Display rotation in degrees, from the display matrix or the legacy tag.
    fn rotation(&self) -> i64 {
        self.side_data_list
            .iter()
            .find_map(|sd| sd.rotation)
            .or_else(|| self.tags.get("rotate").and_then(|r| r.parse().ok()))
            .map(|deg: f64| deg.round() as i64)
            .unwrap_or(0)
    }

    /// Dimensions as displayed; FFmpeg autorotates decoded frames.
    fn display_size(&self) -> (u32, u32) {
        let (w, h) = (self.width.unwrap_or(0), self.height.unwrap_or(0));
        if self.rotation().rem_euclid(180) == 90 {
            (h, w)
        } else {
            (w, h)
        }
    }
}

/// Load metadata for a media file.
///
/// FFprobe is killed if it runs longer than `timeout`.
pub async fn probe_media(
    path: impl AsRef<Path>,
    timeout: Duration,
) -> ExtractionResult<MediaMetadata> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ExtractionError::FileNotFound(path.to_path_buf()));
    }

    let ffprobe = check_ffprobe()?;

    let mut command = Command::new(ffprobe);
    command
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path);
    let output = output_with_timeout(&mut command, Some(timeout)).await?;

    if !output.status.success() {
        return Err(ExtractionError::FfprobeFailed {
            message: "Failed to load video file".to_string(),
            stderr: Some(String::from_utf8_lossy(&output.stderr).to_string()),
        });
    }

    let metadata = parse_probe_output(&output.stdout)?;
    debug!(
        path = %path.display(),
        duration = metadata.duration,
        width = metadata.width,
        height = metadata.height,
        "Loaded media metadata"
    );
    Ok(metadata)
}

/// Turn raw `ffprobe -print_format json` output into [`MediaMetadata`].
///
/// The container duration wins; the video stream duration is the fallback
/// for containers that do not report one.
fn parse_probe_output(raw: &[u8]) -> ExtractionResult<MediaMetadata> {
    let probe: FfprobeOutput = serde_json::from_slice(raw)?;

    let video_stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type == "video")
        .ok_or_else(|| ExtractionError::invalid_video("No video stream found"))?;

    let duration = probe
        .format
        .duration
        .as_deref()
        .or(video_stream.duration.as_deref())
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    let size = probe
        .format
        .size
        .as_deref()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);

    let fps = video_stream
        .avg_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .or_else(|| video_stream.r_frame_rate.as_deref().and_then(parse_frame_rate))
        .unwrap_or(30.0);

    let (width, height) = video_stream.display_size();

    Ok(MediaMetadata {
        duration,
        width,
        height,
        fps,
        codec: video_stream.codec_name.clone().unwrap_or_default(),
        size,
    })
}

/// Parse frame rate string (e.g., "30/1" or "29.97").
fn parse_frame_rate(s: &str) -> Option<f64> {
    if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        return (den > 0.0 && num > 0.0).then(|| num / den);
    }
    s.parse().ok().filter(|fps: &f64| *fps > 0.0)
}
