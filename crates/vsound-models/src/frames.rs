//! Sampled frame data and capture settings.

use base64::{engine::general_purpose::STANDARD, Engine};
use schemars::JsonSchema;
use serde::Serialize;

/// Number of frames sampled from each video
pub const FRAME_COUNT: usize = 5;
/// JPEG quality (1-100) used for captured frames
pub const FRAME_JPEG_QUALITY: u8 = 80;
/// Wait applied after a seek when the source cannot signal a decoded frame
pub const FRAME_SETTLE_DELAY_MS: u64 = 500;
/// MIME type of every encoded frame
pub const FRAME_MIME_TYPE: &str = "image/jpeg";

/// Evenly spaced sample points for a clip.
///
/// Returns `i * duration / (count + 1)` for `i = 1..=count`, so every
/// timestamp lies strictly inside `(0, duration)` for a positive duration.
pub fn sample_timestamps(duration: f64, count: usize) -> Vec<f64> {
    let interval = duration / (count as f64 + 1.0);
    (1..=count).map(|i| i as f64 * interval).collect()
}

/// One captured still, JPEG encoded.
///
/// Serializes as metadata only; the JPEG payload travels through
/// [`EncodedFrame::to_base64`].
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct EncodedFrame {
    /// Zero-based position in the frame set
    pub index: usize,
    /// Source timestamp in seconds
    pub timestamp: f64,
    pub width: u32,
    pub height: u32,
    /// JPEG bytes
    #[serde(skip)]
    pub jpeg: Vec<u8>,
}

impl EncodedFrame {
    /// Standard base64 of the JPEG payload, as inlined into AI requests.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.jpeg)
    }

    pub fn mime_type(&self) -> &'static str {
        FRAME_MIME_TYPE
    }
}

/// Ordered frames produced by one extraction. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
pub struct FrameSet {
    frames: Vec<EncodedFrame>,
}

impl FrameSet {
    pub fn new(frames: Vec<EncodedFrame>) -> Self {
        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[EncodedFrame] {
        &self.frames
    }

    pub fn iter(&self) -> impl Iterator<Item = &EncodedFrame> {
        self.frames.iter()
    }

    /// Timestamps of the captured frames, in capture order.
    pub fn timestamps(&self) -> Vec<f64> {
        self.frames.iter().map(|f| f.timestamp).collect()
    }
}

impl<'a> IntoIterator for &'a FrameSet {
    type Item = &'a EncodedFrame;
    type IntoIter = std::slice::Iter<'a, EncodedFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_timestamps_ten_second_clip() {
        let ts = sample_timestamps(10.0, FRAME_COUNT);
        let expected = [1.667, 3.333, 5.0, 6.667, 8.333];

        assert_eq!(ts.len(), expected.len());
        for (got, want) in ts.iter().zip(expected) {
            assert!((got - want).abs() < 0.001, "{got} != {want}");
        }
    }

    #[test]
    fn test_sample_timestamps_strictly_inside_duration() {
        for &(duration, count) in &[(0.04, 5), (1.0, 1), (3600.0, 12), (7.5, 3)] {
            let ts = sample_timestamps(duration, count);
            assert_eq!(ts.len(), count);
            assert!(ts.windows(2).all(|w| w[0] < w[1]));
            assert!(ts.iter().all(|&t| t > 0.0 && t < duration));
        }
    }

    #[test]
    fn test_sample_timestamps_zero_count() {
        assert!(sample_timestamps(10.0, 0).is_empty());
    }

    #[test]
    fn test_frame_base64() {
        let frame = EncodedFrame {
            index: 0,
            timestamp: 1.0,
            width: 2,
            height: 2,
            jpeg: vec![0xFF, 0xD8, 0xFF],
        };
        assert_eq!(frame.to_base64(), "/9j/");
        assert_eq!(frame.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_frame_set_serializes_metadata_only() {
        let set = FrameSet::new(vec![EncodedFrame {
            index: 0,
            timestamp: 2.5,
            width: 4,
            height: 3,
            jpeg: vec![0xFF, 0xD8, 0xFF],
        }]);

        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "frames": [{ "index": 0, "timestamp": 2.5, "width": 4, "height": 3 }]
            })
        );
    }
}
