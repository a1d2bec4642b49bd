//! Off-screen raster surface that frames are drawn onto before encoding.

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, RgbImage};

use crate::error::{ExtractionError, ExtractionResult};

/// Largest surface we are willing to allocate (8K UHD).
pub const MAX_SURFACE_PIXELS: u64 = 7680 * 4320;

/// Bytes per packed RGB24 pixel.
const RGB_CHANNELS: usize = 3;

/// A reusable RGB24 canvas sized to the source video.
///
/// One surface serves every capture of an extraction run; captures are
/// sequential so the buffer is never shared.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    image: RgbImage,
}

impl RasterSurface {
    /// Allocate a surface of the given dimensions.
    pub fn acquire(width: u32, height: u32) -> ExtractionResult<Self> {
        let pixels = u64::from(width) * u64::from(height);
        if pixels == 0 || pixels > MAX_SURFACE_PIXELS {
            return Err(ExtractionError::SurfaceUnavailable { width, height });
        }

        Ok(Self {
            image: RgbImage::new(width, height),
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Exact number of bytes a packed RGB24 frame of this size occupies.
    pub fn frame_len(&self) -> usize {
        self.width() as usize * self.height() as usize * RGB_CHANNELS
    }

    /// Draw a packed RGB24 frame onto the surface.
    pub fn draw_rgb24(&mut self, pixels: &[u8]) -> ExtractionResult<()> {
        let expected = self.frame_len();
        if pixels.len() < expected {
            return Err(ExtractionError::Encode(format!(
                "frame has {} bytes, surface needs {}",
                pixels.len(),
                expected
            )));
        }

        self.image.copy_from_slice(&pixels[..expected]);
        Ok(())
    }

    /// Raw pixel buffer, row-major RGB24.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Mutable pixel buffer, for sources that render in place.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.image
    }

    /// Encode the current contents as baseline JPEG.
    pub fn encode_jpeg(&self, quality: u8) -> ExtractionResult<Vec<u8>> {
        let mut buf = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
        encoder
            .encode(
                self.image.as_raw(),
                self.width(),
                self.height(),
                ColorType::Rgb8,
            )
            .map_err(|e| ExtractionError::Encode(e.to_string()))?;
        Ok(buf)
    }
}
