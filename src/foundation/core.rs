use crate::foundation::error::{QuakeError, QuakeResult};

pub use kurbo::Point;

/// Zero-based sequence number of a closed window, used to name its artifact.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// The index following `self`.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

/// Output image dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl Canvas {
    /// Reject canvases the raster backend cannot allocate.
    pub fn validate(self) -> QuakeResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(QuakeError::validation("canvas width/height must be non-zero"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(QuakeError::validation(format!(
                "canvas {}x{} exceeds the {}x{} raster limit",
                self.width,
                self.height,
                u16::MAX,
                u16::MAX
            )));
        }
        Ok(())
    }

    /// Bytes needed for one premultiplied RGBA8 frame.
    pub fn rgba_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

/// Artifact file name for `index`, e.g. `frame-000042.png`.
pub fn frame_file_name(index: FrameIndex, ext: &str) -> String {
    format!("frame-{index}.{ext}")
}

/// `ffmpeg` image2 input pattern matching [`frame_file_name`].
pub fn frame_file_pattern(ext: &str) -> String {
    format!("frame-%06d.{ext}")
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
