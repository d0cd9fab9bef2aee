use crate::{
    foundation::{core::Canvas, error::QuakeResult},
    track::entity::VisualEntity,
};

/// A rendered frame as RGBA8 pixels.
///
/// Pixels are **premultiplied alpha**, row-major and tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Premultiplied pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Label placement and styling.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    /// Straight-alpha RGBA8 text colour.
    pub rgba: [u8; 4],
    /// Font size in pixels.
    pub size_px: f32,
    /// Left edge of the text.
    pub x: f64,
    /// Baseline distance from the bottom edge of the canvas.
    pub baseline_from_bottom: f64,
    /// CSS-style font family list.
    pub font_family: String,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            rgba: [255, 0, 0, 255],
            size_px: 30.0,
            x: 0.0,
            baseline_from_bottom: 30.0,
            font_family: "Arial, sans-serif".to_string(),
        }
    }
}

/// Styling shared by every frame of a run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Output size.
    pub canvas: Canvas,
    /// Straight-alpha RGBA8 fill used when no background image is set.
    pub clear_rgba: [u8; 4],
    /// Marker colour; per-entity alpha is applied on top.
    pub marker_rgb: [u8; 3],
    /// Date label styling.
    pub label: LabelStyle,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            clear_rgba: [18, 20, 28, 255],
            marker_rgb: [255, 0, 0],
            label: LabelStyle::default(),
        }
    }
}

/// Draws the tracked entities of one closed window.
pub trait RenderSurface {
    /// Output size of every frame produced by this surface.
    fn canvas(&self) -> Canvas;

    /// Draw `entities` over the background with `label` at the configured position.
    fn render(&mut self, entities: &[VisualEntity], label: &str) -> QuakeResult<FrameRGBA>;
}
