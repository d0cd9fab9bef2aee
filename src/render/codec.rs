use std::io::Cursor;

use anyhow::Context as _;

use crate::{
    foundation::{
        error::{QuakeError, QuakeResult},
        math::unpremultiply_rgba8_in_place,
    },
    render::surface::FrameRGBA,
};

/// Image format for an artifact extension (`png`, `jpg`, ...).
pub fn format_for_ext(ext: &str) -> QuakeResult<image::ImageFormat> {
    image::ImageFormat::from_extension(ext)
        .ok_or_else(|| QuakeError::validation(format!("unsupported image extension '{ext}'")))
}

/// Encode a premultiplied frame into `format` bytes.
///
/// Formats without an alpha channel receive the RGB channels only.
pub fn encode_frame(frame: &FrameRGBA, format: image::ImageFormat) -> QuakeResult<Vec<u8>> {
    let mut straight = frame.data.clone();
    unpremultiply_rgba8_in_place(&mut straight);
    let img = image::RgbaImage::from_raw(frame.width, frame.height, straight)
        .ok_or_else(|| QuakeError::render("frame data size mismatch with width*height*4"))?;

    let img = image::DynamicImage::ImageRgba8(img);
    let img = match format {
        image::ImageFormat::Png | image::ImageFormat::Tiff | image::ImageFormat::WebP => img,
        _ => image::DynamicImage::ImageRgb8(img.to_rgb8()),
    };

    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), format)
        .with_context(|| format!("encode frame as {format:?}"))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/codec.rs"]
mod tests;
