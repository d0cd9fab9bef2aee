use std::path::Path;

use anyhow::Context as _;
use vello_cpu::kurbo::Shape as _;

use crate::{
    foundation::{
        core::Canvas,
        error::{QuakeError, QuakeResult},
        math::{premul_over_in_place, premul_rgba8, premultiply_rgba8_in_place},
    },
    render::{
        label::LabelRasterizer,
        surface::{FrameRGBA, RenderSettings, RenderSurface},
    },
    track::entity::VisualEntity,
};

const CIRCLE_TOLERANCE: f64 = 0.1;

/// CPU raster surface: background, one filled circle per entity, then the label.
pub struct CpuSurface {
    settings: RenderSettings,
    width: u16,
    height: u16,
    base: Vec<u8>,
    ctx: Option<vello_cpu::RenderContext>,
    label: LabelRasterizer,
}

impl CpuSurface {
    /// Build a surface, decoding and scaling `background` to the canvas if given.
    ///
    /// Fonts are taken from the system plus `fonts_dir` when set.
    pub fn new(
        settings: RenderSettings,
        background: Option<&Path>,
        fonts_dir: Option<&Path>,
    ) -> QuakeResult<Self> {
        let canvas = settings.canvas;
        canvas.validate()?;
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| QuakeError::validation("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| QuakeError::validation("canvas height exceeds u16"))?;

        let mut base = solid_premul(canvas, settings.clear_rgba);
        if let Some(path) = background {
            let bg = load_background(path, canvas)?;
            premul_over_in_place(&mut base, &bg);
        }

        let label = LabelRasterizer::new(settings.label.clone(), canvas, fonts_dir);
        Ok(Self {
            settings,
            width,
            height,
            base,
            ctx: None,
            label,
        })
    }

    fn draw_markers(&mut self, entities: &[VisualEntity]) -> vello_cpu::Pixmap {
        let mut ctx = match self.ctx.take() {
            Some(ctx) => ctx,
            None => vello_cpu::RenderContext::new(self.width, self.height),
        };
        ctx.reset();

        let [r, g, b] = self.settings.marker_rgb;
        for entity in entities {
            let Some(a) = marker_alpha(entity) else {
                continue;
            };
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            let circle =
                vello_cpu::kurbo::Circle::new((entity.x, entity.y), entity.radius);
            ctx.fill_path(&circle.to_path(CIRCLE_TOLERANCE));
        }
        ctx.flush();

        let mut layer = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.render_to_pixmap(&mut layer);
        self.ctx = Some(ctx);
        layer
    }
}

impl RenderSurface for CpuSurface {
    fn canvas(&self) -> Canvas {
        self.settings.canvas
    }

    fn render(&mut self, entities: &[VisualEntity], label: &str) -> QuakeResult<FrameRGBA> {
        let mut data = self.base.clone();

        if !entities.is_empty() {
            let layer = self.draw_markers(entities);
            premul_over_in_place(&mut data, layer.data_as_u8_slice());
        }

        if !label.is_empty() {
            let overlay = self.label.rasterize(label)?;
            premul_over_in_place(&mut data, &overlay);
        }

        Ok(FrameRGBA {
            width: self.settings.canvas.width,
            height: self.settings.canvas.height,
            data,
        })
    }
}

/// Fill alpha for an entity, or `None` when it would draw nothing.
fn marker_alpha(entity: &VisualEntity) -> Option<u8> {
    if !entity.radius.is_finite() || entity.radius <= 0.0 {
        return None;
    }
    if !entity.x.is_finite() || !entity.y.is_finite() || !entity.alpha.is_finite() {
        return None;
    }
    let a = (entity.alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    (a > 0).then_some(a)
}

fn solid_premul(canvas: Canvas, rgba: [u8; 4]) -> Vec<u8> {
    let px = premul_rgba8(rgba);
    let mut out = vec![0u8; canvas.rgba_len()];
    for chunk in out.chunks_exact_mut(4) {
        chunk.copy_from_slice(&px);
    }
    out
}

fn load_background(path: &Path, canvas: Canvas) -> QuakeResult<Vec<u8>> {
    let img = image::open(path)
        .with_context(|| format!("decode background image '{}'", path.display()))?;
    let rgba = img.to_rgba8();
    let rgba = if rgba.dimensions() == (canvas.width, canvas.height) {
        rgba
    } else {
        tracing::debug!(
            from_w = rgba.width(),
            from_h = rgba.height(),
            to_w = canvas.width,
            to_h = canvas.height,
            "scaling background to canvas"
        );
        image::imageops::resize(
            &rgba,
            canvas.width,
            canvas.height,
            image::imageops::FilterType::Triangle,
        )
    };
    let mut bytes = rgba.into_raw();
    premultiply_rgba8_in_place(&mut bytes);
    Ok(bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
