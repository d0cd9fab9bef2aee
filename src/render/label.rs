use std::{path::Path, sync::Arc};

use crate::{
    foundation::{
        core::Canvas,
        error::{QuakeError, QuakeResult},
    },
    render::surface::LabelStyle,
};

/// Rasterizes one line of text into a canvas-sized premultiplied RGBA8 overlay.
pub(crate) struct LabelRasterizer {
    style: LabelStyle,
    canvas: Canvas,
    options: usvg::Options<'static>,
}

impl LabelRasterizer {
    pub(crate) fn new(style: LabelStyle, canvas: Canvas, fonts_dir: Option<&Path>) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        if let Some(dir) = fonts_dir {
            db.load_fonts_dir(dir);
        }
        if db.faces().next().is_none() {
            tracing::warn!("no fonts available; frame labels will be blank");
        }

        let options = usvg::Options {
            fontdb: Arc::new(db),
            font_resolver: label_font_resolver(),
            ..Default::default()
        };
        Self {
            style,
            canvas,
            options,
        }
    }

    pub(crate) fn rasterize(&self, text: &str) -> QuakeResult<Vec<u8>> {
        let svg = self.label_svg(text);
        let tree = usvg::Tree::from_data(svg.as_bytes(), &self.options)
            .map_err(|e| QuakeError::render(format!("label svg: {e}")))?;
        let mut pixmap = resvg::tiny_skia::Pixmap::new(self.canvas.width, self.canvas.height)
            .ok_or_else(|| QuakeError::render("failed to allocate label pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );
        Ok(pixmap.take())
    }

    fn label_svg(&self, text: &str) -> String {
        let Canvas { width, height } = self.canvas;
        let [r, g, b, a] = self.style.rgba;
        let baseline = f64::from(height) - self.style.baseline_from_bottom;
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}"><text x="{x}" y="{baseline}" font-family="{family}" font-size="{size}" fill="rgb({r},{g},{b})" fill-opacity="{opacity}">{text}</text></svg>"#,
            x = self.style.x,
            family = escape_xml(&self.style.font_family),
            size = self.style.size_px,
            opacity = f32::from(a) / 255.0,
            text = escape_xml(text),
        )
    }
}

fn label_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }
            families.push(usvg::fontdb::Family::SansSerif);

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style: usvg::fontdb::Style::Normal,
            };
            // Any face beats a blank label.
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/label.rs"]
mod tests;
