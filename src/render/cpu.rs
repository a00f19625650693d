use std::sync::Arc;

use crate::{
    assets::{
        decode::DecodedImage,
        font::{FontSource, TextLayoutEngine},
    },
    compose::{
        layout::{LaidLine, fit_image, layout_overlay},
        overlay::{TextOverlay, validate_overlays},
    },
    foundation::{
        core::{Affine, FrameSize, Rgba8},
        error::{MemeError, MemeResult},
    },
    render::frame::FrameRGBA,
};

/// Fill behind the "no image" message.
pub const PLACEHOLDER_BACKGROUND: Rgba8 = Rgba8::rgb(0x33, 0x41, 0x55);
/// Colour of the "no image" message.
pub const PLACEHOLDER_TEXT_COLOR: Rgba8 = Rgba8::rgb(0x94, 0xa3, 0xb8);
/// Message drawn when there is no image yet.
pub const PLACEHOLDER_MESSAGE: &str = "Select or Upload an Image";
/// Font size of the placeholder message.
pub const PLACEHOLDER_FONT_SIZE: f32 = 20.0;

/// Compositor settings.
#[derive(Clone, Debug, Default)]
pub struct RenderSettings {
    /// Colour of the letterbox margins around the image; transparent when unset.
    pub clear_rgba: Option<[u8; 4]>,
    /// Regular face for the placeholder message; the caption face when unset.
    pub placeholder_font: Option<FontSource>,
}

/// CPU compositor: paints a fitted background image and outlined caption text into
/// a fresh frame.
///
/// Each call builds its own pixmap and only returns it once fully painted, so callers
/// never see a partial frame. Identical inputs give byte-identical output.
pub struct Compositor {
    settings: RenderSettings,
    text: TextLayoutEngine,
    placeholder_text: TextLayoutEngine,
}

impl Compositor {
    /// Build a compositor that draws captions in bold `font`.
    ///
    /// The placeholder message uses `settings.placeholder_font` at regular weight.
    pub fn new(font: &FontSource, settings: RenderSettings) -> MemeResult<Self> {
        let placeholder_text =
            TextLayoutEngine::regular(settings.placeholder_font.as_ref().unwrap_or(font))?;
        Ok(Self {
            settings,
            text: TextLayoutEngine::new(font)?,
            placeholder_text,
        })
    }

    /// Compose `image` and `overlays` (painted in slice order) into a `frame`-sized buffer.
    ///
    /// Without an image the frame shows the placeholder and overlays are not drawn.
    #[tracing::instrument(
        skip_all,
        fields(width = frame.width, height = frame.height, overlays = overlays.len(), has_image = image.is_some())
    )]
    pub fn render(
        &mut self,
        frame: FrameSize,
        image: Option<&DecodedImage>,
        overlays: &[TextOverlay],
    ) -> MemeResult<FrameRGBA> {
        frame.validate()?;
        validate_overlays(overlays)?;
        let (width, height) = pixmap_dims(frame.width, frame.height, "frame")?;

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match image {
            None => self.draw_placeholder(&mut ctx, frame)?,
            Some(img) => {
                if let Some([r, g, b, a]) = self.settings.clear_rgba {
                    fill_frame(&mut ctx, frame, Rgba8 { r, g, b, a });
                }
                draw_image(&mut ctx, frame, img)?;
                for overlay in overlays {
                    self.draw_overlay(&mut ctx, frame, overlay)?;
                }
            }
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: frame.width,
            height: frame.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn draw_placeholder(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        frame: FrameSize,
    ) -> MemeResult<()> {
        fill_frame(ctx, frame, PLACEHOLDER_BACKGROUND);
        let line = LaidLine {
            text: PLACEHOLDER_MESSAGE.to_string(),
            center_x: frame.center_x(),
            baseline_y: frame.center_y(),
        };
        draw_line(
            ctx,
            &mut self.placeholder_text,
            &line,
            PLACEHOLDER_FONT_SIZE,
            PLACEHOLDER_TEXT_COLOR,
            None,
        )
    }

    fn draw_overlay(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        frame: FrameSize,
        overlay: &TextOverlay,
    ) -> MemeResult<()> {
        let size_px = overlay.font_size as f32;
        let lines = layout_overlay(overlay, frame, &mut self.text.at_size(size_px)?);
        let stroke = Some((overlay.stroke_color, overlay.stroke_width()));
        for line in &lines {
            draw_line(ctx, &mut self.text, line, size_px, overlay.color, stroke)?;
        }
        Ok(())
    }
}

/// Outline first, then fill, so the outline never covers the glyph interior.
fn draw_line(
    ctx: &mut vello_cpu::RenderContext,
    text: &mut TextLayoutEngine,
    line: &LaidLine,
    size_px: f32,
    fill: Rgba8,
    stroke: Option<(Rgba8, f64)>,
) -> MemeResult<()> {
    let layout = text.layout_line(&line.text, size_px)?;
    let width = f64::from(layout.width());
    let baseline = layout
        .lines()
        .next()
        .map(|l| f64::from(l.metrics().baseline))
        .unwrap_or(0.0);

    let origin = Affine::translate((line.center_x - width / 2.0, line.baseline_y - baseline));
    ctx.set_transform(affine_to_cpu(origin));

    let font = text.font_data();
    if let Some((color, stroke_width)) = stroke {
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(stroke_width));
        ctx.set_paint(color_to_cpu(color));
        paint_glyphs(ctx, font, &layout, GlyphPaint::Stroke);
    }
    ctx.set_paint(color_to_cpu(fill));
    paint_glyphs(ctx, font, &layout, GlyphPaint::Fill);
    Ok(())
}

#[derive(Clone, Copy)]
enum GlyphPaint {
    Fill,
    Stroke,
}

fn paint_glyphs(
    ctx: &mut vello_cpu::RenderContext,
    font: &vello_cpu::peniko::FontData,
    layout: &parley::Layout<()>,
    how: GlyphPaint,
) {
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };

            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            let builder = ctx.glyph_run(font).font_size(run.run().font_size());
            match how {
                GlyphPaint::Fill => builder.fill_glyphs(glyphs),
                GlyphPaint::Stroke => builder.stroke_glyphs(glyphs),
            }
        }
    }
}

fn fill_frame(ctx: &mut vello_cpu::RenderContext, frame: FrameSize, color: Rgba8) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(color_to_cpu(color));
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(frame.width),
        f64::from(frame.height),
    ));
}

fn draw_image(
    ctx: &mut vello_cpu::RenderContext,
    frame: FrameSize,
    img: &DecodedImage,
) -> MemeResult<()> {
    let placement = fit_image(frame, img.width, img.height)?;
    let pixmap = image_premul_bytes_to_pixmap(img.rgba8_premul.as_slice(), img.width, img.height)?;
    let paint = vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    };

    let transform = Affine::translate((placement.rect.x0, placement.rect.y0))
        * Affine::scale(placement.scale);
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(img.width),
        f64::from(img.height),
    ));
    Ok(())
}

fn pixmap_dims(width: u32, height: u32, what: &str) -> MemeResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| MemeError::render(format!("{what} width exceeds u16")))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| MemeError::render(format!("{what} height exceeds u16")))?;
    Ok((w, h))
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> MemeResult<vello_cpu::Pixmap> {
    let (w, h) = pixmap_dims(width, height, "image")?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(MemeError::render("decoded image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}
