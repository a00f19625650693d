use crate::{
    compose::{
        overlay::TextOverlay,
        wrap::{TextMeasure, wrap_words},
    },
    foundation::{
        core::{FrameSize, Rect},
        error::{MemeError, MemeResult},
    },
};

/// Fraction of the frame width a wrapped line may occupy.
pub const WRAP_WIDTH_RATIO: f64 = 0.9;

/// Where the background image lands inside the frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImagePlacement {
    /// Uniform scale applied to the native image size.
    pub scale: f64,
    /// Destination rectangle in frame pixels.
    pub rect: Rect,
}

/// Uniform fit of an `image_w`×`image_h` image, centred in `frame`.
///
/// Aspect ratio is kept, so the unused axis is letterboxed or pillarboxed.
pub fn fit_image(frame: FrameSize, image_w: u32, image_h: u32) -> MemeResult<ImagePlacement> {
    if image_w == 0 || image_h == 0 {
        return Err(MemeError::validation("image width and height must be > 0"));
    }

    let (fw, fh) = (f64::from(frame.width), f64::from(frame.height));
    let (iw, ih) = (f64::from(image_w), f64::from(image_h));

    let scale = (fw / iw).min(fh / ih);
    let x = fw / 2.0 - iw * scale / 2.0;
    let y = fh / 2.0 - ih * scale / 2.0;

    Ok(ImagePlacement {
        scale,
        rect: Rect::new(x, y, x + iw * scale, y + ih * scale),
    })
}

/// A wrapped caption line ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct LaidLine {
    /// Line text.
    pub text: String,
    /// Horizontal centre in frame pixels.
    pub center_x: f64,
    /// Baseline in frame pixels.
    pub baseline_y: f64,
}

/// Wrap an overlay to 90% of the frame width and stack its lines from `overlay.y`.
pub fn layout_overlay<M: TextMeasure + ?Sized>(
    overlay: &TextOverlay,
    frame: FrameSize,
    measure: &mut M,
) -> Vec<LaidLine> {
    let budget = (f64::from(frame.width) * WRAP_WIDTH_RATIO) as f32;
    let line_height = overlay.line_height();

    wrap_words(&overlay.text, budget, measure)
        .into_iter()
        .enumerate()
        .map(|(i, text)| LaidLine {
            text,
            center_x: overlay.x,
            baseline_y: overlay.y + (i as f64) * line_height,
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/compose/layout.rs"]
mod tests;
