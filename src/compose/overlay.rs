use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

use crate::foundation::{
    core::Rgba8,
    error::{MemeError, MemeResult},
};

/// Stable identifier of a text overlay, unique within one overlay sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlayId(pub u64);

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Font size and colours shared by new overlays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayStyle {
    /// Font size in pixels.
    pub font_size: f64,
    /// Fill colour.
    pub color: Rgba8,
    /// Outline colour.
    pub stroke_color: Rgba8,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            font_size: 40.0,
            color: Rgba8::WHITE,
            stroke_color: Rgba8::BLACK,
        }
    }
}

fn default_font_size() -> f64 {
    OverlayStyle::default().font_size
}

fn default_color() -> Rgba8 {
    OverlayStyle::default().color
}

fn default_stroke_color() -> Rgba8 {
    OverlayStyle::default().stroke_color
}

/// One block of caption text painted over the image.
///
/// `(x, y)` is in output-frame pixels: `x` is the horizontal centre of every wrapped
/// line and `y` the baseline of the first one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOverlay {
    /// Identifier, unique within the sequence.
    pub id: OverlayId,
    /// Caption text; may be empty.
    pub text: String,
    /// Horizontal centre in frame pixels.
    pub x: f64,
    /// First-line baseline in frame pixels.
    pub y: f64,
    /// Font size in pixels.
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// Fill colour.
    #[serde(default = "default_color")]
    pub color: Rgba8,
    /// Outline colour.
    #[serde(default = "default_stroke_color")]
    pub stroke_color: Rgba8,
}

impl TextOverlay {
    /// Overlay at `(x, y)` using `style`.
    pub fn new(id: OverlayId, text: impl Into<String>, x: f64, y: f64, style: OverlayStyle) -> Self {
        Self {
            id,
            text: text.into(),
            x,
            y,
            font_size: style.font_size,
            color: style.color,
            stroke_color: style.stroke_color,
        }
    }

    /// Outline width: one fifteenth of the font size.
    pub fn stroke_width(&self) -> f64 {
        self.font_size / 15.0
    }

    /// Vertical advance between wrapped lines.
    pub fn line_height(&self) -> f64 {
        self.font_size * 1.2
    }

    /// Reject non-finite positions and non-positive font sizes.
    pub fn validate(&self) -> MemeResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(MemeError::validation(format!(
                "overlay {} position must be finite",
                self.id
            )));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(MemeError::validation(format!(
                "overlay {} font size must be finite and > 0",
                self.id
            )));
        }
        Ok(())
    }
}

/// Validate every overlay and the uniqueness of their ids.
pub fn validate_overlays(overlays: &[TextOverlay]) -> MemeResult<()> {
    let mut seen = HashSet::with_capacity(overlays.len());
    for overlay in overlays {
        overlay.validate()?;
        if !seen.insert(overlay.id) {
            return Err(MemeError::validation(format!(
                "duplicate overlay id {}",
                overlay.id
            )));
        }
    }
    Ok(())
}

/// Parse a JSON array of overlays and validate it.
pub fn parse_overlays(json: &str) -> MemeResult<Vec<TextOverlay>> {
    let overlays: Vec<TextOverlay> =
        serde_json::from_str(json).map_err(|e| MemeError::serde(format!("overlay list: {e}")))?;
    validate_overlays(&overlays)?;
    Ok(overlays)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/overlay.rs"]
mod tests;
