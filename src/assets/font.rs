use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    compose::wrap::TextMeasure,
    foundation::error::{MemeError, MemeResult},
};

/// Bold display faces tried when no font is configured, in preference order.
pub const SYSTEM_BOLD_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/msttcorefonts/Impact.ttf",
    "/Library/Fonts/Impact.ttf",
    "/System/Library/Fonts/Supplemental/Impact.ttf",
    "C:\\Windows\\Fonts\\impact.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Regular sans-serif faces tried for interface text such as the placeholder message.
pub const SYSTEM_REGULAR_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Raw TTF/OTF bytes of the face used for captions.
#[derive(Clone)]
pub struct FontSource {
    bytes: Arc<Vec<u8>>,
    origin: String,
}

impl std::fmt::Debug for FontSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSource")
            .field("origin", &self.origin)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

impl FontSource {
    /// Wrap in-memory font bytes; `origin` is only used for diagnostics.
    pub fn from_bytes(bytes: Vec<u8>, origin: impl Into<String>) -> MemeResult<Self> {
        if bytes.is_empty() {
            return Err(MemeError::decode("font data is empty"));
        }
        Ok(Self {
            bytes: Arc::new(bytes),
            origin: origin.into(),
        })
    }

    /// Read a font file.
    pub fn from_path(path: &Path) -> MemeResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Self::from_bytes(bytes, path.display().to_string())
    }

    /// Use `explicit` when given, otherwise the first installed system candidate.
    pub fn resolve(explicit: Option<&Path>) -> MemeResult<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        let path = discover_system_font().ok_or_else(|| {
            MemeError::validation(
                "no bold display font found; pass --font or set MEMEGEN_FONT",
            )
        })?;
        tracing::debug!(path = %path.display(), "using system font");
        Self::from_path(&path)
    }

    /// Font bytes.
    pub fn bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// Where the bytes came from.
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

/// First entry of [`SYSTEM_BOLD_FONT_CANDIDATES`] that exists on disk.
pub fn discover_system_font() -> Option<PathBuf> {
    first_installed(SYSTEM_BOLD_FONT_CANDIDATES)
}

/// First entry of [`SYSTEM_REGULAR_FONT_CANDIDATES`] that exists on disk.
pub fn discover_regular_font() -> Option<PathBuf> {
    first_installed(SYSTEM_REGULAR_FONT_CANDIDATES)
}

fn first_installed(candidates: &[&str]) -> Option<PathBuf> {
    candidates.iter().map(PathBuf::from).find(|p| p.is_file())
}

/// Stateful helper for shaping single lines of text with one registered face.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family_name: String,
    weight: parley::style::FontWeight,
    font_data: vello_cpu::peniko::FontData,
}

impl TextLayoutEngine {
    /// Register `font` for bold caption text.
    pub fn new(font: &FontSource) -> MemeResult<Self> {
        Self::with_weight(font, parley::style::FontWeight::BOLD)
    }

    /// Register `font` for regular-weight text.
    pub fn regular(font: &FontSource) -> MemeResult<Self> {
        Self::with_weight(font, parley::style::FontWeight::NORMAL)
    }

    fn with_weight(font: &FontSource, weight: parley::style::FontWeight) -> MemeResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes().to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            MemeError::decode(format!(
                "no font families registered from '{}'",
                font.origin()
            ))
        })?;

        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| MemeError::decode("registered font family has no name"))?
            .to_string();

        let font_data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font.bytes().to_vec()),
            0,
        );

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            weight,
            font_data,
        })
    }

    /// Family name detected from the font data.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub(crate) fn font_data(&self) -> &vello_cpu::peniko::FontData {
        &self.font_data
    }

    /// Shape `text` as a single unbroken line.
    pub fn layout_line(&mut self, text: &str, size_px: f32) -> MemeResult<parley::Layout<()>> {
        validate_size(size_px)?;
        Ok(self.shape(text, size_px))
    }

    /// Rendered advance width of `text` as a single line.
    pub fn measure(&mut self, text: &str, size_px: f32) -> MemeResult<f32> {
        Ok(self.layout_line(text, size_px)?.width())
    }

    /// Borrow the engine as a [`TextMeasure`] at a fixed size.
    pub fn at_size(&mut self, size_px: f32) -> MemeResult<SizedMeasure<'_>> {
        validate_size(size_px)?;
        Ok(SizedMeasure {
            engine: self,
            size_px,
        })
    }

    fn shape(&mut self, text: &str, size_px: f32) -> parley::Layout<()> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(self.weight));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

/// [`TextLayoutEngine`] pinned to one font size.
pub struct SizedMeasure<'a> {
    engine: &'a mut TextLayoutEngine,
    size_px: f32,
}

impl TextMeasure for SizedMeasure<'_> {
    fn width(&mut self, text: &str) -> f32 {
        self.engine.shape(text, self.size_px).width()
    }
}

fn validate_size(size_px: f32) -> MemeResult<()> {
    if !size_px.is_finite() || size_px <= 0.0 {
        return Err(MemeError::validation(
            "font size must be finite and > 0",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
