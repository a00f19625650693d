//! Environment-driven settings for the model service and text font.

use std::path::{Path, PathBuf};

use crate::{
    assets::font::{FontSource, discover_regular_font},
    foundation::error::{MemeError, MemeResult},
};

/// Default REST root of the Gemini API.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used to suggest captions.
pub const DEFAULT_CAPTION_MODEL: &str = "gemini-2.5-flash";
/// Model used for instruction-driven image edits.
pub const DEFAULT_EDIT_MODEL: &str = "gemini-2.5-flash-image";
/// Model used for structured image analysis.
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-3-pro-preview";

/// Model identifiers per AI operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelIds {
    /// Caption suggestions.
    pub caption: String,
    /// Image edits.
    pub edit: String,
    /// Image analysis.
    pub analysis: String,
}

impl Default for ModelIds {
    fn default() -> Self {
        Self {
            caption: DEFAULT_CAPTION_MODEL.to_string(),
            edit: DEFAULT_EDIT_MODEL.to_string(),
            analysis: DEFAULT_ANALYSIS_MODEL.to_string(),
        }
    }
}

/// Credentials and endpoints for the Gemini client.
#[derive(Clone, PartialEq, Eq)]
pub struct AiConfig {
    /// API key sent as `x-goog-api-key`.
    pub api_key: String,
    /// REST root, without a trailing slash.
    pub base_url: String,
    /// Per-operation model ids.
    pub models: ModelIds,
}

impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("models", &self.models)
            .finish()
    }
}

impl AiConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> MemeResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; empty values count as unset.
    ///
    /// `GEMINI_API_KEY` wins over `API_KEY`. One of them is required.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> MemeResult<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("GEMINI_API_KEY")
            .or_else(|| get("API_KEY"))
            .ok_or_else(|| {
                MemeError::validation("missing API key: set GEMINI_API_KEY (or API_KEY)")
            })?;
        let base_url = get("MEMEGEN_GEMINI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let defaults = ModelIds::default();

        Ok(Self {
            api_key,
            base_url,
            models: ModelIds {
                caption: get("MEMEGEN_CAPTION_MODEL").unwrap_or(defaults.caption),
                edit: get("MEMEGEN_EDIT_MODEL").unwrap_or(defaults.edit),
                analysis: get("MEMEGEN_ANALYSIS_MODEL").unwrap_or(defaults.analysis),
            },
        })
    }
}

/// Font path chosen by flag, then `MEMEGEN_FONT`; `None` means system discovery.
pub fn font_path(flag: Option<&Path>, lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    flag.map(Path::to_path_buf).or_else(|| {
        lookup("MEMEGEN_FONT")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    })
}

/// Load the caption font from the flag, `MEMEGEN_FONT` or a known system font.
pub fn resolve_font(flag: Option<&Path>) -> MemeResult<FontSource> {
    let path = font_path(flag, |key| std::env::var(key).ok());
    FontSource::resolve(path.as_deref())
}

/// Placeholder font path from `MEMEGEN_PLACEHOLDER_FONT`, else an installed regular face.
pub fn placeholder_font_path(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    lookup("MEMEGEN_PLACEHOLDER_FONT")
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .or_else(discover_regular_font)
}

/// Regular face for the placeholder message; `None` falls back to the caption face.
pub fn resolve_placeholder_font() -> Option<FontSource> {
    let path = placeholder_font_path(|key| std::env::var(key).ok())?;
    match FontSource::from_path(&path) {
        Ok(font) => Some(font),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "placeholder font unusable");
            None
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
