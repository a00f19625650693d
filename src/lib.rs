//! Memegen composes memes: a background image fitted into a fixed frame with outlined,
//! word-wrapped caption text painted on top, plus three Gemini-backed helpers that
//! suggest captions, edit the image from an instruction, and describe it.
//!
//! # Pieces
//!
//! 1. **Ingest**: file, URL or `data:` URL -> [`ImageSource`] (decoded bitmap + JPEG payload)
//! 2. **Compose**: [`Compositor::render`] turns an image and ordered [`TextOverlay`]s into a
//!    premultiplied [`FrameRGBA`]
//! 3. **Assist**: [`AiClient`] wraps the `generateContent` calls; malformed model replies
//!    degrade to empty captions or [`AnalysisResult::parse_failure`]
//! 4. **Drive**: [`MemeController`] owns the editor state and enforces the reset and busy rules
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic rendering**: identical inputs give byte-identical frames.
//! - **Premultiplied RGBA8** end-to-end until PNG export.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod ai;
mod app;
mod assets;
mod compose;
/// Environment-driven settings.
pub mod config;
mod foundation;
mod render;

pub use ai::analysis::{ANALYSIS_PROMPT, AnalysisResult, analysis_schema, parse_analysis};
pub use ai::caption::{CAPTION_PROMPT, CaptionSuggestion, caption_schema, parse_captions};
pub use ai::model::{AiClient, GeminiClient, GenerativeModel};
pub use ai::wire::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    InlineData, Part,
};
pub use app::controller::{
    ANALYSIS_FAILED, CAPTIONS_FAILED, EDIT_APPLIED, EDIT_DECLINED, EDIT_FAILED, MANUAL_TEXT,
    MemeController,
};
pub use app::state::{EditorState, Mode, Notice, NoticeKind};
pub use assets::decode::{DecodedImage, MAX_IMAGE_DIMENSION, decode_image};
pub use assets::font::{FontSource, TextLayoutEngine};
pub use assets::source::{AI_PAYLOAD_MIME, EncodedImage, ImageSource, TEMPLATE_URLS};
pub use compose::layout::{
    ImagePlacement, LaidLine, WRAP_WIDTH_RATIO, fit_image, layout_overlay,
};
pub use compose::overlay::{
    OverlayId, OverlayStyle, TextOverlay, parse_overlays, validate_overlays,
};
pub use compose::wrap::{TextMeasure, wrap_words};
pub use config::{AiConfig, ModelIds};
pub use foundation::core::{Affine, FrameSize, Rect, Rgba8};
pub use foundation::error::{MemeError, MemeResult};
pub use render::cpu::{
    Compositor, PLACEHOLDER_BACKGROUND, PLACEHOLDER_MESSAGE, PLACEHOLDER_TEXT_COLOR,
    RenderSettings,
};
pub use render::frame::{FrameRGBA, export_file_name, export_png};
