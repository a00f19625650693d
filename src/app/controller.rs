use std::path::{Path, PathBuf};

use crate::{
    ai::{
        analysis::AnalysisResult,
        caption::CaptionSuggestion,
        model::{AiClient, GenerativeModel},
    },
    app::state::{BusyGuard, EditorState, Mode, Notice},
    assets::source::{ImageSource, TEMPLATE_URLS},
    compose::overlay::{OverlayId, OverlayStyle, TextOverlay},
    foundation::{
        core::FrameSize,
        error::{MemeError, MemeResult},
    },
    render::{
        cpu::Compositor,
        frame::{self, FrameRGBA},
    },
};

/// Text of a freshly added manual overlay.
pub const MANUAL_TEXT: &str = "NEW TEXT";
/// Distance of the top slot's baseline from the frame's top edge.
pub const TOP_OFFSET: f64 = 100.0;
/// Distance of the bottom slot's baseline from the frame's bottom edge.
pub const BOTTOM_OFFSET: f64 = 100.0;

/// Shown when caption suggestion fails.
pub const CAPTIONS_FAILED: &str = "Failed to generate captions. Please try again.";
/// Shown when an edit request fails.
pub const EDIT_FAILED: &str = "Error editing image.";
/// Shown when analysis fails.
pub const ANALYSIS_FAILED: &str = "Analysis failed.";
/// Shown after an edit replaced the image.
pub const EDIT_APPLIED: &str = "Image updated with AI edit!";
/// Shown when the model answered an edit without an image.
pub const EDIT_DECLINED: &str = "AI could not perform the edit. Try a different prompt.";

/// Owns the editor state and wires user actions to the AI client and compositor.
///
/// Every transition takes `&mut self`, so at most one AI call is in flight. The busy
/// flag is still tracked for front ends and cleared on success and failure alike.
pub struct MemeController<M> {
    ai: AiClient<M>,
    http: reqwest::Client,
    frame: FrameSize,
    style: OverlayStyle,
    state: EditorState,
    notices: Vec<Notice>,
    next_overlay_id: u64,
}

impl<M: GenerativeModel> MemeController<M> {
    /// Controller drawing into `frame`, fetching remote images with `http`.
    pub fn new(ai: AiClient<M>, http: reqwest::Client, frame: FrameSize) -> MemeResult<Self> {
        frame.validate()?;
        Ok(Self {
            ai,
            http,
            frame,
            style: OverlayStyle::default(),
            state: EditorState::default(),
            notices: Vec::new(),
            next_overlay_id: 1,
        })
    }

    /// Read-only view of the editor state.
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Output frame size.
    pub fn frame(&self) -> FrameSize {
        self.frame
    }

    /// Drain queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Switch the active panel.
    pub fn set_mode(&mut self, mode: Mode) {
        self.state.mode = mode;
    }

    /// Update the pending edit instruction.
    pub fn set_edit_prompt(&mut self, prompt: impl Into<String>) {
        self.state.edit_prompt = prompt.into();
    }

    // Image sources.

    /// Install an already decoded image.
    pub fn select_image(&mut self, source: ImageSource) {
        tracing::debug!(
            width = source.image().width,
            height = source.image().height,
            "image selected"
        );
        self.state.install_image(source);
    }

    /// Load a local image file.
    pub async fn load_file(&mut self, path: &Path) -> MemeResult<()> {
        let source = ImageSource::load_path(path).await?;
        self.select_image(source);
        Ok(())
    }

    /// Load from a path, `http(s)` URL or `data:` URL.
    pub async fn load_location(&mut self, location: &str) -> MemeResult<()> {
        let source = ImageSource::open(&self.http, location).await?;
        self.select_image(source);
        Ok(())
    }

    /// Load the `index`-th built-in template.
    pub async fn select_template(&mut self, index: usize) -> MemeResult<()> {
        let url = TEMPLATE_URLS.get(index).ok_or_else(|| {
            MemeError::validation(format!(
                "template index {index} out of range (0..{})",
                TEMPLATE_URLS.len()
            ))
        })?;
        let source = ImageSource::fetch_url(&self.http, url).await?;
        self.select_image(source);
        Ok(())
    }

    // Action availability.

    fn ai_ready(&self, mode: Mode) -> bool {
        self.state.image.is_some() && !self.state.busy && self.state.mode == mode
    }

    /// Caption suggestion is reachable.
    pub fn can_generate_captions(&self) -> bool {
        self.ai_ready(Mode::Caption)
    }

    /// Editing is reachable and the instruction is not blank.
    pub fn can_edit_image(&self) -> bool {
        self.ai_ready(Mode::Edit) && !self.state.edit_prompt.trim().is_empty()
    }

    /// Analysis is reachable.
    pub fn can_analyze(&self) -> bool {
        self.ai_ready(Mode::Analyze)
    }

    /// There is an image to export.
    pub fn can_export(&self) -> bool {
        self.state.image.is_some()
    }

    // AI operations.

    fn fail(&mut self, message: &str, err: MemeError) -> MemeError {
        tracing::warn!(error = %err, "{message}");
        self.notices.push(Notice::failure(message));
        err
    }

    /// Replace the caption suggestions with fresh ones for the current image.
    #[tracing::instrument(skip(self))]
    pub async fn generate_captions(&mut self) -> MemeResult<&[CaptionSuggestion]> {
        if !self.can_generate_captions() {
            return Err(MemeError::unavailable("caption suggestions"));
        }
        self.state.captions.clear();

        let result = {
            let _busy = BusyGuard::enter(&mut self.state.busy);
            match self.state.image.as_ref() {
                Some(source) => self.ai.suggest_captions(source.payload()).await,
                None => Err(MemeError::unavailable("no image")),
            }
        };

        match result {
            Ok(captions) => {
                self.state.captions = captions;
                Ok(&self.state.captions)
            }
            Err(e) => Err(self.fail(CAPTIONS_FAILED, e)),
        }
    }

    /// Apply the pending instruction to the current image.
    ///
    /// Returns `true` when the image was replaced. A declined edit leaves everything as
    /// it was and queues an informational notice.
    #[tracing::instrument(skip(self))]
    pub async fn edit_image(&mut self) -> MemeResult<bool> {
        if !self.can_edit_image() {
            return Err(MemeError::unavailable("image edit"));
        }

        let result = {
            let _busy = BusyGuard::enter(&mut self.state.busy);
            match self.state.image.as_ref() {
                Some(source) => {
                    match self
                        .ai
                        .edit_image(source.payload(), &self.state.edit_prompt)
                        .await
                    {
                        Ok(Some(encoded)) => ImageSource::from_encoded(&encoded).await.map(Some),
                        Ok(None) => Ok(None),
                        Err(e) => Err(e),
                    }
                }
                None => Err(MemeError::unavailable("no image")),
            }
        };

        match result {
            Ok(Some(source)) => {
                self.state.install_image(source);
                self.state.edit_prompt.clear();
                self.notices.push(Notice::info(EDIT_APPLIED));
                Ok(true)
            }
            Ok(None) => {
                self.notices.push(Notice::info(EDIT_DECLINED));
                Ok(false)
            }
            Err(e) => Err(self.fail(EDIT_FAILED, e)),
        }
    }

    /// Replace the analysis with a fresh one for the current image.
    #[tracing::instrument(skip(self))]
    pub async fn analyze_image(&mut self) -> MemeResult<&AnalysisResult> {
        if !self.can_analyze() {
            return Err(MemeError::unavailable("image analysis"));
        }
        self.state.analysis = None;

        let result = {
            let _busy = BusyGuard::enter(&mut self.state.busy);
            match self.state.image.as_ref() {
                Some(source) => self.ai.analyze_image(source.payload()).await,
                None => Err(MemeError::unavailable("no image")),
            }
        };

        match result {
            Ok(analysis) => Ok(self.state.analysis.insert(analysis)),
            Err(e) => Err(self.fail(ANALYSIS_FAILED, e)),
        }
    }

    // Overlays.

    fn next_id(&mut self) -> OverlayId {
        let id = OverlayId(self.next_overlay_id);
        self.next_overlay_id += 1;
        id
    }

    fn top_y(&self) -> f64 {
        TOP_OFFSET
    }

    fn bottom_y(&self) -> f64 {
        f64::from(self.frame.height) - BOTTOM_OFFSET
    }

    /// Replace every overlay with one upper-cased caption at the bottom slot.
    pub fn apply_caption(&mut self, text: &str) -> OverlayId {
        let id = self.next_id();
        let overlay = TextOverlay::new(
            id,
            text.to_uppercase(),
            self.frame.center_x(),
            self.bottom_y(),
            self.style,
        );
        self.state.overlays = vec![overlay];
        id
    }

    /// Apply the `index`-th suggestion.
    pub fn apply_suggestion(&mut self, index: usize) -> MemeResult<OverlayId> {
        let text = self
            .state
            .captions
            .get(index)
            .map(|c| c.text.clone())
            .ok_or_else(|| {
                MemeError::validation(format!(
                    "suggestion {index} out of range (have {})",
                    self.state.captions.len()
                ))
            })?;
        Ok(self.apply_caption(&text))
    }

    /// Append a placeholder overlay: bottom slot when it is the first, top slot after.
    pub fn add_manual_text(&mut self) -> OverlayId {
        let y = if self.state.overlays.is_empty() {
            self.bottom_y()
        } else {
            self.top_y()
        };
        let id = self.next_id();
        self.state.overlays.push(TextOverlay::new(
            id,
            MANUAL_TEXT,
            self.frame.center_x(),
            y,
            self.style,
        ));
        id
    }

    /// Change an overlay's text.
    pub fn update_text(&mut self, id: OverlayId, text: impl Into<String>) -> MemeResult<()> {
        let overlay = self
            .state
            .overlays
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| MemeError::validation(format!("unknown overlay id {id}")))?;
        overlay.text = text.into();
        Ok(())
    }

    /// Remove an overlay; returns whether it existed.
    pub fn remove_text(&mut self, id: OverlayId) -> bool {
        let before = self.state.overlays.len();
        self.state.overlays.retain(|o| o.id != id);
        self.state.overlays.len() != before
    }

    // Output.

    /// Compose the current image and overlays.
    pub fn render(&self, compositor: &mut Compositor) -> MemeResult<FrameRGBA> {
        compositor.render(
            self.frame,
            self.state.image.as_ref().map(ImageSource::image),
            &self.state.overlays,
        )
    }

    /// Render and write `memegen-<millis>.png` into `dir`.
    pub fn export_png(&self, compositor: &mut Compositor, dir: &Path) -> MemeResult<PathBuf> {
        if !self.can_export() {
            return Err(MemeError::unavailable("export needs an image"));
        }
        let frame = self.render(compositor)?;
        frame::export_png(&frame, dir)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/controller.rs"]
mod tests;
