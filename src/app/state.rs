use std::fmt;

use crate::{
    ai::{analysis::AnalysisResult, caption::CaptionSuggestion},
    assets::source::ImageSource,
    compose::overlay::TextOverlay,
};

/// Active control panel; decides which AI operation is reachable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Caption suggestions and manual text.
    #[default]
    Caption,
    /// Instruction-driven image edits.
    Edit,
    /// Image analysis.
    Analyze,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Caption => "caption",
            Mode::Edit => "edit",
            Mode::Analyze => "analyze",
        })
    }
}

/// Severity of a user-visible notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    /// Informational outcome (successful or declined edit).
    Info,
    /// An operation failed.
    Failure,
}

/// Message the front end shows to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub kind: NoticeKind,
    /// Text to show.
    pub message: String,
}

impl Notice {
    /// Informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    /// Failure notice.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Failure,
            message: message.into(),
        }
    }
}

/// Everything the editor shows, owned by one controller.
#[derive(Debug, Default)]
pub struct EditorState {
    pub(crate) image: Option<ImageSource>,
    pub(crate) overlays: Vec<TextOverlay>,
    pub(crate) mode: Mode,
    pub(crate) busy: bool,
    pub(crate) captions: Vec<CaptionSuggestion>,
    pub(crate) analysis: Option<AnalysisResult>,
    pub(crate) edit_prompt: String,
}

impl EditorState {
    /// Current image source.
    pub fn image(&self) -> Option<&ImageSource> {
        self.image.as_ref()
    }

    /// Overlays in paint order.
    pub fn overlays(&self) -> &[TextOverlay] {
        &self.overlays
    }

    /// Active mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether an AI operation is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Latest caption suggestions.
    pub fn captions(&self) -> &[CaptionSuggestion] {
        &self.captions
    }

    /// Latest analysis.
    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    /// Pending edit instruction.
    pub fn edit_prompt(&self) -> &str {
        &self.edit_prompt
    }

    /// Replace the image; overlays, captions and analysis describe the old one and go too.
    pub(crate) fn install_image(&mut self, source: ImageSource) {
        self.image = Some(source);
        self.overlays.clear();
        self.captions.clear();
        self.analysis = None;
    }
}

/// Sets the busy flag for its lifetime.
pub(crate) struct BusyGuard<'a> {
    flag: &'a mut bool,
}

impl<'a> BusyGuard<'a> {
    pub(crate) fn enter(flag: &'a mut bool) -> Self {
        *flag = true;
        Self { flag }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        *self.flag = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/state.rs"]
mod tests;
