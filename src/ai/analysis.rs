use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    ai::{
        model::{AiClient, GenerativeModel},
        wire::GenerateContentRequest,
    },
    assets::source::EncodedImage,
    foundation::error::MemeResult,
};

/// Instruction sent with the image when asking for an analysis.
pub const ANALYSIS_PROMPT: &str = "Analyze this image in detail. Provide a catchy title, a detailed description of the scene and context, and a list of 5 relevant tags.";

/// Structured description of an image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Catchy title.
    pub title: String,
    /// Scene and context description.
    pub description: String,
    /// Relevant tags.
    pub tags: Vec<String>,
}

impl AnalysisResult {
    /// Result shown when the reply could not be parsed.
    pub fn parse_failure() -> Self {
        Self {
            title: "Error".to_string(),
            description: "Could not parse analysis.".to_string(),
            tags: Vec::new(),
        }
    }
}

/// Response schema: `{title, description, tags[]}`, all required.
pub fn analysis_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "description": { "type": "STRING" },
            "tags": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": ["title", "description", "tags"]
    })
}

/// Parse an analysis reply, falling back to [`AnalysisResult::parse_failure`].
pub fn parse_analysis(reply: &str) -> AnalysisResult {
    serde_json::from_str(reply).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "unparseable analysis reply");
        AnalysisResult::parse_failure()
    })
}

impl<M: GenerativeModel> AiClient<M> {
    /// Ask the analysis model for a title, description and tags for `image`.
    ///
    /// A reply without text counts as `{}`, which fails to parse like any other
    /// malformed reply and yields the fallback result.
    #[tracing::instrument(skip_all)]
    pub async fn analyze_image(&self, image: &EncodedImage) -> MemeResult<AnalysisResult> {
        let request = GenerateContentRequest::image_prompt(image, ANALYSIS_PROMPT)
            .with_json_schema(analysis_schema());
        let response = self
            .model
            .generate_content(&self.models.analysis, &request)
            .await?;

        let reply = response.text().unwrap_or_else(|| "{}".to_string());
        Ok(parse_analysis(&reply))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ai/analysis.rs"]
mod tests;
