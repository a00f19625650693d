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

/// Instruction sent with the image when asking for captions.
pub const CAPTION_PROMPT: &str = "Analyze this image and generate 5 funny, viral, and creative meme captions. Ensure they vary in style (e.g., sarcastic, relatable, punny).";

/// One suggested caption.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionSuggestion {
    /// Caption text as suggested (not uppercased).
    pub text: String,
    /// Style or mood, e.g. "sarcastic".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Response schema: an array of `{text, category}` objects with `text` required.
pub fn caption_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "text": {
                    "type": "STRING",
                    "description": "The meme caption text"
                },
                "category": {
                    "type": "STRING",
                    "description": "The style or mood of the caption"
                }
            },
            "required": ["text"]
        }
    })
}

/// Parse a caption reply; anything that is not a list of captions yields an empty list.
pub fn parse_captions(reply: &str) -> Vec<CaptionSuggestion> {
    match serde_json::from_str::<Vec<CaptionSuggestion>>(reply) {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable caption reply; using no suggestions");
            Vec::new()
        }
    }
}

impl<M: GenerativeModel> AiClient<M> {
    /// Ask the caption model for meme captions fitting `image`.
    ///
    /// Transport failures are errors. A reply without text counts as `[]`, and a reply
    /// that does not parse gives an empty list.
    #[tracing::instrument(skip_all)]
    pub async fn suggest_captions(
        &self,
        image: &EncodedImage,
    ) -> MemeResult<Vec<CaptionSuggestion>> {
        let request =
            GenerateContentRequest::image_prompt(image, CAPTION_PROMPT).with_json_schema(caption_schema());
        let response = self
            .model
            .generate_content(&self.models.caption, &request)
            .await?;

        let reply = response.text().unwrap_or_else(|| "[]".to_string());
        let captions = parse_captions(&reply);
        tracing::debug!(count = captions.len(), "caption suggestions");
        Ok(captions)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ai/caption.rs"]
mod tests;
