use crate::{
    ai::{
        model::{AiClient, GenerativeModel},
        wire::GenerateContentRequest,
    },
    assets::source::EncodedImage,
    foundation::error::{MemeError, MemeResult},
};

impl<M: GenerativeModel> AiClient<M> {
    /// Ask the edit model to apply `instruction` to `image`.
    ///
    /// Returns the first inline image of the reply exactly as received, or `None` when
    /// the model answered without one (e.g. text only).
    #[tracing::instrument(skip(self, image))]
    pub async fn edit_image(
        &self,
        image: &EncodedImage,
        instruction: &str,
    ) -> MemeResult<Option<EncodedImage>> {
        if instruction.trim().is_empty() {
            return Err(MemeError::validation("edit instruction must not be empty"));
        }

        let request = GenerateContentRequest::image_prompt(image, instruction);
        let response = self.model.generate_content(&self.models.edit, &request).await?;

        let edited = response.first_inline_data().cloned().map(EncodedImage::from);
        match &edited {
            Some(img) => tracing::debug!(mime = %img.mime_type, "edit returned an image"),
            None => tracing::debug!(text = ?response.text(), "edit returned no image"),
        }
        Ok(edited)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ai/edit.rs"]
mod tests;
