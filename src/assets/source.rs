use std::path::Path;

use anyhow::Context;
use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::{
    assets::decode::{self, DecodedImage},
    foundation::error::{MemeError, MemeResult},
};

/// MIME type attached to every image payload sent to the model service.
pub const AI_PAYLOAD_MIME: &str = "image/jpeg";

/// Built-in template images offered by the gallery.
pub const TEMPLATE_URLS: [&str; 4] = [
    "https://picsum.photos/id/237/800/800",
    "https://picsum.photos/id/1025/800/800",
    "https://picsum.photos/id/1062/800/800",
    "https://picsum.photos/id/1074/800/800",
];

/// Base64 image payload plus its MIME type, as carried over the wire.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EncodedImage {
    /// MIME type, e.g. `image/jpeg`.
    pub mime_type: String,
    /// Standard base64 of the encoded bytes.
    pub data: String,
}

impl EncodedImage {
    /// Base64-encode raw bytes.
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Decode the base64 payload back into bytes.
    pub fn bytes(&self) -> MemeResult<Vec<u8>> {
        STANDARD
            .decode(self.data.trim())
            .map_err(|e| MemeError::decode(format!("invalid base64 image payload: {e}")))
    }

    /// Parse a `data:<mime>;base64,<payload>` URL.
    pub fn parse_data_url(url: &str) -> MemeResult<Self> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| MemeError::validation("data url must start with \"data:\""))?;
        let (header, data) = rest
            .split_once(',')
            .ok_or_else(|| MemeError::validation("data url is missing its ',' separator"))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| MemeError::validation("only base64 data urls are supported"))?;
        if mime_type.is_empty() {
            return Err(MemeError::validation("data url has no MIME type"));
        }

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }

    /// Render as a `data:` URL.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// The current background image: decoded bitmap for drawing plus the JPEG payload
/// sent to the model service.
///
/// Sources are immutable; a new upload, template pick or AI edit builds a new one.
#[derive(Clone, Debug)]
pub struct ImageSource {
    image: DecodedImage,
    payload: EncodedImage,
}

impl ImageSource {
    /// Decode encoded bytes on the current thread.
    ///
    /// JPEG input is forwarded as-is; any other format is re-encoded so the payload
    /// always matches [`AI_PAYLOAD_MIME`]. Images beyond
    /// [`decode::MAX_IMAGE_DIMENSION`] on either side are downscaled first.
    pub fn from_bytes(bytes: Vec<u8>) -> MemeResult<Self> {
        let decoded = decode::decode_dynamic(&bytes)?;
        let original = (decoded.width(), decoded.height());
        let dyn_img = decode::fit_dimension_limit(decoded);
        let resized = (dyn_img.width(), dyn_img.height()) != original;
        let image = DecodedImage::from_dynamic(&dyn_img);

        let jpeg = if !resized && decode::sniff_mime(&bytes) == Some(AI_PAYLOAD_MIME) {
            bytes
        } else {
            decode::encode_jpeg(&dyn_img)?
        };

        Ok(Self {
            image,
            payload: EncodedImage::from_bytes(AI_PAYLOAD_MIME, &jpeg),
        })
    }

    /// Decode on the blocking pool; resolves once the bitmap is ready to draw.
    pub async fn decode(bytes: Vec<u8>) -> MemeResult<Self> {
        tokio::task::spawn_blocking(move || Self::from_bytes(bytes))
            .await
            .context("join image decode task")?
    }

    /// Read and decode a local file.
    #[tracing::instrument]
    pub async fn load_path(path: &Path) -> MemeResult<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("read image '{}'", path.display()))?;
        tracing::debug!(bytes = bytes.len(), "read image file");
        Self::decode(bytes).await
    }

    /// Download and decode a remote image.
    #[tracing::instrument(skip(http))]
    pub async fn fetch_url(http: &reqwest::Client, url: &str) -> MemeResult<Self> {
        let response = http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("fetch image '{url}'"))?;
        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("read image body '{url}'"))?;
        tracing::debug!(bytes = bytes.len(), "fetched image");
        Self::decode(bytes.to_vec()).await
    }

    /// Decode a base64 payload, e.g. the image returned by an AI edit.
    pub async fn from_encoded(encoded: &EncodedImage) -> MemeResult<Self> {
        Self::decode(encoded.bytes()?).await
    }

    /// Accept a local path, an `http(s)` URL or a `data:` URL.
    pub async fn open(http: &reqwest::Client, location: &str) -> MemeResult<Self> {
        if location.starts_with("data:") {
            Self::from_encoded(&EncodedImage::parse_data_url(location)?).await
        } else if location.starts_with("http://") || location.starts_with("https://") {
            Self::fetch_url(http, location).await
        } else {
            Self::load_path(Path::new(location)).await
        }
    }

    /// Decoded bitmap.
    pub fn image(&self) -> &DecodedImage {
        &self.image
    }

    /// JPEG payload for the model service.
    pub fn payload(&self) -> &EncodedImage {
        &self.payload
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
