use std::{io::Cursor, sync::Arc};

use anyhow::Context;

use crate::foundation::error::{MemeError, MemeResult};

/// Largest width or height kept after decoding; both the pixmap and JPEG limit.
pub const MAX_IMAGE_DIMENSION: u32 = u16::MAX as u32;

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl DecodedImage {
    /// Convert an already decoded `image` buffer.
    pub fn from_dynamic(dyn_img: &image::DynamicImage) -> Self {
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut rgba8_premul = rgba.into_raw();
        premultiply_rgba8_in_place(&mut rgba8_premul);

        Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        }
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
///
/// Images wider or taller than [`MAX_IMAGE_DIMENSION`] are downscaled to fit.
pub fn decode_image(bytes: &[u8]) -> MemeResult<DecodedImage> {
    let dyn_img = fit_dimension_limit(decode_dynamic(bytes)?);
    Ok(DecodedImage::from_dynamic(&dyn_img))
}

/// Shrink so neither side exceeds [`MAX_IMAGE_DIMENSION`], keeping the aspect ratio.
pub(crate) fn fit_dimension_limit(dyn_img: image::DynamicImage) -> image::DynamicImage {
    let (width, height) = (dyn_img.width(), dyn_img.height());
    if width <= MAX_IMAGE_DIMENSION && height <= MAX_IMAGE_DIMENSION {
        return dyn_img;
    }
    let scaled = dyn_img.resize(
        MAX_IMAGE_DIMENSION,
        MAX_IMAGE_DIMENSION,
        image::imageops::FilterType::Triangle,
    );
    tracing::debug!(
        width,
        height,
        scaled_width = scaled.width(),
        scaled_height = scaled.height(),
        "downscaled oversized image"
    );
    scaled
}

pub(crate) fn decode_dynamic(bytes: &[u8]) -> MemeResult<image::DynamicImage> {
    if bytes.is_empty() {
        return Err(MemeError::decode("image payload is empty"));
    }
    image::load_from_memory(bytes).map_err(|e| MemeError::decode(format!("decode image: {e}")))
}

/// MIME type of the encoded bytes, when the container is recognised.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes)
        .ok()
        .map(|format| format.to_mime_type())
}

/// Re-encode as baseline JPEG; alpha is dropped.
pub(crate) fn encode_jpeg(dyn_img: &image::DynamicImage) -> MemeResult<Vec<u8>> {
    let rgb = image::DynamicImage::ImageRgb8(dyn_img.to_rgb8());
    let mut buf = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .context("encode jpeg payload")?;
    Ok(buf)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
