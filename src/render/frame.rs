use std::{
    io::Cursor,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::foundation::error::{MemeError, MemeResult};

/// A composed frame as RGBA8 pixels.
///
/// Frames produced by the compositor are premultiplied; the flag keeps that explicit
/// at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)` as stored.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha copy of the pixel data.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            for px in out.chunks_exact_mut(4) {
                let a = u16::from(px[3]);
                if a == 0 || a == 255 {
                    continue;
                }
                for c in &mut px[..3] {
                    *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
                }
            }
        }
        out
    }

    /// Encode as PNG.
    pub fn encode_png(&self) -> MemeResult<Vec<u8>> {
        let rgba = image::RgbaImage::from_raw(self.width, self.height, self.to_straight_rgba8())
            .ok_or_else(|| MemeError::render("frame byte length does not match its size"))?;
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(rgba)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode png")?;
        Ok(buf)
    }

    /// Encode as PNG and write to `path`, creating parent directories.
    pub fn write_png(&self, path: &Path) -> MemeResult<()> {
        let png = self.encode_png()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        std::fs::write(path, png).with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// Download name for an export taken at `now`: `memegen-<unix millis>.png`.
pub fn export_file_name(now: chrono::DateTime<chrono::Utc>) -> String {
    format!("memegen-{}.png", now.timestamp_millis())
}

/// Write `frame` into `dir` under a timestamped name and return the full path.
pub fn export_png(frame: &FrameRGBA, dir: &Path) -> MemeResult<PathBuf> {
    let path = dir.join(export_file_name(chrono::Utc::now()));
    frame.write_png(&path)?;
    tracing::debug!(path = %path.display(), "exported frame");
    Ok(path)
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
