//! Header logo, rasterized once at startup into ESC/POS graphics.

use std::path::Path;
use std::sync::Arc;

use crate::error::{ReceiptError, Result};

/// Logo printed at the top of every receipt.
pub const BUNDLED_HEADER_PNG: &[u8] = include_bytes!("../assets/header.png");

/// Widest raster that fits 58mm and 80mm heads.
pub const MAX_WIDTH_DOTS: u32 = 384;

/// Tallest `GS v 0` raster Epson-compatible printers accept in one command.
pub const MAX_HEIGHT_DOTS: u32 = 2303;

/// Pre-rendered `GS v 0` raster for the receipt header. Cheap to clone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderImage {
    raster: Arc<[u8]>,
}

impl HeaderImage {
    /// No logo; the header is text only.
    pub fn none() -> Self {
        Self::default()
    }

    /// The configured image if any, else the bundled logo.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::bundled(),
        }
    }

    pub fn bundled() -> Result<Self> {
        Self::from_png_bytes(BUNDLED_HEADER_PNG)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| ReceiptError::HeaderImage(format!("read {}: {e}", path.display())))?;
        Self::from_png_bytes(&bytes)
    }

    #[cfg(feature = "image")]
    pub fn from_png_bytes(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| ReceiptError::HeaderImage(format!("decode: {e}")))?;
        let raster = rasterize(&img)?;
        tracing::debug!(bytes = raster.len(), "header image rasterized");
        Ok(Self {
            raster: raster.into(),
        })
    }

    #[cfg(not(feature = "image"))]
    pub fn from_png_bytes(_bytes: &[u8]) -> Result<Self> {
        tracing::warn!("built without image support; printing text-only header");
        Ok(Self::none())
    }

    pub fn raster(&self) -> &[u8] {
        &self.raster
    }

    pub fn is_empty(&self) -> bool {
        self.raster.is_empty()
    }
}

/// 1-bit `GS v 0` raster, centered, dark and opaque pixels printed black.
#[cfg(feature = "image")]
fn rasterize(img: &image::DynamicImage) -> Result<Vec<u8>> {
    use image::GenericImageView;

    let (w, h) = img.dimensions();
    let (new_w, new_h) = if w > MAX_WIDTH_DOTS {
        let ratio = f64::from(MAX_WIDTH_DOTS) / f64::from(w);
        (MAX_WIDTH_DOTS, ((f64::from(h) * ratio) as u32).max(1))
    } else {
        (w, h)
    };
    if new_h > MAX_HEIGHT_DOTS {
        return Err(ReceiptError::HeaderImage(format!(
            "image is {new_h} dots tall after scaling, at most {MAX_HEIGHT_DOTS} fit"
        )));
    }
    let rgba = img
        .resize_exact(new_w, new_h, image::imageops::FilterType::Nearest)
        .to_rgba8();

    let x_bytes = new_w.div_ceil(8);
    let mut data = Vec::with_capacity(12 + (x_bytes * new_h) as usize);
    data.extend_from_slice(&[0x1B, 0x61, 0x01]);
    data.extend_from_slice(&[0x1D, 0x76, 0x30, 0x00]);
    data.extend_from_slice(&[
        (x_bytes & 0xFF) as u8,
        (x_bytes >> 8) as u8,
        (new_h & 0xFF) as u8,
        (new_h >> 8) as u8,
    ]);

    for y in 0..new_h {
        for x_byte in 0..x_bytes {
            let mut byte = 0u8;
            for bit in 0..8 {
                let x = x_byte * 8 + bit;
                if x >= new_w {
                    continue;
                }
                let p = rgba.get_pixel(x, y);
                if p[3] < 128 {
                    continue;
                }
                let luma = 0.299 * f32::from(p[0]) + 0.587 * f32::from(p[1]) + 0.114 * f32::from(p[2]);
                if luma < 128.0 {
                    byte |= 1 << (7 - bit);
                }
            }
            data.push(byte);
        }
    }
    data.push(b'\n');
    Ok(data)
}
