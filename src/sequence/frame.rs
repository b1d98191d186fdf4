use std::sync::Arc;

use anyhow::Context;

use crate::foundation::{
    core::Size,
    error::{ScrubError, ScrubResult},
};

/// Decoded frame in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedFrame {
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Build from straight (non-premultiplied) RGBA8 bytes; `rgba` must hold `width * height` pixels.
    pub fn from_straight_rgba8(width: u32, height: u32, mut rgba: Vec<u8>) -> ScrubResult<Self> {
        if Some(rgba.len()) != expected_len(width, height) {
            return Err(ScrubError::validation(format!(
                "frame buffer of {} bytes does not match {width}x{height} RGBA8",
                rgba.len()
            )));
        }
        premultiply_rgba8_in_place(&mut rgba);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba),
        })
    }

    /// True when the pixel buffer holds exactly `width * height` RGBA8 pixels.
    pub fn is_well_formed(&self) -> bool {
        Some(self.rgba8_premul.len()) == expected_len(self.width, self.height)
    }

    /// Callers keep `x < width` and `y < height` on a well-formed frame.
    pub(crate) fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = &self.rgba8_premul[idx..idx + 4];
        [px[0], px[1], px[2], px[3]]
    }
}

/// Decode an encoded image (any format the `image` crate was built with).
pub fn decode_frame(bytes: &[u8]) -> ScrubResult<PreparedFrame> {
    let dyn_img = image::load_from_memory(bytes).context("decode frame from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PreparedFrame::from_straight_rgba8(width, height, rgba.into_raw())
}

fn expected_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
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
#[path = "../../tests/unit/sequence/frame.rs"]
mod tests;
