use std::path::Path;

use anyhow::Context;
use rayon::prelude::*;

use crate::{
    foundation::{
        core::{Canvas, Rect},
        error::ScrubResult,
    },
    sequence::frame::PreparedFrame,
};

/// Premultiplied RGBA8 pixel buffer that frames are composited into.
#[derive(Clone, Debug)]
pub struct Surface {
    canvas: Canvas,
    data: Vec<u8>,
}

impl Surface {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            data: vec![0u8; canvas.byte_len()],
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn width(&self) -> u32 {
        self.canvas.width
    }

    pub fn height(&self) -> u32 {
        self.canvas.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.canvas.width || y >= self.canvas.height {
            return None;
        }
        let i = ((y as usize) * (self.canvas.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    /// Straight-alpha copy, as image files expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }

    pub fn save_png(&self, path: &Path) -> ScrubResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            path,
            &self.to_straight_rgba8(),
            self.canvas.width,
            self.canvas.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// Resample `frame` into `dst` so that it fills `rect` (surface pixel coordinates).
///
/// Bilinear filtering with edge clamping; pixels outside `rect` are left untouched.
pub fn draw_frame_into(dst: &mut [u8], canvas: Canvas, frame: &PreparedFrame, rect: Rect) {
    if frame.width == 0
        || frame.height == 0
        || !frame.is_well_formed()
        || rect.width() <= 0.0
        || rect.height() <= 0.0
    {
        return;
    }
    let sx = f64::from(frame.width) / rect.width();
    let sy = f64::from(frame.height) / rect.height();
    let row_len = canvas.width as usize * 4;

    dst.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            let py = y as f64 + 0.5;
            if py < rect.y0 || py >= rect.y1 {
                return;
            }
            let v = (py - rect.y0) * sy - 0.5;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let pxc = x as f64 + 0.5;
                if pxc < rect.x0 || pxc >= rect.x1 {
                    continue;
                }
                let u = (pxc - rect.x0) * sx - 0.5;
                px.copy_from_slice(&sample_bilinear(frame, u, v));
            }
        });
}

fn sample_bilinear(frame: &PreparedFrame, u: f64, v: f64) -> [u8; 4] {
    let max_x = f64::from(frame.width - 1);
    let max_y = f64::from(frame.height - 1);
    let u = u.clamp(0.0, max_x);
    let v = v.clamp(0.0, max_y);
    let x0 = u.floor() as u32;
    let y0 = v.floor() as u32;
    let x1 = (x0 + 1).min(frame.width - 1);
    let y1 = (y0 + 1).min(frame.height - 1);
    let fx = u - f64::from(x0);
    let fy = v - f64::from(y0);

    let p00 = frame.pixel(x0, y0);
    let p10 = frame.pixel(x1, y0);
    let p01 = frame.pixel(x0, y1);
    let p11 = frame.pixel(x1, y1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = f64::from(p00[c]) * (1.0 - fx) + f64::from(p10[c]) * fx;
        let bottom = f64::from(p01[c]) * (1.0 - fx) + f64::from(p11[c]) * fx;
        out[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
