use rayon::prelude::*;

use crate::foundation::{
    error::{ScrubError, ScrubResult},
    math::{mul_div255_u8, unit_to_u8},
};

pub type PremulRgba8 = [u8; 4];

pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> ScrubResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ScrubError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    dst.par_chunks_exact_mut(4)
        .zip(src.par_chunks_exact(4))
        .for_each(|(d, s)| {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
            d.copy_from_slice(&out);
        });
    Ok(())
}

/// Multiply color channels by `factor`, as a CSS `brightness()` filter does.
///
/// Works directly on premultiplied pixels; channels are capped at alpha so the result stays a
/// valid premultiplied color when `factor > 1`.
pub fn brightness_in_place(buf: &mut [u8], factor: f64) {
    if !factor.is_finite() || (factor - 1.0).abs() < f64::EPSILON {
        return;
    }
    let factor = factor.max(0.0);
    buf.par_chunks_exact_mut(4).for_each(|px| {
        let a = f64::from(px[3]);
        for c in &mut px[..3] {
            *c = (f64::from(*c) * factor).round().min(a) as u8;
        }
    });
}

/// Radial darkening toward the surface edges.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VignetteSpec {
    pub enabled: bool,
    /// Inner radius as a fraction of `min(width, height)`; fully transparent inside.
    pub inner: f64,
    /// Outer radius as a fraction of `max(width, height)`; `opacity` from there on.
    pub outer: f64,
    pub opacity: f64,
}

impl Default for VignetteSpec {
    fn default() -> Self {
        Self {
            enabled: true,
            inner: 0.4,
            outer: 0.8,
            opacity: 0.6,
        }
    }
}

impl VignetteSpec {
    pub fn radii(&self, width: u32, height: u32) -> (f64, f64) {
        let (w, h) = (f64::from(width), f64::from(height));
        (self.inner * w.min(h), self.outer * w.max(h))
    }

    /// Black overlay opacity at `distance` from the center.
    pub fn alpha_at(&self, distance: f64, r0: f64, r1: f64) -> f64 {
        if distance <= r0 {
            return 0.0;
        }
        if distance >= r1 || r1 <= r0 {
            return self.opacity;
        }
        self.opacity * (distance - r0) / (r1 - r0)
    }
}

/// Composite the vignette over `buf`, sampling at pixel centers.
pub fn vignette_in_place(buf: &mut [u8], width: u32, height: u32, spec: &VignetteSpec) {
    if !spec.enabled || spec.opacity <= 0.0 || width == 0 {
        return;
    }
    let (r0, r1) = spec.radii(width, height);
    let cx = f64::from(width) / 2.0;
    let cy = f64::from(height) / 2.0;
    let row_len = width as usize * 4;
    buf.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            let dy = y as f64 + 0.5 - cy;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let dx = x as f64 + 0.5 - cx;
                let a = unit_to_u8(spec.alpha_at(dx.hypot(dy), r0, r1));
                if a == 0 {
                    continue;
                }
                let out = over([px[0], px[1], px[2], px[3]], [0, 0, 0, a], 1.0);
                px.copy_from_slice(&out);
            }
        });
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
