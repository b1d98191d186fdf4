use crate::foundation::{
    core::{Rect, Size},
    math::{clamp01, lerp},
};

/// Start and end value of one graded parameter over progress 0..1.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParamRange {
    pub start: f64,
    pub end: f64,
}

impl ParamRange {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn at(self, t: f64) -> f64 {
        lerp(self.start, self.end, clamp01(t))
    }
}

/// The progress-driven grade: zoom in, sharpen, brighten.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GradeRanges {
    pub scale: ParamRange,
    pub blur_px: ParamRange,
    pub brightness: ParamRange,
}

impl Default for GradeRanges {
    fn default() -> Self {
        Self {
            scale: ParamRange::new(1.0, 1.35),
            blur_px: ParamRange::new(8.0, 0.0),
            brightness: ParamRange::new(0.6, 1.0),
        }
    }
}

/// Visual parameters for one rendered frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderParameters {
    pub scale: f64,
    pub blur_px: f64,
    pub brightness: f64,
}

impl RenderParameters {
    /// Parameters at progress `t`.
    ///
    /// With `effects_enabled == false` (frames that already carry their own zoom and motion)
    /// scale stays at 1 and blur at 0; brightness is graded either way.
    pub fn at(t: f64, grade: &GradeRanges, effects_enabled: bool) -> Self {
        let brightness = grade.brightness.at(t);
        if !effects_enabled {
            return Self {
                scale: 1.0,
                blur_px: 0.0,
                brightness,
            };
        }
        Self {
            scale: grade.scale.at(t),
            blur_px: grade.blur_px.at(t).max(0.0),
            brightness,
        }
    }
}

/// Rectangle that covers `surface` with `image` at its native aspect ratio, centered.
///
/// A surface relatively wider than the image fits the width and crops top and bottom; otherwise
/// the height fits and the sides are cropped. Returns `None` for empty sizes.
pub fn cover_fit(image: Size, surface: Size) -> Option<Rect> {
    if !(image.width > 0.0 && image.height > 0.0 && surface.width > 0.0 && surface.height > 0.0)
    {
        return None;
    }
    let image_ratio = image.width / image.height;
    let surface_ratio = surface.width / surface.height;
    let size = if surface_ratio > image_ratio {
        Size::new(surface.width, surface.width / image_ratio)
    } else {
        Size::new(surface.height * image_ratio, surface.height)
    };
    Some(centered(size, surface))
}

/// [`cover_fit`] scaled by `scale` about the surface center.
pub fn draw_rect(image: Size, surface: Size, scale: f64) -> Option<Rect> {
    let cover = cover_fit(image, surface)?;
    let scaled = Size::new(cover.width() * scale, cover.height() * scale);
    Some(centered(scaled, surface))
}

fn centered(size: Size, surface: Size) -> Rect {
    let x = (surface.width - size.width) / 2.0;
    let y = (surface.height - size.height) / 2.0;
    Rect::new(x, y, x + size.width, y + size.height)
}

#[cfg(test)]
#[path = "../../tests/unit/render/params.rs"]
mod tests;
