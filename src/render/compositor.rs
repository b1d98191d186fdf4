use tracing::warn;

use crate::{
    foundation::core::{Canvas, Rect},
    render::{
        blur::blur_css_px,
        composite::{VignetteSpec, brightness_in_place, over_in_place, vignette_in_place},
        params::{GradeRanges, RenderParameters, draw_rect},
        surface::{Surface, draw_frame_into},
    },
    sequence::frame::PreparedFrame,
};

/// Look of the composited frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompositorOpts {
    pub grade: GradeRanges,
    /// Set to `false` when the frames already encode their own zoom and motion.
    pub effects_enabled: bool,
    pub vignette: VignetteSpec,
}

impl Default for CompositorOpts {
    fn default() -> Self {
        Self {
            grade: GradeRanges::default(),
            effects_enabled: true,
            vignette: VignetteSpec::default(),
        }
    }
}

/// Result of one [`FrameCompositor::draw`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawOutcome {
    /// Nothing to draw; the surface was only cleared.
    Cleared,
    Drawn {
        params: RenderParameters,
        rect: Rect,
    },
}

/// Renders one cover-cropped, graded, vignetted frame per call into an owned surface.
pub struct FrameCompositor {
    opts: CompositorOpts,
    surface: Surface,
    layer: Vec<u8>,
}

impl FrameCompositor {
    pub fn new(canvas: Canvas, opts: CompositorOpts) -> Self {
        Self {
            opts,
            surface: Surface::new(canvas),
            layer: vec![0u8; canvas.byte_len()],
        }
    }

    pub fn opts(&self) -> &CompositorOpts {
        &self.opts
    }

    pub fn set_effects_enabled(&mut self, enabled: bool) {
        self.opts.effects_enabled = enabled;
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn resize(&mut self, canvas: Canvas) {
        if canvas == self.surface.canvas() {
            return;
        }
        self.surface = Surface::new(canvas);
        self.layer = vec![0u8; canvas.byte_len()];
    }

    /// Draw `frame` at scroll progress `t`.
    ///
    /// The surface is cleared first; `None` leaves it cleared. Never fails: a filter that cannot
    /// be applied is skipped and logged.
    pub fn draw(&mut self, frame: Option<&PreparedFrame>, t: f64) -> DrawOutcome {
        self.surface.clear();
        let Some(frame) = frame else {
            return DrawOutcome::Cleared;
        };
        if !frame.is_well_formed() {
            warn!(
                width = frame.width,
                height = frame.height,
                bytes = frame.rgba8_premul.len(),
                "frame buffer does not match its dimensions; skipped"
            );
            return DrawOutcome::Cleared;
        }

        let canvas = self.surface.canvas();
        let params = RenderParameters::at(t, &self.opts.grade, self.opts.effects_enabled);
        let Some(rect) = draw_rect(frame.size(), canvas.size(), params.scale) else {
            return DrawOutcome::Cleared;
        };

        self.layer.fill(0);
        draw_frame_into(&mut self.layer, canvas, frame, rect);

        match blur_css_px(&self.layer, canvas.width, canvas.height, params.blur_px) {
            Ok(Some(blurred)) => self.layer = blurred,
            Ok(None) => {}
            Err(err) => warn!(%err, blur_px = params.blur_px, "blur skipped"),
        }
        brightness_in_place(&mut self.layer, params.brightness);

        if let Err(err) = over_in_place(self.surface.data_mut(), &self.layer, 1.0) {
            warn!(%err, "frame composite failed");
            self.surface.clear();
            return DrawOutcome::Cleared;
        }
        vignette_in_place(
            self.surface.data_mut(),
            canvas.width,
            canvas.height,
            &self.opts.vignette,
        );

        DrawOutcome::Drawn { params, rect }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
