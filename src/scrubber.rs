use crate::{
    foundation::core::{Canvas, Rect, Size},
    render::compositor::{DrawOutcome, FrameCompositor},
    scroll::{progress::ScrollProgressMapper, smooth::ProgressSmoother},
    sequence::store::FrameSnapshot,
};

/// What one scroll or animation tick produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrubTick {
    /// Progress the frame was rendered at (smoothed when a smoother is attached).
    pub progress: f64,
    /// Slot that was drawn; may differ from the target when that slot is still empty.
    pub frame_index: Option<usize>,
    pub outcome: DrawOutcome,
}

/// Scroll position in, composited frame out.
///
/// Every call draws from the snapshot it is given, so a redraw always reflects the frames that
/// are available at that moment.
pub struct Scrubber {
    mapper: ScrollProgressMapper,
    smoother: Option<ProgressSmoother>,
    compositor: FrameCompositor,
}

impl Scrubber {
    pub fn new(mapper: ScrollProgressMapper, compositor: FrameCompositor) -> Self {
        Self {
            mapper,
            smoother: None,
            compositor,
        }
    }

    pub fn with_smoother(mut self, mut smoother: ProgressSmoother) -> Self {
        smoother.reset(self.mapper.progress());
        self.smoother = Some(smoother);
        self
    }

    pub fn mapper(&self) -> &ScrollProgressMapper {
        &self.mapper
    }

    pub fn compositor(&self) -> &FrameCompositor {
        &self.compositor
    }

    pub fn is_animating(&self) -> bool {
        self.smoother.as_ref().is_some_and(ProgressSmoother::is_animating)
    }

    pub fn on_scroll(&mut self, scroll_y: f64, frames: &FrameSnapshot) -> ScrubTick {
        let raw = self.mapper.on_scroll(scroll_y);
        let progress = self.follow(raw);
        self.render_at(progress, frames)
    }

    pub fn on_resize(
        &mut self,
        viewport: Size,
        container: Rect,
        canvas: Canvas,
        frames: &FrameSnapshot,
    ) -> ScrubTick {
        let raw = self.mapper.on_resize(viewport, container);
        self.compositor.resize(canvas);
        let progress = self.follow(raw);
        self.render_at(progress, frames)
    }

    /// Advance the smoother by `dt_secs` and redraw; without a smoother this just redraws.
    pub fn tick(&mut self, dt_secs: f64, frames: &FrameSnapshot) -> ScrubTick {
        let progress = match self.smoother.as_mut() {
            Some(s) => s.tick(dt_secs),
            None => self.mapper.progress(),
        };
        self.render_at(progress, frames)
    }

    /// Draw the frame nearest `progress`, bypassing the mapper.
    pub fn render_at(&mut self, progress: f64, frames: &FrameSnapshot) -> ScrubTick {
        let selected = frames.frame_for_progress(progress);
        let outcome = self.compositor.draw(selected.map(|(_, f)| f), progress);
        ScrubTick {
            progress,
            frame_index: selected.map(|(i, _)| i),
            outcome,
        }
    }

    fn follow(&mut self, raw: f64) -> f64 {
        match self.smoother.as_mut() {
            Some(s) => {
                s.set_target(raw);
                s.value()
            }
            None => raw,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/scrubber.rs"]
mod tests;
