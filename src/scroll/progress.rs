use crate::foundation::{
    core::{Rect, Size, Vec2},
    math::clamp01,
};

/// Which stretch of scrolling maps onto progress 0..1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollWindow {
    /// 0 when the container's top meets the viewport bottom, 1 when it reaches the viewport
    /// center. Reveal-on-scroll.
    Reveal,
    /// 0 when the container's top meets the viewport top, 1 when its bottom meets the viewport
    /// bottom. Pin-and-scrub over the container's full height.
    #[default]
    FullTraverse,
}

/// Progress of `container` (viewport-relative bounding box) within `window`, clamped to [0, 1].
pub fn scroll_progress(window: ScrollWindow, container: Rect, viewport_height: f64) -> f64 {
    let (travelled, distance) = match window {
        ScrollWindow::Reveal => (viewport_height - container.y0, viewport_height / 2.0),
        ScrollWindow::FullTraverse => (-container.y0, container.height() - viewport_height),
    };
    if distance.is_nan() || distance <= 0.0 {
        return 0.0;
    }
    clamp01(travelled / distance)
}

/// Tracks a container laid out in document coordinates and maps scroll offsets to progress.
#[derive(Clone, Debug)]
pub struct ScrollProgressMapper {
    window: ScrollWindow,
    container: Rect,
    viewport: Size,
    scroll_y: f64,
    progress: f64,
}

impl ScrollProgressMapper {
    pub fn new(window: ScrollWindow, container: Rect, viewport: Size) -> Self {
        let mut mapper = Self {
            window,
            container,
            viewport,
            scroll_y: 0.0,
            progress: 0.0,
        };
        mapper.recompute();
        mapper
    }

    pub fn window(&self) -> ScrollWindow {
        self.window
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Container box relative to the viewport at the current scroll offset.
    pub fn container_in_viewport(&self) -> Rect {
        self.container - Vec2::new(0.0, self.scroll_y)
    }

    /// Scroll offsets at which progress leaves 0 and reaches 1.
    pub fn scroll_range(&self) -> (f64, f64) {
        let c = self.container;
        let vh = self.viewport.height;
        match self.window {
            ScrollWindow::Reveal => (c.y0 - vh, c.y0 - vh / 2.0),
            ScrollWindow::FullTraverse => (c.y0, c.y1 - vh),
        }
    }

    pub fn on_scroll(&mut self, scroll_y: f64) -> f64 {
        self.scroll_y = scroll_y;
        self.recompute()
    }

    pub fn on_resize(&mut self, viewport: Size, container: Rect) -> f64 {
        self.viewport = viewport;
        self.container = container;
        self.recompute()
    }

    fn recompute(&mut self) -> f64 {
        self.progress = scroll_progress(
            self.window,
            self.container_in_viewport(),
            self.viewport.height,
        );
        self.progress
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/progress.rs"]
mod tests;
