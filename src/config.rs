use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    foundation::{
        core::{Canvas, Rect, Size},
        error::{ScrubError, ScrubResult},
    },
    loader::pipeline::LoaderOpts,
    render::compositor::CompositorOpts,
    scroll::{
        progress::{ScrollProgressMapper, ScrollWindow},
        smooth::ProgressSmoother,
    },
    sequence::spec::SequenceSpec,
};

/// Page geometry the scroll mapper works against, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    pub window: ScrollWindow,
    /// Container bounding box in document coordinates.
    pub container: Rect,
    pub viewport: Size,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        // A pinned section four viewports tall, starting at the top of the page.
        Self {
            window: ScrollWindow::FullTraverse,
            container: Rect::new(0.0, 0.0, 1280.0, 2880.0),
            viewport: Size::new(1280.0, 720.0),
        }
    }
}

impl ScrollConfig {
    pub fn mapper(&self) -> ScrollProgressMapper {
        ScrollProgressMapper::new(self.window, self.container, self.viewport)
    }
}

/// Everything needed to load and play one scroll-driven sequence.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrubConfig {
    pub sequence: SequenceSpec,
    #[serde(default)]
    pub loader: LoaderOpts,
    #[serde(default)]
    pub compositor: CompositorOpts,
    #[serde(default)]
    pub surface: Canvas,
    #[serde(default)]
    pub scroll: ScrollConfig,
    /// Inertia applied on top of raw scroll progress; off when absent.
    #[serde(default)]
    pub smoothing: Option<ProgressSmoother>,
}

impl ScrubConfig {
    pub fn new(sequence: SequenceSpec) -> Self {
        Self {
            sequence,
            loader: LoaderOpts::default(),
            compositor: CompositorOpts::default(),
            surface: Canvas::default(),
            scroll: ScrollConfig::default(),
            smoothing: None,
        }
    }

    pub fn from_path(path: &Path) -> ScrubResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(s: &str) -> ScrubResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> ScrubResult<()> {
        self.sequence.validate()?;
        Canvas::new(self.surface.width, self.surface.height)?;
        if self.loader.batch_size == 0 {
            return Err(ScrubError::validation("loader batch_size must be >= 1"));
        }
        if self.loader.publish_every == 0 {
            return Err(ScrubError::validation("loader publish_every must be >= 1"));
        }
        let v = &self.compositor.vignette;
        if !(v.opacity.is_finite() && (0.0..=1.0).contains(&v.opacity)) {
            return Err(ScrubError::validation("vignette opacity must be in [0, 1]"));
        }
        if !(v.inner.is_finite() && v.outer.is_finite() && v.inner >= 0.0 && v.outer >= 0.0) {
            return Err(ScrubError::validation("vignette radii must be finite and >= 0"));
        }
        if self.scroll.viewport.height <= 0.0 || self.scroll.container.height() < 0.0 {
            return Err(ScrubError::validation(
                "scroll viewport height must be > 0 and the container non-inverted",
            ));
        }
        Ok(())
    }

    /// Directory frame identifiers are resolved against when loading from disk.
    pub fn frames_root(config_path: &Path) -> PathBuf {
        config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
