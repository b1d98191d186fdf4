use crate::foundation::error::{ScrubError, ScrubResult};

/// Identity of an image sequence: where its frames live and how they are sampled.
///
/// Two specs that compare equal describe the same frames, so a loader handed an equal spec keeps
/// what it already has. Any field change means a full reset and reload.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SequenceSpec {
    /// Prefix placed in front of the zero-padded source index, e.g. `"frames/hero_"`.
    pub base_path: String,
    /// Number of logical frames.
    pub frame_count: u32,
    /// File extension without the leading dot.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Sampling stride over the source frames (1 = every source frame).
    #[serde(default = "default_step")]
    pub step: u32,
}

fn default_extension() -> String {
    "jpg".to_string()
}

fn default_step() -> u32 {
    1
}

impl SequenceSpec {
    pub fn new(base_path: impl Into<String>, frame_count: u32, extension: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            frame_count,
            extension: extension.into(),
            step: 1,
        }
    }

    pub fn with_step(mut self, step: u32) -> Self {
        self.step = step;
        self
    }

    /// A zero frame count is accepted: it loads nothing and reports progress 0.
    pub fn validate(&self) -> ScrubResult<()> {
        if self.step == 0 {
            return Err(ScrubError::validation("sequence step must be >= 1"));
        }
        let ext = self.extension.trim();
        if ext.is_empty() {
            return Err(ScrubError::validation("sequence extension must be non-empty"));
        }
        if ext.starts_with('.') {
            return Err(ScrubError::validation(
                "sequence extension must not start with '.'",
            ));
        }
        Ok(())
    }

    /// Source frame index for 1-based logical frame `logical`: `(logical - 1) * step + 1`.
    pub fn source_index(&self, logical: u32) -> u64 {
        u64::from(logical.saturating_sub(1)) * u64::from(self.step.max(1)) + 1
    }

    /// Identifier of logical frame `logical` (1-based).
    pub fn frame_url(&self, logical: u32) -> String {
        format!(
            "{}{}.{}",
            self.base_path,
            pad3(self.source_index(logical)),
            self.extension
        )
    }

    /// Logical frames in load order, paired with their slot index.
    pub fn slots(&self) -> impl Iterator<Item = (usize, String)> + '_ {
        (1..=self.frame_count).map(|logical| ((logical - 1) as usize, self.frame_url(logical)))
    }
}

/// Zero-pad to at least three digits; wider indices are printed in full.
pub fn pad3(index: u64) -> String {
    format!("{index:03}")
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/spec.rs"]
mod tests;
