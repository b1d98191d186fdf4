use std::sync::Arc;

use crate::{
    foundation::math::clamp01,
    sequence::{frame::PreparedFrame, spec::SequenceSpec},
};

/// Published load progress of one sequence generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadProgress {
    /// Bumped on every reset; progress from an older generation belongs to a discarded sequence.
    pub generation: u64,
    pub frame_count: u32,
    /// Settled attempts, successful or not.
    pub loaded_count: u32,
    pub first_frame_loaded: bool,
}

impl LoadProgress {
    /// Loaded fraction in [0, 1]; 0 for an empty sequence.
    pub fn fraction(&self) -> f64 {
        if self.frame_count == 0 {
            return 0.0;
        }
        f64::from(self.loaded_count) / f64::from(self.frame_count)
    }

    pub fn is_complete(&self) -> bool {
        self.loaded_count == self.frame_count
    }
}

/// Immutable view of the frame slots at one point in time.
#[derive(Clone, Debug, Default)]
pub struct FrameSnapshot {
    pub generation: u64,
    frames: Arc<[Option<PreparedFrame>]>,
}

impl FrameSnapshot {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PreparedFrame> {
        self.frames.get(index).and_then(Option::as_ref)
    }

    pub fn populated(&self) -> usize {
        self.frames.iter().filter(|f| f.is_some()).count()
    }

    /// Slot index nearest to `progress` along the sequence.
    pub fn target_index(&self, progress: f64) -> Option<usize> {
        if self.frames.is_empty() {
            return None;
        }
        let last = (self.frames.len() - 1) as f64;
        Some((clamp01(progress) * last).round() as usize)
    }

    /// Populated slot closest to `target`; on a tie the earlier frame wins.
    pub fn nearest_available(&self, target: usize) -> Option<usize> {
        let len = self.frames.len();
        if len == 0 {
            return None;
        }
        let target = target.min(len - 1);
        for d in 0..len {
            if let Some(i) = target.checked_sub(d)
                && self.frames[i].is_some()
            {
                return Some(i);
            }
            let i = target + d;
            if i < len && self.frames[i].is_some() {
                return Some(i);
            }
            if d > target && i >= len {
                break;
            }
        }
        None
    }

    /// The frame to show at `progress`, tolerating holes in the sequence.
    pub fn frame_for_progress(&self, progress: f64) -> Option<(usize, &PreparedFrame)> {
        let target = self.target_index(progress)?;
        let index = self.nearest_available(target)?;
        self.get(index).map(|f| (index, f))
    }
}

/// Owned frame storage plus progress bookkeeping for the current sequence.
///
/// All writes go through [`FrameStore::reset`] and [`FrameStore::record`]. Records tagged with a
/// generation other than the current one are dropped, so late completions from a replaced
/// sequence can never land in the new one.
#[derive(Debug)]
pub struct FrameStore {
    spec: Option<SequenceSpec>,
    generation: u64,
    slots: Vec<Option<PreparedFrame>>,
    attempted: Vec<bool>,
    settled: u32,
    first_frame_loaded: bool,
    publish_every: u32,
    published: LoadProgress,
}

impl FrameStore {
    pub fn new(publish_every: u32) -> Self {
        Self {
            spec: None,
            generation: 0,
            slots: Vec::new(),
            attempted: Vec::new(),
            settled: 0,
            first_frame_loaded: false,
            publish_every: publish_every.max(1),
            published: LoadProgress::default(),
        }
    }

    pub fn spec(&self) -> Option<&SequenceSpec> {
        self.spec.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Discard every slot and counter and start a new generation for `spec`.
    pub fn reset(&mut self, spec: &SequenceSpec) -> u64 {
        let n = spec.frame_count as usize;
        self.generation += 1;
        self.spec = Some(spec.clone());
        self.slots = vec![None; n];
        self.attempted = vec![false; n];
        self.settled = 0;
        self.first_frame_loaded = false;
        self.published = self.current_progress();
        self.generation
    }

    /// Store the outcome of one load attempt.
    ///
    /// The slot is written immediately. The return value is the newly published progress when
    /// the publish throttle lets this settle through, `None` otherwise.
    pub fn record(
        &mut self,
        generation: u64,
        slot: usize,
        frame: Option<PreparedFrame>,
    ) -> Option<LoadProgress> {
        if generation != self.generation || slot >= self.slots.len() {
            return None;
        }
        if slot == 0 && frame.is_some() {
            self.first_frame_loaded = true;
        }
        self.slots[slot] = frame;
        if std::mem::replace(&mut self.attempted[slot], true) {
            return None;
        }
        self.settled += 1;

        let total = self.slots.len() as u32;
        let publish = slot == 0 || self.settled % self.publish_every == 0 || self.settled == total;
        if !publish {
            return None;
        }
        self.published = self.current_progress();
        Some(self.published)
    }

    /// Last published (throttled) progress.
    pub fn published(&self) -> LoadProgress {
        self.published
    }

    /// Unthrottled progress.
    pub fn current_progress(&self) -> LoadProgress {
        LoadProgress {
            generation: self.generation,
            frame_count: self.slots.len() as u32,
            loaded_count: self.settled,
            first_frame_loaded: self.first_frame_loaded,
        }
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            generation: self.generation,
            frames: self.slots.iter().cloned().collect(),
        }
    }
}

impl Default for FrameStore {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/store.rs"]
mod tests;
