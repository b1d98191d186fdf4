use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::{sync::watch, task::JoinHandle, task::JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    foundation::error::ScrubResult,
    loader::source::FrameSource,
    sequence::{
        frame::{PreparedFrame, decode_frame},
        spec::SequenceSpec,
        store::{FrameSnapshot, FrameStore, LoadProgress},
    },
};

/// What to do when the first frame cannot be loaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstFramePolicy {
    /// Count the failure and continue with bulk loading.
    #[default]
    Proceed,
    /// Stop after the failed first frame; nothing else is requested.
    Halt,
}

/// Loader tuning. Defaults match the browser behaviour this pipeline reproduces.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoaderOpts {
    /// Frames requested together after the first one; a batch fully settles before the next.
    pub batch_size: usize,
    /// Pause between the first frame and the first batch.
    pub settle_delay_ms: u64,
    /// Pause between batches.
    pub batch_pause_ms: u64,
    /// Progress is published on the first frame, every `publish_every` settles, and at the end.
    pub publish_every: u32,
    pub first_frame_policy: FirstFramePolicy,
}

impl Default for LoaderOpts {
    fn default() -> Self {
        Self {
            batch_size: 8,
            settle_delay_ms: 300,
            batch_pause_ms: 20,
            publish_every: 10,
            first_frame_policy: FirstFramePolicy::Proceed,
        }
    }
}

impl LoaderOpts {
    /// No delays; useful for offline rendering where nothing competes with the first paint.
    pub fn immediate() -> Self {
        Self {
            settle_delay_ms: 0,
            batch_pause_ms: 0,
            ..Self::default()
        }
    }
}

/// Progressive loader for one image sequence at a time.
///
/// Owns the frame storage, the progress channel and the background task. Must be driven from
/// within a tokio runtime. Dropping the loader cancels any in-flight loading.
pub struct FrameLoader<S: FrameSource> {
    source: Arc<S>,
    opts: LoaderOpts,
    store: Arc<Mutex<FrameStore>>,
    progress_tx: Arc<watch::Sender<LoadProgress>>,
    root: CancellationToken,
    cancel: CancellationToken,
    current: Option<SequenceSpec>,
    task: Option<JoinHandle<()>>,
}

impl<S: FrameSource> FrameLoader<S> {
    pub fn new(source: S, opts: LoaderOpts) -> Self {
        Self::with_shared_source(Arc::new(source), opts)
    }

    pub fn with_shared_source(source: Arc<S>, opts: LoaderOpts) -> Self {
        let store = FrameStore::new(opts.publish_every);
        let (progress_tx, _) = watch::channel(store.published());
        let root = CancellationToken::new();
        let cancel = root.child_token();
        Self {
            source,
            opts,
            store: Arc::new(Mutex::new(store)),
            progress_tx: Arc::new(progress_tx),
            root,
            cancel,
            current: None,
            task: None,
        }
    }

    pub fn opts(&self) -> &LoaderOpts {
        &self.opts
    }

    pub fn spec(&self) -> Option<&SequenceSpec> {
        self.current.as_ref()
    }

    /// Start loading `spec`, replacing whatever was loading before.
    ///
    /// An unchanged spec keeps the current frames and task. A changed spec cancels the previous
    /// task and clears storage before the new task issues its first request.
    #[tracing::instrument(skip(self, spec), fields(base_path = %spec.base_path, frame_count = spec.frame_count, step = spec.step))]
    pub fn load(&mut self, spec: SequenceSpec) -> ScrubResult<()> {
        spec.validate()?;
        if self.current.as_ref() == Some(&spec) {
            debug!("sequence unchanged; keeping loaded frames");
            return Ok(());
        }

        self.stop_task();
        let generation = {
            let mut store = lock_store(&self.store);
            let generation = store.reset(&spec);
            self.progress_tx.send_replace(store.published());
            generation
        };
        info!(generation, "loading frame sequence");

        self.cancel = self.root.child_token();
        let ctx = SequenceRun {
            source: Arc::clone(&self.source),
            store: Arc::clone(&self.store),
            progress_tx: Arc::clone(&self.progress_tx),
            opts: self.opts.clone(),
            spec: spec.clone(),
            generation,
            cancel: self.cancel.clone(),
        };
        self.task = Some(tokio::spawn(ctx.run()));
        self.current = Some(spec);
        Ok(())
    }

    /// Wait until the current sequence has finished (or stopped) loading.
    pub async fn settled(&mut self) {
        if let Some(task) = self.task.take()
            && let Err(err) = task.await
            && !err.is_cancelled()
        {
            warn!(%err, "frame loader task ended abnormally");
        }
    }

    pub fn is_loading(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Receiver of throttled progress updates.
    pub fn subscribe(&self) -> watch::Receiver<LoadProgress> {
        self.progress_tx.subscribe()
    }

    /// Last published progress.
    pub fn progress(&self) -> LoadProgress {
        *self.progress_tx.borrow()
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        lock_store(&self.store).snapshot()
    }

    /// Cancel loading and forget the current sequence. Loaded frames stay readable.
    pub fn shutdown(&mut self) {
        self.stop_task();
        self.current = None;
    }

    fn stop_task(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<S: FrameSource> Drop for FrameLoader<S> {
    fn drop(&mut self) {
        self.root.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

struct SequenceRun<S> {
    source: Arc<S>,
    store: Arc<Mutex<FrameStore>>,
    progress_tx: Arc<watch::Sender<LoadProgress>>,
    opts: LoaderOpts,
    spec: SequenceSpec,
    generation: u64,
    cancel: CancellationToken,
}

impl<S: FrameSource> SequenceRun<S> {
    async fn run(self) {
        let mut slots = self.spec.slots();
        let Some((first_slot, first_url)) = slots.next() else {
            debug!("empty sequence; nothing to load");
            return;
        };

        let first = tokio::select! {
            _ = self.cancel.cancelled() => return,
            frame = load_one(self.source.as_ref(), &first_url) => frame,
        };
        let first_ok = first.is_some();
        self.record(first_slot, first);
        if !first_ok && self.opts.first_frame_policy == FirstFramePolicy::Halt {
            warn!(url = %first_url, "first frame failed; bulk loading halted");
            return;
        }

        if !self.pause(self.opts.settle_delay_ms).await {
            return;
        }

        let rest: Vec<(usize, String)> = slots.collect();
        for (batch_idx, batch) in rest.chunks(self.opts.batch_size.max(1)).enumerate() {
            if batch_idx > 0 && !self.pause(self.opts.batch_pause_ms).await {
                return;
            }
            if !self.run_batch(batch).await {
                return;
            }
        }
        debug!(generation = self.generation, "frame sequence settled");
    }

    /// Load one batch; returns `false` when cancelled.
    async fn run_batch(&self, batch: &[(usize, String)]) -> bool {
        let mut pending: BTreeSet<usize> = batch.iter().map(|(slot, _)| *slot).collect();
        let mut set = JoinSet::new();
        for (slot, url) in batch.iter().cloned() {
            let source = Arc::clone(&self.source);
            set.spawn(async move { (slot, load_one(source.as_ref(), &url).await) });
        }

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    set.abort_all();
                    return false;
                }
                joined = set.join_next() => match joined {
                    Some(Ok((slot, frame))) => {
                        pending.remove(&slot);
                        self.record(slot, frame);
                    }
                    Some(Err(err)) => warn!(%err, "frame load task failed"),
                    None => break,
                }
            }
        }

        // A panicked task still counts as a settled attempt.
        for slot in pending {
            self.record(slot, None);
        }
        true
    }

    fn record(&self, slot: usize, frame: Option<PreparedFrame>) {
        let published = record_and_publish(
            &self.store,
            &self.progress_tx,
            self.generation,
            slot,
            frame,
        );
        if let Some(progress) = published {
            debug!(
                loaded = progress.loaded_count,
                total = progress.frame_count,
                "load progress"
            );
        }
    }

    /// Sleep unless cancelled first; returns `false` when cancelled.
    async fn pause(&self, ms: u64) -> bool {
        if ms == 0 {
            return !self.cancel.is_cancelled();
        }
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(Duration::from_millis(ms)) => true,
        }
    }
}

async fn load_one<S: FrameSource>(source: &S, url: &str) -> Option<PreparedFrame> {
    let bytes = match source.fetch(url).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(url, %err, "frame fetch failed");
            return None;
        }
    };
    match tokio::task::spawn_blocking(move || decode_frame(&bytes)).await {
        Ok(Ok(frame)) => Some(frame),
        Ok(Err(err)) => {
            warn!(url, %err, "frame decode failed");
            None
        }
        Err(err) => {
            warn!(url, %err, "frame decode task failed");
            None
        }
    }
}

/// Record one settle and publish its progress without releasing the store in between.
///
/// `FrameLoader::load` resets and publishes under the same lock, so progress from a replaced
/// generation can never overwrite the new one. The channel also refuses to step back to an
/// older generation.
fn record_and_publish(
    store: &Mutex<FrameStore>,
    progress_tx: &watch::Sender<LoadProgress>,
    generation: u64,
    slot: usize,
    frame: Option<PreparedFrame>,
) -> Option<LoadProgress> {
    let mut store = lock_store(store);
    let progress = store.record(generation, slot, frame)?;
    let sent = progress_tx.send_if_modified(|current| {
        if current.generation > progress.generation {
            return false;
        }
        *current = progress;
        true
    });
    sent.then_some(progress)
}

fn lock_store(store: &Mutex<FrameStore>) -> MutexGuard<'_, FrameStore> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[path = "../../tests/unit/loader/pipeline.rs"]
mod tests;
