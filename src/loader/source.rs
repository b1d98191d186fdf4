use std::{
    collections::HashMap,
    future::Future,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use anyhow::Context;

use crate::foundation::error::{ScrubError, ScrubResult};

/// Where frame bytes come from.
///
/// `fetch` receives the identifier built by [`crate::SequenceSpec::frame_url`] and returns the
/// encoded image. Several fetches run concurrently within a batch.
pub trait FrameSource: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = ScrubResult<Vec<u8>>> + Send;
}

/// Reads frames from the filesystem, resolving identifiers against `root`.
#[derive(Clone, Debug)]
pub struct FsFrameSource {
    root: PathBuf,
}

impl FsFrameSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, url: &str) -> PathBuf {
        let rel = url.trim_start_matches("./");
        self.root.join(rel)
    }
}

impl FrameSource for FsFrameSource {
    async fn fetch(&self, url: &str) -> ScrubResult<Vec<u8>> {
        let path = self.resolve(url);
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("read frame '{}'", path.display()))?;
        Ok(bytes)
    }
}

/// In-memory frame source keyed by identifier.
#[derive(Clone, Debug, Default)]
pub struct MemoryFrameSource {
    frames: Arc<RwLock<HashMap<String, Arc<Vec<u8>>>>>,
}

impl MemoryFrameSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, url: impl Into<String>, bytes: Vec<u8>) {
        let mut frames = self
            .frames
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        frames.insert(url.into(), Arc::new(bytes));
    }

    pub fn len(&self) -> usize {
        self.frames
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, url: &str) -> ScrubResult<Vec<u8>> {
        let frames = self
            .frames
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        frames
            .get(url)
            .map(|b| b.as_ref().clone())
            .ok_or_else(|| ScrubError::load(format!("no frame at '{url}'")))
    }
}

impl FrameSource for MemoryFrameSource {
    async fn fetch(&self, url: &str) -> ScrubResult<Vec<u8>> {
        self.lookup(url)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/loader/source.rs"]
mod tests;
