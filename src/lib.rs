//! Framescrub turns scroll position into frames of a pre-rendered image sequence.
//!
//! # Pipeline overview
//!
//! 1. **Load**: a [`SequenceSpec`] names N numbered frames. [`FrameLoader`] fetches the first one
//!    on its own, pauses briefly, then pulls the rest in bounded batches, publishing throttled
//!    [`LoadProgress`] updates. Reloading with a new spec cancels the old run and discards its
//!    late results.
//! 2. **Map**: [`ScrollProgressMapper`] reduces a container rectangle and the viewport height to a
//!    progress value `t` in `[0, 1]`, optionally eased by [`ProgressSmoother`].
//! 3. **Composite**: [`FrameCompositor`] picks the frame for `t`, cover-fits and scales it, then
//!    applies blur, brightness, and a radial vignette on a premultiplied RGBA8 [`Surface`].
//!
//! [`Scrubber`] ties steps 2 and 3 to scroll and resize events. The [`ScrubConfig`] JSON document
//! describes one playable sequence and is what the `framescrub` binary consumes.
//!
//! Key constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Failures are absorbed**: a frame that cannot be fetched or decoded leaves an empty slot and
//!   still counts toward progress; drawing with no frame clears the surface.
//! - **Premultiplied RGBA8** end-to-end: decoded frames and surfaces hold premultiplied pixels.
#![forbid(unsafe_code)]

mod config;
mod foundation;
mod loader;
mod render;
mod scroll;
mod scrubber;
mod sequence;
mod shop;

pub use config::{ScrollConfig, ScrubConfig};
pub use foundation::core::{Canvas, Rect, Size, Vec2};
pub use foundation::error::{ScrubError, ScrubResult};
pub use foundation::math::lerp;
pub use loader::pipeline::{FirstFramePolicy, FrameLoader, LoaderOpts};
pub use loader::source::{FrameSource, FsFrameSource, MemoryFrameSource};
pub use render::blur::{blur_css_px, blur_rgba8_premul};
pub use render::composite::{
    PremulRgba8, VignetteSpec, brightness_in_place, over, over_in_place, vignette_in_place,
};
pub use render::compositor::{CompositorOpts, DrawOutcome, FrameCompositor};
pub use render::params::{GradeRanges, ParamRange, RenderParameters, cover_fit, draw_rect};
pub use render::surface::{Surface, draw_frame_into};
pub use scroll::progress::{ScrollProgressMapper, ScrollWindow, scroll_progress};
pub use scroll::smooth::ProgressSmoother;
pub use scrubber::{ScrubTick, Scrubber};
pub use sequence::frame::{PreparedFrame, decode_frame};
pub use sequence::spec::{SequenceSpec, pad3};
pub use sequence::store::{FrameSnapshot, FrameStore, LoadProgress};
pub use shop::api::{ApiEnvelope, Product, parse_envelope};
pub use shop::cart::{
    CART_STORAGE_KEY, Cart, CartLine, FileKvStore, KeyValueStore, MemoryKvStore, PersistentCart,
};
