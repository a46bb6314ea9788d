//! Narrative Track is a deterministic, scroll-driven narrative animation engine.
//!
//! The host feeds it a region's layout box on every scroll notification; it computes
//! what a rendering surface should show and never paints anything itself.
//!
//! # Pipeline overview
//!
//! 1. **Progress**: `ScrollGeometry -> ScrollProgress` (clamped `[0, 1]` plus direction)
//! 2. **Stages**: `ScrollProgress -> Stage` (a re-enterable chain gated by thresholds,
//!    content completion of the per-character reveal, and a completion delay)
//! 3. **Values**: background/text colors from color bands, per-character opacity, and
//!    a vertical offset written to an externally owned [`VisualLayer`]
//! 4. **Scroll lock**: at most one [`Effect::ScrollTo`] per overshoot of an unfinished
//!    section
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: time is injected as [`TimeMs`]; identical inputs replay identically.
//! - **Never fails per frame**: missing geometry holds the last state, bad configuration
//!   falls back to documented defaults.
//! - **Clean teardown**: [`NarrativeTrack::dispose`] (also run on drop) cancels timers
//!   and puts the external layer back at offset zero.
#![forbid(unsafe_code)]

mod animation;
mod foundation;
mod track;

pub use animation::color::{ColorBand, ColorTrack, interpolate};
pub use animation::progress::{ProgressTracker, ScrollProgress, region_progress};
pub use animation::reveal::{
    CharacterReveal, CharacterUnit, RevealDirection, RevealSchedule, RevealSignal, WordCluster,
    schedule,
};
pub use foundation::core::{Rect, Rgb8, ScrollGeometry, TimeMs};
pub use foundation::error::{NarrativeError, NarrativeResult};
pub use foundation::math::Lerp;
pub use track::config::{
    DEFAULT_COMPLETION_DELAY_MS, DEFAULT_MAX_SHIFT_RATIO, DEFAULT_STAGGER_MS,
    DEFAULT_UNIT_FADE_MS, ResolvedConfig, ThresholdOverrides, Thresholds, TrackConfig,
};
pub use track::engine::{FrameOutput, NarrativeTrack};
pub use track::lock::{Effect, ScrollLockGovernor};
pub use track::stage::{
    Stage, StageChange, StageController, StageFlags, StageInputs, StageReport, transition,
};
pub use track::sync::{LayerState, SharedLayer, Synchronizer, VisualLayer, shift_for};
