//! One narrative track: the per-frame pipeline and its lifecycle.
//!
//! Within a frame the order is fixed: progress, stages (which drive the reveal),
//! colors and the layer offset, then the scroll lock, which reads the flags the stage
//! machine just settled.

use crate::{
    animation::{
        progress::{ProgressTracker, ScrollProgress},
        reveal::{CharacterReveal, RevealSignal, schedule},
    },
    foundation::core::{Rgb8, ScrollGeometry, TimeMs},
    track::{
        config::{ResolvedConfig, TrackConfig},
        lock::{Effect, ScrollLockGovernor},
        stage::{Stage, StageChange, StageController, StageFlags},
        sync::{Synchronizer, VisualLayer},
    },
};

/// Values computed for one frame, for the host's rendering surface.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOutput {
    pub time: TimeMs,
    pub progress: ScrollProgress,
    pub stage: Stage,
    pub flags: StageFlags,
    pub changes: Vec<StageChange>,
    pub reveal_signal: Option<RevealSignal>,
    pub background: Rgb8,
    pub text_color: Rgb8,
    pub unit_opacity: Vec<f64>,
    pub offset_px: f64,
    pub effects: Vec<Effect>,
    /// When the host should schedule another frame even without scrolling.
    pub next_deadline: Option<TimeMs>,
}

pub struct NarrativeTrack<L: VisualLayer> {
    config: ResolvedConfig,
    tracker: ProgressTracker,
    stages: StageController,
    sync: Synchronizer<L>,
    lock: ScrollLockGovernor,
    geometry: Option<ScrollGeometry>,
    pending: Option<ScrollGeometry>,
    offset_px: f64,
    disposed: bool,
}

impl<L: VisualLayer> NarrativeTrack<L> {
    #[tracing::instrument(skip(config, layer))]
    pub fn new(config: &TrackConfig, text: &str, layer: L) -> Self {
        Self::with_resolved(config.resolve(), text, layer)
    }

    pub fn with_resolved(config: ResolvedConfig, text: &str, layer: L) -> Self {
        let reveal = CharacterReveal::new(schedule(text, config.stagger_ms), config.unit_fade_ms);
        let t = config.thresholds;
        Self {
            tracker: ProgressTracker::new(),
            stages: StageController::new(t, config.completion_delay_ms, reveal),
            sync: Synchronizer::new(layer, t.stage1_start, config.max_shift_ratio),
            lock: ScrollLockGovernor::new(&t),
            geometry: None,
            pending: None,
            offset_px: 0.0,
            disposed: false,
            config,
        }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn stage(&self) -> Stage {
        self.stages.stage()
    }

    pub fn flags(&self) -> StageFlags {
        self.stages.flags()
    }

    pub fn stages(&self) -> &StageController {
        &self.stages
    }

    pub fn layer(&self) -> &L {
        self.sync.layer()
    }

    pub fn is_lock_engaged(&self) -> bool {
        self.lock.is_engaged()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn next_deadline(&self) -> Option<TimeMs> {
        self.stages.next_deadline()
    }

    /// Record a scroll notification. Only the latest one before [`Self::frame`] counts.
    pub fn notify_scroll(&mut self, geometry: ScrollGeometry) {
        if !self.disposed {
            self.pending = Some(geometry);
        }
    }

    /// Run at most one pipeline pass for this display frame.
    ///
    /// Uses the latest pending geometry if there is one, otherwise advances running
    /// timers against the last geometry. `None` when there is nothing to do.
    pub fn frame(&mut self, now: TimeMs) -> Option<FrameOutput> {
        if self.disposed {
            return None;
        }
        if let Some(geometry) = self.pending.take() {
            return Some(self.step(Some(&geometry), now));
        }
        if self.stages.next_deadline().is_some() {
            return Some(self.tick(now));
        }
        None
    }

    /// One full pipeline pass. Missing or unusable geometry holds the last state.
    pub fn step(&mut self, geometry: Option<&ScrollGeometry>, now: TimeMs) -> FrameOutput {
        if self.disposed {
            return self.snapshot(now);
        }
        let Some(geometry) = geometry else {
            return self.snapshot(now);
        };
        let Some(progress) = self.tracker.observe(geometry) else {
            return self.snapshot(now);
        };
        self.geometry = Some(*geometry);
        self.run(progress, *geometry, now)
    }

    /// Advance timers (reveal, completion delay) without new geometry.
    pub fn tick(&mut self, now: TimeMs) -> FrameOutput {
        match (self.disposed, self.tracker.last(), self.geometry) {
            (false, Some(progress), Some(geometry)) => self.run(progress, geometry, now),
            _ => self.snapshot(now),
        }
    }

    /// Current state without running any transition.
    pub fn snapshot(&self, now: TimeMs) -> FrameOutput {
        let progress = self.tracker.last().unwrap_or_default();
        FrameOutput {
            time: now,
            progress,
            stage: self.stages.stage(),
            flags: self.stages.flags(),
            changes: Vec::new(),
            reveal_signal: None,
            background: self.config.background.sample(progress.value),
            text_color: self.config.text.sample(progress.value),
            unit_opacity: self.stages.reveal().opacities().to_vec(),
            offset_px: self.offset_px,
            effects: Vec::new(),
            next_deadline: self.stages.next_deadline(),
        }
    }

    fn run(&mut self, progress: ScrollProgress, geometry: ScrollGeometry, now: TimeMs) -> FrameOutput {
        let p = progress.value;
        let report = self.stages.update(progress, now);

        let background = self.config.background.sample(p);
        let text_color = self.config.text.sample(p);
        self.offset_px = self.sync.sync(p, geometry.viewport_height);

        let effects = self
            .lock
            .evaluate(p, self.stages.is_complete(), &geometry)
            .into_iter()
            .collect();

        FrameOutput {
            time: now,
            progress,
            stage: self.stages.stage(),
            flags: self.stages.flags(),
            changes: report.changes,
            reveal_signal: report.signal,
            background,
            text_color,
            unit_opacity: self.stages.reveal().opacities().to_vec(),
            offset_px: self.offset_px,
            effects,
            next_deadline: self.stages.next_deadline(),
        }
    }

    /// Tear down: flags and reveal reset, timers and latches cleared, layer offset
    /// written back to zero. Idempotent; also runs on drop.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.stages.reset();
        self.lock.reset();
        self.tracker.reset();
        self.pending = None;
        self.geometry = None;
        self.sync.reset();
        self.offset_px = 0.0;
        self.disposed = true;
        tracing::debug!("narrative track disposed");
    }
}

impl<L: VisualLayer> Drop for NarrativeTrack<L> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/track/engine.rs"]
mod tests;
