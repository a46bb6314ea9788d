use crate::foundation::{core::ScrollGeometry, math::clamp01};

/// Normalized scroll position of the tracked region plus scroll direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct ScrollProgress {
    /// Progress in `[0, 1]`.
    pub value: f64,
    /// `value >= previous value`.
    pub increasing: bool,
}

/// `clamp(-top / (region_height - viewport_height), 0, 1)`.
///
/// A region no taller than the viewport has no scroll span; it reads as 1 once its top
/// has passed the viewport's top edge and 0 otherwise.
pub fn region_progress(top: f64, region_height: f64, viewport_height: f64) -> f64 {
    let span = region_height - viewport_height;
    if span.is_nan() || span <= 0.0 {
        return if top < 0.0 { 1.0 } else { 0.0 };
    }
    clamp01(-top / span)
}

/// Turns successive geometry snapshots into [`ScrollProgress`] values.
#[derive(Clone, Debug, Default)]
pub struct ProgressTracker {
    last: Option<ScrollProgress>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` (and keeps the previous reading) when the geometry is unusable.
    pub fn observe(&mut self, geometry: &ScrollGeometry) -> Option<ScrollProgress> {
        if !geometry.is_usable() {
            return None;
        }

        let value = region_progress(
            geometry.top(),
            geometry.region_height(),
            geometry.viewport_height,
        );
        let previous = self.last.map_or(0.0, |p| p.value);
        let progress = ScrollProgress {
            value,
            increasing: value >= previous,
        };
        self.last = Some(progress);
        Some(progress)
    }

    pub fn last(&self) -> Option<ScrollProgress> {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/progress.rs"]
mod tests;
