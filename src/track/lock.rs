use crate::{foundation::core::ScrollGeometry, track::config::Thresholds};

/// Imperative command for the host. The only side effect the pipeline requests.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Effect {
    /// Scroll the document to offset `y`.
    ScrollTo { y: f64 },
}

/// Pulls the viewport back when the user overshoots an unfinished section.
///
/// Fires once per approach: the latch set on firing clears only after progress falls
/// to `bottomReveal` or the section completes. Regions no taller than the viewport
/// have no scroll position to hold, so they never lock.
#[derive(Clone, Debug)]
pub struct ScrollLockGovernor {
    lock_at: f64,
    release_at: f64,
    engaged: bool,
}

impl ScrollLockGovernor {
    pub fn new(thresholds: &Thresholds) -> Self {
        Self {
            lock_at: thresholds.scroll_lock_threshold,
            release_at: thresholds.bottom_reveal,
            engaged: false,
        }
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    pub fn evaluate(
        &mut self,
        progress: f64,
        complete: bool,
        geometry: &ScrollGeometry,
    ) -> Option<Effect> {
        if complete || progress <= self.release_at {
            if self.engaged {
                tracing::debug!(progress, complete, "scroll lock released");
                self.engaged = false;
            }
            return None;
        }
        if self.engaged || progress <= self.lock_at {
            return None;
        }
        // Without a scroll span every lock target maps back to progress 0.
        if geometry.scroll_span() <= 0.0 {
            tracing::trace!(progress, "scroll lock skipped: region fits the viewport");
            return None;
        }

        self.engaged = true;
        let y = geometry.scroll_y_for_progress(self.lock_at);
        tracing::debug!(progress, y, "scroll lock engaged");
        Some(Effect::ScrollTo { y })
    }

    pub fn reset(&mut self) {
        self.engaged = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/track/lock.rs"]
mod tests;
