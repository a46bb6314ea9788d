//! The narrative stage machine.
//!
//! Stages form a strict chain; [`transition`] is the whole rule set and is pure, so
//! every legal move can be checked without a reveal or a clock. [`StageController`]
//! feeds it inputs each frame and performs the side effects attached to edges
//! (starting or reversing the character reveal, arming the completion delay).

use crate::{
    animation::{
        progress::ScrollProgress,
        reveal::{CharacterReveal, RevealDirection, RevealSignal},
    },
    foundation::core::TimeMs,
    track::config::Thresholds,
};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
)]
pub enum Stage {
    #[default]
    Idle,
    Stage1Active,
    Stage1Done,
    Stage2Pending,
    Stage2Active,
    GradientOn,
    BottomOn,
    Complete,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Stage::Idle,
        Stage::Stage1Active,
        Stage::Stage1Done,
        Stage::Stage2Pending,
        Stage::Stage2Active,
        Stage::GradientOn,
        Stage::BottomOn,
        Stage::Complete,
    ];

    pub fn next(self) -> Option<Stage> {
        Self::ALL.get(self as usize + 1).copied()
    }

    pub fn prev(self) -> Option<Stage> {
        (self as usize).checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn flags(self) -> StageFlags {
        StageFlags {
            stage1_started: self >= Stage::Stage1Active,
            stage1_complete: self >= Stage::Stage1Done,
            stage2_threshold_reached: self >= Stage::Stage2Pending,
            stage2_started: self >= Stage::Stage2Active,
            gradient_started: self >= Stage::GradientOn,
            bottom_revealed: self >= Stage::BottomOn,
            all_complete: self >= Stage::Complete,
        }
    }
}

/// Named stage flags, in dependency order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageFlags {
    pub stage1_started: bool,
    pub stage1_complete: bool,
    pub stage2_threshold_reached: bool,
    pub stage2_started: bool,
    pub gradient_started: bool,
    pub bottom_revealed: bool,
    pub all_complete: bool,
}

impl StageFlags {
    pub fn to_array(self) -> [bool; 7] {
        [
            self.stage1_started,
            self.stage1_complete,
            self.stage2_threshold_reached,
            self.stage2_started,
            self.gradient_started,
            self.bottom_revealed,
            self.all_complete,
        ]
    }

    /// No flag is set while an earlier one is clear.
    pub fn is_ordered(self) -> bool {
        self.to_array().windows(2).all(|w| w[0] || !w[1])
    }
}

/// Everything [`transition`] looks at for one evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageInputs {
    pub progress: f64,
    /// Every stage-1 unit is visible (completion signal or re-check).
    pub stage1_content_ready: bool,
    /// `progress > stage2Start`, tracked regardless of stage 1.
    pub stage2_latched: bool,
    /// The delay armed when entering [`Stage::BottomOn`] has elapsed.
    pub completion_elapsed: bool,
}

/// One step of the machine, or `None` when `stage` is stable for `inputs`.
///
/// Retreats win over advances, so falling below a stage's entry threshold always
/// unwinds it first.
pub fn transition(stage: Stage, inputs: &StageInputs, t: &Thresholds) -> Option<Stage> {
    let p = inputs.progress;
    let retreat = match stage {
        Stage::Idle => false,
        Stage::Stage1Active | Stage::Stage1Done => p <= t.stage1_start,
        Stage::Stage2Pending | Stage::Stage2Active => !inputs.stage2_latched,
        Stage::GradientOn => p <= t.gradient_active,
        Stage::BottomOn | Stage::Complete => p <= t.bottom_reveal,
    };
    if retreat {
        return stage.prev();
    }

    let advance = match stage {
        Stage::Idle => p > t.stage1_start,
        Stage::Stage1Active => inputs.stage1_content_ready,
        Stage::Stage1Done => inputs.stage2_latched,
        Stage::Stage2Pending => true,
        Stage::Stage2Active => p > t.gradient_active,
        Stage::GradientOn => p > t.bottom_reveal,
        Stage::BottomOn => inputs.completion_elapsed,
        Stage::Complete => false,
    };
    if advance { stage.next() } else { None }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct StageChange {
    pub from: Stage,
    pub to: Stage,
}

/// What one [`StageController::update`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StageReport {
    pub changes: Vec<StageChange>,
    pub signal: Option<RevealSignal>,
}

#[derive(Clone, Debug)]
pub struct StageController {
    thresholds: Thresholds,
    completion_delay_ms: u64,
    stage: Stage,
    stage2_latched: bool,
    completion_due: Option<TimeMs>,
    reveal: CharacterReveal,
}

impl StageController {
    pub fn new(thresholds: Thresholds, completion_delay_ms: u64, reveal: CharacterReveal) -> Self {
        Self {
            thresholds,
            completion_delay_ms,
            stage: Stage::Idle,
            stage2_latched: false,
            completion_due: None,
            reveal,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn flags(&self) -> StageFlags {
        self.stage.flags()
    }

    pub fn stage2_latched(&self) -> bool {
        self.stage2_latched
    }

    pub fn reveal(&self) -> &CharacterReveal {
        &self.reveal
    }

    pub fn is_complete(&self) -> bool {
        self.stage == Stage::Complete
    }

    /// Earliest pending timer: a running reveal or the completion delay.
    pub fn next_deadline(&self) -> Option<TimeMs> {
        match (self.reveal.deadline(), self.completion_due) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn update(&mut self, progress: ScrollProgress, now: TimeMs) -> StageReport {
        let mut report = StageReport {
            changes: Vec::new(),
            signal: self.reveal.tick(now),
        };
        self.stage2_latched = progress.value > self.thresholds.stage2_start;

        // Walks are monotone within a frame: at most seven steps, then a settled check.
        for _ in 0..Stage::ALL.len() {
            let inputs = StageInputs {
                progress: progress.value,
                stage1_content_ready: report.signal == Some(RevealSignal::Shown)
                    || self.reveal.all_visible(),
                stage2_latched: self.stage2_latched,
                completion_elapsed: self.completion_due.is_some_and(|due| now >= due),
            };
            let Some(next) = transition(self.stage, &inputs, &self.thresholds) else {
                return report;
            };

            tracing::debug!(from = ?self.stage, to = ?next, progress = progress.value, "stage transition");
            let from = self.stage;
            self.stage = next;
            if let Some(signal) = self.on_edge(from, next, progress, now) {
                report.signal = Some(signal);
            }
            report.changes.push(StageChange { from, to: next });
        }

        tracing::warn!(stage = ?self.stage, "stage machine did not settle within one frame");
        report
    }

    fn on_edge(
        &mut self,
        from: Stage,
        to: Stage,
        progress: ScrollProgress,
        now: TimeMs,
    ) -> Option<RevealSignal> {
        match (from, to) {
            (Stage::Idle, Stage::Stage1Active) => {
                self.reveal.activate(RevealDirection::Forward, now);
                self.reveal.tick(now)
            }
            (Stage::Stage1Active, Stage::Idle) => {
                if progress.increasing {
                    self.reveal.hide_now();
                    None
                } else {
                    self.reveal.activate(RevealDirection::Reverse, now);
                    self.reveal.tick(now)
                }
            }
            (Stage::GradientOn, Stage::BottomOn) => {
                self.completion_due = Some(now.saturating_add(self.completion_delay_ms));
                None
            }
            (Stage::BottomOn, _) | (Stage::Complete, _) => {
                self.completion_due = None;
                None
            }
            _ => None,
        }
    }

    /// Back to [`Stage::Idle`] with every unit hidden and no timer pending.
    pub fn reset(&mut self) {
        self.stage = Stage::Idle;
        self.stage2_latched = false;
        self.completion_due = None;
        self.reveal.hide_now();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/track/stage.rs"]
mod tests;
