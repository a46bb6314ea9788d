//! Per-character reveal timing.
//!
//! A text is split into [`CharacterUnit`]s (one per `char`, whitespace included) that
//! are grouped into [`WordCluster`]s: a run of non-space characters plus the spaces that
//! follow it. Clusters are what a renderer keeps on one line; timing only looks at unit
//! indices.
//!
//! Forward activation reveals unit `i` after `i * stagger`. Reverse activation hides
//! unit `i` after `(N - 1 - i) * stagger`, the mirror image of the forward schedule, so
//! scrolling back undoes scrolling forward at the same rate.

use crate::foundation::{core::TimeMs, math::clamp01};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CharacterUnit {
    pub index: usize,
    pub ch: char,
    pub forward_delay_ms: u64,
    pub reverse_delay_ms: u64,
    /// Fully revealed: set when opacity reaches 1, cleared as soon as a hide ramp lowers it.
    pub visible: bool,
}

/// Unit index range `[start, end)` that must not be split across a line wrap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct WordCluster {
    pub start: usize,
    pub end: usize,
}

impl WordCluster {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RevealSchedule {
    pub stagger_ms: u64,
    pub units: Vec<CharacterUnit>,
    pub clusters: Vec<WordCluster>,
}

impl RevealSchedule {
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Delay of the last unit to start in either direction.
    pub fn span_ms(&self) -> u64 {
        (self.units.len().saturating_sub(1) as u64).saturating_mul(self.stagger_ms)
    }

    /// Text of each cluster, in order.
    pub fn cluster_text(&self) -> Vec<String> {
        self.clusters
            .iter()
            .map(|c| self.units[c.start..c.end].iter().map(|u| u.ch).collect())
            .collect()
    }
}

pub fn schedule(text: &str, stagger_ms: u64) -> RevealSchedule {
    let chars: Vec<char> = text.chars().collect();
    let n = chars.len();

    let units = chars
        .iter()
        .enumerate()
        .map(|(index, &ch)| CharacterUnit {
            index,
            ch,
            forward_delay_ms: (index as u64).saturating_mul(stagger_ms),
            reverse_delay_ms: ((n - 1 - index) as u64).saturating_mul(stagger_ms),
            visible: false,
        })
        .collect();

    let mut clusters = Vec::new();
    let mut start = 0;
    for i in 1..n {
        if chars[i - 1].is_whitespace() && !chars[i].is_whitespace() {
            clusters.push(WordCluster { start, end: i });
            start = i;
        }
    }
    if n > 0 {
        clusters.push(WordCluster { start, end: n });
    }

    RevealSchedule {
        stagger_ms,
        units,
        clusters,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum RevealDirection {
    Forward,
    Reverse,
}

/// Content-completion signal, emitted once when every unit reaches its terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum RevealSignal {
    Shown,
    Hidden,
}

#[derive(Clone, Debug)]
enum Phase {
    Hidden,
    Shown,
    Running {
        direction: RevealDirection,
        started_at: TimeMs,
        from: Vec<f64>,
    },
}

/// Runtime state of one scheduled text: per-unit opacity and visibility.
#[derive(Clone, Debug)]
pub struct CharacterReveal {
    schedule: RevealSchedule,
    fade_ms: u64,
    opacity: Vec<f64>,
    phase: Phase,
}

impl CharacterReveal {
    pub fn new(schedule: RevealSchedule, fade_ms: u64) -> Self {
        let n = schedule.len();
        Self {
            schedule,
            fade_ms,
            opacity: vec![0.0; n],
            phase: Phase::Hidden,
        }
    }

    pub fn units(&self) -> &[CharacterUnit] {
        &self.schedule.units
    }

    pub fn schedule(&self) -> &RevealSchedule {
        &self.schedule
    }

    pub fn opacities(&self) -> &[f64] {
        &self.opacity
    }

    pub fn all_visible(&self) -> bool {
        self.schedule.units.iter().all(|u| u.visible)
    }

    pub fn all_hidden(&self) -> bool {
        self.schedule.units.iter().all(|u| !u.visible) && self.opacity.iter().all(|&o| o == 0.0)
    }

    pub fn direction(&self) -> Option<RevealDirection> {
        match &self.phase {
            Phase::Running { direction, .. } => Some(*direction),
            Phase::Hidden | Phase::Shown => None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.direction().is_some()
    }

    /// Time at which a running animation reaches its terminal state.
    pub fn deadline(&self) -> Option<TimeMs> {
        match &self.phase {
            Phase::Running { started_at, .. } => Some(
                started_at
                    .saturating_add(self.schedule.span_ms())
                    .saturating_add(self.fade_ms),
            ),
            Phase::Hidden | Phase::Shown => None,
        }
    }

    /// Start animating toward `direction`, continuing from the current opacities.
    ///
    /// Re-activating the direction already running, or already reached, is a no-op.
    pub fn activate(&mut self, direction: RevealDirection, now: TimeMs) {
        match (&self.phase, direction) {
            (Phase::Shown, RevealDirection::Forward) | (Phase::Hidden, RevealDirection::Reverse) => {
                return;
            }
            (Phase::Running { direction: d, .. }, _) if *d == direction => return,
            _ => {}
        }
        self.phase = Phase::Running {
            direction,
            started_at: now,
            from: self.opacity.clone(),
        };
    }

    /// Drop every unit to hidden immediately, cancelling any running animation.
    pub fn hide_now(&mut self) {
        self.opacity.iter_mut().for_each(|o| *o = 0.0);
        self.schedule.units.iter_mut().for_each(|u| u.visible = false);
        self.phase = Phase::Hidden;
    }

    /// Advance to `now`; returns the completion signal on the tick that reaches it.
    pub fn tick(&mut self, now: TimeMs) -> Option<RevealSignal> {
        let Phase::Running {
            direction,
            started_at,
            from,
        } = &self.phase
        else {
            return None;
        };
        let direction = *direction;
        let elapsed = now.elapsed_since(*started_at);

        for (unit, (opacity, &start_opacity)) in self
            .schedule
            .units
            .iter_mut()
            .zip(self.opacity.iter_mut().zip(from.iter()))
        {
            match direction {
                RevealDirection::Forward => {
                    let t = ramp(elapsed, unit.forward_delay_ms, self.fade_ms);
                    *opacity = start_opacity.max(t);
                    unit.visible = unit.visible || *opacity >= 1.0;
                }
                RevealDirection::Reverse => {
                    let t = ramp(elapsed, unit.reverse_delay_ms, self.fade_ms);
                    *opacity = start_opacity.min(1.0 - t);
                    unit.visible = unit.visible && *opacity >= 1.0;
                }
            }
        }

        match direction {
            RevealDirection::Forward if self.opacity.iter().all(|&o| o >= 1.0) => {
                self.phase = Phase::Shown;
                Some(RevealSignal::Shown)
            }
            RevealDirection::Reverse if self.opacity.iter().all(|&o| o <= 0.0) => {
                self.phase = Phase::Hidden;
                Some(RevealSignal::Hidden)
            }
            _ => None,
        }
    }
}

fn ramp(elapsed: u64, delay: u64, fade_ms: u64) -> f64 {
    if elapsed < delay {
        return 0.0;
    }
    if fade_ms == 0 {
        return 1.0;
    }
    clamp01((elapsed - delay) as f64 / fade_ms as f64)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/reveal.rs"]
mod tests;
