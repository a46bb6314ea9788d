use std::io::Read;

use crate::{
    animation::color::{ColorBand, ColorTrack},
    foundation::{
        core::Rgb8,
        error::{NarrativeError, NarrativeResult},
    },
};

/// Named progress breakpoints, non-decreasing in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    pub bg_transition_start: f64,
    pub bg_transition_end: f64,
    pub stage1_start: f64,
    pub stage2_start: f64,
    pub gradient_active: f64,
    pub bottom_reveal: f64,
    /// Must lie strictly between `bottom_reveal` and 1.
    pub scroll_lock_threshold: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            bg_transition_start: 0.05,
            bg_transition_end: 0.25,
            stage1_start: 0.30,
            stage2_start: 0.50,
            gradient_active: 0.70,
            bottom_reveal: 0.85,
            scroll_lock_threshold: 0.95,
        }
    }
}

impl Thresholds {
    pub const NAMES: [&'static str; 7] = [
        "bgTransitionStart",
        "bgTransitionEnd",
        "stage1Start",
        "stage2Start",
        "gradientActive",
        "bottomReveal",
        "scrollLockThreshold",
    ];

    pub fn to_array(self) -> [f64; 7] {
        [
            self.bg_transition_start,
            self.bg_transition_end,
            self.stage1_start,
            self.stage2_start,
            self.gradient_active,
            self.bottom_reveal,
            self.scroll_lock_threshold,
        ]
    }

    pub fn from_array(v: [f64; 7]) -> Self {
        Self {
            bg_transition_start: v[0],
            bg_transition_end: v[1],
            stage1_start: v[2],
            stage2_start: v[3],
            gradient_active: v[4],
            bottom_reveal: v[5],
            scroll_lock_threshold: v[6],
        }
    }

    pub fn validate(&self) -> NarrativeResult<()> {
        let values = self.to_array();
        for (name, v) in Self::NAMES.iter().zip(values) {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(NarrativeError::validation(format!(
                    "threshold {name} must be a finite value in [0, 1], got {v}"
                )));
            }
        }
        for (i, w) in values.windows(2).enumerate() {
            if w[0] > w[1] {
                return Err(NarrativeError::validation(format!(
                    "threshold {} ({}) must be <= {} ({})",
                    Self::NAMES[i],
                    w[0],
                    Self::NAMES[i + 1],
                    w[1]
                )));
            }
        }
        if !(self.scroll_lock_threshold > self.bottom_reveal && self.scroll_lock_threshold < 1.0) {
            return Err(NarrativeError::validation(
                "scrollLockThreshold must lie strictly between bottomReveal and 1",
            ));
        }
        Ok(())
    }

    /// Best-effort repair: clamp into `[0, 1]`, raise each value to at least its
    /// predecessor, then move the scroll-lock threshold between `bottomReveal` and 1.
    pub fn repaired(self) -> Self {
        let mut values = self.to_array().map(|v| v.clamp(0.0, 1.0));
        for i in 1..values.len() {
            values[i] = values[i].max(values[i - 1]);
        }
        let mut out = Self::from_array(values);
        if !(out.scroll_lock_threshold > out.bottom_reveal && out.scroll_lock_threshold < 1.0) {
            out.scroll_lock_threshold = if out.bottom_reveal < 1.0 {
                (out.bottom_reveal + 1.0) / 2.0
            } else {
                1.0
            };
        }
        out
    }
}

/// Optional per-threshold overrides as they appear in configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThresholdOverrides {
    pub bg_transition_start: Option<f64>,
    pub bg_transition_end: Option<f64>,
    pub stage1_start: Option<f64>,
    pub stage2_start: Option<f64>,
    pub gradient_active: Option<f64>,
    pub bottom_reveal: Option<f64>,
    pub scroll_lock_threshold: Option<f64>,
}

impl ThresholdOverrides {
    fn to_array(self) -> [Option<f64>; 7] {
        [
            self.bg_transition_start,
            self.bg_transition_end,
            self.stage1_start,
            self.stage2_start,
            self.gradient_active,
            self.bottom_reveal,
            self.scroll_lock_threshold,
        ]
    }
}

/// Host-facing configuration surface. Every field may be omitted.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackConfig {
    pub thresholds: ThresholdOverrides,
    pub stagger_ms: Option<f64>,
    pub unit_fade_ms: Option<f64>,
    pub completion_delay_ms: Option<f64>,
    pub max_shift_ratio: Option<f64>,
    pub background: Option<Vec<ColorBand>>,
    pub text: Option<Vec<ColorBand>>,
}

pub const DEFAULT_STAGGER_MS: u64 = 20;
pub const DEFAULT_UNIT_FADE_MS: u64 = 0;
pub const DEFAULT_COMPLETION_DELAY_MS: u64 = 500;
pub const DEFAULT_MAX_SHIFT_RATIO: f64 = 0.45;

/// Configuration with every fallback applied and every invariant restored.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub thresholds: Thresholds,
    pub stagger_ms: u64,
    pub unit_fade_ms: u64,
    pub completion_delay_ms: u64,
    pub max_shift_ratio: f64,
    pub background: ColorTrack,
    pub text: ColorTrack,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        TrackConfig::default().resolve()
    }
}

impl TrackConfig {
    pub fn from_json_str(s: &str) -> NarrativeResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> NarrativeResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Apply documented fallbacks. Never fails; problems are logged once here.
    #[tracing::instrument(skip(self))]
    pub fn resolve(&self) -> ResolvedConfig {
        let defaults = Thresholds::default().to_array();
        let mut values = defaults;
        for (i, value) in self.thresholds.to_array().into_iter().enumerate() {
            match value {
                Some(v) if v.is_finite() => values[i] = v,
                Some(v) => tracing::warn!(
                    threshold = Thresholds::NAMES[i],
                    value = v,
                    fallback = defaults[i],
                    "non-finite threshold, using default"
                ),
                None => {}
            }
        }

        let mut thresholds = Thresholds::from_array(values);
        if let Err(err) = thresholds.validate() {
            let repaired = thresholds.repaired();
            tracing::warn!(
                error = %err,
                ?repaired,
                "thresholds out of order, falling back to best-effort ordering"
            );
            thresholds = repaired;
        }

        let background = resolve_track(
            "background",
            self.background.as_deref(),
            ColorBand::new(
                thresholds.bg_transition_start,
                thresholds.bg_transition_end,
                Rgb8::WHITE,
                Rgb8::SLATE_900,
            ),
        );
        let text = resolve_track(
            "text",
            self.text.as_deref(),
            ColorBand::new(
                thresholds.bg_transition_start,
                thresholds.stage1_start,
                Rgb8::SLATE_900,
                Rgb8::WHITE,
            ),
        );

        ResolvedConfig {
            thresholds,
            stagger_ms: resolve_ms("staggerMs", self.stagger_ms, DEFAULT_STAGGER_MS),
            unit_fade_ms: resolve_ms("unitFadeMs", self.unit_fade_ms, DEFAULT_UNIT_FADE_MS),
            completion_delay_ms: resolve_ms(
                "completionDelayMs",
                self.completion_delay_ms,
                DEFAULT_COMPLETION_DELAY_MS,
            ),
            max_shift_ratio: match self.max_shift_ratio {
                Some(v) if v.is_finite() && v >= 0.0 => v,
                Some(v) => {
                    tracing::warn!(
                        value = v,
                        fallback = DEFAULT_MAX_SHIFT_RATIO,
                        "invalid maxShiftRatio, using default"
                    );
                    DEFAULT_MAX_SHIFT_RATIO
                }
                None => DEFAULT_MAX_SHIFT_RATIO,
            },
            background,
            text,
        }
    }
}

fn resolve_ms(name: &'static str, value: Option<f64>, fallback: u64) -> u64 {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => v.round() as u64,
        Some(v) => {
            tracing::warn!(setting = name, value = v, fallback, "invalid timing, using default");
            fallback
        }
        None => fallback,
    }
}

fn resolve_track(name: &'static str, bands: Option<&[ColorBand]>, fallback: ColorBand) -> ColorTrack {
    let Some(bands) = bands else {
        return ColorTrack::single(fallback);
    };
    match ColorTrack::new(bands.to_vec()) {
        Ok(track) => track,
        Err(err) => {
            tracing::warn!(track = name, error = %err, "invalid color bands, using default");
            ColorTrack::single(fallback)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/track/config.rs"]
mod tests;
