use crate::foundation::{
    core::Rgb8,
    error::{NarrativeError, NarrativeResult},
    math::{Lerp, inverse_lerp01},
};

/// Linear blend from `from` to `to` while progress runs over `[start, end]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorBand {
    pub start: f64,
    pub end: f64,
    pub from: Rgb8,
    pub to: Rgb8,
}

impl ColorBand {
    pub fn new(start: f64, end: f64, from: Rgb8, to: Rgb8) -> Self {
        Self {
            start,
            end,
            from,
            to,
        }
    }

    pub fn validate(&self) -> NarrativeResult<()> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(NarrativeError::validation("ColorBand bounds must be finite"));
        }
        if self.start > self.end {
            return Err(NarrativeError::validation("ColorBand start must be <= end"));
        }
        Ok(())
    }
}

/// Color of `band` at `progress`: `from` before the band, `to` after it, linear inside.
pub fn interpolate(progress: f64, band: &ColorBand) -> Rgb8 {
    if progress <= band.start {
        return band.from;
    }
    if progress >= band.end {
        return band.to;
    }
    let t = inverse_lerp01(band.start, band.end, progress);
    Rgb8::lerp(&band.from, &band.to, t)
}

/// Ordered bands driving one color channel (background, text, ...).
///
/// The last band that has started owns the color; before the first band the first
/// band's `from` color applies.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ColorTrack {
    bands: Vec<ColorBand>,
}

impl ColorTrack {
    pub fn new(bands: Vec<ColorBand>) -> NarrativeResult<Self> {
        let track = Self { bands };
        track.validate()?;
        Ok(track)
    }

    pub fn single(band: ColorBand) -> Self {
        Self { bands: vec![band] }
    }

    pub fn validate(&self) -> NarrativeResult<()> {
        if self.bands.is_empty() {
            return Err(NarrativeError::validation(
                "ColorTrack must have at least one band",
            ));
        }
        for band in &self.bands {
            band.validate()?;
        }
        if !self.bands.windows(2).all(|w| w[0].start <= w[1].start) {
            return Err(NarrativeError::validation(
                "ColorTrack bands must be sorted by start",
            ));
        }
        Ok(())
    }

    pub fn bands(&self) -> &[ColorBand] {
        &self.bands
    }

    pub fn sample(&self, progress: f64) -> Rgb8 {
        let idx = self.bands.partition_point(|b| b.start <= progress);
        match idx.checked_sub(1).and_then(|i| self.bands.get(i)) {
            Some(band) => interpolate(progress, band),
            None => self.bands.first().map_or(Rgb8::WHITE, |b| b.from),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/color.rs"]
mod tests;
