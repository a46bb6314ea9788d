use crate::foundation::core::Rgb8;

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for Rgb8 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
        }
    }
}

/// Clamp into `[0, 1]`; NaN maps to 0.
pub(crate) fn clamp01(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

/// Position of `x` inside `[start, end]`, clamped to `[0, 1]`.
///
/// A zero-width or inverted span behaves as a step at `end`.
pub(crate) fn inverse_lerp01(start: f64, end: f64, x: f64) -> f64 {
    let span = end - start;
    if span <= 0.0 {
        return if x >= end { 1.0 } else { 0.0 };
    }
    clamp01((x - start) / span)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
