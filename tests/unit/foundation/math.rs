use super::*;

#[test]
fn rgb_lerp_hits_endpoints_exactly() {
    let a = Rgb8::new(255, 255, 255);
    let b = Rgb8::new(15, 23, 42);
    assert_eq!(Rgb8::lerp(&a, &b, 0.0), a);
    assert_eq!(Rgb8::lerp(&a, &b, 1.0), b);
    assert_eq!(Rgb8::lerp(&a, &b, 0.5), Rgb8::new(135, 139, 149));
}

#[test]
fn clamp01_handles_nan_and_out_of_range() {
    assert_eq!(clamp01(f64::NAN), 0.0);
    assert_eq!(clamp01(-3.0), 0.0);
    assert_eq!(clamp01(7.0), 1.0);
    assert_eq!(clamp01(0.25), 0.25);
}

#[test]
fn inverse_lerp_degenerate_span_is_a_step() {
    assert_eq!(inverse_lerp01(0.5, 0.5, 0.49), 0.0);
    assert_eq!(inverse_lerp01(0.5, 0.5, 0.5), 1.0);
    assert_eq!(inverse_lerp01(0.25, 0.75, 0.5), 0.5);
    assert_eq!(inverse_lerp01(0.2, 0.4, 0.9), 1.0);
}
