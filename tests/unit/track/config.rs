use super::*;
use serde_json::json;

#[test]
fn defaults_are_valid_and_ordered() {
    let t = Thresholds::default();
    t.validate().unwrap();
    assert!(t.to_array().windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn empty_config_resolves_to_documented_defaults() {
    let cfg = TrackConfig::from_json_str("{}").unwrap().resolve();
    assert_eq!(cfg.thresholds, Thresholds::default());
    assert_eq!(cfg.stagger_ms, 20);
    assert_eq!(cfg.unit_fade_ms, 0);
    assert_eq!(cfg.completion_delay_ms, 500);
    assert_eq!(cfg.max_shift_ratio, 0.45);
    assert_eq!(cfg.background.sample(0.0), Rgb8::WHITE);
    assert_eq!(cfg.background.sample(1.0), Rgb8::SLATE_900);
    assert_eq!(cfg.text.sample(0.0), Rgb8::SLATE_900);
    assert_eq!(cfg.text.sample(1.0), Rgb8::WHITE);
}

#[test]
fn overrides_are_read_from_camel_case_json() {
    let cfg: TrackConfig = serde_json::from_value(json!({
        "thresholds": { "stage1Start": 0.35, "stage2Start": 0.45 },
        "staggerMs": 35,
        "background": [
            { "start": 0.0, "end": 0.5, "from": "#000000", "to": [255, 0, 0] }
        ]
    }))
    .unwrap();
    let resolved = cfg.resolve();
    assert_eq!(resolved.thresholds.stage1_start, 0.35);
    assert_eq!(resolved.thresholds.stage2_start, 0.45);
    assert_eq!(resolved.thresholds.gradient_active, 0.70);
    assert_eq!(resolved.stagger_ms, 35);
    assert_eq!(resolved.background.sample(0.5), Rgb8::new(255, 0, 0));
}

#[test]
fn non_finite_values_fall_back_to_defaults() {
    let cfg = TrackConfig {
        thresholds: ThresholdOverrides {
            stage2_start: Some(f64::NAN),
            ..ThresholdOverrides::default()
        },
        stagger_ms: Some(f64::INFINITY),
        completion_delay_ms: Some(-3.0),
        max_shift_ratio: Some(f64::NAN),
        ..TrackConfig::default()
    }
    .resolve();
    assert_eq!(cfg.thresholds.stage2_start, 0.50);
    assert_eq!(cfg.stagger_ms, DEFAULT_STAGGER_MS);
    assert_eq!(cfg.completion_delay_ms, DEFAULT_COMPLETION_DELAY_MS);
    assert_eq!(cfg.max_shift_ratio, DEFAULT_MAX_SHIFT_RATIO);
}

#[test]
fn out_of_order_thresholds_are_detected_and_repaired() {
    let raw = Thresholds {
        stage2_start: 0.2,
        ..Thresholds::default()
    };
    assert!(raw.validate().is_err());

    let cfg = TrackConfig {
        thresholds: ThresholdOverrides {
            stage2_start: Some(0.2),
            ..ThresholdOverrides::default()
        },
        ..TrackConfig::default()
    }
    .resolve();
    cfg.thresholds.validate().unwrap();
    assert_eq!(cfg.thresholds.stage2_start, 0.30);
    assert_eq!(cfg.thresholds.gradient_active, 0.70);
}

#[test]
fn scroll_lock_is_moved_above_bottom_reveal() {
    let repaired = Thresholds {
        bottom_reveal: 0.9,
        scroll_lock_threshold: 0.8,
        ..Thresholds::default()
    }
    .repaired();
    assert_eq!(repaired.bottom_reveal, 0.9);
    assert!((repaired.scroll_lock_threshold - 0.95).abs() < 1e-12);
    repaired.validate().unwrap();
}

#[test]
fn invalid_color_bands_fall_back() {
    let cfg = TrackConfig {
        text: Some(vec![]),
        ..TrackConfig::default()
    }
    .resolve();
    assert_eq!(cfg.text.bands().len(), 1);
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = TrackConfig::from_json_str("{ \"staggerMs\": \"fast\" }").unwrap_err();
    assert!(matches!(err, NarrativeError::Serde(_)));
}
