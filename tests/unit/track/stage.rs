use super::*;
use crate::animation::reveal::schedule;

fn inputs(progress: f64) -> StageInputs {
    StageInputs {
        progress,
        stage1_content_ready: false,
        stage2_latched: progress > Thresholds::default().stage2_start,
        completion_elapsed: false,
    }
}

fn controller(text: &str) -> StageController {
    StageController::new(
        Thresholds::default(),
        500,
        CharacterReveal::new(schedule(text, 20), 0),
    )
}

fn up(value: f64) -> ScrollProgress {
    ScrollProgress {
        value,
        increasing: true,
    }
}

fn down(value: f64) -> ScrollProgress {
    ScrollProgress {
        value,
        increasing: false,
    }
}

#[test]
fn every_stage_has_ordered_flags() {
    for stage in Stage::ALL {
        assert!(stage.flags().is_ordered(), "{stage:?}");
    }
    assert_eq!(Stage::Idle.flags(), StageFlags::default());
    assert!(Stage::Complete.flags().to_array().iter().all(|&f| f));
    assert!(!StageFlags {
        stage2_started: true,
        ..StageFlags::default()
    }
    .is_ordered());
}

#[test]
fn next_and_prev_walk_the_chain() {
    assert_eq!(Stage::Idle.prev(), None);
    assert_eq!(Stage::Complete.next(), None);
    assert_eq!(Stage::Stage1Done.next(), Some(Stage::Stage2Pending));
    assert_eq!(Stage::Stage2Pending.prev(), Some(Stage::Stage1Done));
}

#[test]
fn idle_enters_stage1_strictly_above_threshold() {
    let t = Thresholds::default();
    assert_eq!(transition(Stage::Idle, &inputs(0.30), &t), None);
    assert_eq!(
        transition(Stage::Idle, &inputs(0.31), &t),
        Some(Stage::Stage1Active)
    );
}

#[test]
fn stage1_completes_on_content_not_geometry() {
    let t = Thresholds::default();
    assert_eq!(transition(Stage::Stage1Active, &inputs(0.99), &t), None);
    let ready = StageInputs {
        stage1_content_ready: true,
        ..inputs(0.31)
    };
    assert_eq!(
        transition(Stage::Stage1Active, &ready, &t),
        Some(Stage::Stage1Done)
    );
}

#[test]
fn stage2_waits_for_latch_after_stage1() {
    let t = Thresholds::default();
    assert_eq!(transition(Stage::Stage1Done, &inputs(0.45), &t), None);
    assert_eq!(
        transition(Stage::Stage1Done, &inputs(0.55), &t),
        Some(Stage::Stage2Pending)
    );
    assert_eq!(
        transition(Stage::Stage2Pending, &inputs(0.55), &t),
        Some(Stage::Stage2Active)
    );
}

#[test]
fn bottom_reveal_requires_gradient_and_completion_requires_delay() {
    let t = Thresholds::default();
    assert_eq!(
        transition(Stage::Stage2Active, &inputs(0.9), &t),
        Some(Stage::GradientOn)
    );
    assert_eq!(
        transition(Stage::GradientOn, &inputs(0.9), &t),
        Some(Stage::BottomOn)
    );
    assert_eq!(transition(Stage::BottomOn, &inputs(1.0), &t), None);
    let elapsed = StageInputs {
        completion_elapsed: true,
        ..inputs(1.0)
    };
    assert_eq!(
        transition(Stage::BottomOn, &elapsed, &t),
        Some(Stage::Complete)
    );
    assert_eq!(transition(Stage::Complete, &elapsed, &t), None);
}

#[test]
fn retreat_wins_over_advance() {
    let t = Thresholds::default();
    let ready_but_below = StageInputs {
        stage1_content_ready: true,
        ..inputs(0.1)
    };
    assert_eq!(
        transition(Stage::Stage1Active, &ready_but_below, &t),
        Some(Stage::Idle)
    );
    assert_eq!(
        transition(Stage::Complete, &inputs(0.85), &t),
        Some(Stage::BottomOn)
    );
    assert_eq!(
        transition(Stage::Stage2Active, &inputs(0.5), &t),
        Some(Stage::Stage2Pending)
    );
}

#[test]
fn fast_scroll_starts_stage2_when_stage1_content_finishes() {
    let mut c = controller("abc");
    let report = c.update(up(0.6), TimeMs(0));
    assert_eq!(c.stage(), Stage::Stage1Active);
    assert!(c.stage2_latched());
    assert_eq!(report.changes.len(), 1);
    assert_eq!(c.next_deadline(), Some(TimeMs(40)));

    c.update(up(0.6), TimeMs(39));
    assert_eq!(c.stage(), Stage::Stage1Active);

    let report = c.update(up(0.6), TimeMs(40));
    assert_eq!(report.signal, Some(RevealSignal::Shown));
    assert_eq!(c.stage(), Stage::Stage2Active);
}

#[test]
fn stage1_done_waits_for_threshold_when_content_is_first() {
    let mut c = controller("abc");
    c.update(up(0.35), TimeMs(0));
    c.update(up(0.35), TimeMs(100));
    assert_eq!(c.stage(), Stage::Stage1Done);
    assert!(!c.flags().stage2_threshold_reached);

    c.update(up(0.51), TimeMs(120));
    assert_eq!(c.stage(), Stage::Stage2Active);
}

#[test]
fn completion_fires_after_the_delay() {
    let mut c = controller("");
    c.update(up(0.9), TimeMs(1000));
    assert_eq!(c.stage(), Stage::BottomOn);
    assert!(!c.is_complete());
    assert_eq!(c.next_deadline(), Some(TimeMs(1500)));

    c.update(up(0.9), TimeMs(1499));
    assert_eq!(c.stage(), Stage::BottomOn);
    c.update(up(0.9), TimeMs(1500));
    assert!(c.is_complete());
    assert_eq!(c.next_deadline(), None);
}

#[test]
fn leaving_bottom_cancels_the_completion_delay() {
    let mut c = controller("");
    c.update(up(0.9), TimeMs(0));
    c.update(down(0.8), TimeMs(100));
    assert_eq!(c.stage(), Stage::GradientOn);
    assert_eq!(c.next_deadline(), None);
    c.update(up(0.8), TimeMs(10_000));
    assert_eq!(c.stage(), Stage::GradientOn);
}

#[test]
fn dropping_to_zero_unwinds_in_reverse_order() {
    let mut c = controller("ab");
    c.update(up(1.0), TimeMs(0));
    c.update(up(1.0), TimeMs(20));
    c.update(up(1.0), TimeMs(600));
    assert!(c.is_complete());

    let report = c.update(down(0.0), TimeMs(1000));
    let path: Vec<Stage> = report.changes.iter().map(|ch| ch.to).collect();
    assert_eq!(
        path,
        vec![
            Stage::BottomOn,
            Stage::GradientOn,
            Stage::Stage2Active,
            Stage::Stage2Pending,
            Stage::Stage1Done,
            Stage::Stage1Active,
            Stage::Idle,
        ]
    );
    assert_eq!(c.reveal().direction(), Some(RevealDirection::Reverse));
    assert!(c.reveal().units()[0].visible);
    assert!(!c.reveal().units()[1].visible);

    c.update(down(0.0), TimeMs(1020));
    assert!(c.reveal().all_hidden());
    assert_eq!(c.flags(), StageFlags::default());
}

#[test]
fn rescrolling_during_reverse_reveal_resumes_forward() {
    let mut c = StageController::new(
        Thresholds::default(),
        500,
        CharacterReveal::new(schedule("abcd", 20), 100),
    );
    c.update(up(0.4), TimeMs(0));
    c.update(up(0.4), TimeMs(160));
    assert_eq!(c.stage(), Stage::Stage1Done);

    c.update(down(0.2), TimeMs(200));
    assert_eq!(c.stage(), Stage::Idle);
    assert_eq!(c.reveal().direction(), Some(RevealDirection::Reverse));
    assert!(c.reveal().all_visible());

    // Nothing has faded out yet, so stage 1 re-completes without waiting.
    let report = c.update(up(0.4), TimeMs(200));
    assert_eq!(c.stage(), Stage::Stage1Done);
    assert_eq!(report.changes.len(), 2);
    assert_eq!(report.signal, Some(RevealSignal::Shown));
}

#[test]
fn rescrolling_mid_fade_waits_for_stage1_to_fully_reappear() {
    let mut c = StageController::new(
        Thresholds::default(),
        500,
        CharacterReveal::new(schedule("abcd", 20), 100),
    );
    c.update(up(0.4), TimeMs(0));
    c.update(up(0.4), TimeMs(160));
    assert_eq!(c.stage(), Stage::Stage1Done);

    c.update(down(0.2), TimeMs(200));
    assert_eq!(c.stage(), Stage::Idle);

    // Units are partly faded out; crossing stage 2 must not skip the re-reveal.
    c.update(up(0.6), TimeMs(290));
    assert_eq!(c.stage(), Stage::Stage1Active);
    assert!(c.stage2_latched());
    assert!(!c.flags().stage2_started);
    assert!(!c.reveal().all_visible());
    assert!(c.reveal().opacities()[3] < 0.5);
    assert_eq!(c.next_deadline(), Some(TimeMs(450)));

    c.update(up(0.6), TimeMs(449));
    assert_eq!(c.stage(), Stage::Stage1Active);

    let report = c.update(up(0.6), TimeMs(450));
    assert_eq!(report.signal, Some(RevealSignal::Shown));
    assert_eq!(c.stage(), Stage::Stage2Active);
}

#[test]
fn reset_clears_everything() {
    let mut c = controller("ab");
    c.update(up(0.9), TimeMs(0));
    c.reset();
    assert_eq!(c.stage(), Stage::Idle);
    assert!(!c.stage2_latched());
    assert!(c.reveal().all_hidden());
    assert_eq!(c.next_deadline(), None);
}
