//! Integration Tests
//!
//! End-to-end tests for the glasscut session engine.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use glasscut::config::Config;
use glasscut::render::{render_session, render_to_wav};
use glasscut::scheduler::ManualScheduler;
use glasscut::session::{SessionController, SessionState};

/// Helper to build a seeded session on a hand-fired scheduler
fn seeded_session(config: Config, seed: u64) -> (SessionController, Arc<ManualScheduler>) {
    let scheduler = Arc::new(ManualScheduler::new());
    let controller =
        SessionController::with_rng(config, scheduler.clone(), StdRng::seed_from_u64(seed));
    (controller, scheduler)
}

/// Helper config with the random side effects turned off
fn quiet_config() -> Config {
    let mut config = Config::default();
    config.animation.spark_chance = 0.0;
    config.animation.ambient_chance = 0.0;
    config
}

// === Session Scenario Tests ===

#[test]
fn test_full_session_scenario() {
    // Start, run one second of ticks, check the cut, stop, check the reset
    let (mut controller, scheduler) = seeded_session(Config::default(), 11);

    controller.start().unwrap();
    assert_eq!(controller.state(), SessionState::Running);

    scheduler.fire(20);

    assert_eq!(controller.progress(), 40, "20 ticks of step 2");
    {
        let scene = controller.scene();
        let scene = scene.lock().unwrap();
        assert_eq!(scene.cut_extent(), 80.0, "extent follows progress");
    }
    assert_eq!(
        controller.synth().cut_tones_requested(),
        2,
        "tones at progress 20 and 40"
    );

    controller.stop();
    assert_eq!(controller.state(), SessionState::Stopped);
    assert_eq!(controller.progress(), 0, "stop must reset progress");

    let scene = controller.scene();
    assert_eq!(
        scene.lock().unwrap().cut_extent(),
        40.0,
        "stop must reset the cut line"
    );
}

#[test]
fn test_restart_after_stop_runs_fresh() {
    let (mut controller, scheduler) = seeded_session(quiet_config(), 2);

    controller.start().unwrap();
    scheduler.fire(10);
    assert_eq!(controller.progress(), 20);
    assert_eq!(controller.synth().cut_tones_requested(), 1);

    controller.stop();
    controller.start().unwrap();
    scheduler.fire(10);

    assert_eq!(controller.progress(), 20, "restart must begin at 0");
    assert_eq!(
        controller.synth().cut_tones_requested(),
        2,
        "tone counters span sessions"
    );
}

#[test]
fn test_repeated_transitions_are_idempotent() {
    let (mut controller, scheduler) = seeded_session(quiet_config(), 3);

    controller.start().unwrap();
    controller.start().unwrap();
    scheduler.fire(1);
    assert_eq!(controller.progress(), 2, "double start must not double ticks");

    controller.stop();
    controller.stop();
    assert_eq!(controller.state(), SessionState::Stopped);

    controller.start().unwrap();
    scheduler.fire(1);
    assert_eq!(controller.progress(), 2);
}

#[test]
fn test_config_file_drives_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{ "animation": { "wrap_threshold": 8, "spark_chance": 0.0, "ambient_chance": 0.0 } }"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    let (mut controller, scheduler) = seeded_session(config, 1);

    controller.start().unwrap();
    scheduler.fire(4);

    assert_eq!(
        controller.progress(),
        0,
        "progress wraps at the configured threshold"
    );
    // The cycle 2, 4, 6, 0 never lands on a tone phase
    assert_eq!(controller.synth().cut_tones_requested(), 0);
}

// === Spark Lifetime Tests ===

#[test]
fn test_sparks_outlive_stopped_session() {
    let mut config = Config::default();
    config.animation.spark_chance = 1.0;
    config.animation.ambient_chance = 0.0;
    let (mut controller, scheduler) = seeded_session(config, 5);

    controller.start().unwrap();
    scheduler.fire(3);
    controller.stop();

    let scene = controller.scene();
    {
        let scene = scene.lock().unwrap();
        assert_eq!(scene.sparks().len(), 3, "stop cleared live sparks");
    }

    // A view sweeping past the lifetime clears them with no session running
    let mut scene = scene.lock().unwrap();
    scene
        .sparks_mut()
        .sweep(Instant::now() + Duration::from_millis(1001));
    assert!(
        scene.sparks().is_empty(),
        "sparks failed to expire after stop"
    );
}

#[test]
fn test_intro_flourish_fades_without_session() {
    let (controller, _scheduler) = seeded_session(Config::default(), 8);
    let base = Instant::now();

    controller.schedule_intro(base);

    let scene = controller.scene();
    let mut scene = scene.lock().unwrap();

    // All five promoted by 1.3s after the 500ms delay and 200ms stagger
    scene.sparks_mut().sweep(base + Duration::from_millis(1350));
    assert_eq!(scene.sparks().len(), 5);

    // Each runs a full lifetime from its promotion, then the pane is clear
    scene.sparks_mut().sweep(base + Duration::from_millis(2400));
    assert!(scene.sparks().is_empty());
}

// === Offline Render Tests ===

#[test]
fn test_render_to_wav_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.wav");

    let mut config = Config::default();
    config.volume = 80;
    render_to_wav(&path, &config, 2.0, 7, 8000).unwrap();

    let mut reader = hound::WavReader::open(&path).unwrap();
    assert_eq!(reader.spec().channels, 1);
    assert_eq!(reader.spec().sample_rate, 8000);
    assert_eq!(reader.duration(), 16000);

    let peak = reader
        .samples::<i16>()
        .map(|s| s.unwrap().unsigned_abs())
        .max()
        .unwrap_or(0);
    assert!(peak > 0, "rendered session is silent");
}

#[test]
fn test_render_volume_scales_output() {
    let mut loud_config = Config::default();
    loud_config.volume = 100;
    let mut soft_config = Config::default();
    soft_config.volume = 25;

    let loud = render_session(&loud_config, 3.0, 9, 8000);
    let soft = render_session(&soft_config, 3.0, 9, 8000);

    let peak = |buffer: &[f32]| buffer.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
    assert!(
        peak(&loud) > peak(&soft) * 2.0,
        "volume 100 should render well above volume 25"
    );
}
