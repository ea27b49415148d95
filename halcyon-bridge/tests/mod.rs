use std::time::Duration;

use halcyon_bridge::looper::ChannelLooper;
use halcyon_bridge::script::{ScriptStep, demo_script};
use halcyon_bridge::sensors::{SensorFeed, SimulatedSensors};
use halcyon_bridge::session::{SessionOptions, run_session};
use halcyon_bridge::software::SoftwareBackend;
use halcyon_core::graphics::{ConfigHandle, ConfigRequest, GraphicsBackend, WindowHandle};
use halcyon_core::input::{InputEvent, KeyAction, KeyEvent};
use halcyon_core::{Command, EngineConfig, HostEvent, Looper, PersistableState, PollTimeout};
use halcyon_io::{SensorSample, SensorSubscription};

fn sample(ts: i64) -> SensorSample {
    SensorSample {
        timestamp: ts,
        x: 0.1,
        y: 0.2,
        z: 9.8,
    }
}

// ============================================================================
// ChannelLooper Tests
// ============================================================================

#[test]
fn test_immediate_poll_on_empty_channel() {
    let (_tx, mut looper) = ChannelLooper::channel(4);
    assert_eq!(looper.poll(PollTimeout::Immediate), None);
}

#[test]
fn test_poll_returns_events_in_order() {
    let (tx, mut looper) = ChannelLooper::channel(4);
    tx.try_send(HostEvent::Command(Command::InitWindow)).unwrap();
    tx.try_send(HostEvent::Channel(3)).unwrap();

    assert_eq!(
        looper.poll(PollTimeout::Indefinite),
        Some(HostEvent::Command(Command::InitWindow))
    );
    assert_eq!(
        looper.poll(PollTimeout::Immediate),
        Some(HostEvent::Channel(3))
    );
    assert_eq!(looper.poll(PollTimeout::Immediate), None);
}

#[test]
fn test_closed_channel_reads_as_destroy() {
    let (tx, mut looper) = ChannelLooper::channel(4);
    drop(tx);

    assert_eq!(
        looper.poll(PollTimeout::Immediate),
        Some(HostEvent::Command(Command::Destroy))
    );
    assert_eq!(
        looper.poll(PollTimeout::Indefinite),
        Some(HostEvent::Command(Command::Destroy))
    );
}

#[test]
fn test_finish_input_counts_results() {
    let (_tx, mut looper) = ChannelLooper::channel(1);
    let key = InputEvent::Key(KeyEvent {
        key_code: 4,
        action: KeyAction::Down,
    });

    looper.finish_input(&key, false);
    looper.finish_input(&key, true);
    looper.finish_input(&key, true);

    assert_eq!(looper.consumed, 2);
    assert_eq!(looper.unhandled, 1);
}

// ============================================================================
// SimulatedSensors Tests
// ============================================================================

#[test]
fn test_simulated_accelerometer_found() {
    let sensors = SimulatedSensors::new(SensorFeed::default());
    let sub = SensorSubscription::initialize(&sensors, Some("com.test"), 3, 60);

    assert!(sub.has_sensor());
    assert_eq!(sub.period(), Duration::from_micros(16_000));
}

#[test]
fn test_simulated_device_without_accelerometer() {
    let sensors = SimulatedSensors::without_accelerometer(SensorFeed::default());
    let mut sub = SensorSubscription::initialize(&sensors, None, 3, 60);

    assert!(!sub.has_sensor());
    sub.set_enabled(true);
    assert!(!sub.is_enabled());
}

#[test]
fn test_samples_dropped_while_disabled() {
    let feed = SensorFeed::default();
    let sensors = SimulatedSensors::new(feed.clone());
    let mut sub = SensorSubscription::initialize(&sensors, None, 3, 60);

    feed.push(sample(1));
    feed.push(sample(2));
    assert_eq!(sub.drain_pending().count(), 0);
    assert!(feed.is_empty());

    sub.set_enabled(true);
    feed.push(sample(3));
    feed.push(sample(4));
    let stamps: Vec<i64> = sub.drain_pending().map(|s| s.timestamp).collect();
    assert_eq!(stamps, vec![3, 4]);
}

#[test]
fn test_feed_is_shared_between_clones() {
    let feed = SensorFeed::default();
    let other = feed.clone();
    feed.push(sample(7));

    assert_eq!(other.len(), 1);
    assert_eq!(other.pop().map(|s| s.timestamp), Some(7));
    assert!(feed.is_empty());
}

// ============================================================================
// SoftwareBackend Tests
// ============================================================================

#[test]
fn test_software_configs() {
    let mut backend = SoftwareBackend::new(64, 32);
    let display = backend.open_display().unwrap();

    let configs = backend.choose_configs(display, &ConfigRequest::rgb(8));
    assert_eq!(configs, vec![ConfigHandle(1), ConfigHandle(2)]);
    assert_eq!(backend.config_info(display, ConfigHandle(1)).unwrap().depth_bits, 16);
    assert_eq!(backend.config_info(display, ConfigHandle(2)).unwrap().depth_bits, 0);
    assert!(backend.config_info(display, ConfigHandle(9)).is_none());
    assert!(backend.choose_configs(display, &ConfigRequest::rgb(10)).is_empty());
}

#[test]
fn test_software_clear_and_swap() {
    let mut backend = SoftwareBackend::new(64, 32);
    let stats = backend.stats();
    let display = backend.open_display().unwrap();
    let surface = backend
        .create_window_surface(display, ConfigHandle(2), WindowHandle(1), 2)
        .unwrap();
    let context = backend.create_context(display, ConfigHandle(2)).unwrap();

    assert!(backend.make_current(display, Some((surface, context))));
    assert_eq!(backend.surface_size(display, surface), (64, 32));

    backend.clear([0.5, 0.5, 0.25, 1.0]);
    assert!(backend.swap_buffers(display, surface));

    let s = stats.borrow();
    assert_eq!(s.last_clear, Some([128, 128, 64, 255]));
    assert_eq!(s.frames_presented, 1);
    assert_eq!(s.live_surfaces, 1);
    assert_eq!(s.live_contexts, 1);
}

#[test]
fn test_software_teardown() {
    let mut backend = SoftwareBackend::new(8, 8);
    let stats = backend.stats();
    let display = backend.open_display().unwrap();
    let surface = backend
        .create_window_surface(display, ConfigHandle(1), WindowHandle(1), 1)
        .unwrap();
    let context = backend.create_context(display, ConfigHandle(1)).unwrap();

    assert!(backend.make_current(display, None));
    backend.destroy_context(display, context);
    backend.destroy_surface(display, surface);
    backend.terminate(display);

    assert!(!backend.swap_buffers(display, surface));
    assert!(!backend.make_current(display, Some((surface, context))));
    let s = stats.borrow();
    assert_eq!(s.live_surfaces, 0);
    assert_eq!(s.live_contexts, 0);
    assert_eq!(s.displays_opened, 1);
    assert_eq!(s.displays_terminated, 1);
}

#[test]
fn test_clear_without_current_surface_is_noop() {
    let mut backend = SoftwareBackend::new(8, 8);
    let stats = backend.stats();
    backend.clear([1.0, 0.0, 0.0, 1.0]);
    assert_eq!(stats.borrow().last_clear, None);
}

// ============================================================================
// Session Tests
// ============================================================================

#[test]
fn test_demo_session() {
    let config = EngineConfig::default();
    let report = run_session(
        &config,
        None,
        demo_script(config.sensor_channel_id),
        SessionOptions::default(),
    )
    .unwrap();

    assert_eq!(report.input_consumed, 3);
    assert_eq!(report.input_unhandled, 1);
    assert_eq!(report.final_state.x, 120);
    assert_eq!(report.final_state.y, 340);
    assert!((0.0..=1.0).contains(&report.final_state.angle));
    // How many animated frames fit in depends on thread timing; InitWindow
    // and LoseFocus always draw.
    assert!(report.summary.frames >= 2);
    assert_eq!(report.summary.events, 17);
    assert!(report.last_clear.is_some());

    let saved = report.saved_state.expect("SaveState should have run");
    let restored = PersistableState::from_bytes(&saved).unwrap();
    assert_eq!((restored.x, restored.y), (120, 340));
}

#[test]
fn test_restored_session_keeps_state_without_window() {
    let saved = PersistableState {
        angle: 0.37,
        x: 120,
        y: 340,
    };
    let report = run_session(
        &EngineConfig::default(),
        Some(saved.to_bytes()),
        vec![ScriptStep::Send(HostEvent::Command(Command::Destroy))],
        SessionOptions::default(),
    )
    .unwrap();

    assert_eq!(report.final_state, saved);
    assert_eq!(report.summary.frames, 0);
    assert_eq!(report.summary.iterations, 1);
}

#[test]
fn test_malformed_saved_state_falls_back_to_default() {
    let report = run_session(
        &EngineConfig::default(),
        Some(vec![1, 2, 3]),
        Vec::new(),
        SessionOptions::default(),
    )
    .unwrap();

    assert_eq!(report.final_state, PersistableState::default());
}

#[test]
fn test_script_ending_early_still_shuts_down() {
    let report = run_session(
        &EngineConfig::default(),
        None,
        vec![ScriptStep::Send(HostEvent::Command(Command::InitWindow))],
        SessionOptions::default(),
    )
    .unwrap();

    assert_eq!(report.summary.frames, 1);
    assert_eq!(report.saved_state, None);
}
