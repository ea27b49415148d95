//! One engine session against the headless host.
//!
//! The engine runs on the calling thread; the script plays from a separate
//! "host" thread, which is how the platform delivers events to a native app.

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use halcyon_core::event_loop::{self, LoopSummary};
use halcyon_core::graphics::WindowHandle;
use halcyon_core::{Engine, EngineConfig, HostContext, PersistableState};

use crate::looper::ChannelLooper;
use crate::script::{self, ScriptStep};
use crate::sensors::{SensorFeed, SimulatedSensors};
use crate::software::SoftwareBackend;

pub const PACKAGE_NAME: &str = "com.halcyon.bridge";

const FRAMEBUFFER: (i32, i32) = (320, 240);
const CHANNEL_CAPACITY: usize = 64;

/// What a session left behind.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub summary: LoopSummary,
    pub final_state: PersistableState,
    /// Bytes written by the last `SaveState`, if any.
    pub saved_state: Option<Vec<u8>>,
    pub last_clear: Option<[u8; 4]>,
    pub input_consumed: u64,
    pub input_unhandled: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Sleep this long per swap to emulate a vsync'd display.
    pub frame_interval: Duration,
}

/// Run `script` to completion against a fresh engine.
pub fn run_session(
    config: &EngineConfig,
    saved_state: Option<Vec<u8>>,
    script: Vec<ScriptStep>,
    options: SessionOptions,
) -> Result<SessionReport> {
    let feed = SensorFeed::default();
    let sensors = SimulatedSensors::new(feed.clone());
    let backend = SoftwareBackend::new(FRAMEBUFFER.0, FRAMEBUFFER.1)
        .with_frame_interval(options.frame_interval);
    let stats = backend.stats();

    let mut host = HostContext {
        window: Some(WindowHandle(1)),
        saved_state,
        package_name: Some(PACKAGE_NAME.to_string()),
        destroy_requested: false,
    };
    let mut engine = Engine::new(config.clone(), Box::new(backend), &sensors, &host);

    let (tx, mut looper) = ChannelLooper::channel(CHANNEL_CAPACITY);
    let host_thread = thread::Builder::new()
        .name("host".into())
        .spawn(move || script::play(script, tx, feed))
        .context("Failed to spawn host thread")?;

    let summary = event_loop::run(&mut engine, &mut host, &mut looper);
    let (input_consumed, input_unhandled) = (looper.consumed, looper.unhandled);
    // Dropping the receiver unblocks a host thread still sending.
    drop(looper);
    host_thread
        .join()
        .map_err(|_| anyhow!("Host thread panicked"))?;

    let last_clear = stats.borrow().last_clear;
    Ok(SessionReport {
        summary,
        final_state: *engine.state(),
        saved_state: host.saved_state,
        last_clear,
        input_consumed,
        input_unhandled,
    })
}
