//! The lifecycle state machine.
//!
//! States are `{NoWindow, WindowReady}` × `{Unfocused, Focused}` plus the
//! independent `animating` flag. The engine exclusively owns the render
//! target and the sensor subscription; the host is passed in explicitly on
//! every dispatch through [`HostContext`].

use halcyon_io::{SensorManagerFactory, SensorSubscription};

use crate::config::EngineConfig;
use crate::graphics::{GraphicsBackend, WindowHandle};
use crate::input::{self, InputEvent};
use crate::state::{EngineFlags, PersistableState};
use crate::surface::{RenderTarget, SurfaceManager};

// ════════════════════════════════════════════════════════════════════
// Host Commands
// ════════════════════════════════════════════════════════════════════

/// Lifecycle notification from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    InputChanged,
    InitWindow,
    TermWindow,
    WindowResized,
    WindowRedrawNeeded,
    ContentRectChanged,
    GainFocus,
    LoseFocus,
    ConfigChanged,
    LowMemory,
    Start,
    Resume,
    SaveState,
    Pause,
    Stop,
    Destroy,
    Other(i32),
}

impl Command {
    /// Map the host's integer command code.
    pub fn from_raw(code: i32) -> Self {
        match code {
            0 => Command::InputChanged,
            1 => Command::InitWindow,
            2 => Command::TermWindow,
            3 => Command::WindowResized,
            4 => Command::WindowRedrawNeeded,
            5 => Command::ContentRectChanged,
            6 => Command::GainFocus,
            7 => Command::LoseFocus,
            8 => Command::ConfigChanged,
            9 => Command::LowMemory,
            10 => Command::Start,
            11 => Command::Resume,
            12 => Command::SaveState,
            13 => Command::Pause,
            14 => Command::Stop,
            15 => Command::Destroy,
            other => Command::Other(other),
        }
    }
}

/// What the host exposes to the engine while dispatching.
#[derive(Debug, Clone, Default)]
pub struct HostContext {
    /// Present while the host has a drawable window.
    pub window: Option<WindowHandle>,
    /// Bytes handed back from a previous instance, or written by `SaveState`.
    pub saved_state: Option<Vec<u8>>,
    /// Used for the package-scoped sensor-manager lookup.
    pub package_name: Option<String>,
    /// Set when the host asks the engine to exit.
    pub destroy_requested: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    NoWindow,
    WindowReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusState {
    Unfocused,
    Focused,
}

// ════════════════════════════════════════════════════════════════════
// Engine
// ════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    surfaces: SurfaceManager,
    target: RenderTarget,
    sensors: SensorSubscription,
    state: PersistableState,
    flags: EngineFlags,
    frames_presented: u64,
}

impl Engine {
    /// Build the engine: subscribe to the accelerometer (left disabled until
    /// focus) and restore any state the host handed back.
    pub fn new(
        config: EngineConfig,
        backend: Box<dyn GraphicsBackend>,
        sensor_factory: &dyn SensorManagerFactory,
        host: &HostContext,
    ) -> Self {
        let sensors = SensorSubscription::initialize(
            sensor_factory,
            host.package_name.as_deref(),
            config.sensor_channel_id,
            config.sensor_rate_hz,
        );

        let state = match host.saved_state.as_deref() {
            Some(bytes) => match PersistableState::from_bytes(bytes) {
                Ok(state) => {
                    tracing::info!("Restored saved state: {:?}", state);
                    state
                }
                Err(e) => {
                    tracing::warn!("Ignoring saved state: {}", e);
                    PersistableState::default()
                }
            },
            None => PersistableState::default(),
        };

        Self {
            surfaces: SurfaceManager::new(backend, &config),
            config,
            target: RenderTarget::invalid(),
            sensors,
            state,
            flags: EngineFlags::default(),
            frames_presented: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &PersistableState {
        &self.state
    }

    pub fn target(&self) -> &RenderTarget {
        &self.target
    }

    pub fn sensors(&self) -> &SensorSubscription {
        &self.sensors
    }

    pub fn is_animating(&self) -> bool {
        self.flags.animating
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn window_state(&self) -> WindowState {
        if self.target.is_valid() {
            WindowState::WindowReady
        } else {
            WindowState::NoWindow
        }
    }

    pub fn focus_state(&self) -> FocusState {
        if self.flags.focused {
            FocusState::Focused
        } else {
            FocusState::Unfocused
        }
    }

    /// Apply one host command. Commands that make no sense in the current
    /// state are ignored.
    pub fn handle_command(&mut self, host: &mut HostContext, cmd: Command) {
        tracing::debug!("Command: {:?}", cmd);
        match cmd {
            Command::SaveState => self.on_save_state(host),
            Command::InitWindow => self.on_init_window(host),
            Command::TermWindow => self.on_term_window(),
            Command::GainFocus => self.on_focus(true),
            Command::LoseFocus => self.on_focus(false),
            Command::Destroy => host.destroy_requested = true,
            other => tracing::trace!("Ignoring command {:?}", other),
        }
    }

    /// Route a raw input event. Returns whether it was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        let outcome = input::route(event);
        if outcome.start_animating {
            self.flags.animating = true;
        }
        if let Some((x, y)) = outcome.position {
            self.state.set_position(x, y);
        }
        outcome.consumed
    }

    /// Drain buffered accelerometer samples. They are logged only.
    /// Returns how many were read.
    pub fn process_sensor_events(&mut self) -> usize {
        let mut count = 0;
        for sample in self.sensors.drain_pending() {
            tracing::info!(
                "accelerometer: x={} y={} z={}",
                sample.x,
                sample.y,
                sample.z
            );
            count += 1;
        }
        count
    }

    /// Advance the animation by one step and draw, if animating.
    pub fn animate(&mut self) {
        if !self.flags.animating {
            return;
        }
        self.state.advance_angle(self.config.angle_step);
        // Display sync in present() throttles this; no timing here.
        self.draw_frame();
    }

    /// Present one frame. Only frames the backend actually swapped count
    /// toward [`Engine::frames_presented`].
    pub fn draw_frame(&mut self) {
        if self.surfaces.present(&self.target, &self.state) {
            self.frames_presented += 1;
        }
    }

    /// Final teardown. Idempotent.
    pub fn shutdown(&mut self) {
        if self.sensors.is_enabled() {
            self.sensors.set_enabled(false);
        }
        self.surfaces.release(&mut self.target, &mut self.flags);
        self.flags.focused = false;
        tracing::info!("Engine shut down after {} frames", self.frames_presented);
    }

    fn on_save_state(&self, host: &mut HostContext) {
        let bytes = self.state.to_bytes();
        tracing::debug!("Saving {} bytes of state", bytes.len());
        host.saved_state = Some(bytes);
    }

    fn on_init_window(&mut self, host: &HostContext) {
        if self.target.is_valid() {
            tracing::debug!("InitWindow with a live render target; ignoring");
            return;
        }
        let Some(window) = host.window else {
            tracing::debug!("InitWindow without a window; nothing to acquire");
            return;
        };
        match self.surfaces.acquire(window, &mut self.state) {
            Ok(target) => {
                self.target = target;
                self.draw_frame();
            }
            Err(e) => tracing::warn!("Unable to acquire render target: {}", e),
        }
    }

    fn on_term_window(&mut self) {
        self.surfaces.release(&mut self.target, &mut self.flags);
    }

    fn on_focus(&mut self, gained: bool) {
        if gained {
            self.flags.focused = true;
            if !self.sensors.is_enabled() {
                self.sensors.set_enabled(true);
            }
        } else {
            self.flags.focused = false;
            // Stop sensing to save battery while in the background.
            if self.sensors.is_enabled() {
                self.sensors.set_enabled(false);
            }
            self.flags.animating = false;
            self.draw_frame();
        }
    }
}
