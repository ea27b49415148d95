//! The event loop driver.
//!
//! One iteration drains everything the host has ready, then produces at
//! most one animation frame. The poll policy is the whole scheduling story:
//!
//! ```text
//!   animating = false  ──►  poll(Indefinite)  (sleep until the host wakes us)
//!   animating = true   ──►  poll(Immediate)   (never block; draw every pass)
//! ```
//!
//! The policy is re-evaluated before every poll, so a motion event that
//! starts animation switches the very next poll to non-blocking.

use std::ops::ControlFlow;

use crate::input::InputEvent;
use crate::lifecycle::{Command, Engine, HostContext};

/// How long a poll may wait for the next event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollTimeout {
    /// Block until something arrives.
    Indefinite,
    /// Return at once if nothing is pending.
    Immediate,
}

/// One event pulled from the host's multiplexed channel.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Command(Command),
    Input(InputEvent),
    /// A user channel signalled readiness; the id says which one.
    Channel(i32),
}

/// The host event source.
pub trait Looper {
    /// Next ready event, or `None` when nothing is ready within `timeout`.
    fn poll(&mut self, timeout: PollTimeout) -> Option<HostEvent>;

    /// Report whether an input event was consumed.
    fn finish_input(&mut self, _event: &InputEvent, _handled: bool) {}
}

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopSummary {
    pub iterations: u64,
    pub events: u64,
    pub frames: u64,
}

/// Pick the poll timeout for the engine's current state.
pub fn poll_timeout(engine: &Engine) -> PollTimeout {
    if engine.is_animating() {
        PollTimeout::Immediate
    } else {
        PollTimeout::Indefinite
    }
}

/// Run until the host requests destruction.
pub fn run(engine: &mut Engine, host: &mut HostContext, looper: &mut dyn Looper) -> LoopSummary {
    let mut summary = LoopSummary::default();
    loop {
        summary.iterations += 1;
        let flow = run_iteration(engine, host, looper, &mut summary.events);
        if flow.is_break() {
            break;
        }
    }
    summary.frames = engine.frames_presented();
    tracing::info!(
        "Event loop finished: {} iterations, {} events, {} frames",
        summary.iterations,
        summary.events,
        summary.frames
    );
    summary
}

/// One loop pass: drain ready events, honor a destroy request, then draw
/// the next animation frame if animating.
pub fn run_iteration(
    engine: &mut Engine,
    host: &mut HostContext,
    looper: &mut dyn Looper,
    events: &mut u64,
) -> ControlFlow<()> {
    while let Some(event) = looper.poll(poll_timeout(engine)) {
        *events += 1;
        dispatch(engine, host, looper, event);

        if host.destroy_requested {
            engine.shutdown();
            return ControlFlow::Break(());
        }
    }

    engine.animate();
    ControlFlow::Continue(())
}

fn dispatch(engine: &mut Engine, host: &mut HostContext, looper: &mut dyn Looper, event: HostEvent) {
    match event {
        HostEvent::Command(cmd) => engine.handle_command(host, cmd),
        HostEvent::Input(input) => {
            let handled = engine.handle_input(&input);
            looper.finish_input(&input, handled);
        }
        HostEvent::Channel(id) if id == engine.config().sensor_channel_id => {
            engine.process_sensor_events();
        }
        HostEvent::Channel(id) => tracing::trace!("Event on unknown channel {}", id),
    }
}
