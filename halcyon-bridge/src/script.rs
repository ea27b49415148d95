//! Scripted host sessions.
//!
//! A script is what the platform would have done to the app: lifecycle
//! commands, touches and accelerometer ticks, with pauses in between.

use std::time::Duration;

use halcyon_core::input::{InputEvent, KeyAction, KeyEvent, MotionAction, MotionEvent};
use halcyon_core::{Command, HostEvent};
use halcyon_io::SensorSample;
use tokio::sync::mpsc;

use crate::sensors::SensorFeed;

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    /// Deliver an event to the engine's looper.
    Send(HostEvent),
    /// Buffer an accelerometer sample without waking the engine.
    Sample(SensorSample),
    Pause(Duration),
}

fn cmd(command: Command) -> ScriptStep {
    ScriptStep::Send(HostEvent::Command(command))
}

fn touch(action: MotionAction, x: f32, y: f32) -> ScriptStep {
    ScriptStep::Send(HostEvent::Input(InputEvent::Motion(MotionEvent::single(
        action, x, y,
    ))))
}

/// A full visible session: window up, focus, a drag, a few sensor ticks, a
/// back-key press, then the host saving state and tearing everything down.
pub fn demo_script(sensor_channel_id: i32) -> Vec<ScriptStep> {
    let mut steps = vec![
        cmd(Command::Start),
        cmd(Command::Resume),
        cmd(Command::InitWindow),
        cmd(Command::GainFocus),
        touch(MotionAction::Down, 40.0, 60.0),
        touch(MotionAction::Move, 80.5, 120.25),
        touch(MotionAction::Up, 120.9, 340.1),
    ];

    for i in 0..3 {
        let t = i as f32 * 0.1;
        steps.push(ScriptStep::Sample(SensorSample {
            timestamp: 1_000_000 * (i + 1),
            x: t,
            y: -t,
            z: 9.81,
        }));
        steps.push(ScriptStep::Send(HostEvent::Channel(sensor_channel_id)));
        steps.push(ScriptStep::Pause(Duration::from_millis(5)));
    }

    steps.extend([
        ScriptStep::Send(HostEvent::Input(InputEvent::Key(KeyEvent {
            key_code: 4,
            action: KeyAction::Down,
        }))),
        cmd(Command::Pause),
        cmd(Command::SaveState),
        cmd(Command::LoseFocus),
        cmd(Command::TermWindow),
        cmd(Command::Stop),
        cmd(Command::Destroy),
    ]);
    steps
}

/// Play `steps` into the engine. Blocks the calling thread, so run it off
/// the engine thread. Stops early if the engine has gone away.
pub fn play(steps: Vec<ScriptStep>, tx: mpsc::Sender<HostEvent>, feed: SensorFeed) {
    for step in steps {
        match step {
            ScriptStep::Send(event) => {
                if tx.blocking_send(event).is_err() {
                    tracing::debug!("Engine stopped listening; ending script");
                    return;
                }
            }
            ScriptStep::Sample(sample) => feed.push(sample),
            ScriptStep::Pause(d) => std::thread::sleep(d),
        }
    }
}
