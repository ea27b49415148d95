//! Host looper over a tokio channel.
//!
//! The indefinite poll maps to `blocking_recv`, the zero-timeout poll to
//! `try_recv`. A closed channel means the host went away, which is reported
//! as a destroy request.

use halcyon_core::input::InputEvent;
use halcyon_core::{Command, HostEvent, Looper, PollTimeout};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

#[derive(Debug)]
pub struct ChannelLooper {
    rx: mpsc::Receiver<HostEvent>,
    pub consumed: u64,
    pub unhandled: u64,
}

impl ChannelLooper {
    pub fn new(rx: mpsc::Receiver<HostEvent>) -> Self {
        Self {
            rx,
            consumed: 0,
            unhandled: 0,
        }
    }

    /// A looper plus the sender the host thread feeds it through.
    pub fn channel(capacity: usize) -> (mpsc::Sender<HostEvent>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self::new(rx))
    }
}

impl Looper for ChannelLooper {
    fn poll(&mut self, timeout: PollTimeout) -> Option<HostEvent> {
        match timeout {
            PollTimeout::Indefinite => match self.rx.blocking_recv() {
                Some(event) => Some(event),
                None => Some(host_gone()),
            },
            PollTimeout::Immediate => match self.rx.try_recv() {
                Ok(event) => Some(event),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => Some(host_gone()),
            },
        }
    }

    fn finish_input(&mut self, _event: &InputEvent, handled: bool) {
        if handled {
            self.consumed += 1;
        } else {
            self.unhandled += 1;
        }
    }
}

fn host_gone() -> HostEvent {
    tracing::debug!("Host channel closed");
    HostEvent::Command(Command::Destroy)
}
