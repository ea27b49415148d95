//! # Halcyon Core
//!
//! The control plane of the application shell: display-surface acquisition
//! and teardown, the accelerometer subscription, input routing, the
//! lifecycle state machine and the event loop that paces frames.
//!
//! Everything platform-specific is injected. The graphics API sits behind
//! [`graphics::GraphicsBackend`], the sensor manager behind
//! [`halcyon_io::SensorManagerFactory`] and the host's event source behind
//! [`event_loop::Looper`].

pub mod config;
pub mod error;
pub mod event_loop;
pub mod graphics;
pub mod input;
pub mod lifecycle;
pub mod state;
pub mod surface;

// Re-export the main struct so users can just use `halcyon_core::Engine`
pub use config::EngineConfig;
pub use event_loop::{HostEvent, Looper, PollTimeout};
pub use lifecycle::{Command, Engine, HostContext};
pub use state::PersistableState;
