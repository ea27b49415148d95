//! Halcyon Bridge: a headless host for the engine.
//!
//! Stands in for the platform: a channel-backed looper, a software
//! framebuffer backend, a simulated accelerometer and a scripted session
//! that plays lifecycle commands, touches and sensor ticks from a host
//! thread.

pub mod looper;
pub mod script;
pub mod sensors;
pub mod session;
pub mod software;
