//! The state that survives a destroy/recreate cycle, plus the engine's
//! transient flags.

use bytemuck::{Pod, Zeroable};

use crate::error::StateError;

/// Minimal state preserved across engine instances.
///
/// The layout is fixed (`f32`, `i32`, `i32`, native endianness, no padding)
/// because the host persists the raw bytes and hands them back verbatim.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct PersistableState {
    /// Animation phase in `0.0..=1.0`.
    pub angle: f32,
    /// Last primary-pointer position.
    pub x: i32,
    pub y: i32,
}

/// Size of the saved-state blob.
pub const SAVED_STATE_SIZE: usize = std::mem::size_of::<PersistableState>();

impl PersistableState {
    pub fn to_bytes(&self) -> Vec<u8> {
        bytemuck::bytes_of(self).to_vec()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StateError> {
        if bytes.len() != SAVED_STATE_SIZE {
            return Err(StateError::Size {
                expected: SAVED_STATE_SIZE,
                actual: bytes.len(),
            });
        }
        Ok(bytemuck::pod_read_unaligned(bytes))
    }

    /// Step the animation phase, snapping back to 0.0 once it passes 1.0.
    pub fn advance_angle(&mut self, step: f32) {
        self.angle += step;
        if self.angle > 1.0 {
            self.angle = 0.0;
        }
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }
}

/// Transient engine flags. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineFlags {
    /// Set by the first motion input; cleared on focus loss, teardown and
    /// shutdown. Decides whether the loop blocks.
    pub animating: bool,
    pub focused: bool,
}
