//! Raw input classification.
//!
//! Only motion-class events are consumed. Everything else goes back to the
//! host unhandled so it can apply its default behavior (e.g. back
//! navigation on a key press).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionAction {
    Down,
    Up,
    Move,
}

/// One contact in a motion event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerCoords {
    pub id: i32,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MotionEvent {
    pub action: MotionAction,
    /// Index 0 is the primary contact.
    pub pointers: Vec<PointerCoords>,
}

impl MotionEvent {
    /// Single-contact event, the common case.
    pub fn single(action: MotionAction, x: f32, y: f32) -> Self {
        Self {
            action,
            pointers: vec![PointerCoords { id: 0, x, y }],
        }
    }

    pub fn primary(&self) -> Option<&PointerCoords> {
        self.pointers.first()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
    Multiple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key_code: i32,
    pub action: KeyAction,
}

/// A raw event from the host input channel.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Motion(MotionEvent),
    Key(KeyEvent),
    /// Any other class, identified by the host's type code.
    Other(i32),
}

/// Result of routing one input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteOutcome {
    /// Reported back to the host.
    pub consumed: bool,
    /// New primary-pointer position, truncated to whole pixels.
    pub position: Option<(i32, i32)>,
    /// The engine should start animating.
    pub start_animating: bool,
}

/// Classify `event`. This is the only path that turns animation on.
pub fn route(event: &InputEvent) -> RouteOutcome {
    match event {
        InputEvent::Motion(motion) => RouteOutcome {
            consumed: true,
            position: motion.primary().map(|p| (p.x as i32, p.y as i32)),
            start_animating: true,
        },
        InputEvent::Key(_) | InputEvent::Other(_) => RouteOutcome::default(),
    }
}
