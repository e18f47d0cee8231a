//! Gesture events delivered by the host, in screen coordinates.

use kurbo::{Point, Vec2};

/// Lifecycle phase of a continuous gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

impl GesturePhase {
    pub fn is_active(self) -> bool {
        matches!(self, GesturePhase::Began | GesturePhase::Changed)
    }
}

/// A touch that went down and may come up as a tap.
///
/// `Began` highlights what is under the finger, `Ended` performs the tap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressEvent {
    pub phase: GesturePhase,
    pub location: Point,
}

/// A one-finger drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanEvent {
    pub phase: GesturePhase,
    pub location: Point,
    /// Screen units per second.
    pub velocity: Vec2,
}

/// A two-finger pinch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchEvent {
    pub phase: GesturePhase,
    /// Scale relative to the start of the gesture.
    pub scale: f64,
    /// Midpoint between the fingers.
    pub location: Point,
}
