//! Canvas interaction: gestures in, canvas states and store dispatches out.

mod controller;
mod dragging;
mod gesture;
mod guard;
mod handles;
mod hit;
mod state;
mod viewport;

pub use controller::{Highlight, InteractionController};
pub use dragging::{DraggingState, TargetBlockPlacement};
pub use gesture::{GesturePhase, PanEvent, PinchEvent, PressEvent};
pub use guard::{InteractionGuard, InteractionToken};
pub use handles::{HandlePosition, handle_at};
pub use hit::{block_at, closest_block, group_at};
pub use state::CanvasState;
pub use viewport::Viewport;
