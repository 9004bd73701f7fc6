mod dispatch;
mod gestures;

pub use dispatch::{apply_gesture, DispatchOutcome};
pub use gestures::{map_to_surface, Gesture, GestureConfig, GestureResolver};
