pub mod gesture;

pub use gesture::{Gesture, handle_gesture};
