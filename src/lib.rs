pub mod app;
pub mod calendar;
pub mod input;
pub mod session;
pub mod storage;
pub mod ui;

pub use app::{AppState, ControllerError, InteractionState, Position};
pub use calendar::{CalendarEvent, CalendarView, EventDraft, ValidationError};
pub use input::{Gesture, handle_gesture};
