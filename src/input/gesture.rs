use chrono::{DateTime, NaiveDate, Utc};

use crate::app::{AppState, ControllerError, Position};

/// User gestures reported by the rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    CellSelected { date: NaiveDate, anchor: Position },
    EventSelected { id: String },
    EventDragged { id: String, start: DateTime<Utc>, end: Option<DateTime<Utc>> },
}

/// Applies a gesture to the state. References to events that no longer
/// exist are dropped; other failures are returned for display.
pub fn handle_gesture(gesture: Gesture, state: &mut AppState) -> Result<(), ControllerError> {
    let result = match gesture {
        Gesture::CellSelected { date, anchor } => {
            state.begin_create(date, anchor);
            Ok(())
        }
        Gesture::EventSelected { id } => state.open_event(&id),
        Gesture::EventDragged { id, start, end } => state.move_event(&id, start, end),
    };

    match result {
        Err(ControllerError::NotFound(id)) => {
            tracing::warn!("Ignoring gesture for stale event {}", id);
            Ok(())
        }
        other => other,
    }
}
