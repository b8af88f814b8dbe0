use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::calendar::{CalendarEvent, EventDraft, ValidationError};

#[derive(Debug, Error, PartialEq)]
pub enum ControllerError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Event not found: {0}")]
    NotFound(String),
}

/// Screen placement of the popover opened next to a clicked cell.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionState {
    Idle,
    CreatingAt { date: NaiveDate, anchor: Position },
    ViewingEvent(String),
    EditingEvent(String),
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    pub fn event_id(&self) -> Option<&str> {
        match self {
            InteractionState::ViewingEvent(id) | InteractionState::EditingEvent(id) => Some(id),
            _ => None,
        }
    }

    /// Whether the open form accepts input.
    pub fn is_form_editable(&self) -> bool {
        matches!(
            self,
            InteractionState::CreatingAt { .. } | InteractionState::EditingEvent(_)
        )
    }
}

/// Owns the event collection and the current interaction mode. The
/// rendering surface only reads from it and reports gestures back.
pub struct AppState {
    events: Vec<CalendarEvent>,
    interaction: InteractionState,
    offset: FixedOffset,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            interaction: InteractionState::Idle,
            offset: Utc.fix(),
        }
    }

    /// Builds a state from a stored snapshot, dropping repeated ids.
    pub fn with_events(mut self, events: Vec<CalendarEvent>) -> Self {
        let mut seen = HashSet::new();
        self.events = events
            .into_iter()
            .filter(|event| {
                let fresh = seen.insert(event.id.clone());
                if !fresh {
                    tracing::warn!("Dropping duplicate event id {} from snapshot", event.id);
                }
                fresh
            })
            .collect();
        self
    }

    /// Offset at which form dates and times are interpreted.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn event(&self, id: &str) -> Option<&CalendarEvent> {
        self.events.iter().find(|event| event.id == id)
    }

    /// Events whose start falls within `from..=to` (local dates), ordered by start.
    pub fn events_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<&CalendarEvent> {
        let mut events: Vec<&CalendarEvent> = self
            .events
            .iter()
            .filter(|event| {
                let date = event.start.with_timezone(&self.offset).date_naive();
                date >= from && date <= to
            })
            .collect();
        events.sort_by_key(|e| e.start);
        events
    }

    /// Form contents for the current interaction, if a form is open.
    pub fn current_draft(&self) -> Option<EventDraft> {
        match &self.interaction {
            InteractionState::Idle => None,
            InteractionState::CreatingAt { date, .. } => Some(EventDraft::blank(*date)),
            InteractionState::ViewingEvent(id) | InteractionState::EditingEvent(id) => self
                .event(id)
                .map(|event| EventDraft::for_event(event, self.offset)),
        }
    }

    pub fn begin_create(&mut self, date: NaiveDate, anchor: Position) {
        tracing::debug!("Begin create at {}", date);
        self.interaction = InteractionState::CreatingAt { date, anchor };
    }

    pub fn open_event(&mut self, id: &str) -> Result<(), ControllerError> {
        if self.event(id).is_none() {
            tracing::warn!("Cannot open missing event {}", id);
            return Err(ControllerError::NotFound(id.to_string()));
        }
        tracing::debug!("Viewing event {}", id);
        self.interaction = InteractionState::ViewingEvent(id.to_string());
        Ok(())
    }

    pub fn begin_edit(&mut self) -> Result<(), ControllerError> {
        let InteractionState::ViewingEvent(id) = &self.interaction else {
            return Ok(());
        };
        let id = id.clone();
        if self.event(&id).is_none() {
            tracing::warn!("Cannot edit missing event {}", id);
            return Err(ControllerError::NotFound(id));
        }
        tracing::debug!("Editing event {}", id);
        self.interaction = InteractionState::EditingEvent(id);
        Ok(())
    }

    /// Commits `draft`. Returns the id of the created or updated event, or
    /// `None` when no form accepting input is open.
    pub fn save(&mut self, draft: &EventDraft) -> Result<Option<String>, ControllerError> {
        match self.interaction.clone() {
            InteractionState::CreatingAt { date, .. } => {
                let (start, end) = draft.resolve(Some(date), self.offset)?;
                let id = self.next_id();
                self.events.push(CalendarEvent {
                    id: id.clone(),
                    title: draft.title.clone(),
                    start,
                    end,
                    color: draft.color.clone(),
                    notes: draft.normalized_notes(),
                });
                tracing::info!("Created event {} '{}'", id, draft.title);
                self.interaction = InteractionState::Idle;
                Ok(Some(id))
            }
            InteractionState::EditingEvent(id) => {
                let offset = self.offset;
                let Some(event) = self.events.iter_mut().find(|event| event.id == id) else {
                    tracing::warn!("Cannot save missing event {}", id);
                    return Err(ControllerError::NotFound(id));
                };
                let stored_date = event.start.with_timezone(&offset).date_naive();
                let (start, end) = draft.resolve(Some(stored_date), offset)?;

                event.title = draft.title.clone();
                event.start = start;
                event.end = end;
                event.color = draft.color.clone();
                event.notes = draft.normalized_notes();
                tracing::info!("Updated event {}", id);
                self.interaction = InteractionState::Idle;
                Ok(Some(id))
            }
            _ => {
                tracing::debug!("Ignoring save outside of a create or edit form");
                Ok(None)
            }
        }
    }

    /// Deletes the event being edited. Outside editing this only closes the form.
    pub fn discard(&mut self) -> Option<CalendarEvent> {
        let removed = match &self.interaction {
            InteractionState::EditingEvent(id) => {
                let index = self.events.iter().position(|event| &event.id == id);
                index.map(|i| self.events.remove(i))
            }
            _ => None,
        };
        if let Some(event) = &removed {
            tracing::info!("Discarded event {}", event.id);
        }
        self.interaction = InteractionState::Idle;
        removed
    }

    /// Reschedules an event. Without a new end, a stored end keeps its
    /// distance from the start.
    pub fn move_event(
        &mut self,
        id: &str,
        new_start: DateTime<Utc>,
        new_end: Option<DateTime<Utc>>,
    ) -> Result<(), ControllerError> {
        let Some(event) = self.events.iter_mut().find(|event| event.id == id) else {
            tracing::warn!("Cannot move missing event {}", id);
            return Err(ControllerError::NotFound(id.to_string()));
        };

        let end = match new_end {
            Some(end) => Some(end),
            None => event.end.map(|end| new_start + (end - event.start)),
        };
        if end.is_some_and(|end| end < new_start) {
            return Err(ValidationError::EndBeforeStart.into());
        }

        event.start = new_start;
        event.end = end;
        tracing::info!("Moved event {} to {}", id, new_start);
        Ok(())
    }

    pub fn close(&mut self) {
        self.interaction = InteractionState::Idle;
    }

    fn next_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.event(&id).is_none() {
                return id;
            }
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
