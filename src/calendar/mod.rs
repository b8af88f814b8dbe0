pub mod event;
pub mod draft;
pub mod view;

pub use event::CalendarEvent;
pub use draft::{EventDraft, ValidationError, compose_timestamp};
pub use view::CalendarView;
