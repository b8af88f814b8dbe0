use chrono::{DateTime, FixedOffset, Utc};

use crate::app::AppState;
use crate::calendar::CalendarEvent;
use crate::ui::navigation::DateRange;

/// What the rendering surface draws for one event.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub color: String,
    pub has_explicit_end: bool,
}

impl From<&CalendarEvent> for DisplayEvent {
    fn from(event: &CalendarEvent) -> Self {
        Self {
            id: event.id.clone(),
            title: event.title.clone(),
            start: event.start,
            end: event.display_end(),
            color: event.color.clone(),
            has_explicit_end: event.end.is_some(),
        }
    }
}

pub fn agenda_for_range(state: &AppState, range: DateRange) -> Vec<DisplayEvent> {
    state
        .events_between(range.start, range.end)
        .into_iter()
        .map(DisplayEvent::from)
        .collect()
}

pub fn format_agenda_line(event: &DisplayEvent, offset: FixedOffset) -> String {
    let start = event.start.with_timezone(&offset);
    let end = event.end.with_timezone(&offset);
    let time_label = if event.has_explicit_end {
        format!("{}-{}", start.format("%H:%M"), end.format("%H:%M"))
    } else {
        start.format("%H:%M").to_string()
    };
    format!(
        "{} {:<11} {} [{}] ({})",
        start.format("%a %Y-%m-%d"),
        time_label,
        event.title,
        event.color,
        event.id
    )
}

pub fn format_agenda(title: &str, events: &[DisplayEvent], offset: FixedOffset) -> String {
    let mut lines = vec![title.to_string(), String::new()];

    if events.is_empty() {
        lines.push("No events scheduled.".to_string());
    } else {
        lines.extend(events.iter().map(|e| format_agenda_line(e, offset)));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Offset, TimeZone};
    use pretty_assertions::assert_eq;

    fn event(id: &str, day: u32, hour: u32, end: Option<u32>) -> CalendarEvent {
        let start = Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap();
        CalendarEvent {
            id: id.to_string(),
            title: format!("Event {}", id),
            start,
            end: end.map(|h| Utc.with_ymd_and_hms(2024, 6, day, h, 0, 0).unwrap()),
            color: "#33b679".to_string(),
            notes: None,
        }
    }

    fn range(from: u32, to: u32) -> DateRange {
        DateRange {
            start: NaiveDate::from_ymd_opt(2024, 6, from).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 6, to).unwrap(),
        }
    }

    #[test]
    fn display_event_defaults_end_without_storing_it() {
        let stored = event("a", 1, 9, None);

        let display = DisplayEvent::from(&stored);

        assert_eq!(display.end, Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap());
        assert!(!display.has_explicit_end);
        assert_eq!(stored.end, None);
    }

    #[test]
    fn agenda_lists_only_events_in_range_sorted() {
        let state = AppState::new().with_events(vec![
            event("late", 3, 15, None),
            event("outside", 9, 8, None),
            event("early", 2, 8, Some(9)),
        ]);

        let agenda = agenda_for_range(&state, range(1, 7));

        let ids: Vec<&str> = agenda.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[test]
    fn empty_agenda_says_so() {
        let text = format_agenda("June 2024", &[], Utc.fix());

        assert_eq!(text, "June 2024\n\nNo events scheduled.");
    }

    #[test]
    fn agenda_line_shows_explicit_range() {
        let display = DisplayEvent::from(&event("x", 4, 9, Some(11)));

        let line = format_agenda_line(&display, Utc.fix());

        assert_eq!(line, "Tue 2024-06-04 09:00-11:00 Event x [#33b679] (x)");
    }
}
