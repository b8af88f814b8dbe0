use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};

use gridcal::{
    app::{AppState, Position},
    calendar::{CalendarView, event::iso_timestamp},
    input::{Gesture, handle_gesture},
    session::Session,
    ui::{ViewCursor, agenda},
};

pub const USAGE: &str = "Usage: gridcal <command>

Commands:
  agenda [--prev|--next]... [YYYY-MM-DD]
  add <YYYY-MM-DD> <HH:MM> <title> [--end HH:MM] [--color C] [--notes N]
  edit <id> [--title T] [--date YYYY-MM-DD] [--time HH:MM] [--end HH:MM] [--no-end] [--color C] [--notes N]
  move <id> <start> [end]     (RFC 3339 timestamps)
  delete <id>
  view [dayGridMonth|timeGridWeek|timeGridDay]";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFields {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
    pub clear_end: bool,
    pub color: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Agenda { date: Option<NaiveDate>, shift: i32 },
    Add { date: NaiveDate, fields: EventFields },
    Edit { id: String, fields: EventFields },
    Move { id: String, start: DateTime<Utc>, end: Option<DateTime<Utc>> },
    Delete { id: String },
    View(Option<CalendarView>),
    Help,
}

pub fn parse_command<I: IntoIterator<Item = String>>(args: I) -> Result<Command, String> {
    let mut args = args.into_iter();
    let Some(name) = args.next() else {
        return Ok(Command::Agenda { date: None, shift: 0 });
    };
    let rest: Vec<String> = args.collect();

    match name.as_str() {
        "agenda" => parse_agenda(&rest),
        "add" => {
            let [date, time, title, flags @ ..] = rest.as_slice() else {
                return Err("add needs <date> <time> <title>".to_string());
            };
            let mut fields = parse_fields(flags)?;
            fields.title = Some(title.clone());
            fields.time = Some(parse_time(time)?);
            Ok(Command::Add { date: parse_date(date)?, fields })
        }
        "edit" => {
            let [id, flags @ ..] = rest.as_slice() else {
                return Err("edit needs an event id".to_string());
            };
            Ok(Command::Edit { id: id.clone(), fields: parse_fields(flags)? })
        }
        "move" => match rest.as_slice() {
            [id, start] => Ok(Command::Move { id: id.clone(), start: parse_instant(start)?, end: None }),
            [id, start, end] => Ok(Command::Move {
                id: id.clone(),
                start: parse_instant(start)?,
                end: Some(parse_instant(end)?),
            }),
            _ => Err("move needs <id> <start> [end]".to_string()),
        },
        "delete" => match rest.as_slice() {
            [id] => Ok(Command::Delete { id: id.clone() }),
            _ => Err("delete needs exactly one event id".to_string()),
        },
        "view" => match rest.as_slice() {
            [] => Ok(Command::View(None)),
            [view] => view.parse().map(|v| Command::View(Some(v))),
            _ => Err("view takes at most one view name".to_string()),
        },
        "--help" | "-h" | "help" => Ok(Command::Help),
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn parse_agenda(args: &[String]) -> Result<Command, String> {
    let mut date = None;
    let mut shift = 0;
    for arg in args {
        match arg.as_str() {
            "--prev" => shift -= 1,
            "--next" => shift += 1,
            value if !value.starts_with("--") && date.is_none() => date = Some(parse_date(value)?),
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }
    Ok(Command::Agenda { date, shift })
}

fn parse_fields(args: &[String]) -> Result<EventFields, String> {
    let mut fields = EventFields::default();
    let mut args = args.iter();

    while let Some(flag) = args.next() {
        if flag == "--no-end" {
            fields.clear_end = true;
            continue;
        }
        let value = args
            .next()
            .ok_or_else(|| format!("{} needs a value", flag))?;
        match flag.as_str() {
            "--title" => fields.title = Some(value.clone()),
            "--date" => fields.date = Some(parse_date(value)?),
            "--time" => fields.time = Some(parse_time(value)?),
            "--end" => fields.end = Some(parse_time(value)?),
            "--color" => fields.color = Some(value.clone()),
            "--notes" => fields.notes = Some(value.clone()),
            _ => return Err(format!("Unknown argument: {}", flag)),
        }
    }

    Ok(fields)
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}'. Use YYYY-MM-DD.", value))
}

fn parse_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| format!("Invalid time '{}'. Use HH:MM.", value))
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, String> {
    iso_timestamp::parse(value)
        .map_err(|_| format!("Invalid timestamp '{}'. Use RFC 3339.", value))
}

/// Runs one command against the session and returns the text to print.
pub fn run_command(command: Command, session: &mut Session) -> anyhow::Result<String> {
    let output = match command {
        Command::Help => return Ok(USAGE.to_string()),
        Command::Agenda { date, shift } => {
            let mut cursor = ViewCursor::new(session.view, date.unwrap_or_else(|| Local::now().date_naive()));
            for _ in 0..shift.unsigned_abs() {
                if shift < 0 { cursor.prev() } else { cursor.next() }
            }
            let events = agenda::agenda_for_range(&session.state, cursor.visible_range());
            return Ok(agenda::format_agenda(&cursor.title(), &events, session.state.offset()));
        }
        Command::View(None) => return Ok(session.view.to_string()),
        Command::View(Some(view)) => {
            session.view = view;
            format!("View set to {}", view.label())
        }
        Command::Add { date, fields } => {
            handle_gesture(Gesture::CellSelected { date, anchor: Position::default() }, &mut session.state)?;
            let color = fields.color.clone().unwrap_or_else(|| session.default_color.clone());
            let fields = EventFields { color: Some(color), ..fields };
            let id = save_form(&mut session.state, &fields)?;
            format!("Created {}", id.unwrap_or_default())
        }
        Command::Edit { id, fields } => {
            handle_gesture(Gesture::EventSelected { id: id.clone() }, &mut session.state)?;
            session.state.begin_edit()?;
            match save_form(&mut session.state, &fields)? {
                Some(id) => format!("Updated {}", id),
                None => format!("Event not found: {}", id),
            }
        }
        Command::Move { id, start, end } => {
            let known = session.state.event(&id).is_some();
            handle_gesture(Gesture::EventDragged { id: id.clone(), start, end }, &mut session.state)?;
            if known {
                format!("Moved {}", id)
            } else {
                format!("Event not found: {}", id)
            }
        }
        Command::Delete { id } => {
            handle_gesture(Gesture::EventSelected { id: id.clone() }, &mut session.state)?;
            session.state.begin_edit()?;
            match session.state.discard() {
                Some(event) => format!("Deleted {} '{}'", event.id, event.title),
                None => format!("Event not found: {}", id),
            }
        }
    };

    session.persist()?;
    Ok(output)
}

/// Fills the open form with `fields` and saves it, closing the form on failure.
fn save_form(state: &mut AppState, fields: &EventFields) -> anyhow::Result<Option<String>> {
    let Some(mut draft) = state.current_draft() else {
        return Ok(None);
    };
    if let Some(title) = &fields.title {
        draft.title = title.clone();
    }
    if let Some(date) = fields.date {
        draft.date = Some(date);
    }
    if let Some(time) = fields.time {
        draft.set_time(time);
    }
    if fields.clear_end {
        draft.clear_end_time();
    }
    if let Some(end) = fields.end {
        draft.set_end_time(end);
    }
    if let Some(color) = &fields.color {
        draft = draft.with_color(color.clone());
    }
    if let Some(notes) = &fields.notes {
        draft.notes = Some(notes.clone());
    }

    match state.save(&draft) {
        Ok(id) => Ok(id),
        Err(err) => {
            state.close();
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Offset, TimeZone};
    use gridcal::storage::LocalStore;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    fn test_session() -> Session {
        let store = LocalStore::open_in_memory().unwrap();
        Session::from_store(store, Utc.fix(), CalendarView::DayGridMonth, "#000").unwrap()
    }

    #[test]
    fn no_arguments_shows_agenda() {
        assert_eq!(parse_command(Vec::new()), Ok(Command::Agenda { date: None, shift: 0 }));
    }

    #[test]
    fn parses_add_with_flags() {
        let command = parse_command(args("add 2024-06-01 12:30 Lunch --end 13:15 --color #f00")).unwrap();

        let Command::Add { date, fields } = command else { panic!("expected add") };
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(fields.title.as_deref(), Some("Lunch"));
        assert_eq!(fields.time, NaiveTime::from_hms_opt(12, 30, 0));
        assert_eq!(fields.end, NaiveTime::from_hms_opt(13, 15, 0));
        assert_eq!(fields.color.as_deref(), Some("#f00"));
    }

    #[test]
    fn rejects_bad_time() {
        assert!(parse_command(args("add 2024-06-01 noon Lunch")).is_err());
    }

    #[test]
    fn rejects_unknown_command() {
        assert_eq!(parse_command(args("sync")), Err("Unknown command: sync".to_string()));
    }

    #[test]
    fn parses_agenda_shift() {
        let command = parse_command(args("agenda --next --next 2024-06-01")).unwrap();

        assert_eq!(
            command,
            Command::Agenda { date: NaiveDate::from_ymd_opt(2024, 6, 1), shift: 2 }
        );
    }

    #[test]
    fn add_then_agenda_lists_event() {
        let mut session = test_session();

        let created = run_command(parse_command(args("add 2024-06-01 12:30 Lunch")).unwrap(), &mut session).unwrap();
        let agenda = run_command(parse_command(args("agenda 2024-06-10")).unwrap(), &mut session).unwrap();

        assert!(created.starts_with("Created "));
        assert!(agenda.starts_with("June 2024"));
        assert!(agenda.contains("12:30"));
        assert!(agenda.contains("Lunch [#000]"));
    }

    #[test]
    fn edit_updates_and_delete_removes() {
        let mut session = test_session();
        run_command(parse_command(args("add 2024-06-01 09:00 Standup")).unwrap(), &mut session).unwrap();
        let id = session.state.events()[0].id.clone();

        let edit = Command::Edit {
            id: id.clone(),
            fields: EventFields { title: Some("Retro".to_string()), end: NaiveTime::from_hms_opt(10, 0, 0), ..Default::default() },
        };
        run_command(edit, &mut session).unwrap();
        let event = session.state.event(&id).unwrap();
        assert_eq!(event.title, "Retro");
        assert_eq!(event.end, Some(Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()));

        let deleted = run_command(Command::Delete { id: id.clone() }, &mut session).unwrap();
        assert!(deleted.starts_with("Deleted"));
        assert!(session.state.events().is_empty());
    }

    #[test]
    fn invalid_add_reports_error_and_closes_form() {
        let mut session = test_session();
        let title = "x".repeat(31);
        let command = Command::Add {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            fields: EventFields { title: Some(title), time: NaiveTime::from_hms_opt(9, 0, 0), ..Default::default() },
        };

        let err = run_command(command, &mut session).unwrap_err();

        assert_eq!(err.to_string(), "Event name cannot exceed 30 characters");
        assert!(session.state.interaction().is_idle());
        assert!(session.state.events().is_empty());
    }

    #[test]
    fn missing_ids_are_reported_not_fatal() {
        let mut session = test_session();

        let moved = run_command(parse_command(args("move nope 2024-06-01T10:00:00Z")).unwrap(), &mut session).unwrap();
        let deleted = run_command(Command::Delete { id: "nope".to_string() }, &mut session).unwrap();

        assert_eq!(moved, "Event not found: nope");
        assert_eq!(deleted, "Event not found: nope");
    }

    #[test]
    fn view_command_switches_view() {
        let mut session = test_session();

        run_command(parse_command(args("view week")).unwrap(), &mut session).unwrap();

        assert_eq!(session.view, CalendarView::TimeGridWeek);
        assert_eq!(run_command(Command::View(None), &mut session).unwrap(), "timeGridWeek");
    }
}
