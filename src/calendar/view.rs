use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Grid layout the rendering surface shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalendarView {
    #[default]
    #[serde(rename = "dayGridMonth")]
    DayGridMonth,
    #[serde(rename = "timeGridWeek")]
    TimeGridWeek,
    #[serde(rename = "timeGridDay")]
    TimeGridDay,
}

impl CalendarView {
    pub const ALL: [CalendarView; 3] = [
        CalendarView::DayGridMonth,
        CalendarView::TimeGridWeek,
        CalendarView::TimeGridDay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CalendarView::DayGridMonth => "dayGridMonth",
            CalendarView::TimeGridWeek => "timeGridWeek",
            CalendarView::TimeGridDay => "timeGridDay",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CalendarView::DayGridMonth => "Month",
            CalendarView::TimeGridWeek => "Week",
            CalendarView::TimeGridDay => "Day",
        }
    }

    /// Parses a stored view name, falling back to the month grid.
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for CalendarView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalendarView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dayGridMonth" | "month" => Ok(CalendarView::DayGridMonth),
            "timeGridWeek" | "week" => Ok(CalendarView::TimeGridWeek),
            "timeGridDay" | "day" => Ok(CalendarView::TimeGridDay),
            other => Err(format!("Unknown calendar view '{}'", other)),
        }
    }
}
