use chrono::{DateTime, Days, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use thiserror::Error;

use crate::calendar::event::{CalendarEvent, DEFAULT_DISPLAY_DURATION_MINUTES};

pub const MAX_TITLE_CHARS: usize = 30;
pub const DEFAULT_COLOR: &str = "#000";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Event name is required")]
    EmptyTitle,
    #[error("Event name cannot exceed 30 characters")]
    TitleTooLong { chars: usize },
    #[error("missing date")]
    MissingDate,
    #[error("missing time")]
    MissingTime,
    #[error("end time must not be before start time")]
    EndBeforeStart,
    #[error("time {0} does not exist at the configured offset")]
    InvalidTimestamp(String),
}

/// Field values of a create/edit form that have not been committed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    /// Days between the start date and the end date.
    pub end_day_offset: u32,
    pub color: String,
    pub notes: Option<String>,
}

impl EventDraft {
    pub fn blank(date: NaiveDate) -> Self {
        Self {
            title: String::new(),
            date: Some(date),
            time: None,
            end_time: None,
            end_day_offset: 0,
            color: DEFAULT_COLOR.to_string(),
            notes: None,
        }
    }

    /// Pre-fills a form from a stored event, expressed at `offset`.
    pub fn for_event(event: &CalendarEvent, offset: FixedOffset) -> Self {
        let start = event.start.with_timezone(&offset);
        let end = event.end.map(|end| end.with_timezone(&offset));
        let end_day_offset = end
            .map(|end| (end.date_naive() - start.date_naive()).num_days().max(0))
            .and_then(|days| u32::try_from(days).ok())
            .unwrap_or(0);
        Self {
            title: event.title.clone(),
            date: Some(start.date_naive()),
            time: Some(start.time()),
            end_time: end.map(|end| end.time()),
            end_day_offset,
            color: event.color.clone(),
            notes: event.notes.clone(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_time(mut self, time: NaiveTime) -> Self {
        self.set_time(time);
        self
    }

    pub fn with_end_time(mut self, end_time: NaiveTime) -> Self {
        self.set_end_time(end_time);
        self
    }

    /// Sets an end on the start date.
    pub fn set_end_time(&mut self, end_time: NaiveTime) {
        self.end_time = Some(end_time);
        self.end_day_offset = 0;
    }

    pub fn clear_end_time(&mut self) {
        self.end_time = None;
        self.end_day_offset = 0;
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Changing the start time never writes an end time; the one-hour
    /// default is only reported through `display_end_time`.
    pub fn set_time(&mut self, time: NaiveTime) {
        self.time = Some(time);
    }

    pub fn display_end_time(&self) -> Option<NaiveTime> {
        self.end_time.or_else(|| {
            self.time
                .map(|t| t.overflowing_add_signed(Duration::minutes(DEFAULT_DISPLAY_DURATION_MINUTES)).0)
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let chars = self.title.chars().count();
        if chars > MAX_TITLE_CHARS {
            return Err(ValidationError::TitleTooLong { chars });
        }
        if self.time.is_none() {
            return Err(ValidationError::MissingTime);
        }
        Ok(())
    }

    /// Resolves the draft into `(start, end)` instants. `fallback_date` is the
    /// clicked or stored date used when the form carries no date of its own.
    pub fn resolve(
        &self,
        fallback_date: Option<NaiveDate>,
        offset: FixedOffset,
    ) -> Result<(DateTime<Utc>, Option<DateTime<Utc>>), ValidationError> {
        self.validate()?;
        let date = self.date.or(fallback_date).ok_or(ValidationError::MissingDate)?;
        let time = self.time.ok_or(ValidationError::MissingTime)?;

        let start = compose_timestamp(date, time, offset)?;
        let end = match self.end_time {
            Some(end_time) => {
                let end_date = date
                    .checked_add_days(Days::new(u64::from(self.end_day_offset)))
                    .ok_or(ValidationError::InvalidTimestamp(format!("{} + {} days", date, self.end_day_offset)))?;
                let end = compose_timestamp(end_date, end_time, offset)?;
                if end < start {
                    return Err(ValidationError::EndBeforeStart);
                }
                Some(end)
            }
            None => None,
        };
        Ok((start, end))
    }

    pub fn normalized_notes(&self) -> Option<String> {
        self.notes.as_ref().filter(|n| !n.trim().is_empty()).cloned()
    }
}

/// Combines the date-only part of `date` with a time-of-day (truncated to
/// minutes) at the given UTC offset.
pub fn compose_timestamp(
    date: NaiveDate,
    time: NaiveTime,
    offset: FixedOffset,
) -> Result<DateTime<Utc>, ValidationError> {
    let time = time
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time);
    let local = date.and_time(time);
    offset
        .from_local_datetime(&local)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| ValidationError::InvalidTimestamp(local.to_string()))
}
