use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Length of an event without a stored end, for display purposes only.
pub const DEFAULT_DISPLAY_DURATION_MINUTES: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(with = "iso_timestamp")]
    pub start: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_timestamp::option")]
    pub end: Option<DateTime<Utc>>,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CalendarEvent {
    pub fn display_end(&self) -> DateTime<Utc> {
        self.end
            .unwrap_or(self.start + Duration::minutes(DEFAULT_DISPLAY_DURATION_MINUTES))
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.display_end() - self.start).num_minutes()
    }

    pub fn overlaps(&self, other: &CalendarEvent) -> bool {
        self.start < other.display_end() && other.start < self.display_end()
    }
}

/// ISO-8601 timestamps with millisecond precision and a `Z` suffix.
pub mod iso_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn parse(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc))
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => serializer.serialize_some(&format(dt)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let raw = Option::<String>::deserialize(deserializer)?;
            raw.map(|s| parse(&s).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}
