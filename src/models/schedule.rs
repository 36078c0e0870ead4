use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const DEFAULT_OPEN: NaiveTime = match NaiveTime::from_hms_opt(8, 0, 0) {
    Some(t) => t,
    None => panic!("invalid default open time"),
};

pub const DEFAULT_CLOSE: NaiveTime = match NaiveTime::from_hms_opt(20, 0, 0) {
    Some(t) => t,
    None => panic!("invalid default close time"),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Internal lowercase key.
    pub fn key(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }

    /// Accepts full names and three-letter abbreviations in any casing.
    pub fn from_key(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        DayOfWeek::ALL
            .into_iter()
            .find(|d| d.key() == lower || d.key()[..3] == lower)
    }

    /// Backend numbering, Sunday = 0.
    fn from_index(i: u8) -> Option<Self> {
        match i {
            0 => Some(DayOfWeek::Sunday),
            1..=6 => Some(DayOfWeek::ALL[usize::from(i) - 1]),
            _ => None,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&wire_day_key(*self))
    }
}

/// The one place internal day keys are converted to the backend's casing.
pub fn wire_day_key(day: DayOfWeek) -> String {
    capitalize(day.key())
}

fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().to_string() + &c.as_str().to_lowercase(),
    }
}

impl Serialize for DayOfWeek {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&wire_day_key(*self))
    }
}

impl<'de> Deserialize<'de> for DayOfWeek {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Name(String),
            Index(u8),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Name(name) => DayOfWeek::from_key(&name)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid day of week: {name}"))),
            Raw::Index(i) => DayOfWeek::from_index(i)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid day index: {i}"))),
        }
    }
}

/// Parses `HH:MM:SS` or `HH:MM`.
pub fn parse_time(s: &str) -> Result<NaiveTime, String> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| format!("invalid time: {s}"))
}

/// `YYYY-MM-DD`, tolerating a trailing time component.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();
    let head = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").map_err(|_| format!("invalid date: {s}"))
}

pub mod wire_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match t {
            Some(t) => s.serialize_str(&t.format("%H:%M:%S").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw {
            Some(s) if !s.trim().is_empty() => super::parse_time(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}

pub mod wire_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&d.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_date(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OperatingHour {
    pub day_of_week: DayOfWeek,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default, with = "wire_time")]
    pub open_time: Option<NaiveTime>,
    #[serde(default, with = "wire_time")]
    pub close_time: Option<NaiveTime>,
}

impl OperatingHour {
    /// Open 08:00 to 20:00.
    pub fn default_for(day: DayOfWeek) -> Self {
        Self {
            day_of_week: day,
            is_closed: false,
            open_time: Some(DEFAULT_OPEN),
            close_time: Some(DEFAULT_CLOSE),
        }
    }

    pub fn default_week() -> Vec<OperatingHour> {
        DayOfWeek::ALL.into_iter().map(Self::default_for).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarException {
    pub id: i64,
    #[serde(with = "wire_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default, with = "wire_time")]
    pub open_time: Option<NaiveTime>,
    #[serde(default, with = "wire_time")]
    pub close_time: Option<NaiveTime>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewCalendarException {
    #[serde(with = "wire_date")]
    pub date: NaiveDate,
    pub is_closed: bool,
    #[serde(with = "wire_time")]
    pub open_time: Option<NaiveTime>,
    #[serde(with = "wire_time")]
    pub close_time: Option<NaiveTime>,
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_day_key_capitalizes() {
        assert_eq!(wire_day_key(DayOfWeek::Monday), "Monday");
        assert_eq!(wire_day_key(DayOfWeek::Sunday), "Sunday");
    }

    #[test]
    fn test_day_parsing_accepts_any_casing() {
        assert_eq!(DayOfWeek::from_key("WEDNESDAY"), Some(DayOfWeek::Wednesday));
        assert_eq!(DayOfWeek::from_key("fri"), Some(DayOfWeek::Friday));
        assert_eq!(DayOfWeek::from_key("funday"), None);
    }

    #[test]
    fn test_day_from_numeric_index() {
        let day: DayOfWeek = serde_json::from_str("0").unwrap();
        assert_eq!(day, DayOfWeek::Sunday);
        let day: DayOfWeek = serde_json::from_str("1").unwrap();
        assert_eq!(day, DayOfWeek::Monday);
        assert!(serde_json::from_str::<DayOfWeek>("9").is_err());
    }

    #[test]
    fn test_operating_hour_wire_format() {
        let hour = OperatingHour::default_for(DayOfWeek::Tuesday);
        assert_eq!(
            serde_json::to_value(&hour).unwrap(),
            serde_json::json!({
                "dayOfWeek": "Tuesday",
                "isClosed": false,
                "openTime": "08:00:00",
                "closeTime": "20:00:00"
            })
        );
    }

    #[test]
    fn test_operating_hour_short_times_and_nulls() {
        let json = r#"{"dayOfWeek":"saturday","isClosed":true,"openTime":null,"closeTime":""}"#;
        let hour: OperatingHour = serde_json::from_str(json).unwrap();
        assert_eq!(hour.day_of_week, DayOfWeek::Saturday);
        assert!(hour.open_time.is_none());
        assert!(hour.close_time.is_none());

        let json = r#"{"dayOfWeek":"Monday","openTime":"07:30","closeTime":"22:00"}"#;
        let hour: OperatingHour = serde_json::from_str(json).unwrap();
        assert_eq!(hour.open_time, NaiveTime::from_hms_opt(7, 30, 0));
    }

    #[test]
    fn test_default_week_covers_seven_days() {
        let week = OperatingHour::default_week();
        assert_eq!(week.len(), 7);
        assert!(week
            .iter()
            .all(|h| !h.is_closed && h.open_time == Some(DEFAULT_OPEN)));
    }

    #[test]
    fn test_exception_date_with_time_suffix() {
        let json = r#"{"id":4,"date":"2025-12-24T00:00:00","isClosed":true,"reason":"Holiday"}"#;
        let ex: CalendarException = serde_json::from_str(json).unwrap();
        assert_eq!(ex.date, NaiveDate::from_ymd_opt(2025, 12, 24).unwrap());
        assert_eq!(ex.reason.as_deref(), Some("Holiday"));
    }
}
