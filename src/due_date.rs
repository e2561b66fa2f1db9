use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;

static DUE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:due\s+date|due\s+on|due\s+by|due|deadline)\s*[:\-]?\s*")
        .expect("due label pattern is valid")
});

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Known placeholder strings the LMS renders instead of a timestamp.
/// Not exhaustive: anything else goes through date parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueSentinel {
    DueToday,
    NoDueDate,
}

impl DueSentinel {
    pub fn recognize(value: &str) -> Option<Self> {
        let normalized = value.trim().trim_end_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "due today" | "today" | "all day" | "end of day" => Some(DueSentinel::DueToday),
            "no due date" | "no due date set" | "none" | "n/a" | "-" => {
                Some(DueSentinel::NoDueDate)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DueDate {
    At(DateTime<Utc>),
    Sentinel(DueSentinel),
    Missing,
    Unparseable(String),
}

impl DueDate {
    /// Whole days until due, rounded up. `None` means the neutral horizon applies.
    pub fn days_until(&self, now: DateTime<Utc>) -> Option<i64> {
        match self {
            DueDate::At(instant) => Some(days_between(now, *instant)),
            DueDate::Sentinel(DueSentinel::DueToday) => Some(0),
            DueDate::Sentinel(DueSentinel::NoDueDate)
            | DueDate::Missing
            | DueDate::Unparseable(_) => None,
        }
    }
}

pub fn parse_due_date(raw: Option<&str>) -> DueDate {
    let Some(raw) = raw else {
        return DueDate::Missing;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DueDate::Missing;
    }
    if let Some(sentinel) = DueSentinel::recognize(trimmed) {
        return DueDate::Sentinel(sentinel);
    }

    let unlabelled = DUE_LABEL.replace(trimmed, "");
    let unlabelled = unlabelled.trim();
    if let Some(sentinel) = DueSentinel::recognize(unlabelled) {
        return DueDate::Sentinel(sentinel);
    }

    match parse_instant(unlabelled) {
        Some(instant) => DueDate::At(instant),
        None => DueDate::Unparseable(raw.to_string()),
    }
}

fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed.and_utc());
        }
    }

    // A bare date is due at the end of that day.
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(end_of_day()).and_utc())
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

pub fn days_between(now: DateTime<Utc>, due: DateTime<Utc>) -> i64 {
    let millis = (due - now).num_milliseconds() as f64;
    let days = (millis / Duration::days(1).num_milliseconds() as f64).ceil();
    // `-0.0` from ceil still casts to 0
    days as i64
}
