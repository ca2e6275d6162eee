use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Validated calculation window. `start <= end` holds for every constructed
/// value; either bound may be the `min`/`max` sentinel, which callers are
/// expected to surface to the user before acting on the range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimeRangeError {
    Unparsable { which: &'static str, input: String },
    Inverted,
}

impl fmt::Display for TimeRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeRangeError::Unparsable { which, input } => {
                write!(f, "could not parse {which} time '{input}'")
            }
            TimeRangeError::Inverted => write!(f, "start time cannot be after end time"),
        }
    }
}

impl std::error::Error for TimeRangeError {}

impl TimeRange {
    pub fn parse(start: &str, end: &str) -> Result<Self, TimeRangeError> {
        let start_time = parse_bound(start).ok_or_else(|| TimeRangeError::Unparsable {
            which: "start",
            input: start.to_string(),
        })?;
        let end_time = parse_bound(end).ok_or_else(|| TimeRangeError::Unparsable {
            which: "end",
            input: end.to_string(),
        })?;
        if start_time > end_time {
            return Err(TimeRangeError::Inverted);
        }
        Ok(Self {
            start: start_time,
            end: end_time,
        })
    }

    /// True when either bound is a sentinel and the range deserves an
    /// explicit verification warning before submission.
    pub fn is_unbounded(&self) -> bool {
        self.start == DateTime::<Utc>::MIN_UTC || self.end == DateTime::<Utc>::MAX_UTC
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", format_bound(self.start), format_bound(self.end))
    }
}

fn format_bound(time: DateTime<Utc>) -> String {
    if time == DateTime::<Utc>::MIN_UTC || time == DateTime::<Utc>::MAX_UTC {
        "unbounded".to_string()
    } else {
        time.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD[ T]HH:MM[:SS]`, a bare date, or the
/// `min`/`max` sentinels. Naive inputs are taken as UTC.
fn parse_bound(input: &str) -> Option<DateTime<Utc>> {
    let trimmed = input.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "min" => return Some(DateTime::<Utc>::MIN_UTC),
        "max" => return Some(DateTime::<Utc>::MAX_UTC),
        _ => {}
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    None
}
