//! Normalization of extracted date and time text.
//!
//! Listings show dates without a year ("Friday 15, March"). Dates resolve
//! against the reference clock's current year, and roll over to the next
//! year when they would otherwise fall before yesterday.

use chrono::format::{Parsed, StrftimeItems};
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};

use showtime_shared::{Result, ShowtimeError};

use crate::schema::ConvertSpec;

/// Canonical date output, lexicographically sortable.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Canonical time output, zero-padded 24-hour.
const TIME_FORMAT: &str = "%H%M";

/// Reference "now" in a fixed timezone.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    now: DateTime<FixedOffset>,
}

impl Clock {
    /// Current time at a fixed UTC offset (minutes east of UTC).
    pub fn system(utc_offset_minutes: i32) -> Result<Self> {
        let offset = FixedOffset::east_opt(utc_offset_minutes * 60).ok_or_else(|| {
            ShowtimeError::config(format!("utc offset {utc_offset_minutes} minutes out of range"))
        })?;
        Ok(Self {
            now: Utc::now().with_timezone(&offset),
        })
    }

    /// A clock frozen at `now`.
    pub fn fixed(now: DateTime<FixedOffset>) -> Self {
        Self { now }
    }

    /// A clock frozen at midnight of `date` in UTC.
    pub fn at_date(date: NaiveDate) -> Self {
        Self {
            now: date.and_time(NaiveTime::MIN).and_utc().fixed_offset(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    /// Apply a schema conversion to raw text.
    pub fn convert(&self, spec: &ConvertSpec, raw: &str) -> Result<String> {
        match spec {
            ConvertSpec::Date { format } => normalize_date(raw, format, self.today()),
            ConvertSpec::Time { format } => normalize_time(raw, format),
        }
    }
}

/// Parse year-less date text with `pattern` and emit `YYYY-MM-DD`.
///
/// Resolves against `today`'s year; a result earlier than yesterday is
/// moved to the next year. A year parsed from the text itself is kept as is.
/// Weekday names are accepted but not checked against the resolved year.
pub fn normalize_date(raw: &str, pattern: &str, today: NaiveDate) -> Result<String> {
    let raw = raw.trim();
    let mut parsed = Parsed::new();
    chrono::format::parse(&mut parsed, raw, StrftimeItems::new(pattern))
        .map_err(|e| ShowtimeError::conversion(raw, pattern, e.to_string()))?;

    let (Some(month), Some(day)) = (parsed.month(), parsed.day()) else {
        return Err(ShowtimeError::conversion(
            raw,
            pattern,
            "pattern must yield a month and a day",
        ));
    };

    let build = |year: i32| {
        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            ShowtimeError::conversion(raw, pattern, format!("no such date in {year}"))
        })
    };

    if let Some(year) = parsed.year() {
        return Ok(build(year)?.format(DATE_FORMAT).to_string());
    }

    let yesterday = today - Duration::days(1);
    let mut date = build(today.year())?;
    if date < yesterday {
        date = build(today.year() + 1)?;
    }

    Ok(date.format(DATE_FORMAT).to_string())
}

/// Parse clock text with `pattern` and emit zero-padded 24-hour `HHMM`.
pub fn normalize_time(raw: &str, pattern: &str) -> Result<String> {
    let raw = raw.trim();
    let time = NaiveTime::parse_from_str(raw, pattern)
        .map_err(|e| ShowtimeError::conversion(raw, pattern, e.to_string()))?;
    Ok(time.format(TIME_FORMAT).to_string())
}
