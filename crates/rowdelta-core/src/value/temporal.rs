//! Temporal literal parsing.

use crate::errors::{DeltaError, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];
const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// The instant a bare date stands for when compared with a date-time
pub(crate) fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

/// Parse `HH:MM`, `HH:MM:SS` or `HH:MM:SS.nnnnnnnnn`
///
/// # Errors
///
/// `InvalidArgument` when the text matches none of the formats.
pub fn parse_time(text: &str) -> Result<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
        .ok_or_else(|| malformed("time", text))
}

/// Parse `YYYY-MM-DD`
///
/// # Errors
///
/// `InvalidArgument` when the text is not a valid date.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| malformed("date", text))
}

/// Parse `YYYY-MM-DDTHH:MM[:SS[.nnnnnnnnn]]`, or a bare date at midnight
///
/// # Errors
///
/// `InvalidArgument` when the text matches none of the formats.
pub fn parse_date_time(text: &str) -> Result<NaiveDateTime> {
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| parse_date(text).ok().map(midnight))
        .ok_or_else(|| malformed("date/time", text))
}

fn malformed(what: &str, text: &str) -> DeltaError {
    DeltaError::invalid_argument(format!("'{}' is not a valid {} literal", text, what))
}
