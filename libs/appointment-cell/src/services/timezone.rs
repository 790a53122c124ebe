// libs/appointment-cell/src/services/timezone.rs
//
// Local wall-clock <-> UTC instant conversion for the booking form.
use chrono::{
    DateTime, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime,
    SecondsFormat, TimeZone, Timelike, Utc,
};

use shared_config::AppConfig;

use crate::models::BookingValidationError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Zone the clinic reasons in. `Local` follows the process zone (`TZ`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClinicZone {
    Local,
    Fixed(FixedOffset),
}

impl ClinicZone {
    pub fn from_config(config: &AppConfig) -> Self {
        match config.clinic_utc_offset {
            Some(offset) => ClinicZone::Fixed(offset),
            None => ClinicZone::Local,
        }
    }

    pub fn decompose(&self, instant: &DateTime<Utc>) -> (NaiveDate, NaiveTime) {
        match self {
            ClinicZone::Local => decompose_naive(instant, &Local),
            ClinicZone::Fixed(offset) => decompose_naive(instant, offset),
        }
    }

    pub fn compose(&self, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
        match self {
            ClinicZone::Local => compose_naive(date, time, &Local),
            ClinicZone::Fixed(offset) => compose_naive(date, time, offset),
        }
    }
}

/// Strict `YYYY-MM-DD`, zero padded.
pub fn parse_local_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()?;
    (date.format(DATE_FORMAT).to_string() == raw).then_some(date)
}

/// Strict `HH:MM`, zero padded, 24 hour.
pub fn parse_local_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    let time = NaiveTime::parse_from_str(raw, TIME_FORMAT).ok()?;
    (time.format(TIME_FORMAT).to_string() == raw).then_some(time)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Drop seconds and below; slots are compared at minute granularity.
pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

pub fn decompose_naive<Tz: TimeZone>(instant: &DateTime<Utc>, zone: &Tz) -> (NaiveDate, NaiveTime) {
    let local = instant.with_timezone(zone).naive_local();
    (local.date(), truncate_to_minute(local.time()))
}

/// UTC instant -> (`YYYY-MM-DD`, `HH:MM`) in `zone`.
pub fn decompose<Tz: TimeZone>(instant: &DateTime<Utc>, zone: &Tz) -> (String, String) {
    let (date, time) = decompose_naive(instant, zone);
    (format_date(date), format_time(time))
}

/// Wall-clock time in `zone` -> UTC instant. A repeated hour resolves to its
/// earlier occurrence; a skipped hour has no instant.
pub fn compose_naive<Tz: TimeZone>(date: NaiveDate, time: NaiveTime, zone: &Tz) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::new(date, truncate_to_minute(time));
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

/// (`YYYY-MM-DD`, `HH:MM`) in `zone` -> UTC instant.
pub fn compose<Tz: TimeZone>(
    date_local: &str,
    time_local: &str,
    zone: &Tz,
) -> Result<DateTime<Utc>, BookingValidationError> {
    let date = parse_local_date(date_local).ok_or_else(|| BookingValidationError::missing("dateLocal"))?;
    let time = parse_local_time(time_local).ok_or_else(|| BookingValidationError::missing("timeLocal"))?;
    compose_naive(date, time, zone).ok_or_else(|| BookingValidationError::missing("timeLocal"))
}

/// ISO 8601 UTC with milliseconds, e.g. `2025-10-28T13:00:00.000Z`.
pub fn to_wire_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Read a stored `date`/`hour` pair. `date` is normally a full RFC 3339
/// instant; a bare date is combined with `hour` and read as UTC.
pub fn parse_stored_instant(date: &str, hour: &str) -> Option<DateTime<Utc>> {
    let date = date.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(date) {
        return Some(instant.with_timezone(&Utc));
    }

    let day = NaiveDate::parse_from_str(date, DATE_FORMAT).ok()?;
    let hour = hour.trim();
    let time = NaiveTime::parse_from_str(hour, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(hour, TIME_FORMAT))
        .ok()?;
    Some(Utc.from_utc_datetime(&NaiveDateTime::new(day, time)))
}
