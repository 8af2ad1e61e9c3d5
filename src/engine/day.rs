use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use derive_more::Display;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::model::time_record::Timestamped;

/// Source of "now" for day-state decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum DayBoundaryError {
    #[display(fmt = "invalid UTC offset {:?}, expected +HH:MM or -HH:MM", _0)]
    Offset(String),
    #[display(fmt = "invalid rollover time {:?}, expected HH:MM", _0)]
    Rollover(String),
}

impl std::error::Error for DayBoundaryError {}

/// Where one business day ends and the next begins.
///
/// A day is the local calendar date at a fixed UTC offset, shifted by a
/// rollover time: with a rollover of `04:00`, a shift closing at 02:00 still
/// belongs to the previous day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary {
    offset_seconds: i32,
    rollover: NaiveTime,
}

impl Default for DayBoundary {
    /// UTC midnight.
    fn default() -> Self {
        Self {
            offset_seconds: 0,
            rollover: NaiveTime::default(),
        }
    }
}

impl DayBoundary {
    pub fn new(offset_seconds: i32, rollover: NaiveTime) -> Result<Self, DayBoundaryError> {
        if offset_seconds.abs() >= 24 * 3600 {
            return Err(DayBoundaryError::Offset(offset_seconds.to_string()));
        }
        Ok(Self {
            offset_seconds,
            rollover,
        })
    }

    /// Parses `"-05:00"` style offsets and `"HH:MM"` rollover times.
    pub fn parse(offset: &str, rollover: &str) -> Result<Self, DayBoundaryError> {
        let offset_seconds =
            parse_offset(offset).ok_or_else(|| DayBoundaryError::Offset(offset.to_string()))?;
        let rollover = NaiveTime::parse_from_str(rollover.trim(), "%H:%M")
            .map_err(|_| DayBoundaryError::Rollover(rollover.to_string()))?;
        Self::new(offset_seconds, rollover)
    }

    fn shift(&self) -> Duration {
        Duration::seconds(
            i64::from(self.offset_seconds) - i64::from(self.rollover.num_seconds_from_midnight()),
        )
    }

    /// Wall-clock time at the configured offset.
    /// Wall-clock time at the configured offset. Saturates at the ends of
    /// the representable range.
    pub fn local_time(&self, ts: DateTime<Utc>) -> NaiveDateTime {
        let naive = ts.naive_utc();
        naive
            .checked_add_signed(Duration::seconds(i64::from(self.offset_seconds)))
            .unwrap_or(naive)
    }

    pub fn business_day(&self, ts: DateTime<Utc>) -> NaiveDate {
        let naive = ts.naive_utc();
        naive
            .checked_add_signed(self.shift())
            .unwrap_or(naive)
            .date()
    }

    /// First instant of `day`, clamped to the representable range.
    pub fn start_of_day(&self, day: NaiveDate) -> DateTime<Utc> {
        let shift = self.shift();
        match day.and_time(NaiveTime::default()).checked_sub_signed(shift) {
            Some(start) => Utc.from_utc_datetime(&start),
            None if shift > Duration::zero() => DateTime::<Utc>::MIN_UTC,
            None => DateTime::<Utc>::MAX_UTC,
        }
    }

    /// Last representable instant of `day`, inclusive.
    pub fn end_of_day(&self, day: NaiveDate) -> DateTime<Utc> {
        self.start_of_day(day)
            .checked_add_signed(Duration::days(1) - Duration::nanoseconds(1))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Records whose business day is `day`, in their original order.
    pub fn records_on<T: Timestamped + Clone>(&self, records: &[T], day: NaiveDate) -> Vec<T> {
        records
            .iter()
            .filter(|r| self.business_day(r.timestamp()) == day)
            .cloned()
            .collect()
    }
}

fn parse_offset(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Some(0);
    }
    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, raw.get(1..)?),
        b'-' => (-1, raw.get(1..)?),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }
    Some(sign * (hours * 3600 + minutes * 60))
}

/// Optional inclusive bounds on business days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateRange {
    /// First day included, `YYYY-MM-DD`.
    pub start: Option<NaiveDate>,
    /// Last day included, `YYYY-MM-DD`.
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if start > end)
    }
}

/// Keeps records inside `range`. With no bounds the input is returned as is.
pub fn filter_by_date_range<T: Timestamped>(
    records: Vec<T>,
    boundary: &DayBoundary,
    range: &DateRange,
) -> Vec<T> {
    if range.is_unbounded() {
        return records;
    }

    let from = range.start.map(|day| boundary.start_of_day(day));
    let until = range.end.map(|day| boundary.end_of_day(day));

    records
        .into_iter()
        .filter(|r| {
            let ts = r.timestamp();
            from.is_none_or(|from| ts >= from) && until.is_none_or(|until| ts <= until)
        })
        .collect()
}
