//! Time helpers: clock injection and calendar windows
//!
//! All windows are computed on UTC calendar days. A day runs from
//! 00:00:00.000 to 23:59:59.999 inclusive; weeks start on Sunday.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

use shared::{AppError, AppResult};

/// Source of "now" for stores and analytics
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for deterministic tests and replays
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<RwLock<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(RwLock::new(now)),
        }
    }

    /// Clock fixed at `hh:mm:ss` UTC on `date`
    pub fn at(date: NaiveDate, hour: u32, min: u32, sec: u32) -> Self {
        let time = NaiveTime::from_hms_opt(hour, min, sec).unwrap_or(NaiveTime::MIN);
        Self::new(date.and_time(time).and_utc())
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read()
    }
}

/// Parse a calendar date (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 00:00:00.000 UTC of `date`
pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// 23:59:59.999 UTC of `date`
pub fn day_end(date: NaiveDate) -> DateTime<Utc> {
    match date.succ_opt() {
        Some(next) => day_start(next) - Duration::milliseconds(1),
        None => day_start(date),
    }
}

/// Sunday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_sunday() as i64;
    date - Duration::days(offset)
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month `months` before the month containing `date`
pub fn months_back(date: NaiveDate, months: u32) -> NaiveDate {
    let first = month_start(date);
    let total = first.year() * 12 + first.month0() as i32 - months as i32;
    let year = total.div_euclid(12);
    let month0 = total.rem_euclid(12) as u32;
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap_or(first)
}

/// Last day of the month containing `date`
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let first = month_start(date);
    let next = first
        .checked_add_months(chrono::Months::new(1))
        .unwrap_or(first);
    next.pred_opt().unwrap_or(first)
}

/// `days` consecutive calendar days ending with (and including) `today`,
/// oldest first
pub fn trailing_days(today: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..days as i64)
        .rev()
        .map(|back| today - Duration::days(back))
        .collect()
}

/// First days of `months` consecutive calendar months ending with the
/// month containing `today`, oldest first
pub fn trailing_months(today: NaiveDate, months: u32) -> Vec<NaiveDate> {
    (0..months)
        .rev()
        .map(|back| months_back(today, back))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_day_bounds() {
        let d = date("2026-10-16");
        assert_eq!(day_start(d).to_rfc3339(), "2026-10-16T00:00:00+00:00");
        assert_eq!(
            day_end(d).format("%H:%M:%S%.3f").to_string(),
            "23:59:59.999"
        );
    }

    #[test]
    fn test_week_starts_on_sunday() {
        // 2026-10-16 is a Friday
        assert_eq!(week_start(date("2026-10-16")), date("2026-10-11"));
        assert_eq!(week_start(date("2026-10-11")), date("2026-10-11"));
        assert_eq!(week_start(date("2026-10-10")), date("2026-10-04"));
    }

    #[test]
    fn test_month_helpers() {
        assert_eq!(month_start(date("2026-10-16")), date("2026-10-01"));
        assert_eq!(month_end(date("2026-02-10")), date("2026-02-28"));
        assert_eq!(months_back(date("2026-01-31"), 1), date("2025-12-01"));
        assert_eq!(months_back(date("2026-03-31"), 14), date("2025-01-01"));
    }

    #[test]
    fn test_trailing_days_includes_today() {
        let days = trailing_days(date("2026-10-16"), 7);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], date("2026-10-10"));
        assert_eq!(days[6], date("2026-10-16"));
    }

    #[test]
    fn test_trailing_months() {
        let months = trailing_months(date("2026-02-15"), 3);
        assert_eq!(
            months,
            vec![date("2025-12-01"), date("2026-01-01"), date("2026-02-01")]
        );
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::at(date("2026-10-16"), 23, 0, 0);
        assert_eq!(clock.today(), date("2026-10-16"));
        clock.advance(Duration::hours(2));
        assert_eq!(clock.today(), date("2026-10-17"));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("16/10/2026").is_err());
    }
}
