//! Business-timezone time helpers
//!
//! Date <-> timestamp conversion happens at the API/service layer;
//! repositories only receive `i64` Unix millis. A business day runs from
//! the configured cutoff time to the next day's cutoff, so late-night
//! sales land on the day the store actually worked.

use chrono::{Datelike, NaiveDate, NaiveTime};
use chrono_tz::Tz;

use super::AppError;
use super::error::AppResult;

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// Parse a month string (YYYY-MM); returns the first day of the month
pub fn parse_month(month: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid month format: {}", month)))
}

/// Reject dates in the future (business timezone)
pub fn validate_not_future(date: NaiveDate, tz: Tz) -> AppResult<()> {
    let today = chrono::Utc::now().with_timezone(&tz).date_naive();
    if date > today {
        return Err(AppError::validation(format!(
            "Date {} is in the future (today is {})",
            date, today
        )));
    }
    Ok(())
}

/// Date + cutoff time -> Unix millis (business timezone)
///
/// DST gap fallback: when the local time does not exist, fall back to UTC.
pub fn date_cutoff_millis(date: NaiveDate, cutoff: NaiveTime, tz: Tz) -> i64 {
    let naive = date.and_time(cutoff);
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Half-open [start, end) millis window of one business day
pub fn business_day_bounds(date: NaiveDate, cutoff: NaiveTime, tz: Tz) -> (i64, i64) {
    let next = date.succ_opt().unwrap_or(date);
    (
        date_cutoff_millis(date, cutoff, tz),
        date_cutoff_millis(next, cutoff, tz),
    )
}

/// Half-open [start, end) millis window of one calendar month of business days
pub fn month_bounds(first_day: NaiveDate, cutoff: NaiveTime, tz: Tz) -> (i64, i64) {
    let next_month = if first_day.month() == 12 {
        NaiveDate::from_ymd_opt(first_day.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first_day.year(), first_day.month() + 1, 1)
    }
    .unwrap_or(first_day);
    (
        date_cutoff_millis(first_day, cutoff, tz),
        date_cutoff_millis(next_month, cutoff, tz),
    )
}

/// Parse a cutoff string (HH:MM); falls back to 00:00 on malformed input
pub fn parse_cutoff(cutoff: &str) -> NaiveTime {
    NaiveTime::parse_from_str(cutoff, "%H:%M").unwrap_or_else(|e| {
        tracing::warn!(
            "Failed to parse business_day_cutoff '{}': {}, falling back to 00:00",
            cutoff,
            e
        );
        NaiveTime::MIN
    })
}

/// Current business date (business timezone)
///
/// Before the cutoff the store is still on "yesterday's" business day.
pub fn current_business_date(cutoff: NaiveTime, tz: Tz) -> NaiveDate {
    let now = chrono::Utc::now().with_timezone(&tz);
    if now.time() < cutoff {
        (now - chrono::Duration::days(1)).date_naive()
    } else {
        now.date_naive()
    }
}

/// Business date a given timestamp belongs to
pub fn business_date_of(millis: i64, cutoff: NaiveTime, tz: Tz) -> NaiveDate {
    let dt = chrono::DateTime::from_timestamp_millis(millis)
        .unwrap_or_else(chrono::Utc::now)
        .with_timezone(&tz);
    if dt.time() < cutoff {
        (dt - chrono::Duration::days(1)).date_naive()
    } else {
        dt.date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TZ: Tz = chrono_tz::America::Fortaleza;

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2026-08-07").is_ok());
        assert!(parse_date("07/08/2026").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_parse_month() {
        let first = parse_month("2026-08").unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2026, 8, 1).unwrap());
        assert!(parse_month("2026-13").is_err());
    }

    #[test]
    fn test_business_day_bounds_are_half_open() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let cutoff = parse_cutoff("02:00");
        let (start, end) = business_day_bounds(date, cutoff, TZ);
        assert_eq!(end - start, 24 * 60 * 60 * 1000);
    }

    #[test]
    fn test_business_date_of_respects_cutoff() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let cutoff = parse_cutoff("02:00");
        let (start, _) = business_day_bounds(date, cutoff, TZ);

        // One hour after the cutoff belongs to the 7th
        assert_eq!(business_date_of(start + 3_600_000, cutoff, TZ), date);
        // One hour before the cutoff still belongs to the 6th
        assert_eq!(
            business_date_of(start - 3_600_000, cutoff, TZ),
            date.pred_opt().unwrap()
        );
    }

    #[test]
    fn test_parse_cutoff_fallback() {
        assert_eq!(parse_cutoff("02:00"), NaiveTime::from_hms_opt(2, 0, 0).unwrap());
        assert_eq!(parse_cutoff("bogus"), NaiveTime::MIN);
    }

    #[test]
    fn test_month_bounds_span_whole_month() {
        let first = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
        let cutoff = NaiveTime::MIN;
        let (start, end) = business_day_bounds(first, cutoff, TZ);
        let (mstart, mend) = month_bounds(first, cutoff, TZ);
        assert_eq!(mstart, start);
        assert!(mend > end);
        // December has 31 days
        assert_eq!(mend - mstart, 31 * 24 * 60 * 60 * 1000);
    }
}
