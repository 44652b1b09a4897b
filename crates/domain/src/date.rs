use crate::slot::SlotTime;
use chrono::prelude::*;
use chrono::Duration;
use chrono_tz::Tz;

/// Parses a calendar date written as `YYYY-MM-DD` (leading zeros optional)
pub fn parse_date(datestr: &str) -> anyhow::Result<NaiveDate> {
    let dates = datestr.trim().split('-').collect::<Vec<_>>();
    if dates.len() != 3 {
        return Err(anyhow::Error::msg(datestr.to_string()));
    }
    let year = dates[0].parse::<i32>();
    let month = dates[1].parse::<u32>();
    let day = dates[2].parse::<u32>();

    let (year, month, day) = match (year, month, day) {
        (Ok(year), Ok(month), Ok(day)) => (year, month, day),
        _ => return Err(anyhow::Error::msg(datestr.to_string())),
    };

    if !(1970..=2100).contains(&year) {
        return Err(anyhow::Error::msg(datestr.to_string()));
    }

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| anyhow::Error::msg(datestr.to_string()))
}

/// The calendar date in `tz` at the given instant
pub fn date_at(timestamp_millis: i64, tz: &Tz) -> NaiveDate {
    tz.timestamp_millis_opt(timestamp_millis)
        .single()
        .map(|dt| dt.date_naive())
        .unwrap_or_else(|| {
            Utc.timestamp_millis_opt(timestamp_millis)
                .single()
                .map(|dt| dt.date_naive())
                .unwrap_or_default()
        })
}

/// The first and last day (both inclusive) that can be booked when the
/// current date is `today`: tomorrow up to 30 days from today.
pub fn booking_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today + Duration::days(1), today + Duration::days(30))
}

pub fn is_within_booking_window(date: NaiveDate, today: NaiveDate) -> bool {
    let (first, last) = booking_window(today);
    date >= first && date <= last
}

/// The instant at which `time` occurs on `date` in `tz`.
///
/// Wall clock times that are skipped by a DST transition resolve to the
/// instant one hour later; ambiguous ones resolve to the earliest instant.
pub fn local_timestamp_millis(date: NaiveDate, time: &SlotTime, tz: &Tz) -> i64 {
    let naive = date.and_time(
        NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or_default(),
    );
    match tz.from_local_datetime(&naive).earliest() {
        Some(dt) => dt.timestamp_millis(),
        None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.timestamp_millis())
            .unwrap_or_else(|| Utc.from_utc_datetime(&naive).timestamp_millis()),
    }
}

/// e.g. `Tuesday, 20 October 2026`
pub fn format_long_date(date: &NaiveDate) -> String {
    date.format("%A, %-d %B %Y").to_string()
}

/// e.g. `Oct 20`
pub fn format_short_date(date: &NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono_tz::{Asia::Kolkata, UTC};

    #[test]
    fn it_accepts_valid_dates() {
        let valid_dates = vec![
            "2018-1-1",
            "2025-12-31",
            "2020-1-12",
            "2020-2-29",
            "2020-02-2",
            "2020-02-02",
            "2020-2-09",
        ];

        for date in &valid_dates {
            assert!(parse_date(date).is_ok(), "{}", date);
        }
        assert_eq!(
            parse_date("2026-10-20").unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()
        );
    }

    #[test]
    fn it_rejects_invalid_dates() {
        let invalid_dates = vec![
            "2018--1-1",
            "2020-1-32",
            "2020-0-1",
            "2020-13-1",
            "2019-2-29",
            "1969-12-31",
            "2020-1-1-1",
            "20201-1",
            "tomorrow",
            "",
        ];

        for date in &invalid_dates {
            assert!(parse_date(date).is_err(), "{}", date);
        }
    }

    #[test]
    fn computes_booking_window() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let (first, last) = booking_window(today);
        assert_eq!(first, NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2026, 11, 18).unwrap());

        assert!(!is_within_booking_window(today, today));
        assert!(is_within_booking_window(first, today));
        assert!(is_within_booking_window(last, today));
        assert!(!is_within_booking_window(last + Duration::days(1), today));
    }

    #[test]
    fn resolves_dates_in_timezone() {
        // 2026-10-19T20:00:00Z is already the 20th in India
        let ts = Utc
            .with_ymd_and_hms(2026, 10, 19, 20, 0, 0)
            .unwrap()
            .timestamp_millis();
        assert_eq!(date_at(ts, &UTC), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(date_at(ts, &Kolkata), NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
    }

    #[test]
    fn computes_local_timestamps() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        let time = "2:30 PM".parse::<SlotTime>().unwrap();
        let expected = Utc
            .with_ymd_and_hms(2026, 10, 20, 9, 0, 0)
            .unwrap()
            .timestamp_millis();
        assert_eq!(local_timestamp_millis(date, &time, &Kolkata), expected);
    }

    #[test]
    fn formats_dates() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        assert_eq!(format_long_date(&date), "Tuesday, 20 October 2026");
        assert_eq!(format_short_date(&date), "Oct 20");
    }
}
