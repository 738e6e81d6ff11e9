//! Date helpers for note filenames and template bindings.

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::locale::Locale;

/// Localized weekday name (Sunday-indexed tables)
pub fn weekday_name(date: NaiveDate, locale: Locale) -> &'static str {
    locale.weekdays()[date.weekday().num_days_from_sunday() as usize]
}

/// `YYYY-MM-DD_<Weekday>`, the stem of a daily note filename
pub fn formatted_date(date: NaiveDate, locale: Locale) -> String {
    format!("{}_{}", iso_date(date), weekday_name(date, locale))
}

/// `YYYY-MM-DD`
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Thursday of the Monday-based week containing `date`.
fn week_thursday(date: NaiveDate) -> NaiveDate {
    let day_nr = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(day_nr) + Duration::days(3)
}

/// ISO-8601 week number (1..=53): the week that contains the date's Thursday.
pub fn week_number(date: NaiveDate) -> u32 {
    let thursday = week_thursday(date);

    // First Thursday of the Thursday's year
    let jan_first = thursday.with_ordinal(1).unwrap_or(thursday);
    let offset = (4 + 7 - jan_first.weekday().num_days_from_sunday() as i64) % 7;
    let first_thursday = jan_first + Duration::days(offset);

    let days = (thursday - first_thursday).num_days();
    1 + (days as f64 / 7.0).ceil() as u32
}

/// Year the ISO week belongs to; differs from the calendar year around New Year.
pub fn week_year(date: NaiveDate) -> i32 {
    week_thursday(date).year()
}

/// The calendar day before `date`
pub fn previous_calendar_date(date: NaiveDate) -> Option<NaiveDate> {
    date.pred_opt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_formatted_date() {
        assert_eq!(formatted_date(d(2024, 3, 12), Locale::En), "2024-03-12_Tuesday");
        assert_eq!(formatted_date(d(2024, 3, 10), Locale::Zh), "2024-03-10_星期日");
    }

    #[test]
    fn test_week_number_new_year_edges() {
        // Sunday, belongs to the last week of 2022
        assert_eq!(week_number(d(2023, 1, 1)), 52);
        assert_eq!(week_year(d(2023, 1, 1)), 2022);
        // Friday after a 53-week year
        assert_eq!(week_number(d(2021, 1, 1)), 53);
        assert_eq!(week_year(d(2021, 1, 1)), 2020);
        // Saturday
        assert_eq!(week_number(d(2022, 1, 1)), 52);
        // Monday of week 1 in the previous calendar year
        assert_eq!(week_number(d(2024, 12, 30)), 1);
        assert_eq!(week_year(d(2024, 12, 30)), 2025);
        assert_eq!(week_number(d(2020, 12, 31)), 53);
    }

    #[test]
    fn test_week_number_mid_year() {
        assert_eq!(week_number(d(2024, 3, 12)), 11);
        assert_eq!(week_number(d(2024, 1, 1)), 1);
        assert_eq!(week_year(d(2024, 3, 12)), 2024);
    }

    #[test]
    fn test_week_number_matches_iso_calendar() {
        let mut date = d(2015, 1, 1);
        let end = d(2030, 12, 31);
        while date <= end {
            let iso = date.iso_week();
            assert_eq!(week_number(date), iso.week(), "week mismatch for {}", date);
            assert_eq!(week_year(date), iso.year(), "year mismatch for {}", date);
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_previous_calendar_date() {
        assert_eq!(previous_calendar_date(d(2024, 3, 1)), Some(d(2024, 2, 29)));
        assert_eq!(previous_calendar_date(d(2024, 1, 1)), Some(d(2023, 12, 31)));
    }
}
