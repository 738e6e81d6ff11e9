//! Carry-over of unfinished work from the most recent prior daily note.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

use super::calendar;
use super::sections::{DailySections, SectionHeadings, parse_sections};
use super::template::{Bindings, Placeholder, expand};
use crate::models::locale::Locale;

static DAILY_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})_").unwrap());

/// Date encoded at the start of a daily note filename, if any
pub fn daily_note_date(file_name: &str) -> Option<NaiveDate> {
    let caps = DAILY_NAME_RE.captures(file_name)?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let day = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Pick the daily note with the latest filename date strictly before `as_of`.
///
/// Names without a leading `YYYY-MM-DD_` date (or with an impossible date)
/// are never candidates. If two names carry the same latest date, which
/// one is returned is unspecified.
pub fn find_latest_prior_daily_note<'a, I>(names: I, as_of: NaiveDate) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .filter_map(|name| daily_note_date(name).map(|date| (date, name)))
        .filter(|(date, _)| *date < as_of)
        .max_by_key(|(date, _)| *date)
        .map(|(_, name)| name)
}

/// Date-derived bindings shared by the daily template
pub fn date_bindings(today: NaiveDate, locale: Locale) -> Bindings {
    Bindings::new()
        .with(Placeholder::Date, calendar::iso_date(today))
        .with(Placeholder::DateYear, today.year().to_string())
        .with(Placeholder::DateMonth, format!("{:02}", today.month()))
        .with(Placeholder::Week, calendar::week_number(today).to_string())
        .with(Placeholder::WeekYear, calendar::week_year(today).to_string())
        .with(Placeholder::Weekday, calendar::weekday_name(today, locale))
}

/// Expand the daily template for `today`, carrying over the sections of
/// `prior_body` when a prior note exists.
pub fn build_daily_note_content(
    today: NaiveDate,
    template: &str,
    prior_body: Option<&str>,
    locale: Locale,
) -> String {
    let sections = match prior_body {
        Some(body) => parse_sections(body, &SectionHeadings::for_locale(locale)),
        None => DailySections::default(),
    };

    let bindings = date_bindings(today, locale)
        .with(Placeholder::IncompleteWork, sections.work.joined())
        .with(Placeholder::IncompletePersonal, sections.personal.joined());

    expand(template, &bindings)
}
