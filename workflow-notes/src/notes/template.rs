//! `{{name}}` placeholder substitution for note templates.
//!
//! Expansion is a single left-to-right pass: bound values are copied into the
//! output verbatim and never rescanned, so a value containing `{{...}}` is not
//! expanded again and the order of bindings cannot change the result.
//! Unbound placeholders are left as literal text. A key is any run of
//! characters other than braces.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use strum::AsRefStr;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]+)\}\}").unwrap());

/// Placeholders bound by the note creation flows
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum Placeholder {
    #[strum(serialize = "date")]
    Date,
    #[strum(serialize = "date_year")]
    DateYear,
    #[strum(serialize = "date_month")]
    DateMonth,
    #[strum(serialize = "week")]
    Week,
    #[strum(serialize = "week_year")]
    WeekYear,
    #[strum(serialize = "weekday")]
    Weekday,
    #[strum(serialize = "incomplete_work")]
    IncompleteWork,
    #[strum(serialize = "incomplete_personal")]
    IncompletePersonal,
    #[strum(serialize = "project_name")]
    ProjectName,
    #[strum(serialize = "meeting_name")]
    MeetingName,
    #[strum(serialize = "time")]
    Time,
    #[strum(serialize = "relatedFile")]
    RelatedFile,
}

/// Placeholder name -> value
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: BTreeMap<String, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.set(placeholder.as_ref(), value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Replace every bound `{{name}}` in `template`.
pub fn expand(template: &str, bindings: &Bindings) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| match bindings.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Names of all placeholders present in `template`, in order of first appearance
pub fn placeholders_in(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for cap in PLACEHOLDER_RE.captures_iter(template) {
        let name = cap[1].to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}
