//! Daily note section parser.
//!
//! Collects the lines under the work and personal headings of a daily note,
//! keeping their authored order and indentation. Completed tasks and
//! horizontal rules are dropped; any other top-level heading closes the
//! current section. Trailing blank lines of each section are trimmed.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::locale::Locale;

static COMPLETED_TASK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*[-*+] \[x\]").unwrap());
static OPEN_TASK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[-*+] \[ \]").unwrap());
static RULE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:-{3,}|\*{3,}|_{3,})\s*$").unwrap());

/// Headings that open the two carried-over sections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeadings {
    pub work: String,
    pub personal: String,
}

impl SectionHeadings {
    pub fn new(work: impl Into<String>, personal: impl Into<String>) -> Self {
        Self {
            work: work.into(),
            personal: personal.into(),
        }
    }

    pub fn for_locale(locale: Locale) -> Self {
        Self::new(locale.work_heading(), locale.personal_heading())
    }
}

/// Classification of a line inside a section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionLine {
    /// Unchecked checkbox line
    Task(String),
    /// Any other non-empty line
    Record(String),
    Blank(String),
}

impl SectionLine {
    fn classify(line: &str) -> Self {
        if line.trim().is_empty() {
            SectionLine::Blank(line.to_string())
        } else if OPEN_TASK_RE.is_match(line) {
            SectionLine::Task(line.to_string())
        } else {
            SectionLine::Record(line.to_string())
        }
    }

    pub fn text(&self) -> &str {
        match self {
            SectionLine::Task(s) | SectionLine::Record(s) | SectionLine::Blank(s) => s,
        }
    }
}

/// Surviving lines of one section, in authored order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub lines: Vec<SectionLine>,
}

impl Section {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Unfinished task lines only
    pub fn tasks(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|l| match l {
                SectionLine::Task(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Record lines only
    pub fn records(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|l| match l {
                SectionLine::Record(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    /// All lines verbatim
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(SectionLine::text).collect()
    }

    /// Lines joined with `\n`, as bound into the daily template
    pub fn joined(&self) -> String {
        self.texts().join("\n")
    }

    fn trim_trailing_blanks(&mut self) {
        while matches!(self.lines.last(), Some(SectionLine::Blank(_))) {
            self.lines.pop();
        }
    }
}

/// Parsed work and personal sections of a daily note
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailySections {
    pub work: Section,
    pub personal: Section,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Current {
    None,
    Work,
    Personal,
}

fn is_top_level_heading(trimmed: &str) -> bool {
    trimmed.starts_with("# ") || trimmed == "#"
}

/// Split a daily note body into its work and personal sections.
pub fn parse_sections(body: &str, headings: &SectionHeadings) -> DailySections {
    let work_heading = headings.work.trim();
    let personal_heading = headings.personal.trim();

    let mut sections = DailySections::default();
    let mut current = Current::None;

    for line in body.lines() {
        let trimmed = line.trim();

        if trimmed == work_heading {
            current = Current::Work;
            continue;
        }
        if trimmed == personal_heading {
            current = Current::Personal;
            continue;
        }
        if is_top_level_heading(trimmed) {
            current = Current::None;
            continue;
        }

        let target = match current {
            Current::None => continue,
            Current::Work => &mut sections.work,
            Current::Personal => &mut sections.personal,
        };

        if COMPLETED_TASK_RE.is_match(line) || RULE_RE.is_match(line) {
            continue;
        }
        target.lines.push(SectionLine::classify(line));
    }

    sections.work.trim_trailing_blanks();
    sections.personal.trim_trailing_blanks();

    log::debug!(
        "[DAILY] Parsed sections: {} work line(s), {} personal line(s)",
        sections.work.lines.len(),
        sections.personal.lines.len()
    );

    sections
}
