//! Workflow settings backed by a RON file.
//!
//! Folder paths, auto-create behaviour, and the four note templates.
//! Loading merges the stored file over the locale defaults key by key;
//! keys missing from the file keep their default, unknown keys are ignored.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::locale::{Locale, Message};
use crate::error::{WorkflowError, WorkflowResult};
use crate::notes::template;

pub mod defaults {
    pub const DAILY_FOLDER: &str = "workFlow/daily";
    pub const WEEKLY_FOLDER: &str = "workFlow/weekly";
    pub const PROJECT_FOLDER: &str = "workFlow/projects";
    pub const MEETING_FOLDER: &str = "workFlow/meetings";
    pub const AUTO_CREATE: bool = true;
    pub const AUTO_CREATE_TIME: &str = "00:00";
    pub const DATE_FORMAT: &str = "YYYY-MM-DD";
}

const DAILY_TEMPLATE_ZH: &str = r#"---
tags:
  - daily
  - {{date_year}}-W{{week}}
date: "{{date}}"
week: "W{{week}}"
weekDay: "{{weekday}}"
---

# 每周任务
![[workFlow/weekly/{{week_year}}-w{{week}}#主要任务]]

# 当日工作代办
{{incomplete_work}}

# 当日个人代办
{{incomplete_personal}}
"#;

const DAILY_TEMPLATE_EN: &str = r#"---
tags:
  - daily
  - {{date_year}}-W{{week}}
date: "{{date}}"
week: "W{{week}}"
weekDay: "{{weekday}}"
---

# Weekly tasks
![[workFlow/weekly/{{week_year}}-w{{week}}#Main tasks]]

# Work to-do
{{incomplete_work}}

# Personal to-do
{{incomplete_personal}}
"#;

const WEEKLY_TEMPLATE_ZH: &str = r#"---
tags:
  - weekly
  - {{date_year}}-{{date_month}}
  - W{{week}}
---

# 主要任务
"#;

const WEEKLY_TEMPLATE_EN: &str = r#"---
tags:
  - weekly
  - {{date_year}}-{{date_month}}
  - W{{week}}
---

# Main tasks
"#;

const PROJECT_TEMPLATE_ZH: &str = r#"---
aliases:
  - "{{project_name}}"
tags:
  - project
date: "{{date}}"
status: active
---

## 项目资料


## 主要任务


## 相关文件
{{relatedFile}}

## 会议记录

"#;

const PROJECT_TEMPLATE_EN: &str = r#"---
aliases:
  - "{{project_name}}"
tags:
  - project
date: "{{date}}"
status: active
---

## Project materials


## Main tasks


## Related files
{{relatedFile}}

## Meeting notes

"#;

const MEETING_TEMPLATE_ZH: &str = r#"---
tags:
  - meeting
date: "{{date}}"
time: "{{time}}"
links: {{relatedFile}}
---

# {{meeting_name}}

## 会议目标


## 会议内容
1.
2.

## 会议决议

"#;

const MEETING_TEMPLATE_EN: &str = r#"---
tags:
  - meeting
date: "{{date}}"
time: "{{time}}"
links: {{relatedFile}}
---

# {{meeting_name}}

## Goals


## Discussion
1.
2.

## Decisions

"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub daily_folder: String,
    pub weekly_folder: String,
    pub project_folder: String,
    pub meeting_folder: String,
    pub auto_create: bool,
    /// `HH:MM`; auto-create only fires at or after this time of day
    pub auto_create_time: String,
    pub date_format: String,
    #[serde(serialize_with = "locale_as_str")]
    pub language: Locale,
    pub daily_template: String,
    pub weekly_template: String,
    pub project_template: String,
    pub meeting_template: String,
}

/// On-disk shape: every key optional
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoredSettings {
    daily_folder: Option<String>,
    weekly_folder: Option<String>,
    project_folder: Option<String>,
    meeting_folder: Option<String>,
    auto_create: Option<bool>,
    auto_create_time: Option<String>,
    date_format: Option<String>,
    language: Option<String>,
    daily_template: Option<String>,
    weekly_template: Option<String>,
    project_template: Option<String>,
    meeting_template: Option<String>,
}

/// Keys accepted by `Settings::set_field`
pub const SETTING_KEYS: &[&str] = &[
    "dailyFolder",
    "weeklyFolder",
    "projectFolder",
    "meetingFolder",
    "autoCreate",
    "autoCreateTime",
    "dateFormat",
    "language",
    "dailyTemplate",
    "weeklyTemplate",
    "projectTemplate",
    "meetingTemplate",
];

impl Default for Settings {
    fn default() -> Self {
        Self::defaults_for(Locale::default())
    }
}

// Stored as a plain string so unknown languages still load
fn locale_as_str<S: serde::Serializer>(locale: &Locale, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(locale.as_ref())
}

fn ron_options() -> ron::Options {
    ron::Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

impl Settings {
    /// Default folders plus the templates of `locale`
    pub fn defaults_for(locale: Locale) -> Self {
        let (daily, weekly, project, meeting) = match locale {
            Locale::Zh => (
                DAILY_TEMPLATE_ZH,
                WEEKLY_TEMPLATE_ZH,
                PROJECT_TEMPLATE_ZH,
                MEETING_TEMPLATE_ZH,
            ),
            Locale::En => (
                DAILY_TEMPLATE_EN,
                WEEKLY_TEMPLATE_EN,
                PROJECT_TEMPLATE_EN,
                MEETING_TEMPLATE_EN,
            ),
        };
        Self {
            daily_folder: defaults::DAILY_FOLDER.to_string(),
            weekly_folder: defaults::WEEKLY_FOLDER.to_string(),
            project_folder: defaults::PROJECT_FOLDER.to_string(),
            meeting_folder: defaults::MEETING_FOLDER.to_string(),
            auto_create: defaults::AUTO_CREATE,
            auto_create_time: defaults::AUTO_CREATE_TIME.to_string(),
            date_format: defaults::DATE_FORMAT.to_string(),
            language: locale,
            daily_template: daily.to_string(),
            weekly_template: weekly.to_string(),
            project_template: project.to_string(),
            meeting_template: meeting.to_string(),
        }
    }

    /// Merge a stored RON document over the defaults of its language.
    pub fn from_ron(content: &str) -> Result<Self, ron::error::SpannedError> {
        let stored: StoredSettings = ron_options().from_str(content)?;
        Ok(Self::merged(stored))
    }

    fn merged(stored: StoredSettings) -> Self {
        let locale = stored
            .language
            .as_deref()
            .map(Locale::from_str_or_default)
            .unwrap_or_default();
        let base = Self::defaults_for(locale);

        Self {
            daily_folder: stored.daily_folder.unwrap_or(base.daily_folder),
            weekly_folder: stored.weekly_folder.unwrap_or(base.weekly_folder),
            project_folder: stored.project_folder.unwrap_or(base.project_folder),
            meeting_folder: stored.meeting_folder.unwrap_or(base.meeting_folder),
            auto_create: stored.auto_create.unwrap_or(base.auto_create),
            auto_create_time: stored.auto_create_time.unwrap_or(base.auto_create_time),
            date_format: stored.date_format.unwrap_or(base.date_format),
            language: locale,
            daily_template: stored.daily_template.unwrap_or(base.daily_template),
            weekly_template: stored.weekly_template.unwrap_or(base.weekly_template),
            project_template: stored.project_template.unwrap_or(base.project_template),
            meeting_template: stored.meeting_template.unwrap_or(base.meeting_template),
        }
    }

    /// Load from `path`, falling back to defaults on any error.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_ron(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!(
                        "[SETTINGS] Failed to parse {}: {}, using defaults",
                        path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                log::debug!(
                    "[SETTINGS] Could not read {} ({}), using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn to_ron(&self) -> WorkflowResult<String> {
        let pretty = ron::ser::PrettyConfig::default();
        ron::ser::to_string_pretty(self, pretty)
            .map_err(|e| WorkflowError::Settings(format!("Failed to serialize settings: {}", e)))
    }

    /// Serialize to pretty RON and write to `path`.
    pub fn save(&self, path: &Path) -> WorkflowResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                WorkflowError::Settings(format!("Failed to create settings dir: {}", e))
            })?;
        }
        let content = self.to_ron()?;
        std::fs::write(path, content).map_err(|e| {
            WorkflowError::Settings(format!("Failed to write {}: {}", path.display(), e))
        })?;
        log::debug!("[SETTINGS] Saved {}", path.display());
        Ok(())
    }

    /// Restore default folders and the templates of the current language.
    pub fn reset(&mut self) {
        *self = Self::defaults_for(self.language);
    }

    /// Set one field by its stored key.
    pub fn set_field(&mut self, key: &str, value: &str) -> WorkflowResult<()> {
        let locale = self.language;
        let invalid = |msg: Message| WorkflowError::Validation(msg.text(locale));
        match key {
            "dailyFolder" => self.daily_folder = value.trim().to_string(),
            "weeklyFolder" => self.weekly_folder = value.trim().to_string(),
            "projectFolder" => self.project_folder = value.trim().to_string(),
            "meetingFolder" => self.meeting_folder = value.trim().to_string(),
            "autoCreate" => {
                self.auto_create = match value.trim().to_lowercase().as_str() {
                    "true" | "1" | "yes" | "on" => true,
                    "false" | "0" | "no" | "off" => false,
                    _ => return Err(invalid(Message::InvalidSettingValue(key.to_string()))),
                }
            }
            "autoCreateTime" => {
                if chrono::NaiveTime::parse_from_str(value.trim(), "%H:%M").is_err() {
                    return Err(invalid(Message::InvalidSettingValue(key.to_string())));
                }
                self.auto_create_time = value.trim().to_string();
            }
            "dateFormat" => self.date_format = value.to_string(),
            "language" => self.language = Locale::from_str_or_default(value),
            "dailyTemplate" | "weeklyTemplate" | "projectTemplate" | "meetingTemplate" => {
                log::debug!(
                    "[SETTINGS] {} uses placeholders: {:?}",
                    key,
                    template::placeholders_in(value)
                );
                let slot = match key {
                    "dailyTemplate" => &mut self.daily_template,
                    "weeklyTemplate" => &mut self.weekly_template,
                    "projectTemplate" => &mut self.project_template,
                    _ => &mut self.meeting_template,
                };
                *slot = value.to_string();
            }
            _ => return Err(invalid(Message::UnknownSetting(key.to_string()))),
        }
        Ok(())
    }

    /// Parsed `auto_create_time`, midnight when malformed
    pub fn auto_create_after(&self) -> chrono::NaiveTime {
        chrono::NaiveTime::parse_from_str(self.auto_create_time.trim(), "%H:%M")
            .unwrap_or(chrono::NaiveTime::MIN)
    }
}
