//! Locale tables: weekday names, fixed headings, and user-facing messages.
//!
//! Two locales are supported. Headings are matched literally by the section
//! parser and the structural editor, so they must stay in sync with the
//! default templates in `models::settings`.

use strum::{AsRefStr, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Locale {
    #[default]
    Zh,
    En,
}

const WEEKDAYS_ZH: [&str; 7] = [
    "星期日", "星期一", "星期二", "星期三", "星期四", "星期五", "星期六",
];
const WEEKDAYS_EN: [&str; 7] = [
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
];

impl Locale {
    /// Parse from string, falling back to the default locale if unknown
    pub fn from_str_or_default(s: &str) -> Self {
        s.trim().to_lowercase().parse().unwrap_or_default()
    }

    /// Weekday name table indexed by day of week, Sunday = 0
    pub fn weekdays(self) -> &'static [&'static str; 7] {
        match self {
            Locale::Zh => &WEEKDAYS_ZH,
            Locale::En => &WEEKDAYS_EN,
        }
    }

    /// Heading that opens the work section of a daily note
    pub fn work_heading(self) -> &'static str {
        match self {
            Locale::Zh => "# 当日工作代办",
            Locale::En => "# Work to-do",
        }
    }

    /// Heading that opens the personal section of a daily note
    pub fn personal_heading(self) -> &'static str {
        match self {
            Locale::Zh => "# 当日个人代办",
            Locale::En => "# Personal to-do",
        }
    }

    /// Heading in a project index under which meeting links are collected
    pub fn meeting_notes_heading(self) -> &'static str {
        match self {
            Locale::Zh => "## 会议记录",
            Locale::En => "## Meeting notes",
        }
    }
}

/// User-facing strings shown by prompts and notices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    PromptProjectName,
    PromptMeetingName,
    InputRequired,
    ProjectNameRequired,
    ProjectExists,
    MeetingNameRequired,
    MeetingExists,
    /// Name contains a path separator or is only dots
    InvalidName(String),
    ProjectIndexMissing(String),
    UnknownSetting(String),
    InvalidSettingValue(String),
    ActionUnavailable,
}

impl Message {
    pub fn text(&self, locale: Locale) -> String {
        match (self, locale) {
            (Message::PromptProjectName, Locale::Zh) => "请输入项目名称".to_string(),
            (Message::PromptProjectName, Locale::En) => "Enter project name".to_string(),
            (Message::PromptMeetingName, Locale::Zh) => "请输入会议名称".to_string(),
            (Message::PromptMeetingName, Locale::En) => "Enter meeting name".to_string(),
            (Message::InputRequired, Locale::Zh) => "输入不能为空".to_string(),
            (Message::InputRequired, Locale::En) => "Input cannot be empty".to_string(),
            (Message::ProjectNameRequired, Locale::Zh) => "项目名称不能为空".to_string(),
            (Message::ProjectNameRequired, Locale::En) => {
                "Project name cannot be empty".to_string()
            }
            (Message::ProjectExists, Locale::Zh) => {
                "已存在同名项目（或索引文件），请更换名称".to_string()
            }
            (Message::ProjectExists, Locale::En) => {
                "A project or index file already exists; choose a different name".to_string()
            }
            (Message::MeetingNameRequired, Locale::Zh) => "会议名称不能为空".to_string(),
            (Message::MeetingNameRequired, Locale::En) => {
                "Meeting name cannot be empty".to_string()
            }
            (Message::MeetingExists, Locale::Zh) => "今日已存在同名会议记录".to_string(),
            (Message::MeetingExists, Locale::En) => {
                "A meeting note with this name already exists today".to_string()
            }
            (Message::InvalidName(name), Locale::Zh) => {
                format!("名称“{}”无效：不能包含 / 或 \\，也不能只由 . 组成", name)
            }
            (Message::InvalidName(name), Locale::En) => format!(
                "Invalid name \"{}\": it cannot contain / or \\ or consist only of dots",
                name
            ),
            (Message::ProjectIndexMissing(project), Locale::Zh) => {
                format!("未找到项目“{}”的索引文件，已跳过追加会议链接。", project)
            }
            (Message::ProjectIndexMissing(project), Locale::En) => format!(
                "Project index not found for \"{}\"; skipped adding meeting link.",
                project
            ),
            (Message::UnknownSetting(key), Locale::Zh) => format!("未知的设置项: {}", key),
            (Message::UnknownSetting(key), Locale::En) => format!("Unknown setting: {}", key),
            (Message::InvalidSettingValue(key), Locale::Zh) => {
                format!("设置项 {} 的值无效", key)
            }
            (Message::InvalidSettingValue(key), Locale::En) => {
                format!("Invalid value for setting {}", key)
            }
            (Message::ActionUnavailable, Locale::Zh) => "当前笔记不支持该操作".to_string(),
            (Message::ActionUnavailable, Locale::En) => {
                "This action is not available for the note".to_string()
            }
        }
    }
}
