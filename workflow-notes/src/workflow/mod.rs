//! Note workflows: daily, weekly, project and meeting notes, plus the
//! context actions offered for an existing note.
//!
//! Every flow reads the current time from its caller and talks to the vault
//! only through the `DocumentStore`. Flows stop at the first store failure and
//! leave notes that were already created in place.

pub mod prompt;

use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;
use strum::{AsRefStr, EnumString};

use crate::error::{StoreError, WorkflowError, WorkflowResult};
use crate::models::{Locale, Message, Settings};
use crate::notes::continuity::{self, build_daily_note_content, find_latest_prior_daily_note};
use crate::notes::store::{DocumentStore, Entry, Note, ensure_folder};
use crate::notes::template::{Placeholder, expand};
use crate::notes::{calendar, editor, file_ops, frontmatter};
use prompt::{PromptRequest, Prompter};

/// Actions offered for a note depending on where it lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ContextAction {
    CreateRelatedProject,
    CreateRelatedMeeting,
    AddToWeeklyTasks,
    AddHeadingToWeeklyTasks,
}

/// A project folder and its index note, if the index exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEntry {
    pub name: String,
    pub index: Option<Note>,
}

#[derive(Debug, Clone, Copy)]
enum NameKind {
    Project,
    Meeting(NaiveDate),
}

/// A name usable as one path component: no separators, not `.`/`..`-like
fn is_single_component(name: &str) -> bool {
    !name.contains(['/', '\\']) && !name.chars().all(|c| c == '.')
}

pub struct Workflow {
    settings: Settings,
    store: Arc<dyn DocumentStore>,
    prompter: Arc<dyn Prompter>,
}

impl Workflow {
    pub fn new(settings: Settings, store: Arc<dyn DocumentStore>, prompter: Arc<dyn Prompter>) -> Self {
        Self {
            settings,
            store,
            prompter,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn locale(&self) -> Locale {
        self.settings.language
    }

    fn invalid(&self, message: Message) -> WorkflowError {
        WorkflowError::Validation(message.text(self.locale()))
    }

    /// Log a missing-collaborator condition and show it to the user
    fn notify(&self, message: Message) {
        let text = message.text(self.locale());
        log::warn!("{}", text);
        self.prompter.notice(&text);
    }

    async fn create_note(&self, tag: &str, path: &str, content: &str) -> WorkflowResult<Note> {
        match self.store.create(path, content).await {
            Ok(note) => {
                log::info!("[{}] Created {}", tag, note.path);
                Ok(note)
            }
            Err(e) => {
                log::error!("[{}] Failed to create {}: {}", tag, path, e);
                Err(e.into())
            }
        }
    }

    async fn ensure_folder(&self, tag: &str, folder: &str) -> WorkflowResult<()> {
        ensure_folder(self.store.as_ref(), folder).await.map_err(|e| {
            log::error!("[{}] Failed to prepare folder {}: {}", tag, folder, e);
            WorkflowError::from(e)
        })
    }

    // ---- paths ----

    pub fn daily_note_path(&self, date: NaiveDate) -> String {
        let name = format!("{}.md", calendar::formatted_date(date, self.locale()));
        file_ops::join_path(&self.settings.daily_folder, &name)
    }

    pub fn weekly_note_path(&self, date: NaiveDate) -> String {
        let name = format!(
            "{}-w{}.md",
            calendar::week_year(date),
            calendar::week_number(date)
        );
        file_ops::join_path(&self.settings.weekly_folder, &name)
    }

    pub fn project_folder_path(&self, project: &str) -> String {
        file_ops::join_path(&self.settings.project_folder, project)
    }

    pub fn project_index_path(&self, project: &str) -> String {
        file_ops::join_path(
            &self.project_folder_path(project),
            &format!("{}-index.md", project),
        )
    }

    pub fn meeting_note_path(&self, date: NaiveDate, meeting: &str) -> String {
        file_ops::join_path(
            &self.settings.meeting_folder,
            &format!("{}_{}.md", calendar::iso_date(date), meeting),
        )
    }

    // ---- daily ----

    /// Open today's daily note, creating it first if needed.
    pub async fn create_or_open_daily(&self, now: NaiveDateTime) -> WorkflowResult<Note> {
        let today = now.date();
        let path = self.daily_note_path(today);

        if let Some(handle) = self.store.find_open_document(&path).await {
            log::debug!("[DAILY] {} is already open, focusing it", handle.path);
            return Ok(Note::new(handle.path));
        }

        match self.store.entry(&path).await {
            Entry::File(note) => {
                log::debug!("[DAILY] Opening existing {}", note.path);
                self.store.open_in_editor(&note).await?;
                Ok(note)
            }
            Entry::Folder(_) => Err(StoreError::NotAFile(path).into()),
            Entry::Missing => self.create_daily_note(today).await,
        }
    }

    /// Startup hook: create today's note if auto-create is on, the configured
    /// time of day has passed, and the note does not exist yet.
    pub async fn auto_create_daily(&self, now: NaiveDateTime) -> WorkflowResult<Option<Note>> {
        if !self.settings.auto_create {
            log::debug!("[DAILY] Auto-create disabled");
            return Ok(None);
        }
        if now.time() < self.settings.auto_create_after() {
            log::debug!(
                "[DAILY] Auto-create waits until {}",
                self.settings.auto_create_time
            );
            return Ok(None);
        }
        let path = self.daily_note_path(now.date());
        if self.store.exists(&path).await {
            return Ok(None);
        }
        self.create_daily_note(now.date()).await.map(Some)
    }

    /// Create the daily note for `today`, carrying over unfinished work from
    /// the latest earlier daily note, and make sure this week's weekly note
    /// exists.
    pub async fn create_daily_note(&self, today: NaiveDate) -> WorkflowResult<Note> {
        let folder = self.settings.daily_folder.clone();
        self.ensure_folder("DAILY", &folder).await?;

        let children = self.store.list_children(&folder).await?;
        let prior_body = match find_latest_prior_daily_note(children.files.iter().map(String::as_str), today) {
            Some(prior) => {
                log::debug!("[DAILY] Carrying over from {}", prior);
                Some(self.store.read(&file_ops::join_path(&folder, prior)).await?)
            }
            None => {
                log::debug!("[DAILY] No earlier daily note before {}", today);
                None
            }
        };

        let content = build_daily_note_content(
            today,
            &self.settings.daily_template,
            prior_body.as_deref(),
            self.locale(),
        );
        let note = self
            .create_note("DAILY", &self.daily_note_path(today), &content)
            .await?;

        self.ensure_weekly_note(today).await?;
        self.store.open_in_editor(&note).await?;
        Ok(note)
    }

    // ---- weekly ----

    pub async fn create_or_open_weekly(&self, today: NaiveDate) -> WorkflowResult<Note> {
        let note = self.ensure_weekly_note(today).await?;
        self.store.open_in_editor(&note).await?;
        Ok(note)
    }

    /// The weekly note for the week of `today`, created if missing
    pub async fn ensure_weekly_note(&self, today: NaiveDate) -> WorkflowResult<Note> {
        let path = self.weekly_note_path(today);
        match self.store.entry(&path).await {
            Entry::File(note) => Ok(note),
            Entry::Folder(_) => Err(StoreError::NotAFile(path).into()),
            Entry::Missing => {
                self.ensure_folder("WEEKLY", &self.settings.weekly_folder)
                    .await?;
                let content = expand(
                    &self.settings.weekly_template,
                    &continuity::date_bindings(today, self.locale()),
                );
                self.create_note("WEEKLY", &path, &content).await
            }
        }
    }

    // ---- names ----

    /// Trimmed project name, or the reason it is rejected
    pub async fn validate_project_name(&self, name: &str) -> Result<String, Message> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Message::ProjectNameRequired);
        }
        if !is_single_component(name) {
            return Err(Message::InvalidName(name.to_string()));
        }
        if self.store.exists(&self.project_folder_path(name)).await
            || self.store.exists(&self.project_index_path(name)).await
        {
            return Err(Message::ProjectExists);
        }
        Ok(name.to_string())
    }

    /// Trimmed meeting name, or the reason it is rejected
    pub async fn validate_meeting_name(&self, date: NaiveDate, name: &str) -> Result<String, Message> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Message::MeetingNameRequired);
        }
        if !is_single_component(name) {
            return Err(Message::InvalidName(name.to_string()));
        }
        if self.store.exists(&self.meeting_note_path(date, name)).await {
            return Err(Message::MeetingExists);
        }
        Ok(name.to_string())
    }

    async fn validate_name(&self, kind: NameKind, name: &str) -> Result<String, Message> {
        match kind {
            NameKind::Project => self.validate_project_name(name).await,
            NameKind::Meeting(date) => self.validate_meeting_name(date, name).await,
        }
    }

    /// A given name must be valid as is. Without one, prompt until the
    /// answer validates or the prompt is cancelled (`Ok(None)`).
    async fn resolve_name(&self, kind: NameKind, given: Option<&str>) -> WorkflowResult<Option<String>> {
        if let Some(name) = given {
            return self
                .validate_name(kind, name)
                .await
                .map(Some)
                .map_err(|m| self.invalid(m));
        }

        let question = match kind {
            NameKind::Project => Message::PromptProjectName,
            NameKind::Meeting(_) => Message::PromptMeetingName,
        };
        let mut hint = None;
        loop {
            let request = PromptRequest::new(question.text(self.locale())).with_hint(hint.take());
            let Some(answer) = self.prompter.prompt(request).await else {
                return Ok(None);
            };
            match self.validate_name(kind, &answer).await {
                Ok(name) => return Ok(Some(name)),
                Err(reason) => hint = Some(reason.text(self.locale())),
            }
        }
    }

    // ---- projects ----

    /// Create `<projects>/<name>/<name>-index.md`. `related` is linked through
    /// the `relatedFile` placeholder.
    pub async fn create_project(
        &self,
        today: NaiveDate,
        name: Option<&str>,
        related: Option<&Note>,
    ) -> WorkflowResult<Option<Note>> {
        let Some(name) = self.resolve_name(NameKind::Project, name).await? else {
            log::debug!("[PROJECT] Creation cancelled");
            return Ok(None);
        };

        self.ensure_folder("PROJECT", &self.settings.project_folder)
            .await?;
        self.store
            .create_folder(&self.project_folder_path(&name))
            .await?;

        let related_file = related
            .map(|note| file_ops::wikilink(note.link_text()))
            .unwrap_or_default();
        let bindings = continuity::date_bindings(today, self.locale())
            .with(Placeholder::ProjectName, name.as_str())
            .with(Placeholder::RelatedFile, related_file);
        let content = expand(&self.settings.project_template, &bindings);

        let note = self
            .create_note("PROJECT", &self.project_index_path(&name), &content)
            .await?;
        self.store.open_in_editor(&note).await?;
        Ok(Some(note))
    }

    pub async fn find_project_index(&self, project: &str) -> Option<Note> {
        match self.store.entry(&self.project_index_path(project)).await {
            Entry::File(note) => Some(note),
            _ => None,
        }
    }

    /// Project folders with their index notes, sorted by name
    pub async fn list_projects(&self) -> WorkflowResult<Vec<ProjectEntry>> {
        if !matches!(
            self.store.entry(&self.settings.project_folder).await,
            Entry::Folder(_)
        ) {
            return Ok(Vec::new());
        }
        let mut folders = self
            .store
            .list_children(&self.settings.project_folder)
            .await?
            .folders;
        folders.sort();

        let mut projects = Vec::with_capacity(folders.len());
        for name in folders {
            let index = self.find_project_index(&name).await;
            projects.push(ProjectEntry { name, index });
        }
        Ok(projects)
    }

    /// Open a project's index note; a missing index is a notice.
    pub async fn open_project_index(&self, project: &str) -> WorkflowResult<Option<Note>> {
        match self.find_project_index(project).await {
            Some(note) => {
                self.store.open_in_editor(&note).await?;
                Ok(Some(note))
            }
            None => {
                self.notify(Message::ProjectIndexMissing(project.to_string()));
                Ok(None)
            }
        }
    }

    /// Project folder name of a note stored inside a project folder
    pub fn project_of(&self, note: &Note) -> Option<String> {
        if !file_ops::is_within(&note.path, &self.settings.project_folder) {
            return None;
        }
        let prefix = self.settings.project_folder.trim_matches('/');
        let rest = note.path[prefix.len()..].trim_start_matches('/');
        rest.split_once('/').map(|(project, _)| project.to_string())
    }

    // ---- meetings ----

    /// Create `<meetings>/<date>_<name>.md`.
    ///
    /// The meeting name becomes a frontmatter alias. With a project whose
    /// index exists, `relatedFile` links the index and the index gets a link
    /// back under its meeting-notes heading; otherwise `relatedFile` links
    /// `related`.
    pub async fn create_meeting(
        &self,
        now: NaiveDateTime,
        name: Option<&str>,
        related: Option<&Note>,
        project: Option<&str>,
    ) -> WorkflowResult<Option<Note>> {
        let today = now.date();
        let Some(name) = self.resolve_name(NameKind::Meeting(today), name).await? else {
            log::debug!("[MEETING] Creation cancelled");
            return Ok(None);
        };

        let project_index = match project {
            Some(project) => {
                let index = self.find_project_index(project).await;
                if index.is_none() {
                    self.notify(Message::ProjectIndexMissing(project.to_string()));
                }
                index
            }
            None => None,
        };

        let related_file = match (&project_index, related) {
            (Some(index), _) => file_ops::quoted_wikilink(index.link_text()),
            (None, Some(note)) => file_ops::quoted_wikilink(note.link_text()),
            (None, None) => String::new(),
        };
        let bindings = continuity::date_bindings(today, self.locale())
            .with(Placeholder::MeetingName, name.as_str())
            .with(Placeholder::Time, now.format("%H:%M").to_string())
            .with(Placeholder::RelatedFile, related_file);
        let content = frontmatter::insert_frontmatter_alias(
            &expand(&self.settings.meeting_template, &bindings),
            &name,
        );

        self.ensure_folder("MEETING", &self.settings.meeting_folder)
            .await?;
        let note = self
            .create_note("MEETING", &self.meeting_note_path(today, &name), &content)
            .await?;

        if let Some(index) = project_index {
            let body = self.store.read(&index.path).await?;
            let link = format!("- {}", file_ops::wikilink(note.link_text()));
            let updated =
                editor::insert_under_heading(&body, self.locale().meeting_notes_heading(), &link);
            self.store.modify(&index.path, &updated).await?;
            log::info!("[MEETING] Linked {} from {}", note.path, index.path);
        }

        self.store.open_in_editor(&note).await?;
        Ok(Some(note))
    }

    // ---- weekly task links ----

    /// Append `- [[note]]` (or `- [[note#heading]]` when `heading_line` is
    /// given) to the weekly note of `today`.
    pub async fn add_to_weekly_tasks(
        &self,
        today: NaiveDate,
        note: &Note,
        heading_line: Option<&str>,
    ) -> WorkflowResult<Note> {
        let weekly = self.ensure_weekly_note(today).await?;

        let target = match heading_line {
            Some(line) => format!(
                "{}#{}",
                note.link_text(),
                line.trim().trim_start_matches('#').trim()
            ),
            None => note.link_text().to_string(),
        };
        let link = format!("- {}", file_ops::wikilink(&target));

        let body = self.store.read(&weekly.path).await?;
        self.store
            .modify(&weekly.path, &editor::append_line(&body, &link))
            .await?;
        log::info!("[WEEKLY] Added {} to {}", link, weekly.path);
        Ok(weekly)
    }

    // ---- context actions ----

    /// Actions offered for `note`; `line` is the line under the cursor, if any.
    pub fn available_actions(&self, note: &Note, line: Option<&str>) -> Vec<ContextAction> {
        if file_ops::is_within(&note.path, &self.settings.daily_folder) {
            return vec![
                ContextAction::CreateRelatedProject,
                ContextAction::CreateRelatedMeeting,
            ];
        }
        if file_ops::is_within(&note.path, &self.settings.project_folder) {
            let mut actions = vec![
                ContextAction::AddToWeeklyTasks,
                ContextAction::CreateRelatedMeeting,
            ];
            if line.is_some_and(|l| l.trim_start().starts_with('#')) {
                actions.push(ContextAction::AddHeadingToWeeklyTasks);
            }
            return actions;
        }
        Vec::new()
    }

    pub async fn run_action(
        &self,
        now: NaiveDateTime,
        action: ContextAction,
        note: &Note,
        line: Option<&str>,
    ) -> WorkflowResult<Option<Note>> {
        if !self.available_actions(note, line).contains(&action) {
            return Err(self.invalid(Message::ActionUnavailable));
        }
        let today = now.date();
        match action {
            ContextAction::CreateRelatedProject => self.create_project(today, None, Some(note)).await,
            ContextAction::CreateRelatedMeeting => {
                let project = self.project_of(note);
                self.create_meeting(now, None, Some(note), project.as_deref())
                    .await
            }
            ContextAction::AddToWeeklyTasks => {
                self.add_to_weekly_tasks(today, note, None).await.map(Some)
            }
            ContextAction::AddHeadingToWeeklyTasks => {
                self.add_to_weekly_tasks(today, note, line).await.map(Some)
            }
        }
    }

    // ---- lookup ----

    /// Find a note by vault path (with or without `.md`), by file stem, or by
    /// a frontmatter alias, searching the workflow folders.
    pub async fn find_note(&self, reference: &str) -> WorkflowResult<Option<Note>> {
        let reference = reference.trim().trim_matches('/');
        let mut candidates = vec![reference.to_string()];
        if !reference.ends_with(".md") {
            candidates.push(format!("{}.md", reference));
        }
        for candidate in &candidates {
            if let Entry::File(note) = self.store.entry(candidate).await {
                return Ok(Some(note));
            }
        }

        let mut roots = vec![
            self.settings.daily_folder.clone(),
            self.settings.weekly_folder.clone(),
            self.settings.project_folder.clone(),
            self.settings.meeting_folder.clone(),
        ];
        roots.dedup();

        let mut pending: Vec<String> = Vec::new();
        for root in roots {
            if matches!(self.store.entry(&root).await, Entry::Folder(_)) {
                pending.push(root);
            }
        }

        let mut by_alias = None;
        while let Some(folder) = pending.pop() {
            let children = self.store.list_children(&folder).await?;
            pending.extend(children.folders.iter().map(|f| file_ops::join_path(&folder, f)));

            for file in children.files.iter().filter(|f| f.ends_with(".md")) {
                let path = file_ops::join_path(&folder, file);
                if file_ops::file_stem(&path) == reference {
                    return Ok(Some(Note::new(path)));
                }
                if by_alias.is_none() {
                    let content = self.store.read(&path).await?;
                    if frontmatter::frontmatter_aliases(&content)
                        .iter()
                        .any(|a| a == reference)
                    {
                        by_alias = Some(Note::new(path));
                    }
                }
            }
        }
        log::debug!("[STORE] Lookup of {:?} by alias: {:?}", reference, by_alias);
        Ok(by_alias)
    }
}

#[cfg(test)]
mod tests {
    use super::prompt::PresetPrompter;
    use super::*;
    use crate::notes::sections::{SectionHeadings, parse_sections};
    use crate::notes::store::MemoryStore;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn setup(
        locale: Locale,
        answers: Vec<Option<&str>>,
    ) -> (Arc<MemoryStore>, Arc<PresetPrompter>, Workflow) {
        let store = Arc::new(MemoryStore::new());
        let prompter = Arc::new(PresetPrompter::new(answers));
        let workflow = Workflow::new(
            Settings::defaults_for(locale),
            store.clone(),
            prompter.clone(),
        );
        (store, prompter, workflow)
    }

    #[tokio::test]
    async fn test_daily_note_carries_over_only_unfinished_work() {
        let (store, _, workflow) = setup(Locale::En, vec![]);
        let headings = SectionHeadings::for_locale(Locale::En);

        let first = workflow.create_or_open_daily(at(2024, 3, 12, 9, 0)).await.unwrap();
        assert_eq!(first.path, "workFlow/daily/2024-03-12_Tuesday.md");
        let body = store.content(&first.path).unwrap();
        assert!(body.contains("date: \"2024-03-12\""));
        assert!(body.contains("weekDay: \"Tuesday\""));
        let sections = parse_sections(&body, &headings);
        assert!(sections.work.is_empty());
        assert!(sections.personal.is_empty());
        assert!(store.content("workFlow/weekly/2024-w11.md").is_some());

        let edited = body.replace(
            "# Work to-do\n",
            "# Work to-do\n- [ ] ship parser\n- [x] write docs\n",
        );
        store.insert_file(&first.path, &edited);

        let second = workflow.create_or_open_daily(at(2024, 3, 13, 9, 0)).await.unwrap();
        let body = store.content(&second.path).unwrap();
        let sections = parse_sections(&body, &headings);
        assert_eq!(sections.work.texts(), vec!["- [ ] ship parser"]);
        assert!(sections.personal.is_empty());
        assert!(!body.contains("write docs"));
        assert_eq!(store.content(&first.path).unwrap(), edited);
    }

    #[tokio::test]
    async fn test_daily_note_uses_latest_prior_only() {
        let (store, _, workflow) = setup(Locale::Zh, vec![]);
        store.insert_file(
            "workFlow/daily/2024-03-01_星期五.md",
            "# 当日工作代办\n- [ ] old task\n",
        );
        store.insert_file(
            "workFlow/daily/2024-03-10_星期日.md",
            "# 当日工作代办\n- [ ] recent task\n\n# 当日个人代办\n  call mom\n",
        );
        store.insert_file("workFlow/daily/notes.md", "# 当日工作代办\n- [ ] stray\n");

        let note = workflow.create_daily_note(NaiveDate::from_ymd_opt(2024, 3, 12).unwrap())
            .await
            .unwrap();
        assert_eq!(note.path, "workFlow/daily/2024-03-12_星期二.md");
        let body = store.content(&note.path).unwrap();
        assert!(body.contains("- [ ] recent task"));
        assert!(body.contains("  call mom"));
        assert!(!body.contains("old task"));
        assert!(!body.contains("stray"));
        assert!(body.contains("![[workFlow/weekly/2024-w11#主要任务]]"));
    }

    #[tokio::test]
    async fn test_create_or_open_daily_reuses_existing_note() {
        let (store, _, workflow) = setup(Locale::En, vec![]);
        let path = "workFlow/daily/2024-03-12_Tuesday.md";
        store.insert_file(path, "mine");

        let note = workflow.create_or_open_daily(at(2024, 3, 12, 8, 0)).await.unwrap();
        assert_eq!(note.path, path);
        assert_eq!(store.content(path).as_deref(), Some("mine"));
        assert!(store.is_open(path));

        // Already open: focused, nothing rewritten
        let again = workflow.create_or_open_daily(at(2024, 3, 12, 18, 0)).await.unwrap();
        assert_eq!(again.path, path);
        assert_eq!(store.content(path).as_deref(), Some("mine"));
    }

    #[tokio::test]
    async fn test_auto_create_respects_flag_and_time() {
        let store = Arc::new(MemoryStore::new());
        let prompter = Arc::new(PresetPrompter::new(Vec::<Option<&str>>::new()));
        let mut settings = Settings::defaults_for(Locale::En);
        settings.auto_create_time = "08:30".to_string();
        let workflow = Workflow::new(settings.clone(), store.clone(), prompter.clone());

        assert_eq!(workflow.auto_create_daily(at(2024, 3, 12, 8, 0)).await.unwrap(), None);
        let created = workflow.auto_create_daily(at(2024, 3, 12, 8, 30)).await.unwrap();
        assert!(created.is_some());
        assert_eq!(workflow.auto_create_daily(at(2024, 3, 12, 9, 0)).await.unwrap(), None);

        settings.auto_create = false;
        let disabled = Workflow::new(settings, store.clone(), prompter);
        assert_eq!(disabled.auto_create_daily(at(2024, 3, 13, 9, 0)).await.unwrap(), None);
        assert!(store.content("workFlow/daily/2024-03-13_Wednesday.md").is_none());
    }

    #[tokio::test]
    async fn test_weekly_paths_use_week_year() {
        let (store, _, workflow) = setup(Locale::En, vec![]);
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(workflow.weekly_note_path(d(2024, 12, 30)), "workFlow/weekly/2025-w1.md");
        assert_eq!(workflow.weekly_note_path(d(2023, 1, 1)), "workFlow/weekly/2022-w52.md");
        assert_eq!(workflow.weekly_note_path(d(2023, 12, 28)), "workFlow/weekly/2023-w52.md");

        let note = workflow.create_or_open_weekly(d(2024, 3, 12)).await.unwrap();
        let body = store.content(&note.path).unwrap();
        assert!(body.contains("  - 2024-03\n"));
        assert!(body.contains("  - W11\n"));
        assert!(body.contains("# Main tasks"));

        // Second call opens the same note
        store.insert_file(&note.path, "kept");
        workflow.create_or_open_weekly(d(2024, 3, 14)).await.unwrap();
        assert_eq!(store.content(&note.path).as_deref(), Some("kept"));
    }

    #[tokio::test]
    async fn test_project_prompt_reasks_until_valid() {
        let (store, prompter, workflow) =
            setup(Locale::En, vec![Some("  "), Some("Atlas"), Some(" Borealis ")]);
        store.insert_file("workFlow/projects/Atlas/Atlas-index.md", "");
        let daily = Note::new("workFlow/daily/2024-03-12_Tuesday.md");

        let today = NaiveDate::from_ymd_opt(2024, 3, 12).unwrap();
        let note = workflow
            .create_project(today, None, Some(&daily))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(note.path, "workFlow/projects/Borealis/Borealis-index.md");
        let body = store.content(&note.path).unwrap();
        assert!(body.contains("  - \"Borealis\""));
        assert!(body.contains("[[2024-03-12_Tuesday]]"));
        assert!(!body.contains("{{"));

        let requests = prompter.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].message, "Enter project name");
        assert_eq!(requests[0].hint, None);
        assert_eq!(
            requests[1].hint.as_deref(),
            Some("Project name cannot be empty")
        );
        assert_eq!(
            requests[2].hint,
            Some(Message::ProjectExists.text(Locale::En))
        );
    }

    #[tokio::test]
    async fn test_project_cancel_and_direct_validation() {
        let (store, _, workflow) = setup(Locale::Zh, vec![None]);
        let today = NaiveDate::from_ymd_opt(2024, 3, 12).unwrap();

        assert_eq!(workflow.create_project(today, None, None).await.unwrap(), None);
        assert!(store.file_paths().is_empty());

        store.insert_file("workFlow/projects/Atlas/notes.md", "");
        let err = workflow
            .create_project(today, Some("Atlas"), None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), Message::ProjectExists.text(Locale::Zh));
        let err = workflow.create_project(today, Some(""), None).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
    }

    #[tokio::test]
    async fn test_names_must_be_a_single_path_component() {
        let (store, prompter, workflow) = setup(Locale::En, vec![Some("../Atlas"), Some("Atlas")]);
        let today = NaiveDate::from_ymd_opt(2024, 3, 12).unwrap();

        for bad in ["a/b", "a\\b", ".", ".."] {
            let err = workflow
                .create_project(today, Some(bad), None)
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), Message::InvalidName(bad.to_string()).text(Locale::En));
        }
        assert!(store.file_paths().is_empty());
        assert!(!store.exists("workFlow/projects/a").await);

        let err = workflow
            .create_meeting(at(2024, 3, 12, 9, 0), Some("x/y"), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
        assert!(store.file_paths().is_empty());

        // A prompted answer is asked again instead
        let note = workflow
            .create_project(today, None, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(note.path, "workFlow/projects/Atlas/Atlas-index.md");
        assert_eq!(
            prompter.requests()[1].hint,
            Some(Message::InvalidName("../Atlas".to_string()).text(Locale::En))
        );

        // Dots inside a name are fine
        assert!(workflow
            .create_project(today, Some("v1.2"), None)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_meeting_links_back_into_project_index() {
        let (store, prompter, workflow) = setup(Locale::En, vec![]);
        let today = NaiveDate::from_ymd_opt(2024, 3, 12).unwrap();
        let index = workflow
            .create_project(today, Some("Atlas"), None)
            .await
            .unwrap()
            .unwrap();

        let meeting = workflow
            .create_meeting(at(2024, 3, 12, 14, 5), Some("Standup"), None, Some("Atlas"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(meeting.path, "workFlow/meetings/2024-03-12_Standup.md");

        let body = store.content(&meeting.path).unwrap();
        assert!(body.starts_with("---\naliases:\n  - \"Standup\"\n"));
        assert!(body.contains("links: \"[[Atlas-index]]\""));
        assert!(body.contains("time: \"14:05\""));
        assert_eq!(frontmatter::frontmatter_aliases(&body), vec!["Standup"]);

        let index_body = store.content(&index.path).unwrap();
        assert!(index_body.contains("## Meeting notes\n- [[2024-03-12_Standup]]\n"));
        assert!(prompter.notices().is_empty());
    }

    #[tokio::test]
    async fn test_meeting_with_missing_project_index_is_a_notice() {
        let (store, prompter, workflow) = setup(Locale::En, vec![Some("Retro")]);
        let daily = Note::new("workFlow/daily/2024-03-12_Tuesday.md");

        let meeting = workflow
            .create_meeting(at(2024, 3, 12, 10, 0), None, Some(&daily), Some("Ghost"))
            .await
            .unwrap()
            .unwrap();
        let body = store.content(&meeting.path).unwrap();
        assert!(body.contains("links: \"[[2024-03-12_Tuesday]]\""));
        assert_eq!(
            prompter.notices(),
            vec![Message::ProjectIndexMissing("Ghost".to_string()).text(Locale::En)]
        );

        let err = workflow
            .create_meeting(at(2024, 3, 12, 11, 0), Some("Retro"), None, None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "A meeting note with this name already exists today");
        // Same name on another day is fine
        assert!(workflow
            .create_meeting(at(2024, 3, 13, 11, 0), Some("Retro"), None, None)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_add_to_weekly_tasks() {
        let (store, _, workflow) = setup(Locale::En, vec![]);
        let today = NaiveDate::from_ymd_opt(2024, 3, 12).unwrap();
        let project = Note::new("workFlow/projects/Atlas/Atlas-index.md");

        let weekly = workflow.add_to_weekly_tasks(today, &project, None).await.unwrap();
        workflow
            .add_to_weekly_tasks(today, &project, Some("## Main tasks "))
            .await
            .unwrap();
        let body = store.content(&weekly.path).unwrap();
        assert!(body.ends_with("\n- [[Atlas-index]]\n- [[Atlas-index#Main tasks]]"));
    }

    #[tokio::test]
    async fn test_context_actions_by_folder() {
        let (_, _, workflow) = setup(Locale::En, vec![]);
        let daily = Note::new("workFlow/daily/2024-03-12_Tuesday.md");
        let project = Note::new("workFlow/projects/Atlas/Atlas-index.md");
        let other = Note::new("inbox/idea.md");

        assert_eq!(
            workflow.available_actions(&daily, None),
            vec![
                ContextAction::CreateRelatedProject,
                ContextAction::CreateRelatedMeeting
            ]
        );
        assert_eq!(
            workflow.available_actions(&project, Some("## Risks")),
            vec![
                ContextAction::AddToWeeklyTasks,
                ContextAction::CreateRelatedMeeting,
                ContextAction::AddHeadingToWeeklyTasks
            ]
        );
        assert!(!workflow
            .available_actions(&project, Some("plain text"))
            .contains(&ContextAction::AddHeadingToWeeklyTasks));
        assert!(workflow.available_actions(&other, None).is_empty());
        assert_eq!(workflow.project_of(&project).as_deref(), Some("Atlas"));
        assert_eq!(workflow.project_of(&daily), None);

        let err = workflow
            .run_action(at(2024, 3, 12, 9, 0), ContextAction::AddToWeeklyTasks, &other, None)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
        assert_eq!(
            "add-heading-to-weekly-tasks".parse::<ContextAction>().unwrap(),
            ContextAction::AddHeadingToWeeklyTasks
        );
    }

    #[tokio::test]
    async fn test_related_meeting_from_project_note() {
        let (store, _, workflow) = setup(Locale::Zh, vec![Some("评审")]);
        let index = workflow
            .create_project(NaiveDate::from_ymd_opt(2024, 3, 12).unwrap(), Some("Atlas"), None)
            .await
            .unwrap()
            .unwrap();

        let meeting = workflow
            .run_action(
                at(2024, 3, 12, 16, 0),
                ContextAction::CreateRelatedMeeting,
                &index,
                None,
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(meeting.path, "workFlow/meetings/2024-03-12_评审.md");
        assert!(store
            .content(&index.path)
            .unwrap()
            .contains("## 会议记录\n- [[2024-03-12_评审]]"));
    }

    #[tokio::test]
    async fn test_list_open_and_find() {
        let (store, prompter, workflow) = setup(Locale::En, vec![]);
        assert!(workflow.list_projects().await.unwrap().is_empty());

        store.insert_file(
            "workFlow/projects/Borealis/Borealis-index.md",
            "---\naliases:\n  - \"North\"\n---\n",
        );
        store.insert_file("workFlow/projects/Atlas/readme.md", "");

        let projects = workflow.list_projects().await.unwrap();
        assert_eq!(
            projects,
            vec![
                ProjectEntry {
                    name: "Atlas".to_string(),
                    index: None
                },
                ProjectEntry {
                    name: "Borealis".to_string(),
                    index: Some(Note::new("workFlow/projects/Borealis/Borealis-index.md"))
                },
            ]
        );

        assert_eq!(workflow.open_project_index("Atlas").await.unwrap(), None);
        assert_eq!(prompter.notices().len(), 1);
        assert!(workflow.open_project_index("Borealis").await.unwrap().is_some());

        let by_alias = workflow.find_note("North").await.unwrap();
        assert_eq!(
            by_alias.map(|n| n.path),
            Some("workFlow/projects/Borealis/Borealis-index.md".to_string())
        );
        let by_stem = workflow.find_note("readme").await.unwrap();
        assert_eq!(
            by_stem.map(|n| n.path),
            Some("workFlow/projects/Atlas/readme.md".to_string())
        );
        let by_path = workflow
            .find_note("workFlow/projects/Atlas/readme")
            .await
            .unwrap();
        assert!(by_path.is_some());
        assert_eq!(workflow.find_note("nothing").await.unwrap(), None);
    }
}
