use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use workflow_notes::config;
use workflow_notes::error::{StoreError, WorkflowError, WorkflowResult};
use workflow_notes::models::Settings;
use workflow_notes::models::settings::SETTING_KEYS;
use workflow_notes::notes::calendar;
use workflow_notes::notes::store::{Note, VaultStore};
use workflow_notes::workflow::prompt::{ChannelPrompter, serve_terminal};
use workflow_notes::workflow::{ContextAction, Workflow};

#[derive(Parser)]
#[command(name = "workflow-notes")]
#[command(about = "Daily, weekly, project and meeting notes for a markdown vault")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Vault root (defaults to WORKFLOW_VAULT_DIR, then the current directory)
    #[arg(long, global = true)]
    vault: Option<PathBuf>,

    /// Act as if today were this date: YYYY-MM-DD, "today" or "yesterday"
    #[arg(long, global = true)]
    date: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or open today's daily note
    Daily,

    /// Create or open this week's weekly note
    Weekly,

    /// Manage projects
    Project {
        #[command(subcommand)]
        action: ProjectCommand,
    },

    /// Create a meeting note; prompts for the name if omitted
    Meeting {
        name: Option<String>,

        /// Project whose index links back to the meeting
        #[arg(long)]
        project: Option<String>,

        /// Related note (path, file name or alias)
        #[arg(long)]
        from: Option<String>,
    },

    /// Link a note (or one of its headings) into this week's task list
    LinkWeekly {
        /// Note to link (path, file name or alias)
        note: String,

        /// Heading line inside the note, e.g. "## Risks"
        #[arg(long)]
        heading: Option<String>,
    },

    /// Create today's daily note if auto-create applies
    Auto,

    /// List the context actions for a note, or run one
    Actions {
        note: String,

        /// Line under the cursor
        #[arg(long)]
        line: Option<String>,

        /// Action to run (e.g. create-related-meeting)
        #[arg(long)]
        run: Option<String>,
    },

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
}

#[derive(Subcommand)]
enum ProjectCommand {
    /// Create a project folder and index note; prompts for the name if omitted
    New {
        name: Option<String>,

        /// Related daily note (path, file name or alias)
        #[arg(long)]
        from: Option<String>,
    },
    /// Open a project's index note
    Open { name: String },
    /// List projects and their index notes
    List,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print the stored settings
    Show,
    /// List the keys accepted by `settings set`
    Keys,
    /// Restore default folders and templates, keeping the language
    Reset,
    /// Change one setting, e.g. `settings set weeklyFolder journal/weeks`
    ///
    /// Weekly notes are named `<ISO week-year>-w<week>.md`, so the last days
    /// of December can belong to week 1 of the next year. Custom templates
    /// that embed weekly notes as `{{date_year}}-w{{week}}` should use
    /// `{{week_year}}-w{{week}}` instead.
    Set { key: String, value: String },
}

fn parse_date(value: &str, today: NaiveDate) -> WorkflowResult<NaiveDate> {
    match value.trim() {
        "today" => Ok(today),
        "yesterday" => calendar::previous_calendar_date(today)
            .ok_or_else(|| WorkflowError::Validation("No day before today".to_string())),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .map_err(|e| WorkflowError::Validation(format!("Invalid date {}: {}", other, e))),
    }
}

fn current_time(date: Option<&str>) -> WorkflowResult<NaiveDateTime> {
    let now = Local::now().naive_local();
    match date {
        Some(value) => Ok(parse_date(value, now.date())?.and_time(now.time())),
        None => Ok(now),
    }
}

async fn lookup(workflow: &Workflow, reference: &str) -> WorkflowResult<Note> {
    workflow
        .find_note(reference)
        .await?
        .ok_or_else(|| StoreError::NotFound(reference.to_string()).into())
}

async fn lookup_opt(workflow: &Workflow, reference: Option<&str>) -> WorkflowResult<Option<Note>> {
    match reference {
        Some(reference) => lookup(workflow, reference).await.map(Some),
        None => Ok(None),
    }
}

fn report(created: Option<Note>) {
    match created {
        Some(note) => println!("{}", note.path),
        None => log::info!("Cancelled"),
    }
}

async fn run(cli: Cli) -> WorkflowResult<()> {
    let vault = cli.vault.unwrap_or_else(config::vault_dir);
    let settings_path = config::settings_path(&vault);
    let mut settings = Settings::load(&settings_path);
    log::debug!(
        "[SETTINGS] Vault {} with settings {}",
        vault.display(),
        settings_path.display()
    );

    if let Commands::Settings { action } = &cli.command {
        match action {
            SettingsCommand::Show => print!("{}", settings.to_ron()?),
            SettingsCommand::Keys => {
                for key in SETTING_KEYS {
                    println!("{}", key);
                }
            }
            SettingsCommand::Reset => {
                settings.reset();
                settings.save(&settings_path)?;
                log::info!("[SETTINGS] Reset to {} defaults", settings.language.as_ref());
            }
            SettingsCommand::Set { key, value } => {
                let before = settings.clone();
                settings.set_field(key, value)?;
                if settings != before {
                    settings.save(&settings_path)?;
                    log::info!("[SETTINGS] Updated {}", key);
                }
            }
        }
        return Ok(());
    }

    let now = current_time(cli.date.as_deref())?;
    let today = now.date();
    let locale = settings.language;

    let store = Arc::new(VaultStore::new(vault, config::editor_command()));
    let (prompter, rx) = ChannelPrompter::new();
    tokio::spawn(serve_terminal(rx, locale));
    let workflow = Workflow::new(settings, store, Arc::new(prompter));

    match cli.command {
        Commands::Daily => report(Some(workflow.create_or_open_daily(now).await?)),
        Commands::Weekly => report(Some(workflow.create_or_open_weekly(today).await?)),
        Commands::Project { action } => match action {
            ProjectCommand::New { name, from } => {
                let related = lookup_opt(&workflow, from.as_deref()).await?;
                report(
                    workflow
                        .create_project(today, name.as_deref(), related.as_ref())
                        .await?,
                );
            }
            ProjectCommand::Open { name } => {
                if let Some(note) = workflow.open_project_index(&name).await? {
                    println!("{}", note.path);
                }
            }
            ProjectCommand::List => {
                for project in workflow.list_projects().await? {
                    match project.index {
                        Some(index) => println!("{}\t{}", project.name, index.path),
                        None => println!("{}\t-", project.name),
                    }
                }
            }
        },
        Commands::Meeting {
            name,
            project,
            from,
        } => {
            let related = lookup_opt(&workflow, from.as_deref()).await?;
            report(
                workflow
                    .create_meeting(now, name.as_deref(), related.as_ref(), project.as_deref())
                    .await?,
            );
        }
        Commands::LinkWeekly { note, heading } => {
            let note = lookup(&workflow, &note).await?;
            let weekly = workflow
                .add_to_weekly_tasks(today, &note, heading.as_deref())
                .await?;
            println!("{}", weekly.path);
        }
        Commands::Auto => {
            if let Some(note) = workflow.auto_create_daily(now).await? {
                println!("{}", note.path);
            }
        }
        Commands::Actions { note, line, run } => {
            let note = lookup(&workflow, &note).await?;
            match run {
                None => {
                    for action in workflow.available_actions(&note, line.as_deref()) {
                        println!("{}", action.as_ref());
                    }
                }
                Some(name) => {
                    let action: ContextAction = name.parse().map_err(|_| {
                        WorkflowError::Validation(format!("Unknown action: {}", name))
                    })?;
                    report(
                        workflow
                            .run_action(now, action, &note, line.as_deref())
                            .await?,
                    );
                }
            }
        }
        Commands::Settings { .. } => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
