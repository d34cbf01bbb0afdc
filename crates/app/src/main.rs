use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use exam_core::model::{DEFAULT_DURATION_SECS, DEFAULT_MAX_QUESTIONS, ExamSettings};
use services::{AppServices, Clock, ExamHistoryService, ExamLoopService, HttpQuestionSource};
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

#[derive(Debug, thiserror::Error)]
enum GlueError {
    #[error("invalid --db value: {raw}")]
    InvalidDbUrl { raw: String },
}

#[derive(Debug, Parser)]
#[command(name = "exam")]
#[command(about = "Timed multiple-choice practice exams")]
struct Cli {
    /// SQLite database URL or path
    #[arg(long = "db", env = "EXAM_DB_URL", default_value = "sqlite:exam.sqlite3", global = true)]
    db_url: String,

    /// Maximum number of questions on a paper
    #[arg(long, env = "EXAM_MAX_QUESTIONS", default_value_t = DEFAULT_MAX_QUESTIONS, global = true)]
    max_questions: u32,

    /// Exam duration in seconds
    #[arg(long, env = "EXAM_DURATION_SECS", default_value_t = DEFAULT_DURATION_SECS, global = true)]
    duration_secs: u32,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum Command {
    /// Launch the desktop app (default)
    Ui,
    /// Write the built-in sample question bank
    Seed,
    /// Fetch a question bank over HTTP and store it
    Import {
        /// URL returning a JSON array of question records
        #[arg(long, env = "EXAM_QUESTIONS_URL")]
        url: String,
    },
}

impl Cli {
    fn exam_settings(&self) -> Result<ExamSettings, exam_core::Error> {
        Ok(ExamSettings::new(self.max_questions, self.duration_secs)?)
    }
}

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn exam_settings(&self) -> ExamSettings {
        self.services.settings()
    }

    fn exam_loop(&self) -> Arc<ExamLoopService> {
        self.services.exam_loop()
    }

    fn exam_history(&self) -> Arc<ExamHistoryService> {
        self.services.exam_history()
    }
}

/// `RUST_LOG` directives when present and valid, otherwise `info`.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn init_tracing() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .init();
}

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| GlueError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(GlueError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.db_url.trim().is_empty() {
        return Err(GlueError::InvalidDbUrl { raw: cli.db_url }.into());
    }
    let settings = cli.exam_settings()?;
    let db_url = normalize_sqlite_url(&cli.db_url);

    // Open and migrate SQLite before any subcommand runs.
    prepare_sqlite_file(&db_url)?;
    let services = AppServices::new_sqlite(&db_url, Clock::system(), settings).await?;

    match cli.command.unwrap_or(Command::Ui) {
        Command::Ui => {
            tracing::info!(
                db = %db_url,
                max_questions = settings.max_questions(),
                duration_secs = settings.duration_secs(),
                "launching desktop app"
            );
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
            let context = build_app_context(&app);

            // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Practice Exam")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Seed => {
            let written = services.question_bank().seed_sample().await?;
            let total = services.question_bank().count().await?;
            tracing::info!(written, total, db = %db_url, "sample bank seeded");
            Ok(())
        }
        Command::Import { url } => {
            let source = HttpQuestionSource::with_url(url.clone());
            let imported = services.question_bank().import_from(&source).await?;
            let total = services.question_bank().count().await?;
            tracing::info!(imported, total, %url, "question bank imported");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(err) = run(cli).await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
