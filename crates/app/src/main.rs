use std::path::{Path, PathBuf};

use clap::Parser;
use services::{QuizLoopService, RandomSource};
use storage::Storage;
use tracing_subscriber::EnvFilter;

mod terminal;

#[derive(Debug, Parser)]
#[command(name = "quiz", version, about = "Multiple-choice quiz in the terminal")]
struct Args {
    /// Question bank (JSON). Uses the built-in bank when omitted.
    #[arg(long, env = "QUIZ_QUESTIONS")]
    questions: Option<PathBuf>,

    /// SQLite URL of the settings store.
    #[arg(long, env = "QUIZ_DB_URL", default_value = "sqlite://quiz.sqlite3")]
    db: String,

    /// Keep settings in memory only.
    #[arg(long)]
    in_memory: bool,

    /// Fixed seed for question and option order.
    #[arg(long, env = "QUIZ_SEED")]
    seed: Option<u64>,
}

#[derive(Debug)]
struct InvalidDbUrl(String);

impl std::fmt::Display for InvalidDbUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid --db value: {}", self.0)
    }
}

impl std::error::Error for InvalidDbUrl {}

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
        .ok_or_else(|| InvalidDbUrl(db_url.to_string()))?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(InvalidDbUrl(db_url.to_string()).into());
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

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let questions = match &args.questions {
        Some(path) => storage::load_question_bank(path)?,
        None => storage::default_question_bank()?,
    };

    // Open + migrate SQLite in the binary glue so core/services stay pure.
    let storage = if args.in_memory {
        Storage::in_memory()
    } else {
        let db_url = normalize_sqlite_url(&args.db);
        prepare_sqlite_file(&db_url)?;
        Storage::sqlite(&db_url).await?
    };

    let random = args.seed.map_or(RandomSource::Entropy, RandomSource::seeded);
    let quiz_loop = QuizLoopService::new(storage.settings).with_random(random);
    let mut session = quiz_loop.start(questions).await?;

    terminal::run(&quiz_loop, &mut session).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_memory_and_absolute_urls() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/quiz.db"),
            "sqlite:///tmp/quiz.db"
        );
    }

    #[test]
    fn makes_relative_paths_absolute() {
        let url = normalize_sqlite_url("sqlite:quiz.db");
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("quiz.db"));
    }

    #[test]
    fn rejects_urls_without_path() {
        assert!(prepare_sqlite_file("sqlite://").is_err());
        assert!(prepare_sqlite_file("postgres://db").is_err());
        assert!(prepare_sqlite_file("sqlite::memory:").is_ok());
    }

    #[test]
    fn parses_cli_flags() {
        let args = Args::try_parse_from(["quiz", "--in-memory", "--seed", "9"]).unwrap();
        assert!(args.in_memory);
        assert_eq!(args.seed, Some(9));
        assert!(args.questions.is_none());
    }
}
