use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use review_core::model::{ClientPreferences, format_grade};
use services::{AppServices, ClientConfig};
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidApiUrl { raw: String, reason: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidApiUrl { raw, reason } => {
                write!(f, "invalid --api-url value {raw}: {reason}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
    preferences: ClientPreferences,
}

impl UiApp for DesktopApp {
    fn services(&self) -> AppServices {
        self.services.clone()
    }

    fn initial_preferences(&self) -> ClientPreferences {
        self.preferences
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui     [--api-url <url>] [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- whoami [--api-url <url>] [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- logout [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api-url http://localhost:8000");
    eprintln!("  --db sqlite://review-client.sqlite3");
    eprintln!();
    eprintln!("Environment (a .env file is read too):");
    eprintln!("  REVIEW_API_URL, REVIEW_DB_URL, REVIEW_HTTP_TIMEOUT_SECS,");
    eprintln!("  REVIEW_GOOGLE_CLIENT_ID, REVIEW_GOOGLE_REDIRECT_URI, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Whoami,
    Logout,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "whoami" => Some(Self::Whoami),
            "logout" => Some(Self::Logout),
            _ => None,
        }
    }
}

/// Apply command-line overrides on top of the environment configuration.
fn parse_overrides(
    mut config: ClientConfig,
    args: &mut impl Iterator<Item = String>,
) -> Result<ClientConfig, ArgsError> {
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => {
                let value = require_value(args, "--db")?;
                if value.trim().is_empty() {
                    return Err(ArgsError::InvalidDbUrl { raw: value });
                }
                config = config.with_database_url(value);
            }
            "--api-url" => {
                let value = require_value(args, "--api-url")?;
                config = config
                    .with_api_url(&value)
                    .map_err(|err| ArgsError::InvalidApiUrl {
                        raw: value.clone(),
                        reason: err.to_string(),
                    })?;
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    let normalized = normalize_sqlite_url(config.database_url.clone());
    Ok(config.with_database_url(normalized))
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let config = ClientConfig::from_env()?;
    let mut iter = argv.into_iter();
    let config = parse_overrides(config, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&config.database_url)?;
    let services = AppServices::new_sqlite(config).await?;

    match cmd {
        Command::Ui => {
            let user = match services.auth().restore().await {
                Ok(user) => user,
                Err(err) => {
                    tracing::warn!(error = %err, "starting signed out");
                    None
                }
            };
            let is_admin = user.as_ref().is_some_and(|user| user.is_admin());
            let preferences = services
                .preferences()
                .load_for(is_admin)
                .await
                .unwrap_or_else(|err| {
                    tracing::warn!(error = %err, "using default preferences");
                    ClientPreferences::default()
                });

            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                services,
                preferences,
            });
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Exam Review")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Whoami => {
            match services.auth().restore().await? {
                Some(user) => {
                    let role = if user.is_admin() { "admin" } else { "student" };
                    println!("{} <{}>", user.name(), user.email());
                    println!("grade: {}", format_grade(user.grade()));
                    println!("role: {role}");
                }
                None => println!("not signed in"),
            }
            Ok(())
        }
        Command::Logout => {
            services.auth().logout().await?;
            println!("signed out");
            Ok(())
        }
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
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

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> impl Iterator<Item = String> {
        items
            .iter()
            .map(|item| (*item).to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    fn base() -> ClientConfig {
        ClientConfig::from_lookup(|_| None).unwrap()
    }

    #[test]
    fn overrides_api_url_and_db() {
        let config = parse_overrides(
            base(),
            &mut args(&["--api-url", "https://exams.example.com/v1", "--db", "sqlite:/tmp/r.db"]),
        )
        .unwrap();
        assert_eq!(config.api_base_url.as_str(), "https://exams.example.com/v1/");
        assert_eq!(config.database_url, "sqlite:///tmp/r.db");
    }

    #[test]
    fn rejects_missing_and_bad_values() {
        assert!(matches!(
            parse_overrides(base(), &mut args(&["--db"])),
            Err(ArgsError::MissingValue { flag: "--db" })
        ));
        assert!(matches!(
            parse_overrides(base(), &mut args(&["--api-url", "ftp://x"])),
            Err(ArgsError::InvalidApiUrl { .. })
        ));
        assert!(matches!(
            parse_overrides(base(), &mut args(&["--verbose"])),
            Err(ArgsError::UnknownArg(_))
        ));
    }

    #[test]
    fn memory_url_is_left_alone() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
        assert!(normalize_sqlite_url("client.db".into()).ends_with("/client.db"));
    }
}
