use std::sync::Arc;
use std::time::Duration;

use backend::{BackendConfig, ConfigError, InMemoryBackend};
use coddy_core::model::Profile;
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, CoddyApi, SessionContext};
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

const DEMO_EMAIL: &str = "demo@coddy.dev";
const DEMO_PASSWORD: &str = "coddy123";
const DEFAULT_LOG_FILTER: &str = "app=info,ui=info,services=info,backend=info";

#[derive(Debug, Error)]
enum ArgsError {
    #[error("{flag} requires a value")]
    MissingValue { flag: &'static str },

    #[error("unknown argument: {0}")]
    UnknownArg(String),

    #[error("invalid --poll-secs value: {raw}")]
    InvalidPollSecs { raw: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
    poll_interval: Option<Duration>,
}

impl UiApp for DesktopApp {
    fn api(&self) -> CoddyApi {
        self.services.api().clone()
    }

    fn session(&self) -> Arc<SessionContext> {
        self.services.session()
    }

    fn session_poll_interval(&self) -> Option<Duration> {
        self.poll_interval
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [ui] [--url <project_url>] [--anon-key <key>] [--poll-secs <n>]");
    eprintln!("  cargo run -p app -- [ui] --demo");
    eprintln!();
    eprintln!("Environment (a .env file is read if present):");
    eprintln!("  CODDY_SUPABASE_URL, CODDY_SUPABASE_ANON_KEY");
    eprintln!("  CODDY_SUPABASE_SERVICE_ROLE_KEY  enables sign-up rollback");
    eprintln!("  CODDY_HTTP_TIMEOUT_SECS, RUST_LOG");
    eprintln!();
    eprintln!("--demo runs against an in-memory project; sign in with {DEMO_EMAIL} / {DEMO_PASSWORD}.");
}

#[derive(Debug, Default)]
struct Args {
    url: Option<String>,
    anon_key: Option<String>,
    demo: bool,
    poll_interval: Option<Duration>,
    help: bool,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();
        let mut args = args.into_iter().peekable();
        if args.peek().map(String::as_str) == Some("ui") {
            args.next();
        }

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--url" => parsed.url = Some(require_value(&mut args, "--url")?),
                "--anon-key" => parsed.anon_key = Some(require_value(&mut args, "--anon-key")?),
                "--demo" => parsed.demo = true,
                "--poll-secs" => {
                    let value = require_value(&mut args, "--poll-secs")?;
                    let secs: u64 = value
                        .trim()
                        .parse()
                        .ok()
                        .filter(|secs| *secs > 0)
                        .ok_or_else(|| ArgsError::InvalidPollSecs { raw: value.clone() })?;
                    parsed.poll_interval = Some(Duration::from_secs(secs));
                }
                "--help" | "-h" => parsed.help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(parsed)
    }

    /// Environment first, then flag overrides.
    fn backend_config(&self) -> Result<BackendConfig, ArgsError> {
        let url = self.url.clone();
        let anon_key = self.anon_key.clone();
        let config = BackendConfig::from_lookup(|key| match key {
            backend::config::URL_VAR if url.is_some() => url.clone(),
            backend::config::ANON_KEY_VAR if anon_key.is_some() => anon_key.clone(),
            _ => std::env::var(key).ok(),
        })?;
        Ok(config)
    }
}

fn demo_services() -> AppServices {
    let project = InMemoryBackend::seeded();
    let user_id = project.register(DEMO_EMAIL, DEMO_PASSWORD);
    project.put_profile(Profile::new(user_id, "Demo Learner"));
    AppServices::in_memory(&project)
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_tracing();

    let args = Args::parse(std::env::args().skip(1)).inspect_err(|_| print_usage())?;
    if args.help {
        print_usage();
        return Ok(());
    }

    let services = if args.demo {
        tracing::info!(target: "app", "starting offline demo");
        demo_services()
    } else {
        let config = args.backend_config()?;
        tracing::info!(target: "app", url = %config.url(), "connecting to project");
        AppServices::supabase(config)?
    };

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        services,
        poll_interval: args.poll_interval,
    });
    let context = build_app_context(&app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Coddy")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn ui_subcommand_is_optional() {
        let args = Args::parse(argv(&["ui", "--demo"])).unwrap();
        assert!(args.demo);
        let args = Args::parse(argv(&["--demo"])).unwrap();
        assert!(args.demo);
    }

    #[test]
    fn poll_secs_must_be_positive() {
        let args = Args::parse(argv(&["--poll-secs", "30"])).unwrap();
        assert_eq!(args.poll_interval, Some(Duration::from_secs(30)));
        assert!(matches!(
            Args::parse(argv(&["--poll-secs", "0"])),
            Err(ArgsError::InvalidPollSecs { .. })
        ));
    }

    #[test]
    fn flags_need_values_and_unknown_flags_fail() {
        assert!(matches!(
            Args::parse(argv(&["--url"])),
            Err(ArgsError::MissingValue { flag: "--url" })
        ));
        assert!(matches!(
            Args::parse(argv(&["--verbose"])),
            Err(ArgsError::UnknownArg(_))
        ));
    }

    #[test]
    fn flags_override_environment() {
        let args = Args::parse(argv(&[
            "--url",
            "http://localhost:54321",
            "--anon-key",
            "anon",
        ]))
        .unwrap();
        let config = args.backend_config().unwrap();
        assert_eq!(config.url().as_str(), "http://localhost:54321/");
        assert_eq!(config.anon_key(), "anon");
    }
}
