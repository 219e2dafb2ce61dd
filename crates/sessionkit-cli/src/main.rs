//! sessionkit - command-line client for a bearer-token web API.
//!
//! Each invocation behaves like a fresh page load: the in-memory session
//! starts empty and is restored from the persisted token by the route guard.

mod commands;
mod console;

use std::io;
use std::path::Path;

use anyhow::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sessionkit_core::Config;

use commands::Command;

/// Log file prefix inside the data directory
const LOG_FILE_PREFIX: &str = "sessionkit.log";

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr (filtered by `RUST_LOG`, default `warn`) and, when the
/// data directory is known, to a daily rolling file at debug level.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let stderr_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_filter(stderr_filter);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new("sessionkit_core=debug,sessionkit=debug"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

fn usage() -> &'static str {
    "Usage: sessionkit <command> [args]

Commands:
  login [email]          Log in and persist the session token
  logout                 End the session and forget the token
  status                 Show whether a token is stored and when it expires
  whoami                 Fetch the current user's profile
  visit <route>          Run the route guard for a destination
  get <path>             Send an authenticated GET and print the JSON body
  theme [value]          Show or set the theme for the current user
  check-email <email>    Validate an email address
  check-password         Check password strength (prompts)
  init                   Write the current configuration to the config file"
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Some(command) => command,
        None => {
            eprintln!("{}", usage());
            std::process::exit(2);
        }
    };

    let config = Config::load()?;
    let log_dir = config.data_dir().ok();
    if let Some(ref dir) = log_dir {
        let _ = std::fs::create_dir_all(dir);
    }
    let _log_guard = init_tracing(log_dir.as_deref());
    info!(api_base = %config.api_base, "sessionkit starting");

    commands::run(command, config).await
}
