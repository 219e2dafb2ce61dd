use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use sessionkit_core::utils::{format_date, is_strong_password, is_valid_email};
use sessionkit_core::{
    AuthError, Config, Credentials, GuardDecision, HistoryNavigator, SessionContext, Toaster,
};

use crate::console::ConsoleNotifier;

/// Route the profile and preference commands guard against
const PROFILE_ROUTE: &str = "/profile";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login(Option<String>),
    Logout,
    Status,
    WhoAmI,
    Visit(String),
    Get(String),
    Theme(Option<String>),
    CheckEmail(String),
    CheckPassword,
    Init,
}

impl Command {
    pub fn parse(args: &[String]) -> Option<Self> {
        let (name, rest) = args.split_first()?;
        let arg = rest.first().cloned();
        match (name.as_str(), arg) {
            ("login", email) => Some(Command::Login(email)),
            ("logout", None) => Some(Command::Logout),
            ("status", None) => Some(Command::Status),
            ("whoami", None) => Some(Command::WhoAmI),
            ("visit", Some(route)) => Some(Command::Visit(route)),
            ("get", Some(path)) => Some(Command::Get(path)),
            ("theme", value) => Some(Command::Theme(value)),
            ("check-email", Some(email)) => Some(Command::CheckEmail(email)),
            ("check-password", None) => Some(Command::CheckPassword),
            ("init", None) => Some(Command::Init),
            _ => None,
        }
    }
}

pub async fn run(command: Command, config: Config) -> Result<()> {
    if command == Command::Init {
        let path = config.save()?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let navigator = Arc::new(HistoryNavigator::new());
    let toaster = Toaster::new(Arc::new(ConsoleNotifier));
    let ctx = SessionContext::from_config(config, navigator.clone(), toaster)?;

    let result = match command {
        Command::Login(email) => login(&ctx, email).await,
        Command::Logout => {
            ctx.credentials().logout();
            ctx.toaster().info("Logged out");
            Ok(())
        }
        Command::Status => {
            status(&ctx);
            Ok(())
        }
        Command::WhoAmI => whoami(&ctx).await,
        Command::Visit(route) => {
            visit(&ctx, &route);
            Ok(())
        }
        Command::Get(path) => get(&ctx, &path).await,
        Command::Theme(value) => theme(&ctx, value).await,
        Command::CheckEmail(email) => {
            check(&ctx, is_valid_email(&email), "Valid email", "Invalid email");
            Ok(())
        }
        Command::CheckPassword => {
            let password = rpassword::prompt_password("Password: ")?;
            check(
                &ctx,
                is_strong_password(&password),
                "Strong password",
                "Weak password: use 8+ characters with upper, lower, and a digit",
            );
            Ok(())
        }
        Command::Init => Ok(()),
    };

    if let Some(route) = navigator.last() {
        debug!(redirects = navigator.count(), "Navigation requested");
        eprintln!("→ {}", route);
    }
    result
}

fn prompt(label: &str) -> Result<String> {
    eprint!("{}", label);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read input")?;
    Ok(line.trim().to_string())
}

async fn login(ctx: &SessionContext, email: Option<String>) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    if !is_valid_email(&email) {
        ctx.toaster().warning("That does not look like an email address");
    }
    let password = rpassword::prompt_password("Password: ")?;

    match ctx.credentials().login(&Credentials::new(email, password)).await {
        Ok(session) => {
            let name = session
                .user
                .as_ref()
                .map(|u| u.display_name().to_string())
                .unwrap_or_default();
            ctx.toaster()
                .success(&format!("Welcome to {}, {}", ctx.config().app_name, name));
            Ok(())
        }
        Err(e) => {
            ctx.toaster().error("Login failed");
            Err(e.into())
        }
    }
}

fn status(ctx: &SessionContext) {
    match ctx.persisted().read_record() {
        Some(record) => {
            let remaining = record.time_until_expiry(ctx.persisted().now());
            println!(
                "{}: token stored, expires {} ({}d {}h left)",
                ctx.config().app_name,
                format_date(&record.expires_at.to_rfc3339()),
                remaining.num_days(),
                remaining.num_hours() % 24
            );
        }
        None => println!("{}: not logged in", ctx.config().app_name),
    }
}

/// Run the guard for `route`; false when it redirected
fn guard(ctx: &SessionContext, route: &str) -> bool {
    match ctx.guard().evaluate(route) {
        GuardDecision::Allow => true,
        GuardDecision::Redirect(_) => {
            ctx.toaster().info("Please log in first");
            false
        }
    }
}

fn visit(ctx: &SessionContext, route: &str) {
    if guard(ctx, route) {
        println!("Allowed: {}", route);
    }
}

async fn whoami(ctx: &SessionContext) -> Result<()> {
    if !guard(ctx, PROFILE_ROUTE) {
        return Ok(());
    }
    match ctx.credentials().fetch_profile().await {
        Ok(user) => {
            println!("{}", user.display_name());
            if let Some(ref email) = user.email {
                println!("{}", email);
            }
            Ok(())
        }
        Err(AuthError::SessionInvalid(e)) => {
            ctx.toaster().error("Your session has ended, please log in again");
            debug!(error = %e, "Profile fetch failed");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn get(ctx: &SessionContext, path: &str) -> Result<()> {
    let body: serde_json::Value = ctx.api().get(path).await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

async fn theme(ctx: &SessionContext, value: Option<String>) -> Result<()> {
    // Preferences are keyed by user, so the profile has to be known first
    if !guard(ctx, PROFILE_ROUTE) || ctx.credentials().fetch_profile().await.is_err() {
        return Ok(());
    }
    let prefs = ctx.preferences();
    match value {
        Some(theme) => {
            prefs.set_theme(&theme);
            ctx.toaster().success(&format!("Theme set to {}", theme));
        }
        None => println!("{}", prefs.theme().as_deref().unwrap_or("system default")),
    }
    Ok(())
}

fn check(ctx: &SessionContext, ok: bool, pass: &str, fail: &str) {
    if ok {
        ctx.toaster().success(pass);
    } else {
        ctx.toaster().error(fail);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse(&args(&["login"])), Some(Command::Login(None)));
        assert_eq!(
            Command::parse(&args(&["login", "a@b.com"])),
            Some(Command::Login(Some("a@b.com".to_string())))
        );
        assert_eq!(
            Command::parse(&args(&["visit", "/dashboard"])),
            Some(Command::Visit("/dashboard".to_string()))
        );
        assert_eq!(Command::parse(&args(&["theme"])), Some(Command::Theme(None)));
        assert_eq!(Command::parse(&args(&["init"])), Some(Command::Init));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(Command::parse(&[]), None);
        assert_eq!(Command::parse(&args(&["visit"])), None);
        assert_eq!(Command::parse(&args(&["logout", "now"])), None);
        assert_eq!(Command::parse(&args(&["dance"])), None);
    }
}
