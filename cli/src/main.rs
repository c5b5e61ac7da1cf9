//! Vitrine CLI - binary entry point.
//!
//! Wires the session kernel end to end: file-backed preference storage, the
//! remote site configuration, the content collections, and the
//! admin-visibility probe.
//!
//! ```text
//! vitrine [status]            resolved session state + admin visibility
//! vitrine lang <fr|en>        switch the display language
//! vitrine theme <light|dark>  switch the theme (no-op when disallowed)
//! vitrine consent <accept|reject|reset>
//! vitrine admin               run the admin-visibility probe once
//! ```

use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::{env, process};

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use vitrine_core::{AdminGate, Endpoints, Remotes, Session};
use vitrine_store::{FileStorage, MarkerSet, Storage, ThemeTarget};
use vitrine_types::Language;
use vitrine_types::theme::ActiveTheme;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // If we can't open a log file, prefer "no logs" over mixing diagnostics
    // into the command output.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".vitrine").join("logs").join("vitrine.log"));
    }
    candidates.push(env::temp_dir().join("vitrine.log"));
    candidates
}

fn prefs_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("no home directory; cannot locate preferences")?;
    Ok(home.join(".vitrine").join("prefs.toml"))
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Status,
    Lang(Language),
    Theme(ActiveTheme),
    Consent(ConsentAction),
    Admin,
}

#[derive(Debug, PartialEq, Eq)]
enum ConsentAction {
    Accept,
    Reject,
    Reset,
}

fn parse_command(args: &[String]) -> Result<Command, String> {
    match args.first().map(String::as_str) {
        None | Some("status") => Ok(Command::Status),
        Some("lang") => match args.get(1).map(String::as_str) {
            Some(code) => Language::parse(code)
                .map(Command::Lang)
                .ok_or_else(|| format!("unknown language {code:?} (expected fr or en)")),
            None => Err("lang requires a language code (fr or en)".to_string()),
        },
        Some("theme") => match args.get(1).map(String::as_str) {
            Some(name) => ActiveTheme::parse(name)
                .map(Command::Theme)
                .ok_or_else(|| format!("unknown theme {name:?} (expected light or dark)")),
            None => Err("theme requires a theme name (light or dark)".to_string()),
        },
        Some("consent") => match args.get(1).map(String::as_str) {
            Some("accept") => Ok(Command::Consent(ConsentAction::Accept)),
            Some("reject") => Ok(Command::Consent(ConsentAction::Reject)),
            Some("reset") => Ok(Command::Consent(ConsentAction::Reset)),
            other => Err(format!(
                "consent requires accept, reject, or reset (got {other:?})"
            )),
        },
        Some("admin") => Ok(Command::Admin),
        Some(other) => Err(format!("unknown command {other:?}")),
    }
}

const USAGE: &str = "usage: vitrine [status | lang <fr|en> | theme <light|dark> | consent <accept|reject|reset> | admin]";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match parse_command(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };

    let endpoints = Endpoints::load().context("loading endpoint configuration")?;
    let remotes = Remotes::connect(&endpoints).context("connecting remote clients")?;

    let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(prefs_path()?));
    let target = Arc::new(MarkerSet::new());
    let session = Session::bootstrap(
        Arc::clone(&storage),
        Arc::clone(&target) as Arc<dyn ThemeTarget>,
        &remotes.api,
    )
    .await;

    match command {
        Command::Status => status(&session, &remotes).await,
        Command::Lang(lang) => {
            session.language.set_language(lang);
            println!("language: {lang}");
            Ok(())
        }
        Command::Theme(theme) => {
            session.theme.set_theme(theme);
            let active = session.theme.theme();
            if active == theme {
                println!("theme: {active}");
            } else {
                println!("theme: {active} (switching is disabled for this site)");
            }
            Ok(())
        }
        Command::Consent(action) => {
            match action {
                ConsentAction::Accept => session.consent.accept(),
                ConsentAction::Reject => session.consent.reject(),
                ConsentAction::Reset => session.consent.reset(),
            }
            println!("consent: {:?}", session.consent.decision());
            Ok(())
        }
        Command::Admin => {
            let gate = AdminGate::new(remotes.ip.clone(), remotes.allowlist.clone());
            let access = gate.check().await;
            match (&access.ip, access.allowed) {
                (Some(ip), true) => println!("admin link visible ({ip})"),
                (Some(ip), false) => println!("admin link hidden ({ip})"),
                (None, _) => println!("admin link hidden (address not resolved)"),
            }
            Ok(())
        }
    }
}

async fn status(session: &Session, remotes: &Remotes) -> Result<()> {
    println!("language: {}", session.language.language());
    println!(
        "theme:    {} (switchable: {})",
        session.theme.theme(),
        session.theme.can_toggle()
    );
    println!(
        "consent:  {:?} (banner: {})",
        session.consent.decision(),
        if session.consent.banner_visible() {
            "shown"
        } else {
            "hidden"
        }
    );

    print_content_summary(remotes).await;

    let gate = AdminGate::new(remotes.ip.clone(), remotes.allowlist.clone());
    let access = gate.check().await;
    println!(
        "admin:    {}",
        if access.allowed { "visible" } else { "hidden" }
    );
    Ok(())
}

/// Content reads are informational; a failed collection prints as
/// unavailable rather than failing the status command.
async fn print_content_summary(remotes: &Remotes) {
    let mut out = std::io::stdout();

    match remotes.api.projects().await {
        Ok(projects) => {
            let _ = writeln!(out, "projects: {}", projects.len());
        }
        Err(e) => {
            tracing::warn!("Projects unavailable: {e}");
            let _ = writeln!(out, "projects: unavailable");
        }
    }
    match remotes.api.skills().await {
        Ok(skills) => {
            let _ = writeln!(out, "skills:   {}", skills.len());
        }
        Err(e) => {
            tracing::warn!("Skills unavailable: {e}");
            let _ = writeln!(out, "skills:   unavailable");
        }
    }
    match remotes.api.gallery().await {
        Ok(items) => {
            let _ = writeln!(out, "gallery:  {}", items.len());
        }
        Err(e) => {
            tracing::warn!("Gallery unavailable: {e}");
            let _ = writeln!(out, "gallery:  unavailable");
        }
    }
    match remotes.api.about().await {
        Ok(Some(about)) => {
            let _ = writeln!(out, "about:    {}", about.headline);
        }
        Ok(None) => {
            let _ = writeln!(out, "about:    (empty)");
        }
        Err(e) => {
            tracing::warn!("About unavailable: {e}");
            let _ = writeln!(out, "about:    unavailable");
        }
    }
    match remotes.api.contact().await {
        Ok(Some(contact)) => {
            let _ = writeln!(out, "contact:  {}", contact.email);
        }
        Ok(None) => {
            let _ = writeln!(out, "contact:  (empty)");
        }
        Err(e) => {
            tracing::warn!("Contact unavailable: {e}");
            let _ = writeln!(out, "contact:  unavailable");
        }
    }
}
