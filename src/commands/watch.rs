use std::net::Ipv4Addr;
use std::path::Path;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

use stylesync::config::{self, ConfigWarning, RemoteConfig};
use stylesync::reload::LiveReloadServer;
use stylesync::session::{Modes, Session, SessionOptions};
use stylesync::transfer::{FtpSettings, FtpTransfer};
use stylesync::watcher::{watch, WatchEvent, WatchOptions};
use stylesync::StyleCompiler;

use crate::cli::Cli;
use crate::ui::context::UiContext;
use crate::ui::primitives::icon::Icon;
use crate::ui::views::watch::{render_watch_header, WatchHeader};

pub fn cmd_watch(cli: &Cli) -> Result<ExitCode> {
    let ui = UiContext::new(cli.json, cli.color);
    let root = cli
        .root
        .canonicalize()
        .with_context(|| format!("project directory not found: {}", cli.root.display()))?;

    let modes = Modes {
        sass: cli.sass,
        ftpall: cli.ftpall,
        livereload: cli.livereload,
    };

    // Reload-only runs never touch FTP, so they need no config
    let remote = if modes.needs_transfer() {
        Some(load_config(cli.config.as_deref(), &root, &ui)?)
    } else {
        None
    };

    let target = remote
        .as_ref()
        .map(|c| config::resolve_target(&c.target, &root))
        .unwrap_or_else(|| "/".to_string());

    let mut options =
        SessionOptions::new(&root, target.clone(), modes).with_paths(&cli.entry, &cli.output)?;
    options.error_overlay = !cli.no_error_overlay;

    let compiler = StyleCompiler::new(root.join(&options.entry))
        .with_style(cli.style.into())
        .with_load_paths(cli.load_paths.iter().cloned());

    let transfer = remote
        .as_ref()
        .map(|c| FtpTransfer::new(FtpSettings::from(c)));
    let address = transfer.as_ref().map(|t| t.settings().address());

    let mut session = Session::new(options, compiler, transfer);

    let render = |event: WatchEvent| ui.print_event(&event);

    if !ui.json {
        let root_display = root.display().to_string();
        let header = WatchHeader {
            root: &root_display,
            modes: &modes.labels(),
            remote: address.as_deref().map(|a| (a, target.as_str())),
        };
        print!("{}", render_watch_header(&header, &ui));
    }

    if modes.livereload {
        let server = LiveReloadServer::bind((Ipv4Addr::UNSPECIFIED, cli.reload_port))?;
        render(WatchEvent::ReloadServerStarted {
            address: server.local_addr().to_string(),
            site: cli
                .url
                .clone()
                .or_else(|| remote.as_ref().map(|c| c.hostname.clone()))
                .map(|site| format!("http://{}", site)),
        });
        session = session.with_notifier(Box::new(server));
    }

    // First Ctrl+C closes cleanly, a second one forces the exit
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        if !running_clone.swap(false, Ordering::SeqCst) {
            std::process::exit(1);
        }
    })
    .context("Error setting Ctrl+C handler")?;

    let mut watch_options = WatchOptions::new(&root);
    watch_options.ignore = remote.map(|c| c.ignore).unwrap_or_default();
    watch_options.once = cli.once;

    match watch(watch_options, &mut session, running, render) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            tracing::debug!(error = %e, "watch ended with an error");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn load_config(explicit: Option<&Path>, root: &Path, ui: &UiContext) -> Result<RemoteConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => config::discover(root)?,
    };
    tracing::info!(path = %path.display(), "loading config");

    let (remote, warnings) = config::load_with_warnings(&path)?;
    for warning in &warnings {
        print_config_warning(warning, ui);
    }
    Ok(config::with_env_overrides(remote))
}

fn print_config_warning(warning: &ConfigWarning, ui: &UiContext) {
    if ui.json {
        let output = serde_json::json!({
            "event": "config_warning",
            "key": warning.key,
            "file": warning.file.display().to_string(),
            "line": warning.line,
            "suggestion": warning.suggestion,
        });
        println!("{}", output);
        return;
    }

    let location = match warning.line {
        Some(line) => format!("{}:{}", warning.file.display(), line),
        None => warning.file.display().to_string(),
    };
    let hint = warning
        .suggestion
        .as_ref()
        .map(|s| format!(" (did you mean '{}'?)", s))
        .unwrap_or_default();
    eprintln!(
        "{} unknown config key '{}' in {}{}",
        Icon::Warn.paint(ui),
        warning.key,
        location,
        hint
    );
}
