use crate::ui::blocks::header::Banner;
use crate::ui::context::UiContext;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::{paint, strong, Tone};
use stylesync::watcher::WatchEvent;

/// What the header shows about the session
pub struct WatchHeader<'a> {
    pub root: &'a str,
    pub modes: &'a [String],
    /// `host:port` and resolved target, when uploading
    pub remote: Option<(&'a str, &'a str)>,
}

pub fn render_watch_header(header: &WatchHeader<'_>, ui: &UiContext) -> String {
    let mut banner = Banner::new(Icon::Watch, "stylesync")
        .row("Root", header.root)
        .row("Modes", header.modes.join(", "));
    if let Some((address, target)) = header.remote {
        banner = banner.row("Remote", format!("ftp://{}{}", address, target));
    }
    banner
        .row("Hint", "Ctrl+c to close cleanly, and again to force exit")
        .render(ui)
}

pub fn render_watch_event(timestamp: &str, event: &WatchEvent, ui: &UiContext) -> String {
    let prefix = paint(ui, Tone::Dim, &format!("[{}]", timestamp));
    let icon = |i: Icon| i.paint(ui);

    match event {
        WatchEvent::WatchStarted { root, .. } => {
            format!("{} {} Watching: {}\n", prefix, icon(Icon::Watch), root)
        }
        WatchEvent::Connecting { address } => format!(
            "{} {} Connecting to FTP account {}... Ctrl+c to close cleanly, and again to force exit.\n",
            prefix,
            icon(Icon::Ftp),
            address
        ),
        WatchEvent::Connected { welcome, .. } => {
            let mut out = String::new();
            if let Some(welcome) = welcome {
                out.push_str(&format!(
                    "{} {} {}\n",
                    prefix,
                    icon(Icon::Ftp),
                    paint(ui, Tone::Dim, welcome)
                ));
            }
            out.push_str(&format!(
                "{} {} Connected & watching for sass file changes to upload.\n",
                prefix,
                icon(Icon::Ok)
            ));
            out
        }
        WatchEvent::ReloadServerStarted { address, site } => {
            let mut out = format!(
                "{} {} LiveReload server: ws://{}/livereload\n",
                prefix,
                icon(Icon::Reload),
                address
            );
            if let Some(site) = site {
                out.push_str(&format!(
                    "{} {} Live site: {}\n",
                    prefix,
                    icon(Icon::Reload),
                    paint(ui, Tone::Info, site)
                ));
            }
            out
        }
        WatchEvent::FileChanged { kind, path } => format!(
            "{} {} {} detected: {}\n",
            prefix,
            icon(Icon::Detected),
            kind,
            path
        ),
        WatchEvent::CompileStarted { entry } => format!(
            "{} {} Compiling {}\n",
            prefix,
            icon(Icon::Compile),
            entry
        ),
        WatchEvent::CompileFailed { message, .. } => format!(
            "{} {} {} {}\n",
            prefix,
            icon(Icon::Fail),
            strong(ui, Tone::Error, "SASS"),
            message
        ),
        WatchEvent::OutputWritten { path, bytes } => format!(
            "{} {} Wrote {} ({} bytes)\n",
            prefix,
            icon(Icon::Ok),
            path,
            bytes
        ),
        WatchEvent::Uploaded { local, remote, .. } => format!(
            "{} {} uploaded File: {} {}\n",
            prefix,
            icon(Icon::Detected),
            local,
            paint(ui, Tone::Dim, &format!("-> {}", remote))
        ),
        WatchEvent::UploadSkipped { path, reason } => format!(
            "{} {} Skipped {} ({})\n",
            prefix,
            icon(Icon::Detected),
            path,
            reason
        ),
        WatchEvent::ReloadSent { clients, .. } => {
            let noun = if *clients == 1 { "browser" } else { "browsers" };
            format!(
                "{} {} Reloaded {} {}\n",
                prefix,
                icon(Icon::Reload),
                clients,
                noun
            )
        }
        WatchEvent::Error { message } => {
            format!("{} {} {}\n", prefix, icon(Icon::Fail), message)
        }
        WatchEvent::ConnectionClosed => format!(
            "{} {} FTP connection closed\n",
            prefix,
            icon(Icon::Ftp)
        ),
        WatchEvent::ConnectionEnded { message } => format!(
            "{} {} FTP connection ended: {}\n",
            prefix,
            icon(Icon::Fail),
            message
        ),
        WatchEvent::Shutdown => format!("\n{} {} Watch stopped.\n", prefix, icon(Icon::Watch)),
    }
}
