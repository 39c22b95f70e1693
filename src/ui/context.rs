use stylesync::watcher::WatchEvent;

use crate::cli::ColorWhen;
use crate::ui::terminal::{detect_capabilities, TerminalCapabilities};
use crate::ui::views::watch::render_watch_event;

/// How watch output is printed: NDJSON, or timestamped lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiContext {
    pub json: bool,
    pub color: bool,
    pub unicode: bool,
}

impl UiContext {
    pub fn new(json: bool, cli_color: Option<ColorWhen>) -> Self {
        Self::from_caps(json, cli_color, detect_capabilities())
    }

    pub(crate) fn from_caps(
        json: bool,
        cli_color: Option<ColorWhen>,
        caps: TerminalCapabilities,
    ) -> Self {
        let color = match cli_color {
            Some(ColorWhen::Never) => false,
            Some(ColorWhen::Always) => true,
            Some(ColorWhen::Auto) | None => !json && caps.color,
        };

        Self {
            json,
            color,
            unicode: caps.unicode,
        }
    }

    /// Print one watch event; error lines go to stderr
    pub fn print_event(&self, event: &WatchEvent) {
        if self.json {
            println!("{}", event.to_json());
            return;
        }
        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
        let rendered = render_watch_event(&timestamp, event, self);
        if event.is_error() {
            eprint!("{rendered}");
        } else {
            print!("{rendered}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tty() -> TerminalCapabilities {
        TerminalCapabilities {
            color: true,
            unicode: true,
        }
    }

    #[test]
    fn color_flag_overrides_detection() {
        let plain = TerminalCapabilities {
            color: false,
            ..tty()
        };
        assert!(UiContext::from_caps(false, Some(ColorWhen::Always), plain).color);
        assert!(!UiContext::from_caps(false, Some(ColorWhen::Never), tty()).color);
    }

    #[test]
    fn json_output_is_never_auto_colored() {
        assert!(!UiContext::from_caps(true, None, tty()).color);
        assert!(UiContext::from_caps(false, Some(ColorWhen::Auto), tty()).color);
    }
}
