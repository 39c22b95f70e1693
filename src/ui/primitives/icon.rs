use crossterm::style::{Color, Stylize};

use crate::ui::context::UiContext;
use crate::ui::theme::{colors, glyphs, Glyph};

/// Line markers of the watch output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Ok,
    Fail,
    Warn,
    Compile,
    Detected,
    Watch,
    Ftp,
    Reload,
}

impl Icon {
    fn glyph(self) -> Glyph {
        match self {
            Icon::Ok => glyphs::OK,
            Icon::Fail => glyphs::FAIL,
            Icon::Warn => glyphs::WARN,
            Icon::Compile => glyphs::COMPILE,
            Icon::Detected => glyphs::DETECTED,
            Icon::Watch => glyphs::WATCH,
            Icon::Ftp => glyphs::FTP,
            Icon::Reload => glyphs::RELOAD,
        }
    }

    fn color(self) -> Color {
        match self {
            Icon::Ok => colors::OK,
            Icon::Fail => colors::ERROR,
            Icon::Warn | Icon::Compile => colors::WARNING,
            Icon::Detected => colors::DIM,
            Icon::Watch | Icon::Ftp | Icon::Reload => colors::INFO,
        }
    }

    pub fn symbol(self, unicode: bool) -> &'static str {
        let glyph = self.glyph();
        if unicode {
            glyph.unicode
        } else {
            glyph.ascii
        }
    }

    pub fn paint(self, ui: &UiContext) -> String {
        let symbol = self.symbol(ui.unicode);
        if ui.color {
            symbol.with(self.color()).to_string()
        } else {
            symbol.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_fallbacks() {
        assert_eq!(Icon::Ok.symbol(false), "[OK]");
        assert_eq!(Icon::Ftp.symbol(false), "[FTP]");
    }

    #[test]
    fn detected_marker_is_the_same_everywhere() {
        assert_eq!(Icon::Detected.symbol(true), "=>");
        assert_eq!(Icon::Detected.symbol(false), "=>");
    }

    #[test]
    fn paint_without_color_is_plain() {
        let ui = UiContext {
            json: false,
            color: false,
            unicode: true,
        };
        assert_eq!(Icon::Warn.paint(&ui), "⚠");
    }
}
