use crossterm::style::Color;

/// Colors and glyphs for watch output. Everything printed to the terminal
/// takes its styling from here.
pub mod colors {
    use super::Color;

    pub const OK: Color = Color::Green;
    pub const ERROR: Color = Color::Red;
    pub const WARNING: Color = Color::Yellow;
    pub const INFO: Color = Color::Cyan;
    pub const DIM: Color = Color::DarkGrey;
}

/// A line marker with its plain-ASCII fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub unicode: &'static str,
    pub ascii: &'static str,
}

pub mod glyphs {
    use super::Glyph;

    pub const OK: Glyph = Glyph { unicode: "✓", ascii: "[OK]" };
    pub const FAIL: Glyph = Glyph { unicode: "✗", ascii: "[FAIL]" };
    pub const WARN: Glyph = Glyph { unicode: "⚠", ascii: "[WARN]" };
    pub const COMPILE: Glyph = Glyph { unicode: "●", ascii: "[..]" };
    /// Change, upload and skip lines read `=> ...` on every terminal
    pub const DETECTED: Glyph = Glyph { unicode: "=>", ascii: "=>" };
    pub const WATCH: Glyph = Glyph { unicode: "⟳", ascii: "[~]" };
    pub const FTP: Glyph = Glyph { unicode: "📡", ascii: "[FTP]" };
    pub const RELOAD: Glyph = Glyph { unicode: "↻", ascii: "[RELOAD]" };
}
