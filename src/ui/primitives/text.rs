use crossterm::style::{Color, Stylize};

use crate::ui::context::UiContext;
use crate::ui::theme::colors;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Error,
    Info,
    Dim,
}

impl Tone {
    fn color(self) -> Color {
        match self {
            Tone::Error => colors::ERROR,
            Tone::Info => colors::INFO,
            Tone::Dim => colors::DIM,
        }
    }
}

pub fn paint(ui: &UiContext, tone: Tone, text: &str) -> String {
    if ui.color {
        text.with(tone.color()).to_string()
    } else {
        text.to_string()
    }
}

/// Bold variant of [`paint`], for labels like `SASS`
pub fn strong(ui: &UiContext, tone: Tone, text: &str) -> String {
    if ui.color {
        text.with(tone.color()).bold().to_string()
    } else {
        text.to_string()
    }
}
