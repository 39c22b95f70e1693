use crate::ui::context::UiContext;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::{paint, strong, Tone};

/// Title line followed by aligned `Label: value` rows
#[derive(Debug, Clone)]
pub struct Banner {
    icon: Icon,
    title: String,
    rows: Vec<(&'static str, String)>,
}

impl Banner {
    pub fn new(icon: Icon, title: impl Into<String>) -> Self {
        Self {
            icon,
            title: title.into(),
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, label: &'static str, value: impl Into<String>) -> Self {
        self.rows.push((label, value.into()));
        self
    }

    pub fn render(&self, ui: &UiContext) -> String {
        let mut out = format!(
            "{} {}\n",
            self.icon.paint(ui),
            strong(ui, Tone::Info, &self.title)
        );
        let width = self.rows.iter().map(|(l, _)| l.len() + 1).max().unwrap_or(0);
        for (label, value) in &self.rows {
            let label = format!("{:<width$}", format!("{label}:"));
            out.push_str(&format!("{} {}\n", paint(ui, Tone::Dim, &label), value));
        }
        out
    }
}
