//! SCSS compilation
//!
//! Wraps the `grass` compiler and the two things we do with its output:
//! writing it atomically next to the sources, and rendering compile errors
//! into the stylesheet so they show up in the browser.

mod overlay;
mod writer;

pub use overlay::{error_overlay, with_error_overlay, OVERLAY_MARKER};
pub use writer::{atomic_write, hash_content};

use std::path::PathBuf;

/// CSS output style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputStyle {
    #[default]
    Expanded,
    Compressed,
}

impl From<OutputStyle> for grass::OutputStyle {
    fn from(style: OutputStyle) -> Self {
        match style {
            OutputStyle::Expanded => grass::OutputStyle::Expanded,
            OutputStyle::Compressed => grass::OutputStyle::Compressed,
        }
    }
}

/// A failed compile, already formatted for humans
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    pub message: String,
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CompileError {}

/// Compiles one entry stylesheet.
#[derive(Debug, Clone)]
pub struct StyleCompiler {
    entry: PathBuf,
    load_paths: Vec<PathBuf>,
    style: OutputStyle,
}

impl StyleCompiler {
    pub fn new(entry: impl Into<PathBuf>) -> Self {
        Self {
            entry: entry.into(),
            load_paths: Vec::new(),
            style: OutputStyle::default(),
        }
    }

    pub fn with_style(mut self, style: OutputStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_load_paths(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.load_paths.extend(paths);
        self
    }

    /// Compile the entry file to CSS text.
    pub fn compile(&self) -> Result<String, CompileError> {
        let mut options = grass::Options::default().style(self.style.into());
        if let Some(dir) = self.entry.parent().filter(|d| !d.as_os_str().is_empty()) {
            options = options.load_path(dir);
        }
        for path in &self.load_paths {
            options = options.load_path(path);
        }

        tracing::debug!(entry = %self.entry.display(), "compiling stylesheet");
        grass::from_path(&self.entry, &options).map_err(|e| CompileError {
            message: e.to_string(),
        })
    }
}
