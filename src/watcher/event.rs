//! Watch event types and options

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Debounce duration in milliseconds
pub const DEBOUNCE_MS: u64 = 100;

/// Default glob for files that trigger a recompile
pub const DEFAULT_STYLE_GLOB: &str = "**/*.scss";

/// Watch options
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Project root (watched recursively)
    pub root: PathBuf,
    /// Globs, relative to `root`, of sources that trigger a recompile
    pub style_globs: Vec<String>,
    /// Globs, relative to `root`, never watched or uploaded
    pub ignore: Vec<String>,
    /// Run the initial cycle only
    pub once: bool,
}

impl WatchOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            style_globs: vec![DEFAULT_STYLE_GLOB.to_string()],
            ignore: Vec::new(),
            once: false,
        }
    }
}

/// Kind of filesystem change, named the way file watchers usually report them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeKind {
    Add,
    AddDir,
    Change,
    Unlink,
    UnlinkDir,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Add => "add",
            ChangeKind::AddDir => "addDir",
            ChangeKind::Change => "change",
            ChangeKind::Unlink => "unlink",
            ChangeKind::UnlinkDir => "unlinkDir",
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, ChangeKind::AddDir | ChangeKind::UnlinkDir)
    }

    pub fn is_removal(&self) -> bool {
        matches!(self, ChangeKind::Unlink | ChangeKind::UnlinkDir)
    }

    /// Fold a newer event for the same path into this one
    fn merge(self, newer: ChangeKind) -> ChangeKind {
        match (self, newer) {
            // still new as far as the remote is concerned
            (ChangeKind::Add, ChangeKind::Change) => ChangeKind::Add,
            (_, newer) => newer,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change that passed the filter, path relative to the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub kind: ChangeKind,
    pub path: PathBuf,
    /// Matches one of the style globs
    pub is_style: bool,
}

impl Change {
    /// Path with `/` separators, for display and remote names
    pub fn display_path(&self) -> String {
        slash_path(&self.path)
    }
}

pub(crate) fn slash_path(path: &std::path::Path) -> String {
    path.components()
        .filter_map(|c| match c {
            std::path::Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Why an upload did not happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Same bytes as the last upload
    Unchanged,
    /// Local file was deleted; remote deletions are not mirrored
    Removed,
    /// Directories are created on demand by file uploads
    Directory,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::Unchanged => "unchanged",
            SkipReason::Removed => "removed locally",
            SkipReason::Directory => "directory",
        })
    }
}

/// Watch event types for NDJSON output
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    WatchStarted {
        root: String,
        modes: Vec<String>,
    },
    Connecting {
        address: String,
    },
    Connected {
        address: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        welcome: Option<String>,
    },
    ReloadServerStarted {
        address: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        site: Option<String>,
    },
    FileChanged {
        kind: ChangeKind,
        path: String,
    },
    CompileStarted {
        entry: String,
    },
    CompileFailed {
        entry: String,
        message: String,
    },
    OutputWritten {
        path: String,
        bytes: usize,
    },
    Uploaded {
        local: String,
        remote: String,
        bytes: u64,
    },
    UploadSkipped {
        path: String,
        reason: SkipReason,
    },
    ReloadSent {
        path: String,
        clients: usize,
    },
    Error {
        message: String,
    },
    ConnectionClosed,
    ConnectionEnded {
        message: String,
    },
    Shutdown,
}

impl WatchEvent {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn error(message: impl Into<String>) -> Self {
        WatchEvent::Error {
            message: message.into(),
        }
    }

    /// Events that belong on stderr
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            WatchEvent::Error { .. }
                | WatchEvent::CompileFailed { .. }
                | WatchEvent::ConnectionEnded { .. }
        )
    }
}

/// Watcher state for debouncing
pub(crate) struct WatcherState {
    pub(crate) pending_changes: BTreeMap<PathBuf, Change>,
    pub(crate) last_change: Option<Instant>,
}

impl WatcherState {
    pub(crate) fn new() -> Self {
        Self {
            pending_changes: BTreeMap::new(),
            last_change: None,
        }
    }

    pub(crate) fn add_change(&mut self, change: Change) {
        match self.pending_changes.get_mut(&change.path) {
            Some(existing) => {
                existing.kind = existing.kind.merge(change.kind);
                existing.is_style = change.is_style;
            }
            None => {
                self.pending_changes.insert(change.path.clone(), change);
            }
        }
        self.last_change = Some(Instant::now());
    }

    pub(crate) fn should_sync(&self) -> bool {
        if let Some(last) = self.last_change {
            !self.pending_changes.is_empty() && last.elapsed() >= Duration::from_millis(DEBOUNCE_MS)
        } else {
            false
        }
    }

    pub(crate) fn take_changes(&mut self) -> Vec<Change> {
        let changes: Vec<_> = std::mem::take(&mut self.pending_changes)
            .into_values()
            .collect();
        self.last_change = None;
        changes
    }
}
