//! Deciding which filesystem events matter

use std::path::{Component, Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::overrides::{Override, OverrideBuilder};
use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
use notify::EventKind;

use crate::error::{StyleSyncError, StyleSyncResult};

use super::event::{Change, ChangeKind};

/// Turns raw watcher paths into project-relative [`Change`]s.
///
/// Dropped: paths outside the root, paths with a dot-prefixed component
/// (`.git`, `.remote-sync.json`, editor swap files), paths matching the
/// config `ignore` globs, and explicitly ignored files such as the compiled
/// output.
pub struct ChangeFilter {
    root: PathBuf,
    styles: Override,
    excluded: Gitignore,
    ignored_files: Vec<PathBuf>,
}

impl ChangeFilter {
    pub fn new(root: &Path, style_globs: &[String], ignore: &[String]) -> StyleSyncResult<Self> {
        let mut styles = OverrideBuilder::new(root);
        for glob in style_globs {
            styles.add(glob).map_err(|e| invalid(glob, e))?;
        }
        let styles = styles.build().map_err(|e| invalid(&style_globs.join(","), e))?;

        let mut excluded = GitignoreBuilder::new(root);
        for glob in ignore {
            excluded.add_line(None, glob).map_err(|e| invalid(glob, e))?;
        }
        let excluded = excluded.build().map_err(|e| invalid(&ignore.join(","), e))?;

        Ok(Self {
            root: root.to_path_buf(),
            styles,
            excluded,
            ignored_files: Vec::new(),
        })
    }

    /// Never report this file (project-relative, or absolute inside the root)
    pub fn ignore_file(&mut self, path: impl AsRef<Path>) {
        if let Some(relative) = self.relative(path.as_ref()) {
            self.ignored_files.push(relative);
        }
    }

    /// Project-relative form of `path`, or `None` if it lies outside the root
    pub fn relative(&self, path: &Path) -> Option<PathBuf> {
        if path.is_relative() {
            return Some(normalize(path));
        }
        if let Ok(rel) = path.strip_prefix(&self.root) {
            return Some(normalize(rel));
        }
        // e.g. watcher reports /private/var/.. for a /var/.. root on macOS
        let canonical_root = self.root.canonicalize().ok()?;
        let canonical = path
            .canonicalize()
            .or_else(|_| {
                path.parent()
                    .and_then(|p| p.canonicalize().ok())
                    .zip(path.file_name())
                    .map(|(parent, name)| parent.join(name))
                    .ok_or(())
            })
            .ok()?;
        canonical
            .strip_prefix(&canonical_root)
            .ok()
            .map(normalize)
    }

    pub fn is_style(&self, relative: &Path) -> bool {
        self.styles.matched(relative, false).is_whitelist()
    }

    pub fn is_excluded(&self, relative: &Path, is_dir: bool) -> bool {
        is_hidden(relative)
            || self.ignored_files.iter().any(|f| f == relative)
            || self
                .excluded
                .matched_path_or_any_parents(relative, is_dir)
                .is_ignore()
    }

    /// Filter and classify one path of a watcher event
    pub fn classify(&self, path: &Path, kind: ChangeKind) -> Option<Change> {
        let relative = self.relative(path)?;
        if relative.as_os_str().is_empty() || self.is_excluded(&relative, kind.is_dir()) {
            return None;
        }
        let is_style = !kind.is_dir() && self.is_style(&relative);
        Some(Change {
            kind,
            path: relative,
            is_style,
        })
    }
}

/// Any component starting with `.` (the project root itself is not checked)
pub fn is_hidden(relative: &Path) -> bool {
    relative.components().any(|c| match c {
        Component::Normal(part) => part.to_string_lossy().starts_with('.'),
        _ => false,
    })
}

/// Map a watcher event kind onto a change kind, one per reported path.
///
/// `path_exists_as_dir` is consulted for platforms that report creation
/// without saying whether a file or a folder appeared.
pub fn change_kinds(
    kind: &EventKind,
    paths: &[PathBuf],
    path_exists_as_dir: impl Fn(&Path) -> bool,
) -> Vec<(PathBuf, ChangeKind)> {
    let created = |p: &PathBuf| {
        if path_exists_as_dir(p) {
            ChangeKind::AddDir
        } else {
            ChangeKind::Add
        }
    };

    match kind {
        EventKind::Create(CreateKind::Folder) => {
            paths.iter().map(|p| (p.clone(), ChangeKind::AddDir)).collect()
        }
        EventKind::Create(_) => paths.iter().map(|p| (p.clone(), created(p))).collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            paths.iter().map(|p| (p.clone(), ChangeKind::Unlink)).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            paths.iter().map(|p| (p.clone(), created(p))).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if paths.len() == 2 => vec![
            (paths[0].clone(), ChangeKind::Unlink),
            (paths[1].clone(), created(&paths[1])),
        ],
        EventKind::Modify(_) => paths
            .iter()
            .filter(|p| !path_exists_as_dir(p))
            .map(|p| (p.clone(), ChangeKind::Change))
            .collect(),
        EventKind::Remove(RemoveKind::Folder) => paths
            .iter()
            .map(|p| (p.clone(), ChangeKind::UnlinkDir))
            .collect(),
        EventKind::Remove(_) => paths.iter().map(|p| (p.clone(), ChangeKind::Unlink)).collect(),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => Vec::new(),
    }
}

fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}

fn invalid(pattern: &str, e: ignore::Error) -> StyleSyncError {
    StyleSyncError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    }
}
