//! Compile-and-upload session
//!
//! Owns the compiler, the transfer connection and the optional reload
//! notifier, and turns "something changed" into the right sequence of
//! compile / write / upload / reload steps. Status is reported through a
//! [`WatchEvent`] callback; only a lost connection is returned as an error.


use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::compile::{atomic_write, hash_content, with_error_overlay, StyleCompiler};
use crate::error::{StyleSyncError, StyleSyncResult};
use crate::reload::ReloadNotifier;
use crate::transfer::{remote_path, Transfer, TransferError, KEEPALIVE_INTERVAL};
use crate::watcher::event::slash_path;
use crate::watcher::{Change, SkipReason, WatchEvent};

/// Which parts of the pipeline are switched on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modes {
    /// Recompile and upload the stylesheet on style changes
    pub sass: bool,
    /// Upload every other changed file
    pub ftpall: bool,
    /// Tell browsers to reload
    pub livereload: bool,
}

impl Modes {
    /// FTP is needed for either upload mode
    pub fn needs_transfer(&self) -> bool {
        self.sass || self.ftpall
    }

    pub fn labels(&self) -> Vec<String> {
        let mut labels = Vec::new();
        if self.sass {
            labels.push("sass".to_string());
        }
        if self.ftpall {
            labels.push("ftpall".to_string());
        }
        if self.livereload {
            labels.push("livereload".to_string());
        }
        labels
    }
}

/// Session options
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Project root; `entry` and `output` are relative to it
    pub root: PathBuf,
    pub entry: PathBuf,
    pub output: PathBuf,
    /// Remote base directory, already resolved
    pub target: String,
    pub modes: Modes,
    /// Write compile errors into the output stylesheet
    pub error_overlay: bool,
    /// Idle time before a keepalive is sent
    pub keepalive: Duration,
}

impl SessionOptions {
    pub fn new(root: impl Into<PathBuf>, target: impl Into<String>, modes: Modes) -> Self {
        Self {
            root: root.into(),
            entry: PathBuf::from("css/site.scss"),
            output: PathBuf::from("css/site-sass-out.css.twig"),
            target: target.into(),
            modes,
            error_overlay: true,
            keepalive: KEEPALIVE_INTERVAL,
        }
    }

    /// Set the entry and output stylesheets. Absolute paths are accepted
    /// when they lie inside the root and are stored root-relative.
    pub fn with_paths(mut self, entry: &Path, output: &Path) -> StyleSyncResult<Self> {
        self.entry = project_relative(&self.root, entry)?;
        self.output = project_relative(&self.root, output)?;
        Ok(self)
    }
}

/// `path` relative to `root`; absolute paths outside `root` are an error.
pub fn project_relative(root: &Path, path: &Path) -> StyleSyncResult<PathBuf> {
    if path.is_relative() {
        return Ok(path.to_path_buf());
    }
    if let Ok(rel) = path.strip_prefix(root) {
        return Ok(rel.to_path_buf());
    }

    // the output may not exist yet, so fall back to its parent
    let canonical = path.canonicalize().ok().or_else(|| {
        let parent = path.parent()?.canonicalize().ok()?;
        Some(parent.join(path.file_name()?))
    });
    if let (Ok(root), Some(path)) = (root.canonicalize(), canonical) {
        if let Ok(rel) = path.strip_prefix(&root) {
            return Ok(rel.to_path_buf());
        }
    }

    Err(StyleSyncError::OutsideProject {
        path: path.to_path_buf(),
        root: root.to_path_buf(),
    })
}

/// What one rebuild ended with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildOutcome {
    /// Compiled and uploaded
    Uploaded,
    /// Compiled, but identical to what the remote already has
    Unchanged,
    /// Compile failed (the error overlay may still have been uploaded)
    CompileFailed,
    /// Output could not be written or uploaded
    Failed,
}

/// A compile-and-upload session over one transfer connection
pub struct Session<T: Transfer> {
    options: SessionOptions,
    compiler: StyleCompiler,
    transfer: Option<T>,
    notifier: Option<Box<dyn ReloadNotifier>>,
    connected: bool,
    last_uploaded: Option<String>,
    last_activity: Instant,
}

impl<T: Transfer> Session<T> {
    pub fn new(options: SessionOptions, compiler: StyleCompiler, transfer: Option<T>) -> Self {
        Self {
            options,
            compiler,
            transfer,
            notifier: None,
            connected: false,
            last_uploaded: None,
            last_activity: Instant::now(),
        }
    }

    pub fn with_notifier(mut self, notifier: Box<dyn ReloadNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn transfer(&self) -> Option<&T> {
        self.transfer.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Connect, then run the initial compile-and-upload in sass mode.
    pub fn start(&mut self, emit: &impl Fn(WatchEvent)) -> StyleSyncResult<Option<RebuildOutcome>> {
        self.connect(emit)?;
        if self.options.modes.sass {
            return self.rebuild(emit).map(Some);
        }
        Ok(None)
    }

    /// Open the transfer connection (a no-op in reload-only mode)
    pub fn connect(&mut self, emit: &impl Fn(WatchEvent)) -> StyleSyncResult<()> {
        let Some(transfer) = self.transfer.as_mut() else {
            self.connected = true;
            return Ok(());
        };

        emit(WatchEvent::Connecting {
            address: transfer.address(),
        });
        let welcome = transfer.connect()?;
        self.connected = true;
        self.last_activity = Instant::now();
        emit(WatchEvent::Connected {
            address: transfer.address(),
            welcome,
        });
        Ok(())
    }

    /// Compile the entry, write the output, upload it.
    pub fn rebuild(&mut self, emit: &impl Fn(WatchEvent)) -> StyleSyncResult<RebuildOutcome> {
        let entry = slash_path(&self.options.entry);
        emit(WatchEvent::CompileStarted {
            entry: entry.clone(),
        });

        let output_path = self.options.root.join(&self.options.output);
        let (content, compiled) = match self.compiler.compile() {
            Ok(css) => (css, true),
            Err(e) => {
                emit(WatchEvent::CompileFailed {
                    entry,
                    message: e.message.clone(),
                });
                if !self.options.error_overlay {
                    return Ok(RebuildOutcome::CompileFailed);
                }
                match std::fs::read_to_string(&output_path) {
                    Ok(previous) => (with_error_overlay(&previous, &e.message), false),
                    Err(read_err) => {
                        tracing::debug!(error = %read_err, "cannot read previous output");
                        emit(WatchEvent::error(
                            "Error appending sass error text to css file",
                        ));
                        return Ok(RebuildOutcome::CompileFailed);
                    }
                }
            }
        };

        if let Err(e) = atomic_write(&output_path, content.as_bytes()) {
            emit(WatchEvent::error(format!("File Saving Error: {}", e)));
            return Ok(if compiled {
                RebuildOutcome::Failed
            } else {
                RebuildOutcome::CompileFailed
            });
        }
        emit(WatchEvent::OutputWritten {
            path: slash_path(&self.options.output),
            bytes: content.len(),
        });

        let hash = hash_content(content.as_bytes());
        let outcome = if self.last_uploaded.as_deref() == Some(hash.as_str()) {
            emit(WatchEvent::UploadSkipped {
                path: slash_path(&self.options.output),
                reason: SkipReason::Unchanged,
            });
            RebuildOutcome::Unchanged
        } else {
            let output = self.options.output.clone();
            if self.upload_file(&output, emit)? {
                self.last_uploaded = Some(hash);
                RebuildOutcome::Uploaded
            } else {
                RebuildOutcome::Failed
            }
        };

        Ok(if compiled {
            outcome
        } else {
            RebuildOutcome::CompileFailed
        })
    }

    /// Upload one project-relative file; returns whether it went through.
    ///
    /// Upload failures are reported and swallowed; a lost connection is not.
    pub fn upload_file(
        &mut self,
        relative: &Path,
        emit: &impl Fn(WatchEvent),
    ) -> StyleSyncResult<bool> {
        let Some(transfer) = self.transfer.as_mut() else {
            return Ok(false);
        };

        let relative = relative.strip_prefix(&self.options.root).unwrap_or(relative);
        let remote = remote_path(&self.options.target, relative);
        let local = self.options.root.join(relative);
        let display = slash_path(relative);

        let result = transfer.upload(&local, &remote);
        self.last_activity = Instant::now();

        match result {
            Ok(bytes) => {
                emit(WatchEvent::Uploaded {
                    local: display.clone(),
                    remote,
                    bytes,
                });
                if self.options.modes.livereload {
                    self.notify(&display, emit);
                }
                Ok(true)
            }
            Err(TransferError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                emit(WatchEvent::UploadSkipped {
                    path: display,
                    reason: SkipReason::Removed,
                });
                Ok(false)
            }
            Err(e) if e.is_fatal() => {
                self.connected = false;
                Err(StyleSyncError::Transfer(e))
            }
            Err(e) => {
                emit(WatchEvent::error(format!("FTP Error: {}", e)));
                Ok(false)
            }
        }
    }

    /// Tell browsers to reload `path`
    pub fn notify(&self, path: &str, emit: &impl Fn(WatchEvent)) {
        if let Some(notifier) = &self.notifier {
            let clients = notifier.reload(path);
            emit(WatchEvent::ReloadSent {
                path: path.to_string(),
                clients,
            });
        }
    }

    /// React to one debounced batch of changes.
    ///
    /// Style changes collapse into a single rebuild; other files are uploaded
    /// in `ftpall` mode, or just trigger a reload otherwise.
    pub fn handle_changes(
        &mut self,
        changes: &[Change],
        emit: &impl Fn(WatchEvent),
    ) -> StyleSyncResult<()> {
        if !self.connected {
            tracing::debug!(count = changes.len(), "not connected yet, dropping changes");
            return Ok(());
        }

        let modes = self.options.modes;
        let mut rebuild = false;
        let mut reload_path: Option<String> = None;

        for change in changes {
            let path = change.display_path();
            emit(WatchEvent::FileChanged {
                kind: change.kind,
                path: path.clone(),
            });

            if modes.sass && change.is_style {
                rebuild = true;
            } else if modes.ftpall {
                if change.kind.is_dir() {
                    emit(WatchEvent::UploadSkipped {
                        path,
                        reason: SkipReason::Directory,
                    });
                } else if change.kind.is_removal() {
                    emit(WatchEvent::UploadSkipped {
                        path,
                        reason: SkipReason::Removed,
                    });
                } else {
                    self.upload_file(&change.path, emit)?;
                }
            } else if modes.livereload {
                reload_path = Some(path);
            }
        }

        if rebuild {
            self.rebuild(emit)?;
        }
        if let Some(path) = reload_path {
            self.notify(&path, emit);
        }
        Ok(())
    }

    /// Send a keepalive if the connection has been idle long enough
    pub fn keepalive_if_idle(&mut self) -> StyleSyncResult<()> {
        if !self.connected || self.last_activity.elapsed() < self.options.keepalive {
            return Ok(());
        }
        if let Some(transfer) = self.transfer.as_mut() {
            tracing::trace!("sending keepalive");
            if let Err(e) = transfer.keepalive() {
                self.connected = false;
                return Err(e.into());
            }
        }
        self.last_activity = Instant::now();
        Ok(())
    }

    /// Close the connection cleanly
    pub fn close(&mut self, emit: &impl Fn(WatchEvent)) {
        if !self.connected {
            return;
        }
        self.connected = false;
        if let Some(transfer) = self.transfer.as_mut() {
            if let Err(e) = transfer.close() {
                tracing::debug!(error = %e, "error while closing connection");
            }
            emit(WatchEvent::ConnectionClosed);
        }
    }
}
