//! Watch loop

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::{StyleSyncError, StyleSyncResult};
use crate::session::{RebuildOutcome, Session};
use crate::transfer::{Transfer, TransferError};

use super::event::{slash_path, WatchEvent, WatchOptions, WatcherState};
use super::filter::{change_kinds, ChangeFilter};

/// Events arriving this soon after the watcher is registered are dropped
const STARTUP_COOLDOWN: Duration = Duration::from_millis(500);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Start watching for file changes.
///
/// Connects, runs the initial build, then feeds debounced change batches to
/// the session until `running` goes false. Returns the outcome of the initial
/// build. Errors have already been reported through `event_callback` when
/// this returns `Err`.
pub fn watch<T: Transfer>(
    options: WatchOptions,
    session: &mut Session<T>,
    running: Arc<AtomicBool>,
    event_callback: impl Fn(WatchEvent),
) -> StyleSyncResult<Option<RebuildOutcome>> {
    event_callback(WatchEvent::WatchStarted {
        root: options.root.display().to_string(),
        modes: session.options().modes.labels(),
    });

    let result = run(&options, session, &running, &event_callback);
    if let Err(e) = &result {
        report(e, &event_callback);
    }

    session.close(&event_callback);
    event_callback(WatchEvent::Shutdown);
    result
}

fn run<T: Transfer>(
    options: &WatchOptions,
    session: &mut Session<T>,
    running: &AtomicBool,
    event_callback: &impl Fn(WatchEvent),
) -> StyleSyncResult<Option<RebuildOutcome>> {
    let mut filter = ChangeFilter::new(&options.root, &options.style_globs, &options.ignore)?;
    // our own writes would otherwise trigger another build
    filter.ignore_file(session.options().output.clone());

    let initial = session.start(event_callback)?;

    if options.once {
        if initial == Some(RebuildOutcome::CompileFailed) {
            return Err(StyleSyncError::Compile {
                message: format!("{} did not compile", slash_path(&session.options().entry)),
            });
        }
        return Ok(initial);
    }

    // Set up file watcher
    let (tx, rx) = channel();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            let _ = tx.send(res);
        },
        Config::default(),
    )?;
    watcher.watch(&options.root, RecursiveMode::Recursive)?;
    tracing::debug!(root = %options.root.display(), "file watcher registered");

    // notify sometimes reports existing files right after registration
    let cooldown_end = Instant::now() + STARTUP_COOLDOWN;
    while Instant::now() < cooldown_end {
        let _ = rx.recv_timeout(POLL_INTERVAL);
    }

    let mut state = WatcherState::new();

    while running.load(Ordering::SeqCst) {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(Ok(event)) => {
                for (path, kind) in change_kinds(&event.kind, &event.paths, |p| p.is_dir()) {
                    if let Some(change) = filter.classify(&path, kind) {
                        tracing::trace!(path = %change.path.display(), %kind, "queued change");
                        state.add_change(change);
                    }
                }
            }
            Ok(Err(e)) => tracing::warn!(error = %e, "file watcher error"),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                return Err(StyleSyncError::Watch {
                    message: "file watcher stopped unexpectedly".to_string(),
                });
            }
        }

        if state.should_sync() {
            let changes = state.take_changes();
            session.handle_changes(&changes, event_callback)?;
        }

        session.keepalive_if_idle()?;
    }

    Ok(initial)
}

fn report(e: &StyleSyncError, event_callback: &impl Fn(WatchEvent)) {
    match e {
        // already reported as compile_failed
        StyleSyncError::Compile { .. } => {}
        StyleSyncError::Transfer(TransferError::ConnectionLost(message)) => {
            event_callback(WatchEvent::ConnectionEnded {
                message: message.clone(),
            })
        }
        other => event_callback(WatchEvent::error(other.to_string())),
    }
}
