//! File watcher for continuous sync
//!
//! Implements the watch loop with:
//! - Debouncing (100ms), coalescing repeated events per path
//! - Dot-path, config-ignore and output-file filtering
//! - Graceful Ctrl+C shutdown
//! - NDJSON output for scripts

pub mod event;
mod filter;
mod sync;

pub use event::{Change, ChangeKind, SkipReason, WatchEvent, WatchOptions, DEFAULT_STYLE_GLOB};
pub use filter::{is_hidden, ChangeFilter};
pub use sync::watch;
