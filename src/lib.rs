//! stylesync - compile SCSS, upload over FTP, reload the browser
//!
//! Watches a project directory, recompiles the entry stylesheet when a
//! `.scss` file changes, uploads the result (and optionally every other
//! changed file) to the host named in `.remote-sync.json`, and tells
//! LiveReload-connected browsers to refresh.

pub mod compile;
pub mod config;
pub mod error;
pub mod reload;
pub mod session;
pub mod transfer;
pub mod watcher;

// Re-exports for convenience
pub use compile::{OutputStyle, StyleCompiler};
pub use config::RemoteConfig;
pub use error::{StyleSyncError, StyleSyncResult};
pub use reload::{LiveReloadServer, ReloadNotifier};
pub use session::{Modes, RebuildOutcome, Session, SessionOptions};
pub use transfer::{remote_path, FtpSettings, FtpTransfer, Transfer, TransferError};
pub use watcher::{watch, ChangeKind, WatchEvent, WatchOptions};
