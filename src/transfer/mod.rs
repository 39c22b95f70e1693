//! Remote transfer
//!
//! The session talks to the remote host through the [`Transfer`] trait so the
//! pipeline can be exercised without a server. [`FtpTransfer`] is the only
//! real implementation.

mod ftp;
mod path;

pub use ftp::{FtpSettings, FtpTransfer, KEEPALIVE_INTERVAL};
pub use path::{parent_dirs, remote_path};

use std::path::Path;

use thiserror::Error;

/// Error during transfer operations
#[derive(Error, Debug)]
pub enum TransferError {
    /// Could not reach the host
    #[error("could not connect to {address}: {message}")]
    Connect { address: String, message: String },

    /// Server rejected the credentials
    #[error("login failed for '{user}': {message}")]
    Login { user: String, message: String },

    /// A single upload failed; the connection is still usable
    #[error("upload of {remote} failed: {message}")]
    Upload { remote: String, message: String },

    /// Control connection is gone
    #[error("FTP connection ended: {0}")]
    ConnectionLost(String),

    /// Operation attempted before `connect`
    #[error("not connected")]
    NotConnected,

    /// Local file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransferError {
    /// True when the session cannot continue
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TransferError::Connect { .. }
                | TransferError::Login { .. }
                | TransferError::ConnectionLost(_)
                | TransferError::NotConnected
        )
    }
}

/// Persistent connection that uploads local files to remote paths
pub trait Transfer {
    /// Name of this transfer method (for logging)
    fn name(&self) -> &'static str;

    /// Where this transfer connects to (for display)
    fn address(&self) -> String;

    /// Open the connection; returns the server greeting if there was one
    fn connect(&mut self) -> Result<Option<String>, TransferError>;

    /// Upload `local` to the absolute remote path `remote`; returns bytes sent
    fn upload(&mut self, local: &Path, remote: &str) -> Result<u64, TransferError>;

    /// Keep an idle control connection from timing out
    fn keepalive(&mut self) -> Result<(), TransferError>;

    /// Close the connection cleanly
    fn close(&mut self) -> Result<(), TransferError>;
}
