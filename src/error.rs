//! Error types for stylesync
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::transfer::TransferError;

/// Result type alias for stylesync operations
pub type StyleSyncResult<T> = Result<T, StyleSyncError>;

/// Main error type for stylesync operations
#[derive(Error, Debug)]
pub enum StyleSyncError {
    /// No `.remote-sync.json` in the project directory or its parent
    #[error("Please setup .remote-sync.json config file (searched: {})", display_paths(.searched))]
    ConfigNotFound { searched: Vec<PathBuf> },

    /// Config file exists but is not a JSON object we understand
    #[error("Remote-sync config file is not valid JSON: {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Config asks for a transport we do not speak
    #[error("unsupported transport '{transport}' in {file} - only 'ftp' is supported")]
    UnsupportedTransport { transport: String, file: PathBuf },

    /// FTP failure that ends the session
    #[error(transparent)]
    Transfer(#[from] TransferError),

    /// Style compilation failed (fatal only in `--once` mode)
    #[error("SASS {message}")]
    Compile { message: String },

    /// A glob from the command line or config did not parse
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// `--entry` or `--output` points outside the project directory
    #[error("{} is outside the project directory {}", .path.display(), .root.display())]
    OutsideProject { path: PathBuf, root: PathBuf },

    /// File watcher could not be set up
    #[error("file watcher error: {message}")]
    Watch { message: String },

    /// LiveReload server could not bind or accept
    #[error("livereload server error: {message}")]
    LiveReload { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<notify::Error> for StyleSyncError {
    fn from(e: notify::Error) -> Self {
        StyleSyncError::Watch {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config_not_found() {
        let err = StyleSyncError::ConfigNotFound {
            searched: vec![
                PathBuf::from("site/.remote-sync.json"),
                PathBuf::from(".remote-sync.json"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Please setup .remote-sync.json config file (searched: site/.remote-sync.json, .remote-sync.json)"
        );
    }

    #[test]
    fn test_error_display_invalid_config() {
        let err = StyleSyncError::InvalidConfig {
            file: PathBuf::from(".remote-sync.json"),
            message: "expected value at line 1 column 1".to_string(),
        };
        assert!(err
            .to_string()
            .starts_with("Remote-sync config file is not valid JSON"));
    }

    #[test]
    fn test_error_display_compile() {
        let err = StyleSyncError::Compile {
            message: "Error: expected \";\".".to_string(),
        };
        assert_eq!(err.to_string(), "SASS Error: expected \";\".");
    }
}
