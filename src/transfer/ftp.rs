//! FTP Transfer
//!
//! One persistent control connection per session, in binary mode, passive
//! data connections (suppaftp's default).

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

use suppaftp::types::FileType;
use suppaftp::{FtpError, FtpStream, Status};

use super::path::parent_dirs;
use super::{Transfer, TransferError};
use crate::config::RemoteConfig;

/// Idle time after which a NOOP is sent on the control connection
pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(10);

/// Connection parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub timeout: Duration,
}

impl FtpSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl From<&RemoteConfig> for FtpSettings {
    fn from(config: &RemoteConfig) -> Self {
        Self {
            host: config.hostname.clone(),
            port: config.port,
            user: config.username.clone(),
            password: config.password.clone(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Transfer over a persistent FTP connection
pub struct FtpTransfer {
    settings: FtpSettings,
    stream: Option<FtpStream>,
    /// Remote directories known to exist (created or already present)
    known_dirs: HashSet<String>,
}

impl FtpTransfer {
    pub fn new(settings: FtpSettings) -> Self {
        Self {
            settings,
            stream: None,
            known_dirs: HashSet::new(),
        }
    }

    pub fn settings(&self) -> &FtpSettings {
        &self.settings
    }

    fn resolve(&self) -> Result<Vec<SocketAddr>, TransferError> {
        (self.settings.host.as_str(), self.settings.port)
            .to_socket_addrs()
            .map(|addrs| addrs.collect())
            .map_err(|e| TransferError::Connect {
                address: self.settings.address(),
                message: e.to_string(),
            })
    }

    fn open(&self) -> Result<FtpStream, TransferError> {
        let mut last_error = String::from("host did not resolve to any address");
        for addr in self.resolve()? {
            tracing::debug!(%addr, "opening FTP control connection");
            match FtpStream::connect_timeout(addr, self.settings.timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_error = e.to_string(),
            }
        }
        Err(TransferError::Connect {
            address: self.settings.address(),
            message: last_error,
        })
    }

    fn stream(&mut self) -> Result<&mut FtpStream, TransferError> {
        self.stream.as_mut().ok_or(TransferError::NotConnected)
    }

    /// Create missing remote parent directories of `remote`.
    ///
    /// MKD failures are ignored: the usual cause is "already exists", and a
    /// directory that really is missing makes the STOR fail with a clearer
    /// message anyway.
    fn ensure_parent_dirs(&mut self, remote: &str) -> Result<(), TransferError> {
        let missing: Vec<String> = parent_dirs(remote)
            .into_iter()
            .filter(|d| !self.known_dirs.contains(d))
            .collect();

        for dir in missing {
            match self.stream()?.mkdir(&dir) {
                Ok(()) => tracing::debug!(dir = %dir, "created remote directory"),
                Err(e) if is_connection_error(&e) => {
                    return Err(self.lost(e));
                }
                Err(e) => tracing::trace!(dir = %dir, error = %e, "MKD refused"),
            }
            self.known_dirs.insert(dir);
        }
        Ok(())
    }

    /// Drop the stream and turn `e` into a fatal error
    fn lost(&mut self, e: FtpError) -> TransferError {
        self.stream = None;
        TransferError::ConnectionLost(e.to_string())
    }
}

impl Transfer for FtpTransfer {
    fn name(&self) -> &'static str {
        "ftp"
    }

    fn address(&self) -> String {
        self.settings.address()
    }

    fn connect(&mut self) -> Result<Option<String>, TransferError> {
        let mut stream = self.open()?;

        stream
            .get_ref()
            .set_read_timeout(Some(self.settings.timeout * 3))
            .map_err(|e| TransferError::Connect {
                address: self.settings.address(),
                message: e.to_string(),
            })?;

        let welcome = stream.get_welcome_msg().map(|m| m.trim().to_string());

        stream
            .login(self.settings.user.as_str(), self.settings.password.as_str())
            .map_err(|e| TransferError::Login {
                user: self.settings.user.clone(),
                message: e.to_string(),
            })?;

        stream
            .transfer_type(FileType::Binary)
            .map_err(|e| TransferError::Connect {
                address: self.settings.address(),
                message: e.to_string(),
            })?;

        tracing::info!(address = %self.settings.address(), "FTP session ready");
        self.known_dirs.clear();
        self.stream = Some(stream);
        Ok(welcome)
    }

    fn upload(&mut self, local: &Path, remote: &str) -> Result<u64, TransferError> {
        // Fail before touching the connection if the local file is gone
        let file = File::open(local)?;
        let mut reader = BufReader::new(file);

        self.ensure_parent_dirs(remote)?;

        match self.stream()?.put_file(remote, &mut reader) {
            Ok(bytes) => {
                tracing::debug!(remote, bytes, "stored file");
                Ok(bytes)
            }
            Err(e) if is_connection_error(&e) => Err(self.lost(e)),
            Err(e) => Err(TransferError::Upload {
                remote: remote.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn keepalive(&mut self) -> Result<(), TransferError> {
        match self.stream()?.noop() {
            Ok(()) => Ok(()),
            Err(e) => Err(self.lost(e)),
        }
    }

    fn close(&mut self) -> Result<(), TransferError> {
        let Some(mut stream) = self.stream.take() else {
            return Ok(());
        };
        stream
            .quit()
            .map_err(|e| TransferError::ConnectionLost(e.to_string()))
    }
}

/// The control connection is gone: socket errors, EOF instead of a reply
/// (`BadResponse`), or the server announcing it is closing (421).
fn is_connection_error(e: &FtpError) -> bool {
    match e {
        FtpError::ConnectionError(_) | FtpError::BadResponse => true,
        FtpError::UnexpectedResponse(response) => {
            matches!(response.status, Status::NotAvailable)
        }
        _ => false,
    }
}
