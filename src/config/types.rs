//! Configuration type definitions

use serde::{Deserialize, Serialize};

/// Default FTP control port
pub const DEFAULT_PORT: u16 = 21;

/// Remote host settings read from `.remote-sync.json`.
///
/// The file format is shared with the remote-sync editor plugin, so keys the
/// plugin writes but we do not use are tolerated (see [`PLUGIN_KEYS`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub hostname: String,

    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_password")]
    pub password: String,

    #[serde(default = "default_port", deserialize_with = "deserialize_port")]
    pub port: u16,

    /// Remote base directory; `/` means "a folder named after the project"
    #[serde(default = "default_target")]
    pub target: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,

    /// Globs (relative to the project root) never watched or uploaded
    #[serde(default)]
    pub ignore: Vec<String>,
}

/// Keys the remote-sync plugin writes that carry no meaning here.
pub const PLUGIN_KEYS: &[&str] = &[
    "uploadOnSave",
    "useAtomicWrites",
    "deleteLocal",
    "watch",
    "keepalive",
    "readyTimeout",
    "secure",
    "hostkey",
    "keyfile",
    "passphrase",
    "agent",
    "uploadMirrors",
    "saveOnUpload",
    "connTimeout",
    "pasvTimeout",
];

fn default_username() -> String {
    "anonymous".to_string()
}

fn default_password() -> String {
    "anonymous@".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_target() -> String {
    "/".to_string()
}

/// The plugin stores the port either as a number or as a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PortDe {
    Number(u16),
    Text(String),
}

fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match PortDe::deserialize(deserializer)? {
        PortDe::Number(port) => Ok(port),
        PortDe::Text(text) if text.trim().is_empty() => Ok(DEFAULT_PORT),
        PortDe::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid port '{}'", text))),
    }
}
