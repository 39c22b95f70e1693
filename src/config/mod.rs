//! Configuration module for stylesync
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (STYLESYNC_*)
//! 3. `.remote-sync.json` in the project directory, or its parent

mod loader;
#[cfg(test)]
mod tests;
mod types;

pub use loader::{
    discover, load_with_warnings, resolve_target, with_env_overrides, ConfigWarning,
    CONFIG_FILE_NAME,
};
pub use types::{RemoteConfig, DEFAULT_PORT, PLUGIN_KEYS};
