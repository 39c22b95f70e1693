//! Configuration discovery and loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{StyleSyncError, StyleSyncResult};

use super::types::{RemoteConfig, PLUGIN_KEYS};

/// Name of the config file shared with the remote-sync editor plugin
pub const CONFIG_FILE_NAME: &str = ".remote-sync.json";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Find the config file: first in `root`, then in its parent directory.
pub fn discover(root: &Path) -> StyleSyncResult<PathBuf> {
    let searched = vec![
        root.join(CONFIG_FILE_NAME),
        root.join("..").join(CONFIG_FILE_NAME),
    ];

    match searched.iter().find(|p| p.is_file()) {
        Some(found) => Ok(found.clone()),
        None => Err(StyleSyncError::ConfigNotFound { searched }),
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> StyleSyncResult<(RemoteConfig, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let invalid = |message: String| StyleSyncError::InvalidConfig {
        file: path.to_path_buf(),
        message,
    };

    let mut unknown_paths: Vec<String> = Vec::new();
    let mut deserializer = serde_json::Deserializer::from_str(&content);

    let config: RemoteConfig = serde_ignored::deserialize(&mut deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| invalid(e.to_string()))?;
    deserializer.end().map_err(|e| invalid(e.to_string()))?;

    if let Some(transport) = &config.transport {
        if !transport.eq_ignore_ascii_case("ftp") {
            return Err(StyleSyncError::UnsupportedTransport {
                transport: transport.clone(),
                file: path.to_path_buf(),
            });
        }
    }

    let warnings = unknown_paths
        .into_iter()
        .filter_map(|path_str| {
            let key = path_str
                .split('.')
                .next()
                .unwrap_or(path_str.as_str())
                .to_string();
            if PLUGIN_KEYS.contains(&key.as_str()) {
                return None;
            }
            Some(ConfigWarning {
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
                key,
                file: path.to_path_buf(),
            })
        })
        .collect();

    Ok((config, warnings))
}

/// Apply environment variable overrides (STYLESYNC_* prefix)
pub fn with_env_overrides(config: RemoteConfig) -> RemoteConfig {
    with_env_overrides_from(config, |key| std::env::var(key).ok())
}

pub(crate) fn with_env_overrides_from(
    mut config: RemoteConfig,
    get_env: impl Fn(&str) -> Option<String>,
) -> RemoteConfig {
    if let Some(host) = get_env("STYLESYNC_HOST").filter(|h| !h.is_empty()) {
        config.hostname = host;
    }

    if let Some(port) = get_env("STYLESYNC_PORT").and_then(|p| p.trim().parse().ok()) {
        config.port = port;
    }

    if let Some(user) = get_env("STYLESYNC_USER") {
        config.username = user;
    }

    if let Some(password) = get_env("STYLESYNC_PASSWORD") {
        config.password = password;
    }

    config
}

/// Resolve the remote base directory.
///
/// A target of exactly `/` means the project folder's own name under the FTP
/// root, so syncing never writes straight into the server root.
pub fn resolve_target(target: &str, project_root: &Path) -> String {
    if target == "/" {
        let name = project_root
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .or_else(|| {
                project_root
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            })
            .unwrap_or_default();
        return format!("/{}", name);
    }

    let trimmed = target.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    let quoted = format!("\"{}\"", needle);
    content
        .lines()
        .position(|line| line.contains(&quoted))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "hostname",
        "username",
        "password",
        "port",
        "target",
        "transport",
        "ignore",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(&unknown.to_lowercase(), candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
