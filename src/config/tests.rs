//! Tests for the config module

use super::loader::with_env_overrides_from;
use super::*;
use crate::error::StyleSyncError;
use std::collections::HashMap;
use std::fs;
use tempfile::tempdir;

fn load(path: &std::path::Path) -> crate::error::StyleSyncResult<RemoteConfig> {
    load_with_warnings(path).map(|(config, _)| config)
}

const FULL_CONFIG: &str = r#"{
    "transport": "ftp",
    "hostname": "ftp.example.com",
    "port": 2121,
    "username": "deploy",
    "password": "hunter2",
    "target": "/public_html/site",
    "ignore": ["node_modules/**", "*.map"],
    "uploadOnSave": true,
    "useAtomicWrites": false
}"#;

#[test]
fn test_config_parse_full() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, FULL_CONFIG).unwrap();

    let (config, warnings) = load_with_warnings(&path).unwrap();

    assert_eq!(config.hostname, "ftp.example.com");
    assert_eq!(config.port, 2121);
    assert_eq!(config.username, "deploy");
    assert_eq!(config.password, "hunter2");
    assert_eq!(config.target, "/public_html/site");
    assert_eq!(config.ignore.len(), 2);
    // plugin keys are accepted silently
    assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
}

#[test]
fn test_config_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, r#"{ "hostname": "localhost" }"#).unwrap();

    let config = load(&path).unwrap();

    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.username, "anonymous");
    assert_eq!(config.password, "anonymous@");
    assert_eq!(config.target, "/");
    assert!(config.transport.is_none());
    assert!(config.ignore.is_empty());
}

#[test]
fn test_config_port_as_string() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, r#"{ "hostname": "h", "port": "990" }"#).unwrap();

    assert_eq!(load(&path).unwrap().port, 990);
}

#[test]
fn test_config_port_not_numeric() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, r#"{ "hostname": "h", "port": "twenty-one" }"#).unwrap();

    let err = load(&path).unwrap_err();
    assert!(matches!(err, StyleSyncError::InvalidConfig { .. }));
}

#[test]
fn test_config_invalid_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "{ hostname: ").unwrap();

    let err = load(&path).unwrap_err();
    assert!(matches!(err, StyleSyncError::InvalidConfig { .. }));
    assert!(err.to_string().contains("not valid JSON"));
}

#[test]
fn test_config_json_null_is_invalid() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "null").unwrap();

    let err = load(&path).unwrap_err();
    assert!(matches!(err, StyleSyncError::InvalidConfig { .. }));
}

#[test]
fn test_config_trailing_garbage_is_invalid() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, r#"{ "hostname": "h" } extra"#).unwrap();

    let err = load(&path).unwrap_err();
    assert!(matches!(err, StyleSyncError::InvalidConfig { .. }));
}

#[test]
fn test_config_rejects_sftp_transport() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, r#"{ "hostname": "h", "transport": "scp" }"#).unwrap();

    let err = load(&path).unwrap_err();
    assert!(matches!(
        err,
        StyleSyncError::UnsupportedTransport { ref transport, .. } if transport == "scp"
    ));
}

#[test]
fn test_config_unknown_key_warning() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "{\n  \"hostname\": \"h\",\n  \"pasword\": \"x\"\n}").unwrap();

    let (config, warnings) = load_with_warnings(&path).unwrap();

    assert_eq!(config.password, "anonymous@");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].key, "pasword");
    assert_eq!(warnings[0].line, Some(3));
    assert_eq!(warnings[0].suggestion.as_deref(), Some("password"));
}

#[test]
fn test_discover_prefers_project_dir() {
    let dir = tempdir().unwrap();
    let project = dir.path().join("site");
    fs::create_dir_all(&project).unwrap();
    fs::write(dir.path().join(CONFIG_FILE_NAME), "{}").unwrap();
    fs::write(project.join(CONFIG_FILE_NAME), "{}").unwrap();

    let found = discover(&project).unwrap();
    assert_eq!(found, project.join(CONFIG_FILE_NAME));
}

#[test]
fn test_discover_falls_back_to_parent() {
    let dir = tempdir().unwrap();
    let project = dir.path().join("site");
    fs::create_dir_all(&project).unwrap();
    fs::write(dir.path().join(CONFIG_FILE_NAME), "{}").unwrap();

    let found = discover(&project).unwrap();
    assert_eq!(
        found.canonicalize().unwrap(),
        dir.path().join(CONFIG_FILE_NAME).canonicalize().unwrap()
    );
}

#[test]
fn test_discover_missing() {
    let dir = tempdir().unwrap();
    let project = dir.path().join("site");
    fs::create_dir_all(&project).unwrap();

    let err = discover(&project).unwrap_err();
    match err {
        StyleSyncError::ConfigNotFound { searched } => assert_eq!(searched.len(), 2),
        other => panic!("expected ConfigNotFound, got {other:?}"),
    }
}

#[test]
fn test_resolve_target_root_uses_project_name() {
    let dir = tempdir().unwrap();
    let project = dir.path().join("my-theme");
    fs::create_dir_all(&project).unwrap();

    assert_eq!(resolve_target("/", &project), "/my-theme");
}

#[test]
fn test_resolve_target_trims_trailing_slash() {
    let project = std::path::Path::new("unused");
    assert_eq!(resolve_target("/www/site/", project), "/www/site");
    assert_eq!(resolve_target("www", project), "www");
    assert_eq!(resolve_target("//", project), "/");
}

#[test]
fn test_env_overrides() {
    let env: HashMap<&str, &str> = [
        ("STYLESYNC_HOST", "staging.example.com"),
        ("STYLESYNC_PORT", "2222"),
        ("STYLESYNC_PASSWORD", "from-env"),
    ]
    .into_iter()
    .collect();

    let config = RemoteConfig {
        hostname: "prod.example.com".to_string(),
        username: "deploy".to_string(),
        password: "from-file".to_string(),
        port: 21,
        target: "/".to_string(),
        transport: None,
        ignore: vec![],
    };

    let config = with_env_overrides_from(config, |k| env.get(k).map(|v| v.to_string()));

    assert_eq!(config.hostname, "staging.example.com");
    assert_eq!(config.port, 2222);
    assert_eq!(config.username, "deploy");
    assert_eq!(config.password, "from-env");
}

#[test]
fn test_env_overrides_ignores_bad_port() {
    let config = RemoteConfig {
        hostname: "h".to_string(),
        username: "u".to_string(),
        password: "p".to_string(),
        port: 21,
        target: "/".to_string(),
        transport: None,
        ignore: vec![],
    };

    let config = with_env_overrides_from(config, |k| {
        (k == "STYLESYNC_PORT").then(|| "not-a-port".to_string())
    });
    assert_eq!(config.port, 21);
}
