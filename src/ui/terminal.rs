use is_terminal::IsTerminal;

/// What stdout can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalCapabilities {
    /// Interactive, not dumb, no `NO_COLOR`, not a CI log
    pub color: bool,
    pub unicode: bool,
}

pub fn detect_capabilities() -> TerminalCapabilities {
    detect_with(|key| std::env::var(key).ok(), std::io::stdout().is_terminal())
}

const CI_KEYS: &[&str] = &["CI", "GITHUB_ACTIONS", "JENKINS_HOME", "BUILDKITE", "TRAVIS"];

fn detect_with(get_env: impl Fn(&str) -> Option<String>, is_tty: bool) -> TerminalCapabilities {
    let dumb = get_env("TERM").is_some_and(|t| t.eq_ignore_ascii_case("dumb"));
    let no_color = get_env("NO_COLOR").is_some();
    let ci = CI_KEYS.iter().any(|k| get_env(k).is_some());

    TerminalCapabilities {
        color: is_tty && !dumb && !no_color && !ci,
        unicode: !dumb && utf8_locale(&get_env),
    }
}

/// First locale variable that is set decides; unset means UTF-8.
fn utf8_locale(get_env: &impl Fn(&str) -> Option<String>) -> bool {
    ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .find_map(|k| get_env(k).filter(|v| !v.is_empty()))
        .map(|v| !matches!(v.to_lowercase().as_str(), "c" | "posix"))
        .unwrap_or(true)
}
