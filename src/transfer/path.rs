//! Remote path construction

use std::path::{Component, Path};

/// Join the remote base directory and a project-relative path with `/`.
///
/// Local separators are normalised and `.`/empty components dropped; `..`
/// components are dropped too so an upload never escapes `target`.
pub fn remote_path(target: &str, relative: &Path) -> String {
    let mut out = target.trim_end_matches('/').to_string();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            let part = part.to_string_lossy();
            for piece in part.split('\\').filter(|p| !p.is_empty() && *p != "." && *p != "..") {
                out.push('/');
                out.push_str(piece);
            }
        }
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Every ancestor directory of a remote file path, shallowest first.
///
/// `"/site/css/a.css"` gives `["/site", "/site/css"]`.
pub fn parent_dirs(remote: &str) -> Vec<String> {
    let parent = match remote.rfind('/') {
        Some(idx) => &remote[..idx],
        None => return Vec::new(),
    };

    let absolute = parent.starts_with('/');
    let mut dirs = Vec::new();
    let mut current = String::new();
    for piece in parent.split('/').filter(|p| !p.is_empty()) {
        if absolute || !current.is_empty() {
            current.push('/');
        }
        current.push_str(piece);
        dirs.push(current.clone());
    }
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn remote_path_joins_with_slash() {
        assert_eq!(
            remote_path("/public_html", Path::new("css/site-sass-out.css.twig")),
            "/public_html/css/site-sass-out.css.twig"
        );
    }

    #[test]
    fn remote_path_trims_trailing_slash_on_target() {
        assert_eq!(remote_path("/www/", Path::new("a.css")), "/www/a.css");
        assert_eq!(remote_path("/", Path::new("a.css")), "/a.css");
    }

    #[test]
    fn remote_path_drops_dot_and_parent_components() {
        assert_eq!(
            remote_path("/www", Path::new("./css/../css/a.css")),
            "/www/css/css/a.css"
        );
    }

    #[test]
    fn remote_path_normalises_backslashes() {
        let rel = PathBuf::from("css\\partials\\_nav.scss");
        assert_eq!(remote_path("/www", &rel), "/www/css/partials/_nav.scss");
    }

    #[test]
    fn remote_path_relative_target() {
        assert_eq!(remote_path("site", Path::new("a/b.css")), "site/a/b.css");
    }

    #[test]
    fn parent_dirs_absolute() {
        assert_eq!(
            parent_dirs("/site/css/a.css"),
            vec!["/site".to_string(), "/site/css".to_string()]
        );
    }

    #[test]
    fn parent_dirs_relative() {
        assert_eq!(parent_dirs("site/a.css"), vec!["site".to_string()]);
    }

    #[test]
    fn parent_dirs_root_file() {
        assert!(parent_dirs("/a.css").is_empty());
        assert!(parent_dirs("a.css").is_empty());
    }
}
