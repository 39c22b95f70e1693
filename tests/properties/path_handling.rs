//! Property tests for remote path construction.

use std::path::Path;

use proptest::prelude::*;

use stylesync::transfer::{parent_dirs, remote_path};

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_-][A-Za-z0-9._-]{0,15}").unwrap()
}

fn relative_path() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(segment(), 1..=5)
}

fn target() -> impl Strategy<Value = String> {
    proptest::collection::vec(segment(), 0..=3).prop_map(|s| format!("/{}", s.join("/")))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Remote path construction never panics on arbitrary input.
    #[test]
    fn property_remote_path_never_panics(
        target in "(?s).{0,64}",
        relative in "(?s).{0,128}",
    ) {
        let remote = remote_path(&target, Path::new(&relative));
        let _ = parent_dirs(&remote);
    }

    /// PROPERTY: The remote path is the target plus the relative segments.
    #[test]
    fn property_remote_path_is_target_slash_relative(
        target in target(),
        segments in relative_path(),
    ) {
        prop_assume!(segments.iter().all(|s| s != "." && s != ".."));
        let relative = segments.join("/");
        let remote = remote_path(&target, Path::new(&relative));

        let base = target.trim_end_matches('/');
        prop_assert_eq!(remote, format!("{}/{}", base, relative));
    }

    /// PROPERTY: `..` in a local path never climbs above the target.
    #[test]
    fn property_remote_path_stays_under_target(
        target in target(),
        segments in proptest::collection::vec(
            prop_oneof![segment(), Just("..".to_string()), Just(".".to_string())],
            1..=6,
        ),
    ) {
        let remote = remote_path(&target, Path::new(&segments.join("/")));
        prop_assert!(remote.starts_with(target.trim_end_matches('/')));
        prop_assert!(!remote.split('/').any(|p| p == ".."));
    }

    /// PROPERTY: Parent dirs are strictly nested prefixes of the file path.
    #[test]
    fn property_parent_dirs_are_nested_prefixes(
        target in target(),
        segments in relative_path(),
    ) {
        prop_assume!(segments.iter().all(|s| s != "." && s != ".."));
        let remote = remote_path(&target, Path::new(&segments.join("/")));
        let dirs = parent_dirs(&remote);

        prop_assert_eq!(dirs.len(), remote.matches('/').count() - 1);
        for pair in dirs.windows(2) {
            let parent = format!("{}/", pair[0]);
            prop_assert!(pair[1].starts_with(&parent), "{:?} not under {:?}", pair[1], parent);
        }
        if let Some(deepest) = dirs.last() {
            let parent = format!("{}/", deepest);
            prop_assert!(remote.starts_with(&parent), "{:?} not under {:?}", remote, parent);
        }
    }
}
