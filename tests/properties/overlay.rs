//! Property tests for the compile error overlay.

use proptest::prelude::*;

use stylesync::compile::{with_error_overlay, OVERLAY_MARKER};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Repeated failures leave exactly one banner behind.
    #[test]
    fn property_overlay_never_stacks(
        css in "[a-z{}:; \n]{0,80}",
        messages in proptest::collection::vec("(?s).{0,60}", 1..=4),
    ) {
        let mut out = css.clone();
        for message in &messages {
            out = with_error_overlay(&out, message);
        }
        prop_assert_eq!(out.matches(OVERLAY_MARKER).count(), 1);
        prop_assert!(out.starts_with(&css));
    }

    /// PROPERTY: The banner's CSS string never contains a raw newline or an
    /// unescaped quote.
    #[test]
    fn property_overlay_content_is_one_css_string(message in "(?s).{0,120}") {
        let banner = with_error_overlay("", &message);
        let content = banner
            .lines()
            .find(|l| l.trim_start().starts_with("content:"))
            .expect("content line");
        let inner = content
            .trim()
            .strip_prefix("content: \"")
            .and_then(|s| s.strip_suffix("\";"))
            .expect("quoted content");

        let mut escaped = false;
        for c in inner.chars() {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else {
                prop_assert_ne!(c, '"');
            }
        }
        prop_assert!(!escaped);
    }
}
