//! Compile errors rendered as CSS

/// First line of the error banner; everything from here on is ours.
pub const OVERLAY_MARKER: &str = "/* !!! SASS ERROR !!! */";

/// CSS rule that pins the compile error to the top of the page.
pub fn error_overlay(message: &str) -> String {
    format!(
        "{OVERLAY_MARKER}\n\
         body:before {{\n    \
             content: \"SASS {}\";\n    \
             background: #FFF; color: #000; padding: 1em; font-size: 1.6em;\n    \
             position: fixed; top: 0; left: 0; right: 0; z-index: 9999;\n    \
             white-space: pre; font-family: monospace;\n\
         }}\n",
        escape_css_string(message)
    )
}

/// Previous stylesheet with the banner appended.
///
/// A banner left over from an earlier failure is dropped first so repeated
/// failures do not stack up.
pub fn with_error_overlay(previous: &str, message: &str) -> String {
    let base = match previous.find(OVERLAY_MARKER) {
        Some(idx) => &previous[..idx],
        None => previous,
    };

    let mut out = String::with_capacity(base.len() + message.len() + 256);
    out.push_str(base);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&error_overlay(message));
    out
}

fn escape_css_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\A"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}
