//! Property tests for stylesync.
//!
//! Properties use randomized input generation to explore edge cases and
//! protect invariants like "never panics" and "never escapes the target".
//!
//! Run with: `cargo test --test properties`

#[path = "properties/path_handling.rs"]
mod path_handling;

#[path = "properties/overlay.rs"]
mod overlay;
