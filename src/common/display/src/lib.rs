//! Display utilities for Strata.
//!
//! Provides text outlines for hierarchical containers.

mod tree;

pub use tree::{DisplayTree, TreeNode};

/// Shorten a string to at most `max_chars` characters, ending in `...` when cut.
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
