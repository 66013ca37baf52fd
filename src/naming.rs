//! Chapter filename parsing for the NNN-name convention.
//!
//! Chapter files follow a numeric-prefix pattern: `NNN-name.txt`, where the
//! prefix gives the explicit reading order and the name becomes the chapter
//! title. This module provides the single parsing function that extracts both
//! parts consistently.
//!
//! ## Display Titles
//!
//! Dashes in the name portion are converted to spaces for display:
//! - `020-The-First-Rite.txt` → "The First Rite"
//! - `010-Introdução.txt` → "Introdução"
//!
//! Files without a numeric prefix are treated as drafts and excluded from
//! the grimoire (see [`crate::scan`]).

/// Result of parsing a chapter file stem like `020-The-First-Rite`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Number prefix if present (e.g., `20` from `020-The-First-Rite`)
    pub number: Option<u32>,
    /// Raw name part after `NNN-`, dashes preserved. Empty if number-only.
    /// For unnumbered entries, this is the full input.
    pub name: String,
    /// Display title: name with dashes converted to spaces.
    pub display_title: String,
}

/// Parse a file stem following the `NNN-name` convention.
///
/// Handles these patterns:
/// - `"020-The-First-Rite"` → number=Some(20), display_title="The First Rite"
/// - `"010-Introdução"` → number=Some(10), display_title="Introdução"
/// - `"001"` → number=Some(1), name="", display_title=""
/// - `"001-"` → number=Some(1), name="", display_title=""
/// - `"notes"` → number=None, display_title="notes"
/// - `"wip-drafts"` → number=None, display_title="wip drafts"
pub fn parse_entry_name(name: &str) -> ParsedName {
    // Try splitting on first dash
    if let Some(dash_pos) = name.find('-') {
        let prefix = &name[..dash_pos];
        if let Ok(num) = prefix.parse::<u32>() {
            let raw = &name[dash_pos + 1..];
            return ParsedName {
                number: Some(num),
                name: raw.to_string(),
                display_title: raw.replace('-', " "),
            };
        }
    }
    // Check if the entire string is a pure number (no dash)
    if let Ok(num) = name.parse::<u32>() {
        return ParsedName {
            number: Some(num),
            name: String::new(),
            display_title: String::new(),
        };
    }
    // No number prefix
    ParsedName {
        number: None,
        name: name.to_string(),
        display_title: name.replace('-', " "),
    }
}
