//! Paragraph classification.
//!
//! Every paragraph of chapter text is assigned exactly one [`ParagraphKind`]
//! by walking an ordered rule table, first match wins. The table order *is*
//! the contract: several rules could match the same paragraph (a short quoted
//! line ending in a colon, a list whose first item mentions "perigo"), and
//! which one applies is decided by position, not by any scoring. Keeping the
//! rules as an explicit `(kind, predicate)` list makes that priority visible
//! and lets each predicate be tested on its own.
//!
//! Classification looks at raw author text only. Escaping and highlighting
//! happen later, in [`crate::format`].

use crate::config::VocabularyConfig;

/// Maximum length (in characters) for a colon-terminated paragraph to count
/// as a section heading. Anything longer is prose that happens to end in a
/// colon.
pub const HEADING_MAX_CHARS: usize = 100;

/// The structural kind assigned to a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphKind {
    /// Short line ending in `:` — rendered as a section heading.
    Heading,
    /// Wrapped in literal double quotes — rendered as a blockquote.
    Quote,
    /// Multi-line paragraph of `-`/`*`/`N.` items — rendered as a list.
    List,
    /// Contains a warning keyword — rendered as a callout.
    Warning,
    /// Everything else.
    Plain,
}

type Predicate = fn(&str, &VocabularyConfig) -> bool;

/// The classification table, highest priority first.
///
/// `Plain` is the fallthrough and deliberately absent.
const RULES: &[(ParagraphKind, Predicate)] = &[
    (ParagraphKind::Heading, is_heading),
    (ParagraphKind::Quote, is_quote),
    (ParagraphKind::List, is_list),
    (ParagraphKind::Warning, is_warning),
];

/// Classify one paragraph. Total: always returns a kind.
pub fn classify(paragraph: &str, vocabulary: &VocabularyConfig) -> ParagraphKind {
    for (kind, matches) in RULES {
        if matches(paragraph, vocabulary) {
            return *kind;
        }
    }
    ParagraphKind::Plain
}

/// A trimmed paragraph under [`HEADING_MAX_CHARS`] characters ending in `:`.
pub fn is_heading(paragraph: &str, _vocab: &VocabularyConfig) -> bool {
    let trimmed = paragraph.trim();
    trimmed.len() > 1 && trimmed.ends_with(':') && trimmed.chars().count() < HEADING_MAX_CHARS
}

/// A paragraph wrapped in literal double-quote characters.
pub fn is_quote(paragraph: &str, _vocab: &VocabularyConfig) -> bool {
    let trimmed = paragraph.trim();
    trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"')
}

/// A paragraph with embedded newlines where every non-empty line starts with
/// a list marker (`-`, `*`, or `N.`).
pub fn is_list(paragraph: &str, _vocab: &VocabularyConfig) -> bool {
    if !paragraph.trim().contains('\n') {
        return false;
    }
    paragraph
        .lines()
        .filter(|line| !line.trim().is_empty())
        .all(|line| strip_list_marker(line).is_some())
}

/// A paragraph containing any of the configured warning keywords,
/// case-insensitively. Only consulted after heading/quote/list declined.
pub fn is_warning(paragraph: &str, vocab: &VocabularyConfig) -> bool {
    let lowered = paragraph.to_lowercase();
    vocab
        .warning_keywords
        .iter()
        .any(|kw| lowered.contains(&kw.to_lowercase()))
}

/// Strip a leading list marker from a line, returning the item text.
///
/// Recognized markers: `- `, `* `, and `N. ` (any digit run). Numeric markers
/// still produce an *unordered* list downstream — the numbering is treated as
/// authoring convenience, not semantics.
pub fn strip_list_marker(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    if let Some(rest) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
        return Some(rest.trim_start());
    }
    // N. item
    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = trimmed[digits..].strip_prefix(". ") {
            return Some(rest.trim_start());
        }
    }
    None
}
