//! Term highlighting.
//!
//! The secondary formatting pass: after a paragraph has been classified and
//! escaped, every vocabulary term in it is wrapped in a semantic span so the
//! stylesheet can tint entities, ritual terms, power words, and elements
//! differently. A final pass wraps runs of 3+ uppercase letters as "ritual
//! formulas" (barbarous names are traditionally written in capitals).
//!
//! Matching is case-insensitive and whole-word; patterns are compiled once
//! at construction from the injected vocabulary. The pass runs on
//! already-escaped text and emits raw HTML, which is why it must run exactly
//! once per input: re-running it over its own output wraps spans inside
//! spans. That single-pass contract is documented and tested in
//! [`crate::format`], not papered over here.

use crate::config::VocabularyConfig;
use regex::Regex;

/// Span class for entity names.
pub const CLASS_ENTITY: &str = "entity-name";
/// Span class for ritual terminology.
pub const CLASS_RITUAL: &str = "ritual-term";
/// Span class for power terminology.
pub const CLASS_POWER: &str = "power-word";
/// Span class for element terminology.
pub const CLASS_ELEMENT: &str = "element-term";
/// Span class for uppercase ritual formulas.
pub const CLASS_FORMULA: &str = "ritual-formula";

/// Compiled highlighting passes for one vocabulary.
#[derive(Debug)]
pub struct Highlighter {
    /// Vocabulary passes in application order, each `(pattern, span class)`.
    passes: Vec<(Regex, &'static str)>,
    /// Runs of 3+ consecutive uppercase letters.
    formula: Regex,
}

impl Highlighter {
    /// Compile the highlighting passes for a vocabulary.
    ///
    /// Terms are regex-escaped, so arbitrary user vocabulary is safe; the
    /// only realistic failure is a pattern exceeding the regex size limit.
    pub fn new(vocabulary: &VocabularyConfig) -> Result<Self, regex::Error> {
        let mut passes = Vec::new();
        for (terms, class) in [
            (&vocabulary.entities, CLASS_ENTITY),
            (&vocabulary.ritual_terms, CLASS_RITUAL),
            (&vocabulary.power_terms, CLASS_POWER),
            (&vocabulary.element_terms, CLASS_ELEMENT),
        ] {
            if let Some(pattern) = vocabulary_pattern(terms) {
                passes.push((Regex::new(&pattern)?, class));
            }
        }
        Ok(Self {
            passes,
            formula: Regex::new(r"\b\p{Lu}{3,}\b")?,
        })
    }

    /// Wrap vocabulary terms and uppercase formulas in semantic spans.
    ///
    /// `escaped` must be entity-escaped text, not raw author input — the
    /// output is injected into the document unescaped.
    pub fn highlight(&self, escaped: &str) -> String {
        let mut text = escaped.to_string();
        for (pattern, class) in &self.passes {
            text = pattern
                .replace_all(&text, |caps: &regex::Captures<'_>| {
                    format!(r#"<span class="{}">{}</span>"#, class, &caps[0])
                })
                .into_owned();
        }
        self.formula
            .replace_all(&text, |caps: &regex::Captures<'_>| {
                format!(r#"<span class="{}">{}</span>"#, CLASS_FORMULA, &caps[0])
            })
            .into_owned()
    }
}

/// Build the alternation pattern for one vocabulary list.
///
/// Returns `None` for an empty list (the pass is skipped entirely).
fn vocabulary_pattern(terms: &[String]) -> Option<String> {
    if terms.is_empty() {
        return None;
    }
    let alternation = terms
        .iter()
        .map(|t| regex::escape(t.trim()))
        .collect::<Vec<_>>()
        .join("|");
    Some(format!(r"(?i)\b(?:{alternation})\b"))
}
