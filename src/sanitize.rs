//! HTML sanitization for print.
//!
//! Stored grimoire content is written for the web: it may carry buttons,
//! forms, interactive classes, and in-page anchors that are meaningless (or
//! broken) on paper. Before a document reaches Chrome's print engine it runs
//! through a fixed, ordered sequence of regex passes — destructive removals
//! first, cosmetic retagging second. Order matters: the cosmetic passes
//! assume interactive markup is already gone, and the page-break pass keys
//! off the retagged chapter headings.
//!
//! This is deliberately a text transformer, not an HTML parser. The input is
//! our own formatter output or author-supplied markup of similar shape;
//! pathological HTML degrades to imperfect cleaning, never to an error.

use regex::Regex;

/// Compiled sanitization passes, applied in declaration order.
#[derive(Debug)]
pub struct Sanitizer {
    passes: Vec<(Regex, &'static str)>,
    images: Regex,
}

/// All patterns are fixed literals; compilation cannot fail on them.
fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern must compile")
}

impl Sanitizer {
    pub fn new() -> Self {
        let passes = vec![
            // -- destructive: interactive elements have no print meaning
            (re(r"(?is)<button[^>]*>.*?</button>"), ""),
            (re(r"(?is)<input[^>]*>"), ""),
            (re(r"(?is)<form[^>]*>.*?</form>"), ""),
            // web-only class attributes (navigation, hover states, buttons)
            (
                re(r#"(?i)\s*class="[^"]*(?:btn|button|nav|menu|interactive|hover)[^"]*""#),
                "",
            ),
            // inline click handlers and in-page anchors
            (re(r#"(?i)\s*onclick=(?:"[^"]*"|'[^']*')"#), ""),
            (re(r##"(?i)\s*href="#[^"]*""##), ""),
            // -- cosmetic: retag for the print stylesheet
            (re(r"(?i)<h1[^>]*>"), r#"<h1 class="pdf-title">"#),
            (re(r"(?i)<h2[^>]*>"), r#"<h2 class="pdf-chapter-title">"#),
            (
                re(r"(?i)<em>"),
                r#"<span class="pdf-emphasis">"#,
            ),
            (re(r"(?i)</em>"), "</span>"),
            (
                re(r"(?i)<strong>"),
                r#"<span class="pdf-strong">"#,
            ),
            (re(r"(?i)</strong>"), "</span>"),
            // start every chapter on a fresh page
            (
                re(r#"<h2 class="pdf-chapter-title">"#),
                r#"<div class="page-break"></div><h2 class="pdf-chapter-title">"#,
            ),
        ];
        Self {
            passes,
            images: re(r"(?is)<img[^>]*>"),
        }
    }

    /// Run all passes over `html`. When `include_images` is false, `<img>`
    /// elements are stripped as well.
    pub fn clean(&self, html: &str, include_images: bool) -> String {
        let mut out = html.to_string();
        for (pattern, replacement) in &self.passes {
            out = pattern.replace_all(&out, *replacement).into_owned();
        }
        if !include_images {
            out = self.images.replace_all(&out, "").into_owned();
        }
        out
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot convenience wrapper around [`Sanitizer`].
pub fn clean_content_for_pdf(html: &str, include_images: bool) -> String {
    Sanitizer::new().clean(html, include_images)
}
