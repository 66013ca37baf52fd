//! Grimoire formatting.
//!
//! Stage 2 of the pipeline: turns raw author text into theme-decorated HTML.
//! The transformation is pure — a [`Formatter`] is built once from the
//! injected configuration (symbol table, vocabularies) and from then on is a
//! function of its input text only. It never touches the filesystem and never
//! fails: malformed or empty input degrades to empty output segments.
//!
//! ## Per-paragraph flow
//!
//! ```text
//! raw paragraph ─→ classify (first-match-wins rule table, crate::classify)
//!               ─→ escape HTML entities
//!               ─→ highlight vocabulary terms (crate::highlight)
//!               ─→ wrap in the element for its kind (maud)
//! ```
//!
//! ## Single-pass contract
//!
//! Highlighting emits raw spans into escaped text, so the formatter must run
//! exactly once over raw author content. Feeding formatter output back in
//! double-wraps spans — asserted by test below, documented rather than
//! "fixed", because detecting already-formatted input reliably would mean
//! parsing our own HTML.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for the structural markup:
//! type-safe templates with automatic escaping, with [`PreEscaped`] reserved
//! for the highlighted fragments that are escaped by hand first.

use crate::classify::{self, ParagraphKind};
use crate::config::{self, GrimoireConfig, SymbolConfig, ThemeConfig, VocabularyConfig};
use crate::highlight::Highlighter;
use crate::types::{FormattedChapter, FormattedGrimoire, GrimoireMetadata, RawChapter};
use chrono::Utc;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("vocabulary pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

const CSS_STATIC: &str = include_str!("../static/grimoire.css");

/// The configured formatter. Construction compiles the highlighting
/// patterns; formatting itself is infallible.
#[derive(Debug)]
pub struct Formatter {
    symbols: SymbolConfig,
    vocabulary: VocabularyConfig,
    highlighter: Highlighter,
}

impl Formatter {
    pub fn new(config: &GrimoireConfig) -> Result<Self, FormatError> {
        Ok(Self {
            symbols: config.symbols.clone(),
            vocabulary: config.vocabulary.clone(),
            highlighter: Highlighter::new(&config.vocabulary)?,
        })
    }

    /// Format a whole grimoire. For N input chapters the result has exactly
    /// N formatted chapters, in input order.
    pub fn format_grimoire(
        &self,
        title: &str,
        description: &str,
        chapters: &[RawChapter],
    ) -> FormattedGrimoire {
        let formatted_chapters: Vec<FormattedChapter> =
            chapters.iter().map(|c| self.format_chapter(c)).collect();

        let word_count = word_count(description)
            + chapters
                .iter()
                .map(|c| word_count(&c.title) + word_count(&c.content))
                .sum::<usize>();

        FormattedGrimoire {
            title: title.to_string(),
            description: description.to_string(),
            formatted_title: self.format_title(title).into_string(),
            formatted_description: self.format_description(description).into_string(),
            chapters: formatted_chapters,
            metadata: GrimoireMetadata {
                word_count,
                formatted_at: Utc::now(),
            },
        }
    }

    /// Format one chapter, keeping the original text alongside the HTML.
    pub fn format_chapter(&self, chapter: &RawChapter) -> FormattedChapter {
        let heading = html! {
            h2.chapter-title {
                (self.symbols.chapter_mark) " " (PreEscaped(self.highlight_escaped(&chapter.title)))
            }
        };
        let body = self.format_text(&chapter.content);
        FormattedChapter {
            title: chapter.title.clone(),
            content: chapter.content.clone(),
            formatted_content: format!("{}\n{}", heading.into_string(), body),
        }
    }

    /// Format a block of raw text: split into paragraphs on blank lines,
    /// classify each, render each. Empty input yields an empty string.
    pub fn format_text(&self, text: &str) -> String {
        split_paragraphs(text)
            .iter()
            .map(|p| self.render_paragraph(p).into_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_title(&self, title: &str) -> Markup {
        let mark = &self.symbols.title_mark;
        html! {
            h1.grimoire-title {
                (mark) " " (PreEscaped(self.highlight_escaped(title))) " " (mark)
            }
        }
    }

    fn format_description(&self, description: &str) -> Markup {
        html! {
            p.grimoire-description { (PreEscaped(self.highlight_escaped(description))) }
        }
    }

    /// Render one classified paragraph.
    fn render_paragraph(&self, paragraph: &str) -> Markup {
        let trimmed = paragraph.trim();
        match classify::classify(trimmed, &self.vocabulary) {
            ParagraphKind::Heading => html! {
                h3.section-title {
                    (self.symbols.section_mark) " " (PreEscaped(self.highlight_escaped(trimmed)))
                }
            },
            ParagraphKind::Quote => {
                let inner = trimmed.trim_matches('"').trim();
                html! {
                    blockquote.grimoire-quote { (PreEscaped(self.highlight_escaped(inner))) }
                }
            }
            ParagraphKind::List => html! {
                ul.grimoire-list {
                    @for line in trimmed.lines() {
                        @if let Some(item) = classify::strip_list_marker(line) {
                            li { (PreEscaped(self.highlight_escaped(item))) }
                        }
                    }
                }
            },
            ParagraphKind::Warning => html! {
                div.grimoire-warning {
                    p { (PreEscaped(self.highlight_escaped(trimmed))) }
                }
            },
            ParagraphKind::Plain => html! {
                p.grimoire-paragraph { (PreEscaped(self.highlight_escaped(trimmed))) }
            },
        }
    }

    /// Escape, then highlight. The only place raw author text crosses into
    /// markup.
    fn highlight_escaped(&self, text: &str) -> String {
        self.highlighter.highlight(&escape_html(text))
    }
}

/// Render the complete standalone HTML page for a formatted grimoire.
pub fn render_document(grimoire: &FormattedGrimoire, css: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="pt" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (grimoire.title) }
                style { (PreEscaped(css.to_string())) }
            }
            body {
                main.grimoire {
                    header.grimoire-header {
                        (PreEscaped(grimoire.formatted_title.clone()))
                        (PreEscaped(grimoire.formatted_description.clone()))
                    }
                    @for chapter in &grimoire.chapters {
                        section.grimoire-chapter {
                            (PreEscaped(chapter.formatted_content.clone()))
                        }
                    }
                    footer.grimoire-footer {
                        p { (grimoire.metadata.word_count) " palavras" }
                    }
                }
            }
        }
    }
}

/// Render just the article body (title, description, chapters) without the
/// page shell. This is what the PDF exporter sanitizes and paginates.
pub fn render_body(grimoire: &FormattedGrimoire) -> String {
    html! {
        (PreEscaped(grimoire.formatted_title.clone()))
        (PreEscaped(grimoire.formatted_description.clone()))
        @for chapter in &grimoire.chapters {
            (PreEscaped(chapter.formatted_content.clone()))
        }
    }
    .into_string()
}

/// The full screen stylesheet: theme variables followed by the static rules.
pub fn stylesheet(theme: &ThemeConfig) -> String {
    format!("{}\n\n{}", config::generate_theme_css(theme), CSS_STATIC)
}

/// Count whitespace-separated tokens. Informational only.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Split text into paragraphs on blank lines. Lines within a paragraph keep
/// their newlines (the list rule depends on them); blank-only paragraphs are
/// dropped.
fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.trim().is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
            current.clear();
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }
    if !current.trim().is_empty() {
        paragraphs.push(current);
    }
    paragraphs
}

/// Minimal entity escaping for text destined for the highlighter.
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter() -> Formatter {
        Formatter::new(&GrimoireConfig::default()).unwrap()
    }

    fn chapter(title: &str, content: &str) -> RawChapter {
        RawChapter {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    // =========================================================================
    // format_grimoire aggregate behavior
    // =========================================================================

    #[test]
    fn chapter_count_and_order_preserved() {
        let chapters = vec![
            chapter("Primeiro", "texto um"),
            chapter("Segundo", "texto dois"),
            chapter("Terceiro", "texto três"),
        ];
        let g = formatter().format_grimoire("Liber", "descrição", &chapters);
        assert_eq!(g.chapters.len(), 3);
        assert_eq!(g.chapters[0].title, "Primeiro");
        assert_eq!(g.chapters[1].title, "Segundo");
        assert_eq!(g.chapters[2].title, "Terceiro");
    }

    #[test]
    fn empty_chapter_list_is_valid() {
        let g = formatter().format_grimoire("Liber", "", &[]);
        assert!(g.chapters.is_empty());
        assert_eq!(g.metadata.word_count, 0);
    }

    #[test]
    fn original_text_retained_alongside_html() {
        let chapters = vec![chapter("Um", "parágrafo original")];
        let g = formatter().format_grimoire("Liber", "", &chapters);
        assert_eq!(g.chapters[0].content, "parágrafo original");
        assert!(g.chapters[0].formatted_content.contains("<p"));
        assert_eq!(g.title, "Liber");
    }

    #[test]
    fn title_gets_symbol_marks() {
        let g = formatter().format_grimoire("Liber Abyssi", "", &[]);
        assert!(g.formatted_title.contains("🜏"));
        assert!(g.formatted_title.contains("grimoire-title"));
        assert!(g.formatted_title.contains("Liber Abyssi"));
    }

    #[test]
    fn chapter_title_gets_chapter_mark() {
        let chapters = vec![chapter("O Primeiro Selo", "texto")];
        let g = formatter().format_grimoire("Liber", "", &chapters);
        assert!(g.chapters[0].formatted_content.contains("⛧"));
        assert!(g.chapters[0].formatted_content.contains("chapter-title"));
    }

    #[test]
    fn word_count_sums_description_and_chapters() {
        let chapters = vec![chapter("Um", "dois três")];
        let g = formatter().format_grimoire("Liber", "zero", &chapters);
        // "zero" + "Um" + "dois três"
        assert_eq!(g.metadata.word_count, 4);
    }

    #[test]
    fn word_count_splits_on_whitespace_runs() {
        assert_eq!(word_count("um dois três"), 3);
        assert_eq!(word_count("  um\t\tdois \n três  "), 3);
        assert_eq!(word_count(""), 0);
    }

    // =========================================================================
    // Paragraph rendering
    // =========================================================================

    #[test]
    fn heading_paragraph_renders_h3() {
        let out = formatter().format_text("Resumo:");
        assert!(out.contains("<h3 class=\"section-title\">"));
        assert!(out.contains("Resumo:"));
        assert!(!out.contains("<p"));
    }

    #[test]
    fn quote_paragraph_renders_blockquote() {
        let out = formatter().format_text("\"O abismo devolve o olhar.\"");
        assert!(out.contains("<blockquote class=\"grimoire-quote\">"));
        // Surrounding quote characters stripped from the rendered text
        assert!(!out.contains("&quot;O abismo"));
    }

    #[test]
    fn quote_still_gets_term_highlighting() {
        let out = formatter().format_text("\"o abismo chama o abismo\"");
        assert!(out.contains("<blockquote"));
        assert!(out.contains("element-term"));
    }

    #[test]
    fn list_paragraph_renders_unordered_list() {
        let out = formatter().format_text("- sal\n- enxofre\n- mercúrio");
        assert!(out.contains("<ul class=\"grimoire-list\">"));
        assert_eq!(out.matches("<li>").count(), 3);
    }

    #[test]
    fn numeric_markers_still_render_unordered() {
        let out = formatter().format_text("1. primeiro\n2. segundo");
        assert!(out.contains("<ul"));
        assert!(!out.contains("<ol"));
        assert!(out.contains("primeiro"));
        // marker digits are consumed, not rendered
        assert!(!out.contains("1. primeiro"));
    }

    #[test]
    fn warning_paragraph_renders_callout() {
        let out = formatter().format_text("Aviso: isto é perigoso");
        assert!(out.contains("<div class=\"grimoire-warning\">"));
    }

    #[test]
    fn heading_takes_precedence_over_warning() {
        let out = formatter().format_text("Aviso:");
        assert!(out.contains("section-title"));
        assert!(!out.contains("grimoire-warning"));
    }

    #[test]
    fn plain_paragraph_is_default() {
        let out = formatter().format_text("Uma frase comum sem nada de especial.");
        assert!(out.contains("<p class=\"grimoire-paragraph\">"));
    }

    #[test]
    fn blank_lines_separate_paragraphs() {
        let out = formatter().format_text("primeiro parágrafo\n\n\nsegundo parágrafo");
        assert_eq!(out.matches("grimoire-paragraph").count(), 2);
    }

    #[test]
    fn empty_text_yields_empty_output() {
        assert_eq!(formatter().format_text(""), "");
        assert_eq!(formatter().format_text("\n  \n\n"), "");
    }

    #[test]
    fn author_markup_is_escaped() {
        let out = formatter().format_text("cuidado com <script>alert(1)</script>");
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;"));
    }

    #[test]
    fn highlighting_applies_inside_paragraphs() {
        let out = formatter().format_text("Lilith guarda o sigilo");
        assert!(out.contains("entity-name"));
        assert!(out.contains("ritual-term"));
    }

    // =========================================================================
    // Single-pass contract
    // =========================================================================

    #[test]
    fn formatting_is_single_pass_not_idempotent() {
        let f = formatter();
        let once = f.format_text("o ritual do abismo");
        let twice = f.format_text(&once);
        // Running the formatter over its own output double-wraps spans.
        // The formatter is contracted to run exactly once on raw text.
        assert!(twice.matches("ritual-term").count() > once.matches("ritual-term").count());
    }

    // =========================================================================
    // Document rendering
    // =========================================================================

    #[test]
    fn render_document_is_complete_page() {
        let g = formatter().format_grimoire("Liber", "descrição", &[chapter("Um", "texto")]);
        let css = stylesheet(&ThemeConfig::default());
        let doc = render_document(&g, &css).into_string();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>Liber</title>"));
        assert!(doc.contains("--grimoire-bg"));
        assert!(doc.contains("grimoire-chapter"));
    }

    #[test]
    fn render_body_has_no_page_shell() {
        let g = formatter().format_grimoire("Liber", "descrição", &[chapter("Um", "texto")]);
        let body = render_body(&g);
        assert!(!body.contains("<html"));
        assert!(!body.contains("<body"));
        assert!(body.contains("grimoire-title"));
        assert!(body.contains("chapter-title"));
    }

    #[test]
    fn stylesheet_combines_theme_and_static_rules() {
        let css = stylesheet(&ThemeConfig::default());
        assert!(css.contains(":root"));
        assert!(css.contains(".grimoire-warning"));
    }

    // =========================================================================
    // split_paragraphs
    // =========================================================================

    #[test]
    fn split_keeps_intra_paragraph_newlines() {
        let paragraphs = split_paragraphs("- um\n- dois\n\nprosa");
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0], "- um\n- dois");
    }

    #[test]
    fn split_handles_whitespace_only_blank_lines() {
        let paragraphs = split_paragraphs("um\n   \ndois");
        assert_eq!(paragraphs.len(), 2);
    }

    #[test]
    fn escape_html_covers_sensitive_chars() {
        assert_eq!(escape_html(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
    }
}
