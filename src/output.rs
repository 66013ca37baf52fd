//! CLI output formatting for the pipeline stages.
//!
//! Output is information-centric, not file-centric: each chapter leads with
//! its positional index and title, with counts as trailing detail. Every
//! stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.
//!
//! ```text
//! Grimório: Liber Abyssi
//!     Um estudo das trevas
//!
//! Capítulos
//!     001 Introdução (6 palavras)
//!     002 O Primeiro Rito (4 palavras)
//!
//! 2 capítulos, 12 palavras
//! ```

use crate::format::word_count;
use crate::scan::RawGrimoire;
use crate::types::FormattedGrimoire;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Chapter header line: positional index + title + word count.
fn chapter_line(index: usize, title: &str, words: usize) -> String {
    format!("{} {} ({} palavras)", format_index(index), title, words)
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan stage output showing the discovered grimoire structure.
pub fn format_scan_output(grimoire: &RawGrimoire) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!("Grimório: {}", grimoire.title));
    if !grimoire.description.is_empty() {
        lines.push(format!("    {}", grimoire.description));
    }

    lines.push(String::new());
    lines.push("Capítulos".to_string());
    if grimoire.chapters.is_empty() {
        lines.push("    (nenhum)".to_string());
    }
    let mut total_words = word_count(&grimoire.description);
    for (i, chapter) in grimoire.chapters.iter().enumerate() {
        let words = word_count(&chapter.title) + word_count(&chapter.content);
        total_words += words;
        lines.push(format!("    {}", chapter_line(i + 1, &chapter.title, words)));
    }

    lines.push(String::new());
    lines.push(format!(
        "{} capítulos, {} palavras",
        grimoire.chapters.len(),
        total_words
    ));

    lines
}

pub fn print_scan_output(grimoire: &RawGrimoire) {
    for line in format_scan_output(grimoire) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Format output
// ============================================================================

/// Format formatting stage output: each chapter with its output anchor.
pub fn format_format_output(grimoire: &FormattedGrimoire, output: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!(
        "{} \u{2192} {}",
        grimoire.title,
        output.join("index.html").display()
    ));
    lines.push(format!(
        "Estilo \u{2192} {}",
        output.join("grimoire.css").display()
    ));
    for (i, chapter) in grimoire.chapters.iter().enumerate() {
        lines.push(format!("    {} {}", format_index(i + 1), chapter.title));
    }

    lines.push(String::new());
    lines.push(format!(
        "{} capítulos formatados, {} palavras",
        grimoire.chapters.len(),
        grimoire.metadata.word_count
    ));

    lines
}

pub fn print_format_output(grimoire: &FormattedGrimoire, output: &Path) {
    for line in format_format_output(grimoire, output) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 3: PDF output
// ============================================================================

/// Format PDF stage output: title, destination, and size.
pub fn format_pdf_output(title: &str, output: &Path, bytes: usize) -> Vec<String> {
    vec![format!(
        "{} \u{2192} {} ({:.1} KiB)",
        title,
        output.display(),
        bytes as f64 / 1024.0
    )]
}

pub fn print_pdf_output(title: &str, output: &Path, bytes: usize) {
    for line in format_pdf_output(title, output, bytes) {
        println!("{}", line);
    }
}
