//! Shared types passed between pipeline stages.
//!
//! The scan stage produces [`RawChapter`]s, the formatter turns them into a
//! [`FormattedGrimoire`], and the PDF stage consumes a [`PdfOptions`]. The
//! formatted forms are derived values: they are recomputed on every run and
//! never written back over the raw content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author-supplied chapter text, exactly as read from disk.
///
/// Paragraphs are separated by blank lines. The title comes from the chapter
/// filename (`020-The-First-Rite.txt` → "The First Rite").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawChapter {
    pub title: String,
    pub content: String,
}

/// A chapter after formatting. The original text is kept verbatim alongside
/// the derived HTML so nothing the author wrote is ever lost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormattedChapter {
    pub title: String,
    /// Original chapter text, untouched.
    pub content: String,
    /// Theme-decorated HTML derived from `content`.
    pub formatted_content: String,
}

/// Informational metadata attached to a formatted grimoire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrimoireMetadata {
    /// Whitespace-split token count over description and all chapters.
    /// Display-only; nothing downstream paginates on it.
    pub word_count: usize,
    pub formatted_at: DateTime<Utc>,
}

/// The formatter's aggregate output: decorated title and description,
/// chapters in input order, and metadata.
///
/// Transient by design — created on demand, serialized to `grimoire.json`
/// for inspection, never treated as a persistence format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormattedGrimoire {
    pub title: String,
    pub description: String,
    pub formatted_title: String,
    pub formatted_description: String,
    pub chapters: Vec<FormattedChapter>,
    pub metadata: GrimoireMetadata,
}

/// Input contract for the PDF stage.
///
/// `content` is expected to already be HTML — either formatter output or
/// hand-authored markup. The sanitizer strips anything web-only before the
/// document reaches Chrome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfOptions {
    pub title: String,
    pub content: String,
    /// Extra CSS appended after the print stylesheet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,
    /// When false, `<img>` elements are stripped from the document.
    #[serde(default)]
    pub include_images: bool,
}
