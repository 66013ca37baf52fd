//! # Abyssal Press
//!
//! Content formatter and PDF press for the Templo do Abismo grimoires.
//! Your filesystem is the data source: a grimoire is a directory of
//! plain-text chapters ordered by numeric prefix, and `grimoire.toml`
//! carries the vocabulary and theme.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Scan     content/   →  RawGrimoire          (filesystem → structured text)
//! 2. Format   raw text   →  FormattedGrimoire    (themed HTML + stylesheet)
//! 3. Press    HTML       →  grimoire.pdf         (headless Chrome, A4)
//! ```
//!
//! The stages are deliberately independent: scan is the only one that reads
//! the content tree, format is a pure text transformation, and the press is
//! the only place a browser process exists. Unit tests exercise the first
//! two without touching Chrome at all.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1 — discovers numbered chapters, loads config, assembles the raw grimoire |
//! | [`format`] | Stage 2 — paragraph classification, vocabulary highlighting, Maud rendering |
//! | [`pdf`] | Stage 3 — sanitizes the HTML and prints it to A4 via headless Chrome |
//! | [`classify`] | First-match-wins paragraph rule table (heading, quote, list, warning, plain) |
//! | [`highlight`] | Regex vocabulary passes that wrap known terms in themed spans |
//! | [`sanitize`] | Strips interactive web markup and retags headings for print |
//! | [`config`] | `grimoire.toml` loading, validation, merging, and theme CSS generation |
//! | [`types`] | Shared serialized types (`RawChapter`, `FormattedGrimoire`, `PdfOptions`) |
//! | [`naming`] | `NNN-name` filename convention parser |
//! | [`output`] | CLI output formatting for the pipeline stages |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system. Malformed markup is a build error, interpolation is
//! auto-escaped, and there is no template directory to ship. The formatter
//! escapes author text by hand before injecting highlight spans, so
//! `PreEscaped` appears only at that one seam.
//!
//! ## Chrome as the Print Engine
//!
//! The press drives headless Chrome over the DevTools protocol instead of
//! using a Rust PDF library. Pagination, hyphenation, and font shaping for
//! Portuguese text are exactly the problems browser engines already solve;
//! the crate's job reduces to sanitizing the document and managing the
//! browser process lifecycle ([`pdf`]).
//!
//! ## Single-Pass Formatting
//!
//! Formatting is not idempotent: highlighting injects spans whose class
//! names contain vocabulary words, so re-formatting formatted output
//! double-wraps them. The pipeline therefore always formats from raw
//! chapter text, never from stored HTML. See [`format`] for the contract.
//!
//! ## NNN-Prefix Ordering
//!
//! Chapter files use a numeric prefix (`010-`, `020-`, ...) for explicit
//! ordering, parsed by [`naming::parse_entry_name`]. Files without a prefix
//! are drafts and are excluded. The filesystem is the source of truth; no
//! database, no front-matter, no separate ordering file.

pub mod classify;
pub mod config;
pub mod format;
pub mod highlight;
pub mod naming;
pub mod output;
pub mod pdf;
pub mod sanitize;
pub mod scan;
pub mod types;
