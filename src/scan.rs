//! Content discovery and raw grimoire assembly.
//!
//! Stage 1 of the pipeline. Scans a content directory to discover chapter
//! files, producing a raw grimoire that the formatting stage consumes.
//!
//! ## Directory Structure
//!
//! A grimoire is a flat directory of plain-text chapters:
//!
//! ```text
//! content/                         # Content root
//! ├── grimoire.toml                # Grimoire configuration (optional)
//! ├── 010-Introdução.txt           # Chapter (numbered = included)
//! ├── 020-O-Primeiro-Rito.txt
//! ├── 030-Os-Selos.txt
//! └── rascunho.txt                 # Unnumbered = draft, excluded
//! ```
//!
//! ## Naming Conventions
//!
//! - **Numbered files** (`NNN-name.txt`): Included, sorted by number, the
//!   name becomes the chapter title (dashes → spaces)
//! - **Unnumbered files**: Drafts, silently excluded
//!
//! ## Validation
//!
//! - Duplicate chapter numbers are an error
//! - An empty chapter list is valid (the grimoire renders without chapters)

use crate::config::{self, GrimoireConfig};
use crate::naming::parse_entry_name;
use crate::types::RawChapter;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Content root is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Duplicate chapter number {0} in {1}")]
    DuplicateNumber(u32, PathBuf),
}

/// Raw grimoire output from the scan stage, input to the formatter.
#[derive(Debug)]
pub struct RawGrimoire {
    pub title: String,
    pub description: String,
    pub chapters: Vec<RawChapter>,
    pub config: GrimoireConfig,
}

pub fn scan(root: &Path) -> Result<RawGrimoire, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    // Load grimoire config (uses defaults if grimoire.toml doesn't exist)
    let config = config::load_config(root)?;

    let chapters = collect_chapters(root)?;

    let title = config.title.clone().unwrap_or_else(|| {
        root.file_name()
            .map(|n| parse_entry_name(&n.to_string_lossy()).display_title)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Grimório".to_string())
    });
    let description = config.description.clone().unwrap_or_default();

    Ok(RawGrimoire {
        title,
        description,
        chapters,
        config,
    })
}

/// Discover numbered `.txt` chapters in the root, sorted by number prefix.
fn collect_chapters(root: &Path) -> Result<Vec<RawChapter>, ScanError> {
    let mut txt_files: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && !p
                    .file_name()
                    .map(|n| n.to_string_lossy().starts_with('.'))
                    .unwrap_or(true)
                && p.extension()
                    .map(|e| e.eq_ignore_ascii_case("txt"))
                    .unwrap_or(false)
        })
        .collect();

    txt_files.sort();

    // BTreeMap gives number ordering and catches duplicates in one pass
    let mut numbered: BTreeMap<u32, (String, PathBuf)> = BTreeMap::new();
    for path in txt_files {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let parsed = parse_entry_name(&stem);
        let Some(number) = parsed.number else {
            log::debug!("skipping draft chapter: {}", path.display());
            continue;
        };

        let title = if parsed.display_title.is_empty() {
            format!("Capítulo {number}")
        } else {
            parsed.display_title
        };

        if numbered.contains_key(&number) {
            return Err(ScanError::DuplicateNumber(number, path));
        }
        numbered.insert(number, (title, path));
    }

    let mut chapters = Vec::with_capacity(numbered.len());
    for (title, path) in numbered.into_values() {
        let content = fs::read_to_string(&path)?;
        chapters.push(RawChapter { title, content });
    }
    Ok(chapters)
}
