//! Grimoire configuration module.
//!
//! Handles loading, validating, and merging `grimoire.toml`. Stock defaults
//! ship in the crate; a user file in the content root overrides just the keys
//! it names. Unknown keys are rejected to catch typos early.
//!
//! The vocabulary and symbol tables live here rather than as module globals:
//! the formatter receives them at construction, which keeps the text
//! transformation a pure function of its input plus injected data — and lets
//! tests swap vocabularies freely.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown by `abyssal-press gen-config`
//!
//! title = "Liber Abyssi"
//! description = "Um estudo das correntes do abismo"
//!
//! [symbols]
//! title_mark = "🜏"
//! chapter_mark = "⛧"
//! section_mark = "🜏"
//!
//! [vocabulary]
//! entities = ["Lúcifer", "Lilith", ...]
//! ritual_terms = ["ritual", "invocação", ...]
//! power_terms = ["poder", "energia", ...]
//! element_terms = ["fogo", "água", ...]
//! warning_keywords = ["cuidado", "atenção", "aviso", "perigo", "importante"]
//!
//! [theme]
//! background = "#0d0a0f"
//! text = "#d6cfc4"
//! accent = "#8b0000"
//! ...
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Grimoire configuration loaded from `grimoire.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GrimoireConfig {
    /// Grimoire title. Falls back to the content directory name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Grimoire description shown below the title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Theme glyphs inserted around titles and headings.
    pub symbols: SymbolConfig,
    /// Term vocabularies driving the highlighting passes.
    pub vocabulary: VocabularyConfig,
    /// Color and typography settings for the generated stylesheet.
    pub theme: ThemeConfig,
}

impl Default for GrimoireConfig {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            symbols: SymbolConfig::default(),
            vocabulary: VocabularyConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl GrimoireConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, terms) in [
            ("vocabulary.entities", &self.vocabulary.entities),
            ("vocabulary.ritual_terms", &self.vocabulary.ritual_terms),
            ("vocabulary.power_terms", &self.vocabulary.power_terms),
            ("vocabulary.element_terms", &self.vocabulary.element_terms),
            (
                "vocabulary.warning_keywords",
                &self.vocabulary.warning_keywords,
            ),
        ] {
            if terms.iter().any(|t| t.trim().is_empty()) {
                return Err(ConfigError::Validation(format!(
                    "{name} must not contain empty terms"
                )));
            }
        }
        for (name, mark) in [
            ("symbols.title_mark", &self.symbols.title_mark),
            ("symbols.chapter_mark", &self.symbols.chapter_mark),
            ("symbols.section_mark", &self.symbols.section_mark),
        ] {
            if mark.contains('\n') {
                return Err(ConfigError::Validation(format!(
                    "{name} must be a single line"
                )));
            }
        }
        Ok(())
    }
}

/// Theme glyphs inserted by the formatter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SymbolConfig {
    /// Glyph flanking the grimoire title.
    pub title_mark: String,
    /// Glyph prefixed to chapter titles.
    pub chapter_mark: String,
    /// Glyph prefixed to detected section headings.
    pub section_mark: String,
}

impl Default for SymbolConfig {
    fn default() -> Self {
        Self {
            title_mark: "🜏".to_string(),
            chapter_mark: "⛧".to_string(),
            section_mark: "🜏".to_string(),
        }
    }
}

/// Term vocabularies for the highlighting passes.
///
/// Matching is case-insensitive and whole-word. Each list maps to a distinct
/// span class in the output (see [`crate::highlight`]). An empty list simply
/// disables that pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VocabularyConfig {
    /// Entity names, wrapped as `entity-name`.
    pub entities: Vec<String>,
    /// Ritual terminology, wrapped as `ritual-term`.
    pub ritual_terms: Vec<String>,
    /// Power terminology, wrapped as `power-word`.
    pub power_terms: Vec<String>,
    /// Element terminology, wrapped as `element-term`.
    pub element_terms: Vec<String>,
    /// Keywords that turn a paragraph into a warning callout.
    pub warning_keywords: Vec<String>,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        let list = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            entities: list(&[
                "Lúcifer",
                "Lilith",
                "Belial",
                "Leviatã",
                "Asmodeus",
                "Astaroth",
                "Baphomet",
                "Abaddon",
            ]),
            ritual_terms: list(&[
                "ritual",
                "invocação",
                "evocação",
                "consagração",
                "banimento",
                "sigilo",
                "pacto",
                "oferenda",
            ]),
            power_terms: list(&[
                "poder",
                "energia",
                "vibração",
                "manifestação",
                "transmutação",
                "gnose",
                "vontade",
            ]),
            element_terms: list(&[
                "fogo", "água", "terra", "ar", "éter", "abismo", "trevas", "sombra",
            ]),
            warning_keywords: list(&["cuidado", "atenção", "aviso", "perigo", "importante"]),
        }
    }
}

/// Color and typography settings for the generated stylesheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Page background color.
    pub background: String,
    /// Body text color.
    pub text: String,
    /// Accent color (headings, symbols, highlighted entities).
    pub accent: String,
    /// Muted color (descriptions, quote attribution).
    pub text_muted: String,
    /// Warning callout border/background tint.
    pub warning: String,
    /// Border color for quotes and rules.
    pub border: String,
    /// Body font stack.
    pub body_font: String,
    /// Heading font stack.
    pub heading_font: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background: "#0d0a0f".to_string(),
            text: "#d6cfc4".to_string(),
            accent: "#8b0000".to_string(),
            text_muted: "#8a8278".to_string(),
            warning: "#b8860b".to_string(),
            border: "#3a2f3d".to_string(),
            body_font: "'EB Garamond', Georgia, serif".to_string(),
            heading_font: "'Cinzel', 'Times New Roman', serif".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(GrimoireConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely — vocabulary
///   lists are replaced whole, not appended.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `grimoire.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `grimoire.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("grimoire.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<GrimoireConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GrimoireConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `grimoire.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<GrimoireConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `grimoire.toml` with all keys documented.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Abyssal Press Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file as grimoire.toml in the content root, next to the
# NNN-chapter.txt files. Unknown keys will cause an error.

# Grimoire title (falls back to the content directory name)
# title = "Liber Abyssi"

# Description shown below the title
# description = "Um estudo das correntes do abismo"

# ---------------------------------------------------------------------------
# Theme glyphs inserted by the formatter
# ---------------------------------------------------------------------------
[symbols]
# Glyph flanking the grimoire title.
title_mark = "🜏"

# Glyph prefixed to chapter titles.
chapter_mark = "⛧"

# Glyph prefixed to detected section headings.
section_mark = "🜏"

# ---------------------------------------------------------------------------
# Highlighting vocabularies (case-insensitive, whole-word)
# ---------------------------------------------------------------------------
[vocabulary]
# Entity names, wrapped as <span class="entity-name">.
entities = ["Lúcifer", "Lilith", "Belial", "Leviatã", "Asmodeus", "Astaroth", "Baphomet", "Abaddon"]

# Ritual terminology, wrapped as <span class="ritual-term">.
ritual_terms = ["ritual", "invocação", "evocação", "consagração", "banimento", "sigilo", "pacto", "oferenda"]

# Power terminology, wrapped as <span class="power-word">.
power_terms = ["poder", "energia", "vibração", "manifestação", "transmutação", "gnose", "vontade"]

# Element terminology, wrapped as <span class="element-term">.
element_terms = ["fogo", "água", "terra", "ar", "éter", "abismo", "trevas", "sombra"]

# A paragraph containing any of these becomes a warning callout.
warning_keywords = ["cuidado", "atenção", "aviso", "perigo", "importante"]

# ---------------------------------------------------------------------------
# Theme colors and typography
# ---------------------------------------------------------------------------
[theme]
background = "#0d0a0f"
text = "#d6cfc4"
accent = "#8b0000"
text_muted = "#8a8278"
warning = "#b8860b"
border = "#3a2f3d"
body_font = "'EB Garamond', Georgia, serif"
heading_font = "'Cinzel', 'Times New Roman', serif"
"##
}

/// Generate CSS custom properties from theme config.
///
/// Prepended to the static stylesheet, so every themed selector reads from
/// these variables.
pub fn generate_theme_css(theme: &ThemeConfig) -> String {
    format!(
        r#":root {{
    --grimoire-bg: {background};
    --grimoire-text: {text};
    --grimoire-accent: {accent};
    --grimoire-text-muted: {text_muted};
    --grimoire-warning: {warning};
    --grimoire-border: {border};
    --grimoire-body-font: {body_font};
    --grimoire-heading-font: {heading_font};
}}"#,
        background = theme.background,
        text = theme.text,
        accent = theme.accent,
        text_muted = theme.text_muted,
        warning = theme.warning,
        border = theme.border,
        body_font = theme.body_font,
        heading_font = theme.heading_font,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_vocabularies() {
        let config = GrimoireConfig::default();
        assert!(config.vocabulary.entities.contains(&"Lilith".to_string()));
        assert!(
            config
                .vocabulary
                .warning_keywords
                .contains(&"perigo".to_string())
        );
        assert_eq!(config.symbols.title_mark, "🜏");
    }

    #[test]
    fn default_config_has_no_title() {
        let config = GrimoireConfig::default();
        assert!(config.title.is_none());
        assert!(config.description.is_none());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
title = "Liber Abyssi"

[theme]
accent = "#aa0000"
"##;
        let config: GrimoireConfig = toml::from_str(toml).unwrap();
        // Overridden values
        assert_eq!(config.title.as_deref(), Some("Liber Abyssi"));
        assert_eq!(config.theme.accent, "#aa0000");
        // Defaults preserved
        assert_eq!(config.theme.background, "#0d0a0f");
        assert_eq!(config.symbols.chapter_mark, "⛧");
    }

    #[test]
    fn vocabulary_lists_replace_not_append() {
        let base = stock_defaults_value();
        let overlay: toml::Value = toml::from_str(
            r#"
[vocabulary]
entities = ["Hécate"]
"#,
        )
        .unwrap();
        let config = resolve_config(base, Some(overlay)).unwrap();
        assert_eq!(config.vocabulary.entities, vec!["Hécate".to_string()]);
        // Other lists untouched
        assert!(
            config
                .vocabulary
                .ritual_terms
                .contains(&"ritual".to_string())
        );
    }

    #[test]
    fn generate_css_uses_theme_colors() {
        let mut theme = ThemeConfig::default();
        theme.background = "#111111".to_string();
        let css = generate_theme_css(&theme);
        assert!(css.contains("--grimoire-bg: #111111"));
        assert!(css.contains("--grimoire-accent: #8b0000"));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert!(config.title.is_none());
        assert_eq!(config.theme.background, "#0d0a0f");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("grimoire.toml"),
            r##"
title = "Codex Umbrae"
description = "Notas sobre as sombras"
"##,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.title.as_deref(), Some("Codex Umbrae"));
        assert_eq!(config.description.as_deref(), Some("Notas sobre as sombras"));
        // Unspecified values should be defaults
        assert_eq!(config.symbols.title_mark, "🜏");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("grimoire.toml"), "this is not toml [[[").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"title = "a""#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"title = "b""#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("title").unwrap().as_str(), Some("b"));
    }

    #[test]
    fn merge_toml_table_merge_preserves_base_keys() {
        let base: toml::Value = toml::from_str(
            r##"
[theme]
background = "#000"
accent = "#f00"
"##,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r##"
[theme]
accent = "#a00"
"##,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let theme = merged.get("theme").unwrap();
        assert_eq!(theme.get("accent").unwrap().as_str(), Some("#a00"));
        assert_eq!(theme.get("background").unwrap().as_str(), Some("#000"));
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[symbols]
titel_mark = "x"
"#;
        let result: Result<GrimoireConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let toml_str = r#"
[vocab]
entities = []
"#;
        let result: Result<GrimoireConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(GrimoireConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_vocabulary_term() {
        let mut config = GrimoireConfig::default();
        config.vocabulary.entities.push("  ".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("entities"));
    }

    #[test]
    fn validate_rejects_multiline_symbol() {
        let mut config = GrimoireConfig::default();
        config.symbols.chapter_mark = "⛧\n⛧".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("grimoire.toml"),
            r#"
[vocabulary]
entities = [""]
"#,
        )
        .unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_is_valid_toml() {
        let content = stock_config_toml();
        let _: toml::Value = toml::from_str(content).expect("stock config must be valid TOML");
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let content = stock_config_toml();
        let config: GrimoireConfig = toml::from_str(content).unwrap();
        let defaults = GrimoireConfig::default();
        assert_eq!(config.symbols.title_mark, defaults.symbols.title_mark);
        assert_eq!(config.vocabulary.entities, defaults.vocabulary.entities);
        assert_eq!(config.theme.background, defaults.theme.background);
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        assert!(content.contains("[symbols]"));
        assert!(content.contains("[vocabulary]"));
        assert!(content.contains("[theme]"));
    }
}
