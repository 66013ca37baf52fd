//! PDF export via headless Chrome.
//!
//! Stage 3 of the pipeline. Chrome's print engine owns the genuinely hard
//! parts — pagination, line breaking, font shaping — so this module only
//! assembles a print-styled document, drives the render over the DevTools
//! protocol, and enforces the resource and timeout discipline around it:
//!
//! - The [`Browser`] handle is scoped to a single call. It owns the Chrome
//!   process, and dropping it tears the process down on every exit path —
//!   success, error, or timeout. No handle escapes this module.
//! - Every DevTools call is bounded by [`RENDER_TIMEOUT`], so a malformed
//!   document produces an error, never a hung request.
//! - One call, one PDF. No retries, no streaming, no cancellation.
//!
//! Failures are split into distinct kinds ([`PdfError`]) instead of a single
//! "generation failed", so callers can tell a missing Chrome binary from a
//! render fault.

use crate::sanitize;
use crate::types::PdfOptions;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use maud::{DOCTYPE, PreEscaped, html};
use std::io::Write as _;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    /// Rejected before any browser was spawned.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Chrome could not be found or started.
    #[error("failed to launch headless chrome: {0}")]
    Launch(String),
    /// Navigation or the print render itself failed (or timed out).
    #[error("PDF render failed: {0}")]
    Render(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Upper bound on each DevTools operation (navigate, render).
pub const RENDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Brand line interpolated into the page footer.
pub const BRAND: &str = "Templo do Abismo";

// A4 in inches, the unit the DevTools print API speaks.
const A4_WIDTH_IN: f64 = 8.27;
const A4_HEIGHT_IN: f64 = 11.69;
const MARGIN_VERTICAL_MM: f64 = 20.0;
const MARGIN_HORIZONTAL_MM: f64 = 15.0;

const CSS_PRINT: &str = include_str!("../static/print.css");

/// Render a grimoire (or arbitrary stored HTML) to a paginated A4 PDF.
///
/// The content is sanitized, wrapped in a print-styled document, written to
/// a scratch file, and printed by a Chrome instance that lives exactly as
/// long as this call.
pub fn generate_grimoire_pdf(options: &PdfOptions) -> Result<Vec<u8>, PdfError> {
    if options.content.trim().is_empty() {
        return Err(PdfError::InvalidInput("content is empty".to_string()));
    }

    let document = build_print_document(options);

    // Chrome resolves file:// URLs without the length and fragment pitfalls
    // of data: URIs. The handle keeps the file alive until we return.
    let mut scratch = tempfile::Builder::new()
        .prefix("abyssal-press-")
        .suffix(".html")
        .tempfile()?;
    scratch.write_all(document.as_bytes())?;
    scratch.flush()?;
    let url = format!("file://{}", scratch.path().display());

    log::debug!("launching headless chrome for '{}'", options.title);
    // `browser` owns the Chrome process; dropping it on any return path
    // below (including the ? branches) tears the process down.
    let browser = Browser::new(LaunchOptions::default())
        .map_err(|e| PdfError::Launch(e.to_string()))?;

    let tab = browser
        .new_tab()
        .map_err(|e| PdfError::Render(e.to_string()))?;
    tab.set_default_timeout(RENDER_TIMEOUT);

    tab.navigate_to(&url)
        .and_then(|t| t.wait_until_navigated())
        .map_err(|e| PdfError::Render(e.to_string()))?;

    let pdf = tab
        .print_to_pdf(Some(print_options(&options.title)))
        .map_err(|e| PdfError::Render(e.to_string()))?;

    // Best-effort tab close; the process teardown on drop is the guarantee.
    let _ = tab.close(true);

    log::debug!("rendered {} bytes of PDF", pdf.len());
    Ok(pdf)
}

/// Fixed A4 print geometry with the themed header/footer bands.
fn print_options(title: &str) -> PrintToPdfOptions {
    PrintToPdfOptions {
        display_header_footer: Some(true),
        print_background: Some(true),
        paper_width: Some(A4_WIDTH_IN),
        paper_height: Some(A4_HEIGHT_IN),
        margin_top: Some(mm_to_inches(MARGIN_VERTICAL_MM)),
        margin_bottom: Some(mm_to_inches(MARGIN_VERTICAL_MM)),
        margin_left: Some(mm_to_inches(MARGIN_HORIZONTAL_MM)),
        margin_right: Some(mm_to_inches(MARGIN_HORIZONTAL_MM)),
        header_template: Some(header_template(title)),
        footer_template: Some(footer_template()),
        prefer_css_page_size: Some(false),
        ..PrintToPdfOptions::default()
    }
}

/// Wrap sanitized content in a complete print-styled HTML document.
pub fn build_print_document(options: &PdfOptions) -> String {
    let cleaned = sanitize::clean_content_for_pdf(&options.content, options.include_images);
    let css = match &options.custom_css {
        Some(custom) => format!("{CSS_PRINT}\n\n{custom}"),
        None => CSS_PRINT.to_string(),
    };
    html! {
        (DOCTYPE)
        html lang="pt" {
            head {
                meta charset="UTF-8";
                title { (options.title) }
                style { (PreEscaped(css)) }
            }
            body {
                (PreEscaped(cleaned))
            }
        }
    }
    .into_string()
}

/// Chrome header/footer templates require inline styles; external CSS does
/// not reach them.
fn header_template(title: &str) -> String {
    format!(
        r#"<div style="font-size:9px; width:100%; text-align:center; font-family:Georgia,serif; color:#555555;">{}</div>"#,
        crate::format::escape_html(title)
    )
}

fn footer_template() -> String {
    format!(
        r#"<div style="font-size:8px; width:100%; text-align:center; font-family:Georgia,serif; color:#555555;">{BRAND} — <span class="pageNumber"></span> / <span class="totalPages"></span></div>"#
    )
}

fn mm_to_inches(mm: f64) -> f64 {
    mm / 25.4
}
