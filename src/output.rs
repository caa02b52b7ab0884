//! CLI output formatting.
//!
//! Each run prints a slide inventory followed by a one-line summary:
//!
//! ```text
//! 001 a.png  "Sunrise over the bay"
//! 002 b.png
//! 003 c.jpg  "Last light"
//!     embedded as data:image/.jpg (18.2 KiB)
//! Wrote 3 slides to out.html
//! ```
//!
//! `format_*` functions are pure and return lines for testability; the
//! `print_*` wrappers write them to stdout.

use crate::slideshow::Report;
use std::path::Path;

/// Format a 1-based position as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// `data:image/.png;base64,AAAA` → `data:image/.png`
fn data_uri_header(source: &str) -> Option<&str> {
    source
        .strip_prefix("data:")
        .and_then(|_| source.split_once(';'))
        .map(|(header, _)| header)
}

/// Human-readable size of a base64 payload's decoded bytes.
fn decoded_size(source: &str) -> String {
    let payload = source.split_once(',').map(|(_, p)| p).unwrap_or("");
    let padding = payload.chars().rev().take_while(|&c| c == '=').count();
    let bytes = (payload.len() / 4 * 3).saturating_sub(padding);
    if bytes < 1024 {
        format!("{bytes} B")
    } else {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    }
}

/// One header line per slide, plus an indented line for embedded images.
pub fn format_slides(report: &Report) -> Vec<String> {
    let mut lines = Vec::new();
    for (slide, image) in report.deck.slides.iter().zip(&report.images) {
        let mut header = format!("{} {}", format_index(slide.number), file_label(image));
        if !slide.caption.is_empty() {
            header.push_str(&format!("  {:?}", slide.caption));
        }
        lines.push(header);

        if let Some(media) = data_uri_header(&slide.source) {
            lines.push(format!(
                "    embedded as {} ({})",
                media,
                decoded_size(&slide.source)
            ));
        }
    }
    lines
}

/// Closing line: where the document went, or that nothing was written.
pub fn format_summary(report: &Report) -> String {
    let total = report.deck.total_slides();
    let noun = if total == 1 { "slide" } else { "slides" };
    match &report.written {
        Some(path) => format!("Wrote {} {} to {}", total, noun, path.display()),
        None => format!("Dry run: {} {}, nothing written", total, noun),
    }
}

pub fn format_report(report: &Report) -> Vec<String> {
    let mut lines = format_slides(report);
    lines.push(format_summary(report));
    lines
}

pub fn print_report(report: &Report) {
    for line in format_report(report) {
        println!("{}", line);
    }
}
