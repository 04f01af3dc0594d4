//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Each photo is shown by its catalog position and title, with the source
//! filename as an indented `Source:` line. Labels are shown with their member
//! counts, pages with the path they were written to.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Catalog
//!     3 photos
//! Categories
//!     001 Landscapes (2 photos) → gallery-landscapes.html
//! Tags
//!     001 sunset (2 photos) → tag-sunset.html
//!     002 beach (2 photos) → tag-beach.html
//! ```
//!
//! ## Images
//!
//! ```text
//! Derivatives (3 photos)
//!     001 Dawn
//!         Source: dawn.jpg
//!         thumb: cached
//!         small: encoded
//!         large: failed: Encode failed: ...
//!     002 Dusk
//!         Source: dusk.jpg
//!         skipped: Invalid source image: ...
//! ```
//!
//! ## Pages
//!
//! ```text
//! Home → index.html
//! All Photos (3 photos) → gallery.html
//! Category Landscapes (2 photos) → gallery-landscapes.html
//! Tag sunset (2 photos) → tag-sunset.html
//!     001 Dawn → images/dawn.html
//!
//! Generated 6 pages: 4 galleries, 3 photo pages
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::catalog::Catalog;
use crate::derivatives::{DerivativeEvent, DerivativeReport, VariantStatus};
use crate::generate::SiteReport;
use crate::plan::Page;
use crate::taxonomy::{Indices, LabelIndex, LabelKind, SlugCollision};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn photos(n: usize) -> String {
    match n {
        1 => "1 photo".to_string(),
        n => format!("{n} photos"),
    }
}

/// Photo line: title, or the filename in parens when there is none.
///
/// ```text
/// 001 The Sunset
/// 001 (sunset.jpg)
/// ```
fn image_line(index: usize, title: &str, filename: &str) -> String {
    if title.is_empty() {
        format!("{} ({})", format_index(index), filename)
    } else {
        format!("{} {}", format_index(index), title)
    }
}

fn label_lines(index: &LabelIndex, lines: &mut Vec<String>) {
    for (i, entry) in index.entries().iter().enumerate() {
        lines.push(format!(
            "{}{} {} ({}) \u{2192} {}",
            indent(1),
            format_index(i + 1),
            entry.label,
            photos(entry.members.len()),
            index.kind.page_filename(&entry.slug)
        ));
    }
}

// ============================================================================
// Check
// ============================================================================

/// Catalog summary with every label and its page.
pub fn format_catalog_output(catalog: &Catalog, indices: &Indices) -> Vec<String> {
    let mut lines = vec!["Catalog".to_string()];
    lines.push(format!("{}{}", indent(1), photos(catalog.len())));

    if !indices.categories.is_empty() {
        lines.push("Categories".to_string());
        label_lines(&indices.categories, &mut lines);
    }
    if !indices.tags.is_empty() {
        lines.push("Tags".to_string());
        label_lines(&indices.tags, &mut lines);
    }
    lines
}

pub fn print_catalog_output(catalog: &Catalog, indices: &Indices) {
    for line in format_catalog_output(catalog, indices) {
        println!("{}", line);
    }
}

/// One warning per slug collision, naming the label whose page is kept.
pub fn format_warnings(collisions: &[SlugCollision]) -> Vec<String> {
    collisions
        .iter()
        .map(|c| {
            let labels: Vec<String> = c.labels.iter().map(|l| format!("\"{l}\"")).collect();
            format!(
                "warning: {} labels {} share {}; \"{}\" wins",
                c.kind,
                labels.join(", "),
                c.kind.page_filename(&c.slug),
                c.winner()
            )
        })
        .collect()
}

pub fn print_warnings(collisions: &[SlugCollision]) {
    for line in format_warnings(collisions) {
        eprintln!("{}", line);
    }
}

// ============================================================================
// Images
// ============================================================================

/// Format a single derivative progress event as display lines.
pub fn format_derivative_event(event: &DerivativeEvent) -> Vec<String> {
    match event {
        DerivativeEvent::Started { image_count } => {
            vec![format!("Derivatives ({})", photos(*image_count))]
        }
        DerivativeEvent::ImageProcessed {
            index,
            title,
            filename,
            variants,
        } => {
            let mut lines = vec![
                format!("{}{}", indent(1), image_line(*index, title, filename)),
                format!("{}Source: {}", indent(2), filename),
            ];
            for variant in variants {
                let status = match &variant.status {
                    VariantStatus::Cached => "cached".to_string(),
                    VariantStatus::Encoded => "encoded".to_string(),
                    VariantStatus::Failed(reason) => format!("failed: {reason}"),
                };
                lines.push(format!("{}{}: {}", indent(2), variant.tier, status));
            }
            lines
        }
        DerivativeEvent::ImageSkipped {
            index,
            title,
            filename,
            reason,
        } => vec![
            format!("{}{}", indent(1), image_line(*index, title, filename)),
            format!("{}Source: {}", indent(2), filename),
            format!("{}skipped: {}", indent(2), reason),
        ],
    }
}

/// End-of-run summary, followed by every failure when there were any.
pub fn format_derivative_report(report: &DerivativeReport) -> Vec<String> {
    let mut lines = vec![format!("Derivatives: {}", report)];
    let errors = report.errors();
    if !errors.is_empty() {
        lines.push("Failures".to_string());
        lines.extend(errors.iter().map(|e| format!("{}{}", indent(1), e)));
    }
    lines
}

pub fn print_derivative_report(report: &DerivativeReport) {
    for line in format_derivative_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Pages
// ============================================================================

/// Format the pages written by the generator.
pub fn format_site_output(report: &SiteReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut galleries = 0;
    let mut photo_pages = 0;

    for written in &report.pages {
        let path = written.page.href();
        let count = written.page.members().len();
        match &written.page {
            Page::Index { .. } => {
                lines.push(format!("Home \u{2192} {}", path));
            }
            Page::RootGallery { .. } => {
                galleries += 1;
                lines.push(format!("All Photos ({}) \u{2192} {}", photos(count), path));
            }
            Page::LabelGallery { kind, label, .. } => {
                galleries += 1;
                let kind = match kind {
                    LabelKind::Category => "Category",
                    LabelKind::Tag => "Tag",
                };
                lines.push(format!(
                    "{} {} ({}) \u{2192} {}",
                    kind,
                    label,
                    photos(count),
                    path
                ));
            }
            Page::Photo { position, .. } => {
                photo_pages += 1;
                lines.push(format!(
                    "{}{} {} \u{2192} {}",
                    indent(1),
                    format_index(position + 1),
                    written.title,
                    path
                ));
            }
        }
    }

    if !report.template_overrides.is_empty() {
        lines.push(format!(
            "Templates: {}",
            report.template_overrides.join(", ")
        ));
    }
    if report.assets_copied > 0 {
        lines.push(format!("Assets: {} files copied", report.assets_copied));
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {} pages: {} galleries, {} photo pages",
        report.pages.len(),
        galleries,
        photo_pages
    ));
    lines
}

pub fn print_site_output(report: &SiteReport) {
    for line in format_site_output(report) {
        println!("{}", line);
    }
}
