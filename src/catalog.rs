//! Catalog loading and validation.
//!
//! The catalog is a comma-separated table with a fixed header, one photo per
//! line, in the order the photos should be browsed:
//!
//! ```text
//! filename,title,year,location,camera,lens,film,developer,description,tags,category
//! dawn.jpg,Dawn,2023,Point Reyes,Mamiya 7,80mm,Portra 400,C-41,"Fog, then light",sunset beach,Landscapes
//! ```
//!
//! Source-file order is the navigation order (prev/next) and the default
//! listing order everywhere, so the loader never reorders records.
//!
//! ## Validation
//!
//! The first three checks stop reading at once:
//!
//! - Header must match [`COLUMNS`] exactly ([`LoadError::Schema`])
//! - The file must end with a line terminator ([`LoadError::Truncated`]);
//!   a line-oriented reader would otherwise silently lose the last record
//! - Every row must have exactly eleven fields ([`LoadError::MalformedRow`])
//!
//! Everything else is collected across the whole table, and every kind found
//! is reported in one run ([`LoadError::Multiple`] when there is more than one):
//!
//! - Filenames name a file directly in the image directory, with no path
//!   components ([`LoadError::NestedFilenames`])
//! - Keys are unique, titles non-empty, and labels must slug to something
//! - Every `filename` must exist in the image directory ([`LoadError::MissingImages`])
//!
//! Rows with an empty filename, or a repeated header row, are skipped.
//!
//! ## Quoting
//!
//! Fields only need quoting when they contain a comma. Inside a quoted field a
//! doubled quote (`""`) is a literal quote.

use crate::naming::{derive_key, is_plain_filename, slugify};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// The fixed column sequence every catalog header must match.
pub const COLUMNS: [&str; 11] = [
    "filename",
    "title",
    "year",
    "location",
    "camera",
    "lens",
    "film",
    "developer",
    "description",
    "tags",
    "category",
];

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Catalog header mismatch\n  expected: {expected}\n  found:    {found}")]
    Schema { expected: String, found: String },
    #[error("Catalog does not end with a newline; the last record may be truncated")]
    Truncated,
    #[error("Malformed row on line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },
    #[error("Duplicate photo keys: {}", .0.join(", "))]
    DuplicateKeys(Vec<String>),
    #[error("Rows without a title on lines: {}", join_numbers(.0))]
    MissingTitles(Vec<usize>),
    #[error("Labels that cannot be turned into a page name: {}", .0.join(", "))]
    UnusableLabels(Vec<String>),
    #[error("Filenames must not contain directories: {}", .0.join(", "))]
    NestedFilenames(Vec<String>),
    #[error("{} catalog entries reference missing images: {}", .0.len(), .0.join(", "))]
    MissingImages(Vec<String>),
    #[error("{} catalog problems:{}", .0.len(), list_errors(.0))]
    Multiple(Vec<LoadError>),
}

fn list_errors(errors: &[LoadError]) -> String {
    errors.iter().map(|e| format!("\n  - {e}")).collect()
}

fn join_numbers(numbers: &[usize]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One row of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoRecord {
    /// Filename stem; unique across the catalog.
    pub key: String,
    pub filename: String,
    pub title: String,
    /// Free-form, may be a range like `2023-2024`.
    pub year: String,
    pub location: String,
    pub camera: String,
    pub lens: String,
    pub film: String,
    pub developer: String,
    pub description: String,
    /// Distinct tags in order of first appearance.
    pub tags: Vec<String>,
    pub category: Option<String>,
}

/// Ordered, immutable collection of photo records.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    records: Vec<PhotoRecord>,
    #[serde(skip)]
    positions: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from records already in navigation order.
    ///
    /// Keys are assumed unique; [`parse`] enforces that for loaded catalogs.
    pub fn new(records: Vec<PhotoRecord>) -> Self {
        let mut positions = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            positions.entry(record.key.clone()).or_insert(i);
        }
        Self { records, positions }
    }

    pub fn records(&self) -> &[PhotoRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&PhotoRecord> {
        self.position(key).map(|i| &self.records[i])
    }

    /// Zero-based navigation position of a key.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.positions.get(key).copied()
    }
}

/// Read and validate the catalog, checking images against `image_dir`.
pub fn load(catalog_path: &Path, image_dir: &Path) -> Result<Catalog, LoadError> {
    let content = fs::read_to_string(catalog_path)?;
    let (records, mut problems) = read_records(&content)?;
    if let Some(missing) = missing_images(&records, image_dir) {
        problems.push(missing);
    }
    finish(records, problems)
}

/// Parse catalog text without touching the image store.
pub fn parse(content: &str) -> Result<Catalog, LoadError> {
    let (records, problems) = read_records(content)?;
    finish(records, problems)
}

/// The catalog, or every problem found while reading it.
fn finish(records: Vec<PhotoRecord>, mut problems: Vec<LoadError>) -> Result<Catalog, LoadError> {
    match problems.len() {
        0 => Ok(Catalog::new(records)),
        1 => Err(problems.remove(0)),
        _ => Err(LoadError::Multiple(problems)),
    }
}

/// Read every row. Structural errors return at once; the rest are collected.
fn read_records(content: &str) -> Result<(Vec<PhotoRecord>, Vec<LoadError>), LoadError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let expected = COLUMNS.join(",");
    let header = content.lines().next().unwrap_or("").trim_end_matches('\r');
    if header != expected {
        return Err(LoadError::Schema {
            expected,
            found: header.to_string(),
        });
    }
    if !content.ends_with('\n') {
        return Err(LoadError::Truncated);
    }

    let mut records = Vec::new();
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    let mut missing_titles = Vec::new();
    let mut unusable = Vec::new();
    let mut nested = Vec::new();

    for (idx, raw_line) in content.lines().enumerate().skip(1) {
        let line_no = idx + 1;
        let line = raw_line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let fields = parse_csv_line(line).ok_or_else(|| LoadError::MalformedRow {
            line: line_no,
            reason: "unterminated quoted field".to_string(),
        })?;
        if fields.len() != COLUMNS.len() {
            return Err(LoadError::MalformedRow {
                line: line_no,
                reason: format!("expected {} fields, found {}", COLUMNS.len(), fields.len()),
            });
        }

        let filename = fields[0].as_str();
        if filename == COLUMNS[0] {
            continue;
        }
        let Some(key) = derive_key(filename) else {
            continue;
        };

        if !is_plain_filename(filename) {
            nested.push(filename.to_string());
        }
        if fields[1].is_empty() {
            missing_titles.push(line_no);
        }

        let tags = parse_tags(&fields[9]);
        let category = Some(fields[10].clone()).filter(|c| !c.is_empty());
        for label in category.iter().chain(tags.iter()) {
            if slugify(label).is_empty() && !unusable.contains(label) {
                unusable.push(label.clone());
            }
        }

        if !seen.insert(key.clone()) {
            duplicates.push(key.clone());
        }

        let mut fields = fields.into_iter();
        let mut next = || fields.next().unwrap_or_default();
        records.push(PhotoRecord {
            key,
            filename: next(),
            title: next(),
            year: next(),
            location: next(),
            camera: next(),
            lens: next(),
            film: next(),
            developer: next(),
            description: next(),
            tags,
            category,
        });
    }

    let mut problems = Vec::new();
    if !nested.is_empty() {
        problems.push(LoadError::NestedFilenames(nested));
    }
    if !duplicates.is_empty() {
        problems.push(LoadError::DuplicateKeys(duplicates));
    }
    if !missing_titles.is_empty() {
        problems.push(LoadError::MissingTitles(missing_titles));
    }
    if !unusable.is_empty() {
        problems.push(LoadError::UnusableLabels(unusable));
    }
    Ok((records, problems))
}

/// Every filename absent from `image_dir`, as one error.
///
/// Filenames with directory components are already reported and are not
/// looked up.
fn missing_images(records: &[PhotoRecord], image_dir: &Path) -> Option<LoadError> {
    let missing: Vec<String> = records
        .iter()
        .filter(|r| is_plain_filename(&r.filename))
        .filter(|r| !image_dir.join(&r.filename).is_file())
        .map(|r| r.filename.clone())
        .collect();
    (!missing.is_empty()).then_some(LoadError::MissingImages(missing))
}

/// Split the tags field on whitespace, keeping the first of any repeats.
pub fn parse_tags(field: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for token in field.split_whitespace() {
        if !tags.iter().any(|t| t == token) {
            tags.push(token.to_string());
        }
    }
    tags
}

/// Split one CSV line into trimmed fields. `None` on an unterminated quote.
fn parse_csv_line(line: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut field).trim().to_string()),
            _ => field.push(c),
        }
    }
    if in_quotes {
        return None;
    }
    fields.push(field.trim().to_string());
    Some(fields)
}
