//! Shared test utilities for the photoshelf test suite.
//!
//! Fixture builders for catalogs and records, plus small filesystem helpers.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let csv = CatalogBuilder::new()
//!     .photo("dawn.jpg", "Dawn")
//!     .tagged("dusk.jpg", "Dusk", "sunset beach", "Landscapes")
//!     .build();
//! ```

use crate::catalog::PhotoRecord;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// The catalog header line, without terminator.
pub const HEADER: &str =
    "filename,title,year,location,camera,lens,film,developer,description,tags,category";

// =========================================================================
// Catalog text
// =========================================================================

/// Builds catalog CSV text row by row. Always ends with a newline.
#[derive(Default)]
pub struct CatalogBuilder {
    rows: Vec<String>,
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A row with only filename and title.
    pub fn photo(self, filename: &str, title: &str) -> Self {
        self.tagged(filename, title, "", "")
    }

    /// A row with filename, title, tags, and category.
    pub fn tagged(self, filename: &str, title: &str, tags: &str, category: &str) -> Self {
        self.row(&[filename, title, "", "", "", "", "", "", "", tags, category])
    }

    /// A full row, one value per column.
    pub fn row(mut self, fields: &[&str; 11]) -> Self {
        let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
        self.rows.push(line.join(","));
        self
    }

    pub fn build(&self) -> String {
        let mut out = format!("{HEADER}\n");
        for row in &self.rows {
            out.push_str(row);
            out.push('\n');
        }
        out
    }
}

// =========================================================================
// Records
// =========================================================================

/// A record for `<key>.jpg` titled `key`, with space-separated `tags` and
/// an optional (empty = none) `category`.
pub fn record(key: &str, tags: &str, category: &str) -> PhotoRecord {
    PhotoRecord {
        key: key.to_string(),
        filename: format!("{key}.jpg"),
        title: key.to_string(),
        year: String::new(),
        location: String::new(),
        camera: String::new(),
        lens: String::new(),
        film: String::new(),
        developer: String::new(),
        description: String::new(),
        tags: crate::catalog::parse_tags(tags),
        category: Some(category.to_string()).filter(|c| !c.is_empty()),
    }
}

// =========================================================================
// Filesystem
// =========================================================================

/// Set a file's modification time.
pub fn set_mtime(path: &Path, time: SystemTime) {
    fs::File::options()
        .write(true)
        .open(path)
        .and_then(|f| f.set_modified(time))
        .unwrap_or_else(|e| panic!("set_mtime {}: {e}", path.display()));
}

/// Write a small gradient JPEG.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    img.save(path).unwrap();
}
