//! Parameter types for image operations.
//!
//! These structs describe *what* to produce, not *how*. They sit between the
//! [`operations`](super::operations) module, which decides which derivative
//! to build, and the [`backend`](super::backend), which does the pixel work.
//! A mock backend can record them without decoding anything.

use std::path::PathBuf;

/// JPEG encoding quality (1-100). Clamped on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// A maximum bounding box in pixels. Not a crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub width: u32,
    pub height: u32,
}

/// Shrink `source` to fit inside `bounds`, re-encode as JPEG at `output`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub bounds: Bounds,
    pub quality: Quality,
}
