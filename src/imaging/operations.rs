//! High-level image operations.
//!
//! The five derivative tiers live here, along with the functions that turn a
//! source image plus a set of tiers into backend calls. Cache decisions are
//! made by the caller; everything passed in is encoded.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{Bounds, Quality, ResizeParams};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// A named maximum bounding box for derivative generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Thumb,
    Small,
    Medium,
    Large,
    Xlarge,
}

impl Tier {
    /// Every tier, smallest first. Also the processing order for one image.
    pub const ALL: [Tier; 5] = [
        Tier::Thumb,
        Tier::Small,
        Tier::Medium,
        Tier::Large,
        Tier::Xlarge,
    ];

    /// Directory name under the derivative root.
    pub fn name(self) -> &'static str {
        match self {
            Tier::Thumb => "thumb",
            Tier::Small => "small",
            Tier::Medium => "medium",
            Tier::Large => "large",
            Tier::Xlarge => "xlarge",
        }
    }

    pub fn bounds(self) -> Bounds {
        let (width, height) = match self {
            Tier::Thumb => (600, 1080),
            Tier::Small => (1200, 1080),
            Tier::Medium => (1800, 1600),
            Tier::Large => (2400, 1800),
            Tier::Xlarge => (3200, 2400),
        };
        Bounds { width, height }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `<root>/<tier>/<filename>`
pub fn derivative_path(root: &Path, tier: Tier, filename: &str) -> PathBuf {
    root.join(tier.name()).join(filename)
}

/// Resize parameters for each requested tier of one source.
pub fn plan_derivatives(
    source: &Path,
    root: &Path,
    filename: &str,
    tiers: &[Tier],
    quality: Quality,
) -> Vec<ResizeParams> {
    tiers
        .iter()
        .map(|&tier| ResizeParams {
            source: source.to_path_buf(),
            output: derivative_path(root, tier, filename),
            bounds: tier.bounds(),
            quality,
        })
        .collect()
}

/// Encode the requested tiers of one source.
///
/// Returns one result per tier, in the order given. The outer error means the
/// source could not be read and no tier was attempted.
pub fn create_derivatives(
    backend: &impl ImageBackend,
    source: &Path,
    root: &Path,
    filename: &str,
    tiers: &[Tier],
    quality: Quality,
) -> Result<Vec<(Tier, Result<Dimensions>)>> {
    let jobs = plan_derivatives(source, root, filename, tiers, quality);
    let results = backend.resize_batch(source, &jobs)?;
    Ok(tiers.iter().copied().zip(results).collect())
}
