//! Derivative cache validity for incremental builds.
//!
//! JPEG encoding is the bottleneck of a build: five tiers per photo, the
//! largest at 3200px. This module decides, per derivative, whether the file
//! already on disk can be kept.
//!
//! # Strategies
//!
//! The pipeline is written against [`CacheStrategy`] and never inspects files
//! itself. Three implementations ship:
//!
//! - [`MtimeStrategy`] (default): a derivative is valid when it exists and its
//!   modification time is not older than the source's. Touching a source
//!   forces all its tiers to re-encode; restoring an old source with its old
//!   timestamp can leave a stale derivative in place. That tradeoff is
//!   accepted.
//!
//! - [`ContentHashStrategy`]: a derivative is valid when it exists and the
//!   manifest records the same SHA-256 of the source file and of the encoding
//!   parameters (tier bounds, quality) it was written with. Survives
//!   `git checkout` and `touch`, and picks up quality changes.
//!
//! - [`RebuildAll`]: nothing is ever valid (`--no-cache`).
//!
//! ## Storage
//!
//! The content-hash manifest is a JSON file at
//! `<derivative root>/.cache-manifest.json`, keyed by the derivative's path
//! relative to that root. It lives alongside the derivatives so it travels
//! with the output directory when cached in CI.

use crate::config::CacheMode;
use crate::imaging::{Bounds, ResizeParams};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Name of the cache manifest file within the derivative root.
const MANIFEST_FILENAME: &str = ".cache-manifest.json";

/// Version of the cache manifest format. Bump this to invalidate all
/// existing caches when the format or key computation changes.
const MANIFEST_VERSION: u32 = 1;

/// Decides whether an existing derivative can be reused.
///
/// Shared across rayon workers, hence `Sync`.
pub trait CacheStrategy: Sync {
    /// Whether `job.output` is a valid rendition of `job.source` for
    /// `job`'s parameters.
    fn is_valid(&self, job: &ResizeParams) -> bool;

    /// Note that `job.output` was just written successfully.
    fn record(&self, _job: &ResizeParams) {}

    /// Flush any state to disk at the end of a run.
    fn persist(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Pick the strategy for a run. `enabled = false` means `--no-cache`.
pub fn select(mode: CacheMode, root: &Path, enabled: bool) -> Box<dyn CacheStrategy> {
    match (enabled, mode) {
        (false, _) => Box::new(RebuildAll),
        (true, CacheMode::Mtime) => Box::new(MtimeStrategy),
        (true, CacheMode::Content) => Box::new(ContentHashStrategy::load(root)),
    }
}

// ============================================================================
// Timestamps
// ============================================================================

/// Valid when the derivative exists and is at least as new as its source.
pub struct MtimeStrategy;

fn modified(path: &Path) -> Option<std::time::SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

impl CacheStrategy for MtimeStrategy {
    fn is_valid(&self, job: &ResizeParams) -> bool {
        match (modified(&job.source), modified(&job.output)) {
            (Some(source), Some(derivative)) => derivative >= source,
            _ => false,
        }
    }
}

// ============================================================================
// Rebuild
// ============================================================================

/// Never valid. Every derivative is re-encoded.
pub struct RebuildAll;

impl CacheStrategy for RebuildAll {
    fn is_valid(&self, _job: &ResizeParams) -> bool {
        false
    }
}

// ============================================================================
// Content hashes
// ============================================================================

/// A single cached output file.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct CacheEntry {
    pub source_hash: String,
    pub params_hash: String,
}

/// On-disk manifest mapping derivative paths to the inputs that produced them.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CacheManifest {
    pub version: u32,
    pub entries: HashMap<String, CacheEntry>,
}

impl CacheManifest {
    /// Create an empty manifest (used on first build).
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: HashMap::new(),
        }
    }

    /// Load from the derivative root. Returns an empty manifest if the
    /// file doesn't exist or can't be parsed (version mismatch, corruption).
    pub fn load(root: &Path) -> Self {
        let content = match fs::read_to_string(manifest_path(root)) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(m) if m.version == MANIFEST_VERSION => m,
            _ => Self::empty(),
        }
    }

    /// Save to the derivative root.
    pub fn save(&self, root: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(manifest_path(root), json)
    }

    /// Whether `output_path` was written from exactly these inputs.
    pub fn matches(&self, output_path: &str, source_hash: &str, params_hash: &str) -> bool {
        self.entries
            .get(output_path)
            .is_some_and(|e| e.source_hash == source_hash && e.params_hash == params_hash)
    }

    pub fn insert(&mut self, output_path: String, source_hash: String, params_hash: String) {
        self.entries.insert(
            output_path,
            CacheEntry {
                source_hash,
                params_hash,
            },
        );
    }
}

/// SHA-256 hash of a file's contents, returned as a hex string.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("{:x}", digest))
}

/// SHA-256 hash of the encoding parameters for one tier.
///
/// Inputs: bounding box and quality. If either changes, the previously
/// cached output is invalid.
pub fn hash_tier_params(bounds: Bounds, quality: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"jpeg\0");
    hasher.update(bounds.width.to_le_bytes());
    hasher.update(bounds.height.to_le_bytes());
    hasher.update(quality.to_le_bytes());
    format!("{:x}", hasher.finalize())
}

/// Valid when the manifest records the current source and parameter hashes.
///
/// Source hashes are computed once per file per run and shared by its tiers.
pub struct ContentHashStrategy {
    root: PathBuf,
    manifest: Mutex<CacheManifest>,
    source_hashes: Mutex<HashMap<PathBuf, String>>,
}

impl ContentHashStrategy {
    pub fn load(root: &Path) -> Self {
        Self::with_manifest(root, CacheManifest::load(root))
    }

    pub fn with_manifest(root: &Path, manifest: CacheManifest) -> Self {
        Self {
            root: root.to_path_buf(),
            manifest: Mutex::new(manifest),
            source_hashes: Mutex::new(HashMap::new()),
        }
    }

    fn source_hash(&self, source: &Path) -> Option<String> {
        if let Some(hash) = self.source_hashes.lock().ok()?.get(source) {
            return Some(hash.clone());
        }
        let hash = hash_file(source).ok()?;
        self.source_hashes
            .lock()
            .ok()?
            .insert(source.to_path_buf(), hash.clone());
        Some(hash)
    }

    /// Manifest key: the derivative path relative to the root, `/`-separated.
    fn entry_key(&self, output: &Path) -> String {
        let relative = output.strip_prefix(&self.root).unwrap_or(output);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn manifest(&self) -> CacheManifest {
        self.manifest
            .lock()
            .map(|m| m.clone())
            .unwrap_or_else(|_| CacheManifest::empty())
    }
}

impl CacheStrategy for ContentHashStrategy {
    fn is_valid(&self, job: &ResizeParams) -> bool {
        if !job.output.exists() {
            return false;
        }
        let Some(source_hash) = self.source_hash(&job.source) else {
            return false;
        };
        let params_hash = hash_tier_params(job.bounds, job.quality.value());
        let key = self.entry_key(&job.output);
        self.manifest
            .lock()
            .is_ok_and(|m| m.matches(&key, &source_hash, &params_hash))
    }

    fn record(&self, job: &ResizeParams) {
        let Some(source_hash) = self.source_hash(&job.source) else {
            return;
        };
        let params_hash = hash_tier_params(job.bounds, job.quality.value());
        let key = self.entry_key(&job.output);
        if let Ok(mut manifest) = self.manifest.lock() {
            manifest.insert(key, source_hash, params_hash);
        }
    }

    fn persist(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        self.manifest().save(&self.root)
    }
}

/// Resolve the cache manifest path for a derivative root.
pub fn manifest_path(root: &Path) -> PathBuf {
    root.join(MANIFEST_FILENAME)
}
