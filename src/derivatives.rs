//! Derivative generation for every photo in the catalog.
//!
//! For each record and each of the five [`Tier`]s, makes sure a valid JPEG
//! exists under the derivative root, asking a [`CacheStrategy`] before doing
//! any work.
//!
//! ## Output Structure
//!
//! ```text
//! dist/photos/
//! ├── .cache-manifest.json     # only with images.cache = "content"
//! ├── thumb/dawn.jpg           # 600x1080 box
//! ├── small/dawn.jpg           # 1200x1080
//! ├── medium/dawn.jpg          # 1800x1600
//! ├── large/dawn.jpg           # 2400x1800
//! └── xlarge/dawn.jpg          # 3200x2400
//! ```
//!
//! ## Failure Policy
//!
//! Nothing here aborts the run except failing to create the tier directories.
//! An unreadable source skips that photo (all tiers); a failed tier is
//! reported and its siblings still encode. Everything ends up in the
//! [`DerivativeReport`].
//!
//! ## Parallel Processing
//!
//! Photos are processed in parallel on the rayon global pool; the tiers of a
//! single photo run in sequence so the source is decoded once. Progress events
//! arrive in completion order, the report is always in catalog order.

use crate::cache::CacheStrategy;
use crate::catalog::{Catalog, PhotoRecord};
use crate::imaging::operations::plan_derivatives;
use crate::imaging::{ImageBackend, Quality, RustBackend, Tier, create_derivatives};
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Directory under the output root that holds the derivative tree.
pub const DERIVATIVE_DIR: &str = "photos";

pub fn derivative_root(output_dir: &Path) -> PathBuf {
    output_dir.join(DERIVATIVE_DIR)
}

/// Fatal pipeline errors.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Recoverable per-photo or per-tier failures, collected in the report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DerivativeError {
    #[error("{key}: invalid source image, skipped: {reason}")]
    InvalidSource { key: String, reason: String },
    #[error("{key} [{tier}]: encode failed: {reason}")]
    Encode {
        key: String,
        tier: Tier,
        reason: String,
    },
}

/// How one tier of one photo was satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantStatus {
    Cached,
    Encoded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantInfo {
    pub tier: Tier,
    pub status: VariantStatus,
}

/// Progress events sent from the workers while the pipeline runs.
#[derive(Debug, Clone)]
pub enum DerivativeEvent {
    Started {
        image_count: usize,
    },
    ImageProcessed {
        /// 1-based catalog position.
        index: usize,
        title: String,
        filename: String,
        variants: Vec<VariantInfo>,
    },
    ImageSkipped {
        index: usize,
        title: String,
        filename: String,
        reason: String,
    },
}

/// Result for one photo.
#[derive(Debug, Clone)]
pub struct ImageOutcome {
    pub key: String,
    /// `Err` carries the reason the source could not be read.
    pub variants: Result<Vec<VariantInfo>, String>,
}

/// End-of-run summary, in catalog order.
#[derive(Debug, Default)]
pub struct DerivativeReport {
    pub images: Vec<ImageOutcome>,
}

impl DerivativeReport {
    fn count(&self, pred: impl Fn(&VariantStatus) -> bool) -> usize {
        self.images
            .iter()
            .filter_map(|img| img.variants.as_ref().ok())
            .flatten()
            .filter(|v| pred(&v.status))
            .count()
    }

    pub fn encoded(&self) -> usize {
        self.count(|s| *s == VariantStatus::Encoded)
    }

    pub fn cached(&self) -> usize {
        self.count(|s| *s == VariantStatus::Cached)
    }

    /// Failed units: each failed tier, plus every tier of a skipped photo.
    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, VariantStatus::Failed(_))) + self.skipped() * Tier::ALL.len()
    }

    /// Photos whose source could not be read.
    pub fn skipped(&self) -> usize {
        self.images.iter().filter(|img| img.variants.is_err()).count()
    }

    pub fn total(&self) -> usize {
        self.images.len() * Tier::ALL.len()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Every failure, photo by photo.
    pub fn errors(&self) -> Vec<DerivativeError> {
        let mut errors = Vec::new();
        for img in &self.images {
            match &img.variants {
                Err(reason) => errors.push(DerivativeError::InvalidSource {
                    key: img.key.clone(),
                    reason: reason.clone(),
                }),
                Ok(variants) => {
                    for v in variants {
                        if let VariantStatus::Failed(reason) = &v.status {
                            errors.push(DerivativeError::Encode {
                                key: img.key.clone(),
                                tier: v.tier,
                                reason: reason.clone(),
                            });
                        }
                    }
                }
            }
        }
        errors
    }
}

impl fmt::Display for DerivativeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} encoded, {} cached, {} failed ({} total)",
            self.encoded(),
            self.cached(),
            self.failed(),
            self.total()
        )
    }
}

/// Generate derivatives with the pure Rust backend.
pub fn generate(
    catalog: &Catalog,
    originals: &Path,
    root: &Path,
    quality: Quality,
    cache: &dyn CacheStrategy,
    progress: Option<Sender<DerivativeEvent>>,
) -> Result<DerivativeReport, PipelineError> {
    let backend = RustBackend::new();
    generate_with_backend(&backend, catalog, originals, root, quality, cache, progress)
}

/// Generate derivatives using a specific backend (allows testing with mock).
pub fn generate_with_backend(
    backend: &impl ImageBackend,
    catalog: &Catalog,
    originals: &Path,
    root: &Path,
    quality: Quality,
    cache: &dyn CacheStrategy,
    progress: Option<Sender<DerivativeEvent>>,
) -> Result<DerivativeReport, PipelineError> {
    for tier in Tier::ALL {
        std::fs::create_dir_all(root.join(tier.name()))?;
    }

    if let Some(tx) = &progress {
        let _ = tx.send(DerivativeEvent::Started {
            image_count: catalog.len(),
        });
    }

    let images: Vec<ImageOutcome> = catalog
        .records()
        .par_iter()
        .enumerate()
        .map(|(i, record)| {
            let outcome = process_image(backend, record, originals, root, quality, cache);
            if let Some(tx) = &progress {
                let _ = tx.send(event_for(i + 1, record, &outcome));
            }
            outcome
        })
        .collect();

    cache.persist()?;
    Ok(DerivativeReport { images })
}

fn process_image(
    backend: &impl ImageBackend,
    record: &PhotoRecord,
    originals: &Path,
    root: &Path,
    quality: Quality,
    cache: &dyn CacheStrategy,
) -> ImageOutcome {
    let source = originals.join(&record.filename);
    let jobs = plan_derivatives(&source, root, &record.filename, &Tier::ALL, quality);

    let stale: Vec<Tier> = Tier::ALL
        .iter()
        .zip(&jobs)
        .filter(|(_, job)| !cache.is_valid(job))
        .map(|(tier, _)| *tier)
        .collect();

    let encoded = if stale.is_empty() {
        Vec::new()
    } else {
        match create_derivatives(backend, &source, root, &record.filename, &stale, quality) {
            Ok(results) => results,
            Err(e) => {
                return ImageOutcome {
                    key: record.key.clone(),
                    variants: Err(e.to_string()),
                };
            }
        }
    };

    let variants = Tier::ALL
        .iter()
        .zip(&jobs)
        .map(|(&tier, job)| {
            let status = match encoded.iter().find(|(t, _)| *t == tier) {
                None => VariantStatus::Cached,
                Some((_, Ok(_))) => {
                    cache.record(job);
                    VariantStatus::Encoded
                }
                Some((_, Err(e))) => VariantStatus::Failed(e.to_string()),
            };
            VariantInfo { tier, status }
        })
        .collect();

    ImageOutcome {
        key: record.key.clone(),
        variants: Ok(variants),
    }
}

fn event_for(index: usize, record: &PhotoRecord, outcome: &ImageOutcome) -> DerivativeEvent {
    match &outcome.variants {
        Ok(variants) => DerivativeEvent::ImageProcessed {
            index,
            title: record.title.clone(),
            filename: record.filename.clone(),
            variants: variants.clone(),
        },
        Err(reason) => DerivativeEvent::ImageSkipped {
            index,
            title: record.title.clone(),
            filename: record.filename.clone(),
            reason: reason.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{ContentHashStrategy, MtimeStrategy, RebuildAll};
    use crate::imaging::backend::tests::MockBackend;
    use crate::imaging::derivative_path;
    use crate::test_helpers::{record, set_mtime};
    use std::fs;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    struct Fixture {
        _tmp: TempDir,
        originals: PathBuf,
        root: PathBuf,
        catalog: Catalog,
    }

    /// Catalog of `keys`, each with a dummy source written an hour ago.
    fn fixture(keys: &[&str]) -> Fixture {
        let tmp = TempDir::new().unwrap();
        let originals = tmp.path().join("originals");
        let root = tmp.path().join("dist").join(DERIVATIVE_DIR);
        fs::create_dir_all(&originals).unwrap();

        let hour_ago = SystemTime::now() - Duration::from_secs(3600);
        let records = keys
            .iter()
            .map(|key| {
                let path = originals.join(format!("{key}.jpg"));
                fs::write(&path, key.as_bytes()).unwrap();
                set_mtime(&path, hour_ago);
                record(key, "", "")
            })
            .collect();

        Fixture {
            _tmp: tmp,
            originals,
            root,
            catalog: Catalog::new(records),
        }
    }

    fn run(fx: &Fixture, backend: &MockBackend, cache: &dyn CacheStrategy) -> DerivativeReport {
        generate_with_backend(
            backend,
            &fx.catalog,
            &fx.originals,
            &fx.root,
            Quality::default(),
            cache,
            None,
        )
        .unwrap()
    }

    #[test]
    fn first_run_encodes_every_tier() {
        let fx = fixture(&["a", "b"]);
        let backend = MockBackend::new();

        let report = run(&fx, &backend, &MtimeStrategy);

        assert_eq!(report.encoded(), 10);
        assert_eq!(report.cached(), 0);
        assert_eq!(backend.resize_count(), 10);
        for tier in Tier::ALL {
            assert!(derivative_path(&fx.root, tier, "a.jpg").exists());
            assert!(derivative_path(&fx.root, tier, "b.jpg").exists());
        }
    }

    #[test]
    fn second_run_is_all_cache_hits() {
        let fx = fixture(&["a", "b", "c"]);
        run(&fx, &MockBackend::new(), &MtimeStrategy);

        let backend = MockBackend::new();
        let report = run(&fx, &backend, &MtimeStrategy);

        assert_eq!(backend.resize_count(), 0);
        assert!(backend.get_operations().is_empty());
        assert_eq!(report.cached(), 15);
        assert_eq!(report.to_string(), "0 encoded, 15 cached, 0 failed (15 total)");
    }

    #[test]
    fn touching_source_reencodes_all_its_tiers() {
        let fx = fixture(&["a", "b"]);
        run(&fx, &MockBackend::new(), &MtimeStrategy);

        set_mtime(
            &fx.originals.join("b.jpg"),
            SystemTime::now() + Duration::from_secs(60),
        );
        let backend = MockBackend::new();
        let report = run(&fx, &backend, &MtimeStrategy);

        assert_eq!(backend.resize_count(), 5);
        assert_eq!(report.images[0].variants.as_ref().unwrap()[0].status, VariantStatus::Cached);
        assert!(
            report.images[1]
                .variants
                .as_ref()
                .unwrap()
                .iter()
                .all(|v| v.status == VariantStatus::Encoded)
        );
    }

    #[test]
    fn deleted_derivative_is_regenerated_alone() {
        let fx = fixture(&["a"]);
        run(&fx, &MockBackend::new(), &MtimeStrategy);
        fs::remove_file(derivative_path(&fx.root, Tier::Large, "a.jpg")).unwrap();

        let backend = MockBackend::new();
        let report = run(&fx, &backend, &MtimeStrategy);

        assert_eq!(backend.resize_count(), 1);
        assert_eq!(report.encoded(), 1);
        assert_eq!(report.cached(), 4);
    }

    #[test]
    fn invalid_source_skips_all_tiers_and_continues() {
        let fx = fixture(&["a", "broken", "c"]);
        let backend = MockBackend::new().fail_identify("broken.jpg");

        let report = run(&fx, &backend, &MtimeStrategy);

        assert_eq!(report.skipped(), 1);
        assert_eq!(report.encoded(), 10);
        assert_eq!(report.failed(), 5);
        for tier in Tier::ALL {
            assert!(!derivative_path(&fx.root, tier, "broken.jpg").exists());
        }
        let errors = report.errors();
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], DerivativeError::InvalidSource { key, .. } if key == "broken"));
    }

    #[test]
    fn tier_failure_is_reported_and_siblings_continue() {
        let fx = fixture(&["a"]);
        let backend = MockBackend::new().fail_resize("medium/a.jpg");

        let report = run(&fx, &backend, &MtimeStrategy);

        assert_eq!(report.encoded(), 4);
        assert_eq!(report.failed(), 1);
        assert_eq!(
            report.errors(),
            vec![DerivativeError::Encode {
                key: "a".into(),
                tier: Tier::Medium,
                reason: "Processing failed: mock encode failure".into(),
            }]
        );
        assert!(!derivative_path(&fx.root, Tier::Medium, "a.jpg").exists());
        assert!(derivative_path(&fx.root, Tier::Xlarge, "a.jpg").exists());
    }

    #[test]
    fn report_is_in_catalog_order() {
        let keys = ["z", "y", "x", "w", "v", "u", "t", "s"];
        let fx = fixture(&keys);
        let report = run(&fx, &MockBackend::new(), &MtimeStrategy);

        let order: Vec<&str> = report.images.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(order, keys);
    }

    #[test]
    fn rebuild_all_ignores_existing_derivatives() {
        let fx = fixture(&["a"]);
        run(&fx, &MockBackend::new(), &MtimeStrategy);

        let backend = MockBackend::new();
        run(&fx, &backend, &RebuildAll);
        assert_eq!(backend.resize_count(), 5);
    }

    #[test]
    fn content_strategy_skips_touched_sources() {
        let fx = fixture(&["a"]);
        run(&fx, &MockBackend::new(), &ContentHashStrategy::load(&fx.root));

        set_mtime(
            &fx.originals.join("a.jpg"),
            SystemTime::now() + Duration::from_secs(60),
        );
        let backend = MockBackend::new();
        run(&fx, &backend, &ContentHashStrategy::load(&fx.root));
        assert_eq!(backend.resize_count(), 0);
    }

    #[test]
    fn progress_events_cover_every_image() {
        let fx = fixture(&["a", "broken"]);
        let backend = MockBackend::new().fail_identify("broken.jpg");
        let (tx, rx) = std::sync::mpsc::channel();

        generate_with_backend(
            &backend,
            &fx.catalog,
            &fx.originals,
            &fx.root,
            Quality::default(),
            &MtimeStrategy,
            Some(tx),
        )
        .unwrap();

        let events: Vec<DerivativeEvent> = rx.iter().collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], DerivativeEvent::Started { image_count: 2 }));
        assert!(events.iter().any(|e| matches!(
            e,
            DerivativeEvent::ImageSkipped { index: 2, filename, .. } if filename == "broken.jpg"
        )));
        assert!(events.iter().any(|e| matches!(
            e,
            DerivativeEvent::ImageProcessed { index: 1, variants, .. } if variants.len() == 5
        )));
    }

    #[test]
    fn empty_catalog_creates_tier_dirs_only() {
        let fx = fixture(&[]);
        let report = run(&fx, &MockBackend::new(), &MtimeStrategy);
        assert_eq!(report.total(), 0);
        assert!(fx.root.join("xlarge").is_dir());
    }
}
