//! Image processing backend trait and shared types.
//!
//! [`ImageBackend`] is the image-resize primitive the derivative pipeline is
//! written against: identify a source, and resize-and-encode it into one
//! derivative. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend); tests use the recording
//! [`MockBackend`](tests::MockBackend).

use super::params::ResizeParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid source image: {0}")]
    InvalidSource(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Backends must be `Sync`: the pipeline shares one across rayon workers.
pub trait ImageBackend: Sync {
    /// Read image dimensions. Fails with [`BackendError::InvalidSource`] when
    /// the file is not a decodable image.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Orientation-correct, shrink to fit, and write a JPEG.
    ///
    /// Returns the dimensions actually written. On failure no file may be
    /// left at `params.output`.
    fn resize(&self, params: &ResizeParams) -> Result<Dimensions, BackendError>;

    /// Produce several derivatives of one source.
    ///
    /// The outer error means the source itself is unusable and nothing was
    /// written; inner errors are per job. The default identifies the source
    /// and then calls [`resize`](Self::resize) once per job. Backends that
    /// can share a single decode override it.
    fn resize_batch(
        &self,
        source: &Path,
        jobs: &[ResizeParams],
    ) -> Result<Vec<Result<Dimensions, BackendError>>, BackendError> {
        self.identify(source)?;
        Ok(jobs.iter().map(|job| self.resize(job)).collect())
    }
}
