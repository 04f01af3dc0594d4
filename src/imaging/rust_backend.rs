//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate decoders |
//! | Orientation | `ImageDecoder::orientation` + `DynamicImage::apply_orientation` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → JPEG | `jpeg-encoder` (progressive, 4:2:0) |
//!
//! Only pixels are written, so EXIF, ICC and every other metadata block from
//! the source is dropped. Output goes to a sibling `.tmp` file first and is
//! renamed into place, so a failed encode never leaves a partial derivative.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::fit_within;
use super::params::ResizeParams;
use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader};
use jpeg_encoder::{ColorType, Encoder, SamplingFactor};
use std::fs;
use std::path::{Path, PathBuf};

/// Pure Rust backend using the `image` and `jpeg-encoder` crates.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(path: &Path, e: impl std::fmt::Display) -> BackendError {
    BackendError::InvalidSource(format!("{}: {}", path.display(), e))
}

/// Decode an image and rotate/flip it upright per its EXIF orientation.
fn load_oriented(path: &Path) -> Result<DynamicImage, BackendError> {
    let reader = ImageReader::open(path)?
        .with_guessed_format()
        .map_err(BackendError::Io)?;
    let mut decoder = reader.into_decoder().map_err(|e| invalid(path, e))?;
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let mut img = DynamicImage::from_decoder(decoder).map_err(|e| invalid(path, e))?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// Encode as a progressive JPEG with 4:2:0 chroma subsampling.
fn encode_jpeg(img: &DynamicImage, quality: u32) -> Result<Vec<u8>, BackendError> {
    let rgb = img.to_rgb8();
    let (w, h) = rgb.dimensions();
    let too_large = || BackendError::ProcessingFailed(format!("{w}x{h} exceeds JPEG limits"));
    let width = u16::try_from(w).map_err(|_| too_large())?;
    let height = u16::try_from(h).map_err(|_| too_large())?;

    let mut bytes = Vec::new();
    let mut encoder = Encoder::new(&mut bytes, quality.clamp(1, 100) as u8);
    encoder.set_progressive(true);
    encoder.set_sampling_factor(SamplingFactor::R_4_2_0);
    encoder
        .encode(rgb.as_raw(), width, height, ColorType::Rgb)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {e}")))?;
    Ok(bytes)
}

fn temp_path(output: &Path) -> PathBuf {
    let mut name = output.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    output.with_file_name(name)
}

/// Write via a temp file + rename. Cleans up the temp file on failure.
fn write_atomically(output: &Path, bytes: &[u8]) -> Result<(), BackendError> {
    let tmp = temp_path(output);
    let result = fs::write(&tmp, bytes).and_then(|_| fs::rename(&tmp, output));
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(BackendError::Io(e));
    }
    Ok(())
}

/// Shrink an already-decoded image into one derivative.
fn resize_decoded(img: &DynamicImage, params: &ResizeParams) -> Result<Dimensions, BackendError> {
    let (width, height) = fit_within((img.width(), img.height()), params.bounds);
    let encoded = if (width, height) == (img.width(), img.height()) {
        encode_jpeg(img, params.quality.value())?
    } else {
        let resized = img.resize_exact(width, height, FilterType::Lanczos3);
        encode_jpeg(&resized, params.quality.value())?
    };
    write_atomically(&params.output, &encoded)?;
    Ok(Dimensions { width, height })
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| invalid(path, e))?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, params: &ResizeParams) -> Result<Dimensions, BackendError> {
        let img = load_oriented(&params.source)?;
        resize_decoded(&img, params)
    }

    /// Decodes the source once for all requested tiers.
    fn resize_batch(
        &self,
        source: &Path,
        jobs: &[ResizeParams],
    ) -> Result<Vec<Result<Dimensions, BackendError>>, BackendError> {
        let img = load_oriented(source)?;
        Ok(jobs.iter().map(|job| resize_decoded(&img, job)).collect())
    }
}
