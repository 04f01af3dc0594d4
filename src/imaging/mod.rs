//! Image processing: pure Rust, no system tools.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Orientation** | EXIF orientation via `image` decoders |
//! | **Resize → JPEG** | Lanczos3 + `jpeg-encoder` (progressive, 4:2:0) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Derivative tiers and functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::fit_within;
pub use operations::{Tier, create_derivatives, derivative_path};
pub use params::{Bounds, Quality, ResizeParams};
pub use rust_backend::RustBackend;
