//! # Photoshelf
//!
//! A static site generator for a photo catalog kept as a CSV table. One row
//! per photograph; categories and tags become gallery pages, every photo gets
//! its own page linked to its neighbours, and each original is resized into
//! five JPEG tiers.
//!
//! # Architecture
//!
//! ```text
//! photos.csv ─┬─ catalog ── taxonomy ── plan ── generate ──→ dist/*.html
//!             │                                    │
//! originals/ ─┴────────── derivatives ─────────────┼──→ dist/photos/<tier>/
//!                            │                     │
//!                      imaging + cache        template
//! ```
//!
//! The catalog is loaded and validated in full before anything is written; a
//! single missing image or duplicate key stops the run with no output.
//! Everything after that is derived: the indices, the page plan and the
//! derivatives are rebuilt from the catalog every run.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Loads `photos.csv`, enforces the header, keys, titles and image presence |
//! | [`naming`] | Key derivation from filenames, and the slug function for labels |
//! | [`taxonomy`] | Category and tag indices, slug collision detection |
//! | [`imaging`] | Pure-Rust resize + progressive JPEG encode behind the `ImageBackend` trait |
//! | [`cache`] | Whether an existing derivative can be reused (mtime, content hash, or never) |
//! | [`derivatives`] | Five tiers for every photo, in parallel, with a per-unit report |
//! | [`template`] | `$NAME` placeholder templates with escape-on-expand scopes |
//! | [`plan`] | The page list: galleries, photo pages, prev/next, navigation order |
//! | [`generate`] | Renders the plan to HTML and writes the site |
//! | [`config`] | `config.toml` loading, merging onto defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Catalog Order Is Navigation Order
//!
//! Rows are never sorted. The gallery, every label page and the prev/next
//! chain all follow the CSV order, so reordering the site means reordering
//! the table. Only the navigation menu sorts its categories.
//!
//! ## Two Kinds of Scope Values
//!
//! Page templates are user-editable text, so the renderer cannot know which
//! placeholders sit in HTML. Every value is therefore tagged: free text is
//! escaped when expanded, markup built with Maud is inserted as-is. Expansion
//! is a single pass, so a description mentioning `$TITLE` stays literal.
//!
//! ## Pure-Rust Imaging
//!
//! The [`imaging`] module decodes with the `image` crate (Lanczos3 resampling)
//! and encodes progressive JPEG with `jpeg-encoder`. No ImageMagick, no system
//! libraries; the binary is self-contained.
//!
//! ## Derivative Failures Are Not Fatal
//!
//! An unreadable original or a failed encode is reported and the build goes
//! on; the page for that photo still renders. Catalog problems, by contrast,
//! abort before any output exists.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod derivatives;
pub mod generate;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod plan;
pub mod taxonomy;
pub mod template;

#[cfg(test)]
pub(crate) mod test_helpers;
