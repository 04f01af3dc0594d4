//! Identifier derivation shared by the catalog, the indices, and the planner.
//!
//! Two kinds of names leave the catalog and end up on disk:
//!
//! - **Keys**: the stable per-photo identifier, the image filename without its
//!   extension. `dawn-over-the-bay.jpg` becomes `dawn-over-the-bay`, which names
//!   both the photo page (`images/dawn-over-the-bay.html`) and nothing else.
//!   Derivatives keep the full source filename.
//! - **Slugs**: the filename-safe form of a category or tag label, used for
//!   `gallery-<slug>.html` and `tag-<slug>.html`.
//!
//! ## Slug rules
//!
//! Labels are lowercased. Whitespace and `-` become a dash, alphanumerics and
//! `_` are kept, and any other character is dropped. Runs of dashes collapse
//! to one and leading/trailing dashes are stripped:
//!
//! - `Landscapes` → `landscapes`
//! - `Black & White` → `black-white`
//! - `B&W` → `bw`
//! - `Street Photography` → `street-photography`
//!
//! Slugging is still lossy: `Film` and `film` share a slug, as do
//! `Black White` and `black-white`.
//! See [`taxonomy::slug_collisions`](crate::taxonomy::slug_collisions).

use std::path::Path;

/// Derive the photo key from a catalog filename.
///
/// Returns `None` for names without a usable stem (`""`, `".jpg"`).
pub fn derive_key(filename: &str) -> Option<String> {
    let stem = Path::new(filename.trim()).file_stem()?.to_str()?;
    if stem.is_empty() || stem.starts_with('.') {
        return None;
    }
    Some(stem.to_string())
}

/// Whether `filename` names an entry directly inside its directory.
///
/// `roll1/a.jpg`, `../a.jpg` and absolute paths are rejected.
pub fn is_plain_filename(filename: &str) -> bool {
    Path::new(filename).file_name().and_then(|n| n.to_str()) == Some(filename)
}

/// Turn a category or tag label into a filename-safe slug.
///
/// An empty result means the label cannot be used to name a page.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut prev_dash = true;
    for c in label.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() || c == '_' {
            slug.push(c);
            prev_dash = false;
        } else if (c == '-' || c.is_whitespace()) && !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_strips_extension() {
        assert_eq!(derive_key("dawn.jpg"), Some("dawn".to_string()));
        assert_eq!(derive_key("IMG_0042.JPEG"), Some("IMG_0042".to_string()));
    }

    #[test]
    fn key_keeps_inner_dots() {
        assert_eq!(derive_key("roll.12.frame.3.jpg"), Some("roll.12.frame.3".to_string()));
    }

    #[test]
    fn key_without_extension() {
        assert_eq!(derive_key("scan-001"), Some("scan-001".to_string()));
    }

    #[test]
    fn key_rejects_empty_and_hidden() {
        assert_eq!(derive_key(""), None);
        assert_eq!(derive_key("   "), None);
        assert_eq!(derive_key(".jpg"), None);
    }

    #[test]
    fn plain_filenames_accepted() {
        assert!(is_plain_filename("dawn.jpg"));
        assert!(is_plain_filename("roll.12.frame.3.jpg"));
    }

    #[test]
    fn filenames_with_directories_rejected() {
        for name in ["roll1/a.jpg", "../a.jpg", "/abs/a.jpg", "./a.jpg", "a.jpg/", "..", ""] {
            assert!(!is_plain_filename(name), "{name}");
        }
    }

    #[test]
    fn slug_lowercases_and_dashes_spaces() {
        assert_eq!(slugify("Landscapes"), "landscapes");
        assert_eq!(slugify("Street Photography"), "street-photography");
    }

    #[test]
    fn slug_collapses_punctuation() {
        assert_eq!(slugify("Black & White"), "black-white");
        assert_eq!(slugify("a---b"), "a-b");
        assert_eq!(slugify("  padded  "), "padded");
    }

    #[test]
    fn slug_keeps_existing_dashes_and_underscores() {
        assert_eq!(slugify("medium-format"), "medium-format");
        assert_eq!(slugify("tri_x"), "tri_x");
    }

    #[test]
    fn slug_keeps_unicode_letters() {
        assert_eq!(slugify("München"), "münchen");
        assert_eq!(slugify("Café Noir"), "café-noir");
    }

    #[test]
    fn slug_empty_for_symbol_only_labels() {
        assert_eq!(slugify("&&&"), "");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn slug_drops_other_punctuation() {
        assert_eq!(slugify("B&W"), "bw");
        assert_eq!(slugify("Rock'n'Roll"), "rocknroll");
        assert_eq!(slugify("f/2.8"), "f28");
    }

    #[test]
    fn slug_distinguishes_symbol_from_dash() {
        assert_ne!(slugify("B&W"), slugify("b-w"));
        assert_eq!(slugify("b-w"), "b-w");
    }

    #[test]
    fn slug_collides_on_case() {
        assert_eq!(slugify("Film"), slugify("film"));
        assert_eq!(slugify("Black White"), slugify("black-white"));
    }
}
