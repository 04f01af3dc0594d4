//! Page enumeration for the site.
//!
//! [`plan_site`] turns the catalog and its indices into the complete list of
//! pages to write, with everything each page needs except markup: its members
//! in catalog order, prev/next neighbours, and where it lives.
//!
//! ```text
//! index.html                   first 6 photos
//! gallery.html                 every photo
//! gallery-<slug>.html          one per category
//! tag-<slug>.html              one per tag
//! images/<key>.html            one per photo, with prev/next
//! ```
//!
//! Photo pages sit one directory down, so their links go through `..`;
//! everything else links from `.`. See [`Page::root`].

use crate::catalog::Catalog;
use crate::taxonomy::{Indices, LabelKind, SlugCollision};
use std::path::PathBuf;

/// Number of photos featured on the index page.
pub const FEATURED_COUNT: usize = 6;

/// Directory (relative to the site root) holding photo pages.
pub const PHOTO_DIR: &str = "images";

/// Root gallery filename; also the "All Photos" nav target.
pub const ROOT_GALLERY: &str = "gallery.html";

pub const INDEX_PAGE: &str = "index.html";

/// Site-relative path of a photo page.
pub fn photo_page_path(key: &str) -> String {
    format!("{PHOTO_DIR}/{key}.html")
}

/// One page of the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Index {
        featured: Vec<String>,
    },
    RootGallery {
        members: Vec<String>,
    },
    LabelGallery {
        kind: LabelKind,
        label: String,
        slug: String,
        members: Vec<String>,
    },
    Photo {
        key: String,
        /// 0-based catalog position.
        position: usize,
        prev: Option<String>,
        next: Option<String>,
    },
}

impl Page {
    /// Site-relative output path.
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(self.href())
    }

    /// Site-relative link to this page, always `/`-separated.
    pub fn href(&self) -> String {
        match self {
            Page::Index { .. } => INDEX_PAGE.to_string(),
            Page::RootGallery { .. } => ROOT_GALLERY.to_string(),
            Page::LabelGallery { kind, slug, .. } => kind.page_filename(slug),
            Page::Photo { key, .. } => photo_page_path(key),
        }
    }

    /// Relative path from this page back to the site root.
    pub fn root(&self) -> &'static str {
        match self {
            Page::Photo { .. } => "..",
            _ => ".",
        }
    }

    /// Photos listed on this page, in catalog order. Empty for photo pages.
    pub fn members(&self) -> &[String] {
        match self {
            Page::Index { featured } => featured,
            Page::RootGallery { members } | Page::LabelGallery { members, .. } => members,
            Page::Photo { .. } => &[],
        }
    }

    /// The navigation entry this page highlights, if any.
    pub fn current_nav(&self) -> Option<String> {
        match self {
            Page::RootGallery { .. }
            | Page::LabelGallery {
                kind: LabelKind::Category,
                ..
            } => Some(self.href()),
            _ => None,
        }
    }
}

/// One navigation menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub label: String,
    /// Site-relative target.
    pub href: String,
}

/// "All Photos" followed by every category, sorted by label.
///
/// Sorting applies to the menu only; gallery contents stay in catalog order.
pub fn navigation(indices: &Indices) -> Vec<NavEntry> {
    let mut nav = vec![NavEntry {
        label: "All Photos".to_string(),
        href: ROOT_GALLERY.to_string(),
    }];
    for label in indices.categories.sorted_labels() {
        if let Some(entry) = indices.categories.get(label) {
            nav.push(NavEntry {
                label: entry.label.clone(),
                href: LabelKind::Category.page_filename(&entry.slug),
            });
        }
    }
    nav
}

/// Everything the generator needs to write the site.
#[derive(Debug, Clone)]
pub struct SitePlan {
    /// In write order. Colliding label pages appear in first-appearance order,
    /// so the later label overwrites the earlier one.
    pub pages: Vec<Page>,
    pub nav: Vec<NavEntry>,
    pub collisions: Vec<SlugCollision>,
}

impl SitePlan {
    pub fn photo_pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter().filter(|p| matches!(p, Page::Photo { .. }))
    }

    pub fn find(&self, href: &str) -> Option<&Page> {
        self.pages.iter().rev().find(|p| p.href() == href)
    }
}

/// Enumerate every page of the site.
pub fn plan_site(catalog: &Catalog, indices: &Indices) -> SitePlan {
    let keys: Vec<String> = catalog.records().iter().map(|r| r.key.clone()).collect();
    let mut pages = Vec::with_capacity(keys.len() + indices.categories.len() + indices.tags.len() + 2);

    pages.push(Page::Index {
        featured: keys.iter().take(FEATURED_COUNT).cloned().collect(),
    });
    pages.push(Page::RootGallery {
        members: keys.clone(),
    });

    for index in [&indices.categories, &indices.tags] {
        for entry in index.entries() {
            pages.push(Page::LabelGallery {
                kind: index.kind,
                label: entry.label.clone(),
                slug: entry.slug.clone(),
                members: entry.members.clone(),
            });
        }
    }

    for (position, key) in keys.iter().enumerate() {
        pages.push(Page::Photo {
            key: key.clone(),
            position,
            prev: position.checked_sub(1).map(|i| keys[i].clone()),
            next: keys.get(position + 1).cloned(),
        });
    }

    SitePlan {
        pages,
        nav: navigation(indices),
        collisions: indices.collisions(),
    }
}
