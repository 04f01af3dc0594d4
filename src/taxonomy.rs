//! Category and tag indices derived from the catalog.
//!
//! Both indices map a label to the keys of its member photos. They are pure
//! derivations, rebuilt on every run and never persisted:
//!
//! - Labels are kept in first-appearance order while scanning the catalog.
//! - Members are kept in catalog order. Nothing here sorts.
//!
//! Consumers that want alphabetical labels sort explicitly (the navigation
//! menu does, see [`LabelIndex::sorted_labels`]); gallery listings use member
//! order as-is.

use crate::catalog::Catalog;
use crate::naming::slugify;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Which index a label lives in. Decides the page filename prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelKind {
    Category,
    Tag,
}

impl LabelKind {
    /// Output filename for a label page with the given slug.
    pub fn page_filename(self, slug: &str) -> String {
        match self {
            LabelKind::Category => format!("gallery-{slug}.html"),
            LabelKind::Tag => format!("tag-{slug}.html"),
        }
    }
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelKind::Category => write!(f, "category"),
            LabelKind::Tag => write!(f, "tag"),
        }
    }
}

/// A label, its slug, and its members in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelEntry {
    pub label: String,
    pub slug: String,
    pub members: Vec<String>,
}

/// Label → ordered member keys.
#[derive(Debug, Clone, Serialize)]
pub struct LabelIndex {
    pub kind: LabelKind,
    entries: Vec<LabelEntry>,
    #[serde(skip)]
    lookup: HashMap<String, usize>,
}

impl LabelIndex {
    pub fn new(kind: LabelKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Append `key` to `label`'s members, creating the label on first use.
    pub fn push(&mut self, label: &str, key: &str) {
        let idx = match self.lookup.get(label) {
            Some(&idx) => idx,
            None => {
                self.entries.push(LabelEntry {
                    label: label.to_string(),
                    slug: slugify(label),
                    members: Vec::new(),
                });
                self.lookup.insert(label.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        self.entries[idx].members.push(key.to_string());
    }

    pub fn get(&self, label: &str) -> Option<&LabelEntry> {
        self.lookup.get(label).map(|&i| &self.entries[i])
    }

    /// Members of `label`, empty if the label is unknown.
    pub fn members(&self, label: &str) -> &[String] {
        self.get(label).map(|e| e.members.as_slice()).unwrap_or(&[])
    }

    /// Entries in first-appearance order.
    pub fn entries(&self) -> &[LabelEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels sorted alphabetically (case-insensitive, then exact).
    pub fn sorted_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.entries.iter().map(|e| e.label.as_str()).collect();
        labels.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then(a.cmp(b)));
        labels
    }
}

/// Both indices, built in one pass.
#[derive(Debug, Clone, Serialize)]
pub struct Indices {
    pub categories: LabelIndex,
    pub tags: LabelIndex,
}

/// Build the category and tag indices from the catalog.
pub fn build_indices(catalog: &Catalog) -> Indices {
    let mut categories = LabelIndex::new(LabelKind::Category);
    let mut tags = LabelIndex::new(LabelKind::Tag);

    for record in catalog.records() {
        if let Some(category) = &record.category {
            categories.push(category, &record.key);
        }
        for tag in &record.tags {
            tags.push(tag, &record.key);
        }
    }

    Indices { categories, tags }
}

/// Distinct labels of the same kind that map to one output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugCollision {
    pub kind: LabelKind,
    pub slug: String,
    /// Colliding labels in first-appearance order; the last one's page wins.
    pub labels: Vec<String>,
}

impl SlugCollision {
    /// The label whose page ends up on disk.
    pub fn winner(&self) -> &str {
        self.labels.last().map(String::as_str).unwrap_or_default()
    }
}

/// Find labels whose slugs collide, in order of each slug's first appearance.
pub fn slug_collisions(index: &LabelIndex) -> Vec<SlugCollision> {
    let mut by_slug: Vec<(&str, Vec<String>)> = Vec::new();
    for entry in index.entries() {
        match by_slug.iter_mut().find(|(slug, _)| *slug == entry.slug) {
            Some((_, labels)) => labels.push(entry.label.clone()),
            None => by_slug.push((&entry.slug, vec![entry.label.clone()])),
        }
    }
    by_slug
        .into_iter()
        .filter(|(_, labels)| labels.len() > 1)
        .map(|(slug, labels)| SlugCollision {
            kind: index.kind,
            slug: slug.to_string(),
            labels,
        })
        .collect()
}

impl Indices {
    /// Collisions across both indices, categories first.
    pub fn collisions(&self) -> Vec<SlugCollision> {
        let mut all = slug_collisions(&self.categories);
        all.extend(slug_collisions(&self.tags));
        all
    }
}
