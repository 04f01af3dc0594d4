//! HTML site generation.
//!
//! Renders every page from the [`SitePlan`](crate::plan::SitePlan) and writes
//! the site tree. Page layout comes from placeholder templates (see
//! [`template`](crate::template)); the repeated pieces inside them (navigation,
//! gallery items, tag lists, the photo itself) are built with maud.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                 # Title + first 6 photos
//! ├── gallery.html               # Every photo
//! ├── gallery-landscapes.html    # One per category
//! ├── tag-sunset.html            # One per tag
//! ├── images/
//! │   └── dawn.html              # One per photo, prev/next
//! ├── photos/                    # Derivatives, untouched here
//! ├── style.css
//! └── nav.js                     # Arrow-key navigation
//! ```
//!
//! Previously generated pages are removed before writing, so renamed or
//! deleted labels never leave orphans. The derivative tree is kept.
//!
//! ## Scope Variables
//!
//! Every page gets a fresh scope. Common to all pages:
//!
//! | Name | Kind | Value |
//! |---|---|---|
//! | `SITE_TITLE`, `PAGE_TITLE` | text | |
//! | `ROOT` | text | `.` or `..` |
//! | `NAV` | html | navigation menu |
//! | `BODY_CLASS` | text | `index`, `gallery` or `photo` |
//! | `PREV_URL`, `NEXT_URL` | text | neighbour pages, empty off photo pages |
//!
//! Index: `FEATURED`, `COUNT`. Galleries: `HEADING`, `KIND`, `COUNT`,
//! `GALLERY_ITEMS`. Photos: every record field upper-cased (`TITLE`, `YEAR`,
//! `DESCRIPTION`...), plus `KEY`, `POSITION`, `TOTAL`, `IMAGE`, `DETAILS`,
//! `TAG_LINKS`, `CATEGORY`, `CATEGORY_URL`, `PREV_LINK`, `NEXT_LINK`.

use crate::catalog::{Catalog, PhotoRecord};
use crate::config::SiteConfig;
use crate::derivatives::DERIVATIVE_DIR;
use crate::imaging::Tier;
use crate::naming::slugify;
use crate::plan::{self, NavEntry, PHOTO_DIR, Page, SitePlan};
use crate::taxonomy::{Indices, LabelKind, SlugCollision};
use crate::template::{Scope, Template};
use maud::{Markup, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot read template {}: {source}", path.display())]
    Template {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Asset copy failed: {0}")]
    Walk(#[from] walkdir::Error),
}

const BASE_TEMPLATE: &str = include_str!("../templates/base.html");
const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
const GALLERY_TEMPLATE: &str = include_str!("../templates/gallery.html");
const PHOTO_TEMPLATE: &str = include_str!("../templates/photo.html");

const CSS: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/nav.js");

/// The four page templates.
#[derive(Debug, Clone)]
pub struct Templates {
    pub base: Template,
    pub index: Template,
    pub gallery: Template,
    pub photo: Template,
}

impl Templates {
    /// The templates compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            base: Template::parse(BASE_TEMPLATE),
            index: Template::parse(INDEX_TEMPLATE),
            gallery: Template::parse(GALLERY_TEMPLATE),
            photo: Template::parse(PHOTO_TEMPLATE),
        }
    }

    /// Built-in templates, with any file present in `dir` taking precedence.
    ///
    /// Returns the templates and the names that were overridden.
    pub fn load(dir: &Path) -> Result<(Self, Vec<String>), GenerateError> {
        let mut templates = Self::builtin();
        let mut overridden = Vec::new();
        if !dir.is_dir() {
            return Ok((templates, overridden));
        }

        for (name, slot) in [
            ("base.html", &mut templates.base),
            ("index.html", &mut templates.index),
            ("gallery.html", &mut templates.gallery),
            ("photo.html", &mut templates.photo),
        ] {
            let path = dir.join(name);
            if path.is_file() {
                let source = fs::read_to_string(&path)
                    .map_err(|source| GenerateError::Template { path, source })?;
                *slot = Template::parse(&source);
                overridden.push(name.to_string());
            }
        }
        Ok((templates, overridden))
    }
}

/// A page that was written, with the title it was rendered under.
#[derive(Debug, Clone)]
pub struct WrittenPage {
    pub page: Page,
    pub title: String,
}

/// What the generator wrote.
#[derive(Debug, Default)]
pub struct SiteReport {
    pub pages: Vec<WrittenPage>,
    /// Template names replaced from the project's templates directory.
    pub template_overrides: Vec<String>,
    /// Files copied from the assets directory.
    pub assets_copied: usize,
    pub collisions: Vec<SlugCollision>,
}

impl SiteReport {
    pub fn photo_pages(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| matches!(p.page, Page::Photo { .. }))
            .count()
    }
}

/// Render and write the whole site into `output_dir`.
pub fn generate(
    catalog: &Catalog,
    indices: &Indices,
    config: &SiteConfig,
    source_dir: &Path,
    output_dir: &Path,
) -> Result<SiteReport, GenerateError> {
    let (templates, template_overrides) = Templates::load(&config.templates_dir(source_dir))?;
    let plan = plan::plan_site(catalog, indices);

    fs::create_dir_all(output_dir)?;
    clear_generated_pages(output_dir)?;
    fs::create_dir_all(output_dir.join(PHOTO_DIR))?;

    let mut pages = Vec::with_capacity(plan.pages.len());
    for page in &plan.pages {
        let (scope, title) = page_scope(page, &plan, catalog, config);
        let body = match page {
            Page::Index { .. } => &templates.index,
            Page::RootGallery { .. } | Page::LabelGallery { .. } => &templates.gallery,
            Page::Photo { .. } => &templates.photo,
        };
        let html = body.render_in(&templates.base, &scope);
        fs::write(output_dir.join(page.output_path()), html)?;
        pages.push(WrittenPage {
            page: page.clone(),
            title,
        });
    }

    fs::write(output_dir.join("style.css"), CSS)?;
    fs::write(output_dir.join("nav.js"), JS)?;
    let assets_copied = copy_assets(&config.assets_dir(source_dir), output_dir)?;

    Ok(SiteReport {
        pages,
        template_overrides,
        assets_copied,
        collisions: plan.collisions,
    })
}

/// Remove pages from a previous run. Leaves derivatives and assets alone.
fn clear_generated_pages(output_dir: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(output_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let path = entry.path();

        if path.is_dir() {
            if name == PHOTO_DIR {
                fs::remove_dir_all(&path)?;
            }
            continue;
        }
        let generated = name == plan::INDEX_PAGE
            || name == plan::ROOT_GALLERY
            || (name.ends_with(".html")
                && (name.starts_with("gallery-") || name.starts_with("tag-")));
        if generated {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Copy everything under `assets_dir` to the output root. Missing dir is fine.
fn copy_assets(assets_dir: &Path, output_dir: &Path) -> Result<usize, GenerateError> {
    if !assets_dir.is_dir() {
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(assets_dir).min_depth(1) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(assets_dir)
            .unwrap_or(entry.path());
        let target = output_dir.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

// ============================================================================
// Scopes
// ============================================================================

/// Build the scope for one page. Also returns the page title.
fn page_scope(
    page: &Page,
    plan: &SitePlan,
    catalog: &Catalog,
    config: &SiteConfig,
) -> (Scope, String) {
    let root = page.root();
    let current = page.current_nav();
    let mut scope = Scope::new();
    scope
        .text("SITE_TITLE", &config.site_title)
        .text("ROOT", root)
        .html("NAV", render_nav(&plan.nav, current.as_deref(), root).into_string())
        .text("PREV_URL", "")
        .text("NEXT_URL", "");

    let title = match page {
        Page::Index { featured } => {
            scope
                .text("BODY_CLASS", "index")
                .text("COUNT", catalog.len().to_string())
                .html("FEATURED", render_gallery_items(featured, catalog, root).into_string());
            "Home".to_string()
        }
        Page::RootGallery { members } => {
            gallery_scope(&mut scope, "", "All Photos", members, catalog, root);
            "All Photos".to_string()
        }
        Page::LabelGallery {
            kind,
            label,
            members,
            ..
        } => {
            let kind = match kind {
                LabelKind::Category => "Category",
                LabelKind::Tag => "Tag",
            };
            gallery_scope(&mut scope, kind, label, members, catalog, root);
            label.clone()
        }
        Page::Photo {
            key,
            position,
            prev,
            next,
        } => match catalog.get(key) {
            Some(record) => {
                photo_scope(&mut scope, record, *position, prev, next, catalog, root);
                record.title.clone()
            }
            None => key.clone(),
        },
    };

    scope.text("PAGE_TITLE", title.as_str());
    (scope, title)
}

fn gallery_scope(
    scope: &mut Scope,
    kind: &str,
    heading: &str,
    members: &[String],
    catalog: &Catalog,
    root: &str,
) {
    scope
        .text("BODY_CLASS", "gallery")
        .text("KIND", kind)
        .text("HEADING", heading)
        .text("COUNT", members.len().to_string())
        .html(
            "GALLERY_ITEMS",
            render_gallery_items(members, catalog, root).into_string(),
        );
}

fn photo_scope(
    scope: &mut Scope,
    record: &PhotoRecord,
    position: usize,
    prev: &Option<String>,
    next: &Option<String>,
    catalog: &Catalog,
    root: &str,
) {
    let (category, category_url) = match &record.category {
        Some(label) => (
            label.as_str(),
            format!("{root}/{}", LabelKind::Category.page_filename(&slugify(label))),
        ),
        None => ("All Photos", format!("{root}/{}", plan::ROOT_GALLERY)),
    };
    let page_url = |key: &Option<String>| {
        key.as_deref()
            .map(|k| format!("{root}/{}", plan::photo_page_path(k)))
            .unwrap_or_default()
    };

    scope
        .text("BODY_CLASS", "photo")
        .text("KEY", &record.key)
        .text("FILENAME", &record.filename)
        .text("TITLE", &record.title)
        .text("YEAR", &record.year)
        .text("LOCATION", &record.location)
        .text("CAMERA", &record.camera)
        .text("LENS", &record.lens)
        .text("FILM", &record.film)
        .text("DEVELOPER", &record.developer)
        .text("DESCRIPTION", &record.description)
        .text("TAGS", record.tags.join(" "))
        .text("POSITION", (position + 1).to_string())
        .text("TOTAL", catalog.len().to_string())
        .text("CATEGORY", category)
        .text("CATEGORY_URL", category_url)
        .text("PREV_URL", page_url(prev))
        .text("NEXT_URL", page_url(next))
        .html("IMAGE", render_photo_image(record, root).into_string())
        .html("DETAILS", render_details(record).into_string())
        .html("TAG_LINKS", render_tag_links(&record.tags, root).into_string())
        .html(
            "PREV_LINK",
            render_pager_link("prev", "\u{2190} Previous", prev, catalog, root).into_string(),
        )
        .html(
            "NEXT_LINK",
            render_pager_link("next", "Next \u{2192}", next, catalog, root).into_string(),
        );
}

// ============================================================================
// HTML Components
// ============================================================================

fn derivative_url(root: &str, tier: Tier, filename: &str) -> String {
    format!("{root}/{DERIVATIVE_DIR}/{}/{filename}", tier.name())
}

/// Navigation menu; `current` is the site-relative href to highlight.
pub fn render_nav(nav: &[NavEntry], current: Option<&str>, root: &str) -> Markup {
    html! {
        nav.site-nav {
            ul {
                @for entry in nav {
                    @let is_current = current == Some(entry.href.as_str());
                    li class=[is_current.then_some("current")] {
                        a href={ (root) "/" (entry.href) } { (entry.label) }
                    }
                }
            }
        }
    }
}

/// Thumbnail grid items for the given keys, in the order given.
pub fn render_gallery_items(keys: &[String], catalog: &Catalog, root: &str) -> Markup {
    html! {
        @for record in keys.iter().filter_map(|k| catalog.get(k)) {
            figure.gallery-item {
                a href={ (root) "/" (plan::photo_page_path(&record.key)) } {
                    img src=(derivative_url(root, Tier::Thumb, &record.filename))
                        alt=(record.title) loading="lazy";
                }
                figcaption { (record.title) }
            }
        }
    }
}

/// The photo at `medium`, with a srcset over every tier, linking to `xlarge`.
fn render_photo_image(record: &PhotoRecord, root: &str) -> Markup {
    let srcset = Tier::ALL
        .iter()
        .map(|&tier| {
            format!(
                "{} {}w",
                derivative_url(root, tier, &record.filename),
                tier.bounds().width
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    html! {
        figure.photo-frame {
            a href=(derivative_url(root, Tier::Xlarge, &record.filename)) {
                img src=(derivative_url(root, Tier::Medium, &record.filename))
                    srcset=(srcset)
                    sizes="(max-width: 1200px) 100vw, 1200px"
                    alt=(record.title);
            }
        }
    }
}

/// Definition list of the non-empty technical fields.
fn render_details(record: &PhotoRecord) -> Markup {
    let fields = [
        ("Year", &record.year),
        ("Location", &record.location),
        ("Camera", &record.camera),
        ("Lens", &record.lens),
        ("Film", &record.film),
        ("Developer", &record.developer),
    ];
    html! {
        dl.photo-details {
            @for (name, value) in fields.iter().filter(|(_, v)| !v.is_empty()) {
                dt { (name) }
                dd { (value) }
            }
        }
    }
}

fn render_tag_links(tags: &[String], root: &str) -> Markup {
    html! {
        @if !tags.is_empty() {
            ul.tag-list {
                @for tag in tags {
                    li {
                        a href={ (root) "/" (LabelKind::Tag.page_filename(&slugify(tag))) } { (tag) }
                    }
                }
            }
        }
    }
}

/// Link to a neighbouring photo, or an inert placeholder at either end.
fn render_pager_link(
    rel: &str,
    text: &str,
    target: &Option<String>,
    catalog: &Catalog,
    root: &str,
) -> Markup {
    match target.as_deref().and_then(|k| catalog.get(k)) {
        Some(record) => html! {
            a class=(rel) rel=(rel) href={ (root) "/" (plan::photo_page_path(&record.key)) }
                title=(record.title) { (text) }
        },
        None => html! {
            span class={ (rel) " disabled" } aria-disabled="true" { (text) }
        },
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::taxonomy::build_indices;
    use crate::test_helpers::{CatalogBuilder, record};
    use tempfile::TempDir;

    struct Site {
        _tmp: TempDir,
        source: PathBuf,
        output: PathBuf,
    }

    impl Site {
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            let source = tmp.path().join("project");
            let output = tmp.path().join("dist");
            fs::create_dir_all(&source).unwrap();
            Self {
                _tmp: tmp,
                source,
                output,
            }
        }

        fn build(&self, csv: &str) -> SiteReport {
            let catalog = catalog::parse(csv).unwrap();
            let indices = build_indices(&catalog);
            generate(
                &catalog,
                &indices,
                &SiteConfig::default(),
                &self.source,
                &self.output,
            )
            .unwrap()
        }

        fn read(&self, page: &str) -> String {
            fs::read_to_string(self.output.join(page))
                .unwrap_or_else(|e| panic!("reading {page}: {e}"))
        }
    }

    fn abc_csv() -> String {
        CatalogBuilder::new()
            .tagged("A.jpg", "Alpha", "sunset beach", "Landscapes")
            .tagged("B.jpg", "Bravo", "beach", "Landscapes")
            .tagged("C.jpg", "Charlie", "sunset", "")
            .build()
    }

    /// Photo page links found in a page, in document order.
    fn photo_links(html: &str) -> Vec<String> {
        html.match_indices("images/")
            .filter_map(|(i, _)| {
                let rest = &html[i + "images/".len()..];
                rest.find(".html\"").map(|end| rest[..end].to_string())
            })
            .collect()
    }

    // =========================================================================
    // Page set
    // =========================================================================

    #[test]
    fn writes_every_page() {
        let site = Site::new();
        let report = site.build(&abc_csv());

        for page in [
            "index.html",
            "gallery.html",
            "gallery-landscapes.html",
            "tag-sunset.html",
            "tag-beach.html",
            "images/A.html",
            "images/B.html",
            "images/C.html",
            "style.css",
            "nav.js",
        ] {
            assert!(site.output.join(page).is_file(), "missing {page}");
        }
        assert_eq!(report.pages.len(), 8);
        assert_eq!(report.photo_pages(), 3);
    }

    #[test]
    fn galleries_list_members_in_catalog_order() {
        let site = Site::new();
        site.build(&abc_csv());

        assert_eq!(photo_links(&site.read("gallery.html")), vec!["A", "B", "C"]);
        assert_eq!(photo_links(&site.read("gallery-landscapes.html")), vec!["A", "B"]);
        assert_eq!(photo_links(&site.read("tag-sunset.html")), vec!["A", "C"]);
        assert_eq!(photo_links(&site.read("tag-beach.html")), vec!["A", "B"]);
        assert_eq!(photo_links(&site.read("index.html")), vec!["A", "B", "C"]);
    }

    #[test]
    fn empty_catalog_renders_empty_pages() {
        let site = Site::new();
        let report = site.build(&CatalogBuilder::new().build());

        assert_eq!(report.pages.len(), 2);
        assert!(photo_links(&site.read("index.html")).is_empty());
        assert!(site.read("gallery.html").contains("0 photographs"));
    }

    // =========================================================================
    // Photo pages
    // =========================================================================

    #[test]
    fn photo_page_escapes_title() {
        let site = Site::new();
        site.build(
            &CatalogBuilder::new()
                .photo("obrien.jpg", "O'Brien & Sons <Test>")
                .build(),
        );
        let html = site.read("images/obrien.html");
        assert!(html.contains("<h1>O&#39;Brien &amp; Sons &lt;Test&gt;</h1>"));
        assert!(!html.contains("O'Brien & Sons <Test>"));
    }

    #[test]
    fn description_placeholders_are_literal() {
        let site = Site::new();
        let csv = CatalogBuilder::new()
            .row(&["a.jpg", "Real", "", "", "", "", "", "", "costs $TITLE", "", ""])
            .build();
        site.build(&csv);
        assert!(site.read("images/a.html").contains("costs $TITLE"));
    }

    #[test]
    fn photo_page_prev_next() {
        let site = Site::new();
        site.build(&abc_csv());

        let first = site.read("images/A.html");
        assert!(first.contains(r#"<span class="prev disabled" aria-disabled="true">"#));
        assert!(first.contains(r#"href="../images/B.html""#));
        assert!(first.contains(r#"data-prev="" data-next="../images/B.html""#));

        let middle = site.read("images/B.html");
        assert!(middle.contains(r#"data-prev="../images/A.html" data-next="../images/C.html""#));

        let last = site.read("images/C.html");
        assert!(last.contains(r#"<span class="next disabled" aria-disabled="true">"#));
    }

    #[test]
    fn photo_page_links_go_through_parent() {
        let site = Site::new();
        site.build(&abc_csv());
        let html = site.read("images/A.html");

        assert!(html.contains(r#"href="../style.css""#));
        assert!(html.contains(r#"src="../nav.js""#));
        assert!(html.contains(r#"href="../gallery.html""#));
        assert!(html.contains(r#"src="../photos/medium/A.jpg""#));
        assert!(html.contains(r#"href="../photos/xlarge/A.jpg""#));
        assert!(html.contains("../photos/thumb/A.jpg 600w"));
        assert!(html.contains("../photos/xlarge/A.jpg 3200w"));
    }

    #[test]
    fn photo_page_tag_and_category_links() {
        let site = Site::new();
        site.build(&abc_csv());

        let a = site.read("images/A.html");
        assert!(a.contains(r#"<a href="../tag-sunset.html">sunset</a>"#));
        assert!(a.contains(r#"<a href="../tag-beach.html">beach</a>"#));
        assert!(a.contains(r#"<a href="../gallery-landscapes.html">Landscapes</a>"#));

        // No category falls back to the root gallery
        let c = site.read("images/C.html");
        assert!(c.contains(r#"<a href="../gallery.html">All Photos</a>"#));
    }

    #[test]
    fn root_pages_link_from_dot() {
        let site = Site::new();
        site.build(&abc_csv());
        let html = site.read("gallery.html");
        assert!(html.contains(r#"href="./style.css""#));
        assert!(html.contains(r#"href="./images/A.html""#));
        assert!(html.contains(r#"src="./photos/thumb/A.jpg""#));
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    #[test]
    fn nav_marks_current_gallery() {
        let site = Site::new();
        site.build(&abc_csv());

        let html = site.read("gallery-landscapes.html");
        assert!(html.contains(
            r#"<li class="current"><a href="./gallery-landscapes.html">Landscapes</a></li>"#
        ));
        assert!(html.contains(r#"<li><a href="./gallery.html">All Photos</a></li>"#));
    }

    #[test]
    fn render_nav_in_order() {
        let nav = vec![
            NavEntry {
                label: "All Photos".into(),
                href: "gallery.html".into(),
            },
            NavEntry {
                label: "B&W".into(),
                href: "gallery-bw.html".into(),
            },
        ];
        let html = render_nav(&nav, None, "..").into_string();
        assert_eq!(
            html,
            r#"<nav class="site-nav"><ul><li><a href="../gallery.html">All Photos</a></li><li><a href="../gallery-bw.html">B&amp;W</a></li></ul></nav>"#
        );
    }

    #[test]
    fn gallery_items_skip_unknown_keys() {
        let catalog = Catalog::new(vec![record("a", "", "")]);
        let html =
            render_gallery_items(&["a".to_string(), "ghost".to_string()], &catalog, ".").into_string();
        assert_eq!(photo_links(&html), vec!["a"]);
    }

    #[test]
    fn details_skip_empty_fields() {
        let mut r = record("a", "", "");
        r.camera = "Mamiya 7".into();
        let html = render_details(&r).into_string();
        assert!(html.contains("<dt>Camera</dt><dd>Mamiya 7</dd>"));
        assert!(!html.contains("Lens"));
    }

    // =========================================================================
    // Rebuilds, overrides, assets
    // =========================================================================

    #[test]
    fn stale_pages_removed_and_derivatives_kept() {
        let site = Site::new();
        site.build(&abc_csv());
        let thumb = site.output.join("photos/thumb/A.jpg");
        fs::create_dir_all(thumb.parent().unwrap()).unwrap();
        fs::write(&thumb, b"jpeg").unwrap();

        site.build(
            &CatalogBuilder::new()
                .tagged("A.jpg", "Alpha", "dawn", "Street")
                .build(),
        );

        assert!(!site.output.join("gallery-landscapes.html").exists());
        assert!(!site.output.join("tag-sunset.html").exists());
        assert!(!site.output.join("images/B.html").exists());
        assert!(site.output.join("gallery-street.html").exists());
        assert!(site.output.join("tag-dawn.html").exists());
        assert!(thumb.exists());
    }

    #[test]
    fn template_override_replaces_builtin() {
        let site = Site::new();
        let templates = site.source.join("templates");
        fs::create_dir_all(&templates).unwrap();
        fs::write(templates.join("photo.html"), "<p class=\"custom\">$TITLE by $CAMERA</p>").unwrap();

        let report = site.build(&CatalogBuilder::new().photo("a.jpg", "A <b>").build());

        assert_eq!(report.template_overrides, vec!["photo.html"]);
        let html = site.read("images/a.html");
        assert!(html.contains("<p class=\"custom\">A &lt;b&gt; by </p>"));
        // base layout still built in
        assert!(html.contains("<!DOCTYPE html>"));
    }

    #[test]
    fn assets_copied_to_root() {
        let site = Site::new();
        let assets = site.source.join("assets");
        fs::create_dir_all(assets.join("fonts")).unwrap();
        fs::write(assets.join("favicon.ico"), b"ico").unwrap();
        fs::write(assets.join("fonts/serif.woff2"), b"font").unwrap();

        let report = site.build(&abc_csv());

        assert_eq!(report.assets_copied, 2);
        assert!(site.output.join("favicon.ico").is_file());
        assert!(site.output.join("fonts/serif.woff2").is_file());
    }

    #[test]
    fn collisions_reported() {
        let site = Site::new();
        let report = site.build(
            &CatalogBuilder::new()
                .tagged("a.jpg", "A", "", "Black White")
                .tagged("b.jpg", "B", "", "black-white")
                .build(),
        );
        assert_eq!(report.collisions.len(), 1);
        assert_eq!(photo_links(&site.read("gallery-black-white.html")), vec!["b"]);
    }
}
