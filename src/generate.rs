//! HTML site generation.
//!
//! Stage 2 of the docsite build pipeline. Takes the scan manifest and writes
//! the final static HTML site.
//!
//! ## Generated Pages
//!
//! One `index.html` per internal link in the route tree:
//!
//! - **Markdown pages**: `pages/*.md` converted to HTML
//! - **Placeholders**: routes whose markdown file does not exist yet
//! - **Installation**: override markdown, or a generated `npm install` snippet
//! - **Demos**: every example of the package, with a table of contents
//! - **API**: override markdown, or an empty-state message
//! - **SassDoc**: variables, functions and mixins with parameters and examples
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                       # "/"
//! ├── getting-started/
//! │   └── quick-start/index.html       # "/getting-started/quick-start"
//! ├── packages/
//! │   └── button/
//! │       ├── demos/index.html
//! │       └── sassdoc/index.html
//! ├── logo.svg                         # Copied from content/assets/
//! └── .docsite-cache.json
//! ```
//!
//! ## Layout
//!
//! Every page shares the same shell: an app bar with the site title, the
//! navigation tree in `nav#main-navigation`, and the page in
//! `main#main-content` under its breadcrumbs. Groups containing the current
//! page render open.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Pages render in parallel on the global rayon pool; writes go through the
//! [`BuildCache`] and happen on the calling thread.

use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Options, Parser, html as md_html};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;
use walkdir::WalkDir;

use crate::cache::{self, BuildCache, CacheStats};
use crate::config::{self, SiteConfig};
use crate::routes::{PackageSection, RouteKind, RouteNode, RouteTree};
use crate::sassdoc::SassDocItem;
use crate::types::{Manifest, PackageDocs, Page, PageKind};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Page {href} would be written outside the output directory")]
    OutsideOutput { href: String },
}

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Whether a page's file was rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteStatus {
    Written,
    Unchanged,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPage {
    pub href: String,
    pub title: String,
    /// Output file relative to the output directory.
    pub output: String,
    pub status: WriteStatus,
}

/// What a generate run did.
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub pages: Vec<GeneratedPage>,
    pub assets_copied: usize,
    /// Pages from the previous build whose routes are gone.
    pub removed: Vec<String>,
    pub cache_stats: CacheStats,
}

/// Read a manifest written by the scan stage.
pub fn load_manifest(path: &Path) -> Result<Manifest, GenerateError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn generate(
    manifest: &Manifest,
    output_dir: &Path,
    source_root: &Path,
    use_cache: bool,
) -> Result<GenerateReport, GenerateError> {
    let css = site_css(&manifest.config);
    fs::create_dir_all(output_dir)?;

    let assets_copied = copy_assets(&source_root.join(&manifest.config.assets_dir), output_dir)?;

    let site = Site {
        manifest,
        css: &css,
    };
    let rendered: Vec<(&Page, String)> = manifest
        .pages
        .par_iter()
        .map(|page| (page, render_page(&site, page).into_string()))
        .collect();

    let mut cache = if use_cache {
        BuildCache::load(output_dir)
    } else {
        BuildCache::empty()
    };
    let mut stats = CacheStats::default();
    let mut pages = Vec::with_capacity(rendered.len());
    let mut live = HashSet::new();

    for (page, html) in rendered {
        let output = page.output_file();
        if !is_contained(&output) {
            return Err(GenerateError::OutsideOutput {
                href: page.href.clone(),
            });
        }
        let hash = cache::hash_content(html.as_bytes());

        let status = if cache.is_fresh(&output, &hash, output_dir) {
            stats.skip();
            WriteStatus::Unchanged
        } else {
            let path = output_dir.join(&output);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &html)?;
            stats.write();
            WriteStatus::Written
        };

        cache.insert(output.clone(), hash);
        live.insert(output.clone());
        pages.push(GeneratedPage {
            href: page.href.clone(),
            title: page.title.clone(),
            output,
            status,
        });
    }

    let removed = cache.prune(&live);
    for stale in removed.iter().filter(|stale| is_contained(stale)) {
        let path = output_dir.join(stale);
        if path.is_file() {
            fs::remove_file(path)?;
        }
    }
    cache.save(output_dir)?;

    Ok(GenerateReport {
        pages,
        assets_copied,
        removed,
        cache_stats: stats,
    })
}

/// True when `rel` only descends into the directory it is joined onto.
fn is_contained(rel: &str) -> bool {
    let path = Path::new(rel);
    path.components().next().is_some()
        && path.components().all(|c| matches!(c, Component::Normal(_)))
}

/// Full stylesheet: color and theme custom properties, then the base styles.
pub fn site_css(config: &SiteConfig) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        config::generate_color_css(&config.colors),
        config::generate_theme_css(&config.theme),
        CSS_STATIC
    )
}

/// Copy the assets directory into the output root. Returns the number of
/// files copied; a missing directory copies nothing.
fn copy_assets(src: &Path, dst: &Path) -> Result<usize, GenerateError> {
    if !src.is_dir() {
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);
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

/// Shared, read-only state for rendering pages in parallel.
struct Site<'a> {
    manifest: &'a Manifest,
    css: &'a str,
}

// ============================================================================
// HTML Components
// ============================================================================

fn render_markdown(markdown: &str) -> Markup {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    PreEscaped(out)
}

fn base_document(title: &str, site_title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " | " (site_title) }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
            }
        }
    }
}

/// App bar, navigation, breadcrumbs and content.
fn layout(site: &Site, page: &Page, title: &str, content: Markup) -> Markup {
    let config = &site.manifest.config;
    let routes = &site.manifest.routes;

    let shell = html! {
        header.app-bar {
            a.app-bar__title href="/" { (config.title) }
        }
        div.layout {
            nav.layout__nav id="main-navigation" aria-label="Main navigation" {
                (render_navigation(routes, &page.href))
            }
            main.layout__main id="main-content" {
                (render_breadcrumbs(routes, &page.href, title))
                article.page {
                    (content)
                }
            }
        }
    };

    base_document(title, &config.title, site.css, shell)
}

/// Renders the navigation tree for a page at `current`.
///
/// Nodes are grouped under their parents in insertion order. Groups on the
/// path to the current page render open.
pub fn render_navigation(routes: &RouteTree, current: &str) -> Markup {
    let open: HashSet<&str> = routes
        .ancestors(current)
        .into_iter()
        .map(|n| n.item_id.as_str())
        .collect();

    html! {
        ul.nav-tree {
            (render_nav_level(routes, None, current, &open))
        }
    }
}

fn render_nav_level(
    routes: &RouteTree,
    parent: Option<&str>,
    current: &str,
    open: &HashSet<&str>,
) -> Markup {
    html! {
        @for node in routes.children_of(parent) {
            (render_nav_node(routes, node, current, open))
        }
    }
}

fn render_nav_node(
    routes: &RouteTree,
    node: &RouteNode,
    current: &str,
    open: &HashSet<&str>,
) -> Markup {
    match &node.kind {
        RouteKind::Link {
            children,
            href,
            left_icon,
            ..
        } => {
            let target = node.target();
            let is_current = href == current;
            // Subheaders and dividers may name a plain link as their parent.
            let has_children = !routes.children_of(Some(&node.item_id)).is_empty();
            html! {
                li.nav-item {
                    a.nav-link href=(href)
                        target=[target.map(|t| t.as_str())]
                        rel=[target.map(|_| "noopener noreferrer")]
                        aria-current=[is_current.then_some("page")] {
                        (nav_icon(left_icon.as_deref()))
                        span.nav-label { (children) }
                    }
                    @if has_children {
                        ul {
                            (render_nav_level(routes, Some(&node.item_id), current, open))
                        }
                    }
                }
            }
        }
        RouteKind::ExpandableGroup {
            children,
            left_icon,
        } => {
            let is_open = open.contains(node.item_id.as_str());
            html! {
                li.nav-item.nav-group {
                    details open[is_open] {
                        summary.nav-link {
                            (nav_icon(left_icon.as_deref()))
                            span.nav-label { (children) }
                        }
                        ul {
                            (render_nav_level(routes, Some(&node.item_id), current, open))
                        }
                    }
                }
            }
        }
        // Nodes nested under a subheader follow it at the same level.
        RouteKind::Subheader { children } => html! {
            li.nav-subheader role="presentation" { (children) }
            (render_nav_level(routes, Some(&node.item_id), current, open))
        },
        RouteKind::Divider => html! {
            li.nav-divider role="separator" {}
        },
    }
}

fn nav_icon(icon: Option<&str>) -> Markup {
    html! {
        @if let Some(name) = icon {
            span class={ "nav-icon icon--" (name) } data-icon=(name) aria-hidden="true" {}
        }
    }
}

fn render_breadcrumbs(routes: &RouteTree, href: &str, title: &str) -> Markup {
    html! {
        nav.breadcrumbs aria-label="Breadcrumb" {
            ol {
                @for node in routes.ancestors(href) {
                    li {
                        @let label = node.label().unwrap_or_default();
                        @if let Some(link) = node.href() {
                            a href=(link) { (label) }
                        } @else {
                            span { (label) }
                        }
                    }
                }
                li aria-current="page" { (title) }
            }
        }
    }
}

fn empty_state(message: &str) -> Markup {
    html! {
        p.empty-state { (message) }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_page(site: &Site, page: &Page) -> Markup {
    let (heading, body) = match &page.kind {
        PageKind::Markdown { body, .. } => {
            // Markdown with its own title heading renders it itself.
            let has_heading = body.lines().any(|line| line.starts_with("# "));
            let heading = (!has_heading).then(|| page.title.clone());
            (heading, render_markdown(body))
        }
        PageKind::Placeholder => (
            Some(page.title.clone()),
            empty_state("This page has not been written yet."),
        ),
        PageKind::Package { package, section } => {
            let docs = site.manifest.package(package);
            let package_title = docs.map(|d| d.title.as_str()).unwrap_or(package);
            let heading = format!("{} {}", package_title, section.label());
            let body = render_package_section(&site.manifest.config, package, docs, *section);
            (Some(heading), body)
        }
    };

    let title = heading.clone().unwrap_or_else(|| page.title.clone());
    let content = html! {
        @if let Some(heading) = &heading {
            h1.page-title { (heading) }
        }
        (body)
    };
    layout(site, page, &title, content)
}

fn render_package_section(
    config: &SiteConfig,
    package: &str,
    docs: Option<&PackageDocs>,
    section: PackageSection,
) -> Markup {
    match section {
        PackageSection::Installation => render_installation(config, package, docs),
        PackageSection::Demos => render_demos(docs),
        PackageSection::Api => match docs.and_then(|d| d.api.as_deref()) {
            Some(markdown) => render_markdown(markdown),
            None => empty_state("No API documentation available."),
        },
        PackageSection::SassDoc => render_sassdoc(docs),
    }
}

fn render_installation(config: &SiteConfig, package: &str, docs: Option<&PackageDocs>) -> Markup {
    if let Some(markdown) = docs.and_then(|d| d.installation.as_deref()) {
        return render_markdown(markdown);
    }
    let npm_name = config.packages.npm_name(package);
    html! {
        p { "Install the package with npm:" }
        pre.code-block {
            code.language-sh { "npm install --save " (npm_name) }
        }
        p { "or with yarn:" }
        pre.code-block {
            code.language-sh { "yarn add " (npm_name) }
        }
    }
}

fn render_demos(docs: Option<&PackageDocs>) -> Markup {
    let demos = docs.map(|d| d.demos.as_slice()).unwrap_or_default();
    if demos.is_empty() {
        return empty_state("No examples yet.");
    }
    html! {
        @if demos.len() > 1 {
            nav.demo-toc aria-label="Examples" {
                ul {
                    @for demo in demos {
                        li { a href={ "#" (demo.slug) } { (demo.title) } }
                    }
                }
            }
        }
        @for demo in demos {
            section.demo id=(demo.slug) {
                h2 { a href={ "#" (demo.slug) } { (demo.title) } }
                div.demo-body { (render_markdown(&demo.body)) }
            }
        }
    }
}

fn render_sassdoc(docs: Option<&PackageDocs>) -> Markup {
    let Some(doc) = docs
        .and_then(|d| d.sassdoc.as_ref())
        .filter(|doc| !doc.is_empty())
    else {
        return empty_state("No SassDoc available.");
    };

    html! {
        @for (heading, items) in doc.groups() {
            @if !items.is_empty() {
                section.sassdoc-group {
                    h2 { (heading) }
                    @for item in items.values() {
                        (render_sassdoc_item(item))
                    }
                }
            }
        }
    }
}

fn render_sassdoc_item(item: &SassDocItem) -> Markup {
    html! {
        article.sassdoc-item id=(item.name) {
            h3 { code { (item.name) } }
            @if let Some(description) = &item.description {
                (render_markdown(description))
            }
            @if item.type_.is_some() || item.value.is_some() {
                dl.sassdoc-meta {
                    @if let Some(type_) = &item.type_ {
                        dt { "Type" }
                        dd { code { (type_) } }
                    }
                    @if let Some(value) = &item.value {
                        dt { "Default" }
                        dd { code { (value) } }
                    }
                }
            }
            @if !item.parameters.is_empty() {
                h4 { "Parameters" }
                table.sassdoc-params {
                    thead {
                        tr { th { "Name" } th { "Type" } th { "Default" } th { "Description" } }
                    }
                    tbody {
                        @for param in &item.parameters {
                            tr {
                                td { code { (param.name) } }
                                td { (param.type_.as_deref().unwrap_or_default()) }
                                td {
                                    @if let Some(default) = &param.default {
                                        code { (default) }
                                    }
                                }
                                td { (param.description.as_deref().unwrap_or_default()) }
                            }
                        }
                    }
                }
            }
            @if let Some(returns) = &item.returns {
                h4 { "Returns" }
                p.sassdoc-returns {
                    @if let Some(type_) = &returns.type_ {
                        code { (type_) }
                    }
                    @if let Some(description) = &returns.description {
                        " " (description)
                    }
                }
            }
            @for example in &item.examples {
                figure.sassdoc-example {
                    @if let Some(description) = &example.description {
                        figcaption { (description) }
                    }
                    pre.code-block {
                        code class={ "language-" (example.language.as_deref().unwrap_or("scss")) } {
                            (example.code)
                        }
                    }
                    @if let Some(compiled) = &example.compiled {
                        pre.code-block {
                            code.language-css { (compiled) }
                        }
                    }
                }
            }
            @if let Some(code) = &item.code {
                details.sassdoc-source {
                    summary { "Source" }
                    pre.code-block { code.language-scss { (code) } }
                }
            }
            @if let Some(link) = &item.source_link {
                a.source-link href=(link) target="_blank" rel="noopener noreferrer" { "View source" }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
