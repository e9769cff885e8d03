//! Content scanning and manifest generation.
//!
//! Stage 1 of the docsite build pipeline. Builds the navigation tree from
//! `navigation.toml`, then resolves every internal link in that tree to the
//! content that backs it.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                             # Content root
//! ├── config.toml                      # Site configuration (optional)
//! ├── navigation.toml                  # Navigation (optional, stock layout otherwise)
//! ├── assets/                          # Copied to the output root
//! ├── pages/
//! │   ├── index.md                     # Backs "/"
//! │   └── getting-started/
//! │       └── quick-start.md           # Backs "/getting-started/quick-start"
//! └── packages/
//!     └── button/
//!         ├── demos/                   # Backs "/packages/button/demos"
//!         │   └── 010-Text-Buttons.md
//!         ├── sassdoc.json             # Backs "/packages/button/sassdoc"
//!         ├── installation.md          # Optional override
//!         └── api.md                   # Backs "/packages/button/api"
//! ```
//!
//! ## Route classification
//!
//! - `<packages.route>/<name>/<section>` with a known section slug is a
//!   package page. Its package gets a [`PackageDocs`] entry.
//! - Anything else is a markdown page at `pages/<href>.md`. When that file
//!   does not exist the route still renders, as a placeholder.
//!
//! External links, groups, subheaders and dividers never produce pages.
//!
//! ## Orphans
//!
//! Markdown files under `pages/` and package directories under `packages/`
//! that no route reaches are reported as orphans. They are not errors.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::{self, SiteConfig};
use crate::demos::{self, DEMOS_DIR};
use crate::naming::to_title;
use crate::navigation::{self, NavigationError};
use crate::routes::{CollisionPolicy, PackageSection, RouteError, RouteTree};
use crate::sassdoc::{self, FsSassDocLoader, SassDocError, SassDocLoader};
use crate::types::{Manifest, PackageDocs, Page, PageKind};

pub const PAGES_DIR: &str = "pages";
pub const PACKAGES_DIR: &str = "packages";

const INSTALLATION_FILENAME: &str = "installation.md";
const API_FILENAME: &str = "api.md";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),
    #[error("Route error: {0}")]
    Route(#[from] RouteError),
    #[error("SassDoc error: {0}")]
    SassDoc(#[from] SassDocError),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Route {0} is not a plain path (empty, `.` or `..` segment)")]
    UnsafeHref(String),
    #[error("Routes {first} and {second} both render to {output}")]
    OutputCollision {
        output: String,
        first: String,
        second: String,
    },
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let loader = FsSassDocLoader::new(root.join(PACKAGES_DIR));
    scan_with_loader(root, &loader)
}

/// Scan with SassDoc documents supplied by `loader` instead of the
/// package directories.
pub fn scan_with_loader(root: &Path, loader: &dyn SassDocLoader) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;
    let routes = load_routes(root, &config)?;

    let mut pages: Vec<Page> = Vec::new();
    let mut outputs: HashMap<String, usize> = HashMap::new();
    let mut referenced: Vec<String> = Vec::new();

    for node in routes.internal_links() {
        let Some(href) = node.href() else { continue };
        check_href(href)?;
        let label = node.label().unwrap_or(href);

        let page = match classify_route(href, &config.packages.route) {
            Some((package, section)) => {
                if !referenced.contains(&package) {
                    referenced.push(package.clone());
                }
                Page {
                    href: href.to_string(),
                    title: label.to_string(),
                    kind: PageKind::Package { package, section },
                }
            }
            None => markdown_page(root, href, label)?,
        };

        // `/a` and `/a/` are distinct routes but share an output file.
        let output = page.output_file();
        match outputs.get(&output).copied() {
            Some(pos) => match config.routes.on_duplicate {
                CollisionPolicy::Reject => {
                    return Err(ScanError::OutputCollision {
                        output,
                        first: pages[pos].href.clone(),
                        second: page.href,
                    });
                }
                CollisionPolicy::Overwrite => pages[pos] = page,
            },
            None => {
                outputs.insert(output, pages.len());
                pages.push(page);
            }
        }
    }

    let packages = referenced
        .iter()
        .map(|name| load_package_docs(root, name, &routes, &config, loader))
        .collect::<Result<Vec<_>, _>>()?;

    let orphans = find_orphans(root, &pages, &referenced)?;

    Ok(Manifest {
        config,
        routes,
        pages,
        packages,
        orphans,
    })
}

/// Load config and navigation and build only the route tree.
pub fn scan_routes(root: &Path) -> Result<RouteTree, ScanError> {
    let config = config::load_config(root)?;
    load_routes(root, &config)
}

fn load_routes(root: &Path, config: &SiteConfig) -> Result<RouteTree, ScanError> {
    let navigation = navigation::load_navigation(root)?;
    Ok(navigation::build_route_tree(
        &navigation,
        config.routes.on_duplicate,
    )?)
}

/// Reject internal hrefs that could resolve outside the pages or output
/// directory.
///
/// An href is `/` or `/`-separated segments with an optional trailing `/`.
/// No segment may be empty, `.` or `..`, or contain a backslash.
pub fn check_href(href: &str) -> Result<(), ScanError> {
    let unsafe_href = || ScanError::UnsafeHref(href.to_string());
    let Some(rest) = href.strip_prefix('/') else {
        return Err(unsafe_href());
    };
    if rest.is_empty() {
        return Ok(());
    }
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    let plain = rest
        .split('/')
        .all(|seg| !seg.is_empty() && seg != "." && seg != ".." && !seg.contains('\\'));
    if plain { Ok(()) } else { Err(unsafe_href()) }
}

/// Split a package page href into package name and section.
///
/// `classify_route("/packages/button/demos", "/packages")` is
/// `Some(("button", Demos))`. Returns `None` for anything that is not exactly
/// three levels under the packages route with a known section slug.
pub fn classify_route(href: &str, packages_route: &str) -> Option<(String, PackageSection)> {
    let prefix = packages_route.trim_end_matches('/');
    let rest = href.strip_prefix(prefix)?.strip_prefix('/')?;
    let (name, section) = rest.split_once('/')?;
    if name.is_empty() || section.contains('/') {
        return None;
    }
    let section = PackageSection::from_slug(section)?;
    Some((name.to_string(), section))
}

/// Markdown source for an href, relative to the content root.
///
/// `/` → `pages/index.md`, `/a/b` → `pages/a/b.md`.
pub fn markdown_source(href: &str) -> String {
    let trimmed = href.trim_matches('/');
    if trimmed.is_empty() {
        format!("{PAGES_DIR}/index.md")
    } else {
        format!("{PAGES_DIR}/{trimmed}.md")
    }
}

fn markdown_page(root: &Path, href: &str, label: &str) -> Result<Page, ScanError> {
    let source = markdown_source(href);
    let path = root.join(&source);
    if !path.is_file() {
        return Ok(Page {
            href: href.to_string(),
            title: label.to_string(),
            kind: PageKind::Placeholder,
        });
    }

    let body = fs::read_to_string(&path)?;
    let title = body
        .lines()
        .find(|line| line.starts_with("# "))
        .map(|line| line.trim_start_matches("# ").trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| label.to_string());

    Ok(Page {
        href: href.to_string(),
        title,
        kind: PageKind::Markdown { source, body },
    })
}

fn load_package_docs(
    root: &Path,
    name: &str,
    routes: &RouteTree,
    config: &SiteConfig,
    loader: &dyn SassDocLoader,
) -> Result<PackageDocs, ScanError> {
    let dir = root.join(PACKAGES_DIR).join(name);
    let group_id = format!("{}/{}", config.packages.route.trim_end_matches('/'), name);
    let title = routes
        .get(&group_id)
        .and_then(|node| node.label())
        .map(str::to_string)
        .unwrap_or_else(|| to_title(name));

    Ok(PackageDocs {
        name: name.to_string(),
        title,
        demos: demos::load_demos(&dir)?,
        sassdoc: loader.load(name)?,
        installation: read_optional(&dir.join(INSTALLATION_FILENAME))?,
        api: read_optional(&dir.join(API_FILENAME))?,
    })
}

fn read_optional(path: &Path) -> Result<Option<String>, ScanError> {
    if path.is_file() {
        Ok(Some(fs::read_to_string(path)?))
    } else {
        Ok(None)
    }
}

fn find_orphans(
    root: &Path,
    pages: &[Page],
    referenced: &[String],
) -> Result<Vec<String>, ScanError> {
    let sources: HashSet<&str> = pages
        .iter()
        .filter_map(|p| match &p.kind {
            PageKind::Markdown { source, .. } => Some(source.as_str()),
            _ => None,
        })
        .collect();
    // Placeholders point at files that do not exist, so only real sources count.

    let mut orphans = Vec::new();

    let pages_dir = root.join(PAGES_DIR);
    if pages_dir.is_dir() {
        for entry in WalkDir::new(&pages_dir).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            let is_markdown = entry.file_type().is_file()
                && path
                    .extension()
                    .is_some_and(|e| e.eq_ignore_ascii_case("md"));
            if !is_markdown {
                continue;
            }
            let Ok(rel) = path.strip_prefix(root) else {
                continue;
            };
            let rel = relative_string(rel);
            if !sources.contains(rel.as_str()) {
                orphans.push(rel);
            }
        }
    }

    let packages_dir = root.join(PACKAGES_DIR);
    if packages_dir.is_dir() {
        let mut dirs: Vec<_> = fs::read_dir(&packages_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        dirs.sort();
        for dir in dirs {
            let name = dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let has_docs = dir.join(DEMOS_DIR).is_dir() || sassdoc::has_sassdoc(&dir);
            if has_docs && !referenced.contains(&name) {
                orphans.push(format!("{PACKAGES_DIR}/{name}/"));
            }
        }
    }

    Ok(orphans)
}

/// Path relative to the content root with `/` separators on every platform.
fn relative_string(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
