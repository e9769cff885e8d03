//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (route, page, package) is its semantic identity: title
//! and positional index. Filesystem paths and hrefs follow as secondary
//! context, either after an arrow or on indented `Source:` lines.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Routes
//! 001 Home → /
//! 002 Getting Started
//!     001 Quick Start → /getting-started/quick-start
//! 003 ────
//! 004 [References]
//! 005 GitHub → https://github.com/mlaursen/react-md (external)
//!
//! Pages
//! 001 Welcome → /
//!     Source: pages/index.md
//! 002 Installation → /getting-started/installation
//!     Placeholder
//!
//! Packages
//! 001 Button (2 demos)
//!     Source: packages/button/
//!
//! Orphans
//!     pages/drafts/unused.md
//!
//! Config
//!     config.toml
//!     navigation.toml
//!     assets/
//! ```
//!
//! ## Generate
//!
//! ```text
//! 001 Welcome → index.html
//! 002 Quick Start → getting-started/quick-start/index.html (unchanged)
//!
//! Generated 2 pages (1 written, 1 unchanged), 1 asset
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O beyond checking which config files exist.

use std::path::Path;

use crate::generate::{GenerateReport, WriteStatus};
use crate::navigation::NAVIGATION_FILENAME;
use crate::routes::{RouteKind, RouteTree};
use crate::scan::PACKAGES_DIR;
use crate::types::{Manifest, PackageDocs, PageKind};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + title, with optional detail.
///
/// ```text
/// 001 Button (2 demos)
/// 002 Getting Started
/// ```
fn entity_header(index: usize, title: &str, detail: Option<&str>) -> String {
    match detail {
        Some(d) => format!("{} {} ({})", format_index(index), title, d),
        None => format!("{} {}", format_index(index), title),
    }
}

/// `1 demo`, `2 demos`.
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

// ============================================================================
// Tree walker
// ============================================================================

/// A flattened node from walking the route tree.
struct TreeLine {
    depth: usize,
    position: usize,
    text: String,
}

/// Walk the route tree depth-first, assigning positional indices per
/// sibling level.
fn walk_route_tree(routes: &RouteTree) -> Vec<TreeLine> {
    let mut lines = Vec::new();
    walk_route_level(routes, None, 0, &mut lines);
    lines
}

fn walk_route_level(
    routes: &RouteTree,
    parent: Option<&str>,
    depth: usize,
    lines: &mut Vec<TreeLine>,
) {
    for (i, node) in routes.children_of(parent).into_iter().enumerate() {
        let text = match &node.kind {
            RouteKind::Link { children, href, .. } if node.is_external() => {
                format!("{children} → {href} (external)")
            }
            RouteKind::Link { children, href, .. } => format!("{children} → {href}"),
            RouteKind::ExpandableGroup { children, .. } => children.clone(),
            RouteKind::Subheader { children } => format!("[{children}]"),
            RouteKind::Divider => "────".to_string(),
        };
        lines.push(TreeLine {
            depth,
            position: i + 1,
            text,
        });
        // Bounded for cyclic parent chains.
        if depth < routes.len() {
            walk_route_level(routes, Some(&node.item_id), depth + 1, lines);
        }
    }
}

// ============================================================================
// Routes
// ============================================================================

/// Format the route tree as an indented outline.
pub fn format_route_tree(routes: &RouteTree) -> Vec<String> {
    walk_route_tree(routes)
        .into_iter()
        .map(|line| {
            format!(
                "{}{} {}",
                indent(line.depth),
                format_index(line.position),
                line.text
            )
        })
        .collect()
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

fn package_detail(package: &PackageDocs) -> String {
    let mut parts = vec![plural(package.demos.len(), "demo")];
    if let Some(doc) = &package.sassdoc {
        parts.push(plural(doc.len(), "sassdoc item"));
    }
    parts.join(", ")
}

/// Format scan stage output showing the discovered site structure.
pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Routes".to_string());
    lines.extend(format_route_tree(&manifest.routes));

    if !manifest.pages.is_empty() {
        lines.push(String::new());
        lines.push("Pages".to_string());
        for (i, page) in manifest.pages.iter().enumerate() {
            lines.push(format!(
                "{} → {}",
                entity_header(i + 1, &page.title, None),
                page.href
            ));
            let context = match &page.kind {
                PageKind::Markdown { source, .. } => format!("Source: {source}"),
                PageKind::Placeholder => "Placeholder".to_string(),
                PageKind::Package { package, section } => {
                    format!("Package: {} ({})", package, section.slug())
                }
            };
            lines.push(format!("{}{}", indent(1), context));
        }
    }

    if !manifest.packages.is_empty() {
        lines.push(String::new());
        lines.push("Packages".to_string());
        for (i, package) in manifest.packages.iter().enumerate() {
            let detail = package_detail(package);
            lines.push(entity_header(i + 1, &package.title, Some(&detail)));
            lines.push(format!(
                "{}Source: {}/{}/",
                indent(1),
                PACKAGES_DIR,
                package.name
            ));
            if package.installation.is_some() {
                lines.push(format!("{}Installation: installation.md", indent(1)));
            }
            if package.api.is_some() {
                lines.push(format!("{}API: api.md", indent(1)));
            }
        }
    }

    if !manifest.orphans.is_empty() {
        lines.push(String::new());
        lines.push("Orphans".to_string());
        for orphan in &manifest.orphans {
            lines.push(format!("{}{}", indent(1), orphan));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push(format!("{}config.toml", indent(1)));
    }
    if source_root.join(NAVIGATION_FILENAME).exists() {
        lines.push(format!("{}{}", indent(1), NAVIGATION_FILENAME));
    } else {
        lines.push(format!("{}navigation: stock", indent(1)));
    }
    if source_root.join(&manifest.config.assets_dir).is_dir() {
        lines.push(format!("{}{}/", indent(1), manifest.config.assets_dir));
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Generate output
// ============================================================================

/// Format generate stage output: one line per page plus a summary.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, page) in report.pages.iter().enumerate() {
        let marker = match page.status {
            WriteStatus::Written => "",
            WriteStatus::Unchanged => " (unchanged)",
        };
        lines.push(format!(
            "{} → {}{}",
            entity_header(i + 1, &page.title, None),
            page.output,
            marker
        ));
    }

    if !report.removed.is_empty() {
        lines.push(String::new());
        lines.push("Removed".to_string());
        for path in &report.removed {
            lines.push(format!("{}{}", indent(1), path));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {} ({}), {}",
        plural(report.pages.len(), "page"),
        report.cache_stats,
        plural(report.assets_copied, "asset")
    ));

    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
