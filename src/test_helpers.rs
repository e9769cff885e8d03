//! Shared test utilities for the docsite test suite.
//!
//! Provides fixture setup, manifest lookups, and route tree shape assertions.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).unwrap();
//!
//! let page = find_page(&manifest, "/getting-started/quick-start");
//! assert_eq!(page.title, "Quick Start");
//!
//! assert_route_shape(&manifest.routes, &[
//!     ("/", &[]),
//!     ("/getting-started", &["/getting-started/quick-start"]),
//! ]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::routes::RouteTree;
use crate::types::{Manifest, PackageDocs, Page};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Manifest lookups (panic with a clear message on miss)
// =========================================================================

/// Find a page by href. Panics if not found.
pub fn find_page<'a>(manifest: &'a Manifest, href: &str) -> &'a Page {
    manifest
        .pages
        .iter()
        .find(|p| p.href == href)
        .unwrap_or_else(|| panic!("page '{href}' not found. Available: {:?}", page_hrefs(manifest)))
}

/// Find a package by name. Panics if not found.
pub fn find_package<'a>(manifest: &'a Manifest, name: &str) -> &'a PackageDocs {
    manifest.package(name).unwrap_or_else(|| {
        let names: Vec<&str> = manifest.packages.iter().map(|p| p.name.as_str()).collect();
        panic!("package '{name}' not found. Available: {names:?}")
    })
}

/// All page hrefs in manifest order.
pub fn page_hrefs(manifest: &Manifest) -> Vec<&str> {
    manifest.pages.iter().map(|p| p.href.as_str()).collect()
}

// =========================================================================
// Route tree assertions
// =========================================================================

/// Assert the root level of the tree and each root node's direct children,
/// by item id and in order.
///
/// ```rust
/// assert_route_shape(&tree, &[
///     ("/", &[]),
///     ("/packages", &["/packages/button"]),
///     ("divider-0", &[]),
/// ]);
/// ```
pub fn assert_route_shape(tree: &RouteTree, expected: &[(&str, &[&str])]) {
    let roots: Vec<&str> = tree
        .children_of(None)
        .iter()
        .map(|n| n.item_id.as_str())
        .collect();
    let expected_roots: Vec<&str> = expected.iter().map(|(id, _)| *id).collect();
    assert_eq!(roots, expected_roots, "root level mismatch");

    for (id, expected_children) in expected {
        let children: Vec<&str> = tree
            .children_of(Some(id))
            .iter()
            .map(|n| n.item_id.as_str())
            .collect();
        assert_eq!(
            children,
            expected_children.to_vec(),
            "children mismatch for '{id}'"
        );
    }
}
