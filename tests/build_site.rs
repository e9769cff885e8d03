//! End-to-end pipeline test: content directory → manifest → HTML site.
//!
//! Builds a small content tree from scratch, runs both stages through the
//! public API, and checks the written site.

use std::fs;
use std::path::Path;

use docsite::generate::{self, WriteStatus};
use docsite::routes::RouteKind;
use docsite::scan;
use tempfile::TempDir;

const NAVIGATION: &str = r#"
[[nav]]
type = "route"
path = "/"
title = "Home"
icon = "home"

[[nav]]
type = "route"
path = "/guides"
title = "Guides"
children = [
  { path = "/theming", title = "Theming", children = [{ path = "/colors", title = "Colors" }] },
]

[[nav]]
type = "route"
path = "/packages"
title = "Packages"
packages = [{ name = "card", sassdoc = false }]

[[nav]]
type = "divider"

[[nav]]
type = "subheader"
id = "more"
title = "More"

[[nav]]
type = "external"
href = "https://www.npmjs.com"
title = "npm"
"#;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn content_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(root, "config.toml", "title = \"Card Docs\"\n");
    write(root, "navigation.toml", NAVIGATION);
    write(root, "pages/index.md", "# Card Docs\n\nHello.\n");
    write(
        root,
        "pages/guides/theming/colors.md",
        "# Colors\n\n| Name | Value |\n|------|-------|\n| primary | teal |\n",
    );
    write(
        root,
        "packages/card/demos/001-Simple-Card.md",
        "# Simple Card\n\nA card with a title.\n",
    );
    write(root, "packages/card/api.md", "## Card\n\nProps go here.\n");
    write(root, "assets/fonts/icons.woff2", "not really a font");
    tmp
}

#[test]
fn full_pipeline_writes_site() {
    let content = content_tree();
    let out = TempDir::new().unwrap();

    let manifest = scan::scan(content.path()).unwrap();

    // Nested child routes become nested groups.
    let theming = manifest.routes.get("/guides/theming").unwrap();
    assert!(matches!(theming.kind, RouteKind::ExpandableGroup { .. }));
    assert_eq!(
        manifest.routes.get("/guides/theming/colors").unwrap().parent_id.as_deref(),
        Some("/guides/theming")
    );
    assert!(!manifest.routes.contains("/packages/card/sassdoc"));

    // Manifest survives the JSON hop between stages.
    let manifest_path = content.path().join("manifest.json");
    fs::write(&manifest_path, serde_json::to_string_pretty(&manifest).unwrap()).unwrap();
    let manifest = generate::load_manifest(&manifest_path).unwrap();

    let report = generate::generate(&manifest, out.path(), content.path(), true).unwrap();
    let outputs: Vec<&str> = report.pages.iter().map(|p| p.output.as_str()).collect();
    assert_eq!(
        outputs,
        vec![
            "index.html",
            "guides/theming/colors/index.html",
            "packages/card/installation/index.html",
            "packages/card/demos/index.html",
            "packages/card/api/index.html",
        ]
    );
    assert_eq!(report.assets_copied, 1);
    assert!(out.path().join("fonts/icons.woff2").is_file());

    let colors = fs::read_to_string(out.path().join("guides/theming/colors/index.html")).unwrap();
    assert!(colors.contains("<table>"));
    assert!(colors.contains("<title>Colors | Card Docs</title>"));
    assert!(colors.contains(r#"href="https://www.npmjs.com" target="_blank""#));

    let install =
        fs::read_to_string(out.path().join("packages/card/installation/index.html")).unwrap();
    assert!(install.contains("npm install --save @react-md/card"));

    let api = fs::read_to_string(out.path().join("packages/card/api/index.html")).unwrap();
    assert!(api.contains("Props go here."));
}

#[test]
fn rebuild_skips_unchanged_pages() {
    let content = content_tree();
    let out = TempDir::new().unwrap();

    let manifest = scan::scan(content.path()).unwrap();
    generate::generate(&manifest, out.path(), content.path(), true).unwrap();

    write(content.path(), "pages/index.md", "# Card Docs\n\nHello again.\n");
    let manifest = scan::scan(content.path()).unwrap();
    let report = generate::generate(&manifest, out.path(), content.path(), true).unwrap();

    let written: Vec<&str> = report
        .pages
        .iter()
        .filter(|p| p.status == WriteStatus::Written)
        .map(|p| p.href.as_str())
        .collect();
    assert_eq!(written, vec!["/"]);
    assert_eq!(report.cache_stats.unchanged, 4);
}

#[test]
fn duplicate_routes_fail_the_scan() {
    let content = content_tree();
    let nav = format!(
        "{NAVIGATION}\n[[nav]]\ntype = \"external\"\nhref = \"https://www.npmjs.com\"\ntitle = \"npm again\"\n"
    );
    write(content.path(), "navigation.toml", &nav);

    let err = scan::scan(content.path()).unwrap_err();
    assert!(err.to_string().contains("https://www.npmjs.com"));
}

#[test]
fn parent_dir_route_never_leaves_output() {
    let content = content_tree();
    let nav = format!(
        "{NAVIGATION}\n[[nav]]\ntype = \"route\"\npath = \"/../escaped\"\ntitle = \"Escaped\"\n"
    );
    write(content.path(), "navigation.toml", &nav);

    let err = scan::scan(content.path()).unwrap_err();
    assert!(matches!(err, scan::ScanError::UnsafeHref(ref h) if h == "/../escaped"));
}
