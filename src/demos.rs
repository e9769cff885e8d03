//! Package example ("demo") pages.
//!
//! Each package keeps its examples as markdown files in a `demos/`
//! directory. The numeric prefix orders them; the rest of the filename is the
//! fallback title:
//!
//! ```text
//! content/packages/button/demos/
//! ├── 010-Text-Buttons.md
//! ├── 020-Icon-Buttons.md
//! └── playground.md            # Unnumbered: listed after numbered demos
//! ```
//!
//! A demo whose markdown starts with a `# heading` uses that heading as its
//! title. The heading is stripped from the body so it is not rendered twice.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::naming::parse_entry_name;

pub const DEMOS_DIR: &str = "demos";

/// A single example on a package's demos page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demo {
    pub title: String,
    /// Anchor id on the demos page.
    pub slug: String,
    /// Markdown body, without the title heading.
    pub body: String,
    /// Sort key from the number prefix; unnumbered demos sort last.
    pub sort_key: u32,
}

/// Load all demos for a package directory. A missing `demos/` directory
/// yields an empty list.
pub fn load_demos(package_dir: &Path) -> std::io::Result<Vec<Demo>> {
    let dir = package_dir.join(DEMOS_DIR);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut demos = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let path = entry?.path();
        let is_markdown = path.is_file()
            && path
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case("md"));
        if !is_markdown {
            continue;
        }
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let content = fs::read_to_string(&path)?;
        let demo = parse_demo(&stem, &content);
        demos.push((stem, demo));
    }

    demos.sort_by(|(_, a), (_, b)| (a.sort_key, &a.slug).cmp(&(b.sort_key, &b.slug)));
    Ok(unique_slugs(demos))
}

/// Demos sharing a name (`010-Intro`, `020-Intro`) keep their full
/// lowercased filename as the anchor. Anything still clashing gets a `-N`
/// suffix.
fn unique_slugs(demos: Vec<(String, Demo)>) -> Vec<Demo> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for (_, demo) in &demos {
        *counts.entry(demo.slug.clone()).or_default() += 1;
    }

    let mut taken = HashSet::new();
    demos
        .into_iter()
        .map(|(stem, mut demo)| {
            if counts[&demo.slug] > 1 {
                demo.slug = stem.to_lowercase();
            }
            let base = demo.slug.clone();
            let mut n = 2;
            while !taken.insert(demo.slug.clone()) {
                demo.slug = format!("{base}-{n}");
                n += 1;
            }
            demo
        })
        .collect()
}

/// Build a demo from its filename stem and markdown content.
pub fn parse_demo(stem: &str, content: &str) -> Demo {
    let parsed = parse_entry_name(stem);
    let slug = if parsed.name.is_empty() {
        stem.to_lowercase()
    } else {
        parsed.name.to_lowercase()
    };
    let fallback_title = if parsed.display_title.is_empty() {
        stem.to_string()
    } else {
        parsed.display_title
    };

    let (title, body) = split_title(content);
    Demo {
        title: title.unwrap_or(fallback_title),
        slug,
        body,
        sort_key: parsed.number.unwrap_or(u32::MAX),
    }
}

/// Split a leading `# heading` (after blank lines) off markdown content.
fn split_title(content: &str) -> (Option<String>, String) {
    let trimmed = content.trim_start();
    if let Some(rest) = trimmed.strip_prefix("# ") {
        let (heading, body) = rest.split_once('\n').unwrap_or((rest, ""));
        let heading = heading.trim();
        if !heading.is_empty() {
            return (Some(heading.to_string()), body.trim_start().to_string());
        }
    }
    (None, content.to_string())
}
