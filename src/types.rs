//! Shared types passed between pipeline stages.
//!
//! The scan stage serializes a [`Manifest`] to JSON; the generate stage reads
//! it back. Both sides use these definitions.

use serde::{Deserialize, Serialize};

use crate::config::SiteConfig;
use crate::demos::Demo;
use crate::routes::{PackageSection, RouteTree};
use crate::sassdoc::FlattenedSassDoc;

/// Everything the generate stage needs to render the site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub config: SiteConfig,
    /// The navigation tree, in insertion order.
    pub routes: RouteTree,
    /// One page per navigable internal link, in navigation order.
    pub pages: Vec<Page>,
    /// Documentation for every package a page refers to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub packages: Vec<PackageDocs>,
    /// Content files no route points at (relative to the content root).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub orphans: Vec<String>,
}

impl Manifest {
    pub fn package(&self, name: &str) -> Option<&PackageDocs> {
        self.packages.iter().find(|p| p.name == name)
    }
}

/// A page to render, keyed by the href of the link that leads to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub href: String,
    /// Page title: the markdown heading, or the navigation label.
    pub title: String,
    #[serde(flatten)]
    pub kind: PageKind,
}

impl Page {
    /// Output file for this page, relative to the output directory and
    /// `/` separated.
    ///
    /// `/` → `index.html`, `/a/b` → `a/b/index.html`.
    pub fn output_file(&self) -> String {
        let trimmed = self.href.trim_matches('/');
        if trimmed.is_empty() {
            "index.html".to_string()
        } else {
            format!("{trimmed}/index.html")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageKind {
    /// A markdown file under `pages/`.
    Markdown {
        /// Source path relative to the content root.
        source: String,
        body: String,
    },
    /// A route with no content file yet.
    Placeholder,
    /// One documentation section of a package.
    Package {
        package: String,
        section: PackageSection,
    },
}

/// Collected documentation for one package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDocs {
    pub name: String,
    /// Display title (`App Bar` for `app-bar`).
    pub title: String,
    #[serde(default)]
    pub demos: Vec<Demo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sassdoc: Option<FlattenedSassDoc>,
    /// Markdown replacing the generated installation instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation: Option<String>,
    /// Markdown for the API page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(href: &str) -> Page {
        Page {
            href: href.to_string(),
            title: "T".to_string(),
            kind: PageKind::Placeholder,
        }
    }

    #[test]
    fn root_page_writes_index() {
        assert_eq!(page("/").output_file(), "index.html");
    }

    #[test]
    fn nested_page_writes_directory_index() {
        assert_eq!(
            page("/packages/button/demos").output_file(),
            "packages/button/demos/index.html"
        );
    }

    #[test]
    fn page_kind_serializes_with_tag() {
        let p = Page {
            href: "/packages/theme/sassdoc".to_string(),
            title: "SassDoc".to_string(),
            kind: PageKind::Package {
                package: "theme".to_string(),
                section: PackageSection::SassDoc,
            },
        };
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["kind"], "package");
        assert_eq!(json["section"], "sass_doc");
        let back: Page = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }
}
