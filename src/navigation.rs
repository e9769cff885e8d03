//! Declarative navigation configuration (`navigation.toml`).
//!
//! The navigation file lists the entries of the site navigation in display
//! order. Each `[[nav]]` table is tagged by `type`:
//!
//! ```toml
//! [[nav]]
//! type = "route"
//! path = "/getting-started"
//! title = "Getting Started"
//! icon = "info-outline"
//! children = [
//!   { path = "/quick-start", title = "Quick Start" },
//! ]
//!
//! [[nav]]
//! type = "route"
//! path = "/packages"
//! title = "Packages"
//! packages = ["button", { name = "elevation", api = false }]
//!
//! [[nav]]
//! type = "divider"
//!
//! [[nav]]
//! type = "subheader"
//! id = "references"
//! title = "References"
//!
//! [[nav]]
//! type = "external"
//! href = "https://reactjs.org"
//! title = "React"
//! ```
//!
//! A route's child routes are its explicit `children` followed by one package
//! route per entry in `packages` (see [`package_route`]). Dividers are
//! numbered in file order, starting at zero.
//!
//! When the content root has no `navigation.toml`, the stock navigation from
//! [`stock_navigation_toml`] is used.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::routes::{
    ChildRouteConfig, CollisionPolicy, PackageRouteConfig, RouteError, RouteOptions, RouteTree,
    RouteTreeBuilder, package_route,
};

pub const NAVIGATION_FILENAME: &str = "navigation.toml";

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Navigation parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// The parsed navigation file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Navigation {
    #[serde(default)]
    pub nav: Vec<NavEntry>,
}

/// One top-level navigation entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum NavEntry {
    Route {
        path: String,
        title: String,
        #[serde(default)]
        icon: Option<String>,
        #[serde(default)]
        children: Vec<ChildEntry>,
        #[serde(default)]
        packages: Vec<PackageEntry>,
    },
    Divider {
        #[serde(default)]
        parent: Option<String>,
    },
    Subheader {
        id: String,
        title: String,
        #[serde(default)]
        parent: Option<String>,
    },
    External {
        href: String,
        title: String,
        #[serde(default)]
        icon: Option<String>,
    },
}

/// A nested route under a `route` entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChildEntry {
    pub path: String,
    pub title: String,
    #[serde(default)]
    pub children: Vec<ChildEntry>,
}

impl ChildEntry {
    fn to_route_config(&self) -> ChildRouteConfig {
        ChildRouteConfig::new(&self.path, &self.title)
            .with_child_routes(self.children.iter().map(Self::to_route_config).collect())
    }
}

/// A package under a `route` entry: either a bare name or a table choosing
/// which sections to include.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PackageEntry {
    Name(String),
    Detailed(PackageOptions),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageOptions {
    pub name: String,
    #[serde(default = "enabled")]
    pub install: bool,
    #[serde(default = "enabled")]
    pub demos: bool,
    #[serde(default = "enabled")]
    pub api: bool,
    #[serde(default = "enabled")]
    pub sassdoc: bool,
}

fn enabled() -> bool {
    true
}

impl PackageEntry {
    pub fn name(&self) -> &str {
        match self {
            PackageEntry::Name(name) => name,
            PackageEntry::Detailed(options) => &options.name,
        }
    }

    pub fn route_config(&self) -> PackageRouteConfig {
        match self {
            PackageEntry::Name(_) => PackageRouteConfig::default(),
            PackageEntry::Detailed(options) => PackageRouteConfig {
                install: options.install,
                api: options.api,
                demos: options.demos,
                sassdoc: options.sassdoc,
            },
        }
    }
}

/// Parse navigation from TOML source.
pub fn parse_navigation(source: &str) -> Result<Navigation, NavigationError> {
    Ok(toml::from_str(source)?)
}

/// Load `navigation.toml` from the content root, falling back to the stock
/// navigation when the file does not exist.
pub fn load_navigation(root: &Path) -> Result<Navigation, NavigationError> {
    let path = root.join(NAVIGATION_FILENAME);
    if !path.exists() {
        return parse_navigation(stock_navigation_toml());
    }
    let content = fs::read_to_string(&path)?;
    parse_navigation(&content)
}

/// Replay navigation entries into a [`RouteTreeBuilder`].
pub fn build_route_tree(
    navigation: &Navigation,
    policy: CollisionPolicy,
) -> Result<RouteTree, RouteError> {
    let mut builder = RouteTreeBuilder::new(policy);
    let mut divider_index = 0;

    for entry in &navigation.nav {
        match entry {
            NavEntry::Route {
                path,
                title,
                icon,
                children,
                packages,
            } => {
                let child_routes = children
                    .iter()
                    .map(ChildEntry::to_route_config)
                    .chain(
                        packages
                            .iter()
                            .map(|p| package_route(p.name(), p.route_config())),
                    )
                    .collect();
                let options = RouteOptions {
                    icon: icon.clone(),
                    child_routes,
                    parent_path: None,
                };
                builder.add_route(path, title, options)?;
            }
            NavEntry::Divider { parent } => {
                builder.add_divider(divider_index, parent.as_deref())?;
                divider_index += 1;
            }
            NavEntry::Subheader { id, title, parent } => {
                builder.add_subheader(id, title, parent.as_deref())?;
            }
            NavEntry::External { href, title, icon } => {
                builder.add_external_route(href, title, icon.as_deref())?;
            }
        }
    }

    builder.build()
}

/// The stock navigation: the react-md documentation layout.
///
/// Used when the content root has no `navigation.toml`, and printed by the
/// `gen-navigation` CLI command as a starting point.
pub fn stock_navigation_toml() -> &'static str {
    r##"# docsite Navigation
# ===================
# Entries appear in the navigation in the order listed here. Each [[nav]]
# table has a `type`:
#
#   route     - path, title, optional icon, children, packages
#   divider   - optional parent
#   subheader - id, title, optional parent
#   external  - href, title, optional icon (opens in a new tab)
#
# Paths are appended verbatim to their parent's path, so include the
# leading "/". A route with children or packages becomes an expandable
# group; a route without them is a link.
#
# Each package expands to up to four sections, in this order:
#   /installation, /demos, /api, /sassdoc
# Use a table to leave sections out: { name = "elevation", api = false }

[[nav]]
type = "route"
path = "/"
title = "Home"
icon = "home"

[[nav]]
type = "route"
path = "/getting-started"
title = "Getting Started"
icon = "info-outline"
children = [
  { path = "/quick-start", title = "Quick Start" },
  { path = "/installation", title = "Installation" },
  { path = "/updating-create-react-app", title = "Updating create-react-app" },
]

[[nav]]
type = "route"
path = "/customization"
title = "Customization"
icon = "color-lens"
children = [
  { path = "/overriding-defaults", title = "Overriding Defaults" },
  { path = "/creating-dynamic-themes", title = "Creating Dynamic Themes" },
]

[[nav]]
type = "route"
path = "/packages"
title = "Packages"
icon = "build"
packages = [
  "app-bar",
  "avatar",
  "button",
  "divider",
  { name = "elevation", api = false },
  "icon",
  "link",
  "list",
  "material-icons",
  "media",
  "portal",
  "sheet",
  "states",
  "theme",
  "transition",
  "tree",
  "typography",
  "utils",
  "wia-aria",
]

[[nav]]
type = "divider"

[[nav]]
type = "subheader"
id = "references"
title = "References"

[[nav]]
type = "external"
href = "https://reactjs.org"
title = "React"
icon = "react"

[[nav]]
type = "external"
href = "https://material.io/design"
title = "Material Design"
icon = "material-design"
"##
}
