//! Route tree construction.
//!
//! The site navigation is a **flattened tree**: a flat, insertion-ordered
//! collection of [`RouteNode`]s keyed by a unique `item_id`, where hierarchy
//! is expressed through `parent_id` references instead of nested child lists.
//! The same structure serves two consumers:
//!
//! - the navigation renderer, which groups nodes by parent (see
//!   [`RouteTree::children_of`]) and relies on insertion order for display
//!   order;
//! - the page planner, which matches `href` values of navigable links to the
//!   pages that need rendering (see [`RouteTree::internal_links`]).
//!
//! ## Building
//!
//! [`RouteTreeBuilder`] turns declarative route configuration into the tree.
//! Paths are concatenated verbatim onto the accumulated parent path, so the
//! configuration must carry its own separators:
//!
//! ```text
//! /packages            (expandable group, it has children)
//! └── /packages/button (expandable group)
//!     ├── /packages/button/installation (link)
//!     └── /packages/button/demos        (link)
//! ```
//!
//! A route with child routes becomes an [`RouteKind::ExpandableGroup`] and
//! has no `href`; a route without children becomes a navigable
//! [`RouteKind::Link`].
//!
//! ## Key Collisions
//!
//! Two routes resolving to the same `item_id` are a configuration mistake.
//! [`CollisionPolicy::Reject`] (the default) turns them into
//! [`RouteError::DuplicateItem`]. [`CollisionPolicy::Overwrite`] keeps the
//! last node written, in the position of the first.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use thiserror::Error;

use crate::naming::to_title;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("Duplicate route item id: {0}")]
    DuplicateItem(String),
    #[error("Route {item_id} references missing parent {parent_id}")]
    MissingParent { item_id: String, parent_id: String },
}

/// What to do when a route resolves to an `item_id` already in the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Fail with [`RouteError::DuplicateItem`].
    #[default]
    Reject,
    /// Last write wins; the node keeps its original position.
    Overwrite,
}

/// Browsing context a link opens in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkTarget {
    /// A new tab or window.
    #[serde(rename = "_blank")]
    Blank,
}

impl LinkTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkTarget::Blank => "_blank",
        }
    }
}

/// The per-kind payload of a [`RouteNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteKind {
    /// A navigable entry.
    Link {
        children: String,
        href: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<LinkTarget>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        left_icon: Option<String>,
    },
    /// A node with children that is not itself navigable.
    ExpandableGroup {
        children: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        left_icon: Option<String>,
    },
    /// A section heading.
    Subheader { children: String },
    /// A visual separator.
    Divider,
}

/// One entry in the flattened navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteNode {
    pub item_id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(flatten)]
    pub kind: RouteKind,
}

impl RouteNode {
    /// Display label. Dividers have none.
    pub fn label(&self) -> Option<&str> {
        match &self.kind {
            RouteKind::Link { children, .. }
            | RouteKind::ExpandableGroup { children, .. }
            | RouteKind::Subheader { children } => Some(children),
            RouteKind::Divider => None,
        }
    }

    pub fn href(&self) -> Option<&str> {
        match &self.kind {
            RouteKind::Link { href, .. } => Some(href),
            _ => None,
        }
    }

    pub fn left_icon(&self) -> Option<&str> {
        match &self.kind {
            RouteKind::Link { left_icon, .. } | RouteKind::ExpandableGroup { left_icon, .. } => {
                left_icon.as_deref()
            }
            _ => None,
        }
    }

    pub fn target(&self) -> Option<LinkTarget> {
        match &self.kind {
            RouteKind::Link { target, .. } => *target,
            _ => None,
        }
    }

    /// True for links that open outside the site.
    pub fn is_external(&self) -> bool {
        self.target().is_some()
    }
}

/// The immutable, insertion-ordered flattened route tree.
///
/// Serializes as a JSON array in insertion order. Deserializing rejects
/// duplicate ids and dangling parent references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<RouteNode>")]
pub struct RouteTree {
    nodes: Vec<RouteNode>,
    index: HashMap<String, usize>,
}

impl RouteTree {
    pub fn get(&self, item_id: &str) -> Option<&RouteNode> {
        self.index.get(item_id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.index.contains_key(item_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteNode> {
        self.nodes.iter()
    }

    /// Direct children of `parent` (`None` for root level), in insertion order.
    pub fn children_of(&self, parent: Option<&str>) -> Vec<&RouteNode> {
        self.nodes
            .iter()
            .filter(|n| n.parent_id.as_deref() == parent)
            .collect()
    }

    /// Find the link whose `href` matches exactly.
    pub fn find_by_href(&self, href: &str) -> Option<&RouteNode> {
        self.nodes.iter().find(|n| n.href() == Some(href))
    }

    /// Ancestors of `item_id`, root first, excluding the node itself.
    ///
    /// Returns an empty list for unknown ids. The walk is bounded by the tree
    /// size so a malformed cycle cannot loop forever.
    pub fn ancestors(&self, item_id: &str) -> Vec<&RouteNode> {
        let mut chain = Vec::new();
        let mut current = self.get(item_id).and_then(|n| n.parent_id.as_deref());
        while let Some(parent_id) = current {
            let Some(parent) = self.get(parent_id) else {
                break;
            };
            if chain.len() >= self.nodes.len() {
                break;
            }
            chain.push(parent);
            current = parent.parent_id.as_deref();
        }
        chain.reverse();
        chain
    }

    /// Navigable links that stay on the site, in insertion order.
    pub fn internal_links(&self) -> impl Iterator<Item = &RouteNode> {
        self.nodes
            .iter()
            .filter(|n| n.href().is_some() && !n.is_external())
    }

    fn push(&mut self, node: RouteNode) {
        self.index.insert(node.item_id.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    fn check_parents(&self) -> Result<(), RouteError> {
        for node in &self.nodes {
            if let Some(parent_id) = &node.parent_id
                && !self.index.contains_key(parent_id)
            {
                return Err(RouteError::MissingParent {
                    item_id: node.item_id.clone(),
                    parent_id: parent_id.clone(),
                });
            }
        }
        Ok(())
    }
}

impl Serialize for RouteTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.nodes)
    }
}

impl TryFrom<Vec<RouteNode>> for RouteTree {
    type Error = RouteError;

    fn try_from(nodes: Vec<RouteNode>) -> Result<Self, Self::Error> {
        let mut tree = RouteTree::default();
        for node in nodes {
            if tree.contains(&node.item_id) {
                return Err(RouteError::DuplicateItem(node.item_id));
            }
            tree.push(node);
        }
        tree.check_parents()?;
        Ok(tree)
    }
}

/// A nested route, relative to the route that contains it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildRouteConfig {
    /// Path segment appended to the parent's full path (e.g. `"/button"`).
    pub path: String,
    /// Display label.
    pub children: String,
    pub child_routes: Vec<ChildRouteConfig>,
}

impl ChildRouteConfig {
    pub fn new(path: impl Into<String>, children: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            children: children.into(),
            child_routes: Vec::new(),
        }
    }

    pub fn with_child_routes(mut self, child_routes: Vec<ChildRouteConfig>) -> Self {
        self.child_routes = child_routes;
        self
    }
}

/// Options for [`RouteTreeBuilder::add_route`].
#[derive(Debug, Clone, Default)]
pub struct RouteOptions {
    pub icon: Option<String>,
    pub child_routes: Vec<ChildRouteConfig>,
    pub parent_path: Option<String>,
}

impl RouteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn child_routes(mut self, child_routes: Vec<ChildRouteConfig>) -> Self {
        self.child_routes = child_routes;
        self
    }

    pub fn parent_path(mut self, parent_path: impl Into<String>) -> Self {
        self.parent_path = Some(parent_path.into());
        self
    }
}

/// The fixed documentation sections every package can have, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageSection {
    Installation,
    Demos,
    Api,
    SassDoc,
}

impl PackageSection {
    pub const ALL: [PackageSection; 4] = [
        PackageSection::Installation,
        PackageSection::Demos,
        PackageSection::Api,
        PackageSection::SassDoc,
    ];

    /// Path segment without the leading slash.
    pub fn slug(&self) -> &'static str {
        match self {
            PackageSection::Installation => "installation",
            PackageSection::Demos => "demos",
            PackageSection::Api => "api",
            PackageSection::SassDoc => "sassdoc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PackageSection::Installation => "Installation",
            PackageSection::Demos => "Demos",
            PackageSection::Api => "API",
            PackageSection::SassDoc => "SassDoc",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.slug() == slug)
    }
}

/// Which sections a package route includes. Everything is on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageRouteConfig {
    pub install: bool,
    pub api: bool,
    pub demos: bool,
    pub sassdoc: bool,
}

impl Default for PackageRouteConfig {
    fn default() -> Self {
        Self {
            install: true,
            api: true,
            demos: true,
            sassdoc: true,
        }
    }
}

impl PackageRouteConfig {
    pub fn includes(&self, section: PackageSection) -> bool {
        match section {
            PackageSection::Installation => self.install,
            PackageSection::Demos => self.demos,
            PackageSection::Api => self.api,
            PackageSection::SassDoc => self.sassdoc,
        }
    }
}

/// Build the child route for a package: `/<name>` labelled with the
/// title-cased name, with one sub-route per enabled section in the order
/// installation, demos, api, sassdoc.
pub fn package_route(name: &str, config: PackageRouteConfig) -> ChildRouteConfig {
    let child_routes = PackageSection::ALL
        .into_iter()
        .filter(|section| config.includes(*section))
        .map(|section| ChildRouteConfig::new(format!("/{}", section.slug()), section.label()))
        .collect();

    ChildRouteConfig {
        path: format!("/{name}"),
        children: to_title(name),
        child_routes,
    }
}

/// Accumulates route nodes and produces a [`RouteTree`].
#[derive(Debug, Default)]
pub struct RouteTreeBuilder {
    tree: RouteTree,
    policy: CollisionPolicy,
}

impl RouteTreeBuilder {
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            tree: RouteTree::default(),
            policy,
        }
    }

    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Add a route keyed by `parent_path + path`, then its child routes
    /// beneath it.
    ///
    /// The node is a link to its own full path when it has no child routes,
    /// and an expandable group otherwise. Child routes do not inherit the icon.
    pub fn add_route(
        &mut self,
        path: &str,
        content: &str,
        options: RouteOptions,
    ) -> Result<(), RouteError> {
        let RouteOptions {
            icon,
            child_routes,
            parent_path,
        } = options;
        let parent_path = parent_path.filter(|p| !p.is_empty());
        let full_path = format!("{}{}", parent_path.as_deref().unwrap_or(""), path);

        let kind = if child_routes.is_empty() {
            RouteKind::Link {
                children: content.to_string(),
                href: full_path.clone(),
                target: None,
                left_icon: icon,
            }
        } else {
            RouteKind::ExpandableGroup {
                children: content.to_string(),
                left_icon: icon,
            }
        };
        self.insert(RouteNode {
            item_id: full_path.clone(),
            parent_id: parent_path,
            kind,
        })?;

        for child in child_routes {
            self.add_child_route(child, &full_path)?;
        }
        Ok(())
    }

    fn add_child_route(
        &mut self,
        child: ChildRouteConfig,
        parent_path: &str,
    ) -> Result<(), RouteError> {
        let ChildRouteConfig {
            path,
            children,
            child_routes,
        } = child;
        self.add_route(
            &path,
            &children,
            RouteOptions {
                icon: None,
                child_routes,
                parent_path: Some(parent_path.to_string()),
            },
        )
    }

    /// Add a divider keyed `divider-<index>`. The caller keeps indexes unique.
    pub fn add_divider(&mut self, index: usize, parent_id: Option<&str>) -> Result<(), RouteError> {
        self.insert(RouteNode {
            item_id: format!("divider-{index}"),
            parent_id: parent_id.map(str::to_string),
            kind: RouteKind::Divider,
        })
    }

    pub fn add_subheader(
        &mut self,
        item_id: &str,
        content: &str,
        parent_id: Option<&str>,
    ) -> Result<(), RouteError> {
        self.insert(RouteNode {
            item_id: item_id.to_string(),
            parent_id: parent_id.map(str::to_string),
            kind: RouteKind::Subheader {
                children: content.to_string(),
            },
        })
    }

    /// Add a root-level link to an external URL, opened in a new tab.
    pub fn add_external_route(
        &mut self,
        href: &str,
        content: &str,
        icon: Option<&str>,
    ) -> Result<(), RouteError> {
        self.insert(RouteNode {
            item_id: href.to_string(),
            parent_id: None,
            kind: RouteKind::Link {
                children: content.to_string(),
                href: href.to_string(),
                target: Some(LinkTarget::Blank),
                left_icon: icon.map(str::to_string),
            },
        })
    }

    /// Finish building. Fails if any node points at a parent that was never
    /// added.
    pub fn build(self) -> Result<RouteTree, RouteError> {
        self.tree.check_parents()?;
        Ok(self.tree)
    }

    fn insert(&mut self, node: RouteNode) -> Result<(), RouteError> {
        match self.tree.index.get(&node.item_id) {
            Some(&pos) => match self.policy {
                CollisionPolicy::Reject => Err(RouteError::DuplicateItem(node.item_id)),
                CollisionPolicy::Overwrite => {
                    self.tree.nodes[pos] = node;
                    Ok(())
                }
            },
            None => {
                self.tree.push(node);
                Ok(())
            }
        }
    }
}
