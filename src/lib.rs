//! # docsite
//!
//! A static documentation site generator for component libraries. The
//! navigation is declared once in `navigation.toml`; every link in it is
//! backed by a markdown page or by one section of a package's documentation
//! (installation, demos, API, SassDoc).
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan      content/  →  manifest.json    (navigation + content → structured data)
//! 2. Generate  manifest  →  dist/            (final HTML site)
//! ```
//!
//! The manifest is human-readable JSON, so the output of the first stage can
//! be inspected before anything is rendered.
//!
//! # The Route Tree
//!
//! [`routes::RouteTreeBuilder`] turns navigation entries into a flat,
//! insertion-ordered [`routes::RouteTree`]: every node knows its `item_id`
//! and its parent's id, and consumers rebuild the hierarchy by grouping on
//! `parent_id`. Routes with child routes become expandable groups, leaves
//! become links to their full path, and packages expand into one child
//! route per documentation section.
//!
//! Building happens once per run and the finished tree is immutable. It is
//! passed explicitly to the scanner, the renderer, and the CLI output; there
//! is no global registry.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`routes`] | Route tree types and the builder (links, groups, subheaders, dividers, external links) |
//! | [`navigation`] | `navigation.toml` parsing and replay into the builder |
//! | [`scan`] | Stage 1: resolves every internal link to its content, produces the manifest |
//! | [`generate`] | Stage 2: renders the HTML site from the manifest using Maud |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`types`] | Shared types serialized between stages (`Manifest`, `Page`, `PackageDocs`) |
//! | [`demos`] | Package example pages from `demos/*.md` |
//! | [`sassdoc`] | Flattened SassDoc documents and their loaders |
//! | [`naming`] | `NNN-name` filename convention parser and title casing |
//! | [`cache`] | Content-hash output cache for incremental builds |
//! | [`output`] | CLI output formatting for every stage |
//!
//! # Design Decisions
//!
//! ## Duplicate Routes
//!
//! Two routes resolving to the same item id are an error by default. Setting
//! `routes.on_duplicate = "overwrite"` in `config.toml` lets the later route
//! replace the earlier one in place instead.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time HTML
//! macro system. Malformed templates are build errors, interpolation is
//! auto-escaped, and there is no template directory to ship.

pub mod cache;
pub mod config;
pub mod demos;
pub mod generate;
pub mod naming;
pub mod navigation;
pub mod output;
pub mod routes;
pub mod sassdoc;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
