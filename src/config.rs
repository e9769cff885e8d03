//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; the user's `content/config.toml` is merged on top, so a
//! config file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! title = "react-md"            # Site title (header and <title>)
//! assets_dir = "assets"         # Copied verbatim to the output root
//!
//! [packages]
//! route = "/packages"           # Route prefix package sections live under
//! scope = "@react-md"           # npm scope for generated install snippets
//!
//! [routes]
//! on_duplicate = "reject"       # "reject" or "overwrite"
//!
//! [theme]
//! nav_width = "16rem"
//! header_height = "4rem"
//! content_max_width = "60rem"
//!
//! [colors.light]
//! background = "#ffffff"
//! surface = "#f5f5f5"           # Navigation panel
//! text = "#212121"
//! text_muted = "#757575"        # Subheaders, breadcrumbs
//! border = "#e0e0e0"
//! link = "#1976d2"
//! link_hover = "#0d47a1"
//!
//! [colors.dark]
//! background = "#121212"
//! surface = "#1e1e1e"
//! text = "#eeeeee"
//! text_muted = "#9e9e9e"
//! border = "#333333"
//! link = "#90caf9"
//! link_hover = "#e3f2fd"
//!
//! [processing]
//! max_processes = 4             # Max parallel render workers (omit for auto)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::routes::CollisionPolicy;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site title shown in the header and used as the `<title>` suffix.
    pub title: String,
    /// Static assets directory, relative to the content root.
    pub assets_dir: String,
    /// Where package documentation routes live and how packages are installed.
    pub packages: PackagesConfig,
    /// Route tree construction settings.
    pub routes: RoutesConfig,
    /// Layout dimensions.
    pub theme: ThemeConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "react-md".to_string(),
            assets_dir: "assets".to_string(),
            packages: PackagesConfig::default(),
            routes: RoutesConfig::default(),
            theme: ThemeConfig::default(),
            colors: ColorConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title.trim().is_empty() {
            return Err(ConfigError::Validation("title must not be empty".into()));
        }
        if !self.packages.route.starts_with('/') {
            return Err(ConfigError::Validation(
                "packages.route must start with '/'".into(),
            ));
        }
        if self.packages.route.len() > 1 && self.packages.route.ends_with('/') {
            return Err(ConfigError::Validation(
                "packages.route must not end with '/'".into(),
            ));
        }
        for (key, value) in [
            ("theme.nav_width", &self.theme.nav_width),
            ("theme.header_height", &self.theme.header_height),
            ("theme.content_max_width", &self.theme.content_max_width),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Package documentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackagesConfig {
    /// Route prefix whose children are packages (e.g. `/packages`).
    pub route: String,
    /// npm scope used in generated installation instructions.
    pub scope: String,
}

impl Default for PackagesConfig {
    fn default() -> Self {
        Self {
            route: "/packages".to_string(),
            scope: "@react-md".to_string(),
        }
    }
}

impl PackagesConfig {
    /// The npm package name for a package, e.g. `@react-md/button`.
    pub fn npm_name(&self, package: &str) -> String {
        if self.scope.is_empty() {
            package.to_string()
        } else {
            format!("{}/{}", self.scope, package)
        }
    }
}

/// Route tree construction settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutesConfig {
    /// Policy for two routes resolving to the same item id.
    pub on_duplicate: CollisionPolicy,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Layout dimensions (CSS values).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Width of the navigation panel.
    pub nav_width: String,
    /// Height of the top app bar.
    pub header_height: String,
    /// Maximum width of the main content column.
    pub content_max_width: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            nav_width: "16rem".to_string(),
            header_height: "4rem".to_string(),
            content_max_width: "60rem".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    /// Navigation panel and code block background.
    pub surface: String,
    pub text: String,
    /// Subheaders, breadcrumbs, empty-state messages.
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            surface: "#f5f5f5".to_string(),
            text: "#212121".to_string(),
            text_muted: "#757575".to_string(),
            border: "#e0e0e0".to_string(),
            link: "#1976d2".to_string(),
            link_hover: "#0d47a1".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#121212".to_string(),
            surface: "#1e1e1e".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#9e9e9e".to_string(),
            border: "#333333".to_string(),
            link: "#90caf9".to_string(),
            link_hover: "#e3f2fd".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory, on top of the
/// stock defaults.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(root)?)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# docsite Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Site title, shown in the app bar and appended to every page <title>.
title = "react-md"

# Static assets directory (relative to the content root), copied verbatim
# to the output root.
assets_dir = "assets"

# ---------------------------------------------------------------------------
# Packages
# ---------------------------------------------------------------------------
[packages]
# Route prefix under which package sections live. A route
# <route>/<name>/<installation|demos|api|sassdoc> renders package docs.
route = "/packages"

# npm scope used in generated installation instructions.
scope = "@react-md"

# ---------------------------------------------------------------------------
# Navigation routes
# ---------------------------------------------------------------------------
[routes]
# What to do when two routes resolve to the same id:
#   "reject"    - fail the build with an error
#   "overwrite" - keep the last route, in the position of the first
on_duplicate = "reject"

# ---------------------------------------------------------------------------
# Theme / layout
# ---------------------------------------------------------------------------
[theme]
nav_width = "16rem"
header_height = "4rem"
content_max_width = "60rem"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
surface = "#f5f5f5"       # Navigation panel, code blocks
text = "#212121"
text_muted = "#757575"    # Subheaders, breadcrumbs
border = "#e0e0e0"
link = "#1976d2"
link_hover = "#0d47a1"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#121212"
surface = "#1e1e1e"
text = "#eeeeee"
text_muted = "#9e9e9e"
border = "#333333"
link = "#90caf9"
link_hover = "#e3f2fd"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel page-rendering workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
{light}
}}

@media (prefers-color-scheme: dark) {{
    :root {{
{dark}
    }}
}}"#,
        light = color_properties(&colors.light, "    "),
        dark = color_properties(&colors.dark, "        "),
    )
}

fn color_properties(scheme: &ColorScheme, indent: &str) -> String {
    [
        ("--color-bg", &scheme.background),
        ("--color-surface", &scheme.surface),
        ("--color-text", &scheme.text),
        ("--color-text-muted", &scheme.text_muted),
        ("--color-border", &scheme.border),
        ("--color-link", &scheme.link),
        ("--color-link-hover", &scheme.link_hover),
    ]
    .iter()
    .map(|(name, value)| format!("{indent}{name}: {value};"))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Generate CSS custom properties from theme config.
pub fn generate_theme_css(theme: &ThemeConfig) -> String {
    format!(
        r#":root {{
    --nav-width: {nav_width};
    --header-height: {header_height};
    --content-max-width: {content_max_width};
}}"#,
        nav_width = theme.nav_width,
        header_height = theme.header_height,
        content_max_width = theme.content_max_width,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "react-md");
        assert_eq!(config.assets_dir, "assets");
        assert_eq!(config.packages.route, "/packages");
        assert_eq!(config.packages.scope, "@react-md");
        assert_eq!(config.routes.on_duplicate, CollisionPolicy::Reject);
        assert_eq!(config.colors.light.background, "#ffffff");
        assert_eq!(config.colors.dark.background, "#121212");
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[colors.light]
background = "#fafafa"
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.colors.light.background, "#fafafa");
        assert_eq!(config.colors.light.text, "#212121");
        assert_eq!(config.title, "react-md");
    }

    #[test]
    fn parse_collision_policy() {
        let toml = r#"
[routes]
on_duplicate = "overwrite"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.routes.on_duplicate, CollisionPolicy::Overwrite);
    }

    #[test]
    fn unknown_collision_policy_rejected() {
        let toml = r#"
[routes]
on_duplicate = "ignore"
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn npm_name_uses_scope() {
        let mut packages = PackagesConfig::default();
        assert_eq!(packages.npm_name("button"), "@react-md/button");
        packages.scope = String::new();
        assert_eq!(packages.npm_name("button"), "button");
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.title, "react-md");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r##"
title = "My Library"

[packages]
scope = "@acme"
"##,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.title, "My Library");
        assert_eq!(config.packages.scope, "@acme");
        assert_eq!(config.packages.route, "/packages");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[theme]
nav_widht = "10rem"
"#,
        )
        .unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[imagez]\nquality = 90\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_empty_title() {
        let mut config = SiteConfig::default();
        config.title = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn validate_packages_route_must_be_absolute() {
        let mut config = SiteConfig::default();
        config.packages.route = "packages".to_string();
        assert!(config.validate().is_err());
        config.packages.route = "/packages/".to_string();
        assert!(config.validate().is_err());
        config.packages.route = "/".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_empty_theme_value() {
        let mut config = SiteConfig::default();
        config.theme.nav_width = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("theme.nav_width"));
    }

    #[test]
    fn validate_zero_processes() {
        let mut config = SiteConfig::default();
        config.processing.max_processes = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[packages]
route = "no-slash"
"#,
        )
        .unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[packages]
route = "/packages"
scope = "@react-md"
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[packages]
scope = "@acme"
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let packages = merged.get("packages").unwrap();
        assert_eq!(packages.get("scope").unwrap().as_str(), Some("@acme"));
        assert_eq!(packages.get("route").unwrap().as_str(), Some("/packages"));
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str(
            r##"
[colors.light]
background = "#fff"
text = "#000"
"##,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r##"
[colors.light]
background = "#fafafa"
"##,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let light = merged.get("colors").unwrap().get("light").unwrap();
        assert_eq!(light.get("background").unwrap().as_str(), Some("#fafafa"));
        assert_eq!(light.get("text").unwrap().as_str(), Some("#000"));
    }

    #[test]
    fn resolve_config_with_overlay() {
        let overlay: toml::Value = toml::from_str("title = \"Docs\"").unwrap();
        let config = resolve_config(stock_defaults_value(), Some(overlay)).unwrap();
        assert_eq!(config.title, "Docs");
        assert_eq!(config.theme.nav_width, "16rem");
    }

    // =========================================================================
    // Processing config tests
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // stock config and CSS generation
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.title, defaults.title);
        assert_eq!(config.packages.route, defaults.packages.route);
        assert_eq!(config.routes.on_duplicate, defaults.routes.on_duplicate);
        assert_eq!(config.theme.nav_width, defaults.theme.nav_width);
        assert_eq!(config.colors.dark.link, defaults.colors.dark.link);
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        for section in ["packages", "routes", "theme", "colors", "processing"] {
            assert!(val.get(section).is_some(), "missing {section}");
        }
    }

    #[test]
    fn generate_css_uses_config_colors() {
        let mut colors = ColorConfig::default();
        colors.light.background = "#f0f0f0".to_string();
        colors.dark.background = "#1a1a1a".to_string();
        let css = generate_color_css(&colors);
        assert!(css.contains("--color-bg: #f0f0f0;"));
        assert!(css.contains("--color-bg: #1a1a1a;"));
        assert!(css.contains("--color-surface:"));
        assert!(css.contains("@media (prefers-color-scheme: dark)"));
    }

    #[test]
    fn generate_theme_css_includes_layout_variables() {
        let css = generate_theme_css(&ThemeConfig::default());
        assert!(css.contains("--nav-width: 16rem"));
        assert!(css.contains("--header-height: 4rem"));
        assert!(css.contains("--content-max-width: 60rem"));
    }
}
