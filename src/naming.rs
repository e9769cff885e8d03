//! Name handling shared by routes and content files.
//!
//! Two conventions live here:
//!
//! - **Package labels**: package names are kebab-case (`app-bar`,
//!   `material-icons`) and their navigation label is the title-cased form
//!   (`App Bar`, `Material Icons`). See [`to_title`].
//! - **Ordered content files**: demo files use an optional numeric prefix
//!   (`010-Simple-Example.md`) that controls order. Dashes in the rest of the
//!   name become spaces in the display title. See [`parse_entry_name`].

/// Result of parsing a numbered entry name like `020-Custom-Theme`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Number prefix if present (e.g., `20` from `020-Custom-Theme`)
    pub number: Option<u32>,
    /// Raw name part after `NNN-`, dashes preserved. Empty if number-only.
    /// For unnumbered entries, this is the full input.
    pub name: String,
    /// Display title: name with dashes converted to spaces.
    pub display_title: String,
}

/// Parse an entry name following the `NNN-name` convention.
///
/// - `"020-Custom-Theme"` → number=Some(20), name="Custom-Theme", display_title="Custom Theme"
/// - `"001"` → number=Some(1), name="", display_title=""
/// - `"Playground"` → number=None, name="Playground", display_title="Playground"
pub fn parse_entry_name(name: &str) -> ParsedName {
    if let Some((prefix, raw)) = name.split_once('-')
        && let Ok(num) = prefix.parse::<u32>()
    {
        return ParsedName {
            number: Some(num),
            name: raw.to_string(),
            display_title: raw.replace('-', " "),
        };
    }
    if let Ok(num) = name.parse::<u32>() {
        return ParsedName {
            number: Some(num),
            name: String::new(),
            display_title: String::new(),
        };
    }
    ParsedName {
        number: None,
        name: name.to_string(),
        display_title: name.replace('-', " "),
    }
}

/// Title-case a kebab/snake-case name for display.
///
/// `"app-bar"` → `"App Bar"`, `"wia-aria"` → `"Wia Aria"`.
pub fn to_title(name: &str) -> String {
    name.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
