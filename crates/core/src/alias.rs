//! Alias records: a logical font role mapped to a concrete family.

/// Generic family names fontconfig understands as aliases.
pub const GENERIC_FAMILIES: [&str; 5] = ["sans-serif", "serif", "monospace", "cursive", "fantasy"];

/// Expand the `sans` shorthand to `sans-serif`; other names pass through.
pub fn canonical_alias_name(name: &str) -> String {
    let name = name.trim();
    if name.eq_ignore_ascii_case("sans") {
        "sans-serif".to_owned()
    } else {
        name.to_owned()
    }
}

/// Checks if `name` is one of the generic families (or the `sans` shorthand).
pub fn is_generic_family(name: &str) -> bool {
    let name = canonical_alias_name(name);
    GENERIC_FAMILIES.iter().any(|g| g.eq_ignore_ascii_case(&name))
}

/// Alias names compare ASCII-case-insensitively after canonicalisation.
pub fn alias_name_eq(a: &str, b: &str) -> bool {
    canonical_alias_name(a).eq_ignore_ascii_case(&canonical_alias_name(b))
}

/// A single alias: `name` resolves to `font`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    name: String,
    font: String,
}

impl Alias {
    pub fn new(name: impl AsRef<str>, font: impl Into<String>) -> Self {
        Self { name: canonical_alias_name(name.as_ref()), font: font.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    pub fn set_font(&mut self, font: impl Into<String>) {
        self.font = font.into();
    }

    /// Key used for ordering and case-insensitive comparison.
    pub(crate) fn sort_key(&self) -> String {
        self.name.to_ascii_lowercase()
    }
}
