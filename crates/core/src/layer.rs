//! A single priority/name-scoped configuration layer.

use std::fmt::{self, Display, Formatter};

use indexmap::IndexMap;

use crate::{
    alias::{Alias, alias_name_eq},
    error::{Error, Result},
    font::FontProperty,
};

/// Highest priority accepted; file names carry the priority as three digits.
pub const MAX_PRIORITY: u32 = 999;

const FILE_SUFFIX: &str = "-ezfc.toml";

/// Normalise a language argument: empty or blank means "any language".
pub(crate) fn language_key(language: Option<&str>) -> Option<String> {
    language.map(str::trim).filter(|l| !l.is_empty()).map(str::to_owned)
}

/// Identity of a layer: `(priority, name)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerKey {
    priority: u32,
    name: Option<String>,
}

impl LayerKey {
    pub fn new(priority: u32, name: Option<&str>) -> Result<Self> {
        if priority > MAX_PRIORITY {
            return Err(Error::validation(format!(
                "priority must be between 0 and {MAX_PRIORITY}, got {priority}"
            )));
        }
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        if let Some(n) = name
            && (n.contains(['/', '\\']) || n.chars().any(char::is_whitespace))
        {
            return Err(Error::validation(format!(
                "layer name must not contain path separators or whitespace: '{n}'"
            )));
        }
        Ok(Self { priority, name: name.map(str::to_owned) })
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// File name of the persisted unit, e.g. `010-ja-ezfc.toml`.
    pub fn file_name(&self) -> String {
        match &self.name {
            Some(name) => format!("{:03}-{name}{FILE_SUFFIX}", self.priority),
            None => format!("{:03}{FILE_SUFFIX}", self.priority),
        }
    }

    /// Glob pattern matching every unit (optionally only those named `name`).
    pub(crate) fn file_pattern(name: Option<&str>) -> String {
        match name {
            Some(name) => format!("[0-9][0-9][0-9]-{}{FILE_SUFFIX}", glob::Pattern::escape(name)),
            None => format!("[0-9][0-9][0-9]*{FILE_SUFFIX}"),
        }
    }

    /// Inverse of [`LayerKey::file_name`]; `None` for foreign file names.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(FILE_SUFFIX)?;
        let (digits, rest) = stem.split_at_checked(3)?;
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let priority = digits.parse().ok()?;
        match rest {
            "" => Some(Self { priority, name: None }),
            _ => {
                let name = rest.strip_prefix('-').filter(|n| !n.is_empty())?;
                Some(Self { priority, name: Some(name.to_owned()) })
            }
        }
    }
}

impl Display for LayerKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{:03}/{name}", self.priority),
            None => write!(f, "{:03}", self.priority),
        }
    }
}

/// Ordered fallback chain for a base family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subst {
    pub family: String,
    pub substitutes: Vec<String>,
}

/// Alias, substitution and font property records of one layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layer {
    key: LayerKey,
    aliases: IndexMap<Option<String>, Vec<Alias>>,
    substs: IndexMap<String, Subst>,
    fonts: IndexMap<String, FontProperty>,
}

impl Layer {
    pub fn new(key: LayerKey) -> Self {
        Self { key, ..Default::default() }
    }

    pub fn key(&self) -> &LayerKey {
        &self.key
    }

    pub fn priority(&self) -> u32 {
        self.key.priority
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty() && self.substs.is_empty() && self.fonts.is_empty()
    }

    /// Insert or replace the alias with the same name for `language`.
    pub fn add_alias(&mut self, language: Option<&str>, alias: Alias) {
        let list = self.aliases.entry(language_key(language)).or_default();
        match list.iter_mut().find(|a| alias_name_eq(a.name(), alias.name())) {
            Some(existing) => *existing = alias,
            None => list.push(alias),
        }
    }

    pub fn remove_alias(&mut self, language: Option<&str>, alias_name: &str) -> bool {
        let key = language_key(language);
        let Some(list) = self.aliases.get_mut(&key) else {
            return false;
        };
        let before = list.len();
        list.retain(|a| !alias_name_eq(a.name(), alias_name));
        let removed = list.len() != before;
        if list.is_empty() {
            self.aliases.shift_remove(&key);
        }
        removed
    }

    pub fn remove_aliases(&mut self, language: Option<&str>) -> bool {
        self.aliases.shift_remove(&language_key(language)).is_some()
    }

    pub fn aliases(&self, language: Option<&str>) -> &[Alias] {
        self.aliases.get(&language_key(language)).map(Vec::as_slice).unwrap_or_default()
    }

    /// Languages with at least one alias; `None` is the any-language key.
    pub fn languages(&self) -> impl Iterator<Item = Option<&str>> {
        self.aliases.keys().map(Option::as_deref)
    }

    /// Append `substitute` to the chain for `family`; false if already present.
    pub fn add_subst(&mut self, family: &str, substitute: &str) -> bool {
        let subst = self
            .substs
            .entry(family.to_owned())
            .or_insert_with(|| Subst { family: family.to_owned(), substitutes: Vec::new() });
        if subst.substitutes.iter().any(|s| s.eq_ignore_ascii_case(substitute)) {
            return false;
        }
        subst.substitutes.push(substitute.to_owned());
        true
    }

    pub fn remove_subst(&mut self, family: &str, substitute: &str) -> bool {
        let Some(subst) = self.substs.get_mut(family) else {
            return false;
        };
        let before = subst.substitutes.len();
        subst.substitutes.retain(|s| !s.eq_ignore_ascii_case(substitute));
        let removed = subst.substitutes.len() != before;
        if subst.substitutes.is_empty() {
            self.substs.shift_remove(family);
        }
        removed
    }

    pub fn remove_substs(&mut self, family: &str) -> bool {
        self.substs.shift_remove(family).is_some()
    }

    pub fn substs(&self, family: &str) -> &[String] {
        self.substs.get(family).map(|s| s.substitutes.as_slice()).unwrap_or_default()
    }

    pub fn subst_chains(&self) -> impl Iterator<Item = &Subst> {
        self.substs.values()
    }

    /// Merge the set fields of `prop` into this layer's record for its family.
    pub fn add_font(&mut self, prop: &FontProperty) {
        self.fonts
            .entry(prop.family.clone())
            .or_insert_with(|| FontProperty::new(prop.family.clone()))
            .merge(prop);
    }

    pub fn remove_font(&mut self, family: &str) -> bool {
        self.fonts.shift_remove(family).is_some()
    }

    /// Drop one feature setting; a record left with nothing configured goes too.
    pub fn remove_feature(&mut self, family: &str, feature: &str) -> bool {
        let Some(font) = self.fonts.get_mut(family) else {
            return false;
        };
        let removed = font.remove_feature(feature);
        if !font.has_settings() {
            self.fonts.shift_remove(family);
        }
        removed
    }

    pub fn remove_fonts(&mut self) -> bool {
        let had_fonts = !self.fonts.is_empty();
        self.fonts.clear();
        had_fonts
    }

    pub fn font(&self, family: &str) -> Option<&FontProperty> {
        self.fonts.get(family)
    }

    pub fn fonts(&self) -> impl Iterator<Item = &FontProperty> {
        self.fonts.values()
    }

    pub(crate) fn alias_groups(&self) -> impl Iterator<Item = (Option<&str>, &[Alias])> {
        self.aliases.iter().map(|(lang, list)| (lang.as_deref(), list.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tristate;

    fn layer() -> Layer {
        Layer::new(LayerKey::new(10, None).unwrap())
    }

    #[test]
    fn test_file_name() {
        assert_eq!(LayerKey::new(5, None).unwrap().file_name(), "005-ezfc.toml");
        assert_eq!(LayerKey::new(50, Some("ja")).unwrap().file_name(), "050-ja-ezfc.toml");
    }

    #[test]
    fn test_from_file_name() {
        let key = LayerKey::from_file_name("050-my-cjk-ezfc.toml").unwrap();
        assert_eq!(key.priority(), 50);
        assert_eq!(key.name(), Some("my-cjk"));

        assert_eq!(LayerKey::from_file_name("000-ezfc.toml").unwrap(), LayerKey::default());
        assert!(LayerKey::from_file_name("50-ezfc.toml").is_none());
        assert!(LayerKey::from_file_name("050--ezfc.toml").is_none());
        assert!(LayerKey::from_file_name("050-ezfc.conf").is_none());
    }

    #[test]
    fn test_priority_out_of_range() {
        assert!(matches!(LayerKey::new(1000, None), Err(Error::Validation(_))));
        assert!(matches!(LayerKey::new(1, Some("a/b")), Err(Error::Validation(_))));
    }

    #[test]
    fn test_add_alias_replaces_in_place() {
        let mut layer = layer();
        layer.add_alias(Some("ja"), Alias::new("sans-serif", "IPAGothic"));
        layer.add_alias(Some("ja"), Alias::new("serif", "IPAMincho"));
        layer.add_alias(Some("ja"), Alias::new("Sans", "Noto Sans CJK JP"));

        let aliases = layer.aliases(Some("ja"));
        assert_eq!(aliases.len(), 2);
        assert_eq!(aliases[0].font(), "Noto Sans CJK JP");
        assert_eq!(aliases[1].name(), "serif");
    }

    #[test]
    fn test_language_none_is_distinct() {
        let mut layer = layer();
        layer.add_alias(None, Alias::new("monospace", "DejaVu Sans Mono"));

        assert!(layer.aliases(Some("en")).is_empty());
        assert_eq!(layer.aliases(Some("")).len(), 1);
        assert!(!layer.remove_alias(Some("en"), "monospace"));
        assert!(layer.remove_alias(None, "monospace"));
        assert_eq!(layer.languages().count(), 0);
    }

    #[test]
    fn test_subst_chain() {
        let mut layer = layer();
        assert!(layer.add_subst("Arial", "Liberation Sans"));
        assert!(!layer.add_subst("Arial", "liberation sans"));
        assert!(layer.add_subst("Arial", "Arimo"));
        assert_eq!(layer.substs("Arial"), ["Liberation Sans", "Arimo"]);

        assert!(layer.remove_subst("Arial", "Liberation Sans"));
        assert!(!layer.remove_subst("Arial", "Liberation Sans"));
        assert!(layer.remove_subst("Arial", "Arimo"));
        assert!(layer.is_empty());
    }

    #[test]
    fn test_add_font_merges() {
        let mut layer = layer();
        layer.add_font(&FontProperty::new("Sans").with_hinting(true));
        layer.add_font(&FontProperty::new("Sans").with_antialiasing(false));

        let font = layer.font("Sans").unwrap();
        assert_eq!(font.hinting.get(), Some(true));
        assert_eq!(font.antialiasing.get(), Some(false));
        assert!(layer.remove_font("Sans"));
        assert!(!layer.remove_font("Sans"));
    }

    #[test]
    fn test_remove_feature_drops_emptied_record() {
        let mut layer = layer();
        layer.add_font(&FontProperty::new("Fira Code").with_feature("liga").with_feature("ss01"));
        layer.add_font(&FontProperty::new("Sans").with_hinting(true).with_feature("liga"));

        assert!(layer.remove_feature("Fira Code", "liga"));
        assert!(!layer.remove_feature("Fira Code", "liga"));
        assert!(layer.remove_feature("Fira Code", "ss01"));
        assert!(layer.font("Fira Code").is_none());

        assert!(layer.remove_feature("Sans", "liga"));
        assert_eq!(layer.font("Sans").unwrap().hinting, Tristate::True);
        assert!(!layer.remove_feature("Serif", "liga"));
    }
}
