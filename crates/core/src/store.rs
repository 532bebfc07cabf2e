//! The layered configuration store.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};

use crate::{
    alias::{Alias, alias_name_eq},
    error::{Error, Result},
    font::FontProperty,
    io::{LayerFile, glob_layers},
    layer::{Layer, LayerKey},
};

/// Default directory for layer units: `$XDG_CONFIG_HOME/fontconfig/conf.d`.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("fontconfig")
        .join("conf.d")
}

/// Directory older releases wrote layer units to: `~/.fonts.conf.d`.
pub fn default_legacy_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".fonts.conf.d"))
}

/// Priority-ordered set of configuration layers plus one mutable target layer.
///
/// `layers` is kept in resolution order: ascending priority, and within a
/// priority in load order, so the last entry always wins a conflict.
#[derive(Debug)]
pub struct ConfigStore {
    key: LayerKey,
    config_dir: PathBuf,
    legacy_dir: Option<PathBuf>,
    migration: bool,
    loaded: bool,
    layers: Vec<Layer>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    pub fn new() -> Self {
        Self {
            key: LayerKey::default(),
            config_dir: default_config_dir(),
            legacy_dir: default_legacy_dir(),
            migration: true,
            loaded: false,
            layers: Vec::new(),
        }
    }

    /// Select the priority of the target layer (0..=999).
    pub fn set_priority(&mut self, priority: u32) -> Result<()> {
        self.key = LayerKey::new(priority, self.key.name())?;
        Ok(())
    }

    /// Select the name of the target layer; `None` or empty clears it.
    pub fn set_name(&mut self, name: Option<&str>) -> Result<()> {
        self.key = LayerKey::new(self.key.priority(), name)?;
        Ok(())
    }

    pub fn set_config_dir(&mut self, dir: impl Into<PathBuf>) {
        self.config_dir = dir.into();
    }

    pub fn set_legacy_dir(&mut self, dir: Option<PathBuf>) {
        self.legacy_dir = dir;
    }

    /// Enable or disable reading from and cleaning up the legacy directory.
    pub fn set_migration(&mut self, on: bool) {
        self.migration = on;
    }

    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.set_config_dir(dir);
        self
    }

    pub fn priority(&self) -> u32 {
        self.key.priority()
    }

    pub fn name(&self) -> Option<&str> {
        self.key.name()
    }

    pub fn target_key(&self) -> &LayerKey {
        &self.key
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// All layers in resolution order (lowest priority first).
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn target_layer(&self) -> Option<&Layer> {
        self.target_index().map(|i| &self.layers[i])
    }

    /// True when no layer holds any record.
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(Layer::is_empty)
    }

    /// Read every persisted layer in scope.
    ///
    /// The scope is the configured name, or every layer when unnamed. An
    /// unnamed store with nothing on disk loads as empty; a named store with
    /// nothing on disk fails with [`Error::NotFound`] and stays empty.
    pub fn load(&mut self) -> Result<()> {
        self.layers.clear();
        self.loaded = false;

        let mut files = glob_layers(&self.config_dir, self.key.name())?;
        if let Some(legacy) = self.legacy_file()
            && !files.iter().any(|f| f.key() == &self.key)
            && legacy.exists()
        {
            info!("Reading {} from legacy location {}", self.key, legacy.path().display());
            files.push(legacy);
        }

        if files.is_empty() {
            if self.key.name().is_some() {
                return Err(Error::NotFound {
                    dir: self.config_dir.clone(),
                    name: self.key.name().map(str::to_owned),
                });
            }
            debug!("No layers found in {}", self.config_dir.display());
            self.loaded = true;
            return Ok(());
        }

        let mut layers = Vec::with_capacity(files.len());
        for file in &files {
            debug!("Loading layer {} from {}", file.key(), file.path().display());
            layers.push(file.read()?);
        }
        layers.sort_by_key(Layer::priority);

        info!("Loaded {} layer(s) from {}", layers.len(), self.config_dir.display());
        self.layers = layers;
        self.loaded = true;
        Ok(())
    }

    /// Write the target layer, replacing its persisted unit.
    ///
    /// An empty target layer of a loaded store deletes the unit instead.
    pub fn save(&self) -> Result<()> {
        let file = LayerFile::new(&self.config_dir, self.key.clone());
        match self.target_layer() {
            Some(layer) if !layer.is_empty() => {
                file.write(layer)?;
                info!("Saved layer {} to {}", self.key, file.path().display());
            }
            _ if self.loaded => {
                if file.remove()? {
                    info!("Removed empty layer {}", file.path().display());
                }
            }
            _ => debug!("Nothing to save for layer {}", self.key),
        }
        self.cleanup_legacy()
    }

    pub fn add_alias(&mut self, language: Option<&str>, alias: Alias) -> Result<()> {
        if alias.name().is_empty() || alias.font().trim().is_empty() {
            return Err(Error::validation("alias needs a name and a target font"));
        }
        self.ensure_target().add_alias(language, alias);
        Ok(())
    }

    pub fn remove_alias(&mut self, language: Option<&str>, alias_name: &str) -> bool {
        self.existing_target().is_some_and(|l| l.remove_alias(language, alias_name))
    }

    /// Remove every alias defined for `language` in the target layer.
    pub fn remove_aliases(&mut self, language: Option<&str>) -> bool {
        self.existing_target().is_some_and(|l| l.remove_aliases(language))
    }

    /// Append `substitute` to the chain of `family`; `Ok(false)` if already present.
    pub fn add_subst(&mut self, family: &str, substitute: &str) -> Result<bool> {
        let (family, substitute) = (family.trim(), substitute.trim());
        if family.is_empty() || substitute.is_empty() {
            return Err(Error::validation("substitution needs a family and a substitute"));
        }
        Ok(self.ensure_target().add_subst(family, substitute))
    }

    pub fn remove_subst(&mut self, family: &str, substitute: &str) -> bool {
        self.existing_target().is_some_and(|l| l.remove_subst(family, substitute))
    }

    pub fn remove_substs(&mut self, family: &str) -> bool {
        self.existing_target().is_some_and(|l| l.remove_substs(family))
    }

    pub fn add_font(&mut self, prop: &FontProperty) -> Result<()> {
        if prop.family.trim().is_empty() {
            return Err(Error::validation("font properties need a family"));
        }
        self.ensure_target().add_font(prop);
        Ok(())
    }

    pub fn remove_font(&mut self, family: &str) -> bool {
        self.existing_target().is_some_and(|l| l.remove_font(family))
    }

    /// Remove `feature` from the target layer's record for `family` only.
    pub fn remove_feature(&mut self, family: &str, feature: &str) -> bool {
        self.existing_target().is_some_and(|l| l.remove_feature(family, feature))
    }

    pub fn remove_fonts(&mut self) -> bool {
        self.existing_target().is_some_and(Layer::remove_fonts)
    }

    /// Effective aliases for `language`, sorted by alias name.
    ///
    /// `None` is its own key and does not fall back to other languages.
    pub fn resolve_aliases(&self, language: Option<&str>) -> Vec<Alias> {
        let mut resolved = BTreeMap::new();
        for layer in self.layers.iter().rev() {
            for alias in layer.aliases(language) {
                resolved.entry(alias.sort_key()).or_insert_with(|| alias.clone());
            }
        }
        resolved.into_values().collect()
    }

    pub fn resolve_alias(&self, language: Option<&str>, alias_name: &str) -> Option<Alias> {
        self.layers.iter().rev().find_map(|layer| {
            layer.aliases(language).iter().find(|a| alias_name_eq(a.name(), alias_name)).cloned()
        })
    }

    /// Field-by-field merge of `family` across layers, highest priority first.
    pub fn resolve_font(&self, family: &str) -> FontProperty {
        let mut resolved = FontProperty::new(family);
        for prop in self.layers.iter().rev().filter_map(|layer| layer.font(family)) {
            resolved.inherit(prop);
        }
        resolved
    }

    /// Substitutes for `family` from all layers, highest priority first.
    pub fn resolve_substs(&self, family: &str) -> Vec<String> {
        let mut chain: Vec<String> = Vec::new();
        for substitute in self.layers.iter().rev().flat_map(|layer| layer.substs(family)) {
            if !chain.iter().any(|s| s.eq_ignore_ascii_case(substitute)) {
                chain.push(substitute.clone());
            }
        }
        chain
    }

    /// Languages with aliases in any layer; `None` sorts first.
    pub fn languages(&self) -> Vec<Option<String>> {
        self.layers
            .iter()
            .flat_map(Layer::languages)
            .map(|lang| lang.map(str::to_owned))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn font_families(&self) -> Vec<String> {
        self.layers
            .iter()
            .flat_map(Layer::fonts)
            .map(|f| f.family.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn subst_families(&self) -> Vec<String> {
        self.layers
            .iter()
            .flat_map(Layer::subst_chains)
            .map(|s| s.family.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Every effective alias grouped by language.
    pub fn dump(&self) -> Vec<(Option<String>, Vec<Alias>)> {
        self.languages()
            .into_iter()
            .map(|lang| {
                let aliases = self.resolve_aliases(lang.as_deref());
                (lang, aliases)
            })
            .collect()
    }

    fn target_index(&self) -> Option<usize> {
        self.layers.iter().position(|l| l.key() == &self.key)
    }

    fn existing_target(&mut self) -> Option<&mut Layer> {
        let index = self.target_index()?;
        Some(&mut self.layers[index])
    }

    /// The target layer, created as the most recent layer of its priority if absent.
    fn ensure_target(&mut self) -> &mut Layer {
        let index = match self.target_index() {
            Some(index) => index,
            None => {
                let priority = self.key.priority();
                let index = self.layers.partition_point(|l| l.priority() <= priority);
                self.layers.insert(index, Layer::new(self.key.clone()));
                index
            }
        };
        &mut self.layers[index]
    }

    fn legacy_file(&self) -> Option<LayerFile> {
        if !self.migration {
            return None;
        }
        self.legacy_dir.as_deref().map(|dir| LayerFile::new(dir, self.key.clone()))
    }

    fn cleanup_legacy(&self) -> Result<()> {
        let (Some(legacy), Some(dir)) = (self.legacy_file(), self.legacy_dir.as_deref()) else {
            return Ok(());
        };
        if !legacy.exists() {
            return Ok(());
        }
        let is_symlink = fs::symlink_metadata(dir).is_ok_and(|m| m.file_type().is_symlink());
        if is_symlink {
            warn!("Keeping {}: legacy directory is a symlink", legacy.path().display());
            return Ok(());
        }
        if legacy.remove()? {
            info!("Removed legacy layer {}", legacy.path().display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tristate;

    fn store(dir: &Path) -> ConfigStore {
        let mut store = ConfigStore::new().with_config_dir(dir);
        store.set_legacy_dir(None);
        store
    }

    #[test]
    fn test_set_priority_rejects_out_of_range() {
        let mut store = ConfigStore::new();
        assert!(matches!(store.set_priority(1000), Err(Error::Validation(_))));
        assert_eq!(store.priority(), 0);
        store.set_priority(999).unwrap();
        store.set_name(Some("cjk")).unwrap();
        assert_eq!(store.target_key().file_name(), "999-cjk-ezfc.toml");
    }

    #[test]
    fn test_remove_without_target_does_not_create_layer() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());
        store.load().unwrap();

        assert!(!store.remove_alias(Some("ja"), "sans-serif"));
        assert!(!store.remove_font("Sans"));
        assert!(!store.remove_subst("Arial", "Arimo"));
        assert!(store.target_layer().is_none());
    }

    #[test]
    fn test_add_validates_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());
        assert!(store.add_alias(None, Alias::new("serif", " ")).is_err());
        assert!(store.add_subst("", "Arimo").is_err());
        assert!(store.add_font(&FontProperty::new("")).is_err());
        assert!(store.target_layer().is_none());
    }

    #[test]
    fn test_created_target_wins_ties_against_loaded_layers() {
        let dir = tempfile::tempdir().unwrap();
        let mut other = store(dir.path());
        other.set_priority(10).unwrap();
        other.set_name(Some("vendor")).unwrap();
        other.add_font(&FontProperty::new("Sans").with_hinting(true)).unwrap();
        other.save().unwrap();

        let mut store = store(dir.path());
        store.set_priority(10).unwrap();
        store.load().unwrap();
        store.add_font(&FontProperty::new("Sans").with_hinting(false)).unwrap();

        assert_eq!(store.layers().len(), 2);
        assert_eq!(store.resolve_font("Sans").hinting, Tristate::False);
    }

    #[test]
    fn test_resolve_substs_merges_chains() {
        let dir = tempfile::tempdir().unwrap();
        let mut low = store(dir.path());
        low.set_priority(10).unwrap();
        low.add_subst("Arial", "Arimo").unwrap();
        low.add_subst("Arial", "Liberation Sans").unwrap();
        low.save().unwrap();

        let mut high = store(dir.path());
        high.set_priority(20).unwrap();
        high.load().unwrap();
        high.add_subst("Arial", "Liberation Sans").unwrap();

        assert_eq!(high.resolve_substs("Arial"), ["Liberation Sans", "Arimo"]);
        assert_eq!(high.subst_families(), ["Arial"]);
    }

    #[test]
    fn test_dump_groups_by_language() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());
        store.add_alias(Some("ja"), Alias::new("serif", "Noto Serif CJK JP")).unwrap();
        store.add_alias(None, Alias::new("monospace", "DejaVu Sans Mono")).unwrap();
        store.add_alias(Some("ja"), Alias::new("sans", "Noto Sans CJK JP")).unwrap();

        let dump = store.dump();
        assert_eq!(dump.len(), 2);
        assert_eq!(dump[0].0, None);
        assert_eq!(dump[1].0.as_deref(), Some("ja"));
        let names: Vec<_> = dump[1].1.iter().map(Alias::name).collect();
        assert_eq!(names, ["sans-serif", "serif"]);
    }

    #[test]
    fn test_remove_feature_only_edits_target() {
        let dir = tempfile::tempdir().unwrap();
        let mut low = store(dir.path());
        low.set_priority(10).unwrap();
        low.add_font(&FontProperty::new("Fira Code").with_feature("liga")).unwrap();
        low.save().unwrap();

        let mut high = store(dir.path());
        high.set_priority(20).unwrap();
        high.load().unwrap();
        assert!(!high.remove_feature("Fira Code", "liga"));
        assert_eq!(high.resolve_font("Fira Code").features, ["liga"]);

        high.add_font(&FontProperty::new("Fira Code").with_feature("ss01")).unwrap();
        assert!(high.remove_feature("Fira Code", "ss01"));
        assert!(!high.remove_feature("Fira Code", "ss01"));
        assert_eq!(high.resolve_font("Fira Code").features, ["liga"]);
    }
}
