//! Reading and writing persisted layer units.

use std::{
    fs::{self, File, create_dir_all},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use glob::glob;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    alias::Alias,
    error::{Error, Result},
    font::FontProperty,
    layer::{Layer, LayerKey},
};

const HEADER: &str = "# Generated by ezfc. Manual edits may be overwritten.\n\n";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayerDocument {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    alias: Vec<AliasRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    subst: Vec<SubstRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    font: Vec<FontProperty>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct AliasRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lang: Option<String>,
    name: String,
    font: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SubstRecord {
    family: String,
    substitutes: Vec<String>,
}

impl LayerDocument {
    fn from_layer(layer: &Layer) -> Self {
        let alias = layer
            .alias_groups()
            .flat_map(|(lang, aliases)| {
                aliases.iter().map(move |a| AliasRecord {
                    lang: lang.map(str::to_owned),
                    name: a.name().to_owned(),
                    font: a.font().to_owned(),
                })
            })
            .collect();
        let subst = layer
            .subst_chains()
            .map(|s| SubstRecord { family: s.family.clone(), substitutes: s.substitutes.clone() })
            .collect();
        let font = layer.fonts().cloned().collect();
        Self { alias, subst, font }
    }

    fn into_layer(self, key: LayerKey, path: &Path) -> Result<Layer> {
        let invalid = |message: &str| Error::Decode {
            path: path.to_path_buf(),
            message: message.to_owned(),
        };

        let mut layer = Layer::new(key);
        for record in self.alias {
            if record.name.trim().is_empty() || record.font.trim().is_empty() {
                return Err(invalid("alias entries need a non-empty name and font"));
            }
            layer.add_alias(record.lang.as_deref(), Alias::new(&record.name, record.font));
        }
        for record in self.subst {
            if record.family.trim().is_empty() {
                return Err(invalid("subst entries need a non-empty family"));
            }
            if record.substitutes.is_empty() || record.substitutes.iter().any(|s| s.trim().is_empty()) {
                return Err(invalid("subst entries need non-empty substitute names"));
            }
            for substitute in &record.substitutes {
                layer.add_subst(&record.family, substitute);
            }
        }
        for font in &self.font {
            if font.family.trim().is_empty() {
                return Err(invalid("font entries need a non-empty family"));
            }
            layer.add_font(font);
        }
        Ok(layer)
    }
}

/// Encode a layer as the text written to its unit.
pub fn encode_layer(layer: &Layer) -> Result<String> {
    let body = toml::to_string_pretty(&LayerDocument::from_layer(layer))?;
    Ok(format!("{HEADER}{body}"))
}

/// Decode unit text into a layer; `path` is only used for error reporting.
pub fn decode_layer(key: LayerKey, text: &str, path: &Path) -> Result<Layer> {
    let document: LayerDocument = toml::from_str(text).map_err(|e| Error::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    document.into_layer(key, path)
}

/// A persisted layer unit on disk.
#[derive(Debug, Clone)]
pub struct LayerFile {
    key: LayerKey,
    path: PathBuf,
}

impl LayerFile {
    pub fn new(dir: &Path, key: LayerKey) -> Self {
        let path = dir.join(key.file_name());
        Self { key, path }
    }

    pub fn key(&self) -> &LayerKey {
        &self.key
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read and decode the unit.
    pub fn read(&self) -> Result<Layer> {
        let text = fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))?;
        decode_layer(self.key.clone(), &text, &self.path)
    }

    /// Replace the unit with `layer`, writing a temp file and renaming it over.
    pub fn write(&self, layer: &Layer) -> Result<()> {
        self.ensure_parent_dir()?;
        let text = encode_layer(layer)?;
        let temp_path = self.path.with_extension("toml.tmp");
        let mut file = File::create(&temp_path).map_err(|e| Error::io(&temp_path, e))?;
        let discard = |path: &Path, e: std::io::Error| {
            let _ = fs::remove_file(&temp_path);
            Error::io(path, e)
        };
        file.write_all(text.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| discard(&temp_path, e))?;
        drop(file);
        fs::rename(&temp_path, &self.path).map_err(|e| discard(&self.path, e))
    }

    /// Delete the unit; returns false if it did not exist.
    pub fn remove(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::io(&self.path, e)),
        }
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            if parent.exists() && !parent.is_dir() {
                return Err(Error::io(
                    parent,
                    std::io::Error::new(ErrorKind::AlreadyExists, "not a directory"),
                ));
            }
            create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        Ok(())
    }
}

/// Find layer units in `dir`, optionally only those named `name`, sorted by file name.
pub fn glob_layers(dir: &Path, name: Option<&str>) -> Result<Vec<LayerFile>> {
    if !dir.is_dir() {
        debug!("Config directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }
    let pattern = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = format!("{pattern}/{}", LayerKey::file_pattern(name));
    let paths = glob(&pattern).map_err(|e| Error::validation(format!("bad glob '{pattern}': {e}")))?;

    let mut files = Vec::new();
    for entry in paths {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };
        let Some(key) = path.file_name().and_then(|n| n.to_str()).and_then(LayerKey::from_file_name)
        else {
            debug!("Ignoring {}", path.display());
            continue;
        };
        if name.is_some() && key.name() != name {
            continue;
        }
        files.push(LayerFile { key, path });
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}
