//! Per-family rendering property overrides.

use serde::{Deserialize, Serialize};

use crate::types::{HintStyle, Rgba, Subpixel, Tristate};

/// Rendering overrides for one font family.
///
/// Every field is optional; an unset field inherits from lower-priority
/// layers. `features` lists OpenType feature settings appended for the
/// family (e.g. `liga`, `ss01`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontProperty {
    pub family: String,
    #[serde(default, skip_serializing_if = "Tristate::is_unset")]
    pub hinting: Tristate,
    #[serde(default, rename = "autohint", skip_serializing_if = "Tristate::is_unset")]
    pub autohinting: Tristate,
    #[serde(default, rename = "antialias", skip_serializing_if = "Tristate::is_unset")]
    pub antialiasing: Tristate,
    #[serde(default, rename = "embeddedbitmap", skip_serializing_if = "Tristate::is_unset")]
    pub embedded_bitmap: Tristate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rgba: Option<Rgba>,
    #[serde(default, rename = "hintstyle", skip_serializing_if = "Option::is_none")]
    pub hint_style: Option<HintStyle>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl FontProperty {
    pub fn new(family: impl Into<String>) -> Self {
        Self { family: family.into(), ..Default::default() }
    }

    pub fn with_hinting(mut self, on: bool) -> Self {
        self.hinting = on.into();
        self
    }

    pub fn with_autohinting(mut self, on: bool) -> Self {
        self.autohinting = on.into();
        self
    }

    pub fn with_antialiasing(mut self, on: bool) -> Self {
        self.antialiasing = on.into();
        self
    }

    pub fn with_embedded_bitmap(mut self, on: bool) -> Self {
        self.embedded_bitmap = on.into();
        self
    }

    pub fn with_rgba(mut self, rgba: Rgba) -> Self {
        self.rgba = Some(rgba);
        self
    }

    /// Set anti-aliasing and the subpixel order together.
    pub fn with_subpixel(mut self, mode: Subpixel) -> Self {
        let (antialias, rgba) = mode.settings();
        self.antialiasing = antialias.into();
        self.rgba = Some(rgba);
        self
    }

    pub fn subpixel(&self) -> Option<Subpixel> {
        Subpixel::from_settings(self.antialiasing, self.rgba)
    }

    pub fn with_hint_style(mut self, style: HintStyle) -> Self {
        self.hint_style = Some(style);
        self
    }

    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.add_feature(feature);
        self
    }

    /// Append a feature setting; returns false if it was already present.
    pub fn add_feature(&mut self, feature: impl Into<String>) -> bool {
        let feature = feature.into();
        if self.features.contains(&feature) {
            return false;
        }
        self.features.push(feature);
        true
    }

    pub fn remove_feature(&mut self, feature: &str) -> bool {
        let before = self.features.len();
        self.features.retain(|f| f != feature);
        self.features.len() != before
    }

    /// True when at least one property or feature is configured.
    pub fn has_settings(&self) -> bool {
        [self.hinting, self.autohinting, self.antialiasing, self.embedded_bitmap]
            .iter()
            .any(Tristate::is_set)
            || self.rgba.is_some()
            || self.hint_style.is_some()
            || !self.features.is_empty()
    }

    /// Overwrite fields with every value `overlay` sets; features are appended.
    pub fn merge(&mut self, overlay: &FontProperty) {
        self.hinting = overlay.hinting.or(self.hinting);
        self.autohinting = overlay.autohinting.or(self.autohinting);
        self.antialiasing = overlay.antialiasing.or(self.antialiasing);
        self.embedded_bitmap = overlay.embedded_bitmap.or(self.embedded_bitmap);
        self.rgba = overlay.rgba.or(self.rgba);
        self.hint_style = overlay.hint_style.or(self.hint_style);
        for feature in &overlay.features {
            self.add_feature(feature.clone());
        }
    }

    /// Fill only the fields still unset from a lower-priority record.
    pub fn inherit(&mut self, lower: &FontProperty) {
        self.hinting = self.hinting.or(lower.hinting);
        self.autohinting = self.autohinting.or(lower.autohinting);
        self.antialiasing = self.antialiasing.or(lower.antialiasing);
        self.embedded_bitmap = self.embedded_bitmap.or(lower.embedded_bitmap);
        self.rgba = self.rgba.or(lower.rgba);
        self.hint_style = self.hint_style.or(lower.hint_style);
        for feature in &lower.features {
            self.add_feature(feature.clone());
        }
    }
}
