//! Value types for per-font rendering properties.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A boolean property that may be left unset.
///
/// `Unset` means "inherit from a lower-priority layer", which is distinct
/// from an explicit `False`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Tristate {
    #[default]
    Unset,
    True,
    False,
}

impl Tristate {
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    pub const fn is_set(&self) -> bool {
        !self.is_unset()
    }

    pub const fn get(self) -> Option<bool> {
        match self {
            Self::Unset => None,
            Self::True => Some(true),
            Self::False => Some(false),
        }
    }

    /// Returns `self` when set, otherwise `fallback`.
    pub const fn or(self, fallback: Self) -> Self {
        match self {
            Self::Unset => fallback,
            set => set,
        }
    }

    /// Parse a user-supplied boolean (`true/yes/on/1`, `false/no/off/0`).
    pub fn parse_flag(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(Self::True),
            "false" | "no" | "off" | "0" => Ok(Self::False),
            other => Err(Error::validation(format!("invalid boolean value: '{other}'"))),
        }
    }
}

impl From<bool> for Tristate {
    fn from(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }
}

impl From<Option<bool>> for Tristate {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Unset, Self::from)
    }
}

impl From<Tristate> for Option<bool> {
    fn from(value: Tristate) -> Self {
        value.get()
    }
}

impl Display for Tristate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str("unset"),
            Self::True => f.write_str("enabled"),
            Self::False => f.write_str("disabled"),
        }
    }
}

/// Subpixel layout of the output device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rgba {
    Unknown,
    Rgb,
    Bgr,
    Vrgb,
    Vbgr,
    None,
}

impl Rgba {
    pub const ALL: [Self; 6] =
        [Self::Unknown, Self::Rgb, Self::Bgr, Self::Vrgb, Self::Vbgr, Self::None];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Rgb => "rgb",
            Self::Bgr => "bgr",
            Self::Vrgb => "vrgb",
            Self::Vbgr => "vbgr",
            Self::None => "none",
        }
    }
}

impl FromStr for Rgba {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::validation(format!(
                    "invalid rgba '{s}', expected one of: {}",
                    Self::ALL.map(Self::as_str).join(", ")
                ))
            })
    }
}

impl Display for Rgba {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Amount of hinting applied by the rasterizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintStyle {
    HintNone,
    HintSlight,
    HintMedium,
    HintFull,
}

impl HintStyle {
    pub const ALL: [Self; 4] = [Self::HintNone, Self::HintSlight, Self::HintMedium, Self::HintFull];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HintNone => "hintnone",
            Self::HintSlight => "hintslight",
            Self::HintMedium => "hintmedium",
            Self::HintFull => "hintfull",
        }
    }
}

impl FromStr for HintStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::validation(format!(
                    "invalid hintstyle '{s}', expected one of: {}",
                    Self::ALL.map(Self::as_str).join(", ")
                ))
            })
    }
}

impl Display for HintStyle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combined anti-aliasing and subpixel order, as offered by desktop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subpixel {
    /// No anti-aliasing at all.
    None,
    /// Grayscale anti-aliasing.
    Gray,
    Rgb,
    Bgr,
    Vrgb,
    Vbgr,
}

impl Subpixel {
    pub const ALL: [Self; 6] =
        [Self::None, Self::Gray, Self::Rgb, Self::Bgr, Self::Vrgb, Self::Vbgr];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gray => "gray",
            Self::Rgb => "rgb",
            Self::Bgr => "bgr",
            Self::Vrgb => "vrgb",
            Self::Vbgr => "vbgr",
        }
    }

    /// The anti-aliasing switch and subpixel order this mode stands for.
    pub const fn settings(self) -> (bool, Rgba) {
        match self {
            Self::None => (false, Rgba::None),
            Self::Gray => (true, Rgba::None),
            Self::Rgb => (true, Rgba::Rgb),
            Self::Bgr => (true, Rgba::Bgr),
            Self::Vrgb => (true, Rgba::Vrgb),
            Self::Vbgr => (true, Rgba::Vbgr),
        }
    }

    /// Inverse of [`Subpixel::settings`]; `None` for unset or unknown combinations.
    pub fn from_settings(antialias: Tristate, rgba: Option<Rgba>) -> Option<Self> {
        let antialias = antialias.get()?;
        let rgba = rgba.unwrap_or(Rgba::None);
        Self::ALL.into_iter().find(|mode| mode.settings() == (antialias, rgba))
    }
}

impl FromStr for Subpixel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::validation(format!(
                    "invalid subpixel mode '{s}', expected one of: {}",
                    Self::ALL.map(Self::as_str).join(", ")
                ))
            })
    }
}

impl Display for Subpixel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tristate_or_falls_through_only_when_unset() {
        assert_eq!(Tristate::Unset.or(Tristate::True), Tristate::True);
        assert_eq!(Tristate::False.or(Tristate::True), Tristate::False);
        assert_eq!(Tristate::Unset.or(Tristate::Unset), Tristate::Unset);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(Tristate::parse_flag("Yes").unwrap(), Tristate::True);
        assert_eq!(Tristate::parse_flag("1").unwrap(), Tristate::True);
        assert_eq!(Tristate::parse_flag("off").unwrap(), Tristate::False);
        assert!(matches!(Tristate::parse_flag("maybe"), Err(Error::Validation(_))));
    }

    #[test]
    fn test_rgba_parse_is_case_insensitive() {
        assert_eq!("VRGB".parse::<Rgba>().unwrap(), Rgba::Vrgb);
        assert_eq!("none".parse::<Rgba>().unwrap(), Rgba::None);
    }

    #[test]
    fn test_unknown_constants_are_rejected() {
        assert!(matches!("rgbx".parse::<Rgba>(), Err(Error::Validation(_))));
        assert!(matches!("slight".parse::<HintStyle>(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_hintstyle_display_matches_parse() {
        for style in HintStyle::ALL {
            assert_eq!(style.to_string().parse::<HintStyle>().unwrap(), style);
        }
    }

    #[test]
    fn test_subpixel_settings() {
        assert_eq!(Subpixel::None.settings(), (false, Rgba::None));
        assert_eq!(Subpixel::Gray.settings(), (true, Rgba::None));
        assert_eq!("BGR".parse::<Subpixel>().unwrap().settings(), (true, Rgba::Bgr));
        assert!(matches!("lcd".parse::<Subpixel>(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_subpixel_from_settings() {
        assert_eq!(Subpixel::from_settings(Tristate::True, None), Some(Subpixel::Gray));
        assert_eq!(Subpixel::from_settings(Tristate::True, Some(Rgba::Vrgb)), Some(Subpixel::Vrgb));
        assert_eq!(Subpixel::from_settings(Tristate::Unset, Some(Rgba::Rgb)), None);
        assert_eq!(Subpixel::from_settings(Tristate::False, Some(Rgba::Rgb)), None);
        assert_eq!(Subpixel::from_settings(Tristate::True, Some(Rgba::Unknown)), None);
    }
}
