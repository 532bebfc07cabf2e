//! Guess which generic families a face belongs to from its OS/2 metadata.

use std::fmt::{self, Display, Formatter};

use crate::alias::canonical_alias_name;

/// Set of generic families a face can stand in for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FontClass(u8);

impl FontClass {
    pub const UNKNOWN: Self = Self(0);
    pub const SANS_SERIF: Self = Self(1);
    pub const SERIF: Self = Self(1 << 1);
    pub const MONOSPACE: Self = Self(1 << 2);
    pub const CURSIVE: Self = Self(1 << 3);
    pub const FANTASY: Self = Self(1 << 4);

    const NAMED: [(Self, &'static str); 5] = [
        (Self::SANS_SERIF, "sans-serif"),
        (Self::SERIF, "serif"),
        (Self::MONOSPACE, "monospace"),
        (Self::CURSIVE, "cursive"),
        (Self::FANTASY, "fantasy"),
    ];

    /// Class of a generic family name; `None` for anything else.
    pub fn from_alias(name: &str) -> Option<Self> {
        let name = canonical_alias_name(name);
        Self::NAMED.iter().find(|(_, n)| n.eq_ignore_ascii_case(&name)).map(|(c, _)| *c)
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_unknown(self) -> bool {
        self.0 == 0
    }

    /// Generic family names in this set.
    pub fn alias_names(self) -> Vec<&'static str> {
        Self::NAMED.iter().filter(|(c, _)| self.contains(*c)).map(|(_, n)| *n).collect()
    }

    /// True when a face of this class may serve `alias`. Non-generic names never match.
    pub fn matches_alias(self, alias: &str) -> bool {
        Self::from_alias(alias).is_some_and(|class| !self.is_unknown() && self.contains(class))
    }
}

impl std::ops::BitOr for FontClass {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for FontClass {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl Display for FontClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            return f.write_str("unknown");
        }
        f.write_str(&self.alias_names().join(","))
    }
}

/// Classify a face.
///
/// `monospaced` comes from the matcher's spacing property, `family_class`
/// is OS/2 `sFamilyClass` and `panose` the 10-byte OS/2 PANOSE block.
pub fn classify(monospaced: bool, family_class: i16, panose: &[u8]) -> FontClass {
    let mut class = if monospaced { FontClass::MONOSPACE } else { FontClass::UNKNOWN };

    let [class_id, subclass_id] = family_class.to_be_bytes();
    match class_id {
        1 => {
            class |= FontClass::SERIF;
            // Calligraphic
            if subclass_id == 8 {
                class |= FontClass::CURSIVE;
            }
        }
        2 | 3 => {
            class |= FontClass::SERIF;
            // Script
            if subclass_id == 2 {
                class |= FontClass::CURSIVE;
            }
        }
        4 | 5 | 7 => class |= FontClass::SERIF,
        8 => class |= FontClass::SANS_SERIF,
        9 | 12 => class |= FontClass::FANTASY,
        10 => class |= FontClass::CURSIVE,
        _ => {}
    }

    let byte = |i: usize| panose.get(i).copied().unwrap_or(0);
    let (kind, serif_style, proportion) = (byte(0), byte(1), byte(3));
    match kind {
        3 => class |= FontClass::CURSIVE,
        4 | 5 => class |= FontClass::FANTASY,
        2 if matches!(serif_style, 11..=13 | 15) => class |= FontClass::SANS_SERIF,
        // "No fit", or nothing known at all
        1 => {}
        0 if serif_style == 1 => {}
        _ => class |= FontClass::SERIF,
    }

    if matches!((kind, proportion), (2, 9) | (3, 3) | (4, 9) | (5, 3)) {
        class |= FontClass::MONOSPACE;
    }
    class
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sans_serif_from_family_class() {
        // sFamilyClass 8/1, PANOSE Latin Text + Normal Sans
        let class = classify(false, 0x0801, &[2, 11, 5, 3, 0, 0, 0, 0, 0, 0]);
        assert_eq!(class, FontClass::SANS_SERIF);
        assert!(class.matches_alias("sans"));
        assert!(!class.matches_alias("serif"));
    }

    #[test]
    fn test_monospace_from_panose_proportion() {
        let class = classify(false, 0, &[2, 11, 6, 9, 0, 0, 0, 0, 0, 0]);
        assert!(class.contains(FontClass::MONOSPACE | FontClass::SANS_SERIF));
        assert_eq!(class.to_string(), "sans-serif,monospace");
    }

    #[test]
    fn test_calligraphic_oldstyle_is_cursive_serif() {
        let class = classify(false, 0x0108, &[0, 1, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(class, FontClass::SERIF | FontClass::CURSIVE);
    }

    #[test]
    fn test_unknown_face() {
        let class = classify(false, 0, &[0, 1]);
        assert!(class.is_unknown());
        assert!(!class.matches_alias("serif"));
        assert!(!classify(true, 0, &[]).is_unknown());
    }

    #[test]
    fn test_decorative_is_fantasy() {
        assert!(classify(false, 0, &[4, 0, 0, 0]).contains(FontClass::FANTASY));
        assert!(classify(false, 0x0C00, &[1]).matches_alias("fantasy"));
    }

    #[test]
    fn test_from_alias() {
        assert_eq!(FontClass::from_alias("Sans"), Some(FontClass::SANS_SERIF));
        assert_eq!(FontClass::from_alias("Arial"), None);
    }
}
