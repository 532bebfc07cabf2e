//! Font backend driving the fontconfig command line tools.
//!
//! `fc-list` enumerates installed faces and `fc-match` locates the file
//! behind a family name. Face classification and feature discovery read the
//! font files directly.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use ezfc_core::{Error, FeatureProvider, FontClass, FontMatcher, Result, classify};
use log::{debug, warn};
use read_fonts::{FontRef, TableProvider, tables::layout::FeatureList};

const LIST_FORMAT: &str = "%{file}\t%{index}\t%{spacing}\t%{family}\n";
const MATCH_FORMAT: &str = "%{file}\n%{index}\n%{family[0]}\n";

// fontconfig spacing constants
const FC_DUAL: i32 = 90;
const FC_MONO: i32 = 100;
const FC_CHARCELL: i32 = 110;

/// [`FontMatcher`] and [`FeatureProvider`] backed by `fc-list`/`fc-match`.
#[derive(Debug, Clone)]
pub struct Fontconfig {
    list_program: PathBuf,
    match_program: PathBuf,
}

impl Default for Fontconfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Fontconfig {
    pub fn new() -> Self {
        Self::with_programs("fc-list", "fc-match")
    }

    pub fn with_programs(list: impl Into<PathBuf>, matcher: impl Into<PathBuf>) -> Self {
        Self { list_program: list.into(), match_program: matcher.into() }
    }

    fn run(program: &Path, args: &[&str]) -> Result<String> {
        debug!("Running {} {}", program.display(), args.join(" "));
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| Error::Backend(format!("failed to run {}: {e}", program.display())))?;
        if !output.status.success() {
            return Err(Error::Backend(format!(
                "{} exited with {}: {}",
                program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl FontMatcher for Fontconfig {
    fn init(&mut self) -> Result<()> {
        Command::new(&self.list_program).arg("--version").output().map_err(|e| {
            Error::Backend(format!("{} is not available: {e}", self.list_program.display()))
        })?;
        Ok(())
    }

    fn list_fonts(
        &self,
        language: Option<&str>,
        alias: Option<&str>,
        include_all: bool,
    ) -> Result<Vec<String>> {
        let wanted = alias
            .map(|a| {
                FontClass::from_alias(a)
                    .ok_or_else(|| Error::Validation(format!("{a} is not a generic family")))
            })
            .transpose()?;
        let pattern = match language {
            Some(lang) => format!(":lang={}", escape_pattern(lang)),
            None => ":".to_owned(),
        };
        let output = Self::run(&self.list_program, &["-f", LIST_FORMAT, pattern.as_str()])?;

        let mut families = BTreeSet::new();
        for face in output.lines().filter_map(FaceEntry::parse) {
            if let Some(wanted) = wanted
                && !face.class().contains(wanted)
            {
                continue;
            }
            if include_all {
                families.extend(face.families);
            } else {
                families.extend(face.families.into_iter().next());
            }
        }
        Ok(families.into_iter().collect())
    }

    fn shutdown(&mut self) {
        debug!("Done with {}", self.list_program.display());
    }
}

impl FeatureProvider for Fontconfig {
    fn available_features(&self, family: &str) -> Result<Vec<String>> {
        let output = Self::run(&self.match_program, &["-f", MATCH_FORMAT, escape_pattern(family).as_str()])?;
        let mut lines = output.lines();
        let file = lines
            .next()
            .filter(|l| !l.is_empty())
            .ok_or_else(|| Error::Backend(format!("no font matches {family}")))?;
        let index = lines.next().and_then(|i| i.trim().parse().ok()).unwrap_or(0);
        if let Some(matched) = lines.next()
            && !matched.eq_ignore_ascii_case(family)
        {
            warn!("{family} is not installed; showing the features of {matched}");
        }

        let data = fs::read(file).map_err(|e| Error::Backend(format!("failed to read {file}: {e}")))?;
        let font = FontRef::from_index(&data, index)
            .map_err(|e| Error::Backend(format!("failed to parse {file}: {e}")))?;
        Ok(feature_tags(&font))
    }
}

/// GSUB then GPOS feature tags, de-duplicated in order.
fn feature_tags(font: &FontRef) -> Vec<String> {
    let gsub = font.gsub().ok().and_then(|t| t.feature_list().ok());
    let gpos = font.gpos().ok().and_then(|t| t.feature_list().ok());

    let mut tags = Vec::new();
    for list in [gsub, gpos].into_iter().flatten() {
        push_tags(&list, &mut tags);
    }
    tags
}

fn push_tags(list: &FeatureList, tags: &mut Vec<String>) {
    for record in list.feature_records() {
        let tag = record.feature_tag().to_string();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
}

/// One face as reported by `fc-list`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FaceEntry {
    file: PathBuf,
    index: u32,
    monospaced: bool,
    families: Vec<String>,
}

impl FaceEntry {
    fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split('\t');
        let file = fields.next().filter(|f| !f.is_empty())?;
        let index = fields.next()?.trim().parse().unwrap_or(0);
        let spacing = fields.next()?.trim().parse::<i32>().ok();
        let families = split_values(fields.next()?);
        if families.is_empty() {
            return None;
        }
        Some(Self {
            file: file.into(),
            index,
            monospaced: matches!(spacing, Some(FC_DUAL | FC_MONO | FC_CHARCELL)),
            families,
        })
    }

    fn spacing_class(&self) -> FontClass {
        if self.monospaced { FontClass::MONOSPACE } else { FontClass::UNKNOWN }
    }

    /// Classify from the OS/2 table, falling back to spacing alone.
    fn class(&self) -> FontClass {
        let data = match fs::read(&self.file) {
            Ok(data) => data,
            Err(e) => {
                debug!("Cannot read {}: {e}", self.file.display());
                return self.spacing_class();
            }
        };
        let os2 = FontRef::from_index(&data, self.index).ok().and_then(|font| font.os2().ok());
        match os2 {
            Some(os2) => classify(self.monospaced, os2.s_family_class(), os2.panose_10()),
            None => self.spacing_class(),
        }
    }
}

/// Split a fontconfig value list on unescaped commas.
fn split_values(list: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut chars = list.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => current.extend(chars.next()),
            ',' => values.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    values.push(current);
    values.into_iter().map(|v| v.trim().to_owned()).filter(|v| !v.is_empty()).collect()
}

/// Escape characters fontconfig treats as pattern syntax.
fn escape_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '-' | ':' | ',') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_face_entry() {
        let face = FaceEntry::parse(
            "/usr/share/fonts/noto/NotoSansCJK.ttc\t2\t\tNoto Sans CJK JP,Noto Sans CJK JP Regular",
        )
        .unwrap();
        assert_eq!(face.index, 2);
        assert!(!face.monospaced);
        assert_eq!(face.families, ["Noto Sans CJK JP", "Noto Sans CJK JP Regular"]);

        let mono = FaceEntry::parse("/fonts/DejaVuSansMono.ttf\t0\t100\tDejaVu Sans Mono").unwrap();
        assert!(mono.monospaced);
        assert_eq!(mono.spacing_class(), FontClass::MONOSPACE);
    }

    #[test]
    fn test_parse_rejects_incomplete_lines() {
        assert!(FaceEntry::parse("").is_none());
        assert!(FaceEntry::parse("/fonts/a.ttf\t0").is_none());
        assert!(FaceEntry::parse("/fonts/a.ttf\t0\t\t").is_none());
    }

    #[test]
    fn test_unreadable_face_uses_spacing_only() {
        let face = FaceEntry::parse("/nonexistent/mono.ttf\t0\t100\tMono").unwrap();
        assert_eq!(face.class(), FontClass::MONOSPACE);
    }

    #[test]
    fn test_split_values() {
        assert_eq!(split_values(r"Foo\, Inc,Bar"), ["Foo, Inc", "Bar"]);
        assert_eq!(split_values(" A ,,B"), ["A", "B"]);
    }

    #[test]
    fn test_escape_pattern() {
        assert_eq!(escape_pattern("zh-tw"), r"zh\-tw");
        assert_eq!(escape_pattern("Noto Sans"), "Noto Sans");
    }

    #[test]
    fn test_missing_program_is_backend_error() {
        let mut fc = Fontconfig::with_programs("/nonexistent/fc-list", "/nonexistent/fc-match");
        assert!(matches!(fc.init(), Err(Error::Backend(_))));
        assert!(matches!(fc.available_features("Sans"), Err(Error::Backend(_))));
    }
}
