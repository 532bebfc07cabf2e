//! Seams to the system font matcher and font files.
//!
//! The store never talks to the font database itself. Front ends hand it a
//! [`FontMatcher`] for listing candidates and a [`FeatureProvider`] for
//! inspecting OpenType features.

use log::debug;

use crate::{
    alias::canonical_alias_name,
    error::Result,
    store::ConfigStore,
};

/// Lists installed fonts the way the system matcher would pick them.
pub trait FontMatcher {
    /// Prepare the matcher; called once before any query.
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Family names matching `language` and `alias`, best match first.
    ///
    /// With `include_all` unset only families the matcher would actually
    /// pick are returned, otherwise the whole fallback list.
    fn list_fonts(
        &self,
        language: Option<&str>,
        alias: Option<&str>,
        include_all: bool,
    ) -> Result<Vec<String>>;

    /// Release matcher resources; called even if a query failed.
    fn shutdown(&mut self) {}
}

/// Reports OpenType feature tags a family's font file carries.
pub trait FeatureProvider {
    fn available_features(&self, family: &str) -> Result<Vec<String>>;
}

/// Run one listing query scoped by `init`/`shutdown`.
pub fn list_fonts<M>(
    matcher: &mut M,
    language: Option<&str>,
    alias: Option<&str>,
    include_all: bool,
) -> Result<Vec<String>>
where
    M: FontMatcher + ?Sized,
{
    let alias = alias.map(canonical_alias_name).filter(|a| !a.is_empty());
    let language = language.map(str::trim).filter(|l| !l.is_empty());
    debug!("Listing fonts for lang={language:?} alias={alias:?} all={include_all}");

    matcher.init()?;
    let result = matcher.list_fonts(language, alias.as_deref(), include_all);
    matcher.shutdown();
    result
}

/// Feature tags of a family next to those configured for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureReport {
    pub family: String,
    pub available: Vec<String>,
    pub configured: Vec<String>,
}

impl FeatureReport {
    /// Configured features the font does not provide.
    pub fn unsupported(&self) -> Vec<&str> {
        self.configured
            .iter()
            .filter(|f| !self.available.iter().any(|a| a == feature_tag(f)))
            .map(String::as_str)
            .collect()
    }
}

/// Strip a setting such as `ss01=0` or `-liga` down to its tag.
fn feature_tag(setting: &str) -> &str {
    let setting = setting.trim_start_matches(['+', '-']);
    setting.split(['=', '[']).next().unwrap_or(setting).trim()
}

/// Build a [`FeatureReport`] for `family` from the provider and resolved settings.
pub fn feature_report<P>(store: &ConfigStore, provider: &P, family: &str) -> Result<FeatureReport>
where
    P: FeatureProvider + ?Sized,
{
    let mut available = provider.available_features(family)?;
    available.sort();
    available.dedup();
    Ok(FeatureReport {
        family: family.to_owned(),
        available,
        configured: store.resolve_font(family).features,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::{error::Error, font::FontProperty};

    #[derive(Default)]
    struct FakeMatcher {
        initialized: bool,
        shutdowns: Cell<u32>,
        fail: bool,
        seen_alias: Cell<Option<String>>,
    }

    impl FontMatcher for FakeMatcher {
        fn init(&mut self) -> Result<()> {
            self.initialized = true;
            Ok(())
        }

        fn list_fonts(
            &self,
            language: Option<&str>,
            alias: Option<&str>,
            include_all: bool,
        ) -> Result<Vec<String>> {
            assert!(self.initialized);
            self.seen_alias.set(alias.map(str::to_owned));
            if self.fail {
                return Err(Error::Backend("no matcher".into()));
            }
            let mut fonts = vec![format!("{}-first", language.unwrap_or("any"))];
            if include_all {
                fonts.push("fallback".to_owned());
            }
            Ok(fonts)
        }

        fn shutdown(&mut self) {
            self.shutdowns.set(self.shutdowns.get() + 1);
        }
    }

    struct FakeFeatures;

    impl FeatureProvider for FakeFeatures {
        fn available_features(&self, _family: &str) -> Result<Vec<String>> {
            Ok(vec!["liga".into(), "kern".into(), "liga".into()])
        }
    }

    #[test]
    fn test_list_fonts_scopes_init_and_shutdown() {
        let mut matcher = FakeMatcher::default();
        let fonts = list_fonts(&mut matcher, Some("ja"), Some("sans"), true).unwrap();

        assert_eq!(fonts, ["ja-first", "fallback"]);
        assert_eq!(matcher.seen_alias.take().as_deref(), Some("sans-serif"));
        assert_eq!(matcher.shutdowns.get(), 1);
    }

    #[test]
    fn test_list_fonts_shuts_down_on_error() {
        let mut matcher = FakeMatcher { fail: true, ..Default::default() };
        assert!(matches!(list_fonts(&mut matcher, None, None, false), Err(Error::Backend(_))));
        assert_eq!(matcher.shutdowns.get(), 1);
    }

    #[test]
    fn test_feature_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ConfigStore::new().with_config_dir(dir.path());
        store
            .add_font(&FontProperty::new("Fira Code").with_feature("liga").with_feature("ss01=1"))
            .unwrap();

        let report = feature_report(&store, &FakeFeatures, "Fira Code").unwrap();
        assert_eq!(report.available, ["kern", "liga"]);
        assert_eq!(report.unsupported(), ["ss01=1"]);
    }

    #[test]
    fn test_feature_tag() {
        assert_eq!(feature_tag("-liga"), "liga");
        assert_eq!(feature_tag("ss01=0"), "ss01");
        assert_eq!(feature_tag("kern[3:5]"), "kern");
    }
}
