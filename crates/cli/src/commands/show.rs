use std::collections::BTreeSet;

use anyhow::{Context, Result, bail};
use clap::Args;
use ezfc_core::{ConfigStore, FeatureProvider, feature_report};
use log::warn;

use super::{describe_font, language_arg, language_label, load_existing, load_or_empty};
use crate::{cli::ConfigArgs, fontconfig::Fontconfig};

#[derive(Debug, Clone, Args)]
pub struct ShowArgs {
    /// Display aliases, optionally only those for LANG or one ALIAS of LANG
    #[arg(short, long, conflicts_with = "feature")]
    pub alias: bool,
    /// Display the available and configured features of a font
    #[arg(short, long)]
    pub feature: bool,
    #[arg(value_name = "ARGS", num_args = 0..=2)]
    pub args: Vec<String>,
}

impl ShowArgs {
    pub fn run(&self, config: &ConfigArgs) -> Result<Vec<String>> {
        let mut store = config.store()?;
        if self.feature {
            load_or_empty(&mut store)?;
        } else {
            load_existing(&mut store)?;
        }
        self.render(&store, &Fontconfig::new())
    }

    pub fn render(&self, store: &ConfigStore, features: &dyn FeatureProvider) -> Result<Vec<String>> {
        if self.args.len() > 2 {
            bail!("too many arguments");
        }
        if self.alias {
            self.render_aliases(store)
        } else if self.feature {
            self.render_features(store, features)
        } else {
            self.render_fonts(store)
        }
    }

    fn render_aliases(&self, store: &ConfigStore) -> Result<Vec<String>> {
        let Some(lang) = self.args.first() else {
            let mut lines = Vec::new();
            for (lang, aliases) in store.dump() {
                lines.push(format!("{}:", language_label(lang.as_deref())));
                lines.extend(aliases.iter().map(|a| format!("  {}: {}", a.name(), a.font())));
            }
            return Ok(lines);
        };

        let aliases = store.resolve_aliases(language_arg(lang));
        if aliases.is_empty() {
            bail!("no aliases defined for {lang}");
        }
        match self.args.get(1) {
            None => Ok(aliases.iter().map(|a| format!("{}: {}", a.name(), a.font())).collect()),
            Some(name) => store
                .resolve_alias(language_arg(lang), name)
                .map(|a| vec![a.font().to_owned()])
                .with_context(|| format!("no such alias for {lang}: {name}")),
        }
    }

    fn render_features(&self, store: &ConfigStore, features: &dyn FeatureProvider) -> Result<Vec<String>> {
        let [family] = self.args.as_slice() else {
            bail!("no font specified to look up");
        };
        let report = feature_report(store, features, family)
            .with_context(|| format!("Failed to look up features of {family}"))?;
        let unsupported = report.unsupported();
        if !unsupported.is_empty() {
            warn!("{family} does not provide {}", unsupported.join(", "));
        }
        Ok(vec![
            format!("Available features: {}", report.available.join(" ")),
            format!("Configured features: {}", report.configured.join(" ")),
        ])
    }

    fn render_fonts(&self, store: &ConfigStore) -> Result<Vec<String>> {
        let families: Vec<String> = match self.args.as_slice() {
            [] => {
                let all: BTreeSet<_> =
                    store.font_families().into_iter().chain(store.subst_families()).collect();
                if all.is_empty() {
                    bail!("no font properties or substitutes defined");
                }
                all.into_iter().collect()
            }
            [family] => vec![family.clone()],
            _ => bail!("only one font can be shown at a time"),
        };

        let mut lines = Vec::new();
        for family in &families {
            let settings = describe_font(&store.resolve_font(family));
            let substs = store.resolve_substs(family);
            if settings.is_empty() && substs.is_empty() {
                bail!("nothing configured for {family}");
            }
            lines.push(format!("{family}:"));
            lines.extend(settings.into_iter().map(|s| format!("  {s}")));
            if !substs.is_empty() {
                lines.push(format!("  substitutes: {}", substs.join(", ")));
            }
        }
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use ezfc_core::{Alias, FontProperty};

    use super::*;
    use crate::cli::{Cli, Commands};

    struct StaticFeatures;

    impl FeatureProvider for StaticFeatures {
        fn available_features(&self, _family: &str) -> ezfc_core::Result<Vec<String>> {
            Ok(vec!["liga".into(), "calt".into()])
        }
    }

    fn parse(args: &[&str]) -> ShowArgs {
        let cli = Cli::try_parse_from(["ezfc-tool", "show"].iter().chain(args)).unwrap();
        match cli.command {
            Commands::Show(args) => args,
            _ => unreachable!(),
        }
    }

    fn store() -> ConfigStore {
        let mut store = ConfigStore::new();
        store.add_alias(None, Alias::new("monospace", "DejaVu Sans Mono")).unwrap();
        store.add_alias(Some("ja"), Alias::new("serif", "Noto Serif CJK JP")).unwrap();
        store.add_alias(Some("ja"), Alias::new("sans", "Noto Sans CJK JP")).unwrap();
        store.add_subst("Arial", "Arimo").unwrap();
        store
            .add_font(&FontProperty::new("Fira Code").with_antialiasing(true).with_feature("liga"))
            .unwrap();
        store
    }

    fn render(args: &[&str]) -> Result<Vec<String>> {
        parse(args).render(&store(), &StaticFeatures)
    }

    #[test]
    fn test_dump_aliases() {
        assert_eq!(
            render(&["-a"]).unwrap(),
            [
                "<any>:",
                "  monospace: DejaVu Sans Mono",
                "ja:",
                "  sans-serif: Noto Sans CJK JP",
                "  serif: Noto Serif CJK JP",
            ]
        );
    }

    #[test]
    fn test_aliases_for_language() {
        assert_eq!(render(&["-a", "<any>"]).unwrap(), ["monospace: DejaVu Sans Mono"]);
        assert_eq!(render(&["-a", "ja", "sans"]).unwrap(), ["Noto Sans CJK JP"]);
        let err = render(&["-a", "ko"]).unwrap_err();
        assert_eq!(err.to_string(), "no aliases defined for ko");
        let err = render(&["-a", "ja", "cursive"]).unwrap_err();
        assert_eq!(err.to_string(), "no such alias for ja: cursive");
    }

    #[test]
    fn test_features() {
        assert_eq!(
            render(&["-f", "Fira Code"]).unwrap(),
            ["Available features: calt liga", "Configured features: liga"]
        );
        assert!(render(&["-f"]).is_err());
    }

    #[test]
    fn test_font_settings() {
        assert_eq!(
            render(&[]).unwrap(),
            [
                "Arial:",
                "  substitutes: Arimo",
                "Fira Code:",
                "  anti-aliasing is enabled for Fira Code",
                "  features liga are set for Fira Code",
            ]
        );
        assert!(render(&["Helvetica"]).is_err());
    }
}
