use anyhow::{Context, Result, bail};
use clap::{ArgGroup, Args};
use ezfc_core::ConfigStore;

use super::{language_label, load_existing};
use crate::cli::ConfigArgs;

#[derive(Debug, Clone, Args)]
#[command(group(
    ArgGroup::new("mode").required(true).args(["alias", "prop", "feature", "subst", "all_substs"])
))]
pub struct RemoveArgs {
    /// Remove the alias NAME
    #[arg(short, long)]
    pub alias: bool,
    /// Remove the font properties of NAME
    #[arg(short, long)]
    pub prop: bool,
    /// Remove the feature setting TAG from the font properties of NAME
    #[arg(long, value_name = "TAG")]
    pub feature: Option<String>,
    /// Remove SUBST from the substitute fonts of NAME
    #[arg(short, long, value_name = "SUBST")]
    pub subst: Option<String>,
    /// Remove every substitute font of NAME
    #[arg(long)]
    pub all_substs: bool,
    /// Language the alias is removed from
    #[arg(short, long)]
    pub lang: Option<String>,
    /// With --alias, every alias of the language; with --prop, every font
    #[arg(long, conflicts_with_all = ["feature", "subst", "all_substs", "name"])]
    pub all: bool,
    /// Alias name for --alias, font family otherwise
    #[arg(required_unless_present = "all")]
    pub name: Option<String>,
}

impl RemoveArgs {
    pub fn run(&self, config: &ConfigArgs) -> Result<Vec<String>> {
        self.validate()?;
        let mut store = config.store()?;
        load_existing(&mut store)?;
        let message = self.apply(&mut store)?;
        store.save().context("Failed to save configuration")?;
        Ok(vec![message])
    }

    pub fn validate(&self) -> Result<()> {
        if self.lang.is_some() && !self.alias {
            bail!("--lang has to be set with --alias option");
        }
        Ok(())
    }

    fn name(&self) -> Result<&str> {
        self.name.as_deref().context("no font or alias name given")
    }

    /// Apply the removal to the target layer; the message reports whether anything changed.
    pub fn apply(&self, store: &mut ConfigStore) -> Result<String> {
        let lang = self.lang.as_deref();
        let label = language_label(lang);

        let message = if self.alias && self.all {
            if store.remove_aliases(lang) {
                format!("All aliases have been removed from {label}")
            } else {
                format!("Unable to remove aliases from {label}")
            }
        } else if self.alias {
            let name = self.name()?;
            if store.remove_alias(lang, name) {
                format!("{name} has been removed from {label}")
            } else {
                format!("Unable to remove {name} from {label}")
            }
        } else if self.prop && self.all {
            if store.remove_fonts() {
                "Properties have been removed for all fonts".to_owned()
            } else {
                "Unable to remove the properties: none defined".to_owned()
            }
        } else if self.prop {
            let name = self.name()?;
            if store.remove_font(name) {
                format!("Properties have been removed for {name}")
            } else {
                format!("Unable to remove the properties for {name}")
            }
        } else if let Some(feature) = &self.feature {
            let name = self.name()?;
            if store.remove_feature(name, feature) {
                format!("{feature} has been removed from the features of {name}")
            } else {
                format!("Unable to remove {feature} from the features of {name}")
            }
        } else if let Some(subst) = &self.subst {
            let name = self.name()?;
            if store.remove_subst(name, subst) {
                format!("{subst} has been removed from {name}")
            } else {
                format!("Unable to remove {subst} from {name}")
            }
        } else {
            let name = self.name()?;
            if store.remove_substs(name) {
                format!("Substitutes have been removed from {name}")
            } else {
                format!("Unable to remove the substitutes of {name}")
            }
        };
        Ok(message)
    }
}
