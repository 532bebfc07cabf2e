use anyhow::{Context, Result, bail};
use clap::Args;
use ezfc_core::{Alias, ConfigStore, FontProperty, HintStyle, Rgba, Subpixel, Tristate};

use super::{describe_font, language_label, load_or_empty};
use crate::cli::ConfigArgs;

#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    /// Set ALIAS as the alias font for the family
    #[arg(short, long)]
    pub alias: Option<String>,
    /// Language the alias is added for
    #[arg(short, long)]
    pub lang: Option<String>,
    /// Substitute fonts for the family
    #[arg(short, long, value_name = "SUBST", value_delimiter = ',')]
    pub subst: Vec<String>,
    /// Do not load the configuration file
    #[arg(long)]
    pub no_load: bool,
    #[arg(long, value_name = "BOOL", value_parser = Tristate::parse_flag)]
    pub hinting: Option<Tristate>,
    #[arg(long, value_name = "BOOL", value_parser = Tristate::parse_flag)]
    pub autohint: Option<Tristate>,
    #[arg(long, value_name = "BOOL", value_parser = Tristate::parse_flag)]
    pub antialias: Option<Tristate>,
    #[arg(long, value_name = "BOOL", value_parser = Tristate::parse_flag)]
    pub embeddedbitmap: Option<Tristate>,
    /// Subpixel order: unknown, rgb, bgr, vrgb, vbgr or none
    #[arg(long, value_name = "CONST")]
    pub rgba: Option<Rgba>,
    /// Anti-aliasing and subpixel order at once: none, gray, rgb, bgr, vrgb or vbgr
    #[arg(long, value_name = "MODE", conflicts_with_all = ["antialias", "rgba"])]
    pub subpixel: Option<Subpixel>,
    /// hintnone, hintslight, hintmedium or hintfull
    #[arg(long, value_name = "CONST")]
    pub hintstyle: Option<HintStyle>,
    /// OpenType feature settings appended for the family
    #[arg(long = "feature", value_name = "TAG", value_delimiter = ',')]
    pub features: Vec<String>,
    pub family: String,
}

impl AddArgs {
    pub fn run(&self, config: &ConfigArgs) -> Result<Vec<String>> {
        self.validate()?;
        let mut store = config.store()?;
        if !self.no_load {
            load_or_empty(&mut store)?;
        }
        let messages = self.apply(&mut store)?;
        store.save().context("Failed to save configuration")?;
        Ok(messages)
    }

    fn has_properties(&self) -> bool {
        [self.hinting, self.autohint, self.antialias, self.embeddedbitmap]
            .iter()
            .any(Option::is_some)
            || self.rgba.is_some()
            || self.subpixel.is_some()
            || self.hintstyle.is_some()
            || !self.features.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if self.family.trim().is_empty() {
            bail!("no font family given");
        }
        if self.alias.is_some() {
            if self.has_properties() {
                bail!(
                    "--alias can't be used with --hinting, --autohint, --antialias, \
                     --embeddedbitmap, --rgba, --subpixel, --hintstyle or --feature"
                );
            }
            if !self.subst.is_empty() {
                bail!("--alias can't be used with --subst");
            }
        } else if self.lang.is_some() {
            bail!("--lang has to be set with --alias option");
        } else if self.subst.is_empty() && !self.has_properties() {
            bail!("nothing to add for {}", self.family);
        }
        Ok(())
    }

    /// Apply the requested additions to the target layer of `store`.
    pub fn apply(&self, store: &mut ConfigStore) -> Result<Vec<String>> {
        let family = self.family.trim();
        let lang = self.lang.as_deref();

        if let Some(alias) = &self.alias {
            let alias = Alias::new(alias, family);
            let message = format!(
                "{family} has been added as the alias of {} for {}",
                alias.name(),
                language_label(lang)
            );
            store.add_alias(lang, alias)?;
            return Ok(vec![message]);
        }

        let mut messages = Vec::new();
        if !self.subst.is_empty() {
            for substitute in &self.subst {
                store.add_subst(family, substitute)?;
            }
            messages.push(format!("{} has been added as the subst of {family}", self.subst.join(",")));
        }
        if self.has_properties() {
            let prop = self.font_property(family);
            store.add_font(&prop)?;
            messages.extend(describe_font(&prop));
        }
        Ok(messages)
    }

    fn font_property(&self, family: &str) -> FontProperty {
        let mut prop = FontProperty {
            family: family.to_owned(),
            hinting: self.hinting.unwrap_or_default(),
            autohinting: self.autohint.unwrap_or_default(),
            antialiasing: self.antialias.unwrap_or_default(),
            embedded_bitmap: self.embeddedbitmap.unwrap_or_default(),
            rgba: self.rgba,
            hint_style: self.hintstyle,
            features: Vec::new(),
        };
        if let Some(mode) = self.subpixel {
            prop = prop.with_subpixel(mode);
        }
        for feature in self.features.iter().map(|f| f.trim()).filter(|f| !f.is_empty()) {
            prop.add_feature(feature);
        }
        prop
    }
}
