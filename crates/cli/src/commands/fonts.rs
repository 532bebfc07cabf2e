use anyhow::{Context, Result, bail};
use clap::Args;
use ezfc_core::{FontMatcher, GENERIC_FAMILIES, is_generic_family, list_fonts};

use super::language_label;
use crate::fontconfig::Fontconfig;

#[derive(Debug, Clone, Args)]
pub struct FontsArgs {
    /// Only list fonts usable as ALIAS
    #[arg(short, long)]
    pub alias: Option<String>,
    /// Only list fonts supporting LANG
    #[arg(short, long)]
    pub lang: Option<String>,
    /// Include localized family names
    #[arg(long)]
    pub all: bool,
}

impl FontsArgs {
    pub fn run(&self) -> Result<Vec<String>> {
        self.render(&mut Fontconfig::new())
    }

    pub fn render(&self, matcher: &mut dyn FontMatcher) -> Result<Vec<String>> {
        let alias = self.alias.as_deref();
        if let Some(alias) = alias
            && !is_generic_family(alias)
        {
            bail!("{alias} is not one of {}", GENERIC_FAMILIES.join(", "));
        }
        let lang = self.lang.as_deref();
        let fonts = list_fonts(matcher, lang, alias, self.all).context("Failed to list fonts")?;

        let mut lines = vec![format!("{} (lang={}):", language_label(alias), language_label(lang))];
        lines.extend(fonts.iter().map(|f| format!("  {f}")));
        Ok(lines)
    }
}
