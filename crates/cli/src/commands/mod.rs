//! CLI command implementations.

mod add;
mod fonts;
mod remove;
mod show;

pub use add::AddArgs;
pub use fonts::FontsArgs;
pub use remove::RemoveArgs;
pub use show::ShowArgs;

use anyhow::{Context, Result, bail};
use ezfc_core::{ConfigStore, FontProperty};
use log::debug;

const NO_CONFIG: &str = "no configuration file available";

/// Label printed for the any-language alias group.
pub(crate) const ANY_LANGUAGE: &str = "<any>";

pub(crate) fn language_label(language: Option<&str>) -> &str {
    language.unwrap_or(ANY_LANGUAGE)
}

/// Map a language argument back to a key; the printed label means "any".
pub(crate) fn language_arg(arg: &str) -> Option<&str> {
    Some(arg).filter(|a| *a != ANY_LANGUAGE && !a.trim().is_empty())
}

/// Load the store, starting empty when nothing is persisted yet.
pub(crate) fn load_or_empty(store: &mut ConfigStore) -> Result<()> {
    match store.load() {
        Ok(()) => Ok(()),
        Err(e) if e.is_not_found() => {
            debug!("{e}; starting with an empty layer");
            Ok(())
        }
        Err(e) => Err(e).context("Failed to load configuration"),
    }
}

/// Load the store, failing when there is nothing to work on.
pub(crate) fn load_existing(store: &mut ConfigStore) -> Result<()> {
    match store.load() {
        Ok(()) if store.is_empty() => bail!(NO_CONFIG),
        Ok(()) => Ok(()),
        Err(e) if e.is_not_found() => bail!(NO_CONFIG),
        Err(e) => Err(e).context("Failed to load configuration"),
    }
}

/// One line per configured property of `prop`.
pub(crate) fn describe_font(prop: &FontProperty) -> Vec<String> {
    let family = &prop.family;
    let mut lines: Vec<String> = [
        ("hinting", prop.hinting),
        ("auto-hinting", prop.autohinting),
        ("anti-aliasing", prop.antialiasing),
        ("embedded bitmap", prop.embedded_bitmap),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_set())
    .map(|(label, value)| format!("{label} is {value} for {family}"))
    .collect();

    if let Some(rgba) = prop.rgba {
        lines.push(format!("rgba is set to {rgba} for {family}"));
    }
    if let Some(style) = prop.hint_style {
        lines.push(format!("hintstyle is set to {style} for {family}"));
    }
    if !prop.features.is_empty() {
        lines.push(format!("features {} are set for {family}", prop.features.join(",")));
    }
    lines
}
