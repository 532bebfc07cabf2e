//! # ezfc core
//!
//! Layered store for font aliases, family substitutions and per-family
//! rendering properties.
//!
//! Each layer is persisted as one TOML unit named after its priority and
//! optional name (`010-ja-ezfc.toml`). Higher-priority layers win on
//! conflicts; only the configured target layer is ever written.
//!
//! ## Example
//!
//! ```no_run
//! use ezfc_core::{Alias, ConfigStore, FontProperty};
//!
//! let mut store = ConfigStore::new();
//! store.set_priority(10).unwrap();
//! store.load().unwrap();
//! store.add_alias(Some("ja"), Alias::new("sans", "Noto Sans CJK JP")).unwrap();
//! store.add_font(&FontProperty::new("Noto Sans CJK JP").with_hinting(false)).unwrap();
//! store.save().unwrap();
//! ```

mod alias;
mod backend;
mod classify;
mod error;
mod font;
mod io;
mod layer;
mod store;
mod types;

pub use alias::{Alias, GENERIC_FAMILIES, canonical_alias_name, is_generic_family};
pub use backend::{FeatureProvider, FeatureReport, FontMatcher, feature_report, list_fonts};
pub use classify::{FontClass, classify};
pub use error::{Error, Result};
pub use font::FontProperty;
pub use io::{LayerFile, decode_layer, encode_layer};
pub use layer::{Layer, LayerKey, MAX_PRIORITY, Subst};
pub use store::{ConfigStore, default_config_dir, default_legacy_dir};
pub use types::{HintStyle, Rgba, Subpixel, Tristate};
