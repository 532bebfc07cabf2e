//! ezfc command line library.

pub mod cli;
pub mod commands;
pub mod fontconfig;

pub use cli::{Cli, Commands, ConfigArgs};
pub use fontconfig::Fontconfig;
