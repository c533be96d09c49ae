//! Panel configuration
//!
//! Board-agnostic configuration structures, optionally stored as postcard
//! binary data, plus a small text parser for `panel.toml`.

mod parse;
mod types;

pub use parse::{parse_panel_config, ParseError};
pub use types::*;
