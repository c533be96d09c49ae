//! Panel configuration
//!
//! `panel.toml` is compiled into the image. build.rs has already rejected
//! anything malformed, so a parse failure here means the file and the
//! on-target parser disagree.

use defmt::*;
use uc1698_core::config::{parse_panel_config, PanelConfig};

/// Embedded panel configuration
/// Edit panel.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../panel.toml");

/// Parse the embedded configuration, falling back to defaults
pub fn load() -> PanelConfig {
    match parse_panel_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "panel.toml: vbias={} inverse={} settle={}us",
                config.vbias, config.inverse, config.timing.command_settle_us
            );
            config
        }
        Err(e) => {
            warn!("panel.toml rejected ({}), using defaults", Debug2Format(&e));
            PanelConfig::default()
        }
    }
}
