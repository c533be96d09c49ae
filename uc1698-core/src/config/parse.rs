//! Simple TOML parser for panel configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! `panel.toml`. It does NOT support full TOML.
//!
//! Supported features:
//! - Key = value pairs (integer, boolean)
//! - `[panel]` and `[timing]` section headers
//! - Comments (# ...), including trailing comments
//!
//! Keys that are not listed are rejected so typos do not silently fall
//! back to defaults.

use super::types::{PanelConfig, TemperatureCompensation};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header (line number)
    InvalidSection(usize),
    /// Key not valid in its section (line number)
    UnknownKey(usize),
    /// Value has the wrong type or is out of range (line number)
    InvalidValue(usize),
    /// Line is neither a header nor `key = value` (line number)
    Syntax(usize),
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Panel,
    Timing,
}

/// Parse TOML configuration into a [`PanelConfig`]
///
/// Missing keys keep their [`PanelConfig::default`] values.
pub fn parse_panel_config(input: &str) -> Result<PanelConfig, ParseError> {
    let mut config = PanelConfig::default();
    let mut section = Section::Root;

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(line).trim();

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            if !line.ends_with(']') {
                return Err(ParseError::InvalidSection(line_no));
            }
            section = match line[1..line.len() - 1].trim() {
                "panel" => Section::Panel,
                "timing" => Section::Timing,
                _ => return Err(ParseError::InvalidSection(line_no)),
            };
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::Syntax(line_no))?;
        apply_value(&mut config, section, key, value, line_no)?;
    }

    Ok(config)
}

fn apply_value(
    config: &mut PanelConfig,
    section: Section,
    key: &str,
    value: &str,
    line_no: usize,
) -> Result<(), ParseError> {
    let invalid = ParseError::InvalidValue(line_no);

    match (section, key) {
        (Section::Panel, "mirror_x") => config.mirror.mirror_x = parse_bool(value, line_no)?,
        (Section::Panel, "mirror_y") => config.mirror.mirror_y = parse_bool(value, line_no)?,
        (Section::Panel, "vbias") => {
            config.vbias = parse_int::<u8>(value, line_no)?;
        }
        (Section::Panel, "inverse") => config.inverse = parse_bool(value, line_no)?,
        (Section::Panel, "temperature_compensation") => {
            let hundredths = parse_int::<u32>(value, line_no)?;
            config.temperature_compensation =
                TemperatureCompensation::from_hundredths(hundredths).ok_or(invalid)?;
        }
        (Section::Panel, "high_capacitance") => {
            config.high_capacitance = parse_bool(value, line_no)?
        }
        (Section::Panel, "internal_pump") => config.internal_pump = parse_bool(value, line_no)?,
        (Section::Timing, "write_pulse_ns") => {
            config.timing.write_pulse_ns = parse_int(value, line_no)?
        }
        (Section::Timing, "read_pulse_ns") => {
            config.timing.read_pulse_ns = parse_int(value, line_no)?
        }
        (Section::Timing, "command_settle_us") => {
            config.timing.command_settle_us = parse_int(value, line_no)?
        }
        (Section::Timing, "reset_hold_ms") => {
            config.timing.reset_hold_ms = parse_int(value, line_no)?
        }
        (Section::Timing, "reset_release_ms") => {
            config.timing.reset_release_ms = parse_int(value, line_no)?
        }
        (Section::Timing, "system_reset_settle_ms") => {
            config.timing.system_reset_settle_ms = parse_int(value, line_no)?
        }
        _ => return Err(ParseError::UnknownKey(line_no)),
    }

    Ok(())
}

/// Remove a trailing `# comment`
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Split `key = value`
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Parse an integer value, allowing `_` digit separators
fn parse_int<T: core::str::FromStr>(value: &str, line_no: usize) -> Result<T, ParseError> {
    let mut digits = [0u8; 20];
    let mut len = 0;
    for byte in value.bytes().filter(|b| *b != b'_') {
        let slot = digits.get_mut(len).ok_or(ParseError::InvalidValue(line_no))?;
        *slot = byte;
        len += 1;
    }
    core::str::from_utf8(&digits[..len])
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(ParseError::InvalidValue(line_no))
}

/// Parse a boolean value
fn parse_bool(value: &str, line_no: usize) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue(line_no)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::MirrorMode;

    const SAMPLE: &str = r#"
# ERC160160 on a Pico
[panel]
mirror_x = false
mirror_y = false   # scan top to bottom
vbias = 110
inverse = true
temperature_compensation = 10

[timing]
write_pulse_ns = 80
command_settle_us = 0
system_reset_settle_ms = 1_000
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_panel_config(SAMPLE).unwrap();

        assert_eq!(config.mirror, MirrorMode::new(false, false));
        assert_eq!(config.vbias, 110);
        assert!(config.inverse);
        assert_eq!(
            config.temperature_compensation,
            TemperatureCompensation::Medium
        );
        assert_eq!(config.timing.write_pulse_ns, 80);
        assert_eq!(config.timing.command_settle_us, 0);
        assert_eq!(config.timing.system_reset_settle_ms, 1000);
    }

    #[test]
    fn test_missing_keys_keep_defaults() {
        let config = parse_panel_config("[panel]\nvbias = 100\n").unwrap();
        let defaults = PanelConfig::default();

        assert_eq!(config.vbias, 100);
        assert_eq!(config.mirror, defaults.mirror);
        assert_eq!(config.timing, defaults.timing);
    }

    #[test]
    fn test_empty_input_is_default() {
        assert_eq!(parse_panel_config("").unwrap(), PanelConfig::default());
    }

    #[test]
    fn test_unknown_section() {
        assert_eq!(
            parse_panel_config("[backlight]\n"),
            Err(ParseError::InvalidSection(1))
        );
        assert_eq!(
            parse_panel_config("[panel\n"),
            Err(ParseError::InvalidSection(1))
        );
    }

    #[test]
    fn test_unknown_key() {
        // vbias belongs to [panel], not [timing]
        assert_eq!(
            parse_panel_config("[timing]\nvbias = 3\n"),
            Err(ParseError::UnknownKey(2))
        );
        // Keys before any section
        assert_eq!(
            parse_panel_config("vbias = 3\n"),
            Err(ParseError::UnknownKey(1))
        );
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            parse_panel_config("[panel]\nvbias = 300\n"),
            Err(ParseError::InvalidValue(2))
        );
        assert_eq!(
            parse_panel_config("[panel]\ninverse = yes\n"),
            Err(ParseError::InvalidValue(2))
        );
        assert_eq!(
            parse_panel_config("[panel]\ntemperature_compensation = 7\n"),
            Err(ParseError::InvalidValue(2))
        );
    }

    #[test]
    fn test_syntax_error() {
        assert_eq!(
            parse_panel_config("[panel]\nvbias\n"),
            Err(ParseError::Syntax(2))
        );
    }
}
