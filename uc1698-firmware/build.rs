//! Build script for uc1698-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates panel.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keys accepted in `[panel]`, with their expected type
const PANEL_KEYS: &[(&str, Kind)] = &[
    ("mirror_x", Kind::Bool),
    ("mirror_y", Kind::Bool),
    ("vbias", Kind::Int { min: 0, max: 255 }),
    ("inverse", Kind::Bool),
    ("temperature_compensation", Kind::Int { min: 0, max: 15 }),
    ("high_capacitance", Kind::Bool),
    ("internal_pump", Kind::Bool),
];

/// Keys accepted in `[timing]`
const TIMING_KEYS: &[(&str, Kind)] = &[
    ("write_pulse_ns", Kind::Int { min: 0, max: u32::MAX as i64 }),
    ("read_pulse_ns", Kind::Int { min: 0, max: u32::MAX as i64 }),
    ("command_settle_us", Kind::Int { min: 0, max: u32::MAX as i64 }),
    ("reset_hold_ms", Kind::Int { min: 0, max: u32::MAX as i64 }),
    ("reset_release_ms", Kind::Int { min: 0, max: u32::MAX as i64 }),
    ("system_reset_settle_ms", Kind::Int { min: 0, max: u32::MAX as i64 }),
];

#[derive(Clone, Copy)]
enum Kind {
    Bool,
    Int { min: i64, max: i64 },
}

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate panel.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=panel.toml");

    let config_path = Path::new("panel.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: panel.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds panel.toml from the uc1698-firmware         ║\n\
            ║  directory. Restore it or create a new one.                      ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read panel.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in panel.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_section(&config, "panel", PANEL_KEYS, &mut errors);
    validate_section(&config, "timing", TIMING_KEYS, &mut errors);
    validate_ranges(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid panel configuration                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=panel.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Only `[panel]` and `[timing]` tables are allowed at the top level
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = config.as_table() else {
        errors.push("top level must be a table".to_string());
        return;
    };

    for (name, value) in table {
        if name != "panel" && name != "timing" {
            errors.push(format!("unknown section [{}]", name));
        } else if !value.is_table() {
            errors.push(format!("[{}] must be a table", name));
        }
    }
}

/// Check key names and value types of one section
fn validate_section(
    config: &toml::Value,
    section: &str,
    keys: &[(&str, Kind)],
    errors: &mut Vec<String>,
) {
    let Some(table) = config.get(section).and_then(|s| s.as_table()) else {
        return;
    };

    for (key, value) in table {
        let Some((_, kind)) = keys.iter().find(|(name, _)| name == key) else {
            errors.push(format!("[{}] unknown key '{}'", section, key));
            continue;
        };

        match (kind, value) {
            (Kind::Bool, toml::Value::Boolean(_)) => {}
            (Kind::Bool, _) => errors.push(format!("[{}] {} must be true or false", section, key)),
            (Kind::Int { min, max }, toml::Value::Integer(n)) => {
                if n < min || n > max {
                    errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
                }
            }
            (Kind::Int { .. }, _) => errors.push(format!("[{}] {} must be an integer", section, key)),
        }
    }
}

/// Value constraints beyond the type
fn validate_ranges(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(toml::Value::Integer(tc)) = config
        .get("panel")
        .and_then(|p| p.get("temperature_compensation"))
    {
        if ![0, 5, 10, 15].contains(tc) {
            errors.push("[panel] temperature_compensation must be 0, 5, 10 or 15".to_string());
        }
    }

    // The driver raises these to the minimum anyway, but say so
    let timing = config.get("timing");
    for (key, min) in [
        ("reset_hold_ms", 100),
        ("reset_release_ms", 100),
        ("system_reset_settle_ms", 1),
    ] {
        if let Some(toml::Value::Integer(ms)) = timing.and_then(|t| t.get(key)) {
            if *ms < min {
                println!(
                    "cargo:warning=panel.toml: [timing] {} = {} is below {}ms and will be raised",
                    key, ms, min
                );
            }
        }
    }
}
