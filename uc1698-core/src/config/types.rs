//! Configuration type definitions
//!
//! These types describe one attached panel: how it is mirrored, its
//! contrast and power settings, and the bus timing the host must honour.
//! Defaults reproduce the reference ERC160160 wiring on a 3.3V host.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::address::MirrorMode;

/// Minimum hardware reset hold time (ms)
pub const MIN_RESET_HOLD_MS: u32 = 100;

/// Minimum wait after releasing reset (ms)
pub const MIN_RESET_RELEASE_MS: u32 = 100;

/// Minimum settle time after a system reset command (ms)
pub const MIN_SYSTEM_RESET_SETTLE_MS: u32 = 1;

/// Temperature compensation slope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TemperatureCompensation {
    /// 0.00 %/°C
    None,
    /// -0.05 %/°C
    #[default]
    Low,
    /// -0.10 %/°C
    Medium,
    /// -0.15 %/°C
    High,
}

impl TemperatureCompensation {
    /// Command parameter bits (0-3)
    pub const fn bits(self) -> u8 {
        match self {
            TemperatureCompensation::None => 0,
            TemperatureCompensation::Low => 1,
            TemperatureCompensation::Medium => 2,
            TemperatureCompensation::High => 3,
        }
    }

    /// Parse from the slope in hundredths of a percent (0, 5, 10, 15)
    pub const fn from_hundredths(value: u32) -> Option<Self> {
        match value {
            0 => Some(TemperatureCompensation::None),
            5 => Some(TemperatureCompensation::Low),
            10 => Some(TemperatureCompensation::Medium),
            15 => Some(TemperatureCompensation::High),
            _ => None,
        }
    }
}

/// Strobe widths and settle delays of the parallel bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusTiming {
    /// Write strobe low time (ns)
    pub write_pulse_ns: u32,
    /// Read strobe low time before sampling (ns)
    pub read_pulse_ns: u32,
    /// Wait after each command byte (µs)
    pub command_settle_us: u32,
    /// Reset line held asserted (ms)
    pub reset_hold_ms: u32,
    /// Wait after reset is released (ms)
    pub reset_release_ms: u32,
    /// Wait after the system reset command (ms)
    pub system_reset_settle_ms: u32,
}

impl Default for BusTiming {
    fn default() -> Self {
        Self {
            // 5 idle cycles at 84 MHz
            write_pulse_ns: 60,
            read_pulse_ns: 60,
            command_settle_us: 1_000,
            reset_hold_ms: 150,
            reset_release_ms: 100,
            system_reset_settle_ms: 500,
        }
    }
}

impl BusTiming {
    /// Raise every delay to its datasheet minimum
    pub fn clamped(self) -> Self {
        Self {
            reset_hold_ms: self.reset_hold_ms.max(MIN_RESET_HOLD_MS),
            reset_release_ms: self.reset_release_ms.max(MIN_RESET_RELEASE_MS),
            system_reset_settle_ms: self.system_reset_settle_ms.max(MIN_SYSTEM_RESET_SETTLE_MS),
            ..self
        }
    }
}

/// Panel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelConfig {
    /// SEG/COM mirroring, fixed at init
    pub mirror: MirrorMode,
    /// Contrast potentiometer
    pub vbias: u8,
    /// Start with inverted pixels
    pub inverse: bool,
    /// Temperature compensation slope
    pub temperature_compensation: TemperatureCompensation,
    /// Panel capacitance above 13nF
    pub high_capacitance: bool,
    /// Use the internal V_LCD charge pump
    pub internal_pump: bool,
    /// Bus timing
    pub timing: BusTiming,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            mirror: MirrorMode::new(false, true),
            vbias: 127,
            inverse: false,
            temperature_compensation: TemperatureCompensation::Low,
            high_capacitance: true,
            internal_pump: true,
            timing: BusTiming::default(),
        }
    }
}
