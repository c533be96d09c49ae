//! UC1698 command encoding
//!
//! Every controller command is one or two bytes sent with CD asserted.
//! Most commands are an opcode base with parameter bits OR-ed into the low
//! nibble; a few take a full second byte.
//!
//! Numbers in brackets refer to the command table of the UC1698 datasheet.

use heapless::Vec;

use crate::address::MirrorMode;

/// UC1698 opcode bases
pub mod op {
    /// [4] Set column address, low 4 bits
    pub const COLUMN_LSB: u8 = 0x00;
    /// [4] Set column address, high 3 bits
    pub const COLUMN_MSB: u8 = 0x10;
    /// [5] Set temperature compensation
    pub const TEMPERATURE_COMPENSATION: u8 = 0x24;
    /// [6] Set power control
    pub const POWER_CONTROL: u8 = 0x28;
    /// [9] Set row address, low 4 bits
    pub const ROW_LSB: u8 = 0x60;
    /// [9] Set row address, high 4 bits
    pub const ROW_MSB: u8 = 0x70;
    /// [10] Set VBias potentiometer (followed by value byte)
    pub const VBIAS_POTENTIOMETER: u8 = 0x81;
    /// [11] Set partial display control, disabled
    pub const PARTIAL_DISPLAY_DISABLE: u8 = 0x84;
    /// [12] Set RAM address control
    pub const RAM_ADDRESS_CONTROL: u8 = 0x88;
    /// [14] Set line rate
    pub const LINE_RATE: u8 = 0xA0;
    /// [15] Set all pixels on
    pub const ALL_PIXELS_ON: u8 = 0xA4;
    /// [16] Set inverse display
    pub const INVERSE_DISPLAY: u8 = 0xA6;
    /// [17] Set display enable
    pub const DISPLAY_ENABLE: u8 = 0xAC;
    /// [18] Set LCD mapping control
    pub const LCD_MAPPING: u8 = 0xC0;
    /// [19] Set N-line inversion (followed by line count byte)
    pub const N_LINE_INVERSION: u8 = 0xC8;
    /// [20] Set color pattern R-G-B
    pub const COLOR_PATTERN_RGB: u8 = 0xD1;
    /// [21] Set color mode 64k
    pub const COLOR_MODE_64K: u8 = 0xD4;
    /// [22] Set COM scan function
    pub const COM_SCAN_FUNCTION: u8 = 0xD8;
    /// [23] System reset
    pub const SYSTEM_RESET: u8 = 0xE2;
    /// [24] No operation
    pub const NOP: u8 = 0xE3;
    /// [26] Set LCD bias ratio
    pub const BIAS_RATIO: u8 = 0xE8;
    /// [27] Set COM end (followed by last COM line)
    pub const COM_END: u8 = 0xF1;
}

/// Encoded bytes of one command (1 or 2 bytes)
pub type CommandBytes = Vec<u8, 2>;

/// A single controller command with its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Word column address (7 bits used)
    ColumnAddress(u8),
    /// Row address (8 bits used)
    RowAddress(u8),
    /// Temperature compensation index (0-3 => 0.00/0.05/0.10/0.15 %/°C)
    TemperatureCompensation(u8),
    /// Panel loading and V_LCD source
    PowerControl {
        /// LCD capacitance between 13nF and 22nF
        high_capacitance: bool,
        /// Generate V_LCD with the internal charge pump
        internal_pump: bool,
    },
    /// Contrast (V_BIAS) potentiometer value
    VBiasPotentiometer(u8),
    /// Turn the partial display window off
    PartialDisplayDisable,
    /// Auto-increment behaviour (AC2..AC0)
    RamAddressControl(u8),
    /// Frame rate selection (0-3)
    LineRate(u8),
    /// Force every pixel on regardless of RAM content
    AllPixelsOn(bool),
    /// Invert every pixel on the glass
    InverseDisplay(bool),
    /// Wake (true) or sleep (false) the display
    DisplayEnable(bool),
    /// SEG / COM mirroring
    LcdMapping(MirrorMode),
    /// N-line inversion, 0 disables
    NLineInversion(u8),
    /// Fixed R-G-B sub-pixel order
    ColorPattern,
    /// Fixed 64k color words
    ColorMode,
    /// COM scan function bits (LRC/FRC/PWM)
    ComScanFunction(u8),
    /// Software reset, needs a settle delay afterwards
    SystemReset,
    /// No operation
    Nop,
    /// LCD bias ratio (0-3)
    BiasRatio(u8),
    /// Last COM line driven
    ComEnd(u8),
}

impl Command {
    /// Encode the command into the bytes sent over the bus
    pub fn encode(&self) -> CommandBytes {
        let mut bytes = CommandBytes::new();
        let (first, second) = self.raw();
        // Capacity is 2, both pushes always fit
        let _ = bytes.push(first);
        if let Some(second) = second {
            let _ = bytes.push(second);
        }
        bytes
    }

    fn raw(&self) -> (u8, Option<u8>) {
        match *self {
            Command::ColumnAddress(column) => (
                op::COLUMN_LSB | (column & 0x0F),
                Some(op::COLUMN_MSB | ((column >> 4) & 0x07)),
            ),
            Command::RowAddress(row) => (
                op::ROW_LSB | (row & 0x0F),
                Some(op::ROW_MSB | ((row >> 4) & 0x0F)),
            ),
            Command::TemperatureCompensation(index) => {
                (op::TEMPERATURE_COMPENSATION | (index & 0x03), None)
            }
            Command::PowerControl {
                high_capacitance,
                internal_pump,
            } => (
                op::POWER_CONTROL | ((high_capacitance as u8) << 1) | internal_pump as u8,
                None,
            ),
            Command::VBiasPotentiometer(value) => (op::VBIAS_POTENTIOMETER, Some(value)),
            Command::PartialDisplayDisable => (op::PARTIAL_DISPLAY_DISABLE, None),
            Command::RamAddressControl(ac) => (op::RAM_ADDRESS_CONTROL | (ac & 0x07), None),
            Command::LineRate(rate) => (op::LINE_RATE | (rate & 0x03), None),
            Command::AllPixelsOn(on) => (op::ALL_PIXELS_ON | on as u8, None),
            Command::InverseDisplay(on) => (op::INVERSE_DISPLAY | on as u8, None),
            Command::DisplayEnable(on) => (op::DISPLAY_ENABLE | on as u8, None),
            Command::LcdMapping(mirror) => (op::LCD_MAPPING | mirror.mapping_bits(), None),
            Command::NLineInversion(lines) => (op::N_LINE_INVERSION, Some(lines)),
            Command::ColorPattern => (op::COLOR_PATTERN_RGB, None),
            Command::ColorMode => (op::COLOR_MODE_64K, None),
            Command::ComScanFunction(bits) => (op::COM_SCAN_FUNCTION | (bits & 0x07), None),
            Command::SystemReset => (op::SYSTEM_RESET, None),
            Command::Nop => (op::NOP, None),
            Command::BiasRatio(ratio) => (op::BIAS_RATIO | (ratio & 0x03), None),
            Command::ComEnd(line) => (op::COM_END, Some(line)),
        }
    }
}

/// RAM address control used by this driver: column auto-increment with
/// wrap-around, then row +1
pub const RAM_ADDRESS_CONTROL_AUTO_INCREMENT: u8 = 0b011;

/// COM scan function: LRC AEBCD, FRC disabled, SEG PWM enabled
pub const COM_SCAN_FUNCTION_DEFAULT: u8 = 0b101;

/// Line rate: 30.5 klps frame frequency
pub const LINE_RATE_DEFAULT: u8 = 1;

/// LCD bias ratio: 1/12
pub const BIAS_RATIO_DEFAULT: u8 = 3;

/// Last COM line of a 160-row panel
pub const COM_END_160: u8 = 159;
