//! Simulated UC1698 panel
//!
//! [`SimPanel`] plays the controller side of the bus. It hands out pins and
//! a data port implementing the `uc1698-hal` traits, so the real
//! [`BusTransport`] drives it through the same electrical edges it would
//! produce on hardware:
//!
//! - a byte is latched on the rising edge of WR
//! - read data is driven on the falling edge of RD
//! - CD low selects command bytes, high selects display data
//!
//! The model covers what the driver relies on: column and row address
//! commands, 16-bit words assembled big-endian from two data bytes, cursor
//! auto-increment after every word, the stale byte returned by the first
//! read after an address change or a write, mapping/inverse/enable/reset
//! commands, and a bounded log of command bytes.
//!
//! Bus misuse (strobes without chip-select, both strobes at once, a word
//! torn by releasing chip-select, turning the port around while selected) is
//! counted in [`SimPanel::violations`] instead of panicking.

use core::cell::{Cell, RefCell};

use embedded_hal::delay::DelayNs;
use heapless::{Deque, Vec};
use uc1698_core::address::{
    MirrorMode, WordAddress, FIRST_COLUMN, HEIGHT, LAST_COLUMN, LAST_ROW, WORDS_PER_ROW,
};
use uc1698_core::command::op;
use uc1698_core::config::BusTiming;
use uc1698_hal::{BusLine, DataPort, OutputPin, PortDirection};

use crate::transport::{BusTransport, ControlLines};

/// Command bytes kept in the log; older bytes are dropped
pub const LOG_CAPACITY: usize = 256;

/// Value driven for the dummy read
pub const STALE_BYTE: u8 = 0xA5;

const ROWS: usize = HEIGHT as usize;
const COLUMNS: usize = WORDS_PER_ROW as usize;

/// Transport wired to a [`SimPanel`]
pub type SimTransport<'a> = BusTransport<SimPin<'a>, SimPort<'a>, SimDelay<'a>>;

/// Parameter byte expected after a two-byte command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parameter {
    VBias,
    Ignored,
}

/// Where the next data read comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadPhase {
    Dummy,
    High,
    Low,
}

struct State {
    /// Electrical level per control line, true = high
    levels: [bool; 5],
    direction: PortDirection,
    bus_out: u8,
    bus_in: u8,
    ram: [[u16; COLUMNS]; ROWS],
    column: u8,
    row: u8,
    pending_high: Option<u8>,
    read_phase: ReadPhase,
    read_latch: u16,
    parameter: Option<Parameter>,
    mirror: MirrorMode,
    vbias: u8,
    inverse: bool,
    all_pixels_on: bool,
    display_enabled: bool,
    system_resets: u32,
    hardware_resets: u32,
    reset_asserted_at: u64,
    last_reset_hold_ns: u64,
    log: Deque<u8, LOG_CAPACITY>,
    violations: u32,
}

impl State {
    fn new() -> Self {
        Self {
            levels: [true; 5],
            direction: PortDirection::Input,
            bus_out: 0,
            bus_in: 0,
            ram: [[0; COLUMNS]; ROWS],
            column: 0,
            row: 0,
            pending_high: None,
            read_phase: ReadPhase::Dummy,
            read_latch: 0,
            parameter: None,
            mirror: MirrorMode::default(),
            vbias: 0,
            inverse: false,
            all_pixels_on: false,
            display_enabled: false,
            system_resets: 0,
            hardware_resets: 0,
            reset_asserted_at: 0,
            last_reset_hold_ns: 0,
            log: Deque::new(),
            violations: 0,
        }
    }

    fn asserted(&self, line: BusLine) -> bool {
        !self.levels[line as usize]
    }

    fn set_line(&mut self, line: BusLine, high: bool, now: u64) {
        let was_high = self.levels[line as usize];
        self.levels[line as usize] = high;

        match (line, was_high, high) {
            (BusLine::WriteStrobe, true, false) => {
                if self.asserted(BusLine::ReadStrobe) {
                    self.violations += 1;
                }
            }
            (BusLine::WriteStrobe, false, true) => self.latch_write(),
            (BusLine::ReadStrobe, true, false) => self.drive_read(),
            (BusLine::ChipSelect, false, true) => self.end_transfer(),
            (BusLine::Reset, true, false) => self.reset_asserted_at = now,
            (BusLine::Reset, false, true) => {
                self.hardware_resets += 1;
                self.last_reset_hold_ns = now - self.reset_asserted_at;
                self.reset_registers();
            }
            _ => {}
        }
    }

    fn set_direction(&mut self, direction: PortDirection) {
        if self.asserted(BusLine::ChipSelect)
            || self.asserted(BusLine::ReadStrobe)
            || self.asserted(BusLine::WriteStrobe)
        {
            self.violations += 1;
        }
        self.direction = direction;
    }

    fn latch_write(&mut self) {
        if !self.asserted(BusLine::ChipSelect)
            || self.asserted(BusLine::ReadStrobe)
            || self.asserted(BusLine::Reset)
            || self.direction != PortDirection::Output
        {
            self.violations += 1;
            return;
        }

        let byte = self.bus_out;
        if self.asserted(BusLine::CommandData) {
            self.command(byte);
        } else {
            self.data(byte);
        }
    }

    fn drive_read(&mut self) {
        if !self.asserted(BusLine::ChipSelect)
            || self.asserted(BusLine::WriteStrobe)
            || self.direction != PortDirection::Input
        {
            self.violations += 1;
        }

        // Status reads are not modelled
        if self.asserted(BusLine::CommandData) {
            self.bus_in = 0;
            return;
        }

        self.bus_in = match self.read_phase {
            ReadPhase::Dummy => {
                self.read_latch = self.load();
                self.read_phase = ReadPhase::High;
                STALE_BYTE
            }
            ReadPhase::High => {
                self.read_phase = ReadPhase::Low;
                (self.read_latch >> 8) as u8
            }
            ReadPhase::Low => {
                let byte = self.read_latch as u8;
                self.advance();
                self.read_latch = self.load();
                self.read_phase = ReadPhase::High;
                byte
            }
        };
    }

    fn end_transfer(&mut self) {
        if self.pending_high.take().is_some() {
            self.violations += 1;
        }
    }

    fn command(&mut self, byte: u8) {
        if self.log.is_full() {
            self.log.pop_front();
        }
        let _ = self.log.push_back(byte);

        if let Some(parameter) = self.parameter.take() {
            if parameter == Parameter::VBias {
                self.vbias = byte;
            }
            return;
        }

        match byte {
            0x00..=0x0F => {
                self.column = (self.column & 0x70) | (byte & 0x0F);
                self.address_changed();
            }
            0x10..=0x17 => {
                self.column = (self.column & 0x0F) | ((byte & 0x07) << 4);
                self.address_changed();
            }
            0x60..=0x6F => {
                self.row = (self.row & 0xF0) | (byte & 0x0F);
                self.address_changed();
            }
            0x70..=0x7F => {
                self.row = (self.row & 0x0F) | ((byte & 0x0F) << 4);
                self.address_changed();
            }
            op::VBIAS_POTENTIOMETER => self.parameter = Some(Parameter::VBias),
            op::N_LINE_INVERSION | op::COM_END => self.parameter = Some(Parameter::Ignored),
            0xA4 | 0xA5 => self.all_pixels_on = byte & 1 != 0,
            0xA6 | 0xA7 => self.inverse = byte & 1 != 0,
            0xAC | 0xAD => self.display_enabled = byte & 1 != 0,
            0xC0..=0xC7 => {
                self.mirror = MirrorMode::new(byte & 0b100 != 0, byte & 0b010 != 0);
            }
            op::SYSTEM_RESET => {
                self.system_resets += 1;
                self.reset_registers();
            }
            _ => {}
        }
    }

    fn data(&mut self, byte: u8) {
        match self.pending_high.take() {
            None => self.pending_high = Some(byte),
            Some(high) => {
                let word = u16::from_be_bytes([high, byte]);
                if let Some(slot) = self.slot(self.row, self.column) {
                    *slot = word;
                }
                self.advance();
                self.read_phase = ReadPhase::Dummy;
            }
        }
    }

    fn address_changed(&mut self) {
        self.pending_high = None;
        self.read_phase = ReadPhase::Dummy;
    }

    /// Column auto-increment, wrapping into the next row
    fn advance(&mut self) {
        self.column += 1;
        if self.column > LAST_COLUMN {
            self.column = FIRST_COLUMN;
            self.row = if self.row >= LAST_ROW { 0 } else { self.row + 1 };
        }
    }

    fn slot(&mut self, row: u8, column: u8) -> Option<&mut u16> {
        let column = column.checked_sub(FIRST_COLUMN)?;
        self.ram
            .get_mut(row as usize)
            .and_then(|r| r.get_mut(column as usize))
    }

    /// Word under the cursor; outside the visible window reads as zero
    fn load(&mut self) -> u16 {
        let (row, column) = (self.row, self.column);
        self.slot(row, column).map(|w| *w).unwrap_or(0)
    }

    fn reset_registers(&mut self) {
        self.column = 0;
        self.row = 0;
        self.pending_high = None;
        self.read_phase = ReadPhase::Dummy;
        self.parameter = None;
        self.mirror = MirrorMode::default();
        self.inverse = false;
        self.all_pixels_on = false;
        self.display_enabled = false;
    }
}

/// Simulated controller with display RAM
pub struct SimPanel {
    state: RefCell<State>,
    clock: Cell<u64>,
}

impl Default for SimPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl SimPanel {
    /// Power-on panel with all lines pulled high and blank RAM
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State::new()),
            clock: Cell::new(0),
        }
    }

    /// Control pins and data port wired to this panel
    pub fn split(&self) -> (ControlLines<SimPin<'_>>, SimPort<'_>) {
        let pin = |line| SimPin { panel: self, line };
        let lines = ControlLines {
            chip_select: pin(BusLine::ChipSelect),
            command_data: pin(BusLine::CommandData),
            read_strobe: pin(BusLine::ReadStrobe),
            write_strobe: pin(BusLine::WriteStrobe),
            reset: pin(BusLine::Reset),
        };
        (lines, SimPort { panel: self })
    }

    /// Delay that advances this panel's clock
    pub fn delay(&self) -> SimDelay<'_> {
        SimDelay { clock: &self.clock }
    }

    /// A transport driving this panel
    pub fn transport(&self, timing: BusTiming) -> SimTransport<'_> {
        let (lines, port) = self.split();
        BusTransport::new(lines, port, self.delay(), timing)
    }

    /// Word stored at `address`
    pub fn word(&self, address: WordAddress) -> u16 {
        let state = self.state.borrow();
        state.ram[address.row() as usize][(address.column() - FIRST_COLUMN) as usize]
    }

    /// Preload a word without bus traffic
    pub fn set_word(&self, address: WordAddress, raw: u16) {
        let mut state = self.state.borrow_mut();
        state.ram[address.row() as usize][(address.column() - FIRST_COLUMN) as usize] = raw;
    }

    /// Preload every visible word
    pub fn fill(&self, raw: u16) {
        let mut state = self.state.borrow_mut();
        for row in state.ram.iter_mut() {
            row.fill(raw);
        }
    }

    /// Controller cursor as (row, column)
    pub fn cursor(&self) -> (u8, u8) {
        let state = self.state.borrow();
        (state.row, state.column)
    }

    /// Mirroring set by the last LCD mapping command
    pub fn mirror(&self) -> MirrorMode {
        self.state.borrow().mirror
    }

    /// Last VBias potentiometer value
    pub fn vbias(&self) -> u8 {
        self.state.borrow().vbias
    }

    /// Inverse display flag
    pub fn inverse(&self) -> bool {
        self.state.borrow().inverse
    }

    /// All-pixels-on flag
    pub fn all_pixels_on(&self) -> bool {
        self.state.borrow().all_pixels_on
    }

    /// Display enable flag
    pub fn display_enabled(&self) -> bool {
        self.state.borrow().display_enabled
    }

    /// Number of system reset commands received
    pub fn system_resets(&self) -> u32 {
        self.state.borrow().system_resets
    }

    /// Number of completed reset pulses
    pub fn hardware_resets(&self) -> u32 {
        self.state.borrow().hardware_resets
    }

    /// Duration of the last reset pulse (ns)
    pub fn last_reset_hold_ns(&self) -> u64 {
        self.state.borrow().last_reset_hold_ns
    }

    /// Command bytes received, oldest first
    pub fn command_log(&self) -> Vec<u8, LOG_CAPACITY> {
        self.state.borrow().log.iter().copied().collect()
    }

    /// Forget logged command bytes
    pub fn clear_command_log(&self) {
        self.state.borrow_mut().log.clear();
    }

    /// Protocol violations seen so far
    pub fn violations(&self) -> u32 {
        self.state.borrow().violations
    }

    /// Time spent in delays (ns)
    pub fn elapsed_ns(&self) -> u64 {
        self.clock.get()
    }

    /// Whether a control line is currently asserted
    pub fn is_asserted(&self, line: BusLine) -> bool {
        self.state.borrow().asserted(line)
    }

    fn set_line(&self, line: BusLine, high: bool) {
        let now = self.clock.get();
        self.state.borrow_mut().set_line(line, high, now);
    }
}

/// One control line of a [`SimPanel`]
pub struct SimPin<'a> {
    panel: &'a SimPanel,
    line: BusLine,
}

impl OutputPin for SimPin<'_> {
    fn set_high(&mut self) {
        self.panel.set_line(self.line, true);
    }

    fn set_low(&mut self) {
        self.panel.set_line(self.line, false);
    }

    fn is_set_high(&self) -> bool {
        !self.panel.is_asserted(self.line)
    }
}

/// Data lines of a [`SimPanel`]
pub struct SimPort<'a> {
    panel: &'a SimPanel,
}

impl DataPort for SimPort<'_> {
    fn set_direction(&mut self, direction: PortDirection) {
        self.panel.state.borrow_mut().set_direction(direction);
    }

    fn direction(&self) -> PortDirection {
        self.panel.state.borrow().direction
    }

    fn write(&mut self, value: u8) {
        self.panel.state.borrow_mut().bus_out = value;
    }

    fn read(&mut self) -> u8 {
        self.panel.state.borrow().bus_in
    }
}

/// Delay that only advances the simulated clock
pub struct SimDelay<'a> {
    clock: &'a Cell<u64>,
}

impl DelayNs for SimDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.set(self.clock.get() + ns as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(row: u16, column: u8) -> WordAddress {
        WordAddress::new(row, column).unwrap()
    }

    #[test]
    fn test_write_without_chip_select() {
        let panel = SimPanel::new();
        let mut bus = panel.transport(BusTiming::default());

        bus.select_command_mode(true);
        bus.write_byte(op::NOP);

        assert_eq!(panel.violations(), 1);
        assert!(panel.command_log().is_empty());
    }

    #[test]
    fn test_both_strobes() {
        let panel = SimPanel::new();
        let (mut lines, _port) = panel.split();

        lines.chip_select.set_low();
        lines.read_strobe.set_low();
        assert_eq!(panel.violations(), 0);

        // WR asserted on top of RD, then released while RD is still low
        lines.write_strobe.set_low();
        assert_eq!(panel.violations(), 1);
        lines.write_strobe.set_high();
        assert_eq!(panel.violations(), 2);
    }

    #[test]
    fn test_turnaround_while_selected() {
        let panel = SimPanel::new();
        let mut bus = panel.transport(BusTiming::default());

        bus.select_chip(true);
        bus.set_bus_direction(false);
        bus.select_chip(false);
        assert_eq!(panel.violations(), 1);

        // Outside chip-select the port may turn freely
        bus.set_bus_direction(true);
        assert_eq!(panel.violations(), 1);
    }

    #[test]
    fn test_word_protocol_turnaround_is_clean() {
        let panel = SimPanel::new();
        let mut bus = panel.transport(BusTiming {
            command_settle_us: 0,
            ..BusTiming::default()
        });

        bus.set_address(address(2, 50));
        bus.read_word();
        bus.set_address(address(2, 50));
        bus.write_word(uc1698_core::pixel::PixelWord::from_raw(0x07E0));
        bus.read_word();

        assert_eq!(panel.violations(), 0);
        assert_eq!(panel.word(address(2, 50)), 0x07E0);
    }

    #[test]
    fn test_torn_word() {
        let panel = SimPanel::new();
        let mut bus = panel.transport(BusTiming::default());

        bus.set_address(address(0, 40));
        bus.select_chip(true);
        bus.select_command_mode(false);
        bus.write_byte(0xFF);
        bus.select_chip(false);

        assert_eq!(panel.violations(), 1);
        assert_eq!(panel.word(address(0, 40)), 0);
    }

    #[test]
    fn test_cursor_wraps_to_next_row() {
        let panel = SimPanel::new();
        let mut bus = panel.transport(BusTiming::default());

        bus.set_address(address(4, LAST_COLUMN));
        bus.select_chip(true);
        bus.select_command_mode(false);
        for byte in [0x12, 0x34, 0x56, 0x78] {
            bus.write_byte(byte);
        }
        bus.select_chip(false);

        assert_eq!(panel.word(address(4, LAST_COLUMN)), 0x1234);
        assert_eq!(panel.word(address(5, FIRST_COLUMN)), 0x5678);
    }

    #[test]
    fn test_reset_pulse_measured() {
        let panel = SimPanel::new();
        let mut bus = panel.transport(BusTiming::default());

        bus.hardware_reset();

        assert_eq!(panel.hardware_resets(), 1);
        assert_eq!(panel.last_reset_hold_ns(), 150 * 1_000_000);
    }

    #[test]
    fn test_mapping_and_flags_decoded() {
        let panel = SimPanel::new();
        let mut bus = panel.transport(BusTiming::default());

        bus.send_command(0xC6);
        bus.send_command(0xA7);
        bus.send_command(0xAD);
        bus.send_command(0xA5);

        assert_eq!(panel.mirror(), MirrorMode::new(true, true));
        assert!(panel.inverse());
        assert!(panel.display_enabled());
        assert!(panel.all_pixels_on());

        bus.send_command(op::SYSTEM_RESET);
        assert_eq!(panel.system_resets(), 1);
        assert_eq!(panel.mirror(), MirrorMode::default());
        assert!(!panel.display_enabled());
    }

    #[test]
    fn test_log_is_bounded() {
        let panel = SimPanel::new();
        let mut bus = panel.transport(BusTiming {
            command_settle_us: 0,
            ..BusTiming::default()
        });

        for _ in 0..LOG_CAPACITY {
            bus.send_command(op::NOP);
        }
        bus.send_command(0xA6);

        let log = panel.command_log();
        assert_eq!(log.len(), LOG_CAPACITY);
        assert_eq!(log.last(), Some(&0xA6));

        panel.clear_command_log();
        assert!(panel.command_log().is_empty());
    }

    #[test]
    fn test_read_after_write_needs_dummy() {
        let panel = SimPanel::new();
        panel.set_word(address(1, 45), 0x0F0F);
        let mut bus = panel.transport(BusTiming::default());

        bus.set_address(address(1, 44));
        bus.write_word(uc1698_core::pixel::PixelWord::from_raw(0xFFFF));
        // Cursor now at column 45, pipeline stale again
        assert_eq!(bus.read_word().raw(), 0x0F0F);
    }
}
