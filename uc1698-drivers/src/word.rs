//! Word protocol
//!
//! Commands are single bytes sent with CD asserted. Display memory is
//! always accessed as 16-bit words, sent high byte first.
//!
//! Reads carry a controller quirk: the first byte read after an address
//! change is stale pipeline data and must be discarded. [`read_word`]
//! always performs that dummy read, so it must only follow a fresh
//! address.
//!
//! The port is turned around before chip-select is asserted, never inside
//! a transfer.
//!
//! [`read_word`]: BusTransport::read_word

use embedded_hal::delay::DelayNs;
use uc1698_core::address::WordAddress;
use uc1698_core::command::Command;
use uc1698_core::pixel::PixelWord;
use uc1698_hal::{DataPort, OutputPin};

use crate::transport::BusTransport;

impl<P, D, T> BusTransport<P, D, T>
where
    P: OutputPin,
    D: DataPort,
    T: DelayNs,
{
    /// Send one command byte and wait for it to latch
    pub fn send_command(&mut self, opcode: u8) {
        self.set_bus_direction(true);
        self.select_chip(true);
        self.select_command_mode(true);
        self.write_byte(opcode);
        self.select_chip(false);
        self.settle_command();
    }

    /// Send an encoded command (one or two bytes)
    pub fn send(&mut self, command: Command) {
        trace!("command {}", command);
        for byte in command.encode() {
            self.send_command(byte);
        }
    }

    /// Point the controller cursor at a word
    ///
    /// Column first, then row, as the controller requires.
    pub fn set_address(&mut self, address: WordAddress) {
        self.send(Command::ColumnAddress(address.column()));
        self.send(Command::RowAddress(address.row()));
    }

    /// Write one display word at the cursor
    ///
    /// The controller advances the cursor afterwards.
    pub fn write_word(&mut self, word: PixelWord) {
        self.set_bus_direction(true);
        self.select_chip(true);
        self.select_command_mode(false);
        for byte in word.to_bytes() {
            self.write_byte(byte);
        }
        self.select_chip(false);
    }

    /// Read one display word at a freshly set cursor
    ///
    /// The controller advances the cursor afterwards.
    pub fn read_word(&mut self) -> PixelWord {
        self.set_bus_direction(false);
        self.select_chip(true);
        self.select_command_mode(false);
        // Stale byte from the read pipeline
        let _ = self.read_byte();
        let high = self.read_byte();
        let low = self.read_byte();
        self.select_chip(false);
        PixelWord::from_bytes([high, low])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimPanel;
    use uc1698_core::config::BusTiming;

    #[test]
    fn test_send_command_logs_byte() {
        let panel = SimPanel::new();
        let mut bus = panel.transport(BusTiming::default());

        bus.send_command(0xE3);

        assert_eq!(panel.command_log().as_slice(), &[0xE3]);
        assert_eq!(panel.violations(), 0);
        // Each command waits out the settle time
        assert!(panel.elapsed_ns() >= 1_000_000);
    }

    #[test]
    fn test_two_byte_command() {
        let panel = SimPanel::new();
        let mut bus = panel.transport(BusTiming::default());

        bus.send(Command::VBiasPotentiometer(99));

        assert_eq!(panel.command_log().as_slice(), &[0x81, 99]);
        assert_eq!(panel.vbias(), 99);
    }

    #[test]
    fn test_set_address_order() {
        let panel = SimPanel::new();
        let mut bus = panel.transport(BusTiming::default());
        let address = WordAddress::new(0x2A, 38).unwrap();

        bus.set_address(address);

        assert_eq!(panel.command_log().as_slice(), &[0x06, 0x12, 0x6A, 0x72]);
        assert_eq!(panel.cursor(), (0x2A, 38));
    }

    #[test]
    fn test_write_word_big_endian() {
        let panel = SimPanel::new();
        let mut bus = panel.transport(BusTiming::default());
        let address = WordAddress::new(3, 40).unwrap();

        bus.set_address(address);
        bus.write_word(PixelWord::from_raw(0x1234));

        assert_eq!(panel.word(address), 0x1234);
        // Cursor advanced past the written word
        assert_eq!(panel.cursor(), (3, 41));
        assert_eq!(panel.violations(), 0);
    }

    #[test]
    fn test_read_word_discards_dummy() {
        let panel = SimPanel::new();
        let address = WordAddress::new(7, 60).unwrap();
        panel.set_word(address, 0xBEEF);
        let mut bus = panel.transport(BusTiming::default());

        bus.set_address(address);
        assert_eq!(bus.read_word().raw(), 0xBEEF);
        assert_eq!(panel.violations(), 0);
    }

    #[test]
    fn test_read_without_dummy_is_corrupt() {
        let panel = SimPanel::new();
        let address = WordAddress::new(7, 60).unwrap();
        panel.set_word(address, 0xBEEF);
        let mut bus = panel.transport(BusTiming::default());

        bus.set_address(address);
        bus.set_bus_direction(false);
        bus.select_chip(true);
        bus.select_command_mode(false);
        let high = bus.read_byte();
        let low = bus.read_byte();
        bus.select_chip(false);

        assert_ne!(u16::from_be_bytes([high, low]), 0xBEEF);
    }

    #[test]
    fn test_consecutive_reads_advance() {
        let panel = SimPanel::new();
        let first = WordAddress::new(0, 50).unwrap();
        let second = WordAddress::new(0, 51).unwrap();
        panel.set_word(first, 0x0102);
        panel.set_word(second, 0x0304);
        let mut bus = panel.transport(BusTiming::default());

        bus.set_address(first);
        bus.set_bus_direction(false);
        bus.select_chip(true);
        bus.select_command_mode(false);
        let _ = bus.read_byte();
        let bytes = [
            bus.read_byte(),
            bus.read_byte(),
            bus.read_byte(),
            bus.read_byte(),
        ];
        bus.select_chip(false);

        assert_eq!(bytes, [0x01, 0x02, 0x03, 0x04]);
    }
}
