//! Parallel bus transport
//!
//! Moves single bytes across the 8080-style bus. Every control line is
//! active-low and wrapped in [`ActiveLow`], so this layer speaks in terms of
//! asserting and releasing signals.
//!
//! The transport knows nothing about addressing. It does not bracket
//! transfers with chip-select either; that is the job of the word protocol
//! in [`crate::word`].
//!
//! There is no error path here. A disconnected or stuck bus reads back
//! whatever is floating on the data lines and writes go nowhere.

use embedded_hal::delay::DelayNs;
use uc1698_core::config::BusTiming;
use uc1698_hal::{ActiveLow, DataPort, OutputPin, PortDirection};

/// The five control lines of the bus
///
/// All lines share one pin type. Chip HALs expose a single type-erased
/// output, and so does the simulated panel.
pub struct ControlLines<P> {
    /// CS0
    pub chip_select: P,
    /// CD (asserted = command)
    pub command_data: P,
    /// RD
    pub read_strobe: P,
    /// WR
    pub write_strobe: P,
    /// RST
    pub reset: P,
}

/// Byte-level access to the UC1698 bus
pub struct BusTransport<P, D, T> {
    chip_select: ActiveLow<P>,
    command_data: ActiveLow<P>,
    read_strobe: ActiveLow<P>,
    write_strobe: ActiveLow<P>,
    reset: ActiveLow<P>,
    port: D,
    delay: T,
    timing: BusTiming,
}

impl<P, D, T> BusTransport<P, D, T>
where
    P: OutputPin,
    D: DataPort,
    T: DelayNs,
{
    /// Take ownership of the bus
    ///
    /// Every control line is released and the data port is switched to
    /// output. Reset delays below the controller minimums are raised.
    pub fn new(lines: ControlLines<P>, mut port: D, delay: T, timing: BusTiming) -> Self {
        // Release the strobes before chip-select so nothing latches
        let write_strobe = ActiveLow::new(lines.write_strobe);
        let read_strobe = ActiveLow::new(lines.read_strobe);
        let command_data = ActiveLow::new(lines.command_data);
        let chip_select = ActiveLow::new(lines.chip_select);
        let reset = ActiveLow::new(lines.reset);

        port.set_direction(PortDirection::Output);

        Self {
            chip_select,
            command_data,
            read_strobe,
            write_strobe,
            reset,
            port,
            delay,
            timing: timing.clamped(),
        }
    }

    /// Active timing parameters
    pub fn timing(&self) -> &BusTiming {
        &self.timing
    }

    /// Configure the data lines as output (`true`) or input (`false`)
    ///
    /// Does nothing if the port already points that way.
    pub fn set_bus_direction(&mut self, output: bool) {
        let direction = if output {
            PortDirection::Output
        } else {
            PortDirection::Input
        };
        if self.port.direction() != direction {
            self.port.set_direction(direction);
        }
    }

    /// Assert or release chip-select
    pub fn select_chip(&mut self, active: bool) {
        self.chip_select.set_active(active);
    }

    /// Select command (`true`) or display data (`false`) transfers
    pub fn select_command_mode(&mut self, is_command: bool) {
        self.command_data.set_active(is_command);
    }

    /// Assert or release the hardware reset line
    pub fn set_reset(&mut self, active: bool) {
        self.reset.set_active(active);
    }

    /// Drive one byte onto the bus and pulse the write strobe
    ///
    /// The controller latches the data on the rising edge of WR.
    pub fn write_byte(&mut self, value: u8) {
        self.set_bus_direction(true);
        self.port.write(value);
        self.write_strobe.assert();
        self.delay.delay_ns(self.timing.write_pulse_ns);
        self.write_strobe.release();
    }

    /// Pulse the read strobe and sample one byte from the bus
    ///
    /// The data lines are sampled while RD is still asserted.
    pub fn read_byte(&mut self) -> u8 {
        self.set_bus_direction(false);
        self.read_strobe.assert();
        self.delay.delay_ns(self.timing.read_pulse_ns);
        let value = self.port.read();
        self.read_strobe.release();
        value
    }

    /// Pulse the reset line
    ///
    /// Holds RST asserted for `reset_hold_ms`, then waits `reset_release_ms`
    /// before the controller accepts commands.
    pub fn hardware_reset(&mut self) {
        debug!(
            "hardware reset: hold {}ms, release {}ms",
            self.timing.reset_hold_ms,
            self.timing.reset_release_ms
        );
        self.set_reset(true);
        self.delay.delay_ms(self.timing.reset_hold_ms);
        self.set_reset(false);
        self.delay.delay_ms(self.timing.reset_release_ms);
    }

    /// Wait for a command byte to take effect
    pub(crate) fn settle_command(&mut self) {
        if self.timing.command_settle_us > 0 {
            self.delay.delay_us(self.timing.command_settle_us);
        }
    }

    /// Busy-wait for `ms` milliseconds
    pub(crate) fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Give back the pins, port and delay
    pub fn release(self) -> (ControlLines<P>, D, T) {
        let lines = ControlLines {
            chip_select: self.chip_select.into_inner(),
            command_data: self.command_data.into_inner(),
            read_strobe: self.read_strobe.into_inner(),
            write_strobe: self.write_strobe.into_inner(),
            reset: self.reset.into_inner(),
        };
        (lines, self.port, self.delay)
    }
}
