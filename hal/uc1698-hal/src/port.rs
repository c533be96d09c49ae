//! Parallel data port abstraction
//!
//! The UC1698 exchanges bytes over 8 data lines (D0..D7) that switch
//! between host-driven (write) and controller-driven (read).

/// Direction of the 8 data lines, seen from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortDirection {
    /// Host samples the lines (controller drives)
    Input,
    /// Host drives the lines
    Output,
}

/// 8-bit bidirectional data port
///
/// No method can fail: the bus has no acknowledge or status channel, and a
/// disconnected panel simply reads back whatever is floating on the lines.
pub trait DataPort {
    /// Configure the 8 data lines as input or output
    ///
    /// Must not be called while the controller is driving the bus
    /// (read strobe asserted).
    fn set_direction(&mut self, direction: PortDirection);

    /// Current direction of the data lines
    fn direction(&self) -> PortDirection;

    /// Drive `value` onto D0..D7 (D0 = bit 0)
    ///
    /// Only meaningful while the port is an output.
    fn write(&mut self, value: u8);

    /// Sample D0..D7
    ///
    /// Only meaningful while the port is an input.
    fn read(&mut self) -> u8;
}

impl<T: DataPort + ?Sized> DataPort for &mut T {
    fn set_direction(&mut self, direction: PortDirection) {
        T::set_direction(self, direction)
    }

    fn direction(&self) -> PortDirection {
        T::direction(self)
    }

    fn write(&mut self, value: u8) {
        T::write(self, value)
    }

    fn read(&mut self) -> u8 {
        T::read(self)
    }
}
