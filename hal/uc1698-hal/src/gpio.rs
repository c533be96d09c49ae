//! Control line abstractions
//!
//! The UC1698 bus has five single-bit control lines. All of them are
//! active-low: asserting a line drives it to logic 0.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

impl<T: OutputPin + ?Sized> OutputPin for &mut T {
    fn set_high(&mut self) {
        T::set_high(self)
    }

    fn set_low(&mut self) {
        T::set_low(self)
    }

    fn is_set_high(&self) -> bool {
        T::is_set_high(self)
    }
}

/// The control lines of the UC1698 8080-style bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusLine {
    /// CS0: controller takes part in the transfer while asserted
    ChipSelect,
    /// CD: asserted = command byte, released = display data
    CommandData,
    /// RD: read strobe, data is driven by the controller while asserted
    ReadStrobe,
    /// WR: write strobe, data is latched when released
    WriteStrobe,
    /// RST: hardware reset
    Reset,
}

/// An active-low control line
///
/// Wraps an [`OutputPin`] so callers talk in terms of asserting and
/// releasing a signal rather than electrical levels.
pub struct ActiveLow<P> {
    pin: P,
}

impl<P: OutputPin> ActiveLow<P> {
    /// Wrap a pin; the line is released (driven high) immediately
    pub fn new(pin: P) -> Self {
        let mut line = Self { pin };
        line.release();
        line
    }

    /// Drive the line to its active (low) level
    pub fn assert(&mut self) {
        self.pin.set_low();
    }

    /// Drive the line to its idle (high) level
    pub fn release(&mut self) {
        self.pin.set_high();
    }

    /// Assert or release depending on `active`
    pub fn set_active(&mut self, active: bool) {
        if active {
            self.assert();
        } else {
            self.release();
        }
    }

    /// Check whether the line is currently asserted
    pub fn is_asserted(&self) -> bool {
        self.pin.is_set_low()
    }

    /// Give back the underlying pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}
