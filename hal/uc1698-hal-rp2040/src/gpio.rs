//! Control line output

use embassy_rp::gpio::{Level, Output, Pin};
use embassy_rp::Peri;
use uc1698_hal::OutputPin;

/// A UC1698 control line on an RP2040 GPIO
///
/// The pin starts high, which is the released level of every
/// active-low bus line.
pub struct ControlPin<'d> {
    output: Output<'d>,
}

impl<'d> ControlPin<'d> {
    /// Configure `pin` as a push-pull output, initially high
    pub fn new(pin: Peri<'d, impl Pin>) -> Self {
        Self {
            output: Output::new(pin, Level::High),
        }
    }

    /// Wrap an already configured output
    pub fn from_output(output: Output<'d>) -> Self {
        Self { output }
    }
}

impl OutputPin for ControlPin<'_> {
    fn set_high(&mut self) {
        self.output.set_high();
    }

    fn set_low(&mut self) {
        self.output.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.output.is_set_high()
    }
}
