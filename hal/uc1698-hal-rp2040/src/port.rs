//! 8-bit parallel data port

use embassy_rp::gpio::{Flex, Level};
use uc1698_hal::{DataPort, PortDirection};

/// D0..D7 on eight RP2040 GPIOs
///
/// The pins do not need to be contiguous; each line is driven on its own.
pub struct FlexPort<'d> {
    lines: [Flex<'d>; 8],
    direction: PortDirection,
}

impl<'d> FlexPort<'d> {
    /// Build a port from D0..D7, in bit order
    ///
    /// The port starts as an input so it never fights the controller.
    pub fn new(mut lines: [Flex<'d>; 8]) -> Self {
        for line in lines.iter_mut() {
            line.set_as_input();
        }
        Self {
            lines,
            direction: PortDirection::Input,
        }
    }
}

impl DataPort for FlexPort<'_> {
    fn set_direction(&mut self, direction: PortDirection) {
        for line in self.lines.iter_mut() {
            match direction {
                PortDirection::Input => line.set_as_input(),
                PortDirection::Output => line.set_as_output(),
            }
        }
        self.direction = direction;
    }

    fn direction(&self) -> PortDirection {
        self.direction
    }

    fn write(&mut self, value: u8) {
        for (bit, line) in self.lines.iter_mut().enumerate() {
            let level = if value & (1 << bit) != 0 {
                Level::High
            } else {
                Level::Low
            };
            line.set_level(level);
        }
    }

    fn read(&mut self) -> u8 {
        self.lines
            .iter()
            .enumerate()
            .fold(0, |value, (bit, line)| {
                if line.is_high() {
                    value | (1 << bit)
                } else {
                    value
                }
            })
    }
}
