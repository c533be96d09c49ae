//! RP2040-specific HAL for UC1698 panels
//!
//! This crate provides RP2040 implementations of the shared `uc1698-hal`
//! traits on top of `embassy-rp` GPIO:
//!
//! - [`gpio::ControlPin`] - one push-pull control line
//! - [`port::FlexPort`] - eight bidirectional data lines
//!
//! Bit-banging through the SIO registers is fast enough for the
//! controller's 60ns strobe minimums at 125 MHz.

#![no_std]

pub mod gpio;
pub mod port;

pub use gpio::ControlPin;
pub use port::FlexPort;
