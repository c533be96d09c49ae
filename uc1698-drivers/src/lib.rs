//! UC1698 display driver
//!
//! This crate drives a UC1698 controller over its 8080-style parallel bus
//! using the traits from `uc1698-hal`:
//!
//! - [`transport`] - byte transfers with timed strobes
//! - [`word`] - 16-bit display words and command bytes on top of the transport
//! - [`display`] - the [`Uc1698`] driver: init, setters, pixel read-modify-write, fills
//! - [`sim`] - a simulated controller for host tests (feature `sim`)
//! - `graphics` - `embedded-graphics` support (feature `graphics`)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod display;
#[cfg(feature = "graphics")]
pub mod graphics;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod transport;
pub mod word;

pub use display::{Error, PixelUpdate, Uc1698};
pub use transport::{BusTransport, ControlLines};
