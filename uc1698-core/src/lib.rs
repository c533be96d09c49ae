//! Board-agnostic core logic for UC1698 LCD panels
//!
//! This crate contains everything about the controller that does not touch
//! a pin:
//!
//! - Command encoding (opcode table, one or two bytes per command)
//! - Framebuffer coordinate to RAM word mapping, including Y mirroring
//! - Packing of three monochrome sub-pixels into a 5/6/5 display word
//! - Panel configuration types and the `panel.toml` parser
//!
//! All of it is pure and runs on the host in unit tests.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod address;
pub mod command;
pub mod config;
pub mod pixel;

pub use address::{locate, AddressError, MirrorMode, PixelLocation, SubPosition, WordAddress};
pub use command::Command;
pub use config::{BusTiming, PanelConfig, TemperatureCompensation};
pub use pixel::PixelWord;
