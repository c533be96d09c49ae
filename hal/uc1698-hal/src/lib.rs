//! UC1698 Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the UC1698 driver needs from the
//! host microcontroller. Chip-specific HALs (RP2040, etc.) implement them,
//! and the simulated panel in `uc1698-drivers` implements them for tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Driver (uc1698-drivers)                │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  uc1698-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  uc1698-hal-  │       │   SimPanel    │
//! │    rp2040     │       │  (host tests) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Single control line (reset, strobes, selects)
//! - [`port::DataPort`] - The 8 bidirectional data lines

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod port;

// Re-export key traits at crate root for convenience
pub use gpio::{ActiveLow, BusLine, OutputPin};
pub use port::{DataPort, PortDirection};
