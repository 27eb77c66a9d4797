//! Click board driver implementations
//!
//! This crate builds on the traits in `click-hal`:
//!
//! - [`ism7`]: ISM7 sub-GHz radio, driven over UART with framed packets
//! - [`regbus`]: register access over I2C or SPI, the shared plumbing for
//!   register-mapped sensor boards

#![no_std]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod ism7;
pub mod regbus;

pub use ism7::{Ism7, Ism7Config, Ism7Error};
pub use regbus::{I2cRegisters, RegisterBus, RegisterError, SpiFlags, SpiRegisters, Unused};
