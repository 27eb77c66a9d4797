//! Click board hardware abstraction layer
//!
//! This crate defines the bus and pin traits that Click board drivers are
//! written against. Board-support crates implement them for a specific MCU;
//! the drivers never touch registers of the host chip directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  click-drivers (ISM7, register bus)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  click-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  board-support package (UART/I2C/SPI)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial communication
//! - [`i2c::I2cBus`] - I2C bus operations
//! - [`spi::SpiDevice`] - SPI device operations
//!
//! Delays are taken from `embedded_hal::delay::DelayNs` by the drivers.

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;
pub mod spi;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, OutputPin};
pub use i2c::I2cBus;
pub use spi::SpiDevice;
pub use uart::{ErrorType, Uart, UartRx, UartTx};
