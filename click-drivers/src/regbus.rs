//! Register access over I2C or SPI
//!
//! Register-mapped Click boards usually ship with both an I2C and an SPI
//! variant that share the same register map. [`RegisterBus`] hides the
//! difference so a driver is written once against register reads and
//! writes.
//!
//! ```text
//! I2C write:  [reg][data...]
//! I2C read:   [reg] (repeated start) -> [data...]
//! SPI write:  [reg & !read | write][data...]
//! SPI read:   [reg | read] -> [data...]
//! ```

use core::convert::Infallible;
use core::fmt;

use click_hal::{I2cBus, SpiDevice};

/// Largest register write that fits the stack buffer
pub const MAX_WRITE_LEN: usize = 32;

/// Placeholder for the bus slot a [`RegisterBus`] does not use
///
/// Uninhabited, so the variant carrying it can never be built.
#[derive(Debug)]
pub enum Unused {}

impl I2cBus for Unused {
    type Error = Infallible;

    fn write(&mut self, _address: u8, _data: &[u8]) -> Result<(), Self::Error> {
        match *self {}
    }

    fn read(&mut self, _address: u8, _buf: &mut [u8]) -> Result<(), Self::Error> {
        match *self {}
    }

    fn write_read(
        &mut self,
        _address: u8,
        _write_data: &[u8],
        _read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        match *self {}
    }
}

impl SpiDevice for Unused {
    type Error = Infallible;

    fn write(&mut self, _data: &[u8]) -> Result<(), Self::Error> {
        match *self {}
    }

    fn read(&mut self, _buf: &mut [u8]) -> Result<(), Self::Error> {
        match *self {}
    }

    fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Self::Error> {
        match *self {}
    }

    fn transfer_in_place(&mut self, _data: &mut [u8]) -> Result<(), Self::Error> {
        match *self {}
    }

    fn write_then_read(&mut self, _write: &[u8], _read: &mut [u8]) -> Result<(), Self::Error> {
        match *self {}
    }
}

/// Direction bits OR-ed into the register byte on SPI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiFlags {
    /// Set on reads
    pub read: u8,
    /// Set on writes
    pub write: u8,
}

impl Default for SpiFlags {
    fn default() -> Self {
        // MSB set means read on most Click sensors
        Self {
            read: 0x80,
            write: 0x00,
        }
    }
}

/// Register access error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterError<EI, ES> {
    /// I2C bus error
    I2c(EI),
    /// SPI bus error
    Spi(ES),
    /// Write longer than [`MAX_WRITE_LEN`]
    TooLong,
}

impl<EI: fmt::Debug, ES: fmt::Debug> fmt::Display for RegisterError<EI, ES> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterError::I2c(e) => write!(f, "I2C error: {:?}", e),
            RegisterError::Spi(e) => write!(f, "SPI error: {:?}", e),
            RegisterError::TooLong => write!(f, "register write too long"),
        }
    }
}

/// A register-mapped device on either bus
pub enum RegisterBus<I, S> {
    I2c { bus: I, address: u8 },
    Spi { device: S, flags: SpiFlags },
}

/// Register device on I2C
pub type I2cRegisters<I> = RegisterBus<I, Unused>;

/// Register device on SPI
pub type SpiRegisters<S> = RegisterBus<Unused, S>;

type Error<I, S> = RegisterError<<I as I2cBus>::Error, <S as SpiDevice>::Error>;

impl<I: I2cBus> RegisterBus<I, Unused> {
    /// Device at a 7-bit I2C address
    pub fn i2c(bus: I, address: u8) -> Self {
        RegisterBus::I2c { bus, address }
    }
}

impl<S: SpiDevice> RegisterBus<Unused, S> {
    /// Device behind an SPI chip select
    pub fn spi(device: S, flags: SpiFlags) -> Self {
        RegisterBus::Spi { device, flags }
    }
}

impl<I: I2cBus, S: SpiDevice> RegisterBus<I, S> {
    /// Write consecutive registers starting at `reg`
    pub fn write_registers(&mut self, reg: u8, data: &[u8]) -> Result<(), Error<I, S>> {
        if data.len() > MAX_WRITE_LEN {
            return Err(RegisterError::TooLong);
        }

        let mut frame = [0u8; MAX_WRITE_LEN + 1];
        frame[1..=data.len()].copy_from_slice(data);
        let frame_len = data.len() + 1;

        match self {
            RegisterBus::I2c { bus, address } => {
                frame[0] = reg;
                bus.write(*address, &frame[..frame_len])
                    .map_err(RegisterError::I2c)
            }
            RegisterBus::Spi { device, flags } => {
                frame[0] = (reg & !flags.read) | flags.write;
                device
                    .write(&frame[..frame_len])
                    .map_err(RegisterError::Spi)
            }
        }
    }

    /// Read consecutive registers starting at `reg`
    pub fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Error<I, S>> {
        match self {
            RegisterBus::I2c { bus, address } => bus
                .write_read(*address, &[reg], buf)
                .map_err(RegisterError::I2c),
            RegisterBus::Spi { device, flags } => device
                .write_then_read(&[reg | flags.read], buf)
                .map_err(RegisterError::Spi),
        }
    }

    pub fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Error<I, S>> {
        self.write_registers(reg, &[value])
    }

    pub fn read_register(&mut self, reg: u8) -> Result<u8, Error<I, S>> {
        let mut buf = [0u8; 1];
        self.read_registers(reg, &mut buf)?;
        Ok(buf[0])
    }

    /// Replace the bits selected by `mask`, keeping the rest
    pub fn modify_register(&mut self, reg: u8, mask: u8, value: u8) -> Result<(), Error<I, S>> {
        let current = self.read_register(reg)?;
        self.write_register(reg, (current & !mask) | (value & mask))
    }

    /// Two registers as a big-endian word (high byte at `reg`)
    pub fn read_u16_be(&mut self, reg: u8) -> Result<u16, Error<I, S>> {
        let mut buf = [0u8; 2];
        self.read_registers(reg, &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Two registers as a little-endian word (low byte at `reg`)
    pub fn read_u16_le(&mut self, reg: u8) -> Result<u16, Error<I, S>> {
        let mut buf = [0u8; 2];
        self.read_registers(reg, &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }
}
