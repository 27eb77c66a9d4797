//! SPI device abstractions
//!
//! The trait models one chip on the bus rather than the bus itself:
//! implementations assert the board's CS line for the duration of each
//! call and release it afterwards.

/// SPI peripheral with its own chip select
pub trait SpiDevice {
    /// Error type for SPI operations
    type Error;

    /// Write data, discarding whatever is clocked in
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Read data (clocks out zeros)
    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Full-duplex transfer; `read` and `write` must be the same length
    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error>;

    /// Full-duplex transfer in place
    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), Self::Error>;

    /// Write `write`, then read into `read`, under one chip-select assertion
    ///
    /// This is the usual register-read shape: command/address byte out,
    /// register contents back.
    fn write_then_read(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error>;
}

impl<T: SpiDevice + ?Sized> SpiDevice for &mut T {
    type Error = T::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        T::write(self, data)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        T::read(self, buf)
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        T::transfer(self, read, write)
    }

    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), Self::Error> {
        T::transfer_in_place(self, data)
    }

    fn write_then_read(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error> {
        T::write_then_read(self, write, read)
    }
}

/// SPI configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock polarity
    pub polarity: Polarity,
    /// Clock phase
    pub phase: Phase,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self::with_mode(1_000_000, Mode::Mode0)
    }
}

impl SpiConfig {
    /// Build a configuration from a frequency and a numbered SPI mode
    pub fn with_mode(frequency: u32, mode: Mode) -> Self {
        let (polarity, phase) = mode.into();
        Self {
            frequency,
            polarity,
            phase,
        }
    }
}

/// SPI clock polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Clock idles low (CPOL=0)
    IdleLow,
    /// Clock idles high (CPOL=1)
    IdleHigh,
}

/// SPI clock phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Data captured on first clock transition (CPHA=0)
    CaptureOnFirstTransition,
    /// Data captured on second clock transition (CPHA=1)
    CaptureOnSecondTransition,
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl From<Mode> for (Polarity, Phase) {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Mode0 => (Polarity::IdleLow, Phase::CaptureOnFirstTransition),
            Mode::Mode1 => (Polarity::IdleLow, Phase::CaptureOnSecondTransition),
            Mode::Mode2 => (Polarity::IdleHigh, Phase::CaptureOnFirstTransition),
            Mode::Mode3 => (Polarity::IdleHigh, Phase::CaptureOnSecondTransition),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode3_config() {
        let config = SpiConfig::with_mode(8_000_000, Mode::Mode3);
        assert_eq!(config.frequency, 8_000_000);
        assert_eq!(config.polarity, Polarity::IdleHigh);
        assert_eq!(config.phase, Phase::CaptureOnSecondTransition);
    }

    #[test]
    fn test_default_is_mode0() {
        let config = SpiConfig::default();
        assert_eq!(config.polarity, Polarity::IdleLow);
        assert_eq!(config.phase, Phase::CaptureOnFirstTransition);
    }
}
