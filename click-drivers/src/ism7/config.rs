//! ISM7 driver timing configuration

use click_hal::uart::UartConfig;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Timing budgets for the ISM7 driver
///
/// All waits are counted in ticks of `tick_ms` milliseconds, so the worst
/// case latency of each operation is bounded by the number of polls rather
/// than by a wall clock.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ism7Config {
    /// Length of one polling tick in milliseconds
    pub tick_ms: u32,
    /// Ticks to wait for RTS to go low before giving up on a send
    pub rts_timeout_ticks: u32,
    /// Ticks without a received byte before a read gives up
    pub rx_timeout_ticks: u32,
    /// Receive attempts granted to each command/response operation
    pub response_wait_s: u8,
    /// Length of the RST low pulse for a hardware reset
    pub reset_pulse_ms: u32,
    /// Time the module needs after reset before it accepts commands
    pub boot_delay_ms: u32,
}

impl Default for Ism7Config {
    fn default() -> Self {
        Self {
            tick_ms: 1,
            rts_timeout_ticks: 1000,
            rx_timeout_ticks: 1000,
            response_wait_s: 5,
            reset_pulse_ms: 10,
            boot_delay_ms: 300,
        }
    }
}

impl Ism7Config {
    /// Worst-case milliseconds spent waiting for RTS
    pub fn rts_budget_ms(&self) -> u32 {
        self.rts_timeout_ticks.saturating_mul(self.tick_ms)
    }

    /// Worst-case milliseconds a single byte wait can take
    pub fn rx_budget_ms(&self) -> u32 {
        self.rx_timeout_ticks.saturating_mul(self.tick_ms)
    }

    /// Serial settings of the module's command interface
    ///
    /// 115200 8N1 as shipped. RTS is polled by the driver, so hardware flow
    /// control stays off on the host UART.
    pub fn uart_config() -> UartConfig {
        UartConfig {
            flow_control: false,
            ..UartConfig::default()
        }
    }
}
