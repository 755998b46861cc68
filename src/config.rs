//! Boot-time console configuration.

use core::fmt;

use log::LevelFilter;

/// Input clock of the 16550 divided by 16; the baud divisor is taken against this.
pub const UART_CLOCK: u32 = 115_200;

/// First serial port.
pub const COM1: u16 = 0x3F8;
/// Second serial port, used for kernel logs.
pub const COM2: u16 = 0x2F8;
/// First parallel port.
pub const LPT1: u16 = 0x378;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    ZeroBaudRate,
    /// The rate does not divide the UART clock into a 16-bit divisor.
    UnsupportedBaudRate(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroBaudRate => write!(f, "baud rate must be nonzero"),
            ConfigError::UnsupportedBaudRate(rate) => {
                write!(f, "baud rate {} does not evenly divide {}", rate, UART_CLOCK)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub serial_base: u16,
    pub baud_rate: u32,
    /// Iterations to wait for a transmitter before giving up on a byte.
    pub tx_spin_limit: u32,
    pub parallel_base: u16,
    pub log_level: LevelFilter,
}

impl ConsoleConfig {
    pub const fn new() -> Self {
        ConsoleConfig {
            serial_base: COM1,
            baud_rate: 9600,
            tx_spin_limit: 12_800,
            parallel_base: LPT1,
            log_level: default_log_level(),
        }
    }

    pub const fn with_serial_base(mut self, base: u16) -> Self {
        self.serial_base = base;
        self
    }

    pub const fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub const fn with_tx_spin_limit(mut self, limit: u32) -> Self {
        self.tx_spin_limit = limit;
        self
    }

    pub const fn with_log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        self
    }

    /// Divisor latch value for the configured baud rate.
    pub fn divisor(&self) -> Result<u16, ConfigError> {
        if self.baud_rate == 0 {
            return Err(ConfigError::ZeroBaudRate);
        }
        if UART_CLOCK % self.baud_rate != 0 {
            return Err(ConfigError::UnsupportedBaudRate(self.baud_rate));
        }
        u16::try_from(UART_CLOCK / self.baud_rate)
            .map_err(|_| ConfigError::UnsupportedBaudRate(self.baud_rate))
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::new()
    }
}

const fn default_log_level() -> LevelFilter {
    if cfg!(feature = "no_logs") {
        LevelFilter::Off
    } else if cfg!(feature = "log_trace") {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_divisor_is_twelve() {
        assert_eq!(ConsoleConfig::new().divisor(), Ok(12));
    }

    #[test]
    fn fastest_rate_has_divisor_one() {
        let config = ConsoleConfig::new().with_baud_rate(115_200);
        assert_eq!(config.divisor(), Ok(1));
    }

    #[test]
    fn rejects_rates_the_uart_cannot_produce() {
        assert_eq!(
            ConsoleConfig::new().with_baud_rate(0).divisor(),
            Err(ConfigError::ZeroBaudRate)
        );
        assert_eq!(
            ConsoleConfig::new().with_baud_rate(7000).divisor(),
            Err(ConfigError::UnsupportedBaudRate(7000))
        );
    }
}
