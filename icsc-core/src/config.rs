//! Station configuration
//!
//! The engine consumes `station` and `read_timeout_ms`. The port path and
//! line settings are carried for whoever opens the device; the line
//! settings also bound how short the read timeout may be.
//!
//! ```toml
//! station = "B"
//! read_timeout_ms = 500
//! port = "/dev/ttyUSB0"
//!
//! [serial]
//! baudrate = 115200
//! format = "8N1"
//! ```

use alloc::string::String;
use core::time::Duration;

use icsc_hal::SerialConfig;
use icsc_protocol::Address;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default bound on a single byte read
pub const DEFAULT_READ_TIMEOUT_MS: u32 = 1000;

#[cfg(feature = "serde")]
fn default_read_timeout_ms() -> u32 {
    DEFAULT_READ_TIMEOUT_MS
}

/// Configuration for one station
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StationConfig {
    /// This station's address; never the broadcast address
    pub station: Address,
    /// How long a single byte read may block, in milliseconds
    ///
    /// Passed to every [`SerialRx::read_byte`](icsc_hal::SerialRx::read_byte).
    /// The transport has to honor it: `IoSerial` and `MockSerial` ignore the
    /// value, so with those the bound comes from the device's own read
    /// timeout. A transport that blocks forever on a silent line keeps
    /// [`Station::run`](crate::Station::run) from ever seeing a cancel.
    #[cfg_attr(feature = "serde", serde(default = "default_read_timeout_ms"))]
    pub read_timeout_ms: u32,
    /// Serial device path
    #[cfg_attr(feature = "serde", serde(default))]
    pub port: Option<String>,
    /// Line settings for the device
    #[cfg_attr(feature = "serde", serde(default))]
    pub serial: SerialConfig,
}

impl StationConfig {
    /// Configuration with default timeout and line settings
    pub fn new(station: Address) -> Self {
        Self {
            station,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            port: None,
            serial: SerialConfig::default(),
        }
    }

    /// Override the byte read timeout
    pub fn with_read_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.read_timeout_ms = timeout_ms;
        self
    }

    /// Bound on a single byte read
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.read_timeout_ms))
    }

    /// Check the invariants a station relies on
    ///
    /// A read timeout shorter than one character time would report an idle
    /// bus in the middle of every byte.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.station.is_broadcast() {
            return Err(ConfigError::BroadcastStation);
        }
        if self.read_timeout_ms == 0 {
            return Err(ConfigError::ZeroReadTimeout);
        }
        let char_time = self.serial.char_time().ok_or(ConfigError::ZeroBaudrate)?;
        if self.read_timeout() < char_time {
            return Err(ConfigError::ReadTimeoutBelowCharTime);
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    #[cfg(feature = "toml")]
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input).map_err(|_e| {
            #[cfg(feature = "defmt")]
            defmt::warn!("Station config rejected: invalid TOML");
            ConfigError::TomlParse
        })?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icsc_hal::{CharFormat, Parity};

    #[test]
    fn test_defaults() {
        let config = StationConfig::new(Address::from_byte(b'B'));
        assert_eq!(config.read_timeout(), Duration::from_secs(1));
        assert_eq!(config.serial, SerialConfig::default());
        assert!(config.port.is_none());
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_broadcast_station_rejected() {
        let config = StationConfig::new(Address::BROADCAST);
        assert_eq!(config.validate(), Err(ConfigError::BroadcastStation));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = StationConfig::new(Address::from_byte(1)).with_read_timeout_ms(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroReadTimeout));
    }

    #[test]
    fn test_zero_baudrate_rejected() {
        let mut config = StationConfig::new(Address::from_byte(b'B'));
        config.serial.baudrate = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroBaudrate));
    }

    #[test]
    fn test_timeout_must_cover_one_character() {
        // One 8N1 character takes about 1.04 ms at 9600 baud
        let mut config = StationConfig::new(Address::from_byte(b'B')).with_read_timeout_ms(1);
        config.serial.baudrate = 9600;
        assert_eq!(config.validate(), Err(ConfigError::ReadTimeoutBelowCharTime));

        config.read_timeout_ms = 2;
        assert_eq!(config.validate(), Ok(()));

        config.serial.format = CharFormat::new(Parity::Even, 2).unwrap();
        config.serial.baudrate = 300;
        assert_eq!(config.serial.char_time(), Some(Duration::from_millis(40)));
        config.read_timeout_ms = 39;
        assert_eq!(config.validate(), Err(ConfigError::ReadTimeoutBelowCharTime));
        config.read_timeout_ms = 40;
        assert_eq!(config.validate(), Ok(()));
    }
}
