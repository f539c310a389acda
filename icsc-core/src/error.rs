//! Station error types
//!
//! Flow errors (malformed or foreign frames) are not here: they are
//! ordinary values reported through the receive loop. Everything in this
//! module either stops the loop or refuses to build a station.

use core::fmt;

use icsc_protocol::FrameError;

/// Fatal station errors
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StationError<E> {
    /// The transport failed; the station cannot continue on it
    Transport(E),
    /// An outgoing frame could not be built
    Frame(FrameError),
}

impl<E> From<FrameError> for StationError<E> {
    fn from(e: FrameError) -> Self {
        StationError::Frame(e)
    }
}

impl<E: fmt::Debug> fmt::Display for StationError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationError::Transport(e) => write!(f, "transport failure: {:?}", e),
            StationError::Frame(e) => write!(f, "cannot encode frame: {}", e),
        }
    }
}

/// Station configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The broadcast address cannot identify a station
    BroadcastStation,
    /// Reads must be allowed some time to complete
    ZeroReadTimeout,
    /// A line with no baud rate never carries a byte
    ZeroBaudrate,
    /// The read timeout expires before one character can arrive
    ReadTimeoutBelowCharTime,
    /// TOML parsing failed
    TomlParse,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::BroadcastStation => {
                f.write_str("station address 0 is reserved for broadcast")
            }
            ConfigError::ZeroReadTimeout => f.write_str("read timeout must be non-zero"),
            ConfigError::ZeroBaudrate => f.write_str("baud rate must be non-zero"),
            ConfigError::ReadTimeoutBelowCharTime => {
                f.write_str("read timeout is shorter than one character time")
            }
            ConfigError::TomlParse => f.write_str("invalid station configuration"),
        }
    }
}
