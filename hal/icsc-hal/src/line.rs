//! Serial line settings
//!
//! Stations never open a device themselves; whoever does uses these
//! settings. The engine reads them for one thing: the time a character
//! occupies the line, which bounds how short a read timeout may be.
//!
//! The character format uses the usual `8N1` notation. Frames carry raw
//! bytes, so the data width is fixed at eight bits; only parity and the
//! stop bit count vary.

use core::fmt;
use core::str::FromStr;
use core::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Data bits per character
pub const DATA_BITS: u8 = 8;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Parity bit mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

impl Parity {
    fn letter(self) -> char {
        match self {
            Parity::None => 'N',
            Parity::Even => 'E',
            Parity::Odd => 'O',
        }
    }

    fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'N' => Some(Parity::None),
            'E' => Some(Parity::Even),
            'O' => Some(Parity::Odd),
            _ => None,
        }
    }
}

/// Rejected character format notation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CharFormatError {
    /// Not of the form `8N1`
    Notation,
    /// Data width other than eight bits
    DataBits,
    /// Stop bit count other than one or two
    StopBits,
}

impl fmt::Display for CharFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharFormatError::Notation => f.write_str("expected a format such as \"8N1\""),
            CharFormatError::DataBits => f.write_str("frames need eight data bits"),
            CharFormatError::StopBits => f.write_str("stop bits must be 1 or 2"),
        }
    }
}

/// Character framing on the line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CharFormat {
    parity: Parity,
    stop_bits: u8,
}

impl Default for CharFormat {
    fn default() -> Self {
        Self::EIGHT_N_1
    }
}

impl CharFormat {
    /// `8N1`
    pub const EIGHT_N_1: CharFormat = CharFormat {
        parity: Parity::None,
        stop_bits: 1,
    };

    /// Build a format from its parity mode and stop bit count
    pub fn new(parity: Parity, stop_bits: u8) -> Result<Self, CharFormatError> {
        if !(1..=2).contains(&stop_bits) {
            return Err(CharFormatError::StopBits);
        }
        Ok(Self { parity, stop_bits })
    }

    pub fn parity(&self) -> Parity {
        self.parity
    }

    pub fn stop_bits(&self) -> u8 {
        self.stop_bits
    }

    /// Bits on the wire per byte: start, data, parity and stop bits
    pub fn bits_per_char(&self) -> u32 {
        let parity = u32::from(self.parity != Parity::None);
        1 + u32::from(DATA_BITS) + parity + u32::from(self.stop_bits)
    }
}

impl fmt::Display for CharFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", DATA_BITS, self.parity.letter(), self.stop_bits)
    }
}

impl FromStr for CharFormat {
    type Err = CharFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (Some(data), Some(parity), Some(stop), None) =
            (chars.next(), chars.next(), chars.next(), chars.next())
        else {
            return Err(CharFormatError::Notation);
        };

        let data = data.to_digit(10).ok_or(CharFormatError::Notation)?;
        let parity = Parity::from_letter(parity).ok_or(CharFormatError::Notation)?;
        let stop = stop.to_digit(10).ok_or(CharFormatError::Notation)?;
        if data != u32::from(DATA_BITS) {
            return Err(CharFormatError::DataBits);
        }
        // A single digit always fits
        Self::new(parity, stop as u8)
    }
}

#[cfg(feature = "serde")]
impl Serialize for CharFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for CharFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(CharFormatVisitor)
    }
}

#[cfg(feature = "serde")]
struct CharFormatVisitor;

#[cfg(feature = "serde")]
impl<'de> serde::de::Visitor<'de> for CharFormatVisitor {
    type Value = CharFormat;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a character format such as \"8N1\"")
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<CharFormat, E> {
        v.parse().map_err(E::custom)
    }
}

/// Line settings used when opening a port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SerialConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Character framing, `8N1` by default
    pub format: CharFormat,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baudrate: 115200,
            format: CharFormat::EIGHT_N_1,
        }
    }
}

impl SerialConfig {
    /// Time one byte occupies the line, rounded up to the next nanosecond
    ///
    /// `None` when the baud rate is zero.
    pub fn char_time(&self) -> Option<Duration> {
        self.transfer_time(1)
    }

    /// Time `bytes` back-to-back bytes occupy the line
    ///
    /// `None` when the baud rate is zero.
    pub fn transfer_time(&self, bytes: usize) -> Option<Duration> {
        if self.baudrate == 0 {
            return None;
        }
        let bits = u64::from(self.format.bits_per_char()) * bytes as u64;
        let nanos = (bits * NANOS_PER_SEC).div_ceil(u64::from(self.baudrate));
        Some(Duration::from_nanos(nanos))
    }
}
