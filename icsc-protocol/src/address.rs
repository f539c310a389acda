//! Station addresses and command codes
//!
//! Both are single bytes on the wire. Applications conventionally use
//! printable ASCII letters, so each type can be built from a `char` as
//! well as from a raw byte.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A `char` whose code point does not fit in one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CharRangeError;

impl fmt::Display for CharRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("character does not fit in a single byte")
    }
}

fn char_to_byte(c: char) -> Result<u8, CharRangeError> {
    u8::try_from(c).map_err(|_| CharRangeError)
}

fn fmt_byte(byte: u8, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if byte.is_ascii_graphic() {
        write!(f, "'{}'", byte as char)
    } else {
        write!(f, "{:#04x}", byte)
    }
}

/// Station address
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Address(u8);

impl Address {
    /// Destination meaning "every station"; no station may claim it
    pub const BROADCAST: Address = Address(0);

    /// Build from a raw byte
    pub const fn from_byte(byte: u8) -> Self {
        Self(byte)
    }

    /// Build from a character, using its byte value
    pub fn from_char(c: char) -> Result<Self, CharRangeError> {
        char_to_byte(c).map(Self)
    }

    /// Raw byte value
    pub const fn as_byte(self) -> u8 {
        self.0
    }

    /// Check if this is the broadcast address
    pub const fn is_broadcast(self) -> bool {
        self.0 == Self::BROADCAST.0
    }
}

impl From<u8> for Address {
    fn from(byte: u8) -> Self {
        Self(byte)
    }
}

impl From<Address> for u8 {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl TryFrom<char> for Address {
    type Error = CharRangeError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Self::from_char(c)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_broadcast() {
            f.write_str("broadcast")
        } else {
            fmt_byte(self.0, f)
        }
    }
}

/// Command code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command(u8);

impl Command {
    /// Keepalive request (ASCII ENQ)
    pub const PING: Command = Command(0x05);
    /// Keepalive reply (ASCII ACK)
    pub const PONG: Command = Command(0x06);

    /// Build from a raw byte
    pub const fn from_byte(byte: u8) -> Self {
        Self(byte)
    }

    /// Build from a character, using its byte value
    pub fn from_char(c: char) -> Result<Self, CharRangeError> {
        char_to_byte(c).map(Self)
    }

    /// Raw byte value
    pub const fn as_byte(self) -> u8 {
        self.0
    }

    /// Check if this code is claimed by the protocol itself
    pub const fn is_reserved(self) -> bool {
        self.0 == Self::PING.0 || self.0 == Self::PONG.0
    }
}

impl From<u8> for Command {
    fn from(byte: u8) -> Self {
        Self(byte)
    }
}

impl From<Command> for u8 {
    fn from(command: Command) -> Self {
        command.0
    }
}

impl TryFrom<char> for Command {
    type Error = CharRangeError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Self::from_char(c)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::PING => f.write_str("PING"),
            Self::PONG => f.write_str("PONG"),
            Self(byte) => fmt_byte(byte, f),
        }
    }
}

// Configuration files may write an address as `"B"` or as `66`.
#[cfg(feature = "serde")]
impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ByteVisitor).map(Self)
    }
}

#[cfg(feature = "serde")]
struct ByteVisitor;

#[cfg(feature = "serde")]
impl<'de> serde::de::Visitor<'de> for ByteVisitor {
    type Value = u8;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a single character or an integer in 0..=255")
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<u8, E> {
        u8::try_from(v).map_err(|_| E::invalid_value(serde::de::Unexpected::Unsigned(v), &self))
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<u8, E> {
        u8::try_from(v).map_err(|_| E::invalid_value(serde::de::Unexpected::Signed(v), &self))
    }

    fn visit_char<E: serde::de::Error>(self, v: char) -> Result<u8, E> {
        char_to_byte(v).map_err(|_| E::invalid_value(serde::de::Unexpected::Char(v), &self))
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<u8, E> {
        let mut chars = v.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.visit_char(c),
            _ => Err(E::invalid_value(serde::de::Unexpected::Str(v), &self)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_and_byte_constructors_agree() {
        assert_eq!(Address::from_char('A').unwrap(), Address::from_byte(65));
        assert_eq!(Command::from_char('D').unwrap(), Command::from(b'D'));
        assert_eq!(Address::try_from('C').unwrap().as_byte(), 67);
    }

    #[test]
    fn test_multibyte_char_rejected() {
        assert_eq!(Address::from_char('é').map(Address::as_byte), Ok(0xE9));
        assert_eq!(Address::from_char('€'), Err(CharRangeError));
        assert_eq!(Command::from_char('✓'), Err(CharRangeError));
    }

    #[test]
    fn test_broadcast() {
        assert!(Address::BROADCAST.is_broadcast());
        assert!(Address::from_byte(0).is_broadcast());
        assert!(!Address::from_char('B').unwrap().is_broadcast());
    }

    #[test]
    fn test_reserved_commands() {
        assert_eq!(Command::PING.as_byte(), 5);
        assert_eq!(Command::PONG.as_byte(), 6);
        assert!(Command::PING.is_reserved());
        assert!(!Command::from_byte(4).is_reserved());
        assert!(!Command::from_byte(7).is_reserved());
    }
}
