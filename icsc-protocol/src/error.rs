//! Protocol error taxonomy
//!
//! [`FlowError`] classifies why a received byte buffer is not a valid
//! frame for this station. Flow errors are ordinary values: decoding never
//! panics, and a malformed frame never stops a station.
//!
//! [`FrameError`] covers the encode side, where the only failures are
//! caller contract violations.

use core::fmt;

/// Why a received buffer was rejected
///
/// A successful decode (NO_ERROR, code 0) is represented by `Ok(Message)`,
/// so every variant here is a failure. Only the structural, addressing and
/// checksum variants are produced today; the rest are reserved for
/// stricter validation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum FlowError {
    /// Frame content is structurally unusable (reserved)
    BadFormat,
    /// Frame carries no usable message (reserved)
    VoidMsg,
    /// Fewer bytes than the smallest possible frame
    TooShortMsg,
    /// Origin station is not accepted (reserved)
    UnexpectedOrigin,
    /// Command is not accepted (reserved)
    UnexpectedCmd,
    /// Frame addressed to another station
    WrongDestStation,
    /// Declared payload length disagrees with the number of bytes received
    BadLenField,
    /// Checksum byte does not match header and payload
    BadChecksum,
    /// First byte is not SOH
    MissingSoh,
    /// Header is not followed by STX
    MissingStx,
    /// Payload is not followed by ETX
    MissingEtx,
    /// Frame does not end with EOT
    MissingEot,
    /// Frame did not complete in time (reserved)
    Timeout,
    /// Frame needed too many reads to complete (reserved)
    ManyRetries,
}

impl FlowError {
    /// Numeric code of this error; 0 is reserved for success
    pub const fn code(self) -> u8 {
        match self {
            FlowError::BadFormat => 1,
            FlowError::VoidMsg => 2,
            FlowError::TooShortMsg => 3,
            FlowError::UnexpectedOrigin => 4,
            FlowError::UnexpectedCmd => 5,
            FlowError::WrongDestStation => 6,
            FlowError::BadLenField => 7,
            FlowError::BadChecksum => 8,
            FlowError::MissingSoh => 9,
            FlowError::MissingStx => 10,
            FlowError::MissingEtx => 11,
            FlowError::MissingEot => 12,
            FlowError::Timeout => 13,
            FlowError::ManyRetries => 14,
        }
    }

    /// Check if reading more bytes could turn this buffer into a valid frame
    pub const fn is_incomplete(self) -> bool {
        matches!(self, FlowError::BadLenField | FlowError::TooShortMsg)
    }

    fn as_str(self) -> &'static str {
        match self {
            FlowError::BadFormat => "bad format",
            FlowError::VoidMsg => "void message",
            FlowError::TooShortMsg => "message too short",
            FlowError::UnexpectedOrigin => "unexpected origin station",
            FlowError::UnexpectedCmd => "unexpected command",
            FlowError::WrongDestStation => "addressed to another station",
            FlowError::BadLenField => "length field does not match frame size",
            FlowError::BadChecksum => "checksum mismatch",
            FlowError::MissingSoh => "missing SOH",
            FlowError::MissingStx => "missing STX",
            FlowError::MissingEtx => "missing ETX",
            FlowError::MissingEot => "missing EOT",
            FlowError::Timeout => "timed out",
            FlowError::ManyRetries => "too many retries",
        }
    }
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while encoding a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds 255 bytes and cannot be described by the LEN byte
    PayloadTooLarge,
    /// Buffer too small for encoding
    BufferTooSmall,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::PayloadTooLarge => f.write_str("payload exceeds 255 bytes"),
            FrameError::BufferTooSmall => f.write_str("buffer too small for frame"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_taxonomy_order() {
        assert_eq!(FlowError::BadFormat.code(), 1);
        assert_eq!(FlowError::WrongDestStation.code(), 6);
        assert_eq!(FlowError::MissingEot.code(), 12);
        assert_eq!(FlowError::ManyRetries.code(), 14);
    }

    #[test]
    fn test_only_length_errors_are_incomplete() {
        assert!(FlowError::BadLenField.is_incomplete());
        assert!(FlowError::TooShortMsg.is_incomplete());
        assert!(!FlowError::BadChecksum.is_incomplete());
        assert!(!FlowError::MissingEot.is_incomplete());
        assert!(!FlowError::WrongDestStation.is_incomplete());
    }
}
