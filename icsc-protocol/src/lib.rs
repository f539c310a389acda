//! ICSC Serial Protocol
//!
//! Stations on a shared half-duplex serial bus exchange framed,
//! checksummed messages addressed by a single-byte station id. Address
//! `0` is the broadcast address.
//!
//! # Frame Format
//!
//! ```text
//! ┌─────┬──────┬──────┬─────┬─────┬─────┬──────────┬─────┬─────┬─────┐
//! │ SOH │ DEST │ ORIG │ CMD │ LEN │ STX │ PAYLOAD  │ ETX │ CHK │ EOT │
//! │ 1B  │ 1B   │ 1B   │ 1B  │ 1B  │ 1B  │ 0–255B   │ 1B  │ 1B  │ 1B  │
//! └─────┴──────┴──────┴─────┴─────┴─────┴──────────┴─────┴─────┴─────┘
//! ```
//!
//! `CHK` is the byte sum of `DEST`, `ORIG`, `CMD`, `LEN` and the payload,
//! modulo 256.

#![no_std]
#![deny(unsafe_code)]

pub mod address;
pub mod error;
pub mod frame;

pub use address::{Address, CharRangeError, Command};
pub use error::{FlowError, FrameError};
pub use frame::{
    checksum, decode, encode, encode_into, FrameBytes, Message, Payload, EOT, ETX, FRAME_OVERHEAD,
    MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE, SOH, STX,
};
