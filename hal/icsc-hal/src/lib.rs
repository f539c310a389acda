//! ICSC Hardware Abstraction Layer
//!
//! Defines the transport boundary of an ICSC station. The protocol engine
//! never touches a device directly: it writes whole frames and reads one
//! byte at a time, with every read bounded by a timeout.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  icsc-core (station engine)             │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  icsc-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │   IoSerial    │       │  MockSerial   │
//! │ (embedded-io) │       │   (tests)     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`serial::SerialTx`] - frame transmission
//! - [`serial::SerialRx`] - timeout-bounded single byte reception
//! - [`serial::Serial`] - both directions on one device
//!
//! [`line::SerialConfig`] carries the line settings and the character time
//! they imply.

#![no_std]
#![deny(unsafe_code)]

#[cfg(feature = "mock")]
extern crate alloc;

pub mod io;
pub mod line;
#[cfg(feature = "mock")]
pub mod mock;
pub mod serial;

// Re-export key traits at crate root for convenience
pub use io::IoSerial;
#[cfg(feature = "mock")]
pub use mock::{MockError, MockSerial};
pub use line::{CharFormat, CharFormatError, Parity, SerialConfig};
pub use serial::{ErrorType, ReadOutcome, Serial, SerialRx, SerialTx};
