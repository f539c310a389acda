//! ICSC station engine
//!
//! A [`Station`] owns one serial transport and one station address. It
//! sends fire-and-forget frames, and its receive loop reassembles frames
//! from a timeout-bounded byte stream and dispatches them to handlers
//! registered per command code:
//!
//! ```text
//! transport ──read_byte──▶ FrameReader ──decode──▶ Station ──▶ Handler
//!     ▲                                                           │
//!     └──────────────────────write_blocking──── Link ◀────────────┘
//! ```
//!
//! Every station answers `PING` with `PONG` out of the box.
//!
//! # Features
//!
//! - `defmt` - logging through defmt
//! - `serde` - derive serde for [`StationConfig`] and the types it holds
//! - `toml` - `StationConfig::from_toml`; host only, the `toml` crate
//!   needs `alloc::sync`, which thumbv6m does not have

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod cancel;
pub mod config;
pub mod error;
pub mod reader;
pub mod station;

pub use cancel::CancelToken;
pub use config::{StationConfig, DEFAULT_READ_TIMEOUT_MS};
pub use error::{ConfigError, StationError};
pub use reader::{Cycle, FrameReader};
pub use station::{Handler, Link, PingResponder, Poll, Registry, Shutdown, Station};

pub use icsc_hal::{CharFormat, Parity, ReadOutcome, Serial, SerialConfig, SerialRx, SerialTx};
pub use icsc_protocol::{Address, Command, FlowError, FrameError, Message};
