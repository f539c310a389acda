//! Station engine
//!
//! A station owns its address, its transport and its command registry.
//! Sending is fire-and-forget. Receiving is a strictly sequential loop:
//! frame N is fully dispatched before frame N+1 is read, so handlers may
//! reply synchronously.
//!
//! # Receive cycle
//!
//! ```text
//! read/reassemble ─┬─ nothing, timed out ─────▶ Idle (keep going)
//!                  ├─ nothing, stream closed ─▶ Closed (loop ends)
//!                  ├─ flow error ─────────────▶ Rejected (reported, keep going)
//!                  └─ message ─┬─ handler ────▶ Dispatched
//!                              └─ no handler ─▶ Dropped (silently)
//! ```

mod handler;
mod ping;
mod registry;

use alloc::boxed::Box;
use core::time::Duration;

use icsc_hal::Serial;
use icsc_protocol::{Address, Command, FlowError, Message};

use crate::cancel::CancelToken;
use crate::config::StationConfig;
use crate::error::{ConfigError, StationError};
use crate::reader::{Cycle, FrameReader};

pub use handler::{Handler, Link};
pub use ping::PingResponder;
pub use registry::{BoxedHandler, Registry};

use handler::FnHandler;

/// Result of a single receive cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Poll {
    /// No bytes arrived within the read timeout
    Idle,
    /// No bytes arrived and the transport is closed
    Closed,
    /// A message was handed to its handler
    Dispatched(Command),
    /// A message arrived for a command nobody registered
    Dropped(Command),
    /// The received bytes were not a valid frame for this station
    Rejected(FlowError),
}

/// Why [`Station::run`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Shutdown {
    /// The cancel token was triggered
    Cancelled,
    /// The transport closed
    EndOfStream,
}

/// One addressable endpoint on the bus
pub struct Station<S: Serial> {
    address: Address,
    serial: S,
    reader: FrameReader,
    registry: Registry<S>,
    cancel: CancelToken,
}

impl<S: Serial> Station<S> {
    /// Create a station with default settings
    ///
    /// Fails if `address` is the broadcast address.
    pub fn new(serial: S, address: Address) -> Result<Self, ConfigError> {
        Self::from_config(serial, &StationConfig::new(address))
    }

    /// Create a station from a validated configuration
    pub fn from_config(serial: S, config: &StationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut registry = Registry::new();
        registry.insert(Command::PING, Box::new(PingResponder));

        Ok(Self {
            address: config.station,
            serial,
            reader: FrameReader::new(config.station, config.read_timeout()),
            registry,
            cancel: CancelToken::new(),
        })
    }

    /// This station's address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Bound on each byte read
    pub fn read_timeout(&self) -> Duration {
        self.reader.timeout()
    }

    /// Token that stops [`run`](Self::run) from any thread
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Install the handler for `cmd`, replacing any previous one
    pub fn register<H>(&mut self, cmd: Command, handler: H)
    where
        H: Handler<S> + Send + 'static,
    {
        if self.registry.insert(cmd, Box::new(handler)).is_some() {
            #[cfg(feature = "defmt")]
            defmt::debug!("Handler for {} replaced", cmd);
        }
    }

    /// Install a closure as the handler for `cmd`
    pub fn register_fn<F>(&mut self, cmd: Command, handler: F)
    where
        F: FnMut(&Message, &mut Link<'_, S>) -> Result<(), StationError<S::Error>>
            + Send
            + 'static,
    {
        self.register(cmd, FnHandler(handler));
    }

    /// Check if `cmd` has a handler
    pub fn is_registered(&self, cmd: Command) -> bool {
        self.registry.contains(cmd)
    }

    /// Registered handlers
    pub fn registry(&self) -> &Registry<S> {
        &self.registry
    }

    /// Send a frame to `dest`
    pub fn send(
        &mut self,
        dest: Address,
        cmd: Command,
        payload: &[u8],
    ) -> Result<(), StationError<S::Error>> {
        self.link().send(dest, cmd, payload)
    }

    /// Send a frame to every station
    pub fn broadcast(
        &mut self,
        cmd: Command,
        payload: &[u8],
    ) -> Result<(), StationError<S::Error>> {
        self.link().broadcast(cmd, payload)
    }

    fn link(&mut self) -> Link<'_, S> {
        Link::new(self.address, &mut self.serial)
    }

    /// Run one read, reassemble and dispatch cycle
    ///
    /// Blocks for at most one read timeout when the bus is idle.
    pub fn poll(&mut self) -> Result<Poll, StationError<S::Error>> {
        let cycle = self
            .reader
            .next_frame(&mut self.serial)
            .map_err(StationError::Transport)?;

        match cycle {
            Cycle::Idle => Ok(Poll::Idle),
            Cycle::Closed => Ok(Poll::Closed),
            Cycle::Frame(Err(err)) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Frame rejected: {}", err);
                Ok(Poll::Rejected(err))
            }
            Cycle::Frame(Ok(message)) => self.dispatch(&message),
        }
    }

    fn dispatch(&mut self, message: &Message) -> Result<Poll, StationError<S::Error>> {
        let Some(handler) = self.registry.get_mut(message.cmd) else {
            #[cfg(feature = "defmt")]
            defmt::debug!("No handler for {} from {}, dropped", message.cmd, message.orig);
            return Ok(Poll::Dropped(message.cmd));
        };

        #[cfg(feature = "defmt")]
        defmt::debug!("Dispatching {} from {}", message.cmd, message.orig);

        let mut link = Link::new(self.address, &mut self.serial);
        handler.handle(message, &mut link)?;
        Ok(Poll::Dispatched(message.cmd))
    }

    /// Receive and dispatch until cancelled or the transport closes
    ///
    /// Every rejected frame is passed to `report`; none of them stops the
    /// loop. Idle timeouts are not reported. Transport failures, including
    /// those hit by a handler while replying, end the loop with `Err`.
    ///
    /// Cancellation is checked between reads, so the transport must return
    /// [`ReadOutcome::Timeout`](icsc_hal::ReadOutcome::Timeout) once the read
    /// timeout passes. `IoSerial` and `MockSerial` ignore the timeout they are
    /// given; a device behind `IoSerial` needs its own read timeout, or a
    /// silent bus blocks this loop and a cancel is never observed.
    pub fn run<F>(&mut self, mut report: F) -> Result<Shutdown, StationError<S::Error>>
    where
        F: FnMut(FlowError),
    {
        #[cfg(feature = "defmt")]
        defmt::info!("Station {} listening", self.address);

        loop {
            if self.cancel.is_cancelled() {
                #[cfg(feature = "defmt")]
                defmt::info!("Station {} cancelled", self.address);
                return Ok(Shutdown::Cancelled);
            }

            match self.poll()? {
                Poll::Closed => {
                    #[cfg(feature = "defmt")]
                    defmt::info!("Station {} transport closed", self.address);
                    return Ok(Shutdown::EndOfStream);
                }
                Poll::Rejected(err) => report(err),
                Poll::Idle | Poll::Dispatched(_) | Poll::Dropped(_) => {}
            }
        }
    }

    /// Borrow the transport
    pub fn serial(&self) -> &S {
        &self.serial
    }

    /// Mutably borrow the transport
    pub fn serial_mut(&mut self) -> &mut S {
        &mut self.serial
    }

    /// Consume the station and return its transport
    pub fn into_serial(self) -> S {
        self.serial
    }
}

impl<S: Serial> core::fmt::Debug for Station<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Station")
            .field("address", &self.address)
            .field("read_timeout", &self.reader.timeout())
            .field("commands", &self.registry)
            .finish_non_exhaustive()
    }
}
