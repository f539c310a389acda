//! Command handlers and the sending capability they receive

use icsc_hal::SerialTx;
use icsc_protocol::{encode, Address, Command, Message};

use crate::error::StationError;

/// Reaction to a received command
///
/// Handlers run synchronously on the receive loop; the next frame is not
/// read until `handle` returns. The only failure a handler reports is a
/// fatal one from sending through `link`.
pub trait Handler<S: SerialTx> {
    /// Handle one decoded message
    fn handle(
        &mut self,
        message: &Message,
        link: &mut Link<'_, S>,
    ) -> Result<(), StationError<S::Error>>;
}

/// Closure adapter used by [`Station::register_fn`](crate::Station::register_fn)
pub(crate) struct FnHandler<F>(pub(crate) F);

impl<S, F> Handler<S> for FnHandler<F>
where
    S: SerialTx,
    F: FnMut(&Message, &mut Link<'_, S>) -> Result<(), StationError<S::Error>>,
{
    fn handle(
        &mut self,
        message: &Message,
        link: &mut Link<'_, S>,
    ) -> Result<(), StationError<S::Error>> {
        (self.0)(message, link)
    }
}

/// Borrowed sending half of a station
///
/// Frames sent through a link carry the owning station as origin.
pub struct Link<'a, S> {
    station: Address,
    serial: &'a mut S,
}

impl<'a, S: SerialTx> Link<'a, S> {
    pub(crate) fn new(station: Address, serial: &'a mut S) -> Self {
        Self { station, serial }
    }

    /// Address frames are sent from
    pub fn station(&self) -> Address {
        self.station
    }

    /// Encode and write one frame; nothing is awaited in return
    pub fn send(
        &mut self,
        dest: Address,
        cmd: Command,
        payload: &[u8],
    ) -> Result<(), StationError<S::Error>> {
        let frame = encode(dest, self.station, cmd, payload)?;
        self.serial
            .write_blocking(&frame)
            .map_err(StationError::Transport)?;
        self.serial.flush().map_err(StationError::Transport)?;

        #[cfg(feature = "defmt")]
        defmt::trace!("Sent {} to {} ({} bytes)", cmd, dest, payload.len());

        Ok(())
    }

    /// Send to every station
    pub fn broadcast(
        &mut self,
        cmd: Command,
        payload: &[u8],
    ) -> Result<(), StationError<S::Error>> {
        self.send(Address::BROADCAST, cmd, payload)
    }

    /// Send back to the origin of `message`
    pub fn reply(
        &mut self,
        message: &Message,
        cmd: Command,
        payload: &[u8],
    ) -> Result<(), StationError<S::Error>> {
        self.send(message.orig, cmd, payload)
    }
}
