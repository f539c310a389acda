//! Built-in keepalive responder

use icsc_hal::SerialTx;
use icsc_protocol::{Command, Message};

use super::handler::{Handler, Link};
use crate::error::StationError;

/// Answers every `PING` with an empty `PONG` to its origin
///
/// Registered under [`Command::PING`] when a station is created.
#[derive(Debug, Clone, Copy, Default)]
pub struct PingResponder;

impl<S: SerialTx> Handler<S> for PingResponder {
    fn handle(
        &mut self,
        message: &Message,
        link: &mut Link<'_, S>,
    ) -> Result<(), StationError<S::Error>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("PING from {}", message.orig);

        link.reply(message, Command::PONG, &[])
    }
}
