//! Frame reassembly over a timeout-bounded byte stream
//!
//! A frame may reach us split across reads, and its payload may contain
//! bytes equal to EOT. One *bounded read* collects bytes until it sees an
//! EOT-valued byte, the transport times out or closes, or the buffer can
//! hold no more. When the collected bytes are too few for the frame they
//! describe and the last of them is EOT-valued, that EOT was payload: the
//! reader keeps reading and decoding until the frame is complete, the
//! error stops being a length error, or a read brings nothing new.

use core::time::Duration;

use heapless::Vec;
use icsc_hal::{ReadOutcome, SerialRx};
use icsc_protocol::{decode, Address, FlowError, Message, EOT, MAX_FRAME_SIZE};

/// Outcome of one read-and-reassemble cycle
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cycle {
    /// Nothing arrived before the read timed out
    Idle,
    /// Nothing arrived and the transport is closed
    Closed,
    /// Bytes arrived and were decoded
    Frame(Result<Message, FlowError>),
}

/// What a single bounded read produced
struct Chunk {
    added: usize,
    closed: bool,
}

/// Accumulates bytes for one station and turns them into messages
#[derive(Debug, Clone)]
pub struct FrameReader {
    station: Address,
    timeout: Duration,
    buffer: Vec<u8, MAX_FRAME_SIZE>,
}

impl FrameReader {
    /// Create a reader for frames addressed to `station`
    pub fn new(station: Address, timeout: Duration) -> Self {
        Self {
            station,
            timeout,
            buffer: Vec::new(),
        }
    }

    /// Station whose frames are accepted
    pub fn station(&self) -> Address {
        self.station
    }

    /// Bound on each byte read
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Perform one full read-and-reassemble cycle
    ///
    /// Transport failures are returned as `Err`; everything that can go
    /// wrong with the bytes themselves is a [`Cycle::Frame`] error.
    pub fn next_frame<R: SerialRx>(&mut self, rx: &mut R) -> Result<Cycle, R::Error> {
        self.buffer.clear();

        let first = self.read_chunk(rx)?;
        if self.buffer.is_empty() {
            return Ok(if first.closed {
                Cycle::Closed
            } else {
                Cycle::Idle
            });
        }

        loop {
            let err = match decode(&self.buffer, self.station) {
                Ok(message) => return Ok(Cycle::Frame(Ok(message))),
                Err(err) => err,
            };

            if !err.is_incomplete() || self.buffer.last() != Some(&EOT) {
                return Ok(Cycle::Frame(Err(err)));
            }

            #[cfg(feature = "defmt")]
            defmt::trace!("EOT inside payload after {} bytes, reading on", self.buffer.len());

            if self.read_chunk(rx)?.added == 0 {
                return Ok(Cycle::Frame(Err(err)));
            }
        }
    }

    /// Append bytes until an EOT-valued byte, a timeout, end of stream, or a full buffer
    fn read_chunk<R: SerialRx>(&mut self, rx: &mut R) -> Result<Chunk, R::Error> {
        let mut chunk = Chunk {
            added: 0,
            closed: false,
        };

        while !self.buffer.is_full() {
            match rx.read_byte(self.timeout)? {
                ReadOutcome::Byte(byte) => {
                    // Cannot fail: the loop condition guarantees room
                    let _ = self.buffer.push(byte);
                    chunk.added += 1;
                    if byte == EOT {
                        break;
                    }
                }
                ReadOutcome::Timeout => break,
                ReadOutcome::EndOfStream => {
                    chunk.closed = true;
                    break;
                }
            }
        }

        Ok(chunk)
    }
}
