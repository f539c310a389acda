//! Scripted in-memory transport
//!
//! [`MockSerial`] replays a queue of read outcomes and records everything
//! written to it. Once the queue is drained it reports
//! [`ReadOutcome::EndOfStream`] (or [`ReadOutcome::Timeout`] when built
//! with [`MockSerial::idle_when_drained`]).

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::time::Duration;

use crate::serial::{ErrorType, ReadOutcome, SerialRx, SerialTx};

/// Failures a [`MockSerial`] can be told to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MockError {
    /// A write was attempted while writes are failing
    WriteFailed,
    /// A scripted device failure on the read side
    ReadFailed,
}

#[derive(Debug, Clone, Copy)]
enum Scripted {
    Outcome(ReadOutcome),
    Fail,
}

/// Scripted serial transport
#[derive(Debug, Default)]
pub struct MockSerial {
    script: VecDeque<Scripted>,
    written: Vec<u8>,
    idle_when_drained: bool,
    fail_writes: bool,
    reads: usize,
}

impl MockSerial {
    /// Create an empty transport; reads report end-of-stream
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that will deliver `bytes` and then close
    pub fn with_bytes(bytes: &[u8]) -> Self {
        let mut serial = Self::new();
        serial.push_bytes(bytes);
        serial
    }

    /// Report timeouts instead of end-of-stream once the script runs out
    pub fn idle_when_drained(mut self) -> Self {
        self.idle_when_drained = true;
        self
    }

    /// Queue bytes to be read
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.script.extend(
            bytes
                .iter()
                .map(|&b| Scripted::Outcome(ReadOutcome::Byte(b))),
        );
    }

    /// Queue a read timeout
    pub fn push_timeout(&mut self) {
        self.script.push_back(Scripted::Outcome(ReadOutcome::Timeout));
    }

    /// Queue an end-of-stream report
    pub fn push_end_of_stream(&mut self) {
        self.script
            .push_back(Scripted::Outcome(ReadOutcome::EndOfStream));
    }

    /// Queue a fatal read failure
    pub fn push_read_failure(&mut self) {
        self.script.push_back(Scripted::Fail);
    }

    /// Make every subsequent write fail
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Everything written so far
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Take everything written so far, leaving the record empty
    pub fn take_written(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.written)
    }

    /// Number of read outcomes still queued
    pub fn pending(&self) -> usize {
        self.script.len()
    }

    /// Number of `read_byte` calls served
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl ErrorType for MockSerial {
    type Error = MockError;
}

impl SerialTx for MockSerial {
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(MockError::WriteFailed);
        }
        self.written.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(MockError::WriteFailed);
        }
        Ok(())
    }
}

impl SerialRx for MockSerial {
    fn read_byte(&mut self, _timeout: Duration) -> Result<ReadOutcome, Self::Error> {
        self.reads += 1;
        match self.script.pop_front() {
            Some(Scripted::Outcome(outcome)) => Ok(outcome),
            Some(Scripted::Fail) => Err(MockError::ReadFailed),
            None if self.idle_when_drained => Ok(ReadOutcome::Timeout),
            None => Ok(ReadOutcome::EndOfStream),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(1);

    #[test]
    fn test_script_is_replayed_in_order() {
        let mut serial = MockSerial::with_bytes(&[7, 8]);
        serial.push_timeout();
        serial.push_read_failure();

        assert_eq!(serial.read_byte(TIMEOUT), Ok(ReadOutcome::Byte(7)));
        assert_eq!(serial.read_byte(TIMEOUT), Ok(ReadOutcome::Byte(8)));
        assert_eq!(serial.read_byte(TIMEOUT), Ok(ReadOutcome::Timeout));
        assert_eq!(serial.read_byte(TIMEOUT), Err(MockError::ReadFailed));
        assert_eq!(serial.read_byte(TIMEOUT), Ok(ReadOutcome::EndOfStream));
        assert_eq!(serial.reads(), 5);
    }

    #[test]
    fn test_idle_when_drained() {
        let mut serial = MockSerial::new().idle_when_drained();
        assert_eq!(serial.read_byte(TIMEOUT), Ok(ReadOutcome::Timeout));
        assert_eq!(serial.read_byte(TIMEOUT), Ok(ReadOutcome::Timeout));
    }

    #[test]
    fn test_writes_are_recorded_until_failing() {
        let mut serial = MockSerial::new();
        serial.write_blocking(b"ab").unwrap();
        serial.fail_writes(true);
        assert_eq!(serial.write_blocking(b"c"), Err(MockError::WriteFailed));
        assert_eq!(serial.take_written(), b"ab");
        assert!(serial.written().is_empty());
    }
}
