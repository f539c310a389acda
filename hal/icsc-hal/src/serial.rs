//! Serial transport abstractions
//!
//! Blocking traits for a half-duplex serial bus. Reads are byte-granular
//! and always bounded: a read that sees no byte within its timeout reports
//! [`ReadOutcome::Timeout`] instead of failing.

use core::time::Duration;

/// Error type shared by both directions of a transport
pub trait ErrorType {
    /// Fatal device error (port gone, write failure, ...)
    type Error: core::fmt::Debug;
}

/// Result of a single bounded byte read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadOutcome {
    /// One byte arrived
    Byte(u8),
    /// No byte arrived within the timeout; the bus is idle
    Timeout,
    /// The underlying stream is closed and will never yield another byte
    EndOfStream,
}

/// Serial transmitter
pub trait SerialTx: ErrorType {
    /// Write all of `data` to the bus
    ///
    /// Blocks until every byte has been handed to the device.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Serial receiver
pub trait SerialRx: ErrorType {
    /// Read a single byte, waiting at most `timeout` for it to arrive
    ///
    /// A timeout is not an error. `Err` is reserved for device failures.
    fn read_byte(&mut self, timeout: Duration) -> Result<ReadOutcome, Self::Error>;
}

/// Combined serial interface
///
/// For devices that provide both TX and RX on a single port.
pub trait Serial: SerialTx + SerialRx {}

// Blanket implementation
impl<T: SerialTx + SerialRx> Serial for T {}

impl<T: ErrorType + ?Sized> ErrorType for &mut T {
    type Error = T::Error;
}

impl<T: SerialTx + ?Sized> SerialTx for &mut T {
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        T::write_blocking(self, data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        T::flush(self)
    }
}

impl<T: SerialRx + ?Sized> SerialRx for &mut T {
    fn read_byte(&mut self, timeout: Duration) -> Result<ReadOutcome, Self::Error> {
        T::read_byte(self, timeout)
    }
}
