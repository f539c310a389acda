//! `embedded-io` transport adapter
//!
//! Wraps any blocking [`embedded_io`] device so it can back a station.
//! The device is expected to enforce its own read timeout (configured when
//! the port was opened) and report it as an error of kind
//! [`ErrorKind::TimedOut`]; the `timeout` argument of
//! [`SerialRx::read_byte`] is advisory for this adapter.

use core::time::Duration;

use embedded_io::{Error as _, ErrorKind, Read, Write};

use crate::serial::{ErrorType, ReadOutcome, SerialRx, SerialTx};

/// Serial transport over an `embedded-io` device
#[derive(Debug)]
pub struct IoSerial<T> {
    inner: T,
}

impl<T> IoSerial<T> {
    /// Wrap a device
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Unwrap the device
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: embedded_io::ErrorType> ErrorType for IoSerial<T> {
    type Error = T::Error;
}

impl<T: Write> SerialTx for IoSerial<T> {
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush()
    }
}

impl<T: Read> SerialRx for IoSerial<T> {
    fn read_byte(&mut self, _timeout: Duration) -> Result<ReadOutcome, Self::Error> {
        let mut buf = [0u8; 1];
        match self.inner.read(&mut buf) {
            Ok(0) => Ok(ReadOutcome::EndOfStream),
            Ok(_) => Ok(ReadOutcome::Byte(buf[0])),
            Err(e) if e.kind() == ErrorKind::TimedOut => Ok(ReadOutcome::Timeout),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Device that replays a fixed script of read results
    struct ScriptedDevice {
        reads: &'static [Result<u8, ErrorKind>],
        pos: usize,
        written: [u8; 16],
        written_len: usize,
    }

    impl ScriptedDevice {
        fn new(reads: &'static [Result<u8, ErrorKind>]) -> Self {
            Self {
                reads,
                pos: 0,
                written: [0; 16],
                written_len: 0,
            }
        }
    }

    impl embedded_io::ErrorType for ScriptedDevice {
        type Error = ErrorKind;
    }

    impl Read for ScriptedDevice {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let Some(next) = self.reads.get(self.pos) else {
                return Ok(0);
            };
            self.pos += 1;
            let byte = (*next)?;
            buf[0] = byte;
            Ok(1)
        }
    }

    impl Write for ScriptedDevice {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            let n = buf.len().min(self.written.len() - self.written_len);
            self.written[self.written_len..self.written_len + n].copy_from_slice(&buf[..n]);
            self.written_len += n;
            Ok(n)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    const TIMEOUT: Duration = Duration::from_millis(10);

    #[test]
    fn test_read_outcomes_are_mapped() {
        static READS: [Result<u8, ErrorKind>; 3] = [Ok(0x41), Err(ErrorKind::TimedOut), Ok(0x04)];
        let mut serial = IoSerial::new(ScriptedDevice::new(&READS));

        assert_eq!(serial.read_byte(TIMEOUT), Ok(ReadOutcome::Byte(0x41)));
        assert_eq!(serial.read_byte(TIMEOUT), Ok(ReadOutcome::Timeout));
        assert_eq!(serial.read_byte(TIMEOUT), Ok(ReadOutcome::Byte(0x04)));
        assert_eq!(serial.read_byte(TIMEOUT), Ok(ReadOutcome::EndOfStream));
    }

    #[test]
    fn test_device_errors_are_fatal() {
        static READS: [Result<u8, ErrorKind>; 1] = [Err(ErrorKind::BrokenPipe)];
        let mut serial = IoSerial::new(ScriptedDevice::new(&READS));

        assert_eq!(serial.read_byte(TIMEOUT), Err(ErrorKind::BrokenPipe));
    }

    #[test]
    fn test_write_passes_through() {
        let mut serial = IoSerial::new(ScriptedDevice::new(&[]));
        serial.write_blocking(&[1, 2, 3]).unwrap();
        serial.flush().unwrap();

        let device = serial.into_inner();
        assert_eq!(&device.written[..device.written_len], &[1, 2, 3]);
    }
}
