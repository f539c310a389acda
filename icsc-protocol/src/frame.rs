//! Frame encoding and decoding
//!
//! Frame format (offsets from SOH):
//! - 0: SOH (0x01)
//! - 1: DEST - destination station, 0 for broadcast
//! - 2: ORIG - originating station
//! - 3: CMD - command code
//! - 4: LEN - payload length (0-255)
//! - 5: STX (0x02)
//! - 6..6+LEN: payload
//! - 6+LEN: ETX (0x03)
//! - 7+LEN: CHK - sum of DEST, ORIG, CMD, LEN and payload, modulo 256
//! - 8+LEN: EOT (0x04)

use heapless::Vec;

use crate::address::{Address, Command};
use crate::error::{FlowError, FrameError};

/// Start of header
pub const SOH: u8 = 0x01;
/// Start of text (payload follows)
pub const STX: u8 = 0x02;
/// End of text (payload done)
pub const ETX: u8 = 0x03;
/// End of transmission (frame done)
pub const EOT: u8 = 0x04;

const SOH_IDX: usize = 0;
const DEST_IDX: usize = 1;
const ORIG_IDX: usize = 2;
const CMD_IDX: usize = 3;
const LEN_IDX: usize = 4;
const STX_IDX: usize = 5;
const PAYLOAD_IDX: usize = 6;

/// Bytes in a frame besides the payload
pub const FRAME_OVERHEAD: usize = 9;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 255;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = FRAME_OVERHEAD + MAX_PAYLOAD_SIZE;

/// Bounded payload storage
pub type Payload = Vec<u8, MAX_PAYLOAD_SIZE>;

/// An encoded frame
pub type FrameBytes = Vec<u8, MAX_FRAME_SIZE>;

/// Sum of header fields and payload, modulo 256
///
/// `header` is `[dest, orig, cmd, len]`.
pub fn checksum(header: [u8; 4], payload: &[u8]) -> u8 {
    header
        .iter()
        .chain(payload)
        .fold(0u8, |sum, &byte| sum.wrapping_add(byte))
}

/// A decoded message
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Message {
    /// Destination station (this station, or broadcast)
    pub dest: Address,
    /// Originating station
    pub orig: Address,
    /// Command code
    pub cmd: Command,
    /// Payload data
    pub payload: Payload,
}

impl Message {
    /// Build a message, rejecting payloads over 255 bytes
    pub fn new(
        dest: Address,
        orig: Address,
        cmd: Command,
        payload: &[u8],
    ) -> Result<Self, FrameError> {
        let mut stored = Payload::new();
        stored
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            dest,
            orig,
            cmd,
            payload: stored,
        })
    }

    /// Payload length as carried in the LEN byte
    pub fn length(&self) -> u8 {
        self.payload.len() as u8
    }

    /// Check if this message was sent to every station
    pub fn is_broadcast(&self) -> bool {
        self.dest.is_broadcast()
    }

    /// Encode this message into wire bytes
    pub fn encode(&self) -> FrameBytes {
        let mut frame = FrameBytes::new();
        // Payload is bounded by MAX_PAYLOAD_SIZE, so the frame always fits
        let _ = frame.resize(FRAME_OVERHEAD + self.payload.len(), 0);
        write_frame(&mut frame, self.dest, self.orig, self.cmd, &self.payload);
        frame
    }
}

/// Encode a frame into a byte buffer
///
/// Returns the number of bytes written.
pub fn encode_into(
    dest: Address,
    orig: Address,
    cmd: Command,
    payload: &[u8],
    buffer: &mut [u8],
) -> Result<usize, FrameError> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(FrameError::PayloadTooLarge);
    }

    let frame_len = FRAME_OVERHEAD + payload.len();
    if buffer.len() < frame_len {
        return Err(FrameError::BufferTooSmall);
    }

    write_frame(&mut buffer[..frame_len], dest, orig, cmd, payload);
    Ok(frame_len)
}

/// Encode a frame into a heapless Vec
pub fn encode(
    dest: Address,
    orig: Address,
    cmd: Command,
    payload: &[u8],
) -> Result<FrameBytes, FrameError> {
    let mut buffer = [0u8; MAX_FRAME_SIZE];
    let len = encode_into(dest, orig, cmd, payload, &mut buffer)?;
    let mut frame = FrameBytes::new();
    frame
        .extend_from_slice(&buffer[..len])
        .map_err(|_| FrameError::BufferTooSmall)?;
    Ok(frame)
}

/// Lay out a frame; `frame` must be exactly `FRAME_OVERHEAD + payload.len()` long
fn write_frame(frame: &mut [u8], dest: Address, orig: Address, cmd: Command, payload: &[u8]) {
    let len = payload.len();
    let header = [dest.as_byte(), orig.as_byte(), cmd.as_byte(), len as u8];
    let etx_idx = PAYLOAD_IDX + len;

    frame[SOH_IDX] = SOH;
    frame[DEST_IDX..=LEN_IDX].copy_from_slice(&header);
    frame[STX_IDX] = STX;
    frame[PAYLOAD_IDX..etx_idx].copy_from_slice(payload);
    frame[etx_idx] = ETX;
    frame[etx_idx + 1] = checksum(header, payload);
    frame[etx_idx + 2] = EOT;
}

/// Decode a frame received by `station`
///
/// `buffer` must hold exactly one frame. Checks run cheapest first and the
/// first failure is returned: overall length, declared length, destination,
/// sentinels (SOH, STX, ETX, EOT in that order), then the checksum.
pub fn decode(buffer: &[u8], station: Address) -> Result<Message, FlowError> {
    if buffer.len() < FRAME_OVERHEAD {
        return Err(FlowError::TooShortMsg);
    }

    let len = buffer[LEN_IDX] as usize;
    if buffer.len() != FRAME_OVERHEAD + len {
        return Err(FlowError::BadLenField);
    }

    let dest = Address::from_byte(buffer[DEST_IDX]);
    if dest != station && !dest.is_broadcast() {
        return Err(FlowError::WrongDestStation);
    }

    let etx_idx = PAYLOAD_IDX + len;
    let chk_idx = etx_idx + 1;
    let eot_idx = etx_idx + 2;

    if buffer[SOH_IDX] != SOH {
        return Err(FlowError::MissingSoh);
    }
    if buffer[STX_IDX] != STX {
        return Err(FlowError::MissingStx);
    }
    if buffer[etx_idx] != ETX {
        return Err(FlowError::MissingEtx);
    }
    if buffer[eot_idx] != EOT {
        return Err(FlowError::MissingEot);
    }

    let header = [
        buffer[DEST_IDX],
        buffer[ORIG_IDX],
        buffer[CMD_IDX],
        buffer[LEN_IDX],
    ];
    let payload = &buffer[PAYLOAD_IDX..etx_idx];
    if checksum(header, payload) != buffer[chk_idx] {
        return Err(FlowError::BadChecksum);
    }

    let mut stored = Payload::new();
    // len came from a single byte, so it never exceeds MAX_PAYLOAD_SIZE
    let _ = stored.extend_from_slice(payload);

    Ok(Message {
        dest,
        orig: Address::from_byte(buffer[ORIG_IDX]),
        cmd: Command::from_byte(buffer[CMD_IDX]),
        payload: stored,
    })
}
