//! Property tests for the frame codec

use icsc_protocol::{decode, encode, Address, Command, FlowError, MAX_PAYLOAD_SIZE};
use proptest::collection::vec;
use proptest::prelude::*;

const DEST_IDX: usize = 1;
const ORIG_IDX: usize = 2;
const CMD_IDX: usize = 3;
const LEN_IDX: usize = 4;
const PAYLOAD_IDX: usize = 6;

fn payload() -> impl Strategy<Value = Vec<u8>> {
    vec(any::<u8>(), 0..=MAX_PAYLOAD_SIZE)
}

/// Station that accepts frames sent to `dest`
fn receiver_for(dest: u8) -> Address {
    if dest == 0 {
        Address::from_byte(1)
    } else {
        Address::from_byte(dest)
    }
}

proptest! {
    #[test]
    fn test_roundtrip(
        dest in any::<u8>(),
        orig in any::<u8>(),
        cmd in any::<u8>(),
        data in payload(),
    ) {
        let frame = encode(dest.into(), orig.into(), cmd.into(), &data).unwrap();
        prop_assert_eq!(frame.len(), 9 + data.len());

        let message = decode(&frame, receiver_for(dest)).unwrap();
        prop_assert_eq!(message.dest, Address::from_byte(dest));
        prop_assert_eq!(message.orig, Address::from_byte(orig));
        prop_assert_eq!(message.cmd, Command::from_byte(cmd));
        prop_assert_eq!(message.length() as usize, data.len());
        prop_assert_eq!(&message.payload[..], &data[..]);
    }

    #[test]
    fn test_payload_bit_flip_breaks_checksum(
        dest in 1u8..,
        data in vec(any::<u8>(), 1..=MAX_PAYLOAD_SIZE),
        pos in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let mut frame = encode(dest.into(), b'C'.into(), b'D'.into(), &data).unwrap();
        frame[PAYLOAD_IDX + pos.index(data.len())] ^= 1 << bit;

        prop_assert_eq!(decode(&frame, dest.into()), Err(FlowError::BadChecksum));
    }

    #[test]
    fn test_origin_or_command_bit_flip_breaks_checksum(
        dest in 1u8..,
        data in payload(),
        field in prop::sample::select(vec![ORIG_IDX, CMD_IDX]),
        bit in 0u8..8,
    ) {
        let mut frame = encode(dest.into(), b'C'.into(), b'D'.into(), &data).unwrap();
        frame[field] ^= 1 << bit;

        prop_assert_eq!(decode(&frame, dest.into()), Err(FlowError::BadChecksum));
    }

    #[test]
    fn test_length_bit_flip_breaks_length(dest in 1u8.., data in payload(), bit in 0u8..8) {
        let mut frame = encode(dest.into(), b'C'.into(), b'D'.into(), &data).unwrap();
        frame[LEN_IDX] ^= 1 << bit;

        prop_assert_eq!(decode(&frame, dest.into()), Err(FlowError::BadLenField));
    }

    #[test]
    fn test_destination_bit_flip_is_caught(dest in 1u8.., data in payload(), bit in 0u8..8) {
        let mut frame = encode(dest.into(), b'C'.into(), b'D'.into(), &data).unwrap();
        frame[DEST_IDX] ^= 1 << bit;

        // Flipping into the broadcast address passes addressing but not the checksum
        let expected = if frame[DEST_IDX] == 0 {
            FlowError::BadChecksum
        } else {
            FlowError::WrongDestStation
        };
        prop_assert_eq!(decode(&frame, dest.into()), Err(expected));
    }

    #[test]
    fn test_truncated_frame_is_incomplete(
        dest in 1u8..,
        data in payload(),
        cut in any::<prop::sample::Index>(),
    ) {
        let frame = encode(dest.into(), b'C'.into(), b'D'.into(), &data).unwrap();
        let cut = cut.index(frame.len());

        let err = decode(&frame[..cut], dest.into()).unwrap_err();
        prop_assert!(err.is_incomplete());
    }

    #[test]
    fn test_foreign_frames_are_rejected(dest in 1u8.., station in 1u8.., data in payload()) {
        prop_assume!(dest != station);
        let frame = encode(dest.into(), b'C'.into(), b'D'.into(), &data).unwrap();

        prop_assert_eq!(decode(&frame, station.into()), Err(FlowError::WrongDestStation));
    }
}
