//! Property tests for frame reassembly

use std::time::Duration;

use icsc_core::{Address, Command, Cycle, FrameReader};
use icsc_hal::MockSerial;
use icsc_protocol::{encode, EOT, MAX_PAYLOAD_SIZE};
use proptest::collection::vec;
use proptest::prelude::*;

const TIMEOUT: Duration = Duration::from_millis(5);

/// Payload bytes biased towards the EOT value
fn eot_heavy_payload() -> impl Strategy<Value = Vec<u8>> {
    vec(prop_oneof![Just(EOT), any::<u8>()], 0..=MAX_PAYLOAD_SIZE)
}

proptest! {
    #[test]
    fn test_frames_with_eot_bytes_are_reassembled(
        orig in any::<u8>(),
        cmd in any::<u8>(),
        data in eot_heavy_payload(),
    ) {
        let station = Address::from_byte(b'B');
        let frame = encode(station, orig.into(), Command::from_byte(cmd), &data).unwrap();

        let mut serial = MockSerial::with_bytes(&frame);
        serial.push_timeout();
        let mut reader = FrameReader::new(station, TIMEOUT);

        match reader.next_frame(&mut serial).unwrap() {
            Cycle::Frame(Ok(message)) => {
                prop_assert_eq!(&message.payload[..], &data[..]);
                prop_assert_eq!(message.orig, Address::from_byte(orig));
            }
            other => prop_assert!(false, "unexpected cycle {:?}", other),
        }
        // The idle timeout after the frame is left for the next cycle
        prop_assert_eq!(serial.pending(), 1);
        prop_assert_eq!(reader.next_frame(&mut serial).unwrap(), Cycle::Idle);
    }

    #[test]
    fn test_split_on_false_eot_completes_on_next_read(
        before in vec(any::<u8>(), 0..100),
        after in vec(any::<u8>(), 0..100),
    ) {
        let mut data = before.clone();
        data.push(EOT);
        data.extend_from_slice(&after);

        let station = Address::from_byte(b'B');
        let frame = encode(station, b'A'.into(), b'T'.into(), &data).unwrap();

        // First chunk ends exactly on the EOT-valued payload byte
        let split = 6 + before.len() + 1;
        let mut serial = MockSerial::with_bytes(&frame[..split]);
        serial.push_bytes(&frame[split..]);

        let mut reader = FrameReader::new(station, TIMEOUT);
        match reader.next_frame(&mut serial).unwrap() {
            Cycle::Frame(Ok(message)) => prop_assert_eq!(&message.payload[..], &data[..]),
            other => prop_assert!(false, "unexpected cycle {:?}", other),
        }
    }
}
