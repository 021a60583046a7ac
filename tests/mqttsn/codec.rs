use libmqttsn::network::application::mqttsn::{Flags, decode, encode, frame_length};
use libmqttsn::{CodecError, Message, ReturnCode};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn random_topic(rng: &mut StdRng, max_len: usize) -> String {
    let len = rng.gen_range(0..=max_len);
    (0..len)
        .map(|_| rng.gen_range(b'!'..=b'~') as char)
        .collect()
}

#[test]
fn test_random_publish_round_trip() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let mut buf = [0u8; 1024];

    for _ in 0..500 {
        let mut payload = vec![0u8; rng.gen_range(0..=900)];
        rng.fill(&mut payload[..]);
        let publish = Message::Publish {
            flags: Flags::from_byte(rng.r#gen()),
            topic_id: rng.r#gen(),
            message_id: rng.r#gen(),
            payload: &payload,
        };

        let len = encode(&publish, &mut buf).unwrap();
        assert_eq!(frame_length(&buf[..len]), Ok(Some(len)));
        assert_eq!(decode(&buf[..len]), Ok(publish));
    }
}

#[test]
fn test_random_register_round_trip() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut buf = [0u8; 512];

    for _ in 0..500 {
        let topic_name = random_topic(&mut rng, 300);
        let register = Message::Register {
            topic_id: rng.r#gen(),
            message_id: rng.r#gen(),
            topic_name: &topic_name,
        };

        let len = encode(&register, &mut buf).unwrap();
        assert_eq!(decode(&buf[..len]), Ok(register));
    }
}

#[test]
fn test_random_bytes_never_panic() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut buf = [0u8; 64];

    for _ in 0..10_000 {
        let len = rng.gen_range(0..=buf.len());
        rng.fill(&mut buf[..len]);
        let _ = decode(&buf[..len]);
        let _ = frame_length(&buf[..len]);
    }
}

#[test]
fn test_random_return_codes_survive() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut buf = [0u8; 16];

    for _ in 0..256 {
        let code = ReturnCode::from(rng.r#gen::<u8>());
        let ack = Message::RegAck {
            topic_id: 1,
            message_id: 2,
            return_code: code,
        };
        let len = encode(&ack, &mut buf).unwrap();
        assert_eq!(decode(&buf[..len]).unwrap().return_code(), Some(code));
    }
}

#[test]
fn test_oversized_packet_rejected() {
    let payload = vec![0u8; 65535];
    let mut buf = vec![0u8; 70_000];
    let publish = Message::Publish {
        flags: Flags::default(),
        topic_id: 1,
        message_id: 0,
        payload: &payload,
    };
    assert!(matches!(
        encode(&publish, &mut buf),
        Err(CodecError::PacketTooLarge(_))
    ));
}
