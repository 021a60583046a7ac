use crate::mock::{ARP_NOISE, MockClock, MockTransport, packet};
use core::time::Duration;
use libmqttsn::network::NoClock;
use libmqttsn::network::application::mqttsn::{Discarded, Flags};
use libmqttsn::{Message, Options, ProtocolError, QoS, ReturnCode, Session, State, TransportError, Will};
use std::cell::RefCell;

type MockSession<'a, C = NoClock> = Session<'a, MockTransport, C>;

fn connack(return_code: ReturnCode) -> Vec<u8> {
    packet(&Message::ConnAck { return_code })
}

fn regack(topic_id: u16, message_id: u16) -> Vec<u8> {
    packet(&Message::RegAck {
        topic_id,
        message_id,
        return_code: ReturnCode::Accepted,
    })
}

fn puback(topic_id: u16, message_id: u16, return_code: ReturnCode) -> Vec<u8> {
    packet(&Message::PubAck {
        topic_id,
        message_id,
        return_code,
    })
}

/// A session that has completed CONNECT.
fn connected(options: Options<'_>) -> MockSession<'_> {
    let mut transport = MockTransport::new();
    transport.reply_to_next_send(&[&connack(ReturnCode::Accepted)]);
    let mut session = Session::new(transport, NoClock, options);
    session.connect("sensor1").unwrap();
    session.transport_mut().sent.clear();
    session
}

thread_local! {
    static DISCARDS: RefCell<Vec<Discarded>> = const { RefCell::new(Vec::new()) };
}

fn record_discard(_frame: &[u8], reason: Discarded) {
    DISCARDS.with(|d| d.borrow_mut().push(reason));
}

fn take_discards() -> Vec<Discarded> {
    DISCARDS.with(|d| d.borrow_mut().drain(..).collect())
}

#[test]
fn test_connect_ignores_noise() {
    let transport = MockTransport::with_inbound(&[
        ARP_NOISE,
        &[0x45, 0x00, 0x00, 0x1c],
        &packet(&Message::PingResp),
        &connack(ReturnCode::Accepted),
    ]);
    let mut session: MockSession<'_> = Session::new(transport, NoClock, Options::default());
    session.on_discard(record_discard);
    take_discards();

    assert_eq!(session.connect("sensor1"), Ok(ReturnCode::Accepted));
    assert_eq!(session.state(), State::Connected);
    assert_eq!(session.client_id(), "sensor1");

    let sent = &session.transport_mut().sent;
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0],
        [0x0D, 0x04, 0x04, 0x01, 0x00, 0x1E, b's', b'e', b'n', b's', b'o', b'r', b'1']
    );

    let discards = take_discards();
    assert_eq!(discards.len(), 3);
    assert!(matches!(discards[0], Discarded::Undecodable(_)));
    assert!(matches!(discards[1], Discarded::Undecodable(_)));
    assert_eq!(
        discards[2],
        Discarded::Unexpected(libmqttsn::MessageType::PingResp)
    );
}

#[test]
fn test_connect_rejects_long_client_id() {
    let mut session: MockSession<'_> =
        Session::new(MockTransport::new(), NoClock, Options::default());
    assert_eq!(
        session.connect("a-client-id-longer-than-23"),
        Err(ProtocolError::ClientIdTooLong)
    );
    assert!(session.transport_mut().sent.is_empty());
}

#[test]
fn test_connect_times_out() {
    let options = Options {
        ack_timeout_ms: Some(100),
        ..Options::default()
    };
    let clock = MockClock::stepping(Duration::from_millis(10));
    let mut session: MockSession<'_, MockClock> =
        Session::new(MockTransport::with_inbound(&[ARP_NOISE]), clock, options);

    assert_eq!(session.connect("sensor1"), Err(ProtocolError::Timeout));
    assert_eq!(session.state(), State::Disconnected);
}

#[test]
fn test_connect_passes_rejection_through() {
    let transport = MockTransport::with_inbound(&[&connack(ReturnCode::Congestion)]);
    let mut session: MockSession<'_> = Session::new(transport, NoClock, Options::default());

    assert_eq!(session.connect("sensor1"), Ok(ReturnCode::Congestion));
    assert!(session.is_connected());
}

#[test]
fn test_connect_strict_rejection() {
    let options = Options {
        strict_return_codes: true,
        ..Options::default()
    };
    let transport = MockTransport::with_inbound(&[&connack(ReturnCode::Congestion)]);
    let mut session: MockSession<'_> = Session::new(transport, NoClock, options);

    assert_eq!(
        session.connect("sensor1"),
        Err(ProtocolError::NotAcknowledged(ReturnCode::Congestion))
    );
    assert_eq!(session.state(), State::Disconnected);
}

#[test]
fn test_connect_with_will() {
    let options = Options {
        will: Some(Will {
            topic: "status/sensor1",
            message: "offline",
            qos: QoS::AtLeastOnce,
            retain: true,
        }),
        ..Options::default()
    };
    let transport = MockTransport::with_inbound(&[
        &packet(&Message::WillTopicReq),
        &packet(&Message::WillMsgReq),
        &connack(ReturnCode::Accepted),
    ]);
    let mut session: MockSession<'_> = Session::new(transport, NoClock, options);

    assert_eq!(session.connect("sensor1"), Ok(ReturnCode::Accepted));

    let sent = &session.transport_mut().sent;
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0][2], 0x0C);
    let will_flags = Flags {
        retain: true,
        ..Flags::with_qos(QoS::AtLeastOnce)
    };
    assert_eq!(
        sent[1],
        packet(&Message::WillTopic {
            flags: will_flags,
            topic: "status/sensor1",
        })
    );
    assert_eq!(
        sent[2],
        packet(&Message::WillMsg {
            flags: will_flags,
            message: b"offline",
        })
    );
}

#[test]
fn test_will_requests_ignored_without_will() {
    let transport = MockTransport::with_inbound(&[
        &packet(&Message::WillTopicReq),
        &connack(ReturnCode::Accepted),
    ]);
    let mut session: MockSession<'_> = Session::new(transport, NoClock, Options::default());

    assert_eq!(session.connect("sensor1"), Ok(ReturnCode::Accepted));
    assert_eq!(session.transport_mut().sent.len(), 1);
}

#[test]
fn test_register_returns_topic_id() {
    let mut session = connected(Options::default());
    session.transport_mut().push(ARP_NOISE);
    session.transport_mut().push(&regack(42, 1));

    assert_eq!(session.register("temp/room1"), Ok(42));
    assert_eq!(session.topics().topic_id("temp/room1"), Some(42));

    let sent = &session.transport_mut().sent;
    assert_eq!(sent[0][..6], [0x10, 0x0A, 0x00, 0x00, 0x00, 0x01]);
    assert_eq!(&sent[0][6..], b"temp/room1");
}

#[test]
fn test_register_skips_stale_regack() {
    let mut session = connected(Options::default());
    session.on_discard(record_discard);
    take_discards();
    session.transport_mut().push(&regack(7, 99));
    session.transport_mut().push(&regack(42, 1));

    assert_eq!(session.register("temp/room1"), Ok(42));
    assert_eq!(take_discards(), [Discarded::StaleAck { message_id: 99 }]);
}

#[test]
fn test_register_refuses_new_topic_when_registry_full() {
    let mut session = connected(Options::default());
    let names: Vec<String> = (0..16).map(|i| format!("sensors/{i}")).collect();
    for (i, name) in names.iter().enumerate() {
        let message_id = i as u16 + 1;
        session.transport_mut().push(&regack(100 + message_id, message_id));
        assert_eq!(session.register(name), Ok(100 + message_id));
    }
    assert_eq!(session.transport_mut().sent.len(), 16);

    assert_eq!(
        session.register("sensors/16"),
        Err(ProtocolError::TopicRegistryFull)
    );
    assert_eq!(session.transport_mut().sent.len(), 16);

    // a known name still goes to the gateway and takes the new id
    session.transport_mut().push(&regack(200, 17));
    assert_eq!(session.register("sensors/0"), Ok(200));
    assert_eq!(session.transport_mut().sent.len(), 17);
    assert_eq!(session.topics().topic_id("sensors/0"), Some(200));
}

#[test]
fn test_register_long_topic_name() {
    let mut session = connected(Options::default());
    let name = "a".repeat(255);
    session.transport_mut().push(&regack(5, 1));

    assert_eq!(session.register(&name), Ok(5));
    assert_eq!(session.topics().topic_name(5), Some(name.as_str()));

    let name = "a".repeat(256);
    assert_eq!(session.register(&name), Err(ProtocolError::TopicTooLong));
    assert_eq!(session.transport_mut().sent.len(), 1);
}

#[test]
fn test_register_requires_connection() {
    let mut session: MockSession<'_> =
        Session::new(MockTransport::new(), NoClock, Options::default());
    assert_eq!(session.register("temp/room1"), Err(ProtocolError::NotConnected));
}

#[test]
fn test_reconnect_clears_topics() {
    let mut session = connected(Options::default());
    session.transport_mut().push(&regack(42, 1));
    session.register("temp/room1").unwrap();

    session.transport_mut().push(&connack(ReturnCode::Accepted));
    session.connect("sensor1").unwrap();
    assert!(session.topics().is_empty());
}

#[test]
fn test_publish_qos0_needs_no_reply() {
    let mut session = connected(Options::default());

    assert_eq!(session.publish(42, b"23.5", QoS::AtMostOnce), Ok(true));
    assert_eq!(
        session.transport_mut().sent[0],
        [0x0B, 0x0C, 0x00, 0x00, 0x2A, 0x00, 0x00, b'2', b'3', b'.', b'5']
    );
}

#[test]
fn test_publish_qos1_acknowledged() {
    let mut session = connected(Options::default());
    session.transport_mut().push(ARP_NOISE);
    session
        .transport_mut()
        .push(&puback(42, 1, ReturnCode::Accepted));

    assert_eq!(session.publish(42, b"23.5", QoS::AtLeastOnce), Ok(true));
    let sent = &session.transport_mut().sent[0];
    assert_eq!(sent[2], 0x20);
    assert_eq!(sent[5..7], [0x00, 0x01]);
}

#[test]
fn test_publish_qos1_soft_failure() {
    let mut session = connected(Options::default());
    session
        .transport_mut()
        .push(&packet(&Message::PubRec { message_id: 1 }));

    assert_eq!(session.publish(42, b"23.5", QoS::AtLeastOnce), Ok(false));
}

#[test]
fn test_publish_qos1_skips_other_message_ids() {
    let mut session = connected(Options::default());
    session
        .transport_mut()
        .push(&puback(42, 500, ReturnCode::Accepted));
    session
        .transport_mut()
        .push(&puback(42, 1, ReturnCode::Accepted));

    assert_eq!(session.publish(42, b"23.5", QoS::AtLeastOnce), Ok(true));
    assert!(session.transport_mut().inbound.is_empty());
}

#[test]
fn test_publish_qos1_rejected_in_strict_mode() {
    let options = Options {
        strict_return_codes: true,
        ..Options::default()
    };
    let mut session = connected(options);
    session
        .transport_mut()
        .push(&puback(42, 1, ReturnCode::InvalidTopicId));

    assert_eq!(session.publish(42, b"23.5", QoS::AtLeastOnce), Ok(false));
}

#[test]
fn test_publish_unsupported_qos() {
    let mut session = connected(Options::default());
    assert_eq!(
        session.publish(42, b"23.5", QoS::ExactlyOnce),
        Err(ProtocolError::UnsupportedQoS(QoS::ExactlyOnce))
    );
    assert_eq!(
        session.publish(42, b"23.5", QoS::WithoutSession),
        Err(ProtocolError::UnsupportedQoS(QoS::WithoutSession))
    );
    assert!(session.transport_mut().sent.is_empty());
}

#[test]
fn test_publish_times_out() {
    let options = Options {
        ack_timeout_ms: Some(50),
        ..Options::default()
    };
    let transport = MockTransport::with_inbound(&[&connack(ReturnCode::Accepted)]);
    let clock = MockClock::stepping(Duration::from_millis(5));
    let mut session: MockSession<'_, MockClock> = Session::new(transport, clock, options);
    session.connect("sensor1").unwrap();

    assert_eq!(
        session.publish(42, b"23.5", QoS::AtLeastOnce),
        Err(ProtocolError::Timeout)
    );
    assert!(session.is_connected());
}

#[test]
fn test_transport_failure_ends_session() {
    let mut session = connected(Options::default());
    session.transport_mut().fail = true;

    assert_eq!(
        session.publish(42, b"23.5", QoS::AtMostOnce),
        Err(ProtocolError::TransportFailure(TransportError::WriteError))
    );
    assert_eq!(session.state(), State::Disconnected);
}

#[test]
fn test_subscribe_caches_topic_id() {
    let mut session = connected(Options::default());
    let flags = Flags::with_qos(QoS::AtLeastOnce);
    session.transport_mut().push(&packet(&Message::SubAck {
        flags,
        topic_id: 17,
        message_id: 1,
        return_code: ReturnCode::Accepted,
    }));
    session.transport_mut().push(&packet(&Message::SubAck {
        flags,
        topic_id: 0,
        message_id: 2,
        return_code: ReturnCode::Accepted,
    }));

    assert_eq!(session.subscribe("cmd/sensor1", QoS::AtLeastOnce), Ok(17));
    assert_eq!(session.subscribe("cmd/#", QoS::AtLeastOnce), Ok(0));
    assert_eq!(session.topics().topic_name(17), Some("cmd/sensor1"));
    assert_eq!(session.topics().len(), 1);

    let sent = &session.transport_mut().sent;
    assert_eq!(
        sent[1],
        packet(&Message::Subscribe {
            flags,
            message_id: 2,
            topic: "cmd/#",
        })
    );
}

#[test]
fn test_unsubscribe_and_ping() {
    let mut session = connected(Options::default());
    session.transport_mut().push(&packet(&Message::UnsubAck {
        flags: Flags::with_qos(QoS::AtMostOnce),
        topic_id: 0,
        message_id: 1,
        return_code: ReturnCode::Accepted,
    }));
    session.transport_mut().push(&packet(&Message::PingResp));

    assert_eq!(session.unsubscribe("cmd/#"), Ok(()));
    assert_eq!(session.ping(), Ok(()));
    assert_eq!(
        session.transport_mut().sent[1],
        packet(&Message::PingReq {
            client_id: Some("sensor1")
        })
    );
}

#[test]
fn test_poll_delivers_publication() {
    let mut session = connected(Options::default());
    session.transport_mut().push(&regack(42, 1));
    session.register("temp/room1").unwrap();
    session.transport_mut().sent.clear();

    session.transport_mut().push(&packet(&Message::Publish {
        flags: Flags::with_qos(QoS::AtLeastOnce),
        topic_id: 42,
        message_id: 300,
        payload: b"21.0",
    }));

    let publication = session.poll().unwrap().unwrap();
    assert_eq!(publication.topic_id, 42);
    assert_eq!(publication.topic_name, Some("temp/room1"));
    assert_eq!(publication.payload, b"21.0");
    assert_eq!(publication.qos, QoS::AtLeastOnce);

    assert_eq!(
        session.transport_mut().sent[0],
        puback(42, 300, ReturnCode::Accepted)
    );
    assert_eq!(session.poll(), Ok(None));
}

#[test]
fn test_poll_answers_gateway_requests() {
    let mut session = connected(Options::default());
    session.transport_mut().push(&packet(&Message::Register {
        topic_id: 77,
        message_id: 9,
        topic_name: "cmd/reboot",
    }));
    session.transport_mut().push(&packet(&Message::PingReq { client_id: None }));
    session
        .transport_mut()
        .push(&packet(&Message::Disconnect { duration: None }));

    assert_eq!(session.poll(), Ok(None));
    assert_eq!(session.topics().topic_id("cmd/reboot"), Some(77));
    assert_eq!(session.poll(), Ok(None));
    assert!(session.is_connected());
    assert_eq!(session.poll(), Ok(None));
    assert_eq!(session.state(), State::Disconnected);

    let sent = &session.transport_mut().sent;
    assert_eq!(sent[0], regack(77, 9));
    assert_eq!(sent[1], packet(&Message::PingResp));
}

#[test]
fn test_drain_before_request() {
    let options = Options {
        drain_before_request: true,
        ..Options::default()
    };
    let mut session = connected(options);
    session.transport_mut().push(&regack(7, 1));
    session.transport_mut().push(ARP_NOISE);
    session.transport_mut().reply_to_next_send(&[&regack(42, 1)]);

    assert_eq!(session.register("temp/room1"), Ok(42));
}

#[test]
fn test_drain_counts_dropped_packets() {
    let mut session = connected(Options::default());
    session.transport_mut().push(ARP_NOISE);
    session.transport_mut().push(&regack(7, 1));

    assert_eq!(session.drain(), Ok(2));
    assert_eq!(session.drain(), Ok(0));
}

#[test]
fn test_disconnect() {
    let mut session = connected(Options::default());
    assert_eq!(session.disconnect(), Ok(()));
    assert_eq!(session.state(), State::Disconnected);
    assert_eq!(session.transport_mut().sent[0], [0x02, 0x18]);

    let options = Options {
        sleep_duration: Some(60),
        ..Options::default()
    };
    let mut session = connected(options);
    session.transport_mut().fail = true;
    assert!(session.disconnect().is_err());
    assert_eq!(session.state(), State::Disconnected);

    session.transport_mut().fail = false;
    session.disconnect().unwrap();
    assert_eq!(session.transport_mut().sent[0], [0x04, 0x18, 0x00, 0x3C]);
}
