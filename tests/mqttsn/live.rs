use dotenvy::dotenv;
use libmqttsn::{Options, QoS, ReturnCode, Session, StdClock, UdpTransport};
use std::env;

#[test]
#[ignore = "needs an MQTT-SN gateway, set TEST_MQTTSN_ADDRESS"]
fn test_publish_to_live_gateway() {
    dotenv().ok();
    let address = env::var("TEST_MQTTSN_ADDRESS").unwrap_or("127.0.0.1:1884".to_string());
    let transport =
        UdpTransport::bind("0.0.0.0:0", address.as_str()).expect("Failed to bind UDP socket");

    let options = Options {
        ack_timeout_ms: Some(5_000),
        ..Options::default()
    };
    let mut session: Session<'_, _, _> = Session::new(transport, StdClock::new(), options);

    assert_eq!(session.connect("libmqttsn-test"), Ok(ReturnCode::Accepted));
    let topic_id = session.register("libmqttsn/test").unwrap();
    assert!(session.publish(topic_id, b"hello", QoS::AtLeastOnce).unwrap());
    assert_eq!(session.ping(), Ok(()));
    session.disconnect().unwrap();
}
