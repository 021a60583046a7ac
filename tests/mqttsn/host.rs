use crate::mock::packet;
use libmqttsn::network::Transport;
use libmqttsn::{Message, Options, ProtocolError, Session, StdClock, UdpTransport};
use std::net::UdpSocket;
use std::time::{Duration, Instant};

fn loopback() -> UdpSocket {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("Failed to bind UDP socket");
    socket
        .set_read_timeout(Some(Duration::from_secs(1)))
        .unwrap();
    socket
}

/// Poll `transport` until a packet shows up or a second has passed.
fn receive_within(transport: &mut UdpTransport, buf: &mut [u8]) -> Option<usize> {
    let deadline = Instant::now() + Duration::from_secs(1);
    while Instant::now() < deadline {
        if let Some(len) = transport.receive(buf).unwrap() {
            return Some(len);
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    None
}

#[test]
fn test_udp_drops_foreign_datagrams() {
    let gateway = loopback();
    let stranger = loopback();
    let mut transport =
        UdpTransport::bind("127.0.0.1:0", gateway.local_addr().unwrap()).unwrap();
    let local = transport.local_addr().unwrap();
    let mut buf = [0u8; 64];

    assert_eq!(transport.receive(&mut buf), Ok(None));

    stranger.send_to(&packet(&Message::PingResp), local).unwrap();
    let connack = [0x03, 0x05, 0x00];
    gateway.send_to(&connack, local).unwrap();

    let len = receive_within(&mut transport, &mut buf).expect("no datagram from the gateway");
    assert_eq!(buf[..len], connack);
    assert_eq!(receive_within(&mut transport, &mut buf), None);
}

#[test]
fn test_udp_sends_to_gateway() {
    let gateway = loopback();
    let mut transport =
        UdpTransport::bind("127.0.0.1:0", gateway.local_addr().unwrap()).unwrap();

    transport.send(&[0x02, 0x16]).unwrap();

    let mut buf = [0u8; 64];
    let (len, from) = gateway.recv_from(&mut buf).unwrap();
    assert_eq!(buf[..len], [0x02, 0x16]);
    assert_eq!(from, transport.local_addr().unwrap());
}

#[test]
fn test_connect_times_out_on_silent_gateway() {
    let gateway = loopback();
    let transport = UdpTransport::bind("127.0.0.1:0", gateway.local_addr().unwrap()).unwrap();
    let options = Options {
        ack_timeout_ms: Some(50),
        ..Options::default()
    };
    let mut session: Session<'_, _, _> = Session::new(transport, StdClock::new(), options);

    let started = Instant::now();
    assert_eq!(session.connect("sensor1"), Err(ProtocolError::Timeout));
    assert!(started.elapsed() >= Duration::from_millis(50));
    assert!(!session.is_connected());

    let mut buf = [0u8; 64];
    let (len, _) = gateway.recv_from(&mut buf).unwrap();
    assert_eq!(buf[1], 0x04);
    assert_eq!(&buf[6..len], b"sensor1");
}
