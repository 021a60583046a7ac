//! Publishes a simulated temperature reading once a second.
//!
//! ```text
//! MQTTSN_GATEWAY=192.168.1.10:1884 cargo run --example sensor_publisher --features std
//! ```

use libmqttsn::{Options, ProtocolError, QoS, Session, StdClock, UdpTransport};
use std::env;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), ProtocolError> {
    let gateway = env::var("MQTTSN_GATEWAY").unwrap_or("127.0.0.1:1884".to_string());
    let transport = UdpTransport::bind("0.0.0.0:0", gateway.as_str())?;

    let options = Options {
        keep_alive_seconds: 60,
        ack_timeout_ms: Some(3_000),
        ..Options::default()
    };
    let mut session: Session<'_, _, _> = Session::new(transport, StdClock::new(), options);

    let code = session.connect("sensor-publisher")?;
    println!("connected to {gateway}: {code:?}");

    let topic_id = session.register("sensors/temperature")?;
    println!("sensors/temperature has topic id {topic_id}");

    for i in 0..10 {
        let reading = format!("{:.1}", 21.0 + i as f32 * 0.3);
        let acknowledged = session.publish(topic_id, reading.as_bytes(), QoS::AtLeastOnce)?;
        println!("published {reading} (acknowledged: {acknowledged})");

        while let Some(publication) = session.poll()? {
            println!(
                "received {} bytes on topic {}",
                publication.payload.len(),
                publication.topic_id
            );
        }
        thread::sleep(Duration::from_secs(1));
    }

    session.disconnect()
}
