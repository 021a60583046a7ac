//! MQTT-SN 1.2 client for sensor networks.
//!
//! MQTT-SN is the datagram flavour of MQTT. Topic names are replaced by
//! 16-bit topic ids obtained through a REGISTER exchange, and every packet
//! fits a single small datagram so that it can travel over UDP, ZigBee or a
//! serial line.
//!
//! # Layers
//!
//! - [`length`]: the one or three byte length prefix
//! - [`message`]: message types, flags and the per-type field layouts
//! - [`codec`]: whole packet encoding and decoding
//! - [`client`]: the blocking client [`Session`]
//! - [`topics`]: topic id bookkeeping for a session
//! - [`stream`]: packet framing for byte-stream links
//!
//! # Usage
//!
//! ```rust,no_run
//! use libmqttsn::network::application::mqttsn::{Options, QoS, Session};
//! use libmqttsn::network::{NoClock, Transport};
//! # struct Udp;
//! # impl Transport for Udp {
//! #     type Error = ();
//! #     fn send(&mut self, _packet: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn receive(&mut self, _buf: &mut [u8]) -> Result<Option<usize>, Self::Error> { Ok(None) }
//! # }
//!
//! # fn main() -> Result<(), libmqttsn::ProtocolError> {
//! let options = Options {
//!     ack_timeout_ms: Some(2_000),
//!     ..Options::default()
//! };
//! let mut session: Session<'_, _, _> = Session::new(Udp, NoClock, options);
//! session.connect("sensor1")?;
//! let topic = session.register("temp/room1")?;
//! session.publish(topic, b"23.5", QoS::AtLeastOnce)?;
//! session.disconnect()?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod codec;
pub mod error;
pub mod length;
pub mod message;
pub mod stream;
pub mod topics;

pub use client::{
    DEFAULT_BUFFER_SIZE, DiscardHook, Discarded, Options, Publication, Session, State, Will,
};
pub use codec::{decode, encode, frame_length};
pub use error::{CodecError, ProtocolError};
pub use length::{decode_length, encode_length, total_length};
pub use message::{Field, FieldKind, Flags, Message, MessageType, QoS, ReturnCode, TopicIdType};
pub use stream::StreamTransport;
pub use topics::TopicRegistry;
