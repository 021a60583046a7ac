//! # libmqttsn - MQTT-SN client for embedded devices
//!
//! A Rust implementation of the client side of MQTT-SN 1.2, the datagram
//! variant of MQTT meant for sensor networks. The library runs in `no_std`
//! environments and never allocates: every buffer is fixed-size.
//!
//! ## Features
//!
//! ### Wire Protocol
//! - Length prefix codec (one or three bytes)
//! - All 27 MQTT-SN message types with their field layouts
//! - Lossless flags byte handling, including QoS 2 and QoS -1 bit patterns
//!
//! ### Client Session
//! - CONNECT with optional last will
//! - REGISTER, PUBLISH (QoS 0 and 1), SUBSCRIBE, UNSUBSCRIBE, PINGREQ
//! - Inbound PUBLISH, REGISTER and PINGREQ handling
//! - Configurable acknowledgement timeout, indefinite by default
//! - Unrelated traffic on a shared link is ignored
//!
//! ### Transports
//! - Any packet link implementing [`network::Transport`]
//! - Byte-stream links through [`StreamTransport`]
//! - UDP through `UdpTransport` (`std` feature)
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! libmqttsn = "0.1.0"
//! ```
//!
//! ### Publishing a Reading
//!
//! ```rust,no_run
//! use libmqttsn::{Options, QoS, Session};
//! use libmqttsn::network::{NoClock, Transport};
//! # struct Radio;
//! # impl Transport for Radio {
//! #     type Error = ();
//! #     fn send(&mut self, _packet: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn receive(&mut self, _buf: &mut [u8]) -> Result<Option<usize>, Self::Error> { Ok(None) }
//! # }
//!
//! # fn main() -> Result<(), libmqttsn::ProtocolError> {
//! let mut session: Session<'_, _, _> = Session::new(Radio, NoClock, Options::default());
//! session.connect("sensor1")?;
//! let topic_id = session.register("temp/room1")?;
//! session.publish(topic_id, b"23.5", QoS::AtMostOnce)?;
//! session.disconnect()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Platform Support
//!
//! This library is designed to work on:
//! - Embedded microcontrollers (ARM Cortex-M, RISC-V, etc.)
//! - Linux-based gateways and test hosts
//! - Any platform supporting Rust's `core` library
//!
//! ## Optional Features
//!
//! - `std`: UDP transport and wall clock (default: disabled)
//! - `defmt`: defmt logging support for embedded debugging

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

#[macro_use]
mod fmt;

/// Transport traits and the protocol implementations built on them.
///
/// The MQTT-SN client lives in [`network::application::mqttsn`].
pub mod network;

pub use network::application::mqttsn::{
    CodecError, Message, MessageType, Options, ProtocolError, Publication, QoS, ReturnCode,
    Session, State, StreamTransport, Will,
};
pub use network::error::Error as TransportError;
#[cfg(feature = "std")]
pub use network::host::{StdClock, UdpTransport};
