//! A transport abstraction layer for embedded systems
//!
//! This module provides the traits the protocol layers are written against.
//! A [`Transport`] moves whole packets: one `send` call carries one packet and
//! one successful `receive` yields one packet. Stream-oriented links expose the
//! lower-level [`Read`]/[`Write`]/[`Close`] traits instead and are lifted to a
//! packet transport by a framing adapter such as
//! [`StreamTransport`](application::mqttsn::StreamTransport).
//!
//! Time is supplied by a [`Clock`], which keeps deadline handling independent of
//! any particular timer peripheral or operating system.

#![deny(unsafe_code)]

use core::time::Duration;

/// Common error types for transport operations
pub mod error;

/// Application layer protocol implementations
pub mod application;

/// Host transports backed by the standard library.
#[cfg(feature = "std")]
pub mod host;

use error::Error;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{Clock, Close, Connection, Read, Transport, Write};
}

// Core synchronous stream traits

/// The receiving half of a stream connection.
pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read data from the connection. Returns `Ok(0)` when nothing is available.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// The sending half of a stream connection.
pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Orderly shutdown of a stream connection.
pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// A synchronous stream connection
pub trait Connection: Read + Write + Close {}

/// A packet-oriented, possibly unreliable and unordered link.
///
/// Implementations are expected to be non-blocking on `receive`: when no
/// packet is queued they return `Ok(None)` immediately. Blocking waits are
/// built on top with [`receive_matching`].
pub trait Transport {
    /// Associated error type
    type Error: core::fmt::Debug;

    /// Send one packet.
    fn send(&mut self, packet: &[u8]) -> Result<(), Self::Error>;

    /// Poll for one inbound packet, copying it into `buf`.
    ///
    /// Returns the packet length, or `None` if nothing is queued.
    fn receive(&mut self, buf: &mut [u8]) -> Result<Option<usize>, Self::Error>;
}

/// A monotonic time source.
pub trait Clock {
    /// Time elapsed since an arbitrary, fixed origin.
    fn now(&self) -> Duration;
}

/// A clock that never advances.
///
/// Suitable when no acknowledgement timeout is configured; with this clock a
/// configured timeout never expires.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClock;

impl Clock for NoClock {
    fn now(&self) -> Duration {
        Duration::ZERO
    }
}

/// Block until `accept` approves an inbound packet or `timeout` elapses.
///
/// Every packet received while waiting is offered to `accept`; rejected
/// packets are dropped and waiting continues. With `timeout == None` this
/// waits forever. On success the accepted packet occupies `buf[..len]`.
///
/// # Errors
///
/// * [`Error::Timeout`] - the deadline passed without an accepted packet
/// * [`Error::ReadError`] - the transport failed while polling
pub fn receive_matching<T, C, F>(
    transport: &mut T,
    clock: &C,
    buf: &mut [u8],
    timeout: Option<Duration>,
    mut accept: F,
) -> Result<usize, Error>
where
    T: Transport,
    C: Clock,
    F: FnMut(&[u8]) -> bool,
{
    let deadline = timeout.map(|t| clock.now().saturating_add(t));
    loop {
        match transport.receive(buf) {
            Ok(Some(len)) => {
                let len = len.min(buf.len());
                if accept(&buf[..len]) {
                    return Ok(len);
                }
            }
            Ok(None) => {}
            Err(_) => return Err(Error::ReadError),
        }

        if let Some(deadline) = deadline {
            if clock.now() >= deadline {
                return Err(Error::Timeout);
            }
        }
        core::hint::spin_loop();
    }
}

/// Discard every packet currently queued on the transport.
///
/// Links that buffer packets while nobody is reading tend to hold stale
/// traffic; draining before an exchange keeps old replies from being
/// mistaken for new ones. Returns the number of packets dropped.
pub fn drain<T: Transport>(transport: &mut T, buf: &mut [u8]) -> Result<usize, Error> {
    let mut dropped = 0;
    while transport.receive(buf).map_err(|_| Error::ReadError)?.is_some() {
        dropped += 1;
    }
    Ok(dropped)
}
