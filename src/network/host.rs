//! UDP transport and wall clock for hosted targets.

use super::error::Error;
use super::{Clock, Transport};
use core::time::Duration;
use std::io::ErrorKind;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Instant;

/// A [`Transport`] over a non-blocking UDP socket talking to one gateway.
///
/// Datagrams arriving from any address other than the gateway are dropped
/// on receipt.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    gateway: SocketAddr,
}

impl UdpTransport {
    /// Bind `local` and direct all traffic at `gateway`.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidAddress`] - either address fails to resolve
    /// * [`Error::NotOpen`] - the socket could not be bound or configured
    pub fn bind(local: impl ToSocketAddrs, gateway: impl ToSocketAddrs) -> Result<Self, Error> {
        let gateway = gateway
            .to_socket_addrs()
            .map_err(|_| Error::InvalidAddress)?
            .next()
            .ok_or(Error::InvalidAddress)?;
        let socket = UdpSocket::bind(local).map_err(|_| Error::NotOpen)?;
        socket.set_nonblocking(true).map_err(|_| Error::NotOpen)?;
        Ok(Self { socket, gateway })
    }

    /// The gateway every packet is sent to.
    pub fn gateway(&self) -> SocketAddr {
        self.gateway
    }

    /// The locally bound address.
    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        self.socket.local_addr().map_err(|_| Error::NotOpen)
    }
}

impl Transport for UdpTransport {
    type Error = Error;

    fn send(&mut self, packet: &[u8]) -> Result<(), Self::Error> {
        let sent = self
            .socket
            .send_to(packet, self.gateway)
            .map_err(|_| Error::WriteError)?;
        if sent != packet.len() {
            return Err(Error::WriteError);
        }
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<Option<usize>, Self::Error> {
        loop {
            match self.socket.recv_from(buf) {
                Ok((len, from)) if from == self.gateway => return Ok(Some(len)),
                Ok(_) => continue,
                Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(None),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) => return Err(Error::ReadError),
            }
        }
    }
}

/// A [`Clock`] backed by [`std::time::Instant`].
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: Instant,
}

impl StdClock {
    /// Start a clock at the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StdClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}
