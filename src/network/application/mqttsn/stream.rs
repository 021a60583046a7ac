//! Packet framing over byte streams.
//!
//! MQTT-SN is a datagram protocol, but gateways are also reachable over
//! serial lines and TCP bridges. On those links the length prefix of each
//! packet is the only delimiter. [`StreamTransport`] buffers inbound bytes
//! and hands them out one whole packet at a time.

use super::codec::frame_length;
use crate::network::error::Error;
use crate::network::{Connection, Transport};
use heapless::Vec;

/// A packet [`Transport`] over a stream [`Connection`].
///
/// `N` bounds the largest packet that can be received.
///
/// # Examples
///
/// ```rust
/// use libmqttsn::network::application::mqttsn::StreamTransport;
/// use libmqttsn::network::Transport;
/// # struct Serial;
/// # impl libmqttsn::network::Connection for Serial {}
/// # impl libmqttsn::network::Read for Serial {
/// #     type Error = ();
/// #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
/// # }
/// # impl libmqttsn::network::Write for Serial {
/// #     type Error = ();
/// #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
/// #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// # }
/// # impl libmqttsn::network::Close for Serial {
/// #     type Error = ();
/// #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
/// # }
///
/// let mut transport: StreamTransport<_, 256> = StreamTransport::new(Serial);
/// transport.send(&[0x02, 0x17]).unwrap();
///
/// let mut buf = [0u8; 256];
/// assert_eq!(transport.receive(&mut buf).unwrap(), None);
/// ```
pub struct StreamTransport<C: Connection, const N: usize = 512> {
    connection: C,
    pending: Vec<u8, N>,
}

impl<C: Connection, const N: usize> core::fmt::Debug for StreamTransport<C, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StreamTransport")
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl<C: Connection, const N: usize> StreamTransport<C, N> {
    /// Wrap an open connection.
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            pending: Vec::new(),
        }
    }

    /// Bytes received but not yet returned as a packet.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Unwrap the connection, discarding buffered bytes.
    pub fn into_inner(self) -> C {
        self.connection
    }

    /// Close the underlying connection.
    pub fn close(self) -> Result<(), Error> {
        self.connection.close().map_err(|_| Error::ConnectionClosed)
    }

    fn next_frame(&mut self, out: &mut [u8]) -> Result<Option<usize>, Error> {
        let len = match frame_length(&self.pending) {
            Ok(Some(len)) => len,
            Ok(None) => return Ok(None),
            Err(_) => {
                // the stream has lost sync, nothing buffered is recoverable
                self.pending.clear();
                return Err(Error::ReadError);
            }
        };
        if len > N || len > out.len() {
            self.pending.clear();
            return Err(Error::FrameTooLarge);
        }
        if self.pending.len() < len {
            return Ok(None);
        }

        out[..len].copy_from_slice(&self.pending[..len]);
        let remaining = self.pending.len() - len;
        self.pending.copy_within(len.., 0);
        self.pending.truncate(remaining);
        Ok(Some(len))
    }
}

impl<C: Connection, const N: usize> Transport for StreamTransport<C, N> {
    type Error = Error;

    fn send(&mut self, packet: &[u8]) -> Result<(), Self::Error> {
        let mut written = 0;
        while written < packet.len() {
            match self.connection.write(&packet[written..]) {
                Ok(0) | Err(_) => return Err(Error::WriteError),
                Ok(n) => written += n,
            }
        }
        self.connection.flush().map_err(|_| Error::WriteError)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<Option<usize>, Self::Error> {
        loop {
            if let Some(len) = self.next_frame(buf)? {
                return Ok(Some(len));
            }

            let filled = self.pending.len();
            if filled == N {
                return Err(Error::FrameTooLarge);
            }
            self.pending
                .resize(N, 0)
                .map_err(|_| Error::FrameTooLarge)?;
            let read = self.connection.read(&mut self.pending[filled..]);
            let n = match read {
                Ok(n) => n,
                Err(_) => {
                    self.pending.truncate(filled);
                    return Err(Error::ReadError);
                }
            };
            self.pending.truncate(filled + n);
            if n == 0 {
                return Ok(None);
            }
        }
    }
}
