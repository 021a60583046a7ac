//! Common error types for transport operations

/// A common error type for transport operations.
///
/// This enum defines the set of errors a [`Transport`](super::Transport) can
/// surface to the protocol layer. It is designed to be simple and portable for
/// `no_std` environments.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// An operation was attempted on a transport that is not open.
    NotOpen,
    /// An error occurred while sending a packet.
    WriteError,
    /// An error occurred while receiving a packet.
    ReadError,
    /// No matching packet arrived before the deadline.
    Timeout,
    /// The connection was closed.
    ConnectionClosed,
    /// An invalid address was provided.
    InvalidAddress,
    /// An inbound frame does not fit the receive buffer.
    FrameTooLarge,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::NotOpen => write!(f, "transport is not open"),
            Error::WriteError => write!(f, "failed to send packet"),
            Error::ReadError => write!(f, "failed to receive packet"),
            Error::Timeout => write!(f, "timed out waiting for a packet"),
            Error::ConnectionClosed => write!(f, "connection closed"),
            Error::InvalidAddress => write!(f, "invalid address"),
            Error::FrameTooLarge => write!(f, "inbound frame exceeds buffer"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::NotOpen => defmt::write!(f, "NotOpen"),
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::Timeout => defmt::write!(f, "Timeout"),
            Error::ConnectionClosed => defmt::write!(f, "ConnectionClosed"),
            Error::InvalidAddress => defmt::write!(f, "InvalidAddress"),
            Error::FrameTooLarge => defmt::write!(f, "FrameTooLarge"),
        }
    }
}
