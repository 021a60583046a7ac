//! Error types for MQTT-SN encoding and session handling.

use super::message::{QoS, ReturnCode};
use crate::network::error::Error as TransportError;

/// Errors raised while encoding or decoding an MQTT-SN packet.
///
/// None of these are fatal to a session: a packet that fails to decode while
/// waiting for an acknowledgement is simply not the acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// The length prefix is smaller than the smallest possible packet, or a
    /// body is too short for the fixed fields of its message type.
    MalformedPacket,
    /// The type byte does not name any MQTT-SN message.
    UnknownPacketType(u8),
    /// Fewer bytes are available than the length prefix declares.
    TruncatedPacket {
        /// Length announced by the prefix.
        declared: usize,
        /// Bytes actually supplied.
        available: usize,
    },
    /// More bytes are available than the length prefix declares.
    TrailingBytes {
        /// Length announced by the prefix.
        declared: usize,
        /// Bytes actually supplied.
        available: usize,
    },
    /// A string field is not valid UTF-8.
    InvalidUtf8,
    /// The output buffer cannot hold the encoded packet.
    BufferTooSmall,
    /// The encoded packet would exceed the 65535 byte limit of the length prefix.
    PacketTooLarge(usize),
}

impl core::fmt::Display for CodecError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CodecError::MalformedPacket => write!(f, "malformed packet"),
            CodecError::UnknownPacketType(tag) => write!(f, "unknown packet type 0x{:02X}", tag),
            CodecError::TruncatedPacket {
                declared,
                available,
            } => write!(
                f,
                "truncated packet: declared {} bytes, got {}",
                declared, available
            ),
            CodecError::TrailingBytes {
                declared,
                available,
            } => write!(
                f,
                "trailing bytes: declared {} bytes, got {}",
                declared, available
            ),
            CodecError::InvalidUtf8 => write!(f, "string field is not valid UTF-8"),
            CodecError::BufferTooSmall => write!(f, "buffer too small for packet"),
            CodecError::PacketTooLarge(len) => write!(f, "packet of {} bytes is too large", len),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CodecError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            CodecError::MalformedPacket => defmt::write!(f, "MalformedPacket"),
            CodecError::UnknownPacketType(tag) => {
                defmt::write!(f, "UnknownPacketType({=u8:#x})", tag)
            }
            CodecError::TruncatedPacket {
                declared,
                available,
            } => defmt::write!(f, "TruncatedPacket({=usize}/{=usize})", available, declared),
            CodecError::TrailingBytes {
                declared,
                available,
            } => defmt::write!(f, "TrailingBytes({=usize}/{=usize})", available, declared),
            CodecError::InvalidUtf8 => defmt::write!(f, "InvalidUtf8"),
            CodecError::BufferTooSmall => defmt::write!(f, "BufferTooSmall"),
            CodecError::PacketTooLarge(len) => defmt::write!(f, "PacketTooLarge({=usize})", len),
        }
    }
}

/// Errors surfaced by [`Session`](super::Session) operations.
///
/// Only [`ProtocolError::TransportFailure`] ends the session; every other
/// variant leaves the session state as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// No acknowledgement arrived within the configured timeout.
    Timeout,
    /// The gateway answered with a rejecting return code (strict mode only).
    NotAcknowledged(ReturnCode),
    /// The requested QoS level is not supported by this client.
    UnsupportedQoS(QoS),
    /// The transport failed; the session is considered dead.
    TransportFailure(TransportError),
    /// An outbound packet could not be encoded.
    Codec(CodecError),
    /// The operation requires a connected session.
    NotConnected,
    /// The client identifier exceeds the protocol maximum.
    ClientIdTooLong,
    /// The topic name exceeds the registry's name capacity.
    TopicTooLong,
    /// The topic registry has no free slot.
    TopicRegistryFull,
}

impl core::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ProtocolError::Timeout => write!(f, "timed out waiting for acknowledgement"),
            ProtocolError::NotAcknowledged(code) => {
                write!(f, "request rejected with return code {}", u8::from(*code))
            }
            ProtocolError::UnsupportedQoS(qos) => write!(f, "unsupported QoS {:?}", qos),
            ProtocolError::TransportFailure(e) => write!(f, "transport failure: {}", e),
            ProtocolError::Codec(e) => write!(f, "encoding failed: {}", e),
            ProtocolError::NotConnected => write!(f, "session is not connected"),
            ProtocolError::ClientIdTooLong => write!(f, "client identifier too long"),
            ProtocolError::TopicTooLong => write!(f, "topic name too long"),
            ProtocolError::TopicRegistryFull => write!(f, "topic registry full"),
        }
    }
}

impl From<CodecError> for ProtocolError {
    fn from(error: CodecError) -> Self {
        ProtocolError::Codec(error)
    }
}

impl From<TransportError> for ProtocolError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Timeout => ProtocolError::Timeout,
            other => ProtocolError::TransportFailure(other),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ProtocolError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ProtocolError::Timeout => defmt::write!(f, "Timeout"),
            ProtocolError::NotAcknowledged(code) => {
                defmt::write!(f, "NotAcknowledged({=u8})", u8::from(*code))
            }
            ProtocolError::UnsupportedQoS(qos) => defmt::write!(f, "UnsupportedQoS({})", qos),
            ProtocolError::TransportFailure(e) => defmt::write!(f, "TransportFailure({})", e),
            ProtocolError::Codec(e) => defmt::write!(f, "Codec({})", e),
            ProtocolError::NotConnected => defmt::write!(f, "NotConnected"),
            ProtocolError::ClientIdTooLong => defmt::write!(f, "ClientIdTooLong"),
            ProtocolError::TopicTooLong => defmt::write!(f, "TopicTooLong"),
            ProtocolError::TopicRegistryFull => defmt::write!(f, "TopicRegistryFull"),
        }
    }
}
