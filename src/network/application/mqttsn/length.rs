//! The MQTT-SN length prefix.
//!
//! Packets up to 256 bytes carry a single length byte (256 itself is written
//! as `0x00`). Longer packets carry the marker `0x01` followed by the total
//! length as a big-endian `u16`. The length always counts the whole packet,
//! prefix included.

use super::error::CodecError;
use heapless::Vec;

/// Smallest valid packet: one length byte and one type byte.
pub const MIN_PACKET_LEN: u32 = 2;
/// Largest packet expressible with the single byte prefix.
pub const MAX_SHORT_PACKET_LEN: u32 = 256;
/// Largest packet expressible at all.
pub const MAX_PACKET_LEN: u32 = 65535;
/// First byte of a three byte prefix.
pub const LONG_FORM_MARKER: u8 = 0x01;

/// Encode a total packet length as a one or three byte prefix.
///
/// # Errors
///
/// * [`CodecError::MalformedPacket`] - `total` is below [`MIN_PACKET_LEN`]
/// * [`CodecError::PacketTooLarge`] - `total` exceeds [`MAX_PACKET_LEN`]
pub fn encode_length(total: u32) -> Result<Vec<u8, 3>, CodecError> {
    if total < MIN_PACKET_LEN {
        return Err(CodecError::MalformedPacket);
    }
    if total > MAX_PACKET_LEN {
        return Err(CodecError::PacketTooLarge(total as usize));
    }

    let mut prefix = Vec::new();
    if total <= MAX_SHORT_PACKET_LEN {
        // 256 wraps to 0x00
        prefix
            .push(total as u8)
            .map_err(|_| CodecError::BufferTooSmall)?;
    } else {
        let [hi, lo] = (total as u16).to_be_bytes();
        prefix
            .extend_from_slice(&[LONG_FORM_MARKER, hi, lo])
            .map_err(|_| CodecError::BufferTooSmall)?;
    }
    Ok(prefix)
}

/// Decode a length prefix from the start of `bytes`.
///
/// Returns the declared total packet length and the prefix width.
///
/// # Errors
///
/// * [`CodecError::TruncatedPacket`] - `bytes` ends inside the prefix
/// * [`CodecError::MalformedPacket`] - the declared length cannot hold the
///   prefix plus a type byte
pub fn decode_length(bytes: &[u8]) -> Result<(u32, usize), CodecError> {
    let (total, width) = match bytes {
        [] => {
            return Err(CodecError::TruncatedPacket {
                declared: 1,
                available: 0,
            });
        }
        [LONG_FORM_MARKER, hi, lo, ..] => (u16::from_be_bytes([*hi, *lo]) as u32, 3),
        [LONG_FORM_MARKER, ..] => {
            return Err(CodecError::TruncatedPacket {
                declared: 3,
                available: bytes.len(),
            });
        }
        [0x00, ..] => (MAX_SHORT_PACKET_LEN, 1),
        [len, ..] => (*len as u32, 1),
    };
    if total < width as u32 + 1 {
        return Err(CodecError::MalformedPacket);
    }
    Ok((total, width))
}

/// Total packet length for a body of `body_len` bytes, prefix and type byte
/// included.
///
/// # Errors
///
/// * [`CodecError::PacketTooLarge`] - the packet would exceed [`MAX_PACKET_LEN`]
pub fn total_length(body_len: usize) -> Result<u32, CodecError> {
    let short = body_len.saturating_add(2);
    if short <= MAX_SHORT_PACKET_LEN as usize {
        return Ok(short as u32);
    }
    let long = body_len.saturating_add(4);
    if long > MAX_PACKET_LEN as usize {
        return Err(CodecError::PacketTooLarge(long));
    }
    Ok(long as u32)
}
