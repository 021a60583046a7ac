//! Packet encoding and decoding.
//!
//! A packet is a length prefix, a type byte and a body laid out according to
//! [`MessageType::schema`]. Integers are big-endian. Strings and byte strings
//! carry no length of their own: a trailing field runs to the end of the packet.

use super::error::CodecError;
use super::length::{decode_length, encode_length, total_length};
use super::message::{Flags, Message, MessageType, ReturnCode};

struct Writer<'b> {
    buf: &'b mut [u8],
    pos: usize,
}

impl<'b> Writer<'b> {
    fn new(buf: &'b mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn bytes(&mut self, data: &[u8]) -> Result<(), CodecError> {
        let end = self
            .pos
            .checked_add(data.len())
            .ok_or(CodecError::BufferTooSmall)?;
        self.buf
            .get_mut(self.pos..end)
            .ok_or(CodecError::BufferTooSmall)?
            .copy_from_slice(data);
        self.pos = end;
        Ok(())
    }

    fn u8(&mut self, value: u8) -> Result<(), CodecError> {
        self.bytes(&[value])
    }

    fn u16(&mut self, value: u16) -> Result<(), CodecError> {
        self.bytes(&value.to_be_bytes())
    }

    fn flags(&mut self, flags: Flags) -> Result<(), CodecError> {
        self.u8(flags.to_byte())
    }

    fn return_code(&mut self, code: ReturnCode) -> Result<(), CodecError> {
        self.u8(code.into())
    }
}

struct Reader<'a> {
    body: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if self.body.len() < n {
            return Err(CodecError::MalformedPacket);
        }
        let (head, tail) = self.body.split_at(n);
        self.body = tail;
        Ok(head)
    }

    fn u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, CodecError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn flags(&mut self) -> Result<Flags, CodecError> {
        self.u8().map(Flags::from_byte)
    }

    fn return_code(&mut self) -> Result<ReturnCode, CodecError> {
        self.u8().map(ReturnCode::from)
    }

    fn rest(&mut self) -> &'a [u8] {
        core::mem::take(&mut self.body)
    }

    fn rest_str(&mut self) -> Result<&'a str, CodecError> {
        core::str::from_utf8(self.rest()).map_err(|_| CodecError::InvalidUtf8)
    }
}

impl Message<'_> {
    /// Encoded body length, excluding the length prefix and type byte.
    pub fn body_len(&self) -> usize {
        let fixed = self.message_type().fixed_body_len();
        let trailing = match self {
            Message::GwInfo {
                gateway_address, ..
            } => gateway_address.len(),
            Message::Connect { client_id, .. } => client_id.len(),
            Message::WillTopic { topic, .. } | Message::WillTopicUpd { topic, .. } => topic.len(),
            Message::WillMsg { message, .. } | Message::WillMsgUpd { message } => message.len(),
            Message::Register { topic_name, .. } => topic_name.len(),
            Message::Publish { payload, .. } => payload.len(),
            Message::Subscribe { topic, .. } | Message::Unsubscribe { topic, .. } => topic.len(),
            Message::PingReq { client_id } => client_id.map_or(0, str::len),
            Message::Disconnect { duration } => duration.map_or(0, |_| 2),
            _ => 0,
        };
        fixed + trailing
    }

    /// Total encoded length, prefix included.
    ///
    /// # Errors
    ///
    /// * [`CodecError::PacketTooLarge`] - the packet cannot be expressed on the wire
    pub fn encoded_len(&self) -> Result<usize, CodecError> {
        total_length(self.body_len()).map(|total| total as usize)
    }
}

/// Serialize `message` into `buf`, returning the number of bytes written.
///
/// # Errors
///
/// * [`CodecError::PacketTooLarge`] - the packet exceeds 65535 bytes
/// * [`CodecError::BufferTooSmall`] - `buf` cannot hold the packet
pub fn encode(message: &Message<'_>, buf: &mut [u8]) -> Result<usize, CodecError> {
    let total = total_length(message.body_len())?;
    if buf.len() < total as usize {
        return Err(CodecError::BufferTooSmall);
    }

    let mut w = Writer::new(buf);
    w.bytes(&encode_length(total)?)?;
    w.u8(message.message_type().tag())?;

    match *message {
        Message::Advertise {
            gateway_id,
            duration,
        } => {
            w.u8(gateway_id)?;
            w.u16(duration)?;
        }
        Message::SearchGw { radius } => w.u8(radius)?,
        Message::GwInfo {
            gateway_id,
            gateway_address,
        } => {
            w.u8(gateway_id)?;
            w.bytes(gateway_address)?;
        }
        Message::Connect {
            flags,
            protocol_id,
            duration,
            client_id,
        } => {
            w.flags(flags)?;
            w.u8(protocol_id)?;
            w.u16(duration)?;
            w.bytes(client_id.as_bytes())?;
        }
        Message::ConnAck { return_code }
        | Message::WillTopicResp { return_code }
        | Message::WillMsgResp { return_code } => w.return_code(return_code)?,
        Message::WillTopicReq | Message::WillMsgReq | Message::PingResp => {}
        Message::WillTopic { flags, topic } | Message::WillTopicUpd { flags, topic } => {
            w.flags(flags)?;
            w.bytes(topic.as_bytes())?;
        }
        Message::WillMsg { flags, message } => {
            w.flags(flags)?;
            w.bytes(message)?;
        }
        Message::Register {
            topic_id,
            message_id,
            topic_name,
        } => {
            w.u16(topic_id)?;
            w.u16(message_id)?;
            w.bytes(topic_name.as_bytes())?;
        }
        Message::RegAck {
            topic_id,
            message_id,
            return_code,
        }
        | Message::PubAck {
            topic_id,
            message_id,
            return_code,
        } => {
            w.u16(topic_id)?;
            w.u16(message_id)?;
            w.return_code(return_code)?;
        }
        Message::Publish {
            flags,
            topic_id,
            message_id,
            payload,
        } => {
            w.flags(flags)?;
            w.u16(topic_id)?;
            w.u16(message_id)?;
            w.bytes(payload)?;
        }
        Message::PubComp { message_id }
        | Message::PubRec { message_id }
        | Message::PubRel { message_id } => w.u16(message_id)?,
        Message::Subscribe {
            flags,
            message_id,
            topic,
        }
        | Message::Unsubscribe {
            flags,
            message_id,
            topic,
        } => {
            w.flags(flags)?;
            w.u16(message_id)?;
            w.bytes(topic.as_bytes())?;
        }
        Message::SubAck {
            flags,
            topic_id,
            message_id,
            return_code,
        }
        | Message::UnsubAck {
            flags,
            topic_id,
            message_id,
            return_code,
        } => {
            w.flags(flags)?;
            w.u16(topic_id)?;
            w.u16(message_id)?;
            w.return_code(return_code)?;
        }
        Message::PingReq { client_id } => {
            if let Some(client_id) = client_id {
                w.bytes(client_id.as_bytes())?;
            }
        }
        Message::Disconnect { duration } => {
            if let Some(duration) = duration {
                w.u16(duration)?;
            }
        }
        Message::WillMsgUpd { message } => w.bytes(message)?,
    }

    Ok(w.pos)
}

/// Parse exactly one packet occupying all of `bytes`.
///
/// # Errors
///
/// * [`CodecError::TruncatedPacket`] - fewer bytes than the prefix declares
/// * [`CodecError::TrailingBytes`] - more bytes than the prefix declares
/// * [`CodecError::UnknownPacketType`] - the type byte is not an MQTT-SN message
/// * [`CodecError::MalformedPacket`] - the declared length or the body is too
///   short for the message type
/// * [`CodecError::InvalidUtf8`] - a string field is not UTF-8
pub fn decode(bytes: &[u8]) -> Result<Message<'_>, CodecError> {
    let (declared, width) = decode_length(bytes)?;
    let declared = declared as usize;
    if bytes.len() < declared {
        return Err(CodecError::TruncatedPacket {
            declared,
            available: bytes.len(),
        });
    }
    if bytes.len() > declared {
        return Err(CodecError::TrailingBytes {
            declared,
            available: bytes.len(),
        });
    }

    let message_type = MessageType::try_from(bytes[width])?;
    let body = &bytes[width + 1..];
    if body.len() < message_type.fixed_body_len() {
        return Err(CodecError::MalformedPacket);
    }

    let mut r = Reader { body };
    let message = match message_type {
        MessageType::Advertise => Message::Advertise {
            gateway_id: r.u8()?,
            duration: r.u16()?,
        },
        MessageType::SearchGw => Message::SearchGw { radius: r.u8()? },
        MessageType::GwInfo => Message::GwInfo {
            gateway_id: r.u8()?,
            gateway_address: r.rest(),
        },
        MessageType::Connect => Message::Connect {
            flags: r.flags()?,
            protocol_id: r.u8()?,
            duration: r.u16()?,
            client_id: r.rest_str()?,
        },
        MessageType::ConnAck => Message::ConnAck {
            return_code: r.return_code()?,
        },
        MessageType::WillTopicReq => Message::WillTopicReq,
        MessageType::WillTopic => Message::WillTopic {
            flags: r.flags()?,
            topic: r.rest_str()?,
        },
        MessageType::WillMsgReq => Message::WillMsgReq,
        MessageType::WillMsg => Message::WillMsg {
            flags: r.flags()?,
            message: r.rest(),
        },
        MessageType::Register => Message::Register {
            topic_id: r.u16()?,
            message_id: r.u16()?,
            topic_name: r.rest_str()?,
        },
        MessageType::RegAck => Message::RegAck {
            topic_id: r.u16()?,
            message_id: r.u16()?,
            return_code: r.return_code()?,
        },
        MessageType::Publish => Message::Publish {
            flags: r.flags()?,
            topic_id: r.u16()?,
            message_id: r.u16()?,
            payload: r.rest(),
        },
        MessageType::PubAck => Message::PubAck {
            topic_id: r.u16()?,
            message_id: r.u16()?,
            return_code: r.return_code()?,
        },
        MessageType::PubComp => Message::PubComp {
            message_id: r.u16()?,
        },
        MessageType::PubRec => Message::PubRec {
            message_id: r.u16()?,
        },
        MessageType::PubRel => Message::PubRel {
            message_id: r.u16()?,
        },
        MessageType::Subscribe => Message::Subscribe {
            flags: r.flags()?,
            message_id: r.u16()?,
            topic: r.rest_str()?,
        },
        MessageType::SubAck => Message::SubAck {
            flags: r.flags()?,
            topic_id: r.u16()?,
            message_id: r.u16()?,
            return_code: r.return_code()?,
        },
        MessageType::Unsubscribe => Message::Unsubscribe {
            flags: r.flags()?,
            message_id: r.u16()?,
            topic: r.rest_str()?,
        },
        MessageType::UnsubAck => Message::UnsubAck {
            flags: r.flags()?,
            topic_id: r.u16()?,
            message_id: r.u16()?,
            return_code: r.return_code()?,
        },
        MessageType::PingReq => {
            let client_id = r.rest_str()?;
            Message::PingReq {
                client_id: (!client_id.is_empty()).then_some(client_id),
            }
        }
        MessageType::PingResp => Message::PingResp,
        MessageType::Disconnect => match r.body.len() {
            0 => Message::Disconnect { duration: None },
            2 => Message::Disconnect {
                duration: Some(r.u16()?),
            },
            _ => return Err(CodecError::MalformedPacket),
        },
        MessageType::WillTopicUpd => Message::WillTopicUpd {
            flags: r.flags()?,
            topic: r.rest_str()?,
        },
        MessageType::WillTopicResp => Message::WillTopicResp {
            return_code: r.return_code()?,
        },
        MessageType::WillMsgUpd => Message::WillMsgUpd { message: r.rest() },
        MessageType::WillMsgResp => Message::WillMsgResp {
            return_code: r.return_code()?,
        },
    };

    if !r.body.is_empty() {
        return Err(CodecError::MalformedPacket);
    }
    Ok(message)
}

/// Length of the first packet in a partially received byte stream.
///
/// Returns `None` while too few bytes have arrived to read the length prefix.
///
/// # Errors
///
/// * [`CodecError::MalformedPacket`] - the prefix declares an impossible length
pub fn frame_length(bytes: &[u8]) -> Result<Option<usize>, CodecError> {
    match decode_length(bytes) {
        Ok((total, _)) => Ok(Some(total as usize)),
        Err(CodecError::TruncatedPacket { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

