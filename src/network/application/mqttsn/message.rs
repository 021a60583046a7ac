//! MQTT-SN message types, flags and the message registry.
//!
//! Every MQTT-SN packet carries a one byte type tag identifying its layout.
//! [`MessageType`] is the closed set of tags this crate understands and
//! [`MessageType::schema`] describes each body field by field. [`Message`] is the
//! decoded form: one variant per type, borrowing strings and payloads from the
//! buffer it was decoded from.

use super::error::CodecError;
use serde::Deserialize;

/// The MQTT-SN message type tag.
///
/// Tags 0x03, 0x11 and 0x19 are reserved by the protocol and have no variant.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageType {
    /// Gateway advertisement broadcast.
    Advertise = 0x00,
    /// Client search for a gateway.
    SearchGw = 0x01,
    /// Gateway reply to a search.
    GwInfo = 0x02,
    /// Client connection request.
    Connect = 0x04,
    /// Connection acknowledgement.
    ConnAck = 0x05,
    /// Gateway request for the will topic.
    WillTopicReq = 0x06,
    /// Client will topic.
    WillTopic = 0x07,
    /// Gateway request for the will message.
    WillMsgReq = 0x08,
    /// Client will message.
    WillMsg = 0x09,
    /// Topic name to topic id registration.
    Register = 0x0A,
    /// Registration acknowledgement.
    RegAck = 0x0B,
    /// Application message.
    Publish = 0x0C,
    /// QoS 1 publish acknowledgement.
    PubAck = 0x0D,
    /// QoS 2 publish complete.
    PubComp = 0x0E,
    /// QoS 2 publish received.
    PubRec = 0x0F,
    /// QoS 2 publish release.
    PubRel = 0x10,
    /// Subscription request.
    Subscribe = 0x12,
    /// Subscription acknowledgement.
    SubAck = 0x13,
    /// Unsubscription request.
    Unsubscribe = 0x14,
    /// Unsubscription acknowledgement.
    UnsubAck = 0x15,
    /// Keep-alive request.
    PingReq = 0x16,
    /// Keep-alive response.
    PingResp = 0x17,
    /// Session teardown.
    Disconnect = 0x18,
    /// Will topic update.
    WillTopicUpd = 0x1A,
    /// Will topic update response.
    WillTopicResp = 0x1B,
    /// Will message update.
    WillMsgUpd = 0x1C,
    /// Will message update response.
    WillMsgResp = 0x1D,
}

/// The kind of a single body field, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// The shared flags byte.
    Flags,
    /// One unsigned byte.
    U8,
    /// Big-endian unsigned 16 bit integer.
    U16,
    /// UTF-8 text running to the end of the packet.
    Str,
    /// Raw bytes running to the end of the packet.
    Bytes,
    /// UTF-8 text running to the end of the packet, may be absent.
    OptionalStr,
    /// Big-endian unsigned 16 bit integer that may be absent.
    OptionalU16,
}

impl FieldKind {
    /// Number of bytes the field always occupies.
    pub const fn fixed_width(self) -> usize {
        match self {
            FieldKind::Flags | FieldKind::U8 => 1,
            FieldKind::U16 => 2,
            FieldKind::Str | FieldKind::Bytes | FieldKind::OptionalStr | FieldKind::OptionalU16 => {
                0
            }
        }
    }
}

/// One named body field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Field name as used in the protocol documents.
    pub name: &'static str,
    /// Wire representation.
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> Field {
    Field { name, kind }
}

use FieldKind::{Bytes, Flags as FlagsField, OptionalStr, OptionalU16, Str, U8, U16};

const ADVERTISE: &[Field] = &[field("gatewayID", U8), field("duration", U16)];
const SEARCHGW: &[Field] = &[field("radius", U8)];
const GWINFO: &[Field] = &[field("gatewayID", U8), field("gatewayAddr", Bytes)];
const CONNECT: &[Field] = &[
    field("flags", FlagsField),
    field("protocolID", U8),
    field("duration", U16),
    field("clientID", Str),
];
const RETURN_CODE_ONLY: &[Field] = &[field("returnCode", U8)];
const EMPTY: &[Field] = &[];
const FLAGS_TOPIC: &[Field] = &[field("flags", FlagsField), field("topic", Str)];
const WILLMSG: &[Field] = &[field("flags", FlagsField), field("message", Bytes)];
const REGISTER: &[Field] = &[
    field("topicID", U16),
    field("messageID", U16),
    field("topicName", Str),
];
const ID_ACK: &[Field] = &[
    field("topicID", U16),
    field("messageID", U16),
    field("returnCode", U8),
];
const PUBLISH: &[Field] = &[
    field("flags", FlagsField),
    field("topicID", U16),
    field("messageID", U16),
    field("payload", Bytes),
];
const MESSAGE_ID_ONLY: &[Field] = &[field("messageID", U16)];
const FLAGS_ID_TOPIC: &[Field] = &[
    field("flags", FlagsField),
    field("messageID", U16),
    field("topic", Str),
];
const FLAGS_ID_ACK: &[Field] = &[
    field("flags", FlagsField),
    field("topicID", U16),
    field("messageID", U16),
    field("returnCode", U8),
];
const PINGREQ: &[Field] = &[field("clientID", OptionalStr)];
const DISCONNECT: &[Field] = &[field("duration", OptionalU16)];
const WILLMSGUPD: &[Field] = &[field("message", Bytes)];

impl MessageType {
    /// Every known message type in tag order.
    pub const ALL: [MessageType; 27] = [
        MessageType::Advertise,
        MessageType::SearchGw,
        MessageType::GwInfo,
        MessageType::Connect,
        MessageType::ConnAck,
        MessageType::WillTopicReq,
        MessageType::WillTopic,
        MessageType::WillMsgReq,
        MessageType::WillMsg,
        MessageType::Register,
        MessageType::RegAck,
        MessageType::Publish,
        MessageType::PubAck,
        MessageType::PubComp,
        MessageType::PubRec,
        MessageType::PubRel,
        MessageType::Subscribe,
        MessageType::SubAck,
        MessageType::Unsubscribe,
        MessageType::UnsubAck,
        MessageType::PingReq,
        MessageType::PingResp,
        MessageType::Disconnect,
        MessageType::WillTopicUpd,
        MessageType::WillTopicResp,
        MessageType::WillMsgUpd,
        MessageType::WillMsgResp,
    ];

    /// Look up a type tag. Returns `None` for reserved or unknown tags.
    pub const fn from_u8(tag: u8) -> Option<Self> {
        Some(match tag {
            0x00 => MessageType::Advertise,
            0x01 => MessageType::SearchGw,
            0x02 => MessageType::GwInfo,
            0x04 => MessageType::Connect,
            0x05 => MessageType::ConnAck,
            0x06 => MessageType::WillTopicReq,
            0x07 => MessageType::WillTopic,
            0x08 => MessageType::WillMsgReq,
            0x09 => MessageType::WillMsg,
            0x0A => MessageType::Register,
            0x0B => MessageType::RegAck,
            0x0C => MessageType::Publish,
            0x0D => MessageType::PubAck,
            0x0E => MessageType::PubComp,
            0x0F => MessageType::PubRec,
            0x10 => MessageType::PubRel,
            0x12 => MessageType::Subscribe,
            0x13 => MessageType::SubAck,
            0x14 => MessageType::Unsubscribe,
            0x15 => MessageType::UnsubAck,
            0x16 => MessageType::PingReq,
            0x17 => MessageType::PingResp,
            0x18 => MessageType::Disconnect,
            0x1A => MessageType::WillTopicUpd,
            0x1B => MessageType::WillTopicResp,
            0x1C => MessageType::WillMsgUpd,
            0x1D => MessageType::WillMsgResp,
            _ => return None,
        })
    }

    /// The wire tag.
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Upper-case protocol name, e.g. `"REGACK"`.
    pub const fn name(self) -> &'static str {
        match self {
            MessageType::Advertise => "ADVERTISE",
            MessageType::SearchGw => "SEARCHGW",
            MessageType::GwInfo => "GWINFO",
            MessageType::Connect => "CONNECT",
            MessageType::ConnAck => "CONNACK",
            MessageType::WillTopicReq => "WILLTOPICREQ",
            MessageType::WillTopic => "WILLTOPIC",
            MessageType::WillMsgReq => "WILLMSGREQ",
            MessageType::WillMsg => "WILLMSG",
            MessageType::Register => "REGISTER",
            MessageType::RegAck => "REGACK",
            MessageType::Publish => "PUBLISH",
            MessageType::PubAck => "PUBACK",
            MessageType::PubComp => "PUBCOMP",
            MessageType::PubRec => "PUBREC",
            MessageType::PubRel => "PUBREL",
            MessageType::Subscribe => "SUBSCRIBE",
            MessageType::SubAck => "SUBACK",
            MessageType::Unsubscribe => "UNSUBSCRIBE",
            MessageType::UnsubAck => "UNSUBACK",
            MessageType::PingReq => "PINGREQ",
            MessageType::PingResp => "PINGRESP",
            MessageType::Disconnect => "DISCONNECT",
            MessageType::WillTopicUpd => "WILLTOPICUPD",
            MessageType::WillTopicResp => "WILLTOPICRESP",
            MessageType::WillMsgUpd => "WILLMSGUPD",
            MessageType::WillMsgResp => "WILLMSGRESP",
        }
    }

    /// Body layout of this message type, in wire order.
    pub const fn schema(self) -> &'static [Field] {
        match self {
            MessageType::Advertise => ADVERTISE,
            MessageType::SearchGw => SEARCHGW,
            MessageType::GwInfo => GWINFO,
            MessageType::Connect => CONNECT,
            MessageType::ConnAck
            | MessageType::WillTopicResp
            | MessageType::WillMsgResp => RETURN_CODE_ONLY,
            MessageType::WillTopicReq | MessageType::WillMsgReq | MessageType::PingResp => EMPTY,
            MessageType::WillTopic | MessageType::WillTopicUpd => FLAGS_TOPIC,
            MessageType::WillMsg => WILLMSG,
            MessageType::Register => REGISTER,
            MessageType::RegAck | MessageType::PubAck => ID_ACK,
            MessageType::Publish => PUBLISH,
            MessageType::PubComp | MessageType::PubRec | MessageType::PubRel => MESSAGE_ID_ONLY,
            MessageType::Subscribe | MessageType::Unsubscribe => FLAGS_ID_TOPIC,
            MessageType::SubAck | MessageType::UnsubAck => FLAGS_ID_ACK,
            MessageType::PingReq => PINGREQ,
            MessageType::Disconnect => DISCONNECT,
            MessageType::WillMsgUpd => WILLMSGUPD,
        }
    }

    /// Minimum body length: the sum of every fixed-width field.
    pub const fn fixed_body_len(self) -> usize {
        let schema = self.schema();
        let mut total = 0;
        let mut i = 0;
        while i < schema.len() {
            total += schema[i].kind.fixed_width();
            i += 1;
        }
        total
    }
}

impl TryFrom<u8> for MessageType {
    type Error = CodecError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        MessageType::from_u8(tag).ok_or(CodecError::UnknownPacketType(tag))
    }
}

impl From<MessageType> for u8 {
    fn from(message_type: MessageType) -> Self {
        message_type.tag()
    }
}

/// Quality of service carried in the flags byte.
///
/// The session layer only drives [`QoS::AtMostOnce`] and [`QoS::AtLeastOnce`];
/// the other levels exist so that every flags byte decodes losslessly.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "u8")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QoS {
    /// Fire and forget.
    #[default]
    AtMostOnce = 0,
    /// Acknowledged delivery.
    AtLeastOnce = 1,
    /// Assured delivery.
    ExactlyOnce = 2,
    /// Publish without a connection (QoS "-1").
    WithoutSession = 3,
}

impl QoS {
    const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => QoS::AtMostOnce,
            1 => QoS::AtLeastOnce,
            2 => QoS::ExactlyOnce,
            _ => QoS::WithoutSession,
        }
    }
}

impl TryFrom<u8> for QoS {
    type Error = CodecError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        if level > 3 {
            return Err(CodecError::MalformedPacket);
        }
        Ok(QoS::from_bits(level))
    }
}

/// How the topic field of a PUBLISH, SUBSCRIBE or UNSUBSCRIBE is interpreted.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TopicIdType {
    /// A topic id assigned through REGISTER, or a full topic name.
    #[default]
    Normal = 0,
    /// A topic id agreed out of band.
    Predefined = 1,
    /// A two character topic name.
    ShortName = 2,
    /// Reserved by the protocol.
    Reserved = 3,
}

impl TopicIdType {
    const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => TopicIdType::Normal,
            1 => TopicIdType::Predefined,
            2 => TopicIdType::ShortName,
            _ => TopicIdType::Reserved,
        }
    }
}

const DUP: u8 = 0x80;
const QOS_SHIFT: u8 = 5;
const RETAIN: u8 = 0x10;
const WILL: u8 = 0x08;
const CLEAN_SESSION: u8 = 0x04;
const TOPIC_ID_TYPE_MASK: u8 = 0x03;

/// The flags byte: `DUP:1 QoS:2 RETAIN:1 WILL:1 CLEAN:1 TOPIC_ID_TYPE:2`.
///
/// The default has `clean_session` set and every other field cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Flags {
    /// Retransmission marker.
    pub dup: bool,
    /// Quality of service.
    pub qos: QoS,
    /// Retain the message at the gateway.
    pub retain: bool,
    /// Request the will handshake during CONNECT.
    pub will: bool,
    /// Discard previous session state.
    pub clean_session: bool,
    /// Interpretation of the topic field.
    pub topic_id_type: TopicIdType,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            dup: false,
            qos: QoS::AtMostOnce,
            retain: false,
            will: false,
            clean_session: true,
            topic_id_type: TopicIdType::Normal,
        }
    }
}

impl Flags {
    /// Unpack a flags byte. Every byte value is valid.
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            dup: byte & DUP != 0,
            qos: QoS::from_bits(byte >> QOS_SHIFT),
            retain: byte & RETAIN != 0,
            will: byte & WILL != 0,
            clean_session: byte & CLEAN_SESSION != 0,
            topic_id_type: TopicIdType::from_bits(byte & TOPIC_ID_TYPE_MASK),
        }
    }

    /// Pack into the wire byte.
    pub const fn to_byte(self) -> u8 {
        let mut byte = ((self.qos as u8) << QOS_SHIFT) | (self.topic_id_type as u8);
        if self.dup {
            byte |= DUP;
        }
        if self.retain {
            byte |= RETAIN;
        }
        if self.will {
            byte |= WILL;
        }
        if self.clean_session {
            byte |= CLEAN_SESSION;
        }
        byte
    }

    /// Flags for a PUBLISH or SUBSCRIBE at `qos` with a normal topic id.
    pub const fn with_qos(qos: QoS) -> Self {
        Self {
            dup: false,
            qos,
            retain: false,
            will: false,
            clean_session: false,
            topic_id_type: TopicIdType::Normal,
        }
    }
}

impl From<u8> for Flags {
    fn from(byte: u8) -> Self {
        Flags::from_byte(byte)
    }
}

impl From<Flags> for u8 {
    fn from(flags: Flags) -> Self {
        flags.to_byte()
    }
}

/// Gateway verdict carried by acknowledgements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReturnCode {
    /// Request accepted.
    Accepted,
    /// Rejected: congestion.
    Congestion,
    /// Rejected: invalid topic id.
    InvalidTopicId,
    /// Rejected: not supported.
    NotSupported,
    /// Any other value, preserved as received.
    Reserved(u8),
}

impl ReturnCode {
    /// Whether the gateway accepted the request.
    pub const fn is_accepted(self) -> bool {
        matches!(self, ReturnCode::Accepted)
    }
}

impl From<u8> for ReturnCode {
    fn from(code: u8) -> Self {
        match code {
            0x00 => ReturnCode::Accepted,
            0x01 => ReturnCode::Congestion,
            0x02 => ReturnCode::InvalidTopicId,
            0x03 => ReturnCode::NotSupported,
            other => ReturnCode::Reserved(other),
        }
    }
}

impl From<ReturnCode> for u8 {
    fn from(code: ReturnCode) -> Self {
        match code {
            ReturnCode::Accepted => 0x00,
            ReturnCode::Congestion => 0x01,
            ReturnCode::InvalidTopicId => 0x02,
            ReturnCode::NotSupported => 0x03,
            ReturnCode::Reserved(other) => other,
        }
    }
}

/// Protocol id carried by every CONNECT.
pub const PROTOCOL_ID: u8 = 0x01;

/// A decoded MQTT-SN message.
///
/// String and byte fields borrow from the buffer the message was decoded from
/// (or the arguments it was built from).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message<'a> {
    /// ADVERTISE
    Advertise {
        /// Advertising gateway.
        gateway_id: u8,
        /// Seconds until the next advertisement.
        duration: u16,
    },
    /// SEARCHGW
    SearchGw {
        /// Broadcast radius in hops.
        radius: u8,
    },
    /// GWINFO
    GwInfo {
        /// Responding gateway.
        gateway_id: u8,
        /// Link-layer address of the gateway, may be empty.
        gateway_address: &'a [u8],
    },
    /// CONNECT
    Connect {
        /// Will and clean-session flags.
        flags: Flags,
        /// Always [`PROTOCOL_ID`] for this protocol version.
        protocol_id: u8,
        /// Keep-alive in seconds.
        duration: u16,
        /// Client identifier.
        client_id: &'a str,
    },
    /// CONNACK
    ConnAck {
        /// Gateway verdict.
        return_code: ReturnCode,
    },
    /// WILLTOPICREQ
    WillTopicReq,
    /// WILLTOPIC
    WillTopic {
        /// Will QoS and retain.
        flags: Flags,
        /// Will topic name.
        topic: &'a str,
    },
    /// WILLMSGREQ
    WillMsgReq,
    /// WILLMSG
    WillMsg {
        /// Will QoS and retain.
        flags: Flags,
        /// Will payload.
        message: &'a [u8],
    },
    /// REGISTER
    Register {
        /// Zero when sent by a client, the assigned id when sent by a gateway.
        topic_id: u16,
        /// Correlation id.
        message_id: u16,
        /// Topic being registered.
        topic_name: &'a str,
    },
    /// REGACK
    RegAck {
        /// Assigned topic id.
        topic_id: u16,
        /// Correlation id of the REGISTER.
        message_id: u16,
        /// Gateway verdict.
        return_code: ReturnCode,
    },
    /// PUBLISH
    Publish {
        /// QoS, retain, dup and topic id type.
        flags: Flags,
        /// Destination topic id.
        topic_id: u16,
        /// Correlation id, zero for QoS 0.
        message_id: u16,
        /// Application payload.
        payload: &'a [u8],
    },
    /// PUBACK
    PubAck {
        /// Topic of the acknowledged PUBLISH.
        topic_id: u16,
        /// Correlation id of the PUBLISH.
        message_id: u16,
        /// Gateway verdict.
        return_code: ReturnCode,
    },
    /// PUBCOMP
    PubComp {
        /// Correlation id.
        message_id: u16,
    },
    /// PUBREC
    PubRec {
        /// Correlation id.
        message_id: u16,
    },
    /// PUBREL
    PubRel {
        /// Correlation id.
        message_id: u16,
    },
    /// SUBSCRIBE
    Subscribe {
        /// Requested QoS and topic id type.
        flags: Flags,
        /// Correlation id.
        message_id: u16,
        /// Topic name or filter.
        topic: &'a str,
    },
    /// SUBACK
    SubAck {
        /// Granted QoS.
        flags: Flags,
        /// Assigned topic id, zero for wildcard subscriptions.
        topic_id: u16,
        /// Correlation id of the SUBSCRIBE.
        message_id: u16,
        /// Gateway verdict.
        return_code: ReturnCode,
    },
    /// UNSUBSCRIBE
    Unsubscribe {
        /// Topic id type.
        flags: Flags,
        /// Correlation id.
        message_id: u16,
        /// Topic name or filter.
        topic: &'a str,
    },
    /// UNSUBACK
    UnsubAck {
        /// Flags echoed by the gateway.
        flags: Flags,
        /// Topic id, if any.
        topic_id: u16,
        /// Correlation id of the UNSUBSCRIBE.
        message_id: u16,
        /// Gateway verdict.
        return_code: ReturnCode,
    },
    /// PINGREQ
    PingReq {
        /// Present when a sleeping client wakes up.
        ///
        /// An empty id has no wire form distinct from an absent one:
        /// `Some("")` encodes to an empty body and decodes as `None`.
        client_id: Option<&'a str>,
    },
    /// PINGRESP
    PingResp,
    /// DISCONNECT
    Disconnect {
        /// Sleep duration in seconds; absent for a plain disconnect.
        duration: Option<u16>,
    },
    /// WILLTOPICUPD
    WillTopicUpd {
        /// Will QoS and retain.
        flags: Flags,
        /// New will topic.
        topic: &'a str,
    },
    /// WILLTOPICRESP
    WillTopicResp {
        /// Gateway verdict.
        return_code: ReturnCode,
    },
    /// WILLMSGUPD
    WillMsgUpd {
        /// New will payload.
        message: &'a [u8],
    },
    /// WILLMSGRESP
    WillMsgResp {
        /// Gateway verdict.
        return_code: ReturnCode,
    },
}

impl Message<'_> {
    /// The type tag of this message.
    pub const fn message_type(&self) -> MessageType {
        match self {
            Message::Advertise { .. } => MessageType::Advertise,
            Message::SearchGw { .. } => MessageType::SearchGw,
            Message::GwInfo { .. } => MessageType::GwInfo,
            Message::Connect { .. } => MessageType::Connect,
            Message::ConnAck { .. } => MessageType::ConnAck,
            Message::WillTopicReq => MessageType::WillTopicReq,
            Message::WillTopic { .. } => MessageType::WillTopic,
            Message::WillMsgReq => MessageType::WillMsgReq,
            Message::WillMsg { .. } => MessageType::WillMsg,
            Message::Register { .. } => MessageType::Register,
            Message::RegAck { .. } => MessageType::RegAck,
            Message::Publish { .. } => MessageType::Publish,
            Message::PubAck { .. } => MessageType::PubAck,
            Message::PubComp { .. } => MessageType::PubComp,
            Message::PubRec { .. } => MessageType::PubRec,
            Message::PubRel { .. } => MessageType::PubRel,
            Message::Subscribe { .. } => MessageType::Subscribe,
            Message::SubAck { .. } => MessageType::SubAck,
            Message::Unsubscribe { .. } => MessageType::Unsubscribe,
            Message::UnsubAck { .. } => MessageType::UnsubAck,
            Message::PingReq { .. } => MessageType::PingReq,
            Message::PingResp => MessageType::PingResp,
            Message::Disconnect { .. } => MessageType::Disconnect,
            Message::WillTopicUpd { .. } => MessageType::WillTopicUpd,
            Message::WillTopicResp { .. } => MessageType::WillTopicResp,
            Message::WillMsgUpd { .. } => MessageType::WillMsgUpd,
            Message::WillMsgResp { .. } => MessageType::WillMsgResp,
        }
    }

    /// The correlation id, for message types that carry one.
    pub const fn message_id(&self) -> Option<u16> {
        match self {
            Message::Register { message_id, .. }
            | Message::RegAck { message_id, .. }
            | Message::Publish { message_id, .. }
            | Message::PubAck { message_id, .. }
            | Message::PubComp { message_id }
            | Message::PubRec { message_id }
            | Message::PubRel { message_id }
            | Message::Subscribe { message_id, .. }
            | Message::SubAck { message_id, .. }
            | Message::Unsubscribe { message_id, .. }
            | Message::UnsubAck { message_id, .. } => Some(*message_id),
            _ => None,
        }
    }

    /// The return code, for acknowledgements that carry one.
    pub const fn return_code(&self) -> Option<ReturnCode> {
        match self {
            Message::ConnAck { return_code }
            | Message::RegAck { return_code, .. }
            | Message::PubAck { return_code, .. }
            | Message::SubAck { return_code, .. }
            | Message::UnsubAck { return_code, .. }
            | Message::WillTopicResp { return_code }
            | Message::WillMsgResp { return_code } => Some(*return_code),
            _ => None,
        }
    }
}
