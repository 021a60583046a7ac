//! MQTT-SN client session.
//!
//! A [`Session`] drives the client side of the protocol over any packet
//! [`Transport`]: CONNECT (with the optional will handshake), REGISTER,
//! PUBLISH, SUBSCRIBE, UNSUBSCRIBE, PINGREQ and DISCONNECT. Every request
//! blocks until its acknowledgement arrives or the configured timeout
//! elapses. While waiting, inbound traffic that is not the expected reply is
//! dropped, which lets the session share a link with unrelated protocols.
//!
//! # Examples
//!
//! ```rust,no_run
//! use libmqttsn::network::application::mqttsn::{Options, QoS, Session};
//! use libmqttsn::network::{NoClock, Transport};
//! # struct Radio;
//! # impl Transport for Radio {
//! #     type Error = ();
//! #     fn send(&mut self, _packet: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn receive(&mut self, _buf: &mut [u8]) -> Result<Option<usize>, Self::Error> { Ok(None) }
//! # }
//!
//! let mut session: Session<'_, _, _> = Session::new(Radio, NoClock, Options::default());
//! // session.connect("sensor1")?;
//! // let topic = session.register("temp/room1")?;
//! // session.publish(topic, b"23.5", QoS::AtLeastOnce)?;
//! // session.disconnect()?;
//! ```

use super::codec::{decode, encode};
use super::error::{CodecError, ProtocolError};
use super::message::{Flags, Message, MessageType, PROTOCOL_ID, QoS, ReturnCode, TopicIdType};
use super::topics::TopicRegistry;
use crate::network::error::Error as TransportError;
use crate::network::{Clock, Transport, drain, receive_matching};
use core::time::Duration;
use heapless::String;
use serde::Deserialize;

/// Default size of the session's transmit and receive buffers.
pub const DEFAULT_BUFFER_SIZE: usize = 512;

/// Longest client identifier the protocol permits.
pub const MAX_CLIENT_ID_LEN: usize = 23;

/// Last will registered with the gateway during CONNECT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Will<'a> {
    /// Topic the will is published on.
    pub topic: &'a str,
    /// Will payload.
    pub message: &'a str,
    /// QoS of the will publication.
    #[serde(default)]
    pub qos: QoS,
    /// Whether the gateway retains the will publication.
    #[serde(default)]
    pub retain: bool,
}

/// Session configuration.
///
/// Every field has a default, so partial JSON documents are accepted by
/// [`Options::from_json`].
///
/// # Examples
///
/// ```rust
/// use libmqttsn::network::application::mqttsn::Options;
///
/// let options = Options::from_json(r#"{"keep_alive_seconds":60,"ack_timeout_ms":5000}"#).unwrap();
/// assert_eq!(options.keep_alive_seconds, 60);
/// assert_eq!(options.ack_timeout_ms, Some(5000));
/// assert!(options.clean_session);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options<'a> {
    /// Keep-alive announced in CONNECT, in seconds.
    pub keep_alive_seconds: u16,
    /// Ask the gateway to discard previous session state.
    pub clean_session: bool,
    /// How long to wait for each acknowledgement. `None` waits forever.
    pub ack_timeout_ms: Option<u32>,
    /// Surface rejecting return codes as [`ProtocolError::NotAcknowledged`]
    /// instead of passing them through.
    pub strict_return_codes: bool,
    /// Sleep duration carried by DISCONNECT, in seconds.
    pub sleep_duration: Option<u16>,
    /// Flush queued inbound packets before every request.
    pub drain_before_request: bool,
    /// Last will, negotiated during CONNECT when present.
    #[serde(borrow)]
    pub will: Option<Will<'a>>,
}

impl Default for Options<'_> {
    fn default() -> Self {
        Self {
            keep_alive_seconds: 30,
            clean_session: true,
            ack_timeout_ms: None,
            strict_return_codes: false,
            sleep_duration: None,
            drain_before_request: false,
            will: None,
        }
    }
}

impl<'a> Options<'a> {
    /// Parse options from a JSON object. Missing fields take their defaults.
    pub fn from_json(json: &'a str) -> Result<Self, serde_json_core::de::Error> {
        serde_json_core::from_str(json).map(|(options, _)| options)
    }

    fn ack_timeout(&self) -> Option<Duration> {
        self.ack_timeout_ms.map(|ms| Duration::from_millis(ms as u64))
    }
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// No session with the gateway.
    Disconnected,
    /// CONNECT sent, waiting for CONNACK.
    Connecting,
    /// CONNACK received.
    Connected,
}

/// Why an inbound packet was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discarded {
    /// The packet is not valid MQTT-SN.
    Undecodable(CodecError),
    /// A valid message that is not the awaited reply.
    Unexpected(MessageType),
    /// An acknowledgement for a different message id.
    StaleAck {
        /// The id the acknowledgement carried.
        message_id: u16,
    },
}

/// Observer for dropped inbound packets.
pub type DiscardHook = fn(&[u8], Discarded);

/// An application message received from the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Publication<'a> {
    /// Topic id the message was published on.
    pub topic_id: u16,
    /// Topic name, if the id is known to the registry.
    pub topic_name: Option<&'a str>,
    /// Message id; zero for QoS 0.
    pub message_id: u16,
    /// Application payload.
    pub payload: &'a [u8],
    /// Delivery QoS.
    pub qos: QoS,
    /// Retained message.
    pub retain: bool,
    /// Redelivery.
    pub dup: bool,
}

/// A client session with one MQTT-SN gateway.
///
/// # Type Parameters
///
/// * `T` - the packet [`Transport`] reaching the gateway
/// * `C` - the [`Clock`] timing acknowledgement waits
/// * `N` - size of each of the transmit and receive buffers
pub struct Session<'a, T: Transport, C: Clock, const N: usize = DEFAULT_BUFFER_SIZE> {
    transport: T,
    clock: C,
    options: Options<'a>,
    state: State,
    client_id: String<MAX_CLIENT_ID_LEN>,
    next_message_id: u16,
    topics: TopicRegistry,
    on_discard: Option<DiscardHook>,
    tx: [u8; N],
    rx: [u8; N],
}

impl<T: Transport, C: Clock, const N: usize> core::fmt::Debug for Session<'_, T, C, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("client_id", &self.client_id)
            .field("next_message_id", &self.next_message_id)
            .field("topics", &self.topics)
            .finish_non_exhaustive()
    }
}

fn transmit<T: Transport>(
    transport: &mut T,
    tx: &mut [u8],
    message: &Message<'_>,
) -> Result<(), ProtocolError> {
    let len = encode(message, tx)?;
    transport
        .send(&tx[..len])
        .map_err(|_| ProtocolError::TransportFailure(TransportError::WriteError))?;
    trace!("sent {=str}", message.message_type().name());
    Ok(())
}

fn is_wildcard(topic: &str) -> bool {
    topic.contains(['+', '#'])
}

impl<'a, T: Transport, C: Clock, const N: usize> Session<'a, T, C, N> {
    /// Create a disconnected session.
    pub fn new(transport: T, clock: C, options: Options<'a>) -> Self {
        Self {
            transport,
            clock,
            options,
            state: State::Disconnected,
            client_id: String::new(),
            next_message_id: 1,
            topics: TopicRegistry::new(),
            on_discard: None,
            tx: [0; N],
            rx: [0; N],
        }
    }

    /// Install an observer for inbound packets the session drops.
    pub fn on_discard(&mut self, hook: DiscardHook) {
        self.on_discard = Some(hook);
    }

    /// Current lifecycle state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Whether a CONNACK has been received and no disconnect has happened since.
    pub fn is_connected(&self) -> bool {
        self.state == State::Connected
    }

    /// Client identifier used by the last `connect`.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Topic ids known to this session.
    pub fn topics(&self) -> &TopicRegistry {
        &self.topics
    }

    /// The configuration in effect.
    pub fn options(&self) -> &Options<'a> {
        &self.options
    }

    /// Direct access to the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Tear the session down and hand back the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Open a session with the gateway.
    ///
    /// Sends CONNECT and waits for CONNACK, answering WILLTOPICREQ and
    /// WILLMSGREQ along the way when a will is configured. The topic
    /// registry is cleared first.
    ///
    /// # Returns
    ///
    /// The gateway's return code. Unless strict return codes are enabled a
    /// rejecting code still leaves the session [`State::Connected`].
    ///
    /// # Errors
    ///
    /// * [`ProtocolError::ClientIdTooLong`] - more than 23 bytes of client id
    /// * [`ProtocolError::Timeout`] - no CONNACK within the acknowledgement timeout
    /// * [`ProtocolError::NotAcknowledged`] - rejected, strict mode only
    /// * [`ProtocolError::TransportFailure`] - the link failed
    pub fn connect(&mut self, client_id: &str) -> Result<ReturnCode, ProtocolError> {
        self.client_id = String::try_from(client_id).map_err(|_| ProtocolError::ClientIdTooLong)?;
        self.topics.clear();
        self.state = State::Connecting;

        let result = self.handshake();
        match result {
            Ok(code) => {
                info!("connected as {=str}, return code {}", client_id, code);
                self.state = State::Connected;
            }
            Err(e) => {
                warn!("connect failed: {}", e);
                self.state = State::Disconnected;
            }
        }
        result
    }

    fn handshake(&mut self) -> Result<ReturnCode, ProtocolError> {
        self.prepare()?;
        let will = self.options.will;
        let client_id = self.client_id.clone();
        self.send(&Message::Connect {
            flags: Flags {
                will: will.is_some(),
                clean_session: self.options.clean_session,
                ..Flags::with_qos(QoS::AtMostOnce)
            },
            protocol_id: PROTOCOL_ID,
            duration: self.options.keep_alive_seconds,
            client_id: client_id.as_str(),
        })?;

        let deadline = self.deadline();
        loop {
            let len = self.await_reply(deadline, |message| match message {
                Message::ConnAck { .. } => Ok(()),
                Message::WillTopicReq | Message::WillMsgReq if will.is_some() => Ok(()),
                other => Err(Discarded::Unexpected(other.message_type())),
            })?;

            let reply = decode(&self.rx[..len])?;
            let reply = match (reply, will) {
                (Message::ConnAck { return_code }, _) => return self.check(return_code),
                (Message::WillTopicReq, Some(will)) => Message::WillTopic {
                    flags: Flags {
                        retain: will.retain,
                        ..Flags::with_qos(will.qos)
                    },
                    topic: will.topic,
                },
                (Message::WillMsgReq, Some(will)) => Message::WillMsg {
                    flags: Flags {
                        retain: will.retain,
                        ..Flags::with_qos(will.qos)
                    },
                    message: will.message.as_bytes(),
                },
                _ => continue,
            };
            self.send(&reply)?;
        }
    }

    /// Obtain a topic id for `topic_name`.
    ///
    /// The mapping is recorded in [`Session::topics`]. Registering a name
    /// again replaces the recorded id.
    ///
    /// # Errors
    ///
    /// * [`ProtocolError::NotConnected`] - no session is open
    /// * [`ProtocolError::TopicTooLong`] - the name does not fit the registry
    /// * [`ProtocolError::TopicRegistryFull`] - the name is new and the registry has no free slot; nothing is sent
    /// * [`ProtocolError::Timeout`] - no REGACK within the acknowledgement timeout
    /// * [`ProtocolError::NotAcknowledged`] - rejected, strict mode only
    /// * [`ProtocolError::TransportFailure`] - the link failed
    pub fn register(&mut self, topic_name: &str) -> Result<u16, ProtocolError> {
        self.ensure_connected()?;
        if topic_name.len() > super::topics::MAX_TOPIC_LEN {
            return Err(ProtocolError::TopicTooLong);
        }
        if self.topics.is_full_for(topic_name) {
            return Err(ProtocolError::TopicRegistryFull);
        }
        self.prepare()?;

        let message_id = self.next_message_id();
        self.send(&Message::Register {
            topic_id: 0,
            message_id,
            topic_name,
        })?;

        let deadline = self.deadline();
        let len = self.await_reply(deadline, |message| match *message {
            Message::RegAck { message_id: id, .. } if id == message_id => Ok(()),
            Message::RegAck { message_id: id, .. } => Err(Discarded::StaleAck { message_id: id }),
            ref other => Err(Discarded::Unexpected(other.message_type())),
        })?;

        let Message::RegAck {
            topic_id,
            return_code,
            ..
        } = decode(&self.rx[..len])?
        else {
            return Err(CodecError::MalformedPacket.into());
        };
        self.check(return_code)?;
        if let Err(e) = self.topics.insert(topic_name, topic_id) {
            warn!("topic id {=u16} not cached: {}", topic_id, e);
        }
        debug!("registered {=str} as {=u16}", topic_name, topic_id);
        Ok(topic_id)
    }

    /// Publish `payload` on a registered topic id.
    ///
    /// At QoS 0 the message is sent with message id 0 and `true` is returned
    /// immediately. At QoS 1 the call waits for the first MQTT-SN reply: a
    /// PUBACK for this message yields `true`, any other message yields
    /// `false`. PUBACKs for other message ids and non MQTT-SN traffic are
    /// skipped. In strict mode a rejecting PUBACK also yields `false`.
    ///
    /// # Errors
    ///
    /// * [`ProtocolError::UnsupportedQoS`] - QoS 2 or QoS -1
    /// * [`ProtocolError::NotConnected`] - no session is open
    /// * [`ProtocolError::Timeout`] - no reply within the acknowledgement timeout
    /// * [`ProtocolError::TransportFailure`] - the link failed
    pub fn publish(&mut self, topic_id: u16, payload: &[u8], qos: QoS) -> Result<bool, ProtocolError> {
        if !matches!(qos, QoS::AtMostOnce | QoS::AtLeastOnce) {
            return Err(ProtocolError::UnsupportedQoS(qos));
        }
        self.ensure_connected()?;
        self.prepare()?;

        let message_id = match qos {
            QoS::AtMostOnce => 0,
            _ => self.next_message_id(),
        };
        self.send(&Message::Publish {
            flags: Flags::with_qos(qos),
            topic_id,
            message_id,
            payload,
        })?;
        if qos == QoS::AtMostOnce {
            return Ok(true);
        }

        let deadline = self.deadline();
        let len = self.await_reply(deadline, |message| match *message {
            Message::PubAck { message_id: id, .. } if id != message_id => {
                Err(Discarded::StaleAck { message_id: id })
            }
            _ => Ok(()),
        })?;

        match decode(&self.rx[..len])? {
            Message::PubAck { return_code, .. } => {
                if self.options.strict_return_codes && !return_code.is_accepted() {
                    warn!("PUBACK rejected: {}", return_code);
                    return Ok(false);
                }
                Ok(true)
            }
            other => {
                debug!("expected PUBACK, got {=str}", other.message_type().name());
                Ok(false)
            }
        }
    }

    /// Subscribe to a topic name or filter at QoS 0 or 1.
    ///
    /// Returns the topic id from the SUBACK. For topic names without
    /// wildcards a non-zero id is recorded in the registry.
    ///
    /// # Errors
    ///
    /// * [`ProtocolError::UnsupportedQoS`] - QoS 2 or QoS -1
    /// * [`ProtocolError::NotConnected`] - no session is open
    /// * [`ProtocolError::Timeout`] - no SUBACK within the acknowledgement timeout
    /// * [`ProtocolError::NotAcknowledged`] - rejected, strict mode only
    /// * [`ProtocolError::TransportFailure`] - the link failed
    pub fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<u16, ProtocolError> {
        if !matches!(qos, QoS::AtMostOnce | QoS::AtLeastOnce) {
            return Err(ProtocolError::UnsupportedQoS(qos));
        }
        self.ensure_connected()?;
        self.prepare()?;

        let message_id = self.next_message_id();
        self.send(&Message::Subscribe {
            flags: Flags {
                topic_id_type: TopicIdType::Normal,
                ..Flags::with_qos(qos)
            },
            message_id,
            topic,
        })?;

        let deadline = self.deadline();
        let len = self.await_reply(deadline, |message| match *message {
            Message::SubAck { message_id: id, .. } if id == message_id => Ok(()),
            Message::SubAck { message_id: id, .. } => Err(Discarded::StaleAck { message_id: id }),
            ref other => Err(Discarded::Unexpected(other.message_type())),
        })?;

        let Message::SubAck {
            topic_id,
            return_code,
            ..
        } = decode(&self.rx[..len])?
        else {
            return Err(CodecError::MalformedPacket.into());
        };
        self.check(return_code)?;
        if topic_id != 0 && !is_wildcard(topic) {
            self.topics.insert(topic, topic_id)?;
        }
        Ok(topic_id)
    }

    /// Cancel a subscription.
    ///
    /// # Errors
    ///
    /// * [`ProtocolError::NotConnected`] - no session is open
    /// * [`ProtocolError::Timeout`] - no UNSUBACK within the acknowledgement timeout
    /// * [`ProtocolError::NotAcknowledged`] - rejected, strict mode only
    /// * [`ProtocolError::TransportFailure`] - the link failed
    pub fn unsubscribe(&mut self, topic: &str) -> Result<(), ProtocolError> {
        self.ensure_connected()?;
        self.prepare()?;

        let message_id = self.next_message_id();
        self.send(&Message::Unsubscribe {
            flags: Flags::with_qos(QoS::AtMostOnce),
            message_id,
            topic,
        })?;

        let deadline = self.deadline();
        let len = self.await_reply(deadline, |message| match *message {
            Message::UnsubAck { message_id: id, .. } if id == message_id => Ok(()),
            Message::UnsubAck { message_id: id, .. } => {
                Err(Discarded::StaleAck { message_id: id })
            }
            ref other => Err(Discarded::Unexpected(other.message_type())),
        })?;

        if let Some(code) = decode(&self.rx[..len])?.return_code() {
            self.check(code)?;
        }
        Ok(())
    }

    /// Send PINGREQ carrying the client id and wait for PINGRESP.
    ///
    /// # Errors
    ///
    /// * [`ProtocolError::NotConnected`] - no session is open
    /// * [`ProtocolError::Timeout`] - no PINGRESP within the acknowledgement timeout
    /// * [`ProtocolError::TransportFailure`] - the link failed
    pub fn ping(&mut self) -> Result<(), ProtocolError> {
        self.ensure_connected()?;
        self.prepare()?;

        let client_id = self.client_id.clone();
        self.send(&Message::PingReq {
            client_id: Some(client_id.as_str()),
        })?;

        let deadline = self.deadline();
        self.await_reply(deadline, |message| match message {
            Message::PingResp => Ok(()),
            other => Err(Discarded::Unexpected(other.message_type())),
        })?;
        Ok(())
    }

    /// Handle at most one queued inbound packet without blocking.
    ///
    /// PUBLISH is returned to the caller, after a PUBACK when it arrived at
    /// QoS 1. A gateway REGISTER is recorded and answered with REGACK, a
    /// gateway PINGREQ with PINGRESP, and a gateway DISCONNECT ends the
    /// session. Everything else is dropped.
    ///
    /// # Errors
    ///
    /// * [`ProtocolError::TransportFailure`] - the link failed
    pub fn poll(&mut self) -> Result<Option<Publication<'_>>, ProtocolError> {
        let len = match self.transport.receive(&mut self.rx) {
            Ok(Some(len)) => len.min(N),
            Ok(None) => return Ok(None),
            Err(_) => {
                self.state = State::Disconnected;
                return Err(ProtocolError::TransportFailure(TransportError::ReadError));
            }
        };

        let frame = &self.rx[..len];
        let message = match decode(frame) {
            Ok(message) => message,
            Err(e) => {
                if let Some(hook) = self.on_discard {
                    hook(frame, Discarded::Undecodable(e));
                }
                return Ok(None);
            }
        };
        trace!("received {=str}", message.message_type().name());

        let reply = match message {
            Message::Publish {
                flags,
                topic_id,
                message_id,
                payload,
            } => {
                if flags.qos == QoS::AtLeastOnce {
                    let ack = Message::PubAck {
                        topic_id,
                        message_id,
                        return_code: ReturnCode::Accepted,
                    };
                    if let Err(e) = transmit(&mut self.transport, &mut self.tx, &ack) {
                        self.state = State::Disconnected;
                        return Err(e);
                    }
                }
                return Ok(Some(Publication {
                    topic_id,
                    topic_name: self.topics.topic_name(topic_id),
                    message_id,
                    payload,
                    qos: flags.qos,
                    retain: flags.retain,
                    dup: flags.dup,
                }));
            }
            Message::Register {
                topic_id,
                message_id,
                topic_name,
            } => {
                let return_code = match self.topics.insert(topic_name, topic_id) {
                    Ok(()) => ReturnCode::Accepted,
                    Err(e) => {
                        warn!("cannot record gateway topic: {}", e);
                        ReturnCode::Congestion
                    }
                };
                Message::RegAck {
                    topic_id,
                    message_id,
                    return_code,
                }
            }
            Message::PingReq { .. } => Message::PingResp,
            Message::Disconnect { .. } => {
                info!("gateway closed the session");
                self.state = State::Disconnected;
                return Ok(None);
            }
            other => {
                if let Some(hook) = self.on_discard {
                    hook(frame, Discarded::Unexpected(other.message_type()));
                }
                return Ok(None);
            }
        };

        if let Err(e) = transmit(&mut self.transport, &mut self.tx, &reply) {
            self.state = State::Disconnected;
            return Err(e);
        }
        Ok(None)
    }

    /// Drop every inbound packet currently queued. Returns how many were dropped.
    ///
    /// # Errors
    ///
    /// * [`ProtocolError::TransportFailure`] - the link failed
    pub fn drain(&mut self) -> Result<usize, ProtocolError> {
        let dropped = drain(&mut self.transport, &mut self.rx).map_err(|e| self.fail(e.into()))?;
        if dropped > 0 {
            debug!("drained {=usize} stale packets", dropped);
        }
        Ok(dropped)
    }

    /// End the session.
    ///
    /// DISCONNECT carries the configured sleep duration, if any. Without one
    /// the packet is the bare `[0x02, 0x18]`; clients that always append a
    /// duration field (commonly 30) put different bytes on the wire, and
    /// gateways treat a duration as a request to sleep. No reply is
    /// awaited and the session is [`State::Disconnected`] afterwards even if
    /// sending failed; the failure is still reported.
    ///
    /// # Errors
    ///
    /// * [`ProtocolError::TransportFailure`] - the link failed
    pub fn disconnect(&mut self) -> Result<(), ProtocolError> {
        let result = self.send(&Message::Disconnect {
            duration: self.options.sleep_duration,
        });
        self.state = State::Disconnected;
        info!("disconnected");
        result
    }

    fn next_message_id(&mut self) -> u16 {
        let id = self.next_message_id;
        self.next_message_id = match id.wrapping_add(1) {
            0 => 1,
            next => next,
        };
        id
    }

    fn ensure_connected(&self) -> Result<(), ProtocolError> {
        match self.state {
            State::Connected => Ok(()),
            _ => Err(ProtocolError::NotConnected),
        }
    }

    fn prepare(&mut self) -> Result<(), ProtocolError> {
        if self.options.drain_before_request {
            self.drain()?;
        }
        Ok(())
    }

    fn check(&self, code: ReturnCode) -> Result<ReturnCode, ProtocolError> {
        if code.is_accepted() {
            return Ok(code);
        }
        warn!("gateway returned {}", code);
        if self.options.strict_return_codes {
            return Err(ProtocolError::NotAcknowledged(code));
        }
        Ok(code)
    }

    fn fail(&mut self, error: ProtocolError) -> ProtocolError {
        if let ProtocolError::TransportFailure(_) = error {
            warn!("transport failure, session closed");
            self.state = State::Disconnected;
        }
        error
    }

    fn send(&mut self, message: &Message<'_>) -> Result<(), ProtocolError> {
        transmit(&mut self.transport, &mut self.tx, message).map_err(|e| self.fail(e))
    }

    fn deadline(&self) -> Option<Duration> {
        self.options
            .ack_timeout()
            .map(|timeout| self.clock.now().saturating_add(timeout))
    }

    fn await_reply<F>(&mut self, deadline: Option<Duration>, mut accept: F) -> Result<usize, ProtocolError>
    where
        F: FnMut(&Message<'_>) -> Result<(), Discarded>,
    {
        let timeout = deadline.map(|deadline| deadline.saturating_sub(self.clock.now()));
        let on_discard = self.on_discard;
        let result = receive_matching(
            &mut self.transport,
            &self.clock,
            &mut self.rx,
            timeout,
            |frame| {
                let verdict = match decode(frame) {
                    Ok(message) => accept(&message),
                    Err(e) => Err(Discarded::Undecodable(e)),
                };
                match verdict {
                    Ok(()) => true,
                    Err(reason) => {
                        trace!("dropped inbound packet of {=usize} bytes", frame.len());
                        if let Some(hook) = on_discard {
                            hook(frame, reason);
                        }
                        false
                    }
                }
            },
        );
        result.map_err(|e| {
            if e == TransportError::Timeout {
                warn!("timed out waiting for acknowledgement");
            }
            self.fail(e.into())
        })
    }
}
