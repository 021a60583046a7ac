//! # Application Layer Network Protocols
//!
//! Protocol implementations built on the transport traits of
//! [`network`](crate::network).
//!
//! ## Available Protocols
//!
//! - **[`mqttsn`]**: MQTT-SN client for sensor networks
//!
//! ## Design Principles
//!
//! - **Transport Agnostic**: Work with any type implementing
//!   [`Transport`](crate::network::Transport)
//! - **No-std Compatible**: No heap allocation, fixed-size buffers
//! - **Error Handling**: Typed errors for every failure, no panics

pub mod mqttsn;
