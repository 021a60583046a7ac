//! Topic name to topic id mappings for one session.

use super::error::ProtocolError;
use heapless::{FnvIndexMap, String};

/// Maximum number of registrations held per session.
pub const MAX_TOPICS: usize = 16;
/// Maximum topic name length in bytes.
pub const MAX_TOPIC_LEN: usize = 255;

/// Fixed-capacity registry of topic ids assigned by the gateway.
///
/// Entries are created by REGISTER/REGACK exchanges, gateway-initiated
/// REGISTERs and SUBACKs, and are cleared whenever a new session is
/// established. Registering a known name again overwrites its id.
#[derive(Debug, Default, Clone)]
pub struct TopicRegistry {
    entries: FnvIndexMap<String<MAX_TOPIC_LEN>, u16, MAX_TOPICS>,
}

impl TopicRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `name` maps to `topic_id`.
    ///
    /// # Errors
    ///
    /// * [`ProtocolError::TopicTooLong`] - `name` exceeds [`MAX_TOPIC_LEN`]
    /// * [`ProtocolError::TopicRegistryFull`] - `name` is new and no slot is free
    pub fn insert(&mut self, name: &str, topic_id: u16) -> Result<(), ProtocolError> {
        let key = String::try_from(name).map_err(|_| ProtocolError::TopicTooLong)?;
        self.entries
            .insert(key, topic_id)
            .map_err(|_| ProtocolError::TopicRegistryFull)?;
        Ok(())
    }

    /// The id registered for `name`.
    pub fn topic_id(&self, name: &str) -> Option<u16> {
        let key: String<MAX_TOPIC_LEN> = String::try_from(name).ok()?;
        self.entries.get(&key).copied()
    }

    /// The name registered under `topic_id`.
    pub fn topic_name(&self, topic_id: u16) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, id)| **id == topic_id)
            .map(|(name, _)| name.as_str())
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether `name` would need a free slot that does not exist.
    pub fn is_full_for(&self, name: &str) -> bool {
        self.entries.len() == MAX_TOPICS && self.topic_id(name).is_none()
    }

    /// Whether no topic has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every registration.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate over `(name, topic_id)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.entries.iter().map(|(name, id)| (name.as_str(), *id))
    }
}
