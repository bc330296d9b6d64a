//! Session persistence.

use std::collections::BTreeMap;

use liaison_proto::{Dictionary, ProtocolError, SessionId, decode_dictionary, encode_dictionary};

/// Keyed storage for session dictionaries.
///
/// The runtime reads a session before every engine call and writes (or
/// deletes) it afterwards. Implementations decide durability.
pub trait SessionStore {
    /// Store-specific error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load a session.
    fn get(&self, id: &SessionId) -> Result<Option<Dictionary>, Self::Error>;

    /// Insert or replace a session.
    fn put(&mut self, id: SessionId, session: &Dictionary) -> Result<(), Self::Error>;

    /// Remove a session, returning whether it existed.
    fn delete(&mut self, id: &SessionId) -> Result<bool, Self::Error>;

    /// Ids of every stored session.
    fn sessions(&self) -> Result<Vec<SessionId>, Self::Error>;
}

/// In-memory store keeping sessions in their encoded form.
///
/// Encoding on every write means a session only survives if it round-trips
/// through the codec, the same as with a durable store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    sessions: BTreeMap<SessionId, Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Encoded form of a session.
    pub fn raw(&self, id: &SessionId) -> Option<&[u8]> {
        self.sessions.get(id).map(Vec::as_slice)
    }
}

impl SessionStore for MemoryStore {
    type Error = ProtocolError;

    fn get(&self, id: &SessionId) -> Result<Option<Dictionary>, ProtocolError> {
        self.sessions.get(id).map(|bytes| decode_dictionary(bytes, bytes.len())).transpose()
    }

    fn put(&mut self, id: SessionId, session: &Dictionary) -> Result<(), ProtocolError> {
        let bytes = encode_dictionary(session)?;
        self.sessions.insert(id, bytes);
        Ok(())
    }

    fn delete(&mut self, id: &SessionId) -> Result<bool, ProtocolError> {
        Ok(self.sessions.remove(id).is_some())
    }

    fn sessions(&self) -> Result<Vec<SessionId>, ProtocolError> {
        Ok(self.sessions.keys().copied().collect())
    }
}
