//! Generic runtime driving a protocol engine.
//!
//! The runtime owns the store, router and sink and performs every side
//! effect the engine describes, in a fixed order:
//!
//! ```text
//! load session ──> engine ──> persist / delete ──> route messages ──> publish events
//! ```
//!
//! Every call takes `&mut self`, so calls for one session are serialized by
//! construction. If routing fails the stored session is put back the way it
//! was, so the inbound message can be redelivered and applied again.

use liaison_core::{EngineError, EngineUpdate, ProtocolEngine, SessionState, StateUpdate};
use liaison_proto::{Dictionary, SessionId, decode_dictionary, keys};
use tracing::{debug, trace, warn};

use crate::{
    config::{RetentionPolicy, RuntimeConfig},
    error::RuntimeError,
    router::{ChannelRouter, EventSink},
    store::SessionStore,
};

/// Drives engine `E` against store `S`, router `R` and event sink `K`.
pub struct Runtime<E, S, R, K> {
    engine: E,
    store: S,
    router: R,
    sink: K,
    config: RuntimeConfig,
}

impl<E, S, R, K> Runtime<E, S, R, K>
where
    E: ProtocolEngine<Message = Dictionary>,
    E::State: SessionState,
    S: SessionStore,
    R: ChannelRouter,
    K: EventSink<E::Event>,
{
    /// Create a runtime.
    pub fn new(engine: E, store: S, router: R, sink: K, config: RuntimeConfig) -> Self {
        Self { engine, store, router, sink, config }
    }

    /// Store a new session after applying its first local action.
    ///
    /// The session is never persisted in its pre-action state.
    ///
    /// # Errors
    ///
    /// - `RuntimeError::DuplicateSession` if the id is taken
    /// - `RuntimeError::Engine` if the engine rejects the action
    pub fn create_session(&mut self, session: E::State, action: E::LocalAction) -> Result<E::State, RuntimeError> {
        let id = session.session_id();
        if self.store.get(&id).map_err(RuntimeError::store)?.is_some() {
            return Err(RuntimeError::DuplicateSession(id));
        }

        debug!(session = %id.short(), "creating session");
        let update = self.engine.on_local_action(&session, action)?;
        self.apply(id, update)
    }

    /// Apply a local action to a stored session.
    pub fn local_action(&mut self, id: SessionId, action: E::LocalAction) -> Result<E::State, RuntimeError> {
        let session = self.load(&id)?;
        let update = self.engine.on_local_action(&session, action)?;
        self.apply(id, update)
    }

    /// Apply an inbound message to the session it names.
    ///
    /// # Errors
    ///
    /// - `RuntimeError::Protocol` if the message has no usable session id
    /// - `RuntimeError::UnknownSession` if no such session is stored
    pub fn receive(&mut self, message: &Dictionary) -> Result<E::State, RuntimeError> {
        let id = message_session(message)?;
        let session = self.load(&id)?;
        let update = self.engine.on_message_received(&session, message)?;
        self.apply(id, update)
    }

    /// Decode an inbound message and apply it.
    ///
    /// # Errors
    ///
    /// - `RuntimeError::Protocol` if the bytes exceed
    ///   [`RuntimeConfig::max_message_size`] or do not decode
    pub fn receive_bytes(&mut self, bytes: &[u8]) -> Result<E::State, RuntimeError> {
        let message = decode_dictionary(bytes, self.config.max_message_size)?;
        self.receive(&message)
    }

    /// Note that an outgoing message reached the transport.
    pub fn delivered(&mut self, message: &Dictionary) -> Result<E::State, RuntimeError> {
        let id = message_session(message)?;
        let session = self.load(&id)?;
        let update = self.engine.on_message_delivered(&session, message)?;
        self.apply(id, update)
    }

    /// Load a session, if stored.
    pub fn session(&self, id: &SessionId) -> Result<Option<E::State>, RuntimeError> {
        self.store
            .get(id)
            .map_err(RuntimeError::store)?
            .map(|dict| {
                E::State::from_dictionary(&dict)
                    .map_err(|e| RuntimeError::Engine(EngineError::CorruptSession(e)))
            })
            .transpose()
    }

    /// Load every stored session.
    pub fn sessions(&self) -> Result<Vec<E::State>, RuntimeError> {
        let ids = self.store.sessions().map_err(RuntimeError::store)?;
        let mut sessions = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(session) = self.session(&id)? {
                sessions.push(session);
            }
        }
        Ok(sessions)
    }

    /// The engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The session store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The router.
    pub fn router(&self) -> &R {
        &self.router
    }

    /// The router, mutably.
    pub fn router_mut(&mut self) -> &mut R {
        &mut self.router
    }

    /// The event sink.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// The event sink, mutably.
    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    /// The configuration.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    fn load(&self, id: &SessionId) -> Result<E::State, RuntimeError> {
        self.session(id)?.ok_or_else(|| {
            warn!(session = %id.short(), "no such session");
            RuntimeError::UnknownSession(*id)
        })
    }

    fn apply(&mut self, id: SessionId, update: EngineUpdate<E>) -> Result<E::State, RuntimeError> {
        let StateUpdate { state, messages, events, delete_message, delete_state } = update;

        // Kept so a routing failure leaves the store as it was before this call.
        let previous = self.store.get(&id).map_err(RuntimeError::store)?;

        let drop_session =
            delete_state || (self.config.retention == RetentionPolicy::DropAborted && state.is_aborted());
        if drop_session {
            debug!(session = %id.short(), "deleting session");
            self.store.delete(&id).map_err(RuntimeError::store)?;
        } else {
            self.store.put(id, &state.to_dictionary()).map_err(RuntimeError::store)?;
        }

        trace!(
            session = %id.short(),
            messages = messages.len(),
            events = events.len(),
            delete_message,
            "applying update"
        );

        for envelope in messages {
            if let Err(e) = self.router.route(envelope.channel, envelope.message) {
                warn!(session = %id.short(), channel = %envelope.channel.short(), "routing failed, restoring session");
                self.restore(id, previous.as_ref())?;
                return Err(RuntimeError::router(e));
            }
        }
        for event in events {
            self.sink.publish(event);
        }

        Ok(state)
    }

    fn restore(&mut self, id: SessionId, previous: Option<&Dictionary>) -> Result<(), RuntimeError> {
        match previous {
            Some(dict) => self.store.put(id, dict).map_err(RuntimeError::store),
            None => self.store.delete(&id).map(|_| ()).map_err(RuntimeError::store),
        }
    }
}

fn message_session(message: &Dictionary) -> Result<SessionId, RuntimeError> {
    Ok(SessionId::from_slice(message.get_raw(keys::SESSION_ID)?)?)
}
