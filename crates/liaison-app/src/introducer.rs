//! Introducer facade.

use liaison_core::{
    Environment, Introducee, IntroducerEngine, IntroducerSession, IntroductionEvent, LocalAction,
    SessionState,
};
use liaison_proto::{Dictionary, GroupId, SessionId};
use tracing::{info, warn};

use crate::{
    config::RuntimeConfig,
    error::RuntimeError,
    router::{ChannelRouter, EventSink},
    runtime::Runtime,
    store::SessionStore,
};

/// Starts and drives introductions on behalf of the local user.
///
/// Session ids come from the environment, so a seeded environment gives a
/// reproducible run.
pub struct Introducer<Env, S, R, K> {
    env: Env,
    runtime: Runtime<IntroducerEngine, S, R, K>,
}

impl<Env, S, R, K> Introducer<Env, S, R, K>
where
    Env: Environment,
    S: SessionStore,
    R: ChannelRouter,
    K: EventSink<IntroductionEvent>,
{
    /// Create a facade over a fresh runtime.
    pub fn new(env: Env, store: S, router: R, sink: K, config: RuntimeConfig) -> Self {
        Self { env, runtime: Runtime::new(IntroducerEngine::new(), store, router, sink, config) }
    }

    /// Whether the two contacts can be introduced now.
    ///
    /// False while a live session exists for the same pair of channels, in
    /// either order.
    pub fn can_introduce(&self, a: &GroupId, b: &GroupId) -> Result<bool, RuntimeError> {
        Ok(self.live_session_for(a, b)?.is_none())
    }

    /// Start an introduction and send both requests.
    ///
    /// # Errors
    ///
    /// - `RuntimeError::AlreadyIntroducing` if a live session exists for the
    ///   same pair
    /// - `RuntimeError::Engine` if both contacts share a channel
    pub fn introduce(
        &mut self,
        first: Introducee,
        second: Introducee,
        public_key_1: Vec<u8>,
        public_key_2: Vec<u8>,
        note: Option<String>,
    ) -> Result<SessionId, RuntimeError> {
        if let Some(existing) = self.live_session_for(&first.group_id, &second.group_id)? {
            warn!(
                existing = %existing.short(),
                first = %first.contact_id,
                second = %second.contact_id,
                "refusing duplicate introduction"
            );
            return Err(RuntimeError::AlreadyIntroducing(existing));
        }

        let id = SessionId::new(self.env.random_id());
        info!(session = %id.short(), first = %first.contact_id, second = %second.contact_id, "introducing");

        let session = IntroducerSession::new(id, first, second)?;
        self.runtime.create_session(session, LocalAction::Request { public_key_1, public_key_2, note })?;
        Ok(id)
    }

    /// Abandon an introduction.
    pub fn abort(&mut self, id: SessionId) -> Result<IntroducerSession, RuntimeError> {
        self.runtime.local_action(id, LocalAction::Abort)
    }

    /// Apply a local action given in dictionary form.
    pub fn local_action(&mut self, id: SessionId, action: &Dictionary) -> Result<IntroducerSession, RuntimeError> {
        let action = LocalAction::from_dictionary(action)?;
        self.runtime.local_action(id, action)
    }

    /// Apply a message received from a contact.
    pub fn receive(&mut self, message: &Dictionary) -> Result<IntroducerSession, RuntimeError> {
        self.runtime.receive(message)
    }

    /// Decode and apply a message received from a contact.
    pub fn receive_bytes(&mut self, bytes: &[u8]) -> Result<IntroducerSession, RuntimeError> {
        self.runtime.receive_bytes(bytes)
    }

    /// Note that a message reached the transport.
    pub fn delivered(&mut self, message: &Dictionary) -> Result<IntroducerSession, RuntimeError> {
        self.runtime.delivered(message)
    }

    /// Load a session.
    pub fn session(&self, id: &SessionId) -> Result<Option<IntroducerSession>, RuntimeError> {
        self.runtime.session(id)
    }

    /// The environment.
    pub fn env(&self) -> &Env {
        &self.env
    }

    /// The underlying runtime.
    pub fn runtime(&self) -> &Runtime<IntroducerEngine, S, R, K> {
        &self.runtime
    }

    /// The underlying runtime, mutably.
    pub fn runtime_mut(&mut self) -> &mut Runtime<IntroducerEngine, S, R, K> {
        &mut self.runtime
    }

    fn live_session_for(&self, a: &GroupId, b: &GroupId) -> Result<Option<SessionId>, RuntimeError> {
        Ok(self
            .runtime
            .sessions()?
            .into_iter()
            .find(|s| s.is_live() && s.introduces(a, b))
            .map(|s| s.session_id()))
    }
}
