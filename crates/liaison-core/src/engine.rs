//! Generic protocol engine contract.
//!
//! # Architecture: Action-Based State Machine
//!
//! Engines follow the action pattern:
//! - Methods take the current session by reference and never mutate it
//! - Methods return a [`StateUpdate`] holding a fresh session value
//! - The driver persists the session, routes the messages, publishes events
//!
//! This keeps every engine a pure function of (session, input), so the same
//! code runs against a real store and network or against a simulation that
//! reorders, delays and duplicates deliveries.

use liaison_proto::{Dictionary, GroupId, ProtocolError, SessionId};

use crate::error::EngineError;

/// An outgoing message and the channel it must be sent on.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<M> {
    /// Destination channel
    pub channel: GroupId,
    /// Message to deliver
    pub message: M,
}

/// Result of one engine invocation.
///
/// Messages are ordered as the engine produced them, but the driver only
/// needs to preserve that order per channel; nothing depends on ordering
/// across channels.
#[derive(Debug, Clone, PartialEq)]
pub struct StateUpdate<S, M, E> {
    /// New session value (possibly equal to the old one)
    pub state: S,
    /// Messages to send
    pub messages: Vec<Envelope<M>>,
    /// Events to publish
    pub events: Vec<E>,
    /// The driver may drop the inbound message from its own storage
    pub delete_message: bool,
    /// The driver should delete the session instead of persisting it
    pub delete_state: bool,
}

impl<S, M, E> StateUpdate<S, M, E> {
    /// An update carrying `state` and no outputs.
    pub fn new(state: S) -> Self {
        Self { state, messages: Vec::new(), events: Vec::new(), delete_message: false, delete_state: false }
    }

    /// Append an outgoing message.
    #[must_use]
    pub fn with_message(mut self, channel: GroupId, message: M) -> Self {
        self.messages.push(Envelope { channel, message });
        self
    }

    /// Append an event.
    #[must_use]
    pub fn with_event(mut self, event: E) -> Self {
        self.events.push(event);
        self
    }

    /// Whether the update carries no messages and no events.
    pub fn is_silent(&self) -> bool {
        self.messages.is_empty() && self.events.is_empty()
    }
}

/// Shorthand for the update type produced by engine `P`.
pub type EngineUpdate<P> = StateUpdate<
    <P as ProtocolEngine>::State,
    <P as ProtocolEngine>::Message,
    <P as ProtocolEngine>::Event,
>;

/// A protocol engine: a pure transition function driven by a substrate.
///
/// Implementations must not perform I/O, block, or keep per-session state of
/// their own. The substrate guarantees that at most one call per session is
/// in flight.
///
/// Malformed or out-of-sequence peer input is a protocol error and must be
/// handled inside the engine (typically by aborting the session). `Err` is
/// reserved for programming errors: inputs outside the documented contract.
pub trait ProtocolEngine: Sized {
    /// Requests issued by the local user.
    type LocalAction;
    /// Messages exchanged with peers.
    type Message;
    /// Persisted per-session state.
    type State;
    /// Notifications for the rest of the application.
    type Event;

    /// Apply a local user action.
    fn on_local_action(
        &self,
        state: &Self::State,
        action: Self::LocalAction,
    ) -> Result<EngineUpdate<Self>, EngineError>;

    /// Apply a message received from a peer.
    fn on_message_received(
        &self,
        state: &Self::State,
        message: &Self::Message,
    ) -> Result<EngineUpdate<Self>, EngineError>;

    /// Note that an outgoing message was handed to the transport.
    fn on_message_delivered(
        &self,
        state: &Self::State,
        delivered: &Self::Message,
    ) -> Result<EngineUpdate<Self>, EngineError>;
}

/// Session state that can cross the storage boundary.
///
/// Engines work on typed state; stores only see dictionaries.
pub trait SessionState: Clone + Sized {
    /// Key under which the session is stored.
    fn session_id(&self) -> SessionId;

    /// Serialize for the store.
    fn to_dictionary(&self) -> Dictionary;

    /// Deserialize from the store.
    fn from_dictionary(dict: &Dictionary) -> Result<Self, ProtocolError>;

    /// Whether the session ended in the error state.
    fn is_aborted(&self) -> bool;

    /// Whether the session can still make progress on the wire.
    fn is_live(&self) -> bool;
}
