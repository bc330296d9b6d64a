//! Introducer engine.
//!
//! The engine is stateless; every method clones the session it is handed,
//! applies one input and returns the result. Peer input that does not fit the
//! current state aborts the session. `Err` only comes back for calls outside
//! the engine contract.

use liaison_proto::{
    Abort, Ack, Dictionary, GroupId, MessageHeader, MessageType, ProtocolError, Request, Response, keys,
};
use tracing::{debug, info, warn};

use super::{
    action::{IntroducerAction, Side},
    event::{IntroductionEvent, IntroductionResponse},
    local::LocalAction,
    session::IntroducerSession,
    state::IntroducerState,
};
use crate::{
    engine::{EngineUpdate, ProtocolEngine, StateUpdate},
    error::EngineError,
};

type Update = EngineUpdate<IntroducerEngine>;

/// The introducer's protocol engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntroducerEngine;

impl IntroducerEngine {
    /// Create an engine.
    pub const fn new() -> Self {
        Self
    }

    fn send_requests(
        &self,
        session: &IntroducerSession,
        public_key_1: &[u8],
        public_key_2: &[u8],
        note: Option<&str>,
    ) -> Update {
        let next = session.state.next(IntroducerAction::LocalRequest);
        if next == IntroducerState::Error {
            warn!(
                session = %session.session_id.short(),
                state = session.state.name(),
                "ignoring introduction request for a session that already started"
            );
            return StateUpdate::new(session.clone());
        }

        // Each contact learns the other's name and key.
        let request_1 = Request {
            session_id: session.session_id,
            group_id: session.first.group_id,
            name: session.second.name.clone(),
            public_key: public_key_2.to_vec(),
            note: note.map(str::to_string),
        };
        let request_2 = Request {
            session_id: session.session_id,
            group_id: session.second.group_id,
            name: session.first.name.clone(),
            public_key: public_key_1.to_vec(),
            note: note.map(str::to_string),
        };

        let mut updated = session.clone();
        updated.state = next;

        info!(
            session = %session.session_id.short(),
            first = %session.first.contact_id,
            second = %session.second.contact_id,
            "sending introduction requests"
        );

        StateUpdate::new(updated)
            .with_message(request_1.group_id, request_1.to_dictionary())
            .with_message(request_2.group_id, request_2.to_dictionary())
    }

    /// Move to [`IntroducerState::Error`] and tell both contacts.
    fn abort(&self, session: &IntroducerSession, reason: &str) -> Update {
        warn!(
            session = %session.session_id.short(),
            state = session.state.name(),
            reason,
            "aborting introduction"
        );

        let mut updated = session.clone();
        updated.state = IntroducerState::Error;

        let abort_1 = Abort { session_id: session.session_id, group_id: session.first.group_id };
        let abort_2 = Abort { session_id: session.session_id, group_id: session.second.group_id };

        StateUpdate::new(updated)
            .with_message(abort_1.group_id, abort_1.to_dictionary())
            .with_message(abort_2.group_id, abort_2.to_dictionary())
    }

    /// Abort unless already aborted.
    fn reject(&self, session: &IntroducerSession, reason: &str) -> Update {
        if session.state == IntroducerState::Error {
            debug!(session = %session.session_id.short(), reason, "ignoring input for aborted session");
            return StateUpdate::new(session.clone());
        }
        self.abort(session, reason)
    }

    fn reject_malformed(&self, session: &IntroducerSession, error: &ProtocolError) -> Update {
        self.reject(session, &format!("malformed message: {error}"))
    }

    /// Copy the inbound dictionary, pointed at the other contact's channel.
    fn forward(session: &IntroducerSession, from: Side, message: &Dictionary) -> (GroupId, Dictionary) {
        let target = session.contact(from.other()).group_id;
        let forwarded = message.clone().with(keys::GROUP_ID, target.to_vec());
        (target, forwarded)
    }

    fn response_event(session: &IntroducerSession, from: Side, response: &Response) -> IntroductionEvent {
        let sender = session.contact(from);
        IntroductionEvent::ResponseReceived {
            contact_id: sender.contact_id,
            response: IntroductionResponse {
                session_id: session.session_id,
                message_id: response.message_id,
                timestamp: response.timestamp,
                author_id: sender.author_id,
                name: session.contact(from.other()).name.clone(),
                accept: response.accept,
            },
        }
    }

    fn on_response(&self, session: &IntroducerSession, from: Side, message: &Dictionary) -> Update {
        let response = match Response::from_dictionary(message) {
            Ok(response) => response,
            Err(e) => return self.reject_malformed(session, &e),
        };

        let action = IntroducerAction::response(from, response.accept);
        let next = session.state.next(action);
        if next == IntroducerState::Error {
            return self.reject(session, action.name());
        }

        debug!(
            session = %session.session_id.short(),
            from = from.name(),
            accept = response.accept,
            state = session.state.name(),
            next = next.name(),
            "relaying response"
        );

        let mut updated = session.clone();
        updated.state = next;
        updated.set_response(from, response.message_id);

        let (target, forwarded) = Self::forward(session, from, message);
        let event = Self::response_event(session, from, &response);
        StateUpdate::new(updated).with_message(target, forwarded).with_event(event)
    }

    fn on_ack(&self, session: &IntroducerSession, from: Side, next: IntroducerState, message: &Dictionary) -> Update {
        if let Err(e) = Ack::from_dictionary(message) {
            return self.reject_malformed(session, &e);
        }

        debug!(
            session = %session.session_id.short(),
            from = from.name(),
            state = session.state.name(),
            next = next.name(),
            "relaying ack"
        );

        let mut updated = session.clone();
        updated.state = next;

        let (target, forwarded) = Self::forward(session, from, message);
        StateUpdate::new(updated).with_message(target, forwarded)
    }

    /// A response arriving after both acks. Stored once, surfaced, not relayed.
    fn on_late_response(&self, session: &IntroducerSession, from: Side, message: &Dictionary) -> Update {
        let response = match Response::from_dictionary(message) {
            Ok(response) => response,
            Err(e) => return self.reject_malformed(session, &e),
        };

        debug!(
            session = %session.session_id.short(),
            from = from.name(),
            accept = response.accept,
            "response after finish"
        );

        let mut updated = session.clone();
        if updated.response(from).is_none() {
            updated.set_response(from, response.message_id);
        }

        let event = Self::response_event(session, from, &response);
        StateUpdate::new(updated).with_event(event)
    }
}

impl ProtocolEngine for IntroducerEngine {
    type LocalAction = LocalAction;
    type Message = Dictionary;
    type State = IntroducerSession;
    type Event = IntroductionEvent;

    fn on_local_action(&self, state: &IntroducerSession, action: LocalAction) -> Result<Update, EngineError> {
        match action {
            LocalAction::Request { public_key_1, public_key_2, note } => {
                Ok(self.send_requests(state, &public_key_1, &public_key_2, note.as_deref()))
            },
            LocalAction::Abort => {
                if state.state == IntroducerState::Error {
                    debug!(session = %state.session_id.short(), "session already aborted");
                    return Ok(StateUpdate::new(state.clone()));
                }
                Ok(self.abort(state, IntroducerAction::LocalAbort.name()))
            },
        }
    }

    fn on_message_received(&self, state: &IntroducerSession, message: &Dictionary) -> Result<Update, EngineError> {
        let header = match MessageHeader::parse(message) {
            Ok(header) => header,
            Err(e) => return Ok(self.reject_malformed(state, &e)),
        };

        if header.session_id != state.session_id {
            return Ok(self.reject(state, "message for another session"));
        }

        let Some(from) = state.side_of(&header.group_id) else {
            return Ok(self.reject(state, "message on unknown channel"));
        };

        let action = IntroducerAction::remote(header.kind, from);
        let next = state.state.next(action);
        if next == IntroducerState::Error {
            return Ok(self.reject(state, action.name()));
        }

        match (state.state, header.kind) {
            (s, MessageType::Response) if s.awaits_response() => Ok(self.on_response(state, from, message)),
            (s, MessageType::Ack) if s.awaits_ack() => Ok(self.on_ack(state, from, next, message)),
            (IntroducerState::Finished, MessageType::Response) => Ok(self.on_late_response(state, from, message)),
            (s, _) => Err(EngineError::InconsistentState { state: s.name(), action: action.name() }),
        }
    }

    fn on_message_delivered(&self, state: &IntroducerSession, _delivered: &Dictionary) -> Result<Update, EngineError> {
        Ok(StateUpdate::new(state.clone()))
    }
}
