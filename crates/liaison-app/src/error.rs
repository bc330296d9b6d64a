//! Runtime error types.

use liaison_core::EngineError;
use liaison_proto::{ProtocolError, SessionId};
use thiserror::Error;

/// Boxed error from a store or router implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by the runtime and the introducer facade.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The engine rejected a call as outside its contract.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// An inbound message could not be decoded or lacks a session id.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The session store failed.
    #[error("store error: {0}")]
    Store(#[source] BoxError),

    /// The channel router failed.
    #[error("router error: {0}")]
    Router(#[source] BoxError),

    /// No session is stored under this id.
    #[error("unknown session {0}")]
    UnknownSession(SessionId),

    /// A session is already stored under this id.
    #[error("session {0} already exists")]
    DuplicateSession(SessionId),

    /// A live session already introduces the same pair of contacts.
    #[error("contacts are already being introduced in session {0}")]
    AlreadyIntroducing(SessionId),
}

impl RuntimeError {
    pub(crate) fn store(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Store(Box::new(error))
    }

    pub(crate) fn router(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Router(Box::new(error))
    }
}
