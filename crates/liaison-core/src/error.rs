//! Engine error types.
//!
//! These are programming errors: the substrate or UI handed the engine
//! something outside its input contract. Protocol errors caused by peers
//! never surface here; they abort the session instead.

use liaison_proto::ProtocolError;
use thiserror::Error;

/// Errors returned by protocol engines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A local action dictionary names an action the engine does not know.
    #[error("unknown local action type {0}")]
    UnknownLocalAction(i64),

    /// A local action dictionary is missing fields for its type.
    #[error("malformed local action: {0}")]
    MalformedLocalAction(#[source] ProtocolError),

    /// The engine reached a state/action combination it has no rule for.
    #[error("no handler for action {action} in state {state}")]
    InconsistentState {
        /// Current state name
        state: &'static str,
        /// Classified action name
        action: &'static str,
    },

    /// Session parameters violate an invariant.
    #[error("invalid session: {0}")]
    InvalidSession(String),

    /// A persisted session could not be read back.
    #[error("corrupt session: {0}")]
    CorruptSession(#[from] ProtocolError),
}
