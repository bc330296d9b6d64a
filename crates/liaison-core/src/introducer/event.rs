//! Events raised for the rest of the application.

use liaison_proto::{AuthorId, ContactId, MessageId, SessionId};

/// A contact's response, as shown to the local user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntroductionResponse {
    /// Session the response belongs to
    pub session_id: SessionId,
    /// Id of the response message
    pub message_id: MessageId,
    /// Sender timestamp in milliseconds
    pub timestamp: u64,
    /// Author id of the responding contact
    pub author_id: AuthorId,
    /// Name of the contact being introduced to the responder
    pub name: String,
    /// Whether the responder accepted
    pub accept: bool,
}

/// Notification raised by the introducer engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntroductionEvent {
    /// One of the contacts responded.
    ResponseReceived {
        /// Local contact id of the responder
        contact_id: ContactId,
        /// Response details
        response: IntroductionResponse,
    },
}

impl IntroductionEvent {
    /// Session the event belongs to.
    pub fn session_id(&self) -> SessionId {
        match self {
            Self::ResponseReceived { response, .. } => response.session_id,
        }
    }
}
