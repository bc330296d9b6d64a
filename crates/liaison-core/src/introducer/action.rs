//! Protocol actions.
//!
//! Actions are derived from inputs, never stored. Remote actions carry the
//! side that sent the message, determined by matching the message's channel
//! against the session's two channels.

use liaison_proto::MessageType;

/// One of the two introduced contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The contact on `groupId1`
    First,
    /// The contact on `groupId2`
    Second,
}

impl Side {
    /// The other contact.
    pub const fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    /// Name used in log lines.
    pub const fn name(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
        }
    }
}

/// Input classified for the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntroducerAction {
    /// Local user starts the introduction
    LocalRequest,
    /// Local user abandons the introduction
    LocalAbort,
    /// A contact sent a request (never valid for the introducer)
    RemoteRequest,
    /// First contact accepted
    RemoteAccept1,
    /// Second contact accepted
    RemoteAccept2,
    /// First contact declined
    RemoteDecline1,
    /// Second contact declined
    RemoteDecline2,
    /// First contact acknowledged
    RemoteAck1,
    /// Second contact acknowledged
    RemoteAck2,
    /// A contact aborted
    RemoteAbort,
}

impl IntroducerAction {
    /// Coarse classification from the message type alone.
    ///
    /// A response is provisionally classified as an accept; the content is
    /// only consulted by [`Self::response`] once the state says a response
    /// is expected.
    pub const fn remote(kind: MessageType, from: Side) -> Self {
        match (kind, from) {
            (MessageType::Request, _) => Self::RemoteRequest,
            (MessageType::Response, Side::First) => Self::RemoteAccept1,
            (MessageType::Response, Side::Second) => Self::RemoteAccept2,
            (MessageType::Ack, Side::First) => Self::RemoteAck1,
            (MessageType::Ack, Side::Second) => Self::RemoteAck2,
            (MessageType::Abort, _) => Self::RemoteAbort,
        }
    }

    /// Refined classification of a response using its accept flag.
    pub const fn response(from: Side, accept: bool) -> Self {
        match (from, accept) {
            (Side::First, true) => Self::RemoteAccept1,
            (Side::First, false) => Self::RemoteDecline1,
            (Side::Second, true) => Self::RemoteAccept2,
            (Side::Second, false) => Self::RemoteDecline2,
        }
    }

    /// Name used in log lines and errors.
    pub const fn name(self) -> &'static str {
        match self {
            Self::LocalRequest => "LOCAL_REQUEST",
            Self::LocalAbort => "LOCAL_ABORT",
            Self::RemoteRequest => "REMOTE_REQUEST",
            Self::RemoteAccept1 => "REMOTE_ACCEPT_1",
            Self::RemoteAccept2 => "REMOTE_ACCEPT_2",
            Self::RemoteDecline1 => "REMOTE_DECLINE_1",
            Self::RemoteDecline2 => "REMOTE_DECLINE_2",
            Self::RemoteAck1 => "REMOTE_ACK_1",
            Self::RemoteAck2 => "REMOTE_ACK_2",
            Self::RemoteAbort => "REMOTE_ABORT",
        }
    }
}
