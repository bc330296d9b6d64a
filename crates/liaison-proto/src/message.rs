//! Introduction protocol messages.
//!
//! Messages travel as [`Dictionary`] values. The types in this module are
//! typed views used to build outgoing messages and to validate inbound ones;
//! a relay that forwards a message keeps the original dictionary so fields it
//! does not know about survive the hop.
//!
//! # Protocol Flow
//!
//! ```text
//! introducer            contact 1                contact 2
//!     │── Request(name₂, key₂) ──>│                      │
//!     │── Request(name₁, key₁) ─────────────────────────>│
//!     │<── Response(accept) ──────│                      │
//!     │── Response (forwarded) ─────────────────────────>│
//!     │<── Response(accept) ─────────────────────────────│
//!     │── Response (forwarded) ──>│                      │
//!     │<── Ack ───────────────────│                      │
//!     │── Ack (forwarded) ──────────────────────────────>│
//!     │<── Ack ──────────────────────────────────────────│
//!     │── Ack (forwarded) ───────>│                      │
//! ```
//!
//! Either side (or the introducer) may send Abort at any point.

use crate::{
    dictionary::Dictionary,
    errors::{ProtocolError, Result},
    ids::{GroupId, MessageId, SessionId},
    keys,
};

/// Value of the [`keys::TYPE`] field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    /// Introducer asks a contact to accept an introduction
    Request = 1,
    /// Contact accepts or declines
    Response = 2,
    /// Contact confirms it has seen the other side's response
    Ack = 3,
    /// Session is abandoned
    Abort = 4,
}

impl MessageType {
    /// Wire value.
    pub const fn value(self) -> i64 {
        self as i64
    }

    /// Parse a wire value.
    pub fn from_value(value: i64) -> Result<Self> {
        match value {
            1 => Ok(Self::Request),
            2 => Ok(Self::Response),
            3 => Ok(Self::Ack),
            4 => Ok(Self::Abort),
            other => Err(ProtocolError::UnknownMessageType(other)),
        }
    }

    /// Name used in log lines.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Response => "response",
            Self::Ack => "ack",
            Self::Abort => "abort",
        }
    }
}

/// Fields common to every message.
///
/// Parsing only the header is enough to route a message and to pick the
/// coarse protocol action; the type-specific fields are checked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    /// Message type
    pub kind: MessageType,
    /// Session the message belongs to
    pub session_id: SessionId,
    /// Channel the message travels on
    pub group_id: GroupId,
}

impl MessageHeader {
    /// Read the common fields from a dictionary.
    pub fn parse(dict: &Dictionary) -> Result<Self> {
        Ok(Self {
            kind: MessageType::from_value(dict.get_long(keys::TYPE)?)?,
            session_id: SessionId::from_slice(dict.get_raw(keys::SESSION_ID)?)?,
            group_id: GroupId::from_slice(dict.get_raw(keys::GROUP_ID)?)?,
        })
    }

    fn write(&self, dict: &mut Dictionary) {
        dict.put(keys::TYPE, self.kind.value());
        dict.put(keys::SESSION_ID, self.session_id.to_vec());
        dict.put(keys::GROUP_ID, self.group_id.to_vec());
    }
}

/// Introduction request sent by the introducer to each contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Session
    pub session_id: SessionId,
    /// Channel of the receiving contact
    pub group_id: GroupId,
    /// Name of the contact being introduced
    pub name: String,
    /// Public key of the contact being introduced
    pub public_key: Vec<u8>,
    /// Optional note from the introducer
    pub note: Option<String>,
}

impl Request {
    /// Build the wire form.
    pub fn to_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        MessageHeader { kind: MessageType::Request, session_id: self.session_id, group_id: self.group_id }
            .write(&mut dict);
        dict.put(keys::NAME, self.name.as_str());
        dict.put(keys::PUBLIC_KEY, self.public_key.clone());
        if let Some(note) = &self.note {
            dict.put(keys::MSG, note.as_str());
        }
        dict
    }

    /// Validate and read the wire form.
    pub fn from_dictionary(dict: &Dictionary) -> Result<Self> {
        let header = expect_kind(dict, MessageType::Request)?;
        Ok(Self {
            session_id: header.session_id,
            group_id: header.group_id,
            name: dict.get_string(keys::NAME)?.to_string(),
            public_key: dict.get_raw(keys::PUBLIC_KEY)?.to_vec(),
            note: dict.optional_string(keys::MSG)?.map(str::to_string),
        })
    }
}

/// A contact's answer to an introduction request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Session
    pub session_id: SessionId,
    /// Channel the response travels on
    pub group_id: GroupId,
    /// Id of this response message
    pub message_id: MessageId,
    /// Sender timestamp in milliseconds since the epoch
    pub timestamp: u64,
    /// Whether the contact accepted
    pub accept: bool,
}

impl Response {
    /// Build the wire form.
    pub fn to_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        MessageHeader { kind: MessageType::Response, session_id: self.session_id, group_id: self.group_id }
            .write(&mut dict);
        dict.put(keys::MESSAGE_ID, self.message_id.to_vec());
        // The wire holds a signed long; clamp rather than wrap.
        dict.put(keys::MESSAGE_TIME, i64::try_from(self.timestamp).unwrap_or(i64::MAX));
        dict.put(keys::ACCEPT, self.accept);
        dict
    }

    /// Validate and read the wire form.
    pub fn from_dictionary(dict: &Dictionary) -> Result<Self> {
        let header = expect_kind(dict, MessageType::Response)?;
        let time = dict.get_long(keys::MESSAGE_TIME)?;
        let timestamp = u64::try_from(time)
            .map_err(|_| ProtocolError::IntegerOutOfRange { key: keys::MESSAGE_TIME, value: time })?;
        Ok(Self {
            session_id: header.session_id,
            group_id: header.group_id,
            message_id: MessageId::from_slice(dict.get_raw(keys::MESSAGE_ID)?)?,
            timestamp,
            accept: dict.get_bool(keys::ACCEPT)?,
        })
    }
}

/// Confirmation that a contact has seen the other side's response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    /// Session
    pub session_id: SessionId,
    /// Channel the ack travels on
    pub group_id: GroupId,
    /// Id of this ack message
    pub message_id: MessageId,
}

impl Ack {
    /// Build the wire form.
    pub fn to_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        MessageHeader { kind: MessageType::Ack, session_id: self.session_id, group_id: self.group_id }
            .write(&mut dict);
        dict.put(keys::MESSAGE_ID, self.message_id.to_vec());
        dict
    }

    /// Validate and read the wire form.
    pub fn from_dictionary(dict: &Dictionary) -> Result<Self> {
        let header = expect_kind(dict, MessageType::Ack)?;
        Ok(Self {
            session_id: header.session_id,
            group_id: header.group_id,
            message_id: MessageId::from_slice(dict.get_raw(keys::MESSAGE_ID)?)?,
        })
    }
}

/// Abandons a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Abort {
    /// Session
    pub session_id: SessionId,
    /// Channel the abort travels on
    pub group_id: GroupId,
}

impl Abort {
    /// Build the wire form.
    pub fn to_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        MessageHeader { kind: MessageType::Abort, session_id: self.session_id, group_id: self.group_id }
            .write(&mut dict);
        dict
    }

    /// Validate and read the wire form.
    pub fn from_dictionary(dict: &Dictionary) -> Result<Self> {
        let header = expect_kind(dict, MessageType::Abort)?;
        Ok(Self { session_id: header.session_id, group_id: header.group_id })
    }
}

fn expect_kind(dict: &Dictionary, kind: MessageType) -> Result<MessageHeader> {
    let header = MessageHeader::parse(dict)?;
    if header.kind != kind {
        return Err(ProtocolError::WrongType {
            key: keys::TYPE,
            expected: kind.name(),
            found: header.kind.name(),
        });
    }
    Ok(header)
}

/// Any introduction protocol message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntroductionMessage {
    /// See [`Request`]
    Request(Request),
    /// See [`Response`]
    Response(Response),
    /// See [`Ack`]
    Ack(Ack),
    /// See [`Abort`]
    Abort(Abort),
}

impl IntroductionMessage {
    /// Validate a dictionary against the rules for its declared type.
    pub fn from_dictionary(dict: &Dictionary) -> Result<Self> {
        match MessageHeader::parse(dict)?.kind {
            MessageType::Request => Request::from_dictionary(dict).map(Self::Request),
            MessageType::Response => Response::from_dictionary(dict).map(Self::Response),
            MessageType::Ack => Ack::from_dictionary(dict).map(Self::Ack),
            MessageType::Abort => Abort::from_dictionary(dict).map(Self::Abort),
        }
    }

    /// Build the wire form.
    pub fn to_dictionary(&self) -> Dictionary {
        match self {
            Self::Request(m) => m.to_dictionary(),
            Self::Response(m) => m.to_dictionary(),
            Self::Ack(m) => m.to_dictionary(),
            Self::Abort(m) => m.to_dictionary(),
        }
    }

    /// Message type.
    pub const fn kind(&self) -> MessageType {
        match self {
            Self::Request(_) => MessageType::Request,
            Self::Response(_) => MessageType::Response,
            Self::Ack(_) => MessageType::Ack,
            Self::Abort(_) => MessageType::Abort,
        }
    }

    /// Channel the message travels on.
    pub const fn group_id(&self) -> GroupId {
        match self {
            Self::Request(m) => m.group_id,
            Self::Response(m) => m.group_id,
            Self::Ack(m) => m.group_id,
            Self::Abort(m) => m.group_id,
        }
    }
}
