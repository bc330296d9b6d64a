//! Persisted introducer session.

use liaison_proto::{AuthorId, ContactId, Dictionary, GroupId, MessageId, ProtocolError, SessionId, keys};

use super::{action::Side, state::IntroducerState};
use crate::{engine::SessionState, error::EngineError};

/// One of the two contacts being introduced, fixed at session creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Introducee {
    /// Local contact id
    pub contact_id: ContactId,
    /// Contact's author identity
    pub author_id: AuthorId,
    /// Display name
    pub name: String,
    /// Channel shared with this contact
    pub group_id: GroupId,
}

/// Introducer session.
///
/// Fields are only mutated by the engine, which always works on a clone of
/// the stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntroducerSession {
    pub(super) session_id: SessionId,
    pub(super) state: IntroducerState,
    pub(super) first: Introducee,
    pub(super) second: Introducee,
    pub(super) response_1: Option<MessageId>,
    pub(super) response_2: Option<MessageId>,
}

impl IntroducerSession {
    /// Create a session in [`IntroducerState::PrepareRequests`].
    ///
    /// # Errors
    ///
    /// - `EngineError::InvalidSession` if both contacts share a channel
    pub fn new(session_id: SessionId, first: Introducee, second: Introducee) -> Result<Self, EngineError> {
        if first.group_id == second.group_id {
            return Err(EngineError::InvalidSession(format!(
                "both contacts use channel {}",
                first.group_id.short()
            )));
        }

        Ok(Self {
            session_id,
            state: IntroducerState::PrepareRequests,
            first,
            second,
            response_1: None,
            response_2: None,
        })
    }

    /// Current protocol state.
    pub fn state(&self) -> IntroducerState {
        self.state
    }

    /// Contact on the given side.
    pub fn contact(&self, side: Side) -> &Introducee {
        match side {
            Side::First => &self.first,
            Side::Second => &self.second,
        }
    }

    /// Which contact owns `channel`, if any.
    pub fn side_of(&self, channel: &GroupId) -> Option<Side> {
        if *channel == self.first.group_id {
            Some(Side::First)
        } else if *channel == self.second.group_id {
            Some(Side::Second)
        } else {
            None
        }
    }

    /// Message id of the response recorded for `side`.
    pub fn response(&self, side: Side) -> Option<MessageId> {
        match side {
            Side::First => self.response_1,
            Side::Second => self.response_2,
        }
    }

    pub(super) fn set_response(&mut self, side: Side, message_id: MessageId) {
        match side {
            Side::First => self.response_1 = Some(message_id),
            Side::Second => self.response_2 = Some(message_id),
        }
    }

    /// Whether the session is for exactly this pair of channels, in either
    /// order.
    pub fn introduces(&self, a: &GroupId, b: &GroupId) -> bool {
        (self.first.group_id == *a && self.second.group_id == *b)
            || (self.first.group_id == *b && self.second.group_id == *a)
    }
}

impl SessionState for IntroducerSession {
    fn session_id(&self) -> SessionId {
        self.session_id
    }

    fn to_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new()
            .with(keys::SESSION_ID, self.session_id.to_vec())
            .with(keys::STATE, self.state.value());
        write_introducee(&mut dict, &self.first, Side::First);
        write_introducee(&mut dict, &self.second, Side::Second);
        if let Some(id) = self.response_1 {
            dict.put(keys::RESPONSE_1, id.to_vec());
        }
        if let Some(id) = self.response_2 {
            dict.put(keys::RESPONSE_2, id.to_vec());
        }
        dict
    }

    fn from_dictionary(dict: &Dictionary) -> Result<Self, ProtocolError> {
        let first = read_introducee(dict, Side::First)?;
        let second = read_introducee(dict, Side::Second)?;
        if first.group_id == second.group_id {
            return Err(ProtocolError::Decode("session channels are equal".to_string()));
        }

        Ok(Self {
            session_id: SessionId::from_slice(dict.get_raw(keys::SESSION_ID)?)?,
            state: IntroducerState::from_value(dict.get_long(keys::STATE)?)?,
            first,
            second,
            response_1: dict.optional_raw(keys::RESPONSE_1)?.map(MessageId::from_slice).transpose()?,
            response_2: dict.optional_raw(keys::RESPONSE_2)?.map(MessageId::from_slice).transpose()?,
        })
    }

    fn is_aborted(&self) -> bool {
        self.state == IntroducerState::Error
    }

    fn is_live(&self) -> bool {
        !self.state.is_terminal()
    }
}

struct IntroduceeKeys {
    group_id: &'static str,
    name: &'static str,
    contact_id: &'static str,
    author_id: &'static str,
}

const fn introducee_keys(side: Side) -> IntroduceeKeys {
    match side {
        Side::First => IntroduceeKeys {
            group_id: keys::GROUP_ID_1,
            name: keys::CONTACT_1,
            contact_id: keys::CONTACT_ID_1,
            author_id: keys::AUTHOR_ID_1,
        },
        Side::Second => IntroduceeKeys {
            group_id: keys::GROUP_ID_2,
            name: keys::CONTACT_2,
            contact_id: keys::CONTACT_ID_2,
            author_id: keys::AUTHOR_ID_2,
        },
    }
}

fn write_introducee(dict: &mut Dictionary, introducee: &Introducee, side: Side) {
    let k = introducee_keys(side);
    dict.put(k.group_id, introducee.group_id.to_vec());
    dict.put(k.name, introducee.name.as_str());
    dict.put(k.contact_id, introducee.contact_id.0);
    dict.put(k.author_id, introducee.author_id.to_vec());
}

fn read_introducee(dict: &Dictionary, side: Side) -> Result<Introducee, ProtocolError> {
    let k = introducee_keys(side);
    let raw_contact = dict.get_long(k.contact_id)?;
    let contact_id = u32::try_from(raw_contact)
        .map_err(|_| ProtocolError::IntegerOutOfRange { key: k.contact_id, value: raw_contact })?;

    Ok(Introducee {
        contact_id: ContactId(contact_id),
        author_id: AuthorId::from_slice(dict.get_raw(k.author_id)?)?,
        name: dict.get_string(k.name)?.to_string(),
        group_id: GroupId::from_slice(dict.get_raw(k.group_id)?)?,
    })
}
