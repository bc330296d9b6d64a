//! Local user actions.

use liaison_proto::{Dictionary, MessageType, ProtocolError, keys};

use crate::error::EngineError;

/// Action issued by the local user on an introducer session.
///
/// The dictionary form reuses the message type values: `type = 1` is a
/// request carrying `publicKey1`, `publicKey2` and an optional `msg`;
/// `type = 4` is an abort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalAction {
    /// Send the introduction requests.
    Request {
        /// Public key of the first contact (sent to the second)
        public_key_1: Vec<u8>,
        /// Public key of the second contact (sent to the first)
        public_key_2: Vec<u8>,
        /// Optional note copied into both requests
        note: Option<String>,
    },
    /// Abandon the introduction.
    Abort,
}

impl LocalAction {
    /// Parse the dictionary form.
    ///
    /// # Errors
    ///
    /// - `EngineError::UnknownLocalAction` if `type` is not a request or abort
    /// - `EngineError::MalformedLocalAction` if a required field is missing
    pub fn from_dictionary(dict: &Dictionary) -> Result<Self, EngineError> {
        let kind = dict.get_long(keys::TYPE).map_err(EngineError::MalformedLocalAction)?;
        match MessageType::from_value(kind) {
            Ok(MessageType::Request) => Self::parse_request(dict).map_err(EngineError::MalformedLocalAction),
            Ok(MessageType::Abort) => Ok(Self::Abort),
            _ => Err(EngineError::UnknownLocalAction(kind)),
        }
    }

    fn parse_request(dict: &Dictionary) -> Result<Self, ProtocolError> {
        Ok(Self::Request {
            public_key_1: dict.get_raw(keys::PUBLIC_KEY_1)?.to_vec(),
            public_key_2: dict.get_raw(keys::PUBLIC_KEY_2)?.to_vec(),
            note: dict.optional_string(keys::MSG)?.map(str::to_string),
        })
    }

    /// Build the dictionary form.
    pub fn to_dictionary(&self) -> Dictionary {
        match self {
            Self::Request { public_key_1, public_key_2, note } => {
                let mut dict = Dictionary::new()
                    .with(keys::TYPE, MessageType::Request.value())
                    .with(keys::PUBLIC_KEY_1, public_key_1.clone())
                    .with(keys::PUBLIC_KEY_2, public_key_2.clone());
                if let Some(note) = note {
                    dict.put(keys::MSG, note.as_str());
                }
                dict
            },
            Self::Abort => Dictionary::new().with(keys::TYPE, MessageType::Abort.value()),
        }
    }

    /// Name used in log lines.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Request { .. } => "request",
            Self::Abort => "abort",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_roundtrip() {
        let action = LocalAction::Request {
            public_key_1: vec![1; 32],
            public_key_2: vec![2; 32],
            note: Some("you two should talk".to_string()),
        };
        assert_eq!(LocalAction::from_dictionary(&action.to_dictionary()).unwrap(), action);
        assert_eq!(LocalAction::from_dictionary(&LocalAction::Abort.to_dictionary()).unwrap(), LocalAction::Abort);
    }

    #[test]
    fn unknown_type_is_programming_error() {
        for kind in [2i64, 3, 77] {
            let dict = Dictionary::new().with(keys::TYPE, kind);
            assert_eq!(LocalAction::from_dictionary(&dict), Err(EngineError::UnknownLocalAction(kind)));
        }
    }

    #[test]
    fn request_without_keys_is_malformed() {
        let dict = Dictionary::new()
            .with(keys::TYPE, MessageType::Request.value())
            .with(keys::PUBLIC_KEY_1, vec![1u8; 32]);
        assert_eq!(
            LocalAction::from_dictionary(&dict),
            Err(EngineError::MalformedLocalAction(ProtocolError::MissingKey { key: keys::PUBLIC_KEY_2 }))
        );
    }
}
