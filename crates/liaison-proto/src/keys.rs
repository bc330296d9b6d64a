//! Dictionary keys shared by every peer running the introduction protocol.
//!
//! Changing any of these breaks interoperability with existing peers and
//! with sessions already persisted.

/// Message type (see [`MessageType`](crate::MessageType))
pub const TYPE: &str = "type";
/// Session identifier, 32 raw bytes
pub const SESSION_ID: &str = "sessionId";
/// Channel the message travels on, 32 raw bytes
pub const GROUP_ID: &str = "groupId";

/// REQUEST: name of the contact being introduced
pub const NAME: &str = "name";
/// REQUEST: public key of the contact being introduced
pub const PUBLIC_KEY: &str = "publicKey";
/// REQUEST: optional note from the introducer
pub const MSG: &str = "msg";

/// RESPONSE/ACK: identifier of the message itself
pub const MESSAGE_ID: &str = "messageId";
/// RESPONSE: sender timestamp in milliseconds
pub const MESSAGE_TIME: &str = "time";
/// RESPONSE: whether the introduction was accepted
pub const ACCEPT: &str = "accept";

/// Session: protocol state value
pub const STATE: &str = "state";
/// Session: channel of the first contact
pub const GROUP_ID_1: &str = "groupId1";
/// Session: channel of the second contact
pub const GROUP_ID_2: &str = "groupId2";
/// Session: display name of the first contact
pub const CONTACT_1: &str = "contact1";
/// Session: display name of the second contact
pub const CONTACT_2: &str = "contact2";
/// Session: local contact id of the first contact
pub const CONTACT_ID_1: &str = "contactId1";
/// Session: local contact id of the second contact
pub const CONTACT_ID_2: &str = "contactId2";
/// Session: author id of the first contact
pub const AUTHOR_ID_1: &str = "authorId1";
/// Session: author id of the second contact
pub const AUTHOR_ID_2: &str = "authorId2";
/// Session: message id of the first contact's response
pub const RESPONSE_1: &str = "response1";
/// Session: message id of the second contact's response
pub const RESPONSE_2: &str = "response2";

/// Local action: public key of the first contact
pub const PUBLIC_KEY_1: &str = "publicKey1";
/// Local action: public key of the second contact
pub const PUBLIC_KEY_2: &str = "publicKey2";
