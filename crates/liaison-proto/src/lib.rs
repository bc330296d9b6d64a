//! Wire layer for the Liaison introduction protocol.
//!
//! Everything that crosses a channel or lands in the session store is a
//! [`Dictionary`]: a map from well-known string keys to typed [`Value`]s.
//! Dictionaries are serialized with CBOR, a self-describing, tag-prefixed
//! binary format, so both peers can decode messages without a shared schema
//! beyond the key constants in [`keys`].
//!
//! The protocol engines work on decoded dictionaries only. Typed views over
//! them ([`message`], [`ids`]) validate required keys and surface a
//! [`ProtocolError`] instead of trusting peer input.
//!
//! # Security
//!
//! Decoding enforces a caller-supplied size limit before any allocation
//! proportional to the input. Tags, `null` and non-text map keys are
//! rejected instead of being silently coerced.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod dictionary;
pub mod errors;
pub mod ids;
pub mod keys;
pub mod message;
pub mod value;

pub use codec::{DEFAULT_MAX_ENCODED_SIZE, decode_dictionary, encode_dictionary};
pub use dictionary::Dictionary;
pub use errors::{ProtocolError, Result};
pub use ids::{AuthorId, ContactId, GroupId, MessageId, SessionId};
pub use message::{Ack, Abort, IntroductionMessage, MessageHeader, MessageType, Request, Response};
pub use value::Value;
