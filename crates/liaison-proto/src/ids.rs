//! Fixed-size identifiers.
//!
//! Sessions, channels (groups), messages and authors are all named by 32
//! random or hashed bytes. Each gets its own newtype so a channel id can
//! never be passed where a session id is expected.

use std::fmt;

use crate::errors::{ProtocolError, Result};

macro_rules! unique_id {
    ($(#[$meta:meta])* $name:ident, $what:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name([u8; 32]);

        impl $name {
            /// Length of the identifier in bytes.
            pub const LENGTH: usize = 32;

            /// Wrap raw bytes.
            pub const fn new(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            /// Parse from a byte slice of exactly [`Self::LENGTH`] bytes.
            pub fn from_slice(bytes: &[u8]) -> Result<Self> {
                let array: [u8; 32] = bytes.try_into().map_err(|_| ProtocolError::InvalidLength {
                    what: $what,
                    expected: Self::LENGTH,
                    actual: bytes.len(),
                })?;
                Ok(Self(array))
            }

            /// Borrow the raw bytes.
            pub const fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            /// Copy the raw bytes into a vector, for dictionary values.
            pub fn to_vec(&self) -> Vec<u8> {
                self.0.to_vec()
            }

            /// First four bytes as hex, for log lines.
            pub fn short(&self) -> String {
                hex::encode(&self.0[..4])
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = ProtocolError;

            fn try_from(bytes: &[u8]) -> Result<Self> {
                Self::from_slice(bytes)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.short())
            }
        }
    };
}

unique_id!(
    /// Identifies one introduction attempt.
    SessionId,
    "session id"
);

unique_id!(
    /// Identifies a channel: the private group shared with one contact.
    GroupId,
    "group id"
);

unique_id!(
    /// Identifies a message in the sync layer.
    MessageId,
    "message id"
);

unique_id!(
    /// Identifies a contact's identity key.
    AuthorId,
    "author id"
);

/// Local database id of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContactId(pub u32);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
