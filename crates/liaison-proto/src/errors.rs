//! Error types for wire decoding and dictionary access.

use thiserror::Error;

/// Result alias for wire-layer operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while encoding, decoding or reading dictionaries.
///
/// Every variant describes malformed input. Callers at the protocol layer
/// treat these as format errors: the session is aborted, the process is not.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A required key is absent.
    #[error("missing required key '{key}'")]
    MissingKey {
        /// The key that was looked up.
        key: &'static str,
    },

    /// A key is present but holds a value of the wrong kind.
    #[error("key '{key}' holds {found}, expected {expected}")]
    WrongType {
        /// The key that was looked up.
        key: &'static str,
        /// Kind the caller asked for.
        expected: &'static str,
        /// Kind actually stored.
        found: &'static str,
    },

    /// A fixed-size identifier had the wrong number of bytes.
    #[error("invalid length for {what}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Identifier kind.
        what: &'static str,
        /// Required length.
        expected: usize,
        /// Length supplied.
        actual: usize,
    },

    /// The message `type` field is not one of the known message types.
    #[error("unknown message type {0}")]
    UnknownMessageType(i64),

    /// An integer does not fit the target representation.
    #[error("integer out of range for key '{key}': {value}")]
    IntegerOutOfRange {
        /// The key that was looked up.
        key: &'static str,
        /// The stored value.
        value: i64,
    },

    /// Encoded input exceeds the configured size limit.
    #[error("encoded size {size} exceeds limit {max}")]
    TooLarge {
        /// Size of the input.
        size: usize,
        /// Configured maximum.
        max: usize,
    },

    /// CBOR decoding failed or produced an unsupported item.
    #[error("decode error: {0}")]
    Decode(String),

    /// CBOR encoding failed.
    #[error("encode error: {0}")]
    Encode(String),
}
