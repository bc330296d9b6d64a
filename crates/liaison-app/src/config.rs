//! Runtime configuration.

use liaison_proto::DEFAULT_MAX_ENCODED_SIZE;

/// What the runtime does with sessions that reach a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetentionPolicy {
    /// Persist every session, including aborted ones.
    #[default]
    KeepAll,
    /// Delete a session once it is aborted, after its abort messages are
    /// routed. Later messages for it are reported as unknown.
    DropAborted,
}

/// Configuration for [`Runtime`](crate::Runtime).
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Retention of terminal sessions
    pub retention: RetentionPolicy,
    /// Largest encoded inbound message accepted by `receive_bytes`
    pub max_message_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { retention: RetentionPolicy::KeepAll, max_message_size: DEFAULT_MAX_ENCODED_SIZE }
    }
}
