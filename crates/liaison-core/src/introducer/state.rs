//! Introducer protocol states and the transition table.

use liaison_proto::{ProtocolError, keys};

use super::action::IntroducerAction;

/// Protocol state of an introducer session.
///
/// The numeric values are the persisted form and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntroducerState {
    /// Session created, requests not sent yet
    PrepareRequests = 0,
    /// Requests sent, both responses pending
    AwaitResponses = 1,
    /// Second contact responded, first pending
    AwaitResponse1 = 2,
    /// First contact responded, second pending
    AwaitResponse2 = 3,
    /// Both responses forwarded, both acks pending
    AwaitAcks = 4,
    /// Second contact acked, first pending
    AwaitAck1 = 5,
    /// First contact acked, second pending
    AwaitAck2 = 6,
    /// Both acks forwarded
    Finished = 7,
    /// Session aborted (absorbing)
    Error = 8,
}

impl IntroducerState {
    /// All states, in value order.
    pub const ALL: [Self; 9] = [
        Self::PrepareRequests,
        Self::AwaitResponses,
        Self::AwaitResponse1,
        Self::AwaitResponse2,
        Self::AwaitAcks,
        Self::AwaitAck1,
        Self::AwaitAck2,
        Self::Finished,
        Self::Error,
    ];

    /// Persisted value.
    pub const fn value(self) -> i64 {
        self as i64
    }

    /// Parse a persisted value.
    pub fn from_value(value: i64) -> Result<Self, ProtocolError> {
        usize::try_from(value)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(ProtocolError::IntegerOutOfRange { key: keys::STATE, value })
    }

    /// Transition table. Undefined combinations yield [`Self::Error`].
    pub const fn next(self, action: IntroducerAction) -> Self {
        use IntroducerAction::{
            LocalRequest, RemoteAccept1, RemoteAccept2, RemoteAck1, RemoteAck2, RemoteDecline1,
            RemoteDecline2,
        };

        match (self, action) {
            (Self::PrepareRequests, LocalRequest) => Self::AwaitResponses,
            (Self::AwaitResponses, RemoteAccept1 | RemoteDecline1) => Self::AwaitResponse2,
            (Self::AwaitResponses, RemoteAccept2 | RemoteDecline2) => Self::AwaitResponse1,
            (Self::AwaitResponse1, RemoteAccept1 | RemoteDecline1)
            | (Self::AwaitResponse2, RemoteAccept2 | RemoteDecline2) => Self::AwaitAcks,
            (Self::AwaitAcks, RemoteAck1) => Self::AwaitAck2,
            (Self::AwaitAcks, RemoteAck2) => Self::AwaitAck1,
            (Self::AwaitAck1, RemoteAck1) | (Self::AwaitAck2, RemoteAck2) => Self::Finished,
            (Self::Finished, RemoteAccept1 | RemoteDecline1 | RemoteAccept2 | RemoteDecline2) => {
                Self::Finished
            },
            _ => Self::Error,
        }
    }

    /// Whether a response from either side is currently expected.
    pub const fn awaits_response(self) -> bool {
        matches!(self, Self::AwaitResponses | Self::AwaitResponse1 | Self::AwaitResponse2)
    }

    /// Whether an ack from either side is currently expected.
    pub const fn awaits_ack(self) -> bool {
        matches!(self, Self::AwaitAcks | Self::AwaitAck1 | Self::AwaitAck2)
    }

    /// Whether the session can no longer make progress on the wire.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Error)
    }

    /// Name used in log lines and errors.
    pub const fn name(self) -> &'static str {
        match self {
            Self::PrepareRequests => "PREPARE_REQUESTS",
            Self::AwaitResponses => "AWAIT_RESPONSES",
            Self::AwaitResponse1 => "AWAIT_RESPONSE_1",
            Self::AwaitResponse2 => "AWAIT_RESPONSE_2",
            Self::AwaitAcks => "AWAIT_ACKS",
            Self::AwaitAck1 => "AWAIT_ACK_1",
            Self::AwaitAck2 => "AWAIT_ACK_2",
            Self::Finished => "FINISHED",
            Self::Error => "ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::introducer::action::IntroducerAction::{
        LocalAbort, LocalRequest, RemoteAbort, RemoteAccept1, RemoteAccept2, RemoteAck1,
        RemoteAck2, RemoteDecline1, RemoteDecline2, RemoteRequest,
    };

    const ACTIONS: [IntroducerAction; 10] = [
        LocalRequest,
        LocalAbort,
        RemoteRequest,
        RemoteAccept1,
        RemoteAccept2,
        RemoteDecline1,
        RemoteDecline2,
        RemoteAck1,
        RemoteAck2,
        RemoteAbort,
    ];

    #[test]
    fn value_roundtrip() {
        for state in IntroducerState::ALL {
            assert_eq!(IntroducerState::from_value(state.value()).unwrap(), state);
        }
        assert!(IntroducerState::from_value(9).is_err());
        assert!(IntroducerState::from_value(-1).is_err());
    }

    #[test]
    fn response_path() {
        use IntroducerState::{AwaitAcks, AwaitResponse1, AwaitResponse2, AwaitResponses};

        assert_eq!(AwaitResponses.next(RemoteAccept1), AwaitResponse2);
        assert_eq!(AwaitResponses.next(RemoteDecline1), AwaitResponse2);
        assert_eq!(AwaitResponses.next(RemoteAccept2), AwaitResponse1);
        assert_eq!(AwaitResponse1.next(RemoteDecline1), AwaitAcks);
        assert_eq!(AwaitResponse2.next(RemoteAccept2), AwaitAcks);
        assert_eq!(AwaitResponse1.next(RemoteAccept2), IntroducerState::Error);
        assert_eq!(AwaitResponse2.next(RemoteAccept1), IntroducerState::Error);
    }

    #[test]
    fn ack_path() {
        use IntroducerState::{AwaitAck1, AwaitAck2, AwaitAcks, Finished};

        assert_eq!(AwaitAcks.next(RemoteAck1), AwaitAck2);
        assert_eq!(AwaitAcks.next(RemoteAck2), AwaitAck1);
        assert_eq!(AwaitAck1.next(RemoteAck1), Finished);
        assert_eq!(AwaitAck2.next(RemoteAck2), Finished);
        assert_eq!(AwaitAck1.next(RemoteAck2), IntroducerState::Error);
        assert_eq!(AwaitAcks.next(RemoteAccept1), IntroducerState::Error);
    }

    #[test]
    fn finished_only_tolerates_late_responses() {
        use IntroducerState::Finished;

        for action in [RemoteAccept1, RemoteAccept2, RemoteDecline1, RemoteDecline2] {
            assert_eq!(Finished.next(action), Finished);
        }
        for action in [RemoteAck1, RemoteAck2, RemoteAbort, RemoteRequest, LocalRequest, LocalAbort]
        {
            assert_eq!(Finished.next(action), IntroducerState::Error);
        }
    }

    #[test]
    fn local_request_only_from_prepare() {
        for state in IntroducerState::ALL {
            let next = state.next(LocalRequest);
            if state == IntroducerState::PrepareRequests {
                assert_eq!(next, IntroducerState::AwaitResponses);
            } else {
                assert_eq!(next, IntroducerState::Error, "LOCAL_REQUEST from {}", state.name());
            }
        }
    }

    #[test]
    fn remote_request_and_abort_always_error() {
        for state in IntroducerState::ALL {
            assert_eq!(state.next(RemoteRequest), IntroducerState::Error);
            assert_eq!(state.next(RemoteAbort), IntroducerState::Error);
            assert_eq!(state.next(LocalAbort), IntroducerState::Error);
        }
    }

    proptest! {
        #[test]
        fn prop_error_is_absorbing(actions in prop::collection::vec(0..ACTIONS.len(), 0..32)) {
            let mut state = IntroducerState::Error;
            for i in actions {
                state = state.next(ACTIONS[i]);
                prop_assert_eq!(state, IntroducerState::Error);
            }
        }

        #[test]
        fn prop_terminal_states_never_reenter_handshake(
            start in 0..IntroducerState::ALL.len(),
            actions in prop::collection::vec(0..ACTIONS.len(), 0..32),
        ) {
            let mut state = IntroducerState::ALL[start];
            for i in actions {
                let was_terminal = state.is_terminal();
                state = state.next(ACTIONS[i]);
                if was_terminal {
                    prop_assert!(state.is_terminal());
                }
            }
        }
    }
}
