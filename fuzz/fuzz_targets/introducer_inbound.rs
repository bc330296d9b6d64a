//! Fuzz target for the introducer engine's inbound path.
//!
//! Builds a session in an arbitrary state and feeds it a sequence of
//! structured or raw dictionaries. The engine must never panic, never return
//! `Err` for peer input, and never leave the error state once in it.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use liaison_core::{
    Introducee, IntroducerEngine, IntroducerSession, IntroducerState, ProtocolEngine, SessionState,
};
use liaison_proto::{
    decode_dictionary, keys, AuthorId, ContactId, Dictionary, GroupId, MessageId, SessionId,
    DEFAULT_MAX_ENCODED_SIZE,
};

const SESSION: SessionId = SessionId::new([0x5E; 32]);
const G1: GroupId = GroupId::new([1; 32]);
const G2: GroupId = GroupId::new([2; 32]);

#[derive(Debug, Arbitrary)]
enum Inbound {
    Structured {
        kind: i64,
        channel: u8,
        same_session: bool,
        accept: Option<bool>,
        message_id: Option<[u8; 32]>,
        time: Option<i64>,
    },
    Raw(Vec<u8>),
}

#[derive(Debug, Arbitrary)]
struct Input {
    state: u8,
    messages: Vec<Inbound>,
}

fn build(inbound: Inbound) -> Option<Dictionary> {
    match inbound {
        Inbound::Structured { kind, channel, same_session, accept, message_id, time } => {
            let group = match channel % 3 {
                0 => G1,
                1 => G2,
                _ => GroupId::new([channel; 32]),
            };
            let session = if same_session { SESSION } else { SessionId::new([0xFF; 32]) };
            let mut dict = Dictionary::new()
                .with(keys::TYPE, kind)
                .with(keys::SESSION_ID, session.to_vec())
                .with(keys::GROUP_ID, group.to_vec());
            if let Some(accept) = accept {
                dict.put(keys::ACCEPT, accept);
            }
            if let Some(id) = message_id {
                dict.put(keys::MESSAGE_ID, MessageId::new(id).to_vec());
            }
            if let Some(time) = time {
                dict.put(keys::MESSAGE_TIME, time);
            }
            Some(dict)
        },
        Inbound::Raw(bytes) => decode_dictionary(&bytes, DEFAULT_MAX_ENCODED_SIZE).ok(),
    }
}

fuzz_target!(|input: Input| {
    let base = IntroducerSession::new(
        SESSION,
        Introducee { contact_id: ContactId(1), author_id: AuthorId::new([1; 32]), name: "a".into(), group_id: G1 },
        Introducee { contact_id: ContactId(2), author_id: AuthorId::new([2; 32]), name: "b".into(), group_id: G2 },
    )
    .expect("distinct channels");
    let state = i64::from(input.state % 9);
    let dict = base.to_dictionary().with(keys::STATE, state);
    let mut session = IntroducerSession::from_dictionary(&dict).expect("valid state");

    let engine = IntroducerEngine::new();
    for message in input.messages.into_iter().filter_map(build) {
        let was_error = session.state() == IntroducerState::Error;
        let update = engine.on_message_received(&session, &message).expect("peer input never errs");
        if was_error {
            assert_eq!(update.state.state(), IntroducerState::Error);
            assert!(update.messages.is_empty());
        }
        assert!(update.messages.len() <= 2);
        session = update.state;
    }
});
