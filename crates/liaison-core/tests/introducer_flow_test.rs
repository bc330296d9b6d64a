//! End-to-end introducer flows driven directly through the engine.
//!
//! Each test plays both introducees by hand: it feeds the engine the messages
//! the contacts would send and checks what the introducer relays.

use liaison_core::{
    Introducee, IntroducerEngine, IntroducerSession, IntroducerState, IntroductionEvent, LocalAction,
    ProtocolEngine, SessionState, Side,
};
use liaison_proto::{
    Ack, AuthorId, ContactId, Dictionary, GroupId, IntroductionMessage, MessageId, MessageType, Response,
    SessionId, keys,
};

const SESSION: SessionId = SessionId::new([0x5E; 32]);
const G1: GroupId = GroupId::new([0x01; 32]);
const G2: GroupId = GroupId::new([0x02; 32]);

fn new_session() -> IntroducerSession {
    IntroducerSession::new(
        SESSION,
        Introducee { contact_id: ContactId(10), author_id: AuthorId::new([0xA1; 32]), name: "alice".into(), group_id: G1 },
        Introducee { contact_id: ContactId(20), author_id: AuthorId::new([0xB2; 32]), name: "bob".into(), group_id: G2 },
    )
    .unwrap()
}

fn start(engine: &IntroducerEngine) -> IntroducerSession {
    let request = LocalAction::Request { public_key_1: vec![1; 32], public_key_2: vec![2; 32], note: None };
    engine.on_local_action(&new_session(), request).unwrap().state
}

fn response(group_id: GroupId, id: u8, accept: bool) -> Dictionary {
    Response { session_id: SESSION, group_id, message_id: MessageId::new([id; 32]), timestamp: 42, accept }
        .to_dictionary()
}

fn ack(group_id: GroupId, id: u8) -> Dictionary {
    Ack { session_id: SESSION, group_id, message_id: MessageId::new([id; 32]) }.to_dictionary()
}

#[test]
fn accept_then_decline_then_acks_in_either_order() {
    for acks_first_to_second in [true, false] {
        let engine = IntroducerEngine::new();
        let mut session = start(&engine);
        assert_eq!(session.state(), IntroducerState::AwaitResponses);

        // M1 from contact 1 accepts.
        let m1 = response(G1, 1, true);
        let update = engine.on_message_received(&session, &m1).unwrap();
        assert_eq!(update.state.state(), IntroducerState::AwaitResponse2);
        assert_eq!(update.messages.len(), 1);
        assert_eq!(update.messages[0].channel, G2);
        assert_eq!(update.messages[0].message, m1.clone().with(keys::GROUP_ID, G2.to_vec()));
        assert_eq!(update.events.len(), 1);
        let IntroductionEvent::ResponseReceived { contact_id, response: event } = &update.events[0];
        assert_eq!(*contact_id, ContactId(10));
        assert_eq!(event.message_id, MessageId::new([1; 32]));
        assert!(event.accept);
        session = update.state;

        // M2 from contact 2 declines.
        let m2 = response(G2, 2, false);
        let update = engine.on_message_received(&session, &m2).unwrap();
        assert_eq!(update.state.state(), IntroducerState::AwaitAcks);
        assert_eq!(update.messages.len(), 1);
        assert_eq!(update.messages[0].channel, G1);
        assert_eq!(update.messages[0].message, m2.clone().with(keys::GROUP_ID, G1.to_vec()));
        assert_eq!(update.events.len(), 1);
        let IntroductionEvent::ResponseReceived { contact_id, response: event } = &update.events[0];
        assert_eq!(*contact_id, ContactId(20));
        assert_eq!(event.message_id, MessageId::new([2; 32]));
        assert!(!event.accept);
        session = update.state;

        let order = if acks_first_to_second { [(G1, 3), (G2, 4)] } else { [(G2, 4), (G1, 3)] };
        for (channel, id) in order {
            let update = engine.on_message_received(&session, &ack(channel, id)).unwrap();
            assert_eq!(update.messages.len(), 1, "exactly one forwarded ack");
            assert_ne!(update.messages[0].channel, channel);
            assert!(update.events.is_empty());
            let relayed = IntroductionMessage::from_dictionary(&update.messages[0].message).unwrap();
            assert_eq!(relayed.kind(), MessageType::Ack);
            session = update.state;
        }

        assert_eq!(session.state(), IntroducerState::Finished);
        assert_eq!(session.response(Side::First), Some(MessageId::new([1; 32])));
        assert_eq!(session.response(Side::Second), Some(MessageId::new([2; 32])));
        assert!(!session.is_live());
    }
}

#[test]
fn responses_may_arrive_in_either_order() {
    let engine = IntroducerEngine::new();
    let session = start(&engine);

    let update = engine.on_message_received(&session, &response(G2, 2, true)).unwrap();
    assert_eq!(update.state.state(), IntroducerState::AwaitResponse1);
    assert_eq!(update.messages[0].channel, G1);

    let update = engine.on_message_received(&update.state, &response(G1, 1, true)).unwrap();
    assert_eq!(update.state.state(), IntroducerState::AwaitAcks);
    assert_eq!(update.messages[0].channel, G2);
}

#[test]
fn forwarded_response_differs_only_in_channel() {
    let engine = IntroducerEngine::new();
    let session = start(&engine);
    let inbound = response(G1, 1, true);

    let update = engine.on_message_received(&session, &inbound).unwrap();
    let forwarded = &update.messages[0].message;

    for (key, value) in inbound.iter() {
        if key == keys::GROUP_ID {
            assert_eq!(forwarded.get_raw(keys::GROUP_ID).unwrap(), G2.as_bytes());
        } else {
            assert_eq!(forwarded.get(key), Some(value), "field {key} changed");
        }
    }
    assert_eq!(forwarded.len(), inbound.len());
}

#[test]
fn duplicate_response_after_finish_is_absorbed() {
    let engine = IntroducerEngine::new();
    let mut session = start(&engine);
    for message in [response(G1, 1, true), response(G2, 2, true), ack(G1, 3), ack(G2, 4)] {
        session = engine.on_message_received(&session, &message).unwrap().state;
    }
    assert_eq!(session.state(), IntroducerState::Finished);

    let update = engine.on_message_received(&session, &response(G2, 2, true)).unwrap();
    assert_eq!(update.state, session);
    assert!(update.messages.is_empty());
    assert_eq!(update.events.len(), 1);
}

#[test]
fn persisted_session_resumes_mid_protocol() {
    let engine = IntroducerEngine::new();
    let session = start(&engine);
    let session = engine.on_message_received(&session, &response(G1, 1, true)).unwrap().state;

    let restored = IntroducerSession::from_dictionary(&session.to_dictionary()).unwrap();
    assert_eq!(restored, session);

    let update = engine.on_message_received(&restored, &response(G2, 2, true)).unwrap();
    assert_eq!(update.state.state(), IntroducerState::AwaitAcks);
}
