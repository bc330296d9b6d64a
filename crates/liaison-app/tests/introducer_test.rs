//! Introducer facade tests.
//!
//! Drive complete introductions through the facade with an in-memory store,
//! a recording outbox and a recording event log, playing both contacts by
//! hand.

use std::cell::Cell;

use liaison_app::{
    EventLog, Introducer, MemoryStore, Outbox, RetentionPolicy, RuntimeConfig, RuntimeError, SessionStore,
};
use liaison_core::{Environment, Introducee, IntroducerState, IntroductionEvent, LocalAction};
use liaison_proto::{
    Abort, Ack, AuthorId, ContactId, GroupId, MessageId, MessageType, Request, Response, SessionId,
    encode_dictionary, keys,
};

/// Environment handing out sequential ids.
#[derive(Default)]
struct CountingEnv {
    next: Cell<u8>,
}

impl Environment for CountingEnv {
    fn now_millis(&self) -> u64 {
        1_000
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        let n = self.next.get().wrapping_add(1);
        self.next.set(n);
        buffer.fill(n);
    }
}

type TestIntroducer = Introducer<CountingEnv, MemoryStore, Outbox, EventLog<IntroductionEvent>>;

const G1: GroupId = GroupId::new([0xA0; 32]);
const G2: GroupId = GroupId::new([0xB0; 32]);
const G3: GroupId = GroupId::new([0xC0; 32]);

fn contact(id: u32, name: &str, group_id: GroupId) -> Introducee {
    Introducee { contact_id: ContactId(id), author_id: AuthorId::new([id as u8; 32]), name: name.into(), group_id }
}

fn introducer(config: RuntimeConfig) -> TestIntroducer {
    Introducer::new(CountingEnv::default(), MemoryStore::new(), Outbox::new(), EventLog::new(), config)
}

fn introduce(introducer: &mut TestIntroducer) -> SessionId {
    introducer
        .introduce(contact(1, "alice", G1), contact(2, "bob", G2), vec![1; 32], vec![2; 32], Some("meet".into()))
        .unwrap()
}

fn response(session_id: SessionId, group_id: GroupId, id: u8, accept: bool) -> liaison_proto::Dictionary {
    Response { session_id, group_id, message_id: MessageId::new([id; 32]), timestamp: 5, accept }.to_dictionary()
}

fn ack(session_id: SessionId, group_id: GroupId, id: u8) -> liaison_proto::Dictionary {
    Ack { session_id, group_id, message_id: MessageId::new([id; 32]) }.to_dictionary()
}

#[test]
fn introduce_persists_after_request_and_sends_two_requests() {
    let mut introducer = introducer(RuntimeConfig::default());
    let id = introduce(&mut introducer);

    assert_eq!(id, SessionId::new([1; 32]));
    let session = introducer.session(&id).unwrap().unwrap();
    assert_eq!(session.state(), IntroducerState::AwaitResponses);

    let outbox = introducer.runtime().router();
    assert_eq!(outbox.len(), 2);
    let to_alice: Vec<_> = outbox.for_channel(&G1).collect();
    let request = Request::from_dictionary(to_alice[0]).unwrap();
    assert_eq!(request.name, "bob");
    assert_eq!(request.public_key, vec![2; 32]);
    assert_eq!(request.note.as_deref(), Some("meet"));
}

#[test]
fn duplicate_introduction_is_refused_while_live() {
    let mut introducer = introducer(RuntimeConfig::default());
    let id = introduce(&mut introducer);

    assert!(!introducer.can_introduce(&G2, &G1).unwrap());
    let again =
        introducer.introduce(contact(2, "bob", G2), contact(1, "alice", G1), vec![2; 32], vec![1; 32], None);
    assert!(matches!(again, Err(RuntimeError::AlreadyIntroducing(existing)) if existing == id));

    // A different pair is fine.
    assert!(introducer.can_introduce(&G1, &G3).unwrap());

    // Once aborted the pair can be introduced again.
    introducer.abort(id).unwrap();
    assert!(introducer.can_introduce(&G1, &G2).unwrap());
    let second = introduce(&mut introducer);
    assert_ne!(second, id);
}

#[test]
fn same_channel_twice_is_rejected() {
    let mut introducer = introducer(RuntimeConfig::default());
    let result =
        introducer.introduce(contact(1, "alice", G1), contact(2, "bob", G1), vec![1; 32], vec![2; 32], None);
    assert!(matches!(result, Err(RuntimeError::Engine(_))));
    assert!(introducer.runtime().store().is_empty());
}

#[test]
fn full_introduction_over_bytes() {
    let mut introducer = introducer(RuntimeConfig::default());
    let id = introduce(&mut introducer);
    introducer.runtime_mut().router_mut().drain();

    for message in
        [response(id, G1, 10, true), response(id, G2, 11, false), ack(id, G2, 12), ack(id, G1, 13)]
    {
        let bytes = encode_dictionary(&message).unwrap();
        introducer.receive_bytes(&bytes).unwrap();
    }

    let session = introducer.session(&id).unwrap().unwrap();
    assert_eq!(session.state(), IntroducerState::Finished);

    let relayed = introducer.runtime().router().messages();
    assert_eq!(relayed.len(), 4);
    assert_eq!(relayed.iter().map(|e| e.channel).collect::<Vec<_>>(), vec![G2, G1, G1, G2]);

    let events = introducer.runtime().sink().events();
    assert_eq!(events.len(), 2);
    let IntroductionEvent::ResponseReceived { contact_id, response } = &events[1];
    assert_eq!(*contact_id, ContactId(2));
    assert!(!response.accept);
    assert_eq!(response.name, "alice");
}

#[test]
fn oversized_message_is_rejected_before_decoding() {
    let config = RuntimeConfig { max_message_size: 16, ..RuntimeConfig::default() };
    let mut introducer = introducer(config);
    let id = introduce(&mut introducer);

    let bytes = encode_dictionary(&response(id, G1, 10, true)).unwrap();
    assert!(matches!(introducer.receive_bytes(&bytes), Err(RuntimeError::Protocol(_))));
    assert_eq!(introducer.session(&id).unwrap().unwrap().state(), IntroducerState::AwaitResponses);
}

#[test]
fn message_for_unknown_session_is_reported() {
    let mut introducer = introducer(RuntimeConfig::default());
    let stray = SessionId::new([0xEE; 32]);
    assert!(matches!(
        introducer.receive(&response(stray, G1, 1, true)),
        Err(RuntimeError::UnknownSession(id)) if id == stray
    ));

    let mut no_session = response(stray, G1, 1, true);
    no_session.remove(keys::SESSION_ID);
    assert!(matches!(introducer.receive(&no_session), Err(RuntimeError::Protocol(_))));
}

#[test]
fn remote_abort_routes_aborts_to_both_contacts() {
    let mut introducer = introducer(RuntimeConfig::default());
    let id = introduce(&mut introducer);
    introducer.runtime_mut().router_mut().drain();

    let session = introducer.receive(&Abort { session_id: id, group_id: G2 }.to_dictionary()).unwrap();
    assert_eq!(session.state(), IntroducerState::Error);

    let sent = introducer.runtime().router().messages();
    assert_eq!(sent.len(), 2);
    for envelope in sent {
        assert_eq!(envelope.message.get_long(keys::TYPE).unwrap(), MessageType::Abort.value());
    }

    // Second abort is silent.
    introducer.abort(id).unwrap();
    assert_eq!(introducer.runtime().router().len(), 2);
}

#[test]
fn drop_aborted_retention_deletes_session() {
    let config = RuntimeConfig { retention: RetentionPolicy::DropAborted, ..RuntimeConfig::default() };
    let mut introducer = introducer(config);
    let id = introduce(&mut introducer);

    let session = introducer.abort(id).unwrap();
    assert_eq!(session.state(), IntroducerState::Error);
    assert_eq!(introducer.runtime().router().len(), 4, "two requests then two aborts");
    assert!(introducer.session(&id).unwrap().is_none());
    assert!(introducer.runtime().store().sessions().unwrap().is_empty());
    assert!(matches!(introducer.abort(id), Err(RuntimeError::UnknownSession(_))));
}

#[test]
fn local_action_dictionary_form() {
    let mut introducer = introducer(RuntimeConfig::default());
    let id = introduce(&mut introducer);

    let session = introducer.local_action(id, &LocalAction::Abort.to_dictionary()).unwrap();
    assert_eq!(session.state(), IntroducerState::Error);

    let bogus = LocalAction::Abort.to_dictionary().with(keys::TYPE, 3i64);
    assert!(matches!(introducer.local_action(id, &bogus), Err(RuntimeError::Engine(_))));
}

#[test]
fn delivery_notification_leaves_session_untouched() {
    let mut introducer = introducer(RuntimeConfig::default());
    let id = introduce(&mut introducer);
    let sent = introducer.runtime().router().messages()[0].message.clone();

    let before = introducer.session(&id).unwrap().unwrap();
    let after = introducer.delivered(&sent).unwrap();
    assert_eq!(before, after);
    assert_eq!(introducer.runtime().router().len(), 2);
}
