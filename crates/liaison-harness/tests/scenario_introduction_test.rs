//! Scenario tests for complete introductions.
//!
//! Each scenario runs the real introducer runtime against two scripted
//! contacts over the simulated network and checks the final world with an
//! oracle.

use liaison_app::RetentionPolicy;
use liaison_core::{IntroducerState, IntroductionEvent, Side};
use liaison_harness::{
    IntroduceeScript, NetworkConfig,
    scenario::{Scenario, oracle},
};

#[test]
fn both_accept() {
    let result = Scenario::new("both accept")
        .seed(1)
        .oracle(oracle::all_of(vec![oracle::finished(), oracle::events_match_responses()]))
        .run();

    assert!(result.is_ok(), "scenario failed: {:?}", result.err());
}

#[test]
fn accept_then_decline_still_finishes() {
    let result = Scenario::new("accept then decline")
        .seed(2)
        .first("alice", IntroduceeScript::accept())
        .second("bob", IntroduceeScript::decline())
        .oracle(oracle::all_of(vec![
            oracle::finished(),
            oracle::events_match_responses(),
            Box::new(|world| {
                let alice = world.introducee(Side::First);
                let bob = world.introducee(Side::Second);
                if alice.other_response() != Some(false) {
                    return Err("alice should learn that bob declined".into());
                }
                if bob.other_response() != Some(true) {
                    return Err("bob should learn that alice accepted".into());
                }
                if world.events().len() != 2 {
                    return Err(format!("expected 2 events, got {}", world.events().len()));
                }
                Ok(())
            }),
        ]))
        .run();

    assert!(result.is_ok(), "scenario failed: {:?}", result.err());
}

#[test]
fn requests_name_the_other_contact() {
    let result = Scenario::new("request contents")
        .seed(3)
        .first("alice", IntroduceeScript::accept())
        .second("bob", IntroduceeScript::accept())
        .note("you should meet")
        .oracle(Box::new(|world| {
            let alice = world.introducee(Side::First).request().ok_or("alice got no request")?;
            let bob = world.introducee(Side::Second).request().ok_or("bob got no request")?;
            if alice.name != "bob" || bob.name != "alice" {
                return Err(format!("names swapped wrong: alice saw {}, bob saw {}", alice.name, bob.name));
            }
            if alice.note.as_deref() != Some("you should meet") || alice.note != bob.note {
                return Err("note not copied into both requests".into());
            }
            if alice.session_id != bob.session_id {
                return Err("requests carry different session ids".into());
            }
            Ok(())
        }))
        .run();

    assert!(result.is_ok(), "scenario failed: {:?}", result.err());
}

#[test]
fn silent_contact_stalls_waiting_for_response() {
    let result = Scenario::new("silent second")
        .seed(4)
        .second("bob", IntroduceeScript::silent())
        .oracle(oracle::all_of(vec![
            oracle::stalled_in(IntroducerState::AwaitResponse2),
            oracle::events_match_responses(),
        ]))
        .run();

    assert!(result.is_ok(), "scenario failed: {:?}", result.err());
}

#[test]
fn local_abort_reaches_both_contacts() {
    for abort_after in [0, 1, 3, 6] {
        let result = Scenario::new("local abort")
            .seed(5)
            .abort_after(abort_after)
            .oracle(oracle::aborted())
            .run();

        assert!(result.is_ok(), "abort after {abort_after}: {:?}", result.err());
    }
}

#[test]
fn abort_with_drop_retention_forgets_session() {
    let result = Scenario::new("abort and drop")
        .seed(6)
        .retention(RetentionPolicy::DropAborted)
        .abort_after(2)
        .oracle(oracle::all_of(vec![
            oracle::aborted(),
            Box::new(|world| {
                if world.session().is_some() {
                    return Err("aborted session should be deleted".into());
                }
                Ok(())
            }),
        ]))
        .run();

    assert!(result.is_ok(), "scenario failed: {:?}", result.err());
}

#[test]
fn event_fields_describe_responder() {
    let result = Scenario::new("event fields")
        .seed(7)
        .oracle(Box::new(|world| {
            let session_id = world.session_id().ok_or("no session")?;
            for event in world.events() {
                let IntroductionEvent::ResponseReceived { contact_id, response } = event;
                let contact = world
                    .introducer()
                    .session(&session_id)
                    .map_err(|e| e.to_string())?
                    .ok_or("session missing")?;
                let side = if *contact_id == contact.contact(Side::First).contact_id { Side::First } else { Side::Second };
                if response.author_id != contact.contact(side).author_id {
                    return Err("event author id does not match responder".into());
                }
                if response.session_id != session_id {
                    return Err("event session id mismatch".into());
                }
            }
            Ok(())
        }))
        .run();

    assert!(result.is_ok(), "scenario failed: {:?}", result.err());
}

#[test]
fn same_seed_replays_identically() {
    let run = |seed| {
        Scenario::new("replay")
            .seed(seed)
            .network(NetworkConfig { duplicate_rate: 0.3, reorder: true })
            .oracle(oracle::settled())
            .run()
            .map(|world| (world.state(), world.received_by_introducer(), world.duplicates(), world.session_id()))
    };

    assert_eq!(run(99), run(99));
}
