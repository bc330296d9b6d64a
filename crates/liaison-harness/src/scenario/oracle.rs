//! Reusable oracles.

use liaison_core::{IntroducerState, IntroductionEvent, Side};

use crate::scenario::{OracleFn, World};

/// The session ended in [`IntroducerState::Finished`] with both contacts
/// having seen the other's answer and an ack.
pub fn finished() -> OracleFn {
    Box::new(|world| {
        expect_state(world, IntroducerState::Finished)?;
        for side in [Side::First, Side::Second] {
            let contact = world.introducee(side);
            if contact.other_response().is_none() {
                return Err(format!("{} never saw the other response", contact.identity().name));
            }
            if contact.acks_received() == 0 {
                return Err(format!("{} never received an ack", contact.identity().name));
            }
        }
        Ok(())
    })
}

/// The session is aborted (or deleted after aborting) and both contacts
/// were told.
pub fn aborted() -> OracleFn {
    Box::new(|world| {
        match world.state() {
            None | Some(IntroducerState::Error) => {},
            Some(other) => return Err(format!("expected ERROR, got {}", other.name())),
        }
        for side in [Side::First, Side::Second] {
            if !world.introducee(side).aborted() {
                return Err(format!("{} was not told about the abort", world.introducee(side).identity().name));
            }
        }
        Ok(())
    })
}

/// The session stopped in `state`.
pub fn stalled_in(state: IntroducerState) -> OracleFn {
    Box::new(move |world| expect_state(world, state))
}

/// The session reached a terminal state; an abort reached both contacts.
pub fn settled() -> OracleFn {
    Box::new(|world| match world.state() {
        Some(IntroducerState::Finished) => Ok(()),
        Some(IntroducerState::Error) | None => aborted()(world),
        Some(other) => Err(format!("session did not settle, stuck in {}", other.name())),
    })
}

/// Every published event reports the answer its sender was scripted to give,
/// and every contact that answered produced at least one event.
pub fn events_match_responses() -> OracleFn {
    Box::new(|world| {
        for event in world.events() {
            let IntroductionEvent::ResponseReceived { contact_id, response } = event;
            let side = if *contact_id == world.introducee(Side::First).identity().contact_id {
                Side::First
            } else {
                Side::Second
            };
            let contact = world.introducee(side);
            if contact.script().silent {
                return Err(format!("event for silent contact {}", contact.identity().name));
            }
            if response.accept != contact.script().accept {
                return Err(format!(
                    "event for {} reports accept={}, script says {}",
                    contact.identity().name,
                    response.accept,
                    contact.script().accept
                ));
            }
            if response.name != world.introducee(side.other()).identity().name {
                return Err(format!("event for {} names {}", contact.identity().name, response.name));
            }
        }

        if world.state() != Some(IntroducerState::Error) {
            for side in [Side::First, Side::Second] {
                let contact = world.introducee(side);
                let expected = contact.identity().contact_id;
                let seen = world.events().iter().any(
                    |IntroductionEvent::ResponseReceived { contact_id, .. }| *contact_id == expected,
                );
                if contact.responded() && !seen {
                    return Err(format!("no event for {}'s response", contact.identity().name));
                }
            }
        }
        Ok(())
    })
}

/// All oracles must pass; the first failure is reported.
pub fn all_of(oracles: Vec<OracleFn>) -> OracleFn {
    Box::new(move |world| oracles.iter().try_for_each(|oracle| oracle(world)))
}

fn expect_state(world: &World, expected: IntroducerState) -> Result<(), String> {
    match world.state() {
        Some(state) if state == expected => Ok(()),
        Some(state) => Err(format!("expected {}, got {}", expected.name(), state.name())),
        None => Err(format!("expected {}, but no session is stored", expected.name())),
    }
}
