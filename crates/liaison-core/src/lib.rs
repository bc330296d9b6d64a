//! Liaison protocol core logic
//!
//! Pure state machine logic for mediated contact introductions, completely
//! decoupled from I/O. This enables deterministic testing of every delivery
//! interleaving the network can produce.
//!
//! # Architecture
//!
//! Protocol logic in this crate is implemented as deterministic state
//! machines that are isolated from I/O, storage, time, randomness and
//! scheduling. A [`ProtocolEngine`] maps (current session, one input) to a
//! [`StateUpdate`]: the new session value, the messages to send (each tagged
//! with its channel) and the events to publish. The engine never executes
//! any of these itself.
//!
//! A runtime or test harness is responsible for serializing calls per
//! session, persisting the returned session, routing messages and
//! publishing events.
//!
//! # Components
//!
//! - [`engine`]: Generic engine contract and state updates
//! - [`introducer`]: The introducer's side of the introduction protocol
//! - [`mod@env`]: Environment abstraction (time, RNG)
//! - [`error`]: Engine error types

pub mod engine;
pub mod env;
pub mod error;
pub mod introducer;

pub use engine::{EngineUpdate, Envelope, ProtocolEngine, SessionState, StateUpdate};
pub use env::Environment;
pub use error::EngineError;
pub use introducer::{
    Introducee, IntroducerAction, IntroducerEngine, IntroducerSession, IntroducerState,
    IntroductionEvent, IntroductionResponse, LocalAction, Side,
};
