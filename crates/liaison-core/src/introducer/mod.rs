//! The introducer's side of the introduction protocol.
//!
//! The introducer sends a request to each of two contacts, relays each
//! contact's response to the other, then relays each contact's ack to the
//! other. It never decides the outcome: accept/decline is only bookkept and
//! forwarded.
//!
//! # State Machine
//!
//! ```text
//! ┌──────────────────┐ LocalRequest ┌─────────────────┐
//! │ PrepareRequests  │─────────────>│ AwaitResponses  │
//! └──────────────────┘              └─────────────────┘
//!                          response 1 │           │ response 2
//!                                     ↓           ↓
//!                       ┌────────────────┐ ┌────────────────┐
//!                       │ AwaitResponse2 │ │ AwaitResponse1 │
//!                       └────────────────┘ └────────────────┘
//!                          response 2 │           │ response 1
//!                                     ↓           ↓
//!                                 ┌─────────────────┐
//!                                 │    AwaitAcks    │
//!                                 └─────────────────┘
//!                               ack 1 │           │ ack 2
//!                                     ↓           ↓
//!                           ┌───────────┐     ┌───────────┐
//!                           │ AwaitAck2 │     │ AwaitAck1 │
//!                           └───────────┘     └───────────┘
//!                               ack 2 │           │ ack 1
//!                                     ↓           ↓
//!                                 ┌─────────────────┐
//!                                 │    Finished     │ (late responses stored)
//!                                 └─────────────────┘
//!
//!   any state ── abort / invalid input ──> Error (absorbing)
//! ```

mod action;
mod engine;
mod event;
mod local;
mod session;
mod state;

pub use action::{IntroducerAction, Side};
pub use engine::IntroducerEngine;
pub use event::{IntroductionEvent, IntroductionResponse};
pub use local::LocalAction;
pub use session::{Introducee, IntroducerSession};
pub use state::IntroducerState;
