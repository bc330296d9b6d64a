//! Deterministic simulation harness for Liaison protocol testing.
//!
//! Seeded implementations of the environment and channel router, scripted
//! introducees, and a scenario framework with mandatory oracles. A run is a
//! pure function of its seed: the same seed replays the same delivery order,
//! the same duplicates and the same identifiers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod introducee;
pub mod scenario;
pub mod sim_env;
pub mod sim_network;

pub use introducee::{IntroduceeScript, SimIntroducee};
pub use sim_env::SimEnv;
pub use sim_network::{Delivery, Direction, NetworkConfig, SimNetwork};
