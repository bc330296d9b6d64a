//! Scenario framework with mandatory oracles.
//!
//! A [`Scenario`] describes the two contacts, the network and the seed. It
//! only becomes runnable once an oracle is attached, so every run ends with
//! an explicit check of the final [`World`].
//!
//! ```text
//! Scenario ──.oracle()──> RunnableScenario ──.run()──> World ──oracle──> Ok / Err
//! ```

mod builder;
pub mod oracle;
mod world;

pub use builder::{RunnableScenario, Scenario};
pub use world::{SimIntroducer, World};

/// Verifies the final world state. `Err` carries a human-readable reason.
pub type OracleFn = Box<dyn Fn(&World) -> Result<(), String>>;
