//! Application layer for Liaison
//!
//! The delivery substrate around the pure engines in `liaison-core`: session
//! persistence, channel routing, event publication, and the introducer facade
//! that creates sessions. Everything here is synchronous and generic over the
//! store, router and sink so the same orchestration code runs in production
//! and in the simulation harness.
//!
//! # Components
//!
//! - [`SessionStore`]: Keyed session persistence ([`MemoryStore`] in memory)
//! - [`ChannelRouter`]: Outgoing message delivery ([`Outbox`] records)
//! - [`EventSink`]: Event publication ([`EventLog`] records)
//! - [`Runtime`]: Load, invoke engine, persist, route, publish
//! - [`Introducer`]: Facade that starts, aborts and feeds introductions
//! - [`SystemEnv`]: Wall clock and OS randomness

mod config;
mod env;
mod error;
mod introducer;
mod router;
mod runtime;
mod store;

pub use config::{RetentionPolicy, RuntimeConfig};
pub use env::SystemEnv;
pub use error::RuntimeError;
pub use introducer::Introducer;
pub use router::{ChannelRouter, EventLog, EventSink, Outbox};
pub use runtime::Runtime;
pub use store::{MemoryStore, SessionStore};
