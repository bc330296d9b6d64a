//! World state for scenario execution.
//!
//! The World owns the introducer (whose router is the simulated network),
//! both scripted contacts and the delivery counters oracles inspect.

use liaison_app::{EventLog, Introducer, MemoryStore, RuntimeConfig, RuntimeError};
use liaison_core::{Environment, IntroducerSession, IntroducerState, IntroductionEvent, Side};
use liaison_proto::{GroupId, SessionId};
use tracing::debug;

use crate::{
    introducee::SimIntroducee,
    sim_env::SimEnv,
    sim_network::{Delivery, Direction, NetworkConfig, SimNetwork},
};

/// Introducer wired to the simulation.
pub type SimIntroducer = Introducer<SimEnv, MemoryStore, SimNetwork, EventLog<IntroductionEvent>>;

/// Virtual time that passes per delivery.
const STEP_MILLIS: u64 = 10;

/// All actors and metrics of one run.
pub struct World {
    env: SimEnv,
    introducer: SimIntroducer,
    first: SimIntroducee,
    second: SimIntroducee,
    session_id: Option<SessionId>,
    received_by_introducer: usize,
    received_by_introducees: usize,
    runtime_errors: Vec<String>,
}

impl World {
    /// Create a world with two contacts and no session yet.
    pub fn new(
        env: SimEnv,
        network: NetworkConfig,
        runtime: RuntimeConfig,
        first: SimIntroducee,
        second: SimIntroducee,
    ) -> Self {
        let router = SimNetwork::new(env.clone(), network);
        let introducer = Introducer::new(env.clone(), MemoryStore::new(), router, EventLog::new(), runtime);
        Self {
            env,
            introducer,
            first,
            second,
            session_id: None,
            received_by_introducer: 0,
            received_by_introducees: 0,
            runtime_errors: Vec::new(),
        }
    }

    /// Start the introduction.
    pub fn introduce(&mut self, note: Option<String>) -> Result<SessionId, RuntimeError> {
        let public_key_1 = self.env.random_id().to_vec();
        let public_key_2 = self.env.random_id().to_vec();
        let id = self.introducer.introduce(
            self.first.identity().clone(),
            self.second.identity().clone(),
            public_key_1,
            public_key_2,
            note,
        )?;
        self.session_id = Some(id);
        Ok(id)
    }

    /// Abort the introduction as the local user.
    pub fn abort(&mut self) -> Result<(), RuntimeError> {
        if let Some(id) = self.session_id {
            self.introducer.abort(id)?;
        }
        Ok(())
    }

    /// Deliver one message. Returns false once the network is idle.
    pub fn step(&mut self) -> bool {
        let Some(delivery) = self.introducer.runtime_mut().router_mut().step() else {
            return false;
        };
        self.env.advance(STEP_MILLIS);

        match delivery.direction {
            Direction::ToIntroducee => self.deliver_to_introducee(&delivery),
            Direction::ToIntroducer => self.deliver_to_introducer(&delivery),
        }
        true
    }

    /// Deliver until idle or until `max_steps` deliveries have happened.
    /// Returns the number of deliveries.
    pub fn run_until_idle(&mut self, max_steps: usize) -> usize {
        let mut steps = 0;
        while steps < max_steps && self.step() {
            steps += 1;
        }
        steps
    }

    fn deliver_to_introducee(&mut self, delivery: &Delivery) {
        if let Err(e) = self.introducer.delivered(&delivery.message) {
            self.runtime_errors.push(e.to_string());
        }

        let env = self.env.clone();
        let contact = if delivery.channel == self.first.channel() {
            &mut self.first
        } else if delivery.channel == self.second.channel() {
            &mut self.second
        } else {
            debug!(channel = %delivery.channel.short(), "no contact on channel");
            return;
        };

        self.received_by_introducees += 1;
        let channel = contact.channel();
        let replies = contact.handle(&delivery.message, &env);
        let network = self.introducer.runtime_mut().router_mut();
        for reply in replies {
            network.send_to_introducer(channel, reply);
        }
    }

    fn deliver_to_introducer(&mut self, delivery: &Delivery) {
        self.received_by_introducer += 1;
        if let Err(e) = self.introducer.receive(&delivery.message) {
            debug!(error = %e, duplicate = delivery.duplicate, "introducer rejected delivery");
            self.runtime_errors.push(e.to_string());
        }
    }

    /// The introducer.
    pub fn introducer(&self) -> &SimIntroducer {
        &self.introducer
    }

    /// The contact on one side.
    pub fn introducee(&self, side: Side) -> &SimIntroducee {
        match side {
            Side::First => &self.first,
            Side::Second => &self.second,
        }
    }

    /// Contact owning `channel`.
    pub fn introducee_on(&self, channel: &GroupId) -> Option<&SimIntroducee> {
        [&self.first, &self.second].into_iter().find(|c| c.channel() == *channel)
    }

    /// Id of the introduction, once started.
    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    /// Stored session, if started and still stored.
    pub fn session(&self) -> Option<IntroducerSession> {
        let id = self.session_id?;
        self.introducer.session(&id).ok().flatten()
    }

    /// Stored session state.
    pub fn state(&self) -> Option<IntroducerState> {
        self.session().map(|s| s.state())
    }

    /// Events published by the introducer.
    pub fn events(&self) -> &[IntroductionEvent] {
        self.introducer.runtime().sink().events()
    }

    /// Messages delivered to the introducer.
    pub fn received_by_introducer(&self) -> usize {
        self.received_by_introducer
    }

    /// Messages delivered to the contacts.
    pub fn received_by_introducees(&self) -> usize {
        self.received_by_introducees
    }

    /// Duplicates the network injected.
    pub fn duplicates(&self) -> usize {
        self.introducer.runtime().router().duplicated()
    }

    /// Errors the runtime returned while delivering.
    pub fn runtime_errors(&self) -> &[String] {
        &self.runtime_errors
    }

    /// Whether nothing is left in flight.
    pub fn is_idle(&self) -> bool {
        self.introducer.runtime().router().is_idle()
    }
}
