//! Scenario builder API.
//!
//! Provides a declarative API for constructing introduction scenarios that
//! enforce the oracle pattern.

use liaison_app::{RetentionPolicy, RuntimeConfig};
use liaison_proto::ContactId;

use crate::{
    introducee::{IntroduceeScript, SimIntroducee},
    scenario::{OracleFn, World},
    sim_env::SimEnv,
    sim_network::NetworkConfig,
};

const DEFAULT_MAX_STEPS: usize = 10_000;

/// Scenario builder.
///
/// Configure the contacts, network and seed, then call `.oracle()` to get a
/// [`RunnableScenario`].
pub struct Scenario {
    name: String,
    seed: u64,
    first: (String, IntroduceeScript),
    second: (String, IntroduceeScript),
    network: NetworkConfig,
    runtime: RuntimeConfig,
    note: Option<String>,
    abort_after: Option<usize>,
    max_steps: usize,
}

impl Scenario {
    /// Create a scenario where two accepting contacts are introduced.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            seed: 0,
            first: ("alice".to_string(), IntroduceeScript::accept()),
            second: ("bob".to_string(), IntroduceeScript::accept()),
            network: NetworkConfig::default(),
            runtime: RuntimeConfig::default(),
            note: None,
            abort_after: None,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Seed for every random choice in the run.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Name and script of the first contact.
    pub fn first(mut self, name: impl Into<String>, script: IntroduceeScript) -> Self {
        self.first = (name.into(), script);
        self
    }

    /// Name and script of the second contact.
    pub fn second(mut self, name: impl Into<String>, script: IntroduceeScript) -> Self {
        self.second = (name.into(), script);
        self
    }

    /// Network behaviour.
    pub fn network(mut self, network: NetworkConfig) -> Self {
        self.network = network;
        self
    }

    /// Session retention.
    pub fn retention(mut self, retention: RetentionPolicy) -> Self {
        self.runtime.retention = retention;
        self
    }

    /// Note sent with both requests.
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Abort as the local user after this many deliveries.
    pub fn abort_after(mut self, deliveries: usize) -> Self {
        self.abort_after = Some(deliveries);
        self
    }

    /// Upper bound on deliveries.
    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the oracle function and return a runnable scenario.
    ///
    /// The oracle is mandatory - a scenario cannot run without verification.
    pub fn oracle(self, oracle: OracleFn) -> RunnableScenario {
        RunnableScenario { scenario: self, oracle }
    }
}

/// A scenario with an oracle function that can be executed.
pub struct RunnableScenario {
    scenario: Scenario,
    oracle: OracleFn,
}

impl RunnableScenario {
    /// Execute the scenario.
    ///
    /// Starts the introduction, delivers messages until the network is idle
    /// (aborting at the configured point, if any), then runs the oracle.
    /// Returns the final world so callers can report on it.
    pub fn run(self) -> Result<World, String> {
        let Scenario { name, seed, first, second, network, runtime, note, abort_after, max_steps } =
            self.scenario;

        let env = SimEnv::with_seed(seed);
        let first = SimIntroducee::new(&env, ContactId(1), first.0, first.1);
        let second = SimIntroducee::new(&env, ContactId(2), second.0, second.1);
        let mut world = World::new(env, network, runtime, first, second);

        world.introduce(note).map_err(|e| format!("Scenario '{name}' (seed {seed}): introduce failed: {e}"))?;

        let mut steps = 0;
        loop {
            if abort_after == Some(steps) {
                world.abort().map_err(|e| format!("Scenario '{name}' (seed {seed}): abort failed: {e}"))?;
            }
            if steps >= max_steps || !world.step() {
                break;
            }
            steps += 1;
        }

        if !world.is_idle() {
            return Err(format!("Scenario '{name}' (seed {seed}): still busy after {max_steps} deliveries"));
        }

        (self.oracle)(&world).map_err(|e| format!("Scenario '{name}' (seed {seed}): {e}"))?;
        Ok(world)
    }
}
