//! Simulated channels between the introducer and the introducees.
//!
//! Every channel has two FIFO queues, one per direction. Order is kept
//! within a queue; across queues the next delivery is chosen at random, which
//! is exactly the ordering the protocol may rely on. Duplication re-queues a
//! copy of a delivered message at the back of its own queue.

use std::{
    collections::{BTreeMap, VecDeque},
    convert::Infallible,
};

use liaison_app::ChannelRouter;
use liaison_proto::{Dictionary, GroupId};
use tracing::trace;

use crate::sim_env::SimEnv;

/// Which way a message travels on its channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    /// From the introducer to the contact
    ToIntroducee,
    /// From the contact to the introducer
    ToIntroducer,
}

/// Network behaviour.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Probability that a delivered message is delivered again later
    pub duplicate_rate: f64,
    /// Pick a random non-empty queue each step instead of the first one
    pub reorder: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self { duplicate_rate: 0.0, reorder: true }
    }
}

/// One message taken off the network.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// Channel the message travelled on
    pub channel: GroupId,
    /// Direction of travel
    pub direction: Direction,
    /// The message
    pub message: Dictionary,
    /// Whether this is a duplicate of an earlier delivery
    pub duplicate: bool,
}

struct Queued {
    message: Dictionary,
    duplicate: bool,
}

/// Seeded in-memory network.
pub struct SimNetwork {
    env: SimEnv,
    config: NetworkConfig,
    queues: BTreeMap<(GroupId, Direction), VecDeque<Queued>>,
    delivered: usize,
    duplicated: usize,
}

impl SimNetwork {
    /// Create an empty network.
    pub fn new(env: SimEnv, config: NetworkConfig) -> Self {
        Self { env, config, queues: BTreeMap::new(), delivered: 0, duplicated: 0 }
    }

    /// Queue a message from a contact to the introducer.
    pub fn send_to_introducer(&mut self, channel: GroupId, message: Dictionary) {
        self.enqueue(channel, Direction::ToIntroducer, message);
    }

    /// Take the next message off the network, or `None` once idle.
    pub fn step(&mut self) -> Option<Delivery> {
        let ready: Vec<(GroupId, Direction)> =
            self.queues.iter().filter(|(_, q)| !q.is_empty()).map(|(k, _)| *k).collect();
        if ready.is_empty() {
            return None;
        }

        let index = if self.config.reorder { self.env.pick(ready.len()) } else { 0 };
        let key = ready[index];
        let queue = self.queues.get_mut(&key)?;
        let Queued { message, duplicate } = queue.pop_front()?;

        // Copies are never copied again, so every run terminates.
        if !duplicate && self.env.chance(self.config.duplicate_rate) {
            queue.push_back(Queued { message: message.clone(), duplicate: true });
            self.duplicated += 1;
        }

        self.delivered += 1;
        let (channel, direction) = key;
        trace!(channel = %channel.short(), ?direction, duplicate, "delivering");
        Some(Delivery { channel, direction, message, duplicate })
    }

    /// Whether any message is still in flight.
    pub fn is_idle(&self) -> bool {
        self.queues.values().all(VecDeque::is_empty)
    }

    /// Messages taken off the network so far.
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Duplicates injected so far.
    pub fn duplicated(&self) -> usize {
        self.duplicated
    }

    fn enqueue(&mut self, channel: GroupId, direction: Direction, message: Dictionary) {
        self.queues.entry((channel, direction)).or_default().push_back(Queued { message, duplicate: false });
    }
}

impl ChannelRouter for SimNetwork {
    type Error = Infallible;

    fn route(&mut self, channel: GroupId, message: Dictionary) -> Result<(), Infallible> {
        self.enqueue(channel, Direction::ToIntroducee, message);
        Ok(())
    }
}
