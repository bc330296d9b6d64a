//! Outgoing message routing and event publication.

use std::convert::Infallible;

use liaison_core::Envelope;
use liaison_proto::{Dictionary, GroupId};

/// Delivers outgoing messages to the channel they are addressed to.
///
/// Delivery is eventual and at-least-once per channel; nothing may be
/// assumed about ordering across channels.
pub trait ChannelRouter {
    /// Router-specific error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Hand a message to the transport for `channel`.
    fn route(&mut self, channel: GroupId, message: Dictionary) -> Result<(), Self::Error>;
}

/// Publish-only sink for engine events.
pub trait EventSink<E> {
    /// Publish one event.
    fn publish(&mut self, event: E);
}

/// Router that records every message, in routing order.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    sent: Vec<Envelope<Dictionary>>,
}

impl Outbox {
    /// Create an empty outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every routed message.
    pub fn messages(&self) -> &[Envelope<Dictionary>] {
        &self.sent
    }

    /// Messages routed to `channel`.
    pub fn for_channel<'a>(&'a self, channel: &'a GroupId) -> impl Iterator<Item = &'a Dictionary> + 'a {
        self.sent.iter().filter(move |e| e.channel == *channel).map(|e| &e.message)
    }

    /// Remove and return every routed message.
    pub fn drain(&mut self) -> Vec<Envelope<Dictionary>> {
        std::mem::take(&mut self.sent)
    }

    /// Number of routed messages.
    pub fn len(&self) -> usize {
        self.sent.len()
    }

    /// Whether nothing has been routed.
    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }
}

impl ChannelRouter for Outbox {
    type Error = Infallible;

    fn route(&mut self, channel: GroupId, message: Dictionary) -> Result<(), Infallible> {
        self.sent.push(Envelope { channel, message });
        Ok(())
    }
}

/// Sink that records every event.
#[derive(Debug, Clone)]
pub struct EventLog<E> {
    events: Vec<E>,
}

impl<E> Default for EventLog<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> EventLog<E> {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every published event.
    pub fn events(&self) -> &[E] {
        &self.events
    }

    /// Remove and return every published event.
    pub fn drain(&mut self) -> Vec<E> {
        std::mem::take(&mut self.events)
    }
}

impl<E> EventSink<E> for EventLog<E> {
    fn publish(&mut self, event: E) {
        self.events.push(event);
    }
}
