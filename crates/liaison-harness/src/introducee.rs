//! Scripted introducee.
//!
//! Plays one contact just well enough to drive the introducer: it answers
//! the request according to its script and acknowledges once it has both
//! answered and seen the other contact's answer.

use liaison_core::{Environment, Introducee};
use liaison_proto::{
    Ack, AuthorId, ContactId, Dictionary, GroupId, IntroductionMessage, MessageId, Request, Response, SessionId,
};
use tracing::{debug, warn};

use crate::sim_env::SimEnv;

/// How a scripted introducee behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntroduceeScript {
    /// Answer to the introduction request
    pub accept: bool,
    /// Never answer at all
    pub silent: bool,
}

impl IntroduceeScript {
    /// Accept the introduction.
    pub const fn accept() -> Self {
        Self { accept: true, silent: false }
    }

    /// Decline the introduction.
    pub const fn decline() -> Self {
        Self { accept: false, silent: false }
    }

    /// Ignore the request.
    pub const fn silent() -> Self {
        Self { accept: false, silent: true }
    }
}

impl Default for IntroduceeScript {
    fn default() -> Self {
        Self::accept()
    }
}

/// A simulated contact on one channel.
#[derive(Debug, Clone)]
pub struct SimIntroducee {
    identity: Introducee,
    script: IntroduceeScript,
    request: Option<Request>,
    sent_response: Option<MessageId>,
    other_response: Option<bool>,
    acked: bool,
    acks_received: usize,
    aborted: bool,
    ignored: usize,
}

impl SimIntroducee {
    /// Create a contact with a random identity on a random channel.
    pub fn new(env: &SimEnv, contact_id: ContactId, name: impl Into<String>, script: IntroduceeScript) -> Self {
        let identity = Introducee {
            contact_id,
            author_id: AuthorId::new(env.random_id()),
            name: name.into(),
            group_id: GroupId::new(env.random_id()),
        };
        Self {
            identity,
            script,
            request: None,
            sent_response: None,
            other_response: None,
            acked: false,
            acks_received: 0,
            aborted: false,
            ignored: 0,
        }
    }

    /// Identity as the introducer knows it.
    pub fn identity(&self) -> &Introducee {
        &self.identity
    }

    /// Channel to the introducer.
    pub fn channel(&self) -> GroupId {
        self.identity.group_id
    }

    /// Script this contact follows.
    pub fn script(&self) -> IntroduceeScript {
        self.script
    }

    /// Request received from the introducer.
    pub fn request(&self) -> Option<&Request> {
        self.request.as_ref()
    }

    /// Whether this contact has answered.
    pub fn responded(&self) -> bool {
        self.sent_response.is_some()
    }

    /// The other contact's answer, once relayed.
    pub fn other_response(&self) -> Option<bool> {
        self.other_response
    }

    /// Whether this contact has sent its ack.
    pub fn acked(&self) -> bool {
        self.acked
    }

    /// Acks relayed from the other contact.
    pub fn acks_received(&self) -> usize {
        self.acks_received
    }

    /// Whether an abort arrived.
    pub fn aborted(&self) -> bool {
        self.aborted
    }

    /// Messages dropped as duplicate, unexpected or malformed.
    pub fn ignored(&self) -> usize {
        self.ignored
    }

    /// Handle one message from the introducer, returning the replies.
    pub fn handle(&mut self, message: &Dictionary, env: &SimEnv) -> Vec<Dictionary> {
        let message = match IntroductionMessage::from_dictionary(message) {
            Ok(message) => message,
            Err(e) => {
                warn!(contact = %self.identity.contact_id, error = %e, "dropping malformed message");
                self.ignored += 1;
                return Vec::new();
            },
        };

        if self.aborted {
            self.ignored += 1;
            return Vec::new();
        }

        match message {
            IntroductionMessage::Request(request) => self.on_request(request, env),
            IntroductionMessage::Response(response) => {
                if self.other_response.is_none() {
                    self.other_response = Some(response.accept);
                } else {
                    self.ignored += 1;
                }
                self.maybe_ack(env).into_iter().collect()
            },
            IntroductionMessage::Ack(_) => {
                self.acks_received += 1;
                Vec::new()
            },
            IntroductionMessage::Abort(_) => {
                debug!(contact = %self.identity.contact_id, "introduction aborted");
                self.aborted = true;
                Vec::new()
            },
        }
    }

    fn on_request(&mut self, request: Request, env: &SimEnv) -> Vec<Dictionary> {
        if self.request.is_some() {
            self.ignored += 1;
            return Vec::new();
        }
        let session_id = request.session_id;
        self.request = Some(request);

        if self.script.silent {
            debug!(contact = %self.identity.contact_id, "staying silent");
            return Vec::new();
        }

        let message_id = MessageId::new(env.random_id());
        self.sent_response = Some(message_id);
        let response = Response {
            session_id,
            group_id: self.identity.group_id,
            message_id,
            timestamp: env.now_millis(),
            accept: self.script.accept,
        };

        let mut replies = vec![response.to_dictionary()];
        replies.extend(self.maybe_ack(env));
        replies
    }

    fn maybe_ack(&mut self, env: &SimEnv) -> Option<Dictionary> {
        if self.acked || self.sent_response.is_none() || self.other_response.is_none() {
            return None;
        }
        let session_id: SessionId = self.request.as_ref()?.session_id;
        self.acked = true;
        let ack = Ack { session_id, group_id: self.identity.group_id, message_id: MessageId::new(env.random_id()) };
        Some(ack.to_dictionary())
    }
}

#[cfg(test)]
mod tests {
    use liaison_proto::{Abort, MessageType, keys};

    use super::*;

    fn request_for(contact: &SimIntroducee) -> Dictionary {
        Request {
            session_id: SessionId::new([9; 32]),
            group_id: contact.channel(),
            name: "other".into(),
            public_key: vec![1; 32],
            note: None,
        }
        .to_dictionary()
    }

    fn kind(dict: &Dictionary) -> i64 {
        dict.get_long(keys::TYPE).unwrap()
    }

    #[test]
    fn answers_then_acks_after_other_response() {
        let env = SimEnv::with_seed(1);
        let mut contact = SimIntroducee::new(&env, ContactId(1), "alice", IntroduceeScript::decline());

        let replies = contact.handle(&request_for(&contact), &env);
        assert_eq!(replies.len(), 1);
        assert_eq!(kind(&replies[0]), MessageType::Response.value());
        assert!(!replies[0].get_bool(keys::ACCEPT).unwrap());

        let other = Response {
            session_id: SessionId::new([9; 32]),
            group_id: contact.channel(),
            message_id: MessageId::new([4; 32]),
            timestamp: 0,
            accept: true,
        };
        let replies = contact.handle(&other.to_dictionary(), &env);
        assert_eq!(replies.len(), 1);
        assert_eq!(kind(&replies[0]), MessageType::Ack.value());
        assert_eq!(contact.other_response(), Some(true));

        // A relayed duplicate does not produce a second ack.
        assert!(contact.handle(&other.to_dictionary(), &env).is_empty());
        assert!(contact.acked());
    }

    #[test]
    fn silent_contact_never_answers() {
        let env = SimEnv::with_seed(2);
        let mut contact = SimIntroducee::new(&env, ContactId(2), "bob", IntroduceeScript::silent());
        assert!(contact.handle(&request_for(&contact), &env).is_empty());
        assert!(!contact.responded());
    }

    #[test]
    fn abort_silences_contact() {
        let env = SimEnv::with_seed(3);
        let mut contact = SimIntroducee::new(&env, ContactId(3), "carol", IntroduceeScript::accept());
        let abort = Abort { session_id: SessionId::new([9; 32]), group_id: contact.channel() };
        contact.handle(&abort.to_dictionary(), &env);
        assert!(contact.aborted());
        assert!(contact.handle(&request_for(&contact), &env).is_empty());
    }
}
