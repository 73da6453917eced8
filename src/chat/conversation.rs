use log::{debug, error, info};

use super::types::{ChatAnswer, ChatMessage, ChatRequest, Paper, Role};
use crate::config::ChatConfig;
use crate::error::ChatError;

/// Sent once, ahead of the first user message of a conversation.
pub const PRIMING_PROMPT: &str = "You are the PubMed Connection Specialist. Your purpose is to find papers related to topics that the person communicating with you is asking about. If the query is related to medicine or medical research, use the neo4j database to find answers.";

/// Identifies one submission. Only the most recent ticket of the current
/// generation may fold its response back into the conversation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
	generation: u64,
	sequence: u64,
}

/// A request ready to be sent, with the ticket its result must come back with.
#[derive(Clone, Debug, PartialEq)]
pub struct Outbound {
	/// Must be handed back to [`ConversationState::complete`].
	pub ticket: Ticket,
	/// Body to POST.
	pub request: ChatRequest,
	/// Ticket this submission replaced, whose request should be aborted.
	pub superseded: Option<Ticket>,
}

/// In-memory conversation for one mounted chat view.
#[derive(Clone, Debug, Default)]
pub struct ConversationState {
	messages: Vec<ChatMessage>,
	primed: bool,
	papers: Vec<Paper>,
	generation: u64,
	sequence: u64,
	in_flight: Option<Ticket>,
}

impl ConversationState {
	/// An empty, unprimed conversation.
	pub fn new() -> Self {
		Self::default()
	}

	/// Every message shown so far, oldest first.
	pub fn messages(&self) -> &[ChatMessage] {
		&self.messages
	}

	/// Papers from the last successful answer.
	pub fn papers(&self) -> &[Paper] {
		&self.papers
	}

	/// Whether the priming message has been sent.
	pub fn is_primed(&self) -> bool {
		self.primed
	}

	/// Whether a submission is awaiting its response.
	pub fn is_busy(&self) -> bool {
		self.in_flight.is_some()
	}

	/// Records the user's message and builds the outbound request.
	///
	/// Only the first request of a conversation carries the priming
	/// message; later ones carry the new user message alone, the backend
	/// keeps its own context.
	pub fn submit(&mut self, text: &str, config: &ChatConfig) -> Option<Outbound> {
		if text.trim().is_empty() {
			return None;
		}

		let user = ChatMessage::new(Role::User, text);
		self.messages.push(user.clone());

		let messages = if self.primed {
			vec![user]
		} else {
			self.primed = true;
			vec![ChatMessage::new(Role::System, PRIMING_PROMPT), user]
		};

		self.sequence += 1;
		let ticket = Ticket {
			generation: self.generation,
			sequence: self.sequence,
		};
		let superseded = self.in_flight.replace(ticket);
		if let Some(old) = superseded {
			info!("submission {} superseded by {}", old.sequence, ticket.sequence);
		}

		Some(Outbound {
			ticket,
			request: ChatRequest {
				messages,
				model: config.model.clone(),
				max_tokens: config.max_tokens,
				temperature: config.temperature,
			},
			superseded,
		})
	}

	/// Folds the result of a request back in. Returns false when the ticket
	/// is stale and the result was dropped.
	pub fn complete(&mut self, ticket: Ticket, result: Result<ChatAnswer, ChatError>) -> bool {
		if self.in_flight != Some(ticket) {
			debug!("dropping stale response for submission {}", ticket.sequence);
			return false;
		}
		self.in_flight = None;

		match result {
			Ok(answer) => {
				self.messages
					.push(ChatMessage::new(Role::Assistant, answer.explanation));
				self.papers = answer.papers;
			}
			Err(err) => {
				error!("chat request failed: {err}");
				self.messages
					.push(ChatMessage::new(Role::Assistant, err.user_message()));
			}
		}
		true
	}

	/// Starts a fresh conversation. Returns the in-flight ticket, if any,
	/// so its request can be aborted.
	pub fn reset(&mut self) -> Option<Ticket> {
		self.messages.clear();
		self.papers.clear();
		self.primed = false;
		self.generation += 1;
		self.in_flight.take()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::DEFAULT_CHAT_FAILURE;

	fn paper(title: &str) -> Paper {
		Paper {
			title: title.into(),
			..Paper::default()
		}
	}

	fn answer(text: &str, n: usize) -> ChatAnswer {
		ChatAnswer {
			explanation: text.into(),
			papers: (0..n).map(|i| paper(&format!("p{i}"))).collect(),
		}
	}

	#[test]
	fn empty_input_is_ignored() {
		let mut conv = ConversationState::new();
		assert!(conv.submit("", &ChatConfig::default()).is_none());
		assert!(conv.submit("  \n", &ChatConfig::default()).is_none());
		assert!(conv.messages().is_empty());
		assert!(!conv.is_primed());
	}

	#[test]
	fn first_request_is_primed_later_ones_are_not() {
		let cfg = ChatConfig::default();
		let mut conv = ConversationState::new();

		let first = conv.submit("find articles about cancer", &cfg).unwrap();
		assert_eq!(conv.messages().len(), 1);
		assert_eq!(conv.messages()[0].role, Role::User);
		assert_eq!(first.request.messages.len(), 2);
		assert_eq!(first.request.messages[0].role, Role::System);
		assert_eq!(first.request.messages[0].content, PRIMING_PROMPT);
		assert_eq!(first.request.max_tokens, 500);
		assert_eq!(first.request.temperature, 0.7);
		conv.complete(first.ticket, Ok(answer("ok", 0)));

		let second = conv.submit("and diabetes?", &cfg).unwrap();
		assert_eq!(second.request.messages, vec![ChatMessage::new(Role::User, "and diabetes?")]);
		assert_eq!(conv.messages().len(), 3);
	}

	#[test]
	fn success_replaces_papers_wholesale() {
		let cfg = ChatConfig::default();
		let mut conv = ConversationState::new();

		let out = conv.submit("a", &cfg).unwrap();
		conv.complete(out.ticket, Ok(answer("three", 3)));
		let out = conv.submit("b", &cfg).unwrap();
		conv.complete(out.ticket, Ok(answer("one", 1)));

		assert_eq!(conv.papers().len(), 1);
		assert_eq!(conv.messages().last().unwrap().content, "one");
		assert!(!conv.is_busy());
	}

	#[test]
	fn failure_keeps_papers_and_reports() {
		let cfg = ChatConfig::default();
		let mut conv = ConversationState::new();

		let out = conv.submit("a", &cfg).unwrap();
		conv.complete(out.ticket, Ok(answer("two", 2)));
		let out = conv.submit("b", &cfg).unwrap();
		conv.complete(out.ticket, Err(ChatError::Status(500)));

		assert_eq!(conv.papers().len(), 2);
		let last = conv.messages().last().unwrap();
		assert_eq!(last.role, Role::Assistant);
		assert_eq!(last.content, DEFAULT_CHAT_FAILURE);
	}

	#[test]
	fn reset_is_idempotent_and_unprimes() {
		let cfg = ChatConfig::default();
		let mut conv = ConversationState::new();
		let out = conv.submit("a", &cfg).unwrap();
		conv.complete(out.ticket, Ok(answer("x", 2)));

		conv.reset();
		conv.reset();
		assert!(conv.messages().is_empty());
		assert!(conv.papers().is_empty());
		assert!(!conv.is_primed());

		let again = conv.submit("b", &cfg).unwrap();
		assert_eq!(again.request.messages[0].role, Role::System);
	}

	#[test]
	fn response_after_reset_is_dropped() {
		let cfg = ChatConfig::default();
		let mut conv = ConversationState::new();
		let out = conv.submit("a", &cfg).unwrap();

		assert_eq!(conv.reset(), Some(out.ticket));
		assert!(!conv.complete(out.ticket, Ok(answer("late", 4))));
		assert!(conv.messages().is_empty());
		assert!(conv.papers().is_empty());
	}

	#[test]
	fn newer_submission_supersedes_older() {
		let cfg = ChatConfig::default();
		let mut conv = ConversationState::new();
		let first = conv.submit("a", &cfg).unwrap();
		let second = conv.submit("b", &cfg).unwrap();
		assert_eq!(second.superseded, Some(first.ticket));

		assert!(conv.complete(second.ticket, Ok(answer("for b", 1))));
		assert!(!conv.complete(first.ticket, Ok(answer("for a", 5))));

		assert_eq!(conv.papers().len(), 1);
		let contents: Vec<_> = conv.messages().iter().map(|m| m.content.as_str()).collect();
		assert_eq!(contents, ["a", "b", "for b"]);
	}
}
