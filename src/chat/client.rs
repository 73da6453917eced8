use std::pin::pin;

use futures::future::{Either, select};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use log::{debug, error};

use super::types::{ChatAnswer, ChatRequest, ChatResponse};
use crate::abort::AbortHandle;
use crate::config::ChatConfig;
use crate::error::ChatError;

/// Something that can answer a chat request.
#[allow(async_fn_in_trait)]
pub trait CompletionClient {
	/// Sends one request. Implementations should stop early once `abort` fires.
	async fn complete(&self, request: &ChatRequest, abort: &AbortHandle) -> Result<ChatAnswer, ChatError>;
}

/// Talks to the search backend over `fetch`.
#[derive(Clone, Debug)]
pub struct HttpCompletionClient {
	endpoint: String,
	api_key: Option<String>,
	timeout_ms: u32,
}

impl HttpCompletionClient {
	/// Copies the endpoint, credential and timeout out of `config`.
	pub fn new(config: &ChatConfig) -> Self {
		Self {
			endpoint: config.endpoint.clone(),
			api_key: config.api_key.clone(),
			timeout_ms: config.timeout_secs.saturating_mul(1000),
		}
	}

	async fn post(&self, request: &ChatRequest, abort: &AbortHandle) -> Result<ChatAnswer, ChatError> {
		if abort.is_aborted() {
			return Err(ChatError::Transport("aborted before sending".into()));
		}
		let signal = abort.signal();
		let mut builder = Request::post(&self.endpoint)
			.header("Accept", "application/json")
			.abort_signal(signal.as_ref());
		if let Some(key) = &self.api_key {
			builder = builder.header("Authorization", &format!("Bearer {key}"));
		}
		let outgoing = builder
			.json(request)
			.map_err(|e| ChatError::Transport(e.to_string()))?;

		let response = outgoing
			.send()
			.await
			.map_err(|e| ChatError::Transport(e.to_string()))?;
		if !response.ok() {
			error!("HTTP error: {} from {}", response.status(), self.endpoint);
			return Err(ChatError::Status(response.status()));
		}

		let body = response
			.text()
			.await
			.map_err(|e| ChatError::Transport(e.to_string()))?;
		debug!("chat response: {body}");
		ChatResponse::parse(&body)
	}
}

impl CompletionClient for HttpCompletionClient {
	async fn complete(&self, request: &ChatRequest, abort: &AbortHandle) -> Result<ChatAnswer, ChatError> {
		let post = pin!(self.post(request, abort));
		let timer = pin!(TimeoutFuture::new(self.timeout_ms));
		match select(post, timer).await {
			Either::Left((result, _)) => result,
			Either::Right(((), _)) => {
				error!("Fetch error: Operation timed out");
				abort.abort();
				Err(ChatError::Timeout)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use futures::executor::block_on;

	use super::*;
	use crate::chat::{ConversationState, Paper, Role};

	/// Records what it was asked and replies with a canned result.
	struct CannedClient {
		reply: Result<ChatAnswer, ChatError>,
		seen: RefCell<Vec<ChatRequest>>,
	}

	impl CompletionClient for CannedClient {
		async fn complete(&self, request: &ChatRequest, _: &AbortHandle) -> Result<ChatAnswer, ChatError> {
			self.seen.borrow_mut().push(request.clone());
			self.reply.clone()
		}
	}

	#[test]
	fn cancer_search_round_trip() {
		let client = CannedClient {
			reply: Ok(ChatAnswer {
				explanation: "Found 2 papers".into(),
				papers: vec![Paper::default(), Paper::default()],
			}),
			seen: RefCell::default(),
		};
		let mut conv = ConversationState::new();

		let out = conv
			.submit("find articles about cancer", &ChatConfig::default())
			.unwrap();
		assert_eq!(conv.messages().len(), 1);

		let result = block_on(client.complete(&out.request, &AbortHandle::default()));
		assert!(conv.complete(out.ticket, result));

		let seen = client.seen.borrow();
		assert_eq!(seen.len(), 1);
		let body = serde_json::to_value(&seen[0]).unwrap();
		assert_eq!(body["messages"].as_array().unwrap().len(), 2);
		assert_eq!(body["max_tokens"], 500);
		assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);

		let last = conv.messages().last().unwrap();
		assert_eq!(last.role, Role::Assistant);
		assert_eq!(last.content, "Found 2 papers");
		assert_eq!(conv.papers().len(), 2);
	}

	#[test]
	fn backend_error_surfaces_its_message() {
		let client = CannedClient {
			reply: Err(ChatError::Backend(Some("X".into()))),
			seen: RefCell::default(),
		};
		let mut conv = ConversationState::new();
		let out = conv.submit("hello", &ChatConfig::default()).unwrap();
		let result = block_on(client.complete(&out.request, &AbortHandle::default()));
		conv.complete(out.ticket, result);

		assert_eq!(conv.messages().last().unwrap().content, "X");
		assert!(conv.papers().is_empty());
	}

	#[test]
	fn aborted_handle_never_sends() {
		let client = HttpCompletionClient::new(&ChatConfig::default());
		let abort = AbortHandle::default();
		abort.abort();
		let request = ChatRequest {
			messages: Vec::new(),
			model: String::new(),
			max_tokens: 500,
			temperature: 0.7,
		};
		let result = block_on(client.post(&request, &abort));
		assert!(matches!(result, Err(ChatError::Transport(_))));
	}

	#[test]
	fn timeout_is_converted_to_milliseconds() {
		let cfg = ChatConfig {
			timeout_secs: 5,
			api_key: Some("k".into()),
			..ChatConfig::default()
		};
		let client = HttpCompletionClient::new(&cfg);
		assert_eq!(client.timeout_ms, 5000);
		assert_eq!(client.api_key.as_deref(), Some("k"));
	}
}
