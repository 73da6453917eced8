//! Error types for the two pipelines.

use thiserror::Error;

/// Shown for transport, status and malformed-body failures, and for backend
/// errors that carry no message of their own.
pub const DEFAULT_CHAT_FAILURE: &str = "Failed to submit query. Try reloading...";
/// Shown when the completion request outlives its timeout.
pub const TIMEOUT_MESSAGE: &str = "Request timed out";

/// Invalid or incomplete startup configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
	/// A required setting is absent or blank.
	#[error("missing graph setting `{0}`")]
	Missing(&'static str),
	/// The URI does not point at the HTTP API.
	#[error("unsupported graph uri scheme `{0}`, expected http or https")]
	UnsupportedScheme(String),
}

/// A failed chat completion round trip.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChatError {
	/// The request never produced a response.
	#[error("request failed: {0}")]
	Transport(String),
	/// Aborted after the configured timeout.
	#[error("request timed out")]
	Timeout,
	/// Non-2xx status.
	#[error("endpoint returned HTTP {0}")]
	Status(u16),
	/// The backend answered with its error envelope.
	#[error("backend reported an error: {}", .0.as_deref().unwrap_or("<no message>"))]
	Backend(Option<String>),
	/// The body could not be decoded.
	#[error("malformed response: {0}")]
	Malformed(String),
}

impl ChatError {
	/// Text appended to the conversation in place of an answer.
	pub fn user_message(&self) -> String {
		match self {
			ChatError::Backend(Some(msg)) if !msg.is_empty() => msg.clone(),
			ChatError::Timeout => TIMEOUT_MESSAGE.to_string(),
			_ => DEFAULT_CHAT_FAILURE.to_string(),
		}
	}
}

/// A failed knowledge graph fetch.
#[derive(Debug, Error)]
pub enum GraphError {
	/// Nothing was sent; the configuration is incomplete.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The request never produced a response.
	#[error("request failed: {0}")]
	Transport(String),
	/// Non-2xx status without a server error body.
	#[error("neo4j returned HTTP {0}")]
	Status(u16),
	/// The server rejected the statement.
	#[error("query failed ({code}): {message}")]
	Query {
		/// Neo4j status code, e.g. `Neo.ClientError.Statement.SyntaxError`.
		code: String,
		/// Human readable description.
		message: String,
	},
	/// The result body could not be decoded.
	#[error("malformed result: {0}")]
	Malformed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn backend_message_is_shown_verbatim() {
		let err = ChatError::Backend(Some("X".into()));
		assert_eq!(err.user_message(), "X");
	}

	#[test]
	fn backend_without_message_uses_default() {
		assert_eq!(ChatError::Backend(None).user_message(), DEFAULT_CHAT_FAILURE);
		assert_eq!(
			ChatError::Backend(Some(String::new())).user_message(),
			DEFAULT_CHAT_FAILURE
		);
	}

	#[test]
	fn transport_and_status_share_generic_text() {
		assert_eq!(
			ChatError::Transport("offline".into()).user_message(),
			DEFAULT_CHAT_FAILURE
		);
		assert_eq!(ChatError::Status(502).user_message(), DEFAULT_CHAT_FAILURE);
		assert_eq!(ChatError::Timeout.user_message(), TIMEOUT_MESSAGE);
	}
}
