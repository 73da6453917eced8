use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ChatError;

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	/// Priming instructions.
	System,
	/// The person searching.
	User,
	/// Backend answers and failure notices.
	Assistant,
}

/// One entry of the conversation, also the wire shape of an outbound message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
	/// Author.
	pub role: Role,
	/// Message text.
	pub content: String,
}

impl ChatMessage {
	/// Builds a message from any string-like content.
	pub fn new(role: Role, content: impl Into<String>) -> Self {
		Self {
			role,
			content: content.into(),
		}
	}
}

/// A paper citation returned by the search backend.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Paper {
	/// Article title.
	#[serde(default, deserialize_with = "null_as_default")]
	pub title: String,
	/// Author names joined with ", ".
	#[serde(default, deserialize_with = "string_or_list")]
	pub authors: String,
	/// Abstract text; empty for articles indexed without one.
	#[serde(default, rename = "abstract", deserialize_with = "null_as_default")]
	pub abstract_text: String,
	/// PubMed identifier, when the backend knows it.
	#[serde(default, deserialize_with = "optional_id")]
	pub pmid: Option<String>,
	/// MeSH or author keywords.
	#[serde(default, deserialize_with = "null_as_default")]
	pub keywords: Vec<String>,
}

impl Paper {
	/// Link to the article on PubMed, if its id is known.
	pub fn pubmed_url(&self) -> Option<String> {
		self.pmid
			.as_ref()
			.map(|id| format!("https://pubmed.ncbi.nlm.nih.gov/{id}/"))
	}
}

/// Body POSTed to the completion endpoint.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatRequest {
	/// Outbound messages, priming first on a fresh conversation.
	pub messages: Vec<ChatMessage>,
	/// Model name, empty for the backend default.
	pub model: String,
	/// Upper bound on the generated reply.
	pub max_tokens: u32,
	/// Sampling temperature.
	pub temperature: f32,
}

/// The useful part of a successful reply.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ChatAnswer {
	/// Assistant text appended to the conversation.
	#[serde(default, deserialize_with = "null_as_default")]
	pub explanation: String,
	/// Papers backing the explanation; replaces the shown list.
	#[serde(default, deserialize_with = "null_as_default")]
	pub papers: Vec<Paper>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponsePayload {
	Answer(ChatAnswer),
	Text(String),
}

/// Raw reply envelope. The backend signals failure either with
/// `error: true` or with `status: "error"` and a text `response`.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
	#[serde(default)]
	error: Option<bool>,
	#[serde(default)]
	error_message: Option<String>,
	#[serde(default)]
	status: Option<String>,
	#[serde(default)]
	response: Option<ResponsePayload>,
}

impl ChatResponse {
	/// Classifies a decoded reply into an answer or an application error.
	pub fn into_result(self) -> Result<ChatAnswer, ChatError> {
		let failed = self.error.unwrap_or(false) || self.status.as_deref() == Some("error");
		if failed {
			let message = self.error_message.or(match self.response {
				Some(ResponsePayload::Text(text)) => Some(text),
				_ => None,
			});
			return Err(ChatError::Backend(message));
		}

		match self.response {
			Some(ResponsePayload::Answer(answer)) => Ok(answer),
			// "No papers found" style replies carry only text.
			Some(ResponsePayload::Text(text)) => Ok(ChatAnswer {
				explanation: text,
				papers: Vec::new(),
			}),
			None => Err(ChatError::Malformed("missing `response` field".into())),
		}
	}

	/// Decodes and classifies a response body.
	pub fn parse(body: &str) -> Result<ChatAnswer, ChatError> {
		serde_json::from_str::<ChatResponse>(body)
			.map_err(|e| ChatError::Malformed(e.to_string()))?
			.into_result()
	}
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Option::<T>::deserialize(de).map(Option::unwrap_or_default)
}

fn string_or_list<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Authors {
		One(String),
		Many(Vec<String>),
		Nothing(()),
	}
	Ok(match Authors::deserialize(de)? {
		Authors::One(s) => s,
		Authors::Many(list) => list.join(", "),
		Authors::Nothing(()) => String::new(),
	})
}

fn optional_id<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
	Ok(match serde_json::Value::deserialize(de)? {
		serde_json::Value::String(s) if !s.is_empty() => Some(s),
		serde_json::Value::Number(n) => Some(n.to_string()),
		_ => None,
	})
}
