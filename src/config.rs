//! Startup configuration.
//!
//! Everything the app needs from its environment is read once, at build
//! time, into an [`AppConfig`] which `App` hands to the component tree
//! through context.

use log::warn;

use crate::error::ConfigError;

/// Fallback chat endpoint used when `PUBMED_CHAT_ENDPOINT` is unset.
pub const DEFAULT_CHAT_ENDPOINT: &str = "http://localhost:5000/check-database";
/// Fallback Neo4j database name.
pub const DEFAULT_DATABASE: &str = "neo4j";

/// Settings for the chat completion endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatConfig {
	/// Full URL the conversation is POSTed to.
	pub endpoint: String,
	/// Bearer credential; the header is left off when `None`.
	pub api_key: Option<String>,
	/// Model name forwarded to the backend; empty lets it choose.
	pub model: String,
	/// Upper bound on the generated reply.
	pub max_tokens: u32,
	/// Sampling temperature.
	pub temperature: f32,
	/// Requests still pending after this long are aborted.
	pub timeout_secs: u32,
}

impl Default for ChatConfig {
	fn default() -> Self {
		Self {
			endpoint: DEFAULT_CHAT_ENDPOINT.into(),
			api_key: None,
			model: String::new(),
			max_tokens: 500,
			temperature: 0.7,
			timeout_secs: 60,
		}
	}
}

/// Settings for the knowledge graph view. None of these have defaults
/// except the database name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphConfig {
	/// Base URL of the Neo4j HTTP API.
	pub uri: Option<String>,
	/// Basic auth user.
	pub user: Option<String>,
	/// Basic auth password.
	pub password: Option<String>,
	/// Cypher statement whose nodes and relationships are drawn.
	pub query: Option<String>,
	/// Database name, `neo4j` when unset.
	pub database: Option<String>,
}

/// A validated graph configuration, ready to open a session with.
#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
	/// Base URL with any trailing slash removed.
	pub base_url: String,
	/// Database the statement runs against.
	pub database: String,
	/// Basic auth user.
	pub user: String,
	/// Basic auth password.
	pub password: String,
	/// Statement to run.
	pub query: String,
}

impl GraphConfig {
	/// Checks that all four required values are present and that the URI
	/// points at the HTTP API.
	pub fn connection(&self) -> Result<Connection, ConfigError> {
		let uri = required(&self.uri, "uri")?;
		let user = required(&self.user, "user")?;
		let password = required(&self.password, "password")?;
		let query = required(&self.query, "query")?;

		let scheme = uri.split_once("://").map(|(s, _)| s).unwrap_or("");
		if !matches!(scheme, "http" | "https") {
			return Err(ConfigError::UnsupportedScheme(scheme.to_string()));
		}

		Ok(Connection {
			base_url: uri.trim_end_matches('/').to_string(),
			database: self
				.database
				.as_deref()
				.map(str::trim)
				.filter(|d| !d.is_empty())
				.unwrap_or(DEFAULT_DATABASE)
				.to_string(),
			user: user.to_string(),
			password: password.to_string(),
			query: query.to_string(),
		})
	}
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ConfigError> {
	value
		.as_deref()
		.map(str::trim)
		.filter(|v| !v.is_empty())
		.ok_or(ConfigError::Missing(name))
}

/// Top-level configuration object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppConfig {
	/// Chat search page settings.
	pub chat: ChatConfig,
	/// Knowledge graph page settings.
	pub graph: GraphConfig,
}

impl AppConfig {
	/// Reads the `PUBMED_*` variables captured when the wasm bundle was built.
	pub fn from_build_env() -> Self {
		Self::from_lookup(|key| {
			let value = match key {
				"PUBMED_CHAT_ENDPOINT" => option_env!("PUBMED_CHAT_ENDPOINT"),
				"PUBMED_CHAT_API_KEY" => option_env!("PUBMED_CHAT_API_KEY"),
				"PUBMED_CHAT_MODEL" => option_env!("PUBMED_CHAT_MODEL"),
				"PUBMED_CHAT_MAX_TOKENS" => option_env!("PUBMED_CHAT_MAX_TOKENS"),
				"PUBMED_CHAT_TEMPERATURE" => option_env!("PUBMED_CHAT_TEMPERATURE"),
				"PUBMED_CHAT_TIMEOUT_SECS" => option_env!("PUBMED_CHAT_TIMEOUT_SECS"),
				"PUBMED_NEO4J_URI" => option_env!("PUBMED_NEO4J_URI"),
				"PUBMED_NEO4J_USER" => option_env!("PUBMED_NEO4J_USER"),
				"PUBMED_NEO4J_PASSWORD" => option_env!("PUBMED_NEO4J_PASSWORD"),
				"PUBMED_NEO4J_QUERY" => option_env!("PUBMED_NEO4J_QUERY"),
				"PUBMED_NEO4J_DATABASE" => option_env!("PUBMED_NEO4J_DATABASE"),
				_ => None,
			};
			value.map(str::to_string)
		})
	}

	/// Builds a config from an arbitrary key lookup.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
		let defaults = ChatConfig::default();
		let chat = ChatConfig {
			endpoint: lookup("PUBMED_CHAT_ENDPOINT").unwrap_or(defaults.endpoint),
			api_key: lookup("PUBMED_CHAT_API_KEY").filter(|k| !k.is_empty()),
			model: lookup("PUBMED_CHAT_MODEL").unwrap_or(defaults.model),
			max_tokens: parsed(&lookup, "PUBMED_CHAT_MAX_TOKENS", defaults.max_tokens),
			temperature: parsed(&lookup, "PUBMED_CHAT_TEMPERATURE", defaults.temperature),
			timeout_secs: parsed(&lookup, "PUBMED_CHAT_TIMEOUT_SECS", defaults.timeout_secs),
		};
		let graph = GraphConfig {
			uri: lookup("PUBMED_NEO4J_URI"),
			user: lookup("PUBMED_NEO4J_USER"),
			password: lookup("PUBMED_NEO4J_PASSWORD"),
			query: lookup("PUBMED_NEO4J_QUERY"),
			database: lookup("PUBMED_NEO4J_DATABASE"),
		};
		Self { chat, graph }
	}
}

fn parsed<T: std::str::FromStr + Copy>(
	lookup: &impl Fn(&str) -> Option<String>,
	key: &str,
	default: T,
) -> T {
	match lookup(key) {
		None => default,
		Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
			warn!("{key}={raw:?} is not a valid value, using the default");
			default
		}),
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;

	fn full_graph() -> GraphConfig {
		GraphConfig {
			uri: Some("http://localhost:7474/".into()),
			user: Some("neo4j".into()),
			password: Some("secret".into()),
			query: Some("MATCH (n)-[r]->(m) RETURN n, r, m LIMIT 50".into()),
			database: None,
		}
	}

	#[test]
	fn complete_graph_config_yields_connection() {
		let conn = full_graph().connection().unwrap();
		assert_eq!(conn.base_url, "http://localhost:7474");
		assert_eq!(conn.database, DEFAULT_DATABASE);
		assert_eq!(conn.user, "neo4j");
	}

	#[test]
	fn missing_password_is_reported_by_name() {
		let cfg = GraphConfig {
			password: None,
			..full_graph()
		};
		assert_eq!(cfg.connection(), Err(ConfigError::Missing("password")));
	}

	#[test]
	fn blank_query_counts_as_missing() {
		let cfg = GraphConfig {
			query: Some("   ".into()),
			..full_graph()
		};
		assert_eq!(cfg.connection(), Err(ConfigError::Missing("query")));
	}

	#[test]
	fn bolt_uri_is_rejected() {
		let cfg = GraphConfig {
			uri: Some("bolt://localhost:7687".into()),
			..full_graph()
		};
		assert_eq!(
			cfg.connection(),
			Err(ConfigError::UnsupportedScheme("bolt".into()))
		);
	}

	#[test]
	fn lookup_overrides_and_bad_numbers_fall_back() {
		let env: HashMap<&str, &str> = HashMap::from([
			("PUBMED_CHAT_API_KEY", "abc"),
			("PUBMED_CHAT_MAX_TOKENS", "lots"),
			("PUBMED_CHAT_TEMPERATURE", "0.2"),
			("PUBMED_NEO4J_DATABASE", "pubmed"),
		]);
		let cfg = AppConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));

		assert_eq!(cfg.chat.endpoint, DEFAULT_CHAT_ENDPOINT);
		assert_eq!(cfg.chat.api_key.as_deref(), Some("abc"));
		assert_eq!(cfg.chat.max_tokens, 500);
		assert_eq!(cfg.chat.temperature, 0.2);
		assert_eq!(cfg.graph.database.as_deref(), Some("pubmed"));
		assert!(cfg.graph.uri.is_none());
	}
}
