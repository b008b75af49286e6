use bytes::Bytes;
use hyper::{HeaderMap, Method, Uri, Version};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::net::SocketAddr;

use crate::exception::{Error, Result};

/// Identity attempting an operation, as resolved by the authentication
/// middleware. Unauthenticated requests carry the anonymous actor; services
/// decide whether anonymity is fatal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
	pub id: i64,
	pub is_authenticated: bool,
	pub is_superuser: bool,
}

impl Actor {
	/// Creates an authenticated actor.
	pub fn authenticated(id: i64, is_superuser: bool) -> Self {
		Self {
			id,
			is_authenticated: true,
			is_superuser,
		}
	}

	/// Creates the anonymous (unauthenticated) actor.
	pub fn anonymous() -> Self {
		Self {
			id: 0,
			is_authenticated: false,
			is_superuser: false,
		}
	}
}

/// HTTP Request representation
///
/// Path parameters are filled in by the router; the actor is attached by the
/// authentication middleware before any view runs.
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	pub path_params: HashMap<String, String>,
	pub query_params: HashMap<String, String>,
	pub remote_addr: Option<SocketAddr>,
	pub actor: Actor,
}

impl Request {
	/// Create a new Request
	///
	/// # Examples
	///
	/// ```
	/// use softdesk_core::Request;
	/// use hyper::{HeaderMap, Method, Uri, Version};
	/// use bytes::Bytes;
	///
	/// let request = Request::new(
	///     Method::GET,
	///     Uri::from_static("/projects/"),
	///     Version::HTTP_11,
	///     HeaderMap::new(),
	///     Bytes::new(),
	/// );
	/// assert_eq!(request.path(), "/projects/");
	/// assert!(!request.actor.is_authenticated);
	/// ```
	pub fn new(
		method: Method,
		uri: Uri,
		version: Version,
		headers: HeaderMap,
		body: Bytes,
	) -> Self {
		let query_params = Self::parse_query_params(&uri);
		Self {
			method,
			uri,
			version,
			headers,
			body,
			path_params: HashMap::new(),
			query_params,
			remote_addr: None,
			actor: Actor::anonymous(),
		}
	}

	fn parse_query_params(uri: &Uri) -> HashMap<String, String> {
		uri.query()
			.map(|q| {
				q.split('&')
					.filter_map(|pair| {
						// Split on first '=' only to preserve '=' in values
						let mut parts = pair.splitn(2, '=');
						Some((
							parts.next()?.to_string(),
							parts.next().unwrap_or("").to_string(),
						))
					})
					.collect()
			})
			.unwrap_or_default()
	}

	/// Get the request path
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Set a path parameter (used by the router for `{param}` extraction)
	pub fn set_path_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.path_params.insert(key.into(), value.into());
	}

	/// Get a path parameter captured by the router
	pub fn path_param(&self, key: &str) -> Option<&str> {
		self.path_params.get(key).map(|v| v.as_str())
	}

	/// Parse a path parameter as an integer primary key.
	///
	/// Returns `NotFound` on a missing or non-numeric segment: a path that
	/// cannot name a row is indistinguishable from one that names no row.
	pub fn id_param(&self, key: &str) -> Result<i64> {
		self.path_param(key)
			.and_then(|v| v.parse::<i64>().ok())
			.ok_or_else(|| Error::NotFound(format!("invalid identifier in path: {}", key)))
	}

	/// Deserialize the request body as JSON.
	///
	/// Malformed JSON and missing required fields are client errors, not
	/// internal ones.
	pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
		serde_json::from_slice(&self.body)
			.map_err(|e| Error::InvalidInput(format!("invalid request body: {}", e)))
	}

	/// Extract the bearer token from the Authorization header, if any
	pub fn bearer_token(&self) -> Option<&str> {
		self.headers
			.get(hyper::header::AUTHORIZATION)
			.and_then(|h| h.to_str().ok())
			.and_then(|v| v.strip_prefix("Bearer "))
			.map(|t| t.trim())
			.filter(|t| !t.is_empty())
	}
}
