use bytes::Bytes;
use hyper::{HeaderMap, StatusCode};
use serde::Serialize;

use crate::exception::{Error, Result};

/// HTTP Response representation
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	/// Create a new Response with the given status code
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	/// HTTP 200 OK
	///
	/// # Examples
	///
	/// ```
	/// use softdesk_core::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::ok();
	/// assert_eq!(response.status, StatusCode::OK);
	/// ```
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	/// HTTP 201 Created
	pub fn created() -> Self {
		Self::new(StatusCode::CREATED)
	}

	/// HTTP 204 No Content
	pub fn no_content() -> Self {
		Self::new(StatusCode::NO_CONTENT)
	}

	/// HTTP 404 Not Found
	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	/// HTTP 405 Method Not Allowed
	pub fn method_not_allowed() -> Self {
		Self::new(StatusCode::METHOD_NOT_ALLOWED)
	}

	/// HTTP 500 Internal Server Error
	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	/// Set the response body
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Add a header to the response
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let Ok(header_name) = hyper::header::HeaderName::from_bytes(name.as_bytes()) {
			if let Ok(header_value) = hyper::header::HeaderValue::from_str(value) {
				self.headers.insert(header_name, header_value);
			}
		}
		self
	}

	/// Set the response body to JSON and add the Content-Type header
	///
	/// # Examples
	///
	/// ```
	/// use softdesk_core::Response;
	/// use serde_json::json;
	///
	/// let response = Response::ok().with_json(&json!({"detail": "ok"})).unwrap();
	/// assert_eq!(
	///     response.headers.get("content-type").unwrap().to_str().unwrap(),
	///     "application/json"
	/// );
	/// ```
	pub fn with_json<T: Serialize>(mut self, data: &T) -> Result<Self> {
		let json = serde_json::to_vec(data).map_err(|e| Error::Internal(e.to_string()))?;
		self.body = Bytes::from(json);
		self.headers.insert(
			hyper::header::CONTENT_TYPE,
			hyper::header::HeaderValue::from_static("application/json"),
		);
		Ok(self)
	}
}

impl From<Error> for Response {
	fn from(error: Error) -> Self {
		let status =
			StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		let body = serde_json::json!({
			"detail": error.to_string(),
		});

		Response::new(status)
			.with_json(&body)
			.unwrap_or_else(|_| Response::internal_server_error())
	}
}
