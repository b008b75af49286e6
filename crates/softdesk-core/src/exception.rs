use thiserror::Error;

/// Result type used across the workspace
pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy for every SoftDesk operation.
///
/// Each variant carries the human-readable detail that ends up in the
/// response body. Services return these through `?`; only the transport
/// layer turns them into status codes.
#[derive(Debug, Error)]
pub enum Error {
	/// Actor is not authenticated (401)
	#[error("{0}")]
	Unauthenticated(String),

	/// Actor is authenticated but the policy denies the action (403)
	#[error("{0}")]
	Forbidden(String),

	/// A named ancestor or target does not exist, or exists under the
	/// wrong parent (404)
	#[error("{0}")]
	NotFound(String),

	/// Required field missing or malformed (400)
	#[error("{0}")]
	InvalidInput(String),

	/// Uniqueness or state invariant violated (409)
	#[error("{0}")]
	Conflict(String),

	/// Store or serialization fault not caught by pre-validation (500)
	#[error("internal error: {0}")]
	Internal(String),
}

impl Error {
	/// Maps the error kind to its HTTP status code.
	///
	/// # Examples
	///
	/// ```
	/// use softdesk_core::Error;
	///
	/// assert_eq!(Error::NotFound("missing".into()).status_code(), 404);
	/// assert_eq!(Error::Conflict("duplicate".into()).status_code(), 409);
	/// ```
	pub fn status_code(&self) -> u16 {
		match self {
			Error::Unauthenticated(_) => 401,
			Error::Forbidden(_) => 403,
			Error::NotFound(_) => 404,
			Error::InvalidInput(_) => 400,
			Error::Conflict(_) => 409,
			Error::Internal(_) => 500,
		}
	}
}

impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Error::Internal(err.to_string())
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::Internal(err.to_string())
	}
}
