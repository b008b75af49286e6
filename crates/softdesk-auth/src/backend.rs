use async_trait::async_trait;

use softdesk_core::Result;

/// Account data the authentication layer needs about a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
	pub id: i64,
	pub username: String,
	pub is_superuser: bool,
	pub is_active: bool,
}

/// Looks up accounts for token verification.
///
/// The middleware asks the backend for the user a token names; a store
/// that answers `Ok(None)` leaves the request anonymous, while an `Err`
/// aborts it.
#[async_trait]
pub trait UserBackend: Send + Sync {
	async fn get_by_id(&self, id: i64) -> Result<Option<AuthUser>>;
}
