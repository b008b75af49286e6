use std::sync::Arc;

use async_trait::async_trait;

use softdesk_core::{Actor, Handler, Middleware, Request, Response, Result};

use crate::backend::UserBackend;
use crate::jwt::JwtAuth;

/// Resolves the request actor from the `Authorization: Bearer <token>` header.
///
/// A missing, malformed or expired token yields the anonymous actor rather
/// than an error; whether anonymity is acceptable is decided per operation,
/// not here. Only a failing user lookup aborts the request.
pub struct AuthenticationMiddleware {
	jwt: Arc<JwtAuth>,
	backend: Arc<dyn UserBackend>,
}

impl AuthenticationMiddleware {
	pub fn new(jwt: Arc<JwtAuth>, backend: Arc<dyn UserBackend>) -> Self {
		Self { jwt, backend }
	}

	async fn resolve_actor(&self, request: &Request) -> Result<Actor> {
		let Some(token) = request.bearer_token() else {
			return Ok(Actor::anonymous());
		};
		let Ok(claims) = self.jwt.verify_access(token) else {
			return Ok(Actor::anonymous());
		};
		let Ok(user_id) = claims.user_id() else {
			return Ok(Actor::anonymous());
		};
		// Tokens outlive accounts; a deleted or deactivated user is anonymous.
		let Some(user) = self.backend.get_by_id(user_id).await? else {
			return Ok(Actor::anonymous());
		};
		if !user.is_active {
			return Ok(Actor::anonymous());
		}
		Ok(Actor::authenticated(user.id, user.is_superuser))
	}
}

#[async_trait]
impl Middleware for AuthenticationMiddleware {
	async fn process(&self, mut request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		request.actor = self.resolve_actor(&request).await?;
		next.handle(request).await
	}
}
