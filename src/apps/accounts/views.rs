use std::sync::Arc;

use async_trait::async_trait;

use softdesk_auth::{JwtAuth, PasswordHasher};
use softdesk_core::{Error, Handler, Method, Request, Response, Result};
use softdesk_db::Database;

use super::models::User;
use super::serializers::{AccessToken, LoginRequest, RefreshRequest, SignupRequest, UserPublic};

/// `POST /signup/`: open registration.
pub struct SignupView {
	db: Database,
	hasher: Arc<dyn PasswordHasher>,
}

impl SignupView {
	pub fn new(db: Database, hasher: Arc<dyn PasswordHasher>) -> Self {
		Self { db, hasher }
	}
}

#[async_trait]
impl Handler for SignupView {
	async fn handle(&self, request: Request) -> Result<Response> {
		if request.method != Method::POST {
			return Ok(Response::method_not_allowed());
		}
		let payload: SignupRequest = request.json()?;
		payload.validate()?;
		if User::by_username(&self.db, &payload.username).await?.is_some() {
			return Err(Error::Conflict(
				"An account with this username already exists.".to_string(),
			));
		}
		let hash = self.hasher.hash(&payload.password)?;
		let user = User::insert(
			&self.db,
			&payload.username,
			&payload.first_name,
			&payload.last_name,
			&payload.email,
			&hash,
		)
		.await?;
		tracing::debug!(user_id = user.id, "account created");
		Response::created().with_json(&UserPublic::from(user))
	}
}

/// `POST /login/`: exchanges credentials for an access/refresh token pair.
pub struct LoginView {
	db: Database,
	hasher: Arc<dyn PasswordHasher>,
	jwt: Arc<JwtAuth>,
}

impl LoginView {
	pub fn new(db: Database, hasher: Arc<dyn PasswordHasher>, jwt: Arc<JwtAuth>) -> Self {
		Self { db, hasher, jwt }
	}
}

fn bad_credentials() -> Error {
	// One message for every failure mode, so callers cannot probe which
	// usernames exist.
	Error::Unauthenticated("No active account found with the given credentials".to_string())
}

#[async_trait]
impl Handler for LoginView {
	async fn handle(&self, request: Request) -> Result<Response> {
		if request.method != Method::POST {
			return Ok(Response::method_not_allowed());
		}
		let payload: LoginRequest = request.json()?;
		let Some(user) = User::by_username(&self.db, &payload.username).await? else {
			return Err(bad_credentials());
		};
		// A stored hash that cannot be parsed never matches.
		let valid = self
			.hasher
			.verify(&payload.password, &user.password)
			.unwrap_or(false);
		if !valid || !user.is_active {
			return Err(bad_credentials());
		}
		let pair = self.jwt.generate_pair(user.id, &user.username)?;
		Response::ok().with_json(&pair)
	}
}

/// `POST /login/refresh/`: mints a fresh access token from a refresh token.
pub struct RefreshView {
	jwt: Arc<JwtAuth>,
}

impl RefreshView {
	pub fn new(jwt: Arc<JwtAuth>) -> Self {
		Self { jwt }
	}
}

#[async_trait]
impl Handler for RefreshView {
	async fn handle(&self, request: Request) -> Result<Response> {
		if request.method != Method::POST {
			return Ok(Response::method_not_allowed());
		}
		let payload: RefreshRequest = request.json()?;
		let claims = self.jwt.verify_refresh(&payload.refresh)?;
		let access = self.jwt.generate_access(claims.user_id()?, &claims.username)?;
		Response::ok().with_json(&AccessToken { access })
	}
}
