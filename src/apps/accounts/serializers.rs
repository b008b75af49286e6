use serde::{Deserialize, Serialize};

use softdesk_core::{Error, Result};

use super::models::User;

fn not_blank(field: &str, value: &str) -> Result<()> {
	if value.trim().is_empty() {
		return Err(Error::InvalidInput(format!(
			"This field may not be blank: {field}."
		)));
	}
	Ok(())
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
	pub username: String,
	pub first_name: String,
	pub last_name: String,
	pub email: String,
	pub password: String,
}

impl SignupRequest {
	pub fn validate(&self) -> Result<()> {
		not_blank("username", &self.username)?;
		not_blank("first_name", &self.first_name)?;
		not_blank("last_name", &self.last_name)?;
		not_blank("email", &self.email)?;
		not_blank("password", &self.password)?;
		Ok(())
	}
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
	pub username: String,
	pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
	pub refresh: String,
}

/// Outward shape of an account. The stored password hash never leaves the
/// accounts app.
#[derive(Debug, Serialize)]
pub struct UserPublic {
	pub id: i64,
	pub username: String,
	pub first_name: String,
	pub last_name: String,
	pub email: String,
}

impl From<User> for UserPublic {
	fn from(user: User) -> Self {
		Self {
			id: user.id,
			username: user.username,
			first_name: user.first_name,
			last_name: user.last_name,
			email: user.email,
		}
	}
}

/// Body of a successful token refresh.
#[derive(Debug, Serialize)]
pub struct AccessToken {
	pub access: String,
}
