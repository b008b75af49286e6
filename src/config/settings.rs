//! Runtime settings, read once at startup from `SOFTDESK_*` environment
//! variables. Absent variables fall back to development defaults; malformed
//! ones are startup errors rather than silent fallbacks.

use std::env;
use std::net::SocketAddr;

use anyhow::Context;
use chrono::Duration;

use softdesk_auth::JwtAuth;

const DEV_SECRET: &str = "insecure-dev-secret-change-me";

#[derive(Debug, Clone)]
pub struct Settings {
	pub database_url: String,
	pub bind_address: SocketAddr,
	pub secret_key: String,
	pub access_token_lifetime: Duration,
	pub refresh_token_lifetime: Duration,
	pub debug: bool,
}

impl Settings {
	pub fn from_env() -> anyhow::Result<Self> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Builds the token authority configured by these settings.
	pub fn jwt_auth(&self) -> JwtAuth {
		JwtAuth::new(
			self.secret_key.as_bytes(),
			self.access_token_lifetime,
			self.refresh_token_lifetime,
		)
	}

	fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
		let database_url = get("SOFTDESK_DATABASE_URL")
			.unwrap_or_else(|| "sqlite://softdesk.sqlite3".to_string());

		let bind_address = get("SOFTDESK_BIND_ADDRESS")
			.unwrap_or_else(|| "127.0.0.1:8000".to_string())
			.parse::<SocketAddr>()
			.context("SOFTDESK_BIND_ADDRESS is not a valid socket address")?;

		let secret_key = match get("SOFTDESK_SECRET_KEY") {
			Some(key) if !key.is_empty() => key,
			_ => {
				tracing::warn!(
					"SOFTDESK_SECRET_KEY is not set; tokens are signed with an insecure development key"
				);
				DEV_SECRET.to_string()
			}
		};

		let access_minutes = get("SOFTDESK_ACCESS_TOKEN_MINUTES")
			.map(|v| v.parse::<i64>())
			.transpose()
			.context("SOFTDESK_ACCESS_TOKEN_MINUTES is not a number")?
			.unwrap_or(5);
		let refresh_minutes = get("SOFTDESK_REFRESH_TOKEN_MINUTES")
			.map(|v| v.parse::<i64>())
			.transpose()
			.context("SOFTDESK_REFRESH_TOKEN_MINUTES is not a number")?
			.unwrap_or(24 * 60);

		let debug = get("SOFTDESK_DEBUG")
			.map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
			.unwrap_or(false);

		Ok(Self {
			database_url,
			bind_address,
			secret_key,
			access_token_lifetime: Duration::minutes(access_minutes),
			refresh_token_lifetime: Duration::minutes(refresh_minutes),
			debug,
		})
	}
}
