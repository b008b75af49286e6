use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use softdesk_core::{Error, Result};

/// Token kind carried in the claims. A refresh token can only be exchanged
/// for a new access token; it never authenticates a request by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
	Access,
	Refresh,
}

/// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
	pub sub: String,
	pub exp: i64,
	pub iat: i64,
	pub username: String,
	pub token_type: TokenType,
}

impl Claims {
	pub fn new(user_id: i64, username: String, token_type: TokenType, expires_in: Duration) -> Self {
		let now = Utc::now();
		Self {
			sub: user_id.to_string(),
			exp: (now + expires_in).timestamp(),
			iat: now.timestamp(),
			username,
			token_type,
		}
	}

	/// The user id the token was issued for
	pub fn user_id(&self) -> Result<i64> {
		self.sub
			.parse::<i64>()
			.map_err(|_| Error::Unauthenticated("token subject is not a user id".to_string()))
	}

	pub fn is_expired(&self) -> bool {
		Utc::now().timestamp() > self.exp
	}
}

/// Access/refresh pair issued at login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
	pub access: String,
	pub refresh: String,
}

/// JWT encoding, decoding and lifetime policy (HS256)
pub struct JwtAuth {
	encoding_key: EncodingKey,
	decoding_key: DecodingKey,
	validation: Validation,
	access_lifetime: Duration,
	refresh_lifetime: Duration,
}

impl JwtAuth {
	/// Creates a handler with the given secret and token lifetimes.
	///
	/// # Examples
	///
	/// ```
	/// use softdesk_auth::JwtAuth;
	/// use chrono::Duration;
	///
	/// let jwt = JwtAuth::new(b"secret", Duration::minutes(15), Duration::days(1));
	/// let pair = jwt.generate_pair(7, "alice").unwrap();
	/// assert_eq!(jwt.verify_access(&pair.access).unwrap().username, "alice");
	/// ```
	pub fn new(secret: &[u8], access_lifetime: Duration, refresh_lifetime: Duration) -> Self {
		Self {
			encoding_key: EncodingKey::from_secret(secret),
			decoding_key: DecodingKey::from_secret(secret),
			validation: Validation::default(),
			access_lifetime,
			refresh_lifetime,
		}
	}

	/// Encodes claims into a token string
	pub fn encode(&self, claims: &Claims) -> Result<String> {
		encode(&Header::default(), claims, &self.encoding_key)
			.map_err(|e| Error::Internal(format!("token encoding failed: {}", e)))
	}

	/// Decodes a token string into claims, checking signature and expiry
	pub fn decode(&self, token: &str) -> Result<Claims> {
		decode::<Claims>(token, &self.decoding_key, &self.validation)
			.map(|data| data.claims)
			.map_err(|_| Error::Unauthenticated("token is invalid or expired".to_string()))
	}

	/// Issues an access/refresh pair for the given user
	pub fn generate_pair(&self, user_id: i64, username: &str) -> Result<TokenPair> {
		Ok(TokenPair {
			access: self.generate_access(user_id, username)?,
			refresh: self.encode(&Claims::new(
				user_id,
				username.to_string(),
				TokenType::Refresh,
				self.refresh_lifetime,
			))?,
		})
	}

	/// Issues a fresh access token for the given user
	pub fn generate_access(&self, user_id: i64, username: &str) -> Result<String> {
		self.encode(&Claims::new(
			user_id,
			username.to_string(),
			TokenType::Access,
			self.access_lifetime,
		))
	}

	/// Decodes a token and requires it to be an access token
	pub fn verify_access(&self, token: &str) -> Result<Claims> {
		let claims = self.decode(token)?;
		match claims.token_type {
			TokenType::Access => Ok(claims),
			TokenType::Refresh => Err(Error::Unauthenticated(
				"refresh token cannot be used for authentication".to_string(),
			)),
		}
	}

	/// Decodes a token and requires it to be a refresh token
	pub fn verify_refresh(&self, token: &str) -> Result<Claims> {
		let claims = self.decode(token)?;
		match claims.token_type {
			TokenType::Refresh => Ok(claims),
			TokenType::Access => Err(Error::Unauthenticated(
				"access token cannot be used to refresh".to_string(),
			)),
		}
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	fn jwt() -> JwtAuth {
		JwtAuth::new(b"test-secret", Duration::minutes(5), Duration::days(1))
	}

	#[test]
	fn test_claims_round_trip() {
		let jwt = jwt();
		let claims = Claims::new(42, "alice".to_string(), TokenType::Access, Duration::hours(1));

		let token = jwt.encode(&claims).unwrap();
		let decoded = jwt.decode(&token).unwrap();

		assert_eq!(decoded.sub, "42");
		assert_eq!(decoded.user_id().unwrap(), 42);
		assert_eq!(decoded.username, "alice");
		assert_eq!(decoded.token_type, TokenType::Access);
		assert!(!decoded.is_expired());
	}

	#[test]
	fn test_generate_pair_has_both_kinds() {
		let jwt = jwt();
		let pair = jwt.generate_pair(7, "bob").unwrap();

		assert_eq!(
			jwt.decode(&pair.access).unwrap().token_type,
			TokenType::Access
		);
		assert_eq!(
			jwt.decode(&pair.refresh).unwrap().token_type,
			TokenType::Refresh
		);
	}

	#[test]
	fn test_refresh_token_is_not_an_access_token() {
		let jwt = jwt();
		let pair = jwt.generate_pair(7, "bob").unwrap();

		assert!(jwt.verify_access(&pair.access).is_ok());
		assert!(matches!(
			jwt.verify_access(&pair.refresh),
			Err(Error::Unauthenticated(_))
		));
		assert!(matches!(
			jwt.verify_refresh(&pair.access),
			Err(Error::Unauthenticated(_))
		));
	}

	#[test]
	fn test_wrong_secret_rejected() {
		let token = jwt().generate_access(1, "alice").unwrap();
		let other = JwtAuth::new(b"different-secret", Duration::minutes(5), Duration::days(1));
		assert!(matches!(
			other.decode(&token),
			Err(Error::Unauthenticated(_))
		));
	}

	#[test]
	fn test_expired_token_rejected() {
		let jwt = jwt();
		// Beyond the default validation leeway
		let claims = Claims::new(
			1,
			"alice".to_string(),
			TokenType::Access,
			Duration::minutes(-10),
		);
		let token = jwt.encode(&claims).unwrap();

		assert!(claims.is_expired());
		assert!(matches!(jwt.decode(&token), Err(Error::Unauthenticated(_))));
	}

	#[rstest]
	#[case::empty("")]
	#[case::not_a_jwt("not.a.token")]
	#[case::header_only("eyJhbGciOiJIUzI1NiJ9")]
	fn test_garbage_tokens_rejected(#[case] token: &str) {
		assert!(matches!(
			jwt().decode(token),
			Err(Error::Unauthenticated(_))
		));
	}
}
