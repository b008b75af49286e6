use softdesk_core::{Error, Result};

/// Password hasher trait
///
/// Implement this trait to swap the hashing algorithm. The stored value is a
/// PHC string, so the algorithm and its parameters travel with each hash.
pub trait PasswordHasher: Send + Sync {
	/// Hashes a plaintext password into a PHC string
	fn hash(&self, password: &str) -> Result<String>;

	/// Verifies a plaintext password against a stored hash
	///
	/// Returns `Ok(false)` for a wrong password; errors are reserved for a
	/// hash that cannot be parsed at all.
	fn verify(&self, password: &str, hash: &str) -> Result<bool>;
}

/// Argon2id password hasher
pub struct Argon2Hasher;

impl Argon2Hasher {
	pub fn new() -> Self {
		Self
	}
}

impl Default for Argon2Hasher {
	fn default() -> Self {
		Self::new()
	}
}

impl PasswordHasher for Argon2Hasher {
	fn hash(&self, password: &str) -> Result<String> {
		use argon2::{
			Argon2,
			password_hash::{PasswordHasher as _, SaltString, rand_core::OsRng},
		};

		let salt = SaltString::generate(&mut OsRng);

		Argon2::default()
			.hash_password(password.as_bytes(), &salt)
			.map(|hash| hash.to_string())
			.map_err(|e| Error::Internal(format!("password hashing failed: {}", e)))
	}

	fn verify(&self, password: &str, hash: &str) -> Result<bool> {
		use argon2::{
			Argon2,
			password_hash::{PasswordHash, PasswordVerifier},
		};

		let parsed_hash = PasswordHash::new(hash)
			.map_err(|e| Error::Internal(format!("stored password hash is invalid: {}", e)))?;

		Ok(Argon2::default()
			.verify_password(password.as_bytes(), &parsed_hash)
			.is_ok())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_hash_and_verify() {
		let hasher = Argon2Hasher::new();
		let hash = hasher.hash("my_secure_password").unwrap();

		assert!(hash.starts_with("$argon2"));
		assert!(hasher.verify("my_secure_password", &hash).unwrap());
		assert!(!hasher.verify("wrong_password", &hash).unwrap());
	}

	#[test]
	fn test_hashes_are_salted() {
		let hasher = Argon2Hasher::new();
		let first = hasher.hash("same_password").unwrap();
		let second = hasher.hash("same_password").unwrap();
		assert_ne!(first, second);
	}

	#[test]
	fn test_garbage_hash_is_an_error() {
		let hasher = Argon2Hasher::new();
		let result = hasher.verify("password", "not-a-phc-string");
		assert!(matches!(result, Err(Error::Internal(_))));
	}
}
