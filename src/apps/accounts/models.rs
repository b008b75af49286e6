use async_trait::async_trait;

use softdesk_auth::{AuthUser, UserBackend};
use softdesk_core::Result;
use softdesk_db::Database;

/// Registered account.
///
/// `password` holds the Argon2 PHC string; rows never serialize outward
/// as-is, the public shape is `serializers::UserPublic`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
	pub id: i64,
	pub username: String,
	pub first_name: String,
	pub last_name: String,
	pub email: String,
	pub password: String,
	pub is_superuser: bool,
	pub is_active: bool,
}

impl User {
	pub async fn by_id(db: &Database, id: i64) -> Result<Option<User>> {
		let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
			.bind(id)
			.fetch_optional(db.pool())
			.await?;
		Ok(user)
	}

	pub async fn by_username(db: &Database, username: &str) -> Result<Option<User>> {
		let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
			.bind(username)
			.fetch_optional(db.pool())
			.await?;
		Ok(user)
	}

	pub async fn insert(
		db: &Database,
		username: &str,
		first_name: &str,
		last_name: &str,
		email: &str,
		password_hash: &str,
	) -> Result<User> {
		let id = sqlx::query_scalar::<_, i64>(
			"INSERT INTO users (username, first_name, last_name, email, password)
			 VALUES (?, ?, ?, ?, ?)
			 RETURNING id",
		)
		.bind(username)
		.bind(first_name)
		.bind(last_name)
		.bind(email)
		.bind(password_hash)
		.fetch_one(db.pool())
		.await?;
		Ok(User {
			id,
			username: username.to_string(),
			first_name: first_name.to_string(),
			last_name: last_name.to_string(),
			email: email.to_string(),
			password: password_hash.to_string(),
			is_superuser: false,
			is_active: true,
		})
	}

	/// Superusers are created from the command line only; no API operation
	/// grants the flag.
	pub async fn insert_superuser(
		db: &Database,
		username: &str,
		email: &str,
		password_hash: &str,
	) -> Result<User> {
		let id = sqlx::query_scalar::<_, i64>(
			"INSERT INTO users (username, first_name, last_name, email, password, is_superuser)
			 VALUES (?, '', '', ?, ?, 1)
			 RETURNING id",
		)
		.bind(username)
		.bind(email)
		.bind(password_hash)
		.fetch_one(db.pool())
		.await?;
		Ok(User {
			id,
			username: username.to_string(),
			first_name: String::new(),
			last_name: String::new(),
			email: email.to_string(),
			password: password_hash.to_string(),
			is_superuser: true,
			is_active: true,
		})
	}
}

/// Token verification backend over the users table.
pub struct SqliteUserBackend {
	db: Database,
}

impl SqliteUserBackend {
	pub fn new(db: Database) -> Self {
		Self { db }
	}
}

#[async_trait]
impl UserBackend for SqliteUserBackend {
	async fn get_by_id(&self, id: i64) -> Result<Option<AuthUser>> {
		Ok(User::by_id(&self.db, id).await?.map(|user| AuthUser {
			id: user.id,
			username: user.username,
			is_superuser: user.is_superuser,
			is_active: user.is_active,
		}))
	}
}
