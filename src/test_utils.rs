//! Shared fixtures for unit and integration tests.

use softdesk_db::Database;

use crate::MIGRATOR;
use crate::apps::accounts::models::User;

/// Fresh migrated in-memory database, private to one test.
pub async fn test_db() -> Database {
	let db = Database::in_memory().await.expect("in-memory database");
	db.migrate(&MIGRATOR).await.expect("apply migrations");
	db
}

/// Inserts a user with an unusable password marker, for tests that
/// authenticate with minted tokens rather than credentials.
pub async fn create_user(db: &Database, username: &str) -> User {
	User::insert(
		db,
		username,
		"Test",
		"User",
		&format!("{}@example.com", username),
		"!",
	)
	.await
	.expect("insert test user")
}
