//! SQLite access for the SoftDesk API.
//!
//! Wraps an `sqlx` connection pool with the options the application needs
//! everywhere: foreign keys enforced, database file created on first run.

use std::str::FromStr;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};

use softdesk_core::{Error, Result};

/// A handle to the application database.
///
/// Cloning is cheap; the pool is shared.
///
/// # Examples
///
/// ```
/// use softdesk_db::Database;
///
/// # async fn example() {
/// let db = Database::in_memory().await.unwrap();
/// sqlx::query("CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT)")
///     .execute(db.pool())
///     .await
///     .unwrap();
/// # }
/// # tokio::runtime::Runtime::new().unwrap().block_on(example());
/// ```
#[derive(Clone)]
pub struct Database {
	pool: SqlitePool,
}

impl Database {
	/// Opens the database at `url` (e.g. `sqlite://softdesk.db`), creating
	/// the file if it does not exist.
	pub async fn connect(url: &str) -> Result<Self> {
		let options = SqliteConnectOptions::from_str(url)?
			.create_if_missing(true)
			.foreign_keys(true);
		let pool = SqlitePool::connect_with(options).await?;
		tracing::debug!(url, "database connected");
		Ok(Self { pool })
	}

	/// Opens a private in-memory database.
	///
	/// Every connection to `sqlite::memory:` is a distinct empty database,
	/// so the pool is pinned to a single connection that never retires.
	pub async fn in_memory() -> Result<Self> {
		let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
		let pool = SqlitePoolOptions::new()
			.max_connections(1)
			.idle_timeout(None)
			.max_lifetime(None)
			.connect_with(options)
			.await?;
		Ok(Self { pool })
	}

	/// Applies pending migrations from the given embedded migrator.
	pub async fn migrate(&self, migrator: &Migrator) -> Result<()> {
		migrator
			.run(&self.pool)
			.await
			.map_err(|e| Error::Internal(format!("migration failed: {}", e)))?;
		tracing::debug!("migrations applied");
		Ok(())
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	/// Starts a transaction; dropped transactions roll back.
	pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
		Ok(self.pool.begin().await?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	async fn schema(db: &Database) {
		sqlx::query(
			"CREATE TABLE owners (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL)",
		)
		.execute(db.pool())
		.await
		.unwrap();
		sqlx::query(
			"CREATE TABLE pets (
				id INTEGER PRIMARY KEY AUTOINCREMENT,
				owner_id INTEGER NOT NULL REFERENCES owners (id) ON DELETE CASCADE,
				name TEXT NOT NULL
			)",
		)
		.execute(db.pool())
		.await
		.unwrap();
	}

	#[tokio::test]
	async fn test_in_memory_round_trip() {
		let db = Database::in_memory().await.unwrap();
		schema(&db).await;

		sqlx::query("INSERT INTO owners (name) VALUES (?)")
			.bind("alice")
			.execute(db.pool())
			.await
			.unwrap();

		let (name,): (String,) = sqlx::query_as("SELECT name FROM owners WHERE id = 1")
			.fetch_one(db.pool())
			.await
			.unwrap();
		assert_eq!(name, "alice");
	}

	#[tokio::test]
	async fn test_foreign_keys_enforced() {
		let db = Database::in_memory().await.unwrap();
		schema(&db).await;

		let orphan = sqlx::query("INSERT INTO pets (owner_id, name) VALUES (999, 'rex')")
			.execute(db.pool())
			.await;
		assert!(orphan.is_err());
	}

	#[tokio::test]
	async fn test_cascade_delete() {
		let db = Database::in_memory().await.unwrap();
		schema(&db).await;

		sqlx::query("INSERT INTO owners (name) VALUES ('alice')")
			.execute(db.pool())
			.await
			.unwrap();
		sqlx::query("INSERT INTO pets (owner_id, name) VALUES (1, 'rex')")
			.execute(db.pool())
			.await
			.unwrap();

		sqlx::query("DELETE FROM owners WHERE id = 1")
			.execute(db.pool())
			.await
			.unwrap();

		let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pets")
			.fetch_one(db.pool())
			.await
			.unwrap();
		assert_eq!(count, 0);
	}

	#[tokio::test]
	async fn test_dropped_transaction_rolls_back() {
		let db = Database::in_memory().await.unwrap();
		schema(&db).await;

		{
			let mut tx = db.begin().await.unwrap();
			sqlx::query("INSERT INTO owners (name) VALUES ('alice')")
				.execute(&mut *tx)
				.await
				.unwrap();
		}

		let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM owners")
			.fetch_one(db.pool())
			.await
			.unwrap();
		assert_eq!(count, 0);
	}
}
