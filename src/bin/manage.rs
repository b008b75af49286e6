//! SoftDesk management CLI.
//!
//! Project-side command interface: run the API server, apply migrations,
//! create privileged accounts.

use std::net::SocketAddr;

use anyhow::Context;
use clap::{Parser, Subcommand};

use softdesk::MIGRATOR;
use softdesk::apps::accounts::models::User;
use softdesk::config::settings::Settings;
use softdesk::config::urls::application;
use softdesk_auth::{Argon2Hasher, PasswordHasher};
use softdesk_db::Database;

#[derive(Parser)]
#[command(name = "manage")]
#[command(about = "SoftDesk project management interface", long_about = None)]
#[command(version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Start the API server
	Runserver {
		/// Server address (overrides SOFTDESK_BIND_ADDRESS)
		#[arg(value_name = "ADDRESS")]
		address: Option<String>,
	},

	/// Apply database migrations
	Migrate,

	/// Create a superuser account
	Createsuperuser {
		#[arg(long)]
		username: String,

		#[arg(long)]
		email: String,

		#[arg(long)]
		password: String,
	},
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	let settings = Settings::from_env()?;

	let default_filter = if settings.debug { "softdesk=debug,info" } else { "info" };
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
		)
		.compact()
		.init();

	match cli.command {
		Commands::Runserver { address } => runserver(settings, address).await,
		Commands::Migrate => migrate(settings).await,
		Commands::Createsuperuser {
			username,
			email,
			password,
		} => createsuperuser(settings, username, email, password).await,
	}
}

async fn runserver(settings: Settings, address: Option<String>) -> anyhow::Result<()> {
	let addr: SocketAddr = match address {
		Some(raw) => raw.parse().context("invalid server address")?,
		None => settings.bind_address,
	};

	let db = Database::connect(&settings.database_url).await?;
	db.migrate(&MIGRATOR).await?;

	application(db, &settings)
		.listen(addr)
		.await
		.map_err(|e| anyhow::anyhow!("server error: {e}"))
}

async fn migrate(settings: Settings) -> anyhow::Result<()> {
	let db = Database::connect(&settings.database_url).await?;
	db.migrate(&MIGRATOR).await?;
	println!("Migrations applied.");
	Ok(())
}

async fn createsuperuser(
	settings: Settings,
	username: String,
	email: String,
	password: String,
) -> anyhow::Result<()> {
	let db = Database::connect(&settings.database_url).await?;
	db.migrate(&MIGRATOR).await?;

	if User::by_username(&db, &username).await?.is_some() {
		anyhow::bail!("user {username} already exists");
	}
	let hash = Argon2Hasher::new().hash(&password)?;
	let user = User::insert_superuser(&db, &username, &email, &hash).await?;
	println!("Superuser {} created (id {}).", user.username, user.id);
	Ok(())
}
