//! SoftDesk: a project-tracking REST API.
//!
//! Users sign up and authenticate with JWT, create projects, add
//! contributors, file issues and comment on them. Access is gated by the
//! permission rules in `apps::projects::permissions`.

pub mod apps;
pub mod config;
pub mod test_utils;

/// Migrations embedded from `migrations/` at compile time.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
