//! Root URL configuration and application assembly.

use std::sync::Arc;

use softdesk_auth::{AuthenticationMiddleware, JwtAuth};
use softdesk_core::{HttpServer, LoggingMiddleware, Router};
use softdesk_db::Database;

use crate::apps::accounts::models::SqliteUserBackend;
use crate::apps::{accounts, projects};
use crate::config::settings::Settings;

/// Composes every installed app's routes into one router.
pub fn url_patterns(db: Database, jwt: Arc<JwtAuth>) -> Router {
	let router = Router::new();
	let router = accounts::urls::register(router, db.clone(), jwt);
	projects::urls::register(router, db)
}

/// The routed application behind its middleware chain: logging outermost,
/// then authentication, then the router.
pub fn application(db: Database, settings: &Settings) -> HttpServer {
	let jwt = Arc::new(settings.jwt_auth());
	let backend = Arc::new(SqliteUserBackend::new(db.clone()));
	let router = url_patterns(db, jwt.clone());

	HttpServer::new(Arc::new(router))
		.with_middleware(Arc::new(LoggingMiddleware::new()))
		.with_middleware(Arc::new(AuthenticationMiddleware::new(jwt, backend)))
}
