//! URL patterns for the accounts app.

use std::sync::Arc;

use softdesk_auth::{Argon2Hasher, JwtAuth, PasswordHasher};
use softdesk_core::Router;
use softdesk_db::Database;

use super::views::{LoginView, RefreshView, SignupView};

pub fn register(router: Router, db: Database, jwt: Arc<JwtAuth>) -> Router {
	let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::new());
	router
		.route(
			"/signup/",
			Arc::new(SignupView::new(db.clone(), hasher.clone())),
		)
		.route("/login/", Arc::new(LoginView::new(db, hasher, jwt.clone())))
		.route("/login/refresh/", Arc::new(RefreshView::new(jwt)))
}
