//! Shared driver for end-to-end tests: the real application handler chain
//! (logging, authentication, router, views) over a migrated in-memory
//! database, exercised without a TCP listener.

#![allow(dead_code)]

use std::sync::Arc;

use bytes::Bytes;
use chrono::Duration;
use hyper::{HeaderMap, Method, Uri, Version, header};
use serde_json::Value;

use softdesk::config::settings::Settings;
use softdesk::config::urls::application;
use softdesk::test_utils::test_db;
use softdesk_core::{Handler, Request, Response};
use softdesk_db::Database;

pub struct TestApp {
	pub db: Database,
	handler: Arc<dyn Handler>,
}

/// A signed-up, logged-in user as seen by the API.
pub struct Session {
	pub user_id: i64,
	pub access: String,
	pub refresh: String,
}

fn settings() -> Settings {
	Settings {
		database_url: "sqlite::memory:".to_string(),
		bind_address: "127.0.0.1:0".parse().unwrap(),
		secret_key: "end-to-end-test-secret".to_string(),
		access_token_lifetime: Duration::minutes(5),
		refresh_token_lifetime: Duration::days(1),
		debug: false,
	}
}

impl TestApp {
	pub async fn new() -> Self {
		let db = test_db().await;
		let handler = application(db.clone(), &settings()).build_handler();
		Self { db, handler }
	}

	/// Dispatches one request through the full chain, converting a typed
	/// failure into its response the same way the server glue does.
	pub async fn request(
		&self,
		method: Method,
		path: &str,
		token: Option<&str>,
		body: Option<Value>,
	) -> Response {
		let mut headers = HeaderMap::new();
		if let Some(token) = token {
			headers.insert(
				header::AUTHORIZATION,
				format!("Bearer {token}").parse().unwrap(),
			);
		}
		let uri: Uri = path.parse().unwrap();
		let body = body
			.map(|value| Bytes::from(value.to_string()))
			.unwrap_or_default();

		let request = Request::new(method, uri, Version::HTTP_11, headers, body);
		match self.handler.handle(request).await {
			Ok(response) => response,
			Err(err) => Response::from(err),
		}
	}

	pub async fn get(&self, path: &str, token: Option<&str>) -> Response {
		self.request(Method::GET, path, token, None).await
	}

	pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Response {
		self.request(Method::POST, path, token, Some(body)).await
	}

	pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> Response {
		self.request(Method::PUT, path, token, Some(body)).await
	}

	pub async fn delete(&self, path: &str, token: Option<&str>) -> Response {
		self.request(Method::DELETE, path, token, None).await
	}

	/// Signs up a user, logs them in, and returns their id and tokens.
	pub async fn signup_and_login(&self, username: &str) -> Session {
		let signup = self
			.post(
				"/signup/",
				None,
				serde_json::json!({
					"username": username,
					"first_name": "Test",
					"last_name": "User",
					"email": format!("{username}@example.com"),
					"password": format!("{username}-password"),
				}),
			)
			.await;
		assert_eq!(signup.status.as_u16(), 201, "signup failed for {username}");
		let user_id = json_body(&signup)["id"].as_i64().unwrap();

		let login = self
			.post(
				"/login/",
				None,
				serde_json::json!({
					"username": username,
					"password": format!("{username}-password"),
				}),
			)
			.await;
		assert_eq!(login.status.as_u16(), 200, "login failed for {username}");
		let body = json_body(&login);
		Session {
			user_id,
			access: body["access"].as_str().unwrap().to_string(),
			refresh: body["refresh"].as_str().unwrap().to_string(),
		}
	}

	/// Creates a project as `token` and returns its id.
	pub async fn create_project(&self, token: &str, title: &str) -> i64 {
		let response = self
			.post(
				"/projects/",
				Some(token),
				serde_json::json!({
					"title": title,
					"description": "created by tests",
					"type": "back-end",
				}),
			)
			.await;
		assert_eq!(response.status.as_u16(), 201);
		json_body(&response)["id"].as_i64().unwrap()
	}
}

pub fn json_body(response: &Response) -> Value {
	serde_json::from_slice(&response.body).expect("response body is not JSON")
}
