use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

use crate::exception::Result;
use crate::handler::{Handler, Middleware};
use crate::request::Request;
use crate::response::Response;

/// Logging middleware
/// Logs each request with its method, path, status code, and duration
pub struct LoggingMiddleware;

impl LoggingMiddleware {
	pub fn new() -> Self {
		Self
	}
}

impl Default for LoggingMiddleware {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Middleware for LoggingMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let start = Instant::now();
		let method = request.method.clone();
		let path = request.path().to_string();

		let result = next.handle(request).await;

		let elapsed_ms = start.elapsed().as_millis() as u64;
		match &result {
			Ok(response) => {
				tracing::info!(
					%method,
					path,
					status = response.status.as_u16(),
					elapsed_ms,
					"request"
				);
			}
			Err(err) => {
				tracing::info!(
					%method,
					path,
					status = err.status_code(),
					elapsed_ms,
					detail = %err,
					"request rejected"
				);
			}
		}

		result
	}
}
