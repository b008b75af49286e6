use async_trait::async_trait;
use std::sync::Arc;

use crate::exception::Result;
use crate::request::Request;
use crate::response::Response;

/// Handler trait for processing requests
/// This is the core abstraction - all views and the router implement this
#[async_trait]
pub trait Handler: Send + Sync {
	async fn handle(&self, request: Request) -> Result<Response>;
}

/// Blanket implementation for `Arc<T>` where T: Handler
/// This allows `Arc<dyn Handler>` to be used as a Handler
#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}

/// Middleware trait for request/response processing
/// Uses composition pattern instead of inheritance
#[async_trait]
pub trait Middleware: Send + Sync {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response>;
}

/// Middleware chain - composes multiple middleware around a handler
///
/// Middleware run in the order they were added: the first added is the
/// outermost.
pub struct MiddlewareChain {
	middlewares: Vec<Arc<dyn Middleware>>,
	handler: Arc<dyn Handler>,
}

impl MiddlewareChain {
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			middlewares: Vec::new(),
			handler,
		}
	}

	/// Adds a middleware to the chain using builder pattern
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	/// Adds a middleware to the chain
	pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
		self.middlewares.push(middleware);
	}
}

#[async_trait]
impl Handler for MiddlewareChain {
	async fn handle(&self, request: Request) -> Result<Response> {
		if self.middlewares.is_empty() {
			return self.handler.handle(request).await;
		}

		// Compose right to left so the first middleware added ends up outermost
		let mut current_handler = self.handler.clone();
		for middleware in self.middlewares.iter().rev() {
			current_handler = Arc::new(ComposedHandler {
				middleware: middleware.clone(),
				next: current_handler,
			});
		}

		current_handler.handle(request).await
	}
}

/// Internal handler that pairs one middleware with the rest of the chain
struct ComposedHandler {
	middleware: Arc<dyn Middleware>,
	next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for ComposedHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		self.middleware.process(request, self.next.clone()).await
	}
}
