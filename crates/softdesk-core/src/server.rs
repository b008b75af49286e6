use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};

use crate::handler::{Handler, Middleware, MiddlewareChain};
use crate::request::Request;
use crate::response::Response;

/// HTTP Server with middleware support
pub struct HttpServer {
	handler: Arc<dyn Handler>,
	middlewares: Vec<Arc<dyn Middleware>>,
}

impl HttpServer {
	/// Create a new server with the given handler
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			handler,
			middlewares: Vec::new(),
		}
	}

	/// Add a middleware to the server using builder pattern
	///
	/// Middlewares are executed in the order they are added.
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	/// Build the final handler with middleware chain
	pub fn build_handler(&self) -> Arc<dyn Handler> {
		if self.middlewares.is_empty() {
			return self.handler.clone();
		}

		let mut chain = MiddlewareChain::new(self.handler.clone());
		for middleware in &self.middlewares {
			chain.add_middleware(middleware.clone());
		}

		Arc::new(chain)
	}

	/// Start the server and listen on the given address
	///
	/// Accepts connections until the process is stopped.
	pub async fn listen(self, addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
		let listener = TcpListener::bind(addr).await?;
		tracing::info!(%addr, "server listening");

		let handler = self.build_handler();

		loop {
			let (stream, socket_addr) = listener.accept().await?;
			let handler = handler.clone();

			tokio::task::spawn(async move {
				if let Err(err) = Self::handle_connection(stream, socket_addr, handler).await {
					tracing::warn!(error = %err, "connection error");
				}
			});
		}
	}

	/// Handle a single TCP connection by processing HTTP requests
	pub async fn handle_connection(
		stream: TcpStream,
		socket_addr: SocketAddr,
		handler: Arc<dyn Handler>,
	) -> Result<(), Box<dyn std::error::Error>> {
		let io = TokioIo::new(stream);
		let service = RequestService {
			handler,
			remote_addr: socket_addr,
		};

		http1::Builder::new().serve_connection(io, service).await?;

		Ok(())
	}
}

/// Service implementation for hyper
struct RequestService {
	handler: Arc<dyn Handler>,
	remote_addr: SocketAddr,
}

impl Service<hyper::Request<Incoming>> for RequestService {
	type Response = hyper::Response<Full<Bytes>>;
	type Error = Box<dyn std::error::Error + Send + Sync>;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

	fn call(&self, req: hyper::Request<Incoming>) -> Self::Future {
		let handler = self.handler.clone();
		let remote_addr = self.remote_addr;

		Box::pin(async move {
			let (parts, body) = req.into_parts();
			let body_bytes = body.collect().await?.to_bytes();

			let mut request = Request::new(
				parts.method,
				parts.uri,
				parts.version,
				parts.headers,
				body_bytes,
			);
			request.remote_addr = Some(remote_addr);

			// Typed failures become transport responses exactly once, here
			let response = match handler.handle(request).await {
				Ok(response) => response,
				Err(error) => Response::from(error),
			};

			let mut hyper_response = hyper::Response::builder().status(response.status);
			for (key, value) in response.headers.iter() {
				hyper_response = hyper_response.header(key, value);
			}

			Ok(hyper_response.body(Full::new(response.body))?)
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;

	struct TestHandler;

	#[async_trait]
	impl Handler for TestHandler {
		async fn handle(&self, _request: Request) -> crate::Result<Response> {
			Ok(Response::ok().with_body("Hello, World!"))
		}
	}

	struct PrefixMiddleware {
		prefix: String,
	}

	#[async_trait]
	impl Middleware for PrefixMiddleware {
		async fn process(
			&self,
			request: Request,
			next: Arc<dyn Handler>,
		) -> crate::Result<Response> {
			let response = next.handle(request).await?;
			let current_body = String::from_utf8(response.body.to_vec()).unwrap_or_default();
			Ok(Response::ok().with_body(format!("{}{}", self.prefix, current_body)))
		}
	}

	#[tokio::test]
	async fn test_build_handler_applies_middleware_in_order() {
		use bytes::Bytes;
		use hyper::{HeaderMap, Method, Uri, Version};

		let server = HttpServer::new(Arc::new(TestHandler))
			.with_middleware(Arc::new(PrefixMiddleware {
				prefix: "First:".to_string(),
			}))
			.with_middleware(Arc::new(PrefixMiddleware {
				prefix: "Second:".to_string(),
			}));

		let handler = server.build_handler();
		let request = Request::new(
			Method::GET,
			Uri::from_static("/"),
			Version::HTTP_11,
			HeaderMap::new(),
			Bytes::new(),
		);

		let response = handler.handle(request).await.unwrap();
		let body = String::from_utf8(response.body.to_vec()).unwrap();
		assert_eq!(body, "First:Second:Hello, World!");
	}

	#[tokio::test]
	async fn test_build_handler_without_middleware() {
		use bytes::Bytes;
		use hyper::{HeaderMap, Method, Uri, Version};

		let server = HttpServer::new(Arc::new(TestHandler));
		let handler = server.build_handler();

		let request = Request::new(
			Method::GET,
			Uri::from_static("/"),
			Version::HTTP_11,
			HeaderMap::new(),
			Bytes::new(),
		);
		let response = handler.handle(request).await.unwrap();
		assert_eq!(response.status, hyper::StatusCode::OK);
	}
}
