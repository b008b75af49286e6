use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::exception::{Error, Result};
use crate::handler::Handler;
use crate::request::Request;
use crate::response::Response;

/// One compiled path segment: a literal or a `{name}` capture
enum Segment {
	Literal(String),
	Param(String),
}

struct Route {
	segments: Vec<Segment>,
	handler: Arc<dyn Handler>,
}

/// Path router.
///
/// Patterns use `{name}` placeholders for path parameters, e.g.
/// `/projects/{project_id}/issues/{issue_id}/`. Captured values land in the
/// request's path params. Trailing slashes are not significant. Method
/// dispatch belongs to the views, so one route covers every verb on a path.
#[derive(Default)]
pub struct Router {
	routes: Vec<Route>,
}

impl Router {
	pub fn new() -> Self {
		Self { routes: Vec::new() }
	}

	/// Register a handler for a path pattern (builder form)
	pub fn route(mut self, pattern: &str, handler: Arc<dyn Handler>) -> Self {
		self.add_route(pattern, handler);
		self
	}

	/// Register a handler for a path pattern
	pub fn add_route(&mut self, pattern: &str, handler: Arc<dyn Handler>) {
		self.routes.push(Route {
			segments: Self::compile(pattern),
			handler,
		});
	}

	fn compile(pattern: &str) -> Vec<Segment> {
		pattern
			.split('/')
			.filter(|s| !s.is_empty())
			.map(|s| {
				if let Some(name) = s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
					Segment::Param(name.to_string())
				} else {
					Segment::Literal(s.to_string())
				}
			})
			.collect()
	}

	fn resolve(&self, path: &str) -> Option<(Arc<dyn Handler>, HashMap<String, String>)> {
		let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

		'routes: for route in &self.routes {
			if route.segments.len() != parts.len() {
				continue;
			}

			let mut params = HashMap::new();
			for (segment, part) in route.segments.iter().zip(&parts) {
				match segment {
					Segment::Literal(lit) => {
						if lit != part {
							continue 'routes;
						}
					}
					Segment::Param(name) => {
						params.insert(name.clone(), part.to_string());
					}
				}
			}
			return Some((route.handler.clone(), params));
		}

		None
	}
}

#[async_trait]
impl Handler for Router {
	async fn handle(&self, mut request: Request) -> Result<Response> {
		match self.resolve(request.path()) {
			Some((handler, params)) => {
				for (key, value) in params {
					request.set_path_param(key, value);
				}
				handler.handle(request).await
			}
			None => Err(Error::NotFound(format!(
				"no route matches {}",
				request.path()
			))),
		}
	}
}
