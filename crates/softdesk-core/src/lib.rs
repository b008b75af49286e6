//! HTTP core for the SoftDesk API.
//!
//! Everything transport-level lives here: the shared error taxonomy, the
//! `Request`/`Response` types, the `Handler` and `Middleware` traits with
//! their composing chain, a small pattern router, and the hyper server glue.
//! Application crates build on these types and never touch hyper directly.

pub mod exception;
pub mod handler;
pub mod middleware;
pub mod request;
pub mod response;
pub mod router;
pub mod server;

pub use exception::{Error, Result};
pub use handler::{Handler, Middleware, MiddlewareChain};
pub use hyper::{Method, StatusCode};
pub use middleware::LoggingMiddleware;
pub use request::{Actor, Request};
pub use response::Response;
pub use router::Router;
pub use server::HttpServer;
