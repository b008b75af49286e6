//! Authentication for the SoftDesk API.
//!
//! Credentials are verified exactly once, at signup/login time, through the
//! [`PasswordHasher`] trait. Everything after that rides on JWTs: login
//! issues an access/refresh pair, and [`AuthenticationMiddleware`] resolves
//! the bearer token on each request into the actor the services consume.

pub mod backend;
pub mod hasher;
pub mod jwt;
pub mod middleware;

pub use backend::{AuthUser, UserBackend};
pub use hasher::{Argon2Hasher, PasswordHasher};
pub use jwt::{Claims, JwtAuth, TokenPair, TokenType};
pub use middleware::AuthenticationMiddleware;
