//! Accounts application: signup, login and token refresh.

pub mod models;
pub mod serializers;
pub mod urls;
pub mod views;
