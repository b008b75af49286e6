//! Projects application: projects, contributors, issues and comments.

pub mod models;
pub mod permissions;
pub mod serializers;
pub mod services;
pub mod urls;
pub mod views;
