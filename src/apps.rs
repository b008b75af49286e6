//! Installed applications.

pub mod accounts;
pub mod projects;
