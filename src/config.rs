//! Project configuration: settings and root URL patterns.

pub mod settings;
pub mod urls;
