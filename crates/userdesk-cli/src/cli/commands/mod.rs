//! CLI command handlers.

pub mod auth;
pub mod config;
pub mod prompt;
pub mod status;
pub mod users;
