//! Core userdesk library (session, API client, flows, config).

pub mod api;
pub mod config;
pub mod flows;
pub mod logging;
pub mod nav;
pub mod session;
pub mod validation;
