//! Screens: state, reducer, and view per feature.

pub mod auth;
pub mod users;

use userdesk_core::nav::Route;

use crate::effects::UiEffect;

/// Where the reducer should go after a screen handled an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nav {
    To {
        route: Route,
        notice: Option<String>,
    },
    /// Clear the session, then go to login.
    Logout,
}

/// Result of a screen-level handler.
#[derive(Debug, Default)]
pub struct ScreenUpdate {
    pub effects: Vec<UiEffect>,
    pub nav: Option<Nav>,
}

impl ScreenUpdate {
    pub fn stay() -> Self {
        Self::default()
    }

    pub fn effect(effect: UiEffect) -> Self {
        Self {
            effects: vec![effect],
            nav: None,
        }
    }

    pub fn goto(route: Route, notice: Option<String>) -> Self {
        Self {
            effects: Vec::new(),
            nav: Some(Nav::To { route, notice }),
        }
    }

    pub fn logout() -> Self {
        Self {
            effects: Vec::new(),
            nav: Some(Nav::Logout),
        }
    }
}
