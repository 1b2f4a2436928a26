//! Session-aware flows driven by the UIs.
//!
//! Each flow is a small state machine split into `begin_*` (validate, mark
//! the request in flight, hand back what to send) and `finish_*` (apply the
//! response, return what should happen next). The TUI runs the request in
//! between on its own task; the CLI uses the async drivers that chain both
//! halves. Navigation is always returned to the caller, never performed here.

pub mod auth;
pub mod users;

pub use auth::{AuthOutcome, AuthStatus, LoginFlow, RegisterFlow};
pub use users::{
    FetchOutcome, Navigation, UserDraft, UserListFlow, UsersStatus, UsersStep,
};

use crate::nav::Route;
use crate::session::SessionStore;

/// Clears the session and returns the login route.
///
/// Never fails: a session that cannot be removed is logged and the caller
/// still navigates away. Responses to requests still in flight are dropped
/// by whoever issued them.
pub fn logout(session: &dyn SessionStore) -> Route {
    if let Err(err) = session.clear_session() {
        tracing::error!("Failed to clear session on logout: {err:#}");
    } else {
        tracing::info!("logged out");
    }
    Route::Login
}
