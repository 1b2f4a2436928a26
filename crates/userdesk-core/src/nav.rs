//! Screens and the authentication guard.

use std::fmt;

use crate::session::SessionStore;

/// A top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Users,
}

impl Route {
    pub fn requires_session(self) -> bool {
        matches!(self, Route::Users)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Login => write!(f, "login"),
            Route::Register => write!(f, "register"),
            Route::Users => write!(f, "users"),
        }
    }
}

/// Redirects protected routes to `Login` when no token is stored.
pub fn guard(route: Route, session: &dyn SessionStore) -> Route {
    if route.requires_session() && session.get_token().is_none() {
        tracing::debug!(%route, "no session, redirecting to login");
        return Route::Login;
    }
    route
}

/// Route to open on startup: the user list when signed in, login otherwise.
pub fn initial_route(session: &dyn SessionStore) -> Route {
    guard(Route::Users, session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;

    #[test]
    fn users_requires_token() {
        let session = MemorySessionStore::new();
        assert_eq!(guard(Route::Users, &session), Route::Login);
        assert_eq!(guard(Route::Register, &session), Route::Register);
        assert_eq!(initial_route(&session), Route::Login);

        session.set_session("T1", None).unwrap();
        assert_eq!(guard(Route::Users, &session), Route::Users);
        assert_eq!(initial_route(&session), Route::Users);
    }
}
