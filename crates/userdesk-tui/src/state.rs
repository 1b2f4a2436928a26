//! Application state.
//!
//! `AppState` is owned by the runtime and mutated only by the reducer.
//! Each screen carries its own flow from `userdesk-core`; switching screens
//! drops the previous flow along with whatever it was waiting for.

use std::sync::Arc;

use userdesk_core::nav::Route;
use userdesk_core::session::SharedSession;

use crate::auth::{LoginScreen, RegisterScreen};
use crate::common::{TaskSeq, Tasks};
use crate::users::UsersScreen;

/// The active screen.
pub enum Screen {
    Login(LoginScreen),
    Register(RegisterScreen),
    Users(UsersScreen),
}

impl Screen {
    pub fn route(&self) -> Route {
        match self {
            Screen::Login(_) => Route::Login,
            Screen::Register(_) => Route::Register,
            Screen::Users(_) => Route::Users,
        }
    }
}

/// Top-level TUI state.
pub struct AppState {
    pub session: SharedSession,
    pub screen: Screen,
    pub tasks: Tasks,
    pub task_seq: TaskSeq,
    /// Shown in the header.
    pub api_url: String,
    pub should_quit: bool,
    pub spinner_frame: usize,
}

impl AppState {
    /// Creates state on the login screen. Call `update::start` to move to
    /// the initial route.
    pub fn new(session: SharedSession, api_url: impl Into<String>) -> Self {
        let screen = Screen::Login(LoginScreen::new(Arc::clone(&session), None));
        Self {
            session,
            screen,
            tasks: Tasks::default(),
            task_seq: TaskSeq::default(),
            api_url: api_url.into(),
            should_quit: false,
            spinner_frame: 0,
        }
    }

    /// Username of the signed-in user, if known.
    pub fn signed_in_as(&self) -> Option<String> {
        let session = self.session.load();
        session.token.as_ref()?;
        session.username
    }
}
