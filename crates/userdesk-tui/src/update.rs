//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use std::sync::Arc;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use userdesk_core::flows;
use userdesk_core::nav::{self, Route};

use crate::auth::{self, LoginScreen, RegisterScreen};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::features::{Nav, ScreenUpdate};
use crate::state::{AppState, Screen};
use crate::users::{self, UsersScreen};

/// Moves to the startup route: the user list when a session exists,
/// the login screen otherwise.
pub fn start(app: &mut AppState) -> Vec<UiEffect> {
    let route = nav::initial_route(app.session.as_ref());
    navigate(app, route, None)
}

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.spinner_frame = app.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Terminal(Event::Key(key)) if key.kind == KeyEventKind::Press => {
            handle_key(app, key)
        }
        UiEvent::Terminal(Event::Paste(text)) => {
            handle_paste(app, &text);
            vec![]
        }
        UiEvent::Terminal(_) => vec![],
        UiEvent::TaskCompleted { kind, completed } => {
            if app.tasks.state_mut(kind).finish_if_active(completed.id) {
                update(app, *completed.result)
            } else {
                tracing::debug!(?kind, "dropping stale task result");
                vec![]
            }
        }
        UiEvent::LoginFinished(result) => {
            let outcome = match &mut app.screen {
                Screen::Login(screen) => auth::handle_login_result(screen, result),
                _ => return vec![],
            };
            apply(app, outcome)
        }
        UiEvent::RegisterFinished(result) => {
            let outcome = match &mut app.screen {
                Screen::Register(screen) => auth::handle_register_result(screen, result),
                _ => return vec![],
            };
            apply(app, outcome)
        }
        UiEvent::UsersFetched(outcome) => {
            let outcome = match &mut app.screen {
                Screen::Users(screen) => {
                    users::handle_fetched(screen, &mut app.tasks, &mut app.task_seq, outcome)
                }
                _ => return vec![],
            };
            apply(app, outcome)
        }
        UiEvent::UserMutated(result) => {
            let outcome = match &mut app.screen {
                Screen::Users(screen) => {
                    users::handle_mutated(screen, &mut app.tasks, &mut app.task_seq, result)
                }
                _ => return vec![],
            };
            apply(app, outcome)
        }
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![UiEffect::Quit];
    }

    let outcome = match &mut app.screen {
        Screen::Login(screen) => {
            auth::handle_login_key(screen, &mut app.tasks, &mut app.task_seq, key)
        }
        Screen::Register(screen) => {
            auth::handle_register_key(screen, &mut app.tasks, &mut app.task_seq, key)
        }
        Screen::Users(screen) => users::handle_key(screen, &mut app.tasks, &mut app.task_seq, key),
    };
    apply(app, outcome)
}

fn handle_paste(app: &mut AppState, text: &str) {
    match &mut app.screen {
        Screen::Login(screen) => auth::handle_login_paste(screen, text),
        Screen::Register(screen) => auth::handle_register_paste(screen, text),
        Screen::Users(screen) => users::handle_paste(screen, text),
    }
}

/// Collects a screen's effects and performs any navigation it asked for.
fn apply(app: &mut AppState, outcome: ScreenUpdate) -> Vec<UiEffect> {
    let mut effects = outcome.effects;
    match outcome.nav {
        Some(Nav::To { route, notice }) => effects.extend(navigate(app, route, notice)),
        Some(Nav::Logout) => {
            let route = flows::logout(app.session.as_ref());
            effects.extend(navigate(app, route, None));
        }
        None => {}
    }
    effects
}

/// Replaces the active screen. Requests issued by the old screen are
/// forgotten, so their results are dropped when they arrive.
fn navigate(app: &mut AppState, route: Route, notice: Option<String>) -> Vec<UiEffect> {
    app.tasks.clear_all();
    let route = nav::guard(route, app.session.as_ref());
    tracing::debug!(from = %app.screen.route(), to = %route, "navigate");

    match route {
        Route::Login => {
            app.screen = Screen::Login(LoginScreen::new(Arc::clone(&app.session), notice));
            vec![]
        }
        Route::Register => {
            app.screen = Screen::Register(RegisterScreen::new());
            vec![]
        }
        Route::Users => {
            let mut screen = UsersScreen::new(Arc::clone(&app.session));
            let outcome = users::mount(&mut screen, &mut app.tasks, &mut app.task_seq);
            app.screen = Screen::Users(screen);
            apply(app, outcome)
        }
    }
}
