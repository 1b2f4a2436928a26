//! Auth screen reducers.
//!
//! Typing is ignored while a request is in flight; the flow reports that via
//! `inputs_enabled`.

use crossterm::event::{KeyCode, KeyEvent};
use userdesk_core::api::{ApiResult, LoginResponse};
use userdesk_core::flows::AuthOutcome;
use userdesk_core::nav::Route;

use super::state::{LoginScreen, RegisterScreen};
use crate::common::{TaskSeq, Tasks, pop_char, push_char, push_str};
use crate::effects::UiEffect;
use crate::features::ScreenUpdate;

pub fn handle_login_key(
    screen: &mut LoginScreen,
    tasks: &mut Tasks,
    seq: &mut TaskSeq,
    key: KeyEvent,
) -> ScreenUpdate {
    match key.code {
        KeyCode::F(2) => ScreenUpdate::goto(Route::Register, None),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            screen.focus = screen.focus.next();
            ScreenUpdate::stay()
        }
        KeyCode::Enter => submit_login(screen, tasks, seq),
        KeyCode::Backspace if screen.flow.inputs_enabled() => {
            pop_char(screen.focused_mut());
            ScreenUpdate::stay()
        }
        KeyCode::Char(ch) if screen.flow.inputs_enabled() => {
            push_char(screen.focused_mut(), ch);
            ScreenUpdate::stay()
        }
        _ => ScreenUpdate::stay(),
    }
}

pub fn handle_login_paste(screen: &mut LoginScreen, text: &str) {
    if screen.flow.inputs_enabled() {
        push_str(screen.focused_mut(), text);
    }
}

fn submit_login(screen: &mut LoginScreen, tasks: &mut Tasks, seq: &mut TaskSeq) -> ScreenUpdate {
    match screen.flow.begin() {
        Ok(request) => {
            screen.notice = None;
            let task = seq.next_id();
            tasks.login.start(task);
            ScreenUpdate::effect(UiEffect::Login { task, request })
        }
        Err(_) => ScreenUpdate::stay(),
    }
}

pub fn handle_login_result(
    screen: &mut LoginScreen,
    result: ApiResult<LoginResponse>,
) -> ScreenUpdate {
    match screen.flow.finish(result) {
        AuthOutcome::Navigate { to, notice } => ScreenUpdate::goto(to, notice),
        AuthOutcome::Failed | AuthOutcome::Busy => ScreenUpdate::stay(),
    }
}

pub fn handle_register_key(
    screen: &mut RegisterScreen,
    tasks: &mut Tasks,
    seq: &mut TaskSeq,
    key: KeyEvent,
) -> ScreenUpdate {
    match key.code {
        KeyCode::Esc => ScreenUpdate::goto(Route::Login, None),
        KeyCode::Tab | KeyCode::Down => {
            screen.focus = screen.focus.next();
            ScreenUpdate::stay()
        }
        KeyCode::BackTab | KeyCode::Up => {
            screen.focus = screen.focus.prev();
            ScreenUpdate::stay()
        }
        KeyCode::Enter => match screen.flow.begin() {
            Ok(request) => {
                let task = seq.next_id();
                tasks.register.start(task);
                ScreenUpdate::effect(UiEffect::Register { task, request })
            }
            Err(_) => ScreenUpdate::stay(),
        },
        KeyCode::Backspace if screen.flow.inputs_enabled() => {
            pop_char(screen.focused_mut());
            ScreenUpdate::stay()
        }
        KeyCode::Char(ch) if screen.flow.inputs_enabled() => {
            push_char(screen.focused_mut(), ch);
            ScreenUpdate::stay()
        }
        _ => ScreenUpdate::stay(),
    }
}

pub fn handle_register_paste(screen: &mut RegisterScreen, text: &str) {
    if screen.flow.inputs_enabled() {
        push_str(screen.focused_mut(), text);
    }
}

pub fn handle_register_result(screen: &mut RegisterScreen, result: ApiResult<()>) -> ScreenUpdate {
    match screen.flow.finish(result) {
        AuthOutcome::Navigate { to, notice } => ScreenUpdate::goto(to, notice),
        AuthOutcome::Failed | AuthOutcome::Busy => ScreenUpdate::stay(),
    }
}
