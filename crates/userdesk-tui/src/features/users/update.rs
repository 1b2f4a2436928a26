//! User screen reducer.
//!
//! Keys act on the topmost layer: delete confirmation, then the form popup,
//! then the list itself.

use crossterm::event::{KeyCode, KeyEvent};
use userdesk_core::api::ApiResult;
use userdesk_core::flows::{FetchOutcome, UsersStep};
use userdesk_core::nav::Route;

use super::state::{FormMode, UserForm, UsersScreen};
use crate::common::{TaskSeq, Tasks, pop_char, push_char, push_str};
use crate::effects::UiEffect;
use crate::features::ScreenUpdate;

/// Starts the initial load (or redirects when signed out).
pub fn mount(screen: &mut UsersScreen, tasks: &mut Tasks, seq: &mut TaskSeq) -> ScreenUpdate {
    let step = screen.flow.mount();
    apply_step(step, tasks, seq)
}

/// Turns a flow step into effects, registering the task it starts.
fn apply_step(step: UsersStep, tasks: &mut Tasks, seq: &mut TaskSeq) -> ScreenUpdate {
    match step {
        UsersStep::Fetch { token } => {
            let task = seq.next_id();
            tasks.fetch_users.start(task);
            ScreenUpdate::effect(UiEffect::FetchUsers { task, token })
        }
        UsersStep::Mutate { mutation, token } => {
            let task = seq.next_id();
            tasks.mutate_user.start(task);
            ScreenUpdate::effect(UiEffect::MutateUser {
                task,
                mutation,
                token,
            })
        }
        UsersStep::ToLogin => ScreenUpdate::goto(Route::Login, None),
        UsersStep::Idle | UsersStep::Busy => ScreenUpdate::stay(),
    }
}

pub fn handle_key(
    screen: &mut UsersScreen,
    tasks: &mut Tasks,
    seq: &mut TaskSeq,
    key: KeyEvent,
) -> ScreenUpdate {
    if screen.confirm_delete.is_some() {
        return handle_confirm_key(screen, tasks, seq, key);
    }
    if screen.form.is_some() {
        return handle_form_key(screen, tasks, seq, key);
    }

    match key.code {
        KeyCode::Char('q') => ScreenUpdate::effect(UiEffect::Quit),
        KeyCode::Char('l') => ScreenUpdate::logout(),
        KeyCode::Up | KeyCode::Char('k') => {
            screen.select_prev();
            ScreenUpdate::stay()
        }
        KeyCode::Down | KeyCode::Char('j') => {
            screen.select_next();
            ScreenUpdate::stay()
        }
        KeyCode::Char('r') => {
            let step = screen.flow.begin_fetch();
            apply_step(step, tasks, seq)
        }
        KeyCode::Char('n') => {
            screen.flow.cancel_edit();
            screen.form = Some(UserForm::create());
            ScreenUpdate::stay()
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(user) = screen.selected_user().cloned()
                && screen.flow.start_edit(&user.id)
            {
                screen.form = Some(UserForm::edit(&user));
            }
            ScreenUpdate::stay()
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            screen.confirm_delete = screen.selected_user().cloned();
            ScreenUpdate::stay()
        }
        _ => ScreenUpdate::stay(),
    }
}

fn handle_confirm_key(
    screen: &mut UsersScreen,
    tasks: &mut Tasks,
    seq: &mut TaskSeq,
    key: KeyEvent,
) -> ScreenUpdate {
    match key.code {
        KeyCode::Char('y' | 'Y') => {
            let Some(user) = screen.confirm_delete.take() else {
                return ScreenUpdate::stay();
            };
            let step = screen.flow.begin_delete(user.id);
            apply_step(step, tasks, seq)
        }
        KeyCode::Char('n' | 'N') | KeyCode::Esc => {
            screen.confirm_delete = None;
            ScreenUpdate::stay()
        }
        _ => ScreenUpdate::stay(),
    }
}

fn handle_form_key(
    screen: &mut UsersScreen,
    tasks: &mut Tasks,
    seq: &mut TaskSeq,
    key: KeyEvent,
) -> ScreenUpdate {
    let busy = screen.flow.is_busy();
    let Some(form) = screen.form.as_mut() else {
        return ScreenUpdate::stay();
    };

    match key.code {
        KeyCode::Esc => {
            screen.form = None;
            screen.flow.cancel_edit();
            ScreenUpdate::stay()
        }
        KeyCode::Tab | KeyCode::Down => {
            form.focus = form.focus.next();
            ScreenUpdate::stay()
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.focus = form.focus.prev();
            ScreenUpdate::stay()
        }
        KeyCode::Enter => submit_form(screen, tasks, seq),
        KeyCode::Backspace if !busy => {
            pop_char(form.focused_mut());
            ScreenUpdate::stay()
        }
        KeyCode::Char(ch) if !busy => {
            push_char(form.focused_mut(), ch);
            ScreenUpdate::stay()
        }
        _ => ScreenUpdate::stay(),
    }
}

fn submit_form(screen: &mut UsersScreen, tasks: &mut Tasks, seq: &mut TaskSeq) -> ScreenUpdate {
    let Some(form) = screen.form.as_mut() else {
        return ScreenUpdate::stay();
    };
    let step = match &form.mode {
        FormMode::Create => screen.flow.begin_create(&form.draft),
        FormMode::Edit(id) => screen.flow.begin_update(id.clone(), &form.draft),
    };
    if matches!(step, UsersStep::Mutate { .. }) {
        form.submitted = true;
    }
    apply_step(step, tasks, seq)
}

pub fn handle_paste(screen: &mut UsersScreen, text: &str) {
    if screen.flow.is_busy() {
        return;
    }
    if let Some(form) = screen.form.as_mut() {
        push_str(form.focused_mut(), text);
    }
}

pub fn handle_fetched(
    screen: &mut UsersScreen,
    tasks: &mut Tasks,
    seq: &mut TaskSeq,
    outcome: FetchOutcome,
) -> ScreenUpdate {
    let step = screen.flow.finish_fetch(outcome);
    screen.clamp_selection();
    apply_step(step, tasks, seq)
}

/// Applies a mutation result. Only the form that issued the request closes,
/// and only on success; the resync fetch follows from the flow.
pub fn handle_mutated(
    screen: &mut UsersScreen,
    tasks: &mut Tasks,
    seq: &mut TaskSeq,
    result: ApiResult<()>,
) -> ScreenUpdate {
    let succeeded = result.is_ok();
    let step = screen.flow.finish_mutation(result);

    let close = succeeded && screen.form.as_ref().is_some_and(|form| form.submitted);
    if close {
        screen.form = None;
    } else if let Some(form) = screen.form.as_mut() {
        form.submitted = false;
        // A success elsewhere ends edit mode in the flow; an edit form
        // opened meanwhile is still open.
        if let FormMode::Edit(id) = &form.mode {
            screen.flow.start_edit(id);
        }
    }
    apply_step(step, tasks, seq)
}
