//! User list view.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, TableState};
use userdesk_core::flows::UsersStatus;

use super::state::{FormField, FormMode, UserForm, UsersScreen};
use crate::common::render_utils::{
    self, InputHint, calculate_popup_area, form_field_line, message_line, render_container,
    render_hints,
};
use crate::common::truncate_start;

pub fn render_users(frame: &mut Frame, screen: &UsersScreen, area: Rect, spinner: &str) {
    let [list_area, message_area, hints_area] = Layout::vertical([
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_list(frame, screen, list_area, spinner);
    frame.render_widget(
        Paragraph::new(message_line(screen.flow.error(), None)),
        message_area,
    );
    render_hints(
        frame,
        hints_area,
        &[
            InputHint::new("n", "new"),
            InputHint::new("e", "edit"),
            InputHint::new("d", "delete"),
            InputHint::new("r", "refresh"),
            InputHint::new("l", "logout"),
            InputHint::new("q", "quit"),
        ],
        Color::Cyan,
    );

    if let Some(form) = &screen.form {
        render_form(frame, form, screen.flow.is_busy(), screen.flow.error(), area);
    }
    if let Some(user) = &screen.confirm_delete {
        let popup = calculate_popup_area(area, 50, 5);
        let inner = render_container(frame, popup, "Delete user", Color::Red);
        let lines = vec![
            Line::from(format!("Delete '{}' ({})?", user.username, user.id)),
            Line::from(Span::styled(
                "y to confirm, n to cancel",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn render_list(frame: &mut Frame, screen: &UsersScreen, area: Rect, spinner: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" Users ({}) ", screen.flow.users().len()));

    let placeholder = match screen.flow.status() {
        UsersStatus::Loading => Some(format!("{spinner} Loading users...")),
        UsersStatus::Error if screen.flow.users().is_empty() => {
            Some("Could not load users. Press r to retry.".to_string())
        }
        UsersStatus::Ready if screen.flow.users().is_empty() => {
            Some("No users found.".to_string())
        }
        _ => None,
    };
    if let Some(text) = placeholder {
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray))).block(block),
            area,
        );
        return;
    }

    let email_width = area.width.saturating_sub(34) as usize;
    let rows = screen.flow.users().iter().map(|user| {
        Row::new(vec![
            user.id.to_string(),
            user.username.clone(),
            truncate_start(&user.email, email_width),
        ])
    });
    let header = Row::new(vec!["ID", "Username", "Email"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(20),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().bg(Color::DarkGray))
    .highlight_symbol("> ");

    let mut state = TableState::default().with_selected(Some(screen.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_form(frame: &mut Frame, form: &UserForm, busy: bool, error: Option<&str>, area: Rect) {
    let popup = calculate_popup_area(area, 64, 10);
    let inner = render_container(frame, popup, &form.title(), Color::Yellow);

    let field = |label: &str, value: &str, masked: bool, which: FormField| {
        form_field_line(
            &render_utils::FormField {
                label,
                value,
                masked,
                focused: form.focus == which,
                enabled: !busy,
            },
            inner.width,
        )
    };
    let password_label = if matches!(form.mode, FormMode::Create) {
        "Password"
    } else {
        "New pass"
    };

    let mut lines = vec![
        field("Username", &form.draft.username, false, FormField::Username),
        field("Email", &form.draft.email, false, FormField::Email),
        field(password_label, &form.draft.password, true, FormField::Password),
        Line::from(""),
    ];
    if busy {
        lines.push(Line::from(Span::styled(
            "Saving...",
            Style::default().fg(Color::Yellow),
        )));
    } else {
        lines.push(message_line(error, None));
    }
    frame.render_widget(Paragraph::new(lines), inner);

    render_hints(
        frame,
        inner,
        &[
            InputHint::new("Tab", "next field"),
            InputHint::new("Enter", "save"),
            InputHint::new("Esc", "cancel"),
        ],
        Color::Yellow,
    );
}
