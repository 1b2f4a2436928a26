//! Top-level view: header, active screen, footer.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::state::{AppState, Screen};
use crate::{auth, users};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Renders the whole UI from state. Never mutates.
pub fn render(app: &AppState, frame: &mut Frame) {
    let [header, body] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(frame.area());

    frame.render_widget(Paragraph::new(header_line(app)), header);

    match &app.screen {
        Screen::Login(screen) => auth::render_login(frame, screen, body),
        Screen::Register(screen) => auth::render_register(frame, screen, body),
        Screen::Users(screen) => users::render_users(frame, screen, body, spinner(app)),
    }
}

fn spinner(app: &AppState) -> &'static str {
    SPINNER[app.spinner_frame % SPINNER.len()]
}

fn header_line(app: &AppState) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            "userdesk",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", app.api_url),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(username) = app.signed_in_as() {
        spans.push(Span::styled(
            format!("  signed in as {username}"),
            Style::default().fg(Color::Green),
        ));
    }
    if app.tasks.is_any_running() {
        spans.push(Span::styled(
            format!("  {}", spinner(app)),
            Style::default().fg(Color::Yellow),
        ));
    }
    Line::from(spans)
}
