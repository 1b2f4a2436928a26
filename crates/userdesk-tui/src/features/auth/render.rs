//! Auth screens view.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::state::{LoginField, LoginScreen, RegisterField, RegisterScreen};
use crate::common::render_utils::{
    FormField, InputHint, calculate_popup_area, form_field_line, message_line, render_container,
    render_hints,
};

const FORM_WIDTH: u16 = 64;

pub fn render_login(frame: &mut Frame, screen: &LoginScreen, area: Rect) {
    let popup = calculate_popup_area(area, FORM_WIDTH, 10);
    let inner = render_container(frame, popup, "Log in", Color::Cyan);
    let enabled = screen.flow.inputs_enabled();

    let lines = vec![
        form_field_line(
            &FormField {
                label: "Username",
                value: &screen.flow.username,
                masked: false,
                focused: screen.focus == LoginField::Username,
                enabled,
            },
            inner.width,
        ),
        form_field_line(
            &FormField {
                label: "Password",
                value: &screen.flow.password,
                masked: true,
                focused: screen.focus == LoginField::Password,
                enabled,
            },
            inner.width,
        ),
        Line::from(""),
        status_line(enabled, "Logging in..."),
        message_line(screen.flow.error(), screen.notice.as_deref()),
    ];
    frame.render_widget(Paragraph::new(lines), inner);

    render_hints(
        frame,
        inner,
        &[
            InputHint::new("Tab", "next field"),
            InputHint::new("Enter", "log in"),
            InputHint::new("F2", "register"),
            InputHint::new("Ctrl+C", "quit"),
        ],
        Color::Cyan,
    );
}

pub fn render_register(frame: &mut Frame, screen: &RegisterScreen, area: Rect) {
    let popup = calculate_popup_area(area, FORM_WIDTH, 11);
    let inner = render_container(frame, popup, "Register", Color::Magenta);
    let enabled = screen.flow.inputs_enabled();

    let field = |label: &str, value: &str, masked: bool, which: RegisterField| {
        form_field_line(
            &FormField {
                label,
                value,
                masked,
                focused: screen.focus == which,
                enabled,
            },
            inner.width,
        )
    };

    let lines = vec![
        field(
            "Username",
            &screen.flow.username,
            false,
            RegisterField::Username,
        ),
        field("Email", &screen.flow.email, false, RegisterField::Email),
        field(
            "Password",
            &screen.flow.password,
            true,
            RegisterField::Password,
        ),
        Line::from(""),
        status_line(enabled, "Registering..."),
        message_line(screen.flow.error(), None),
    ];
    frame.render_widget(Paragraph::new(lines), inner);

    render_hints(
        frame,
        inner,
        &[
            InputHint::new("Tab", "next field"),
            InputHint::new("Enter", "register"),
            InputHint::new("Esc", "back to login"),
        ],
        Color::Magenta,
    );
}

fn status_line(enabled: bool, busy_text: &'static str) -> Line<'static> {
    if enabled {
        Line::from("")
    } else {
        Line::from(Span::styled(busy_text, Style::default().fg(Color::Yellow)))
    }
}
