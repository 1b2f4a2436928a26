//! Shared rendering helpers for forms and popups.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::text::{mask, truncate_start};

/// Centers a `width` x `height` box within `area`, shrinking it to fit.
pub fn calculate_popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Renders a bordered container (clears background, draws border and title)
/// and returns the padded inner area.
pub fn render_container(frame: &mut Frame, area: Rect, title: &str, border_color: Color) -> Rect {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {title} "))
        .title_style(
            Style::default()
                .fg(border_color)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(block, area);

    Rect::new(
        area.x + 2,
        area.y + 1,
        area.width.saturating_sub(4),
        area.height.saturating_sub(2),
    )
}

/// A labelled single-line input.
pub struct FormField<'a> {
    pub label: &'a str,
    pub value: &'a str,
    pub masked: bool,
    pub focused: bool,
    pub enabled: bool,
}

const LABEL_WIDTH: usize = 10;

/// Renders `label: value█` on one line.
pub fn form_field_line(field: &FormField<'_>, width: u16) -> Line<'static> {
    let label = format!("{:<width$}", format!("{}:", field.label), width = LABEL_WIDTH);
    let max_value_width = (width as usize).saturating_sub(LABEL_WIDTH + 2);
    let shown = if field.masked {
        mask(field.value)
    } else {
        field.value.to_string()
    };

    let label_color = if field.focused {
        Color::Cyan
    } else {
        Color::Gray
    };
    let value_color = if field.enabled {
        Color::White
    } else {
        Color::DarkGray
    };

    let mut spans = vec![
        Span::styled(label, Style::default().fg(label_color)),
        Span::styled(
            truncate_start(&shown, max_value_width),
            Style::default().fg(value_color),
        ),
    ];
    if field.focused && field.enabled {
        spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
    }
    Line::from(spans)
}

/// Helper struct for keyboard hints.
pub struct InputHint<'a> {
    pub key: &'a str,
    pub action: &'a str,
}

impl<'a> InputHint<'a> {
    pub fn new(key: &'a str, action: &'a str) -> Self {
        Self { key, action }
    }
}

/// Renders a line of keyboard hints on the last row of `area`.
pub fn render_hints(frame: &mut Frame, area: Rect, hints: &[InputHint], highlight_color: Color) {
    let hints_y = area.y + area.height.saturating_sub(1);
    let hints_area = Rect::new(area.x, hints_y, area.width, 1);

    let mut spans = Vec::new();
    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" • ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(highlight_color)));
        spans.push(Span::styled(
            format!(" {}", hint.action),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let para = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(para, hints_area);
}

/// Message line: red for errors, green for notices.
pub fn message_line(error: Option<&str>, notice: Option<&str>) -> Line<'static> {
    match (error, notice) {
        (Some(error), _) => Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )),
        (None, Some(notice)) => Line::from(Span::styled(
            notice.to_string(),
            Style::default().fg(Color::Green),
        )),
        (None, None) => Line::from(""),
    }
}
