use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::common::{draw_button, draw_input, inner_row};
use crate::app::{App, Focus};

const WRITE_ACCENT: Color = Color::Green;
const READ_ACCENT: Color = Color::Blue;

fn pane_block(badge: &str, title: &str, accent: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(Line::from(vec![
            Span::styled(
                format!(" {} ", badge),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{} ", title),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]))
}

pub(super) fn draw_write_pane(frame: &mut Frame, area: Rect, app: &App) {
    let block = pane_block("RW", "Write Data", WRITE_ACCENT);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(inner);

    let write = &app.console.write;

    draw_input(
        frame,
        chunks[0],
        "Key",
        &write.key,
        "e.g., username",
        app.focus == Focus::WriteKey,
    );
    draw_input(
        frame,
        chunks[1],
        "Value",
        &write.value,
        "e.g., admin",
        app.focus == Focus::WriteValue,
    );
    draw_button(
        frame,
        chunks[2],
        app.console.write_button_label(),
        WRITE_ACCENT,
        app.console.is_loading(),
    );

    if let Some(status) = &write.status {
        let color = if status.is_error {
            Color::Red
        } else {
            Color::Green
        };

        let status_box = Paragraph::new(status.text.as_str())
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            );

        frame.render_widget(status_box, chunks[4]);
    }
}

pub(super) fn draw_read_pane(frame: &mut Frame, area: Rect, app: &App) {
    let block = pane_block("RO", "Read Data", READ_ACCENT);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(inner);

    let search_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(9)])
        .split(chunks[0]);

    draw_input(
        frame,
        search_row[0],
        "Key to Search",
        &app.console.read.search_key,
        "e.g., username",
        app.focus == Focus::SearchKey,
    );

    draw_button(
        frame,
        inner_row(search_row[1]),
        "Get",
        READ_ACCENT,
        app.console.is_loading(),
    );

    let result = match &app.console.read.result {
        Some(text) => Line::from(text.as_str()),
        None => Line::from(Span::styled(
            app.console.read_result_text(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    };

    let result_box = Paragraph::new(result)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Reflected Value "),
        );

    frame.render_widget(result_box, chunks[2]);
}
