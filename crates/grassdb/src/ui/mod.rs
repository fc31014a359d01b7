//! Rendering for the console. Pure functions of [`App`] state.

mod common;
mod panes;

use grassdb_core::truncate_string_safe;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, Focus};

const HELP: &str = "Tab/Shift-Tab: move  Enter: submit  Esc: quit";

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], app);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    panes::draw_write_pane(frame, panes[0], app);
    panes::draw_read_pane(frame, panes[1], app);

    draw_footer(frame, chunks[2], app);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(12), Constraint::Min(20)])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        " GrassDB",
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )));
    let title_area = common::inner_row(chunks[0]);
    if !title_area.is_empty() {
        frame.render_widget(title, title_area);
    }

    common::draw_input(
        frame,
        chunks[1],
        "Node URL",
        &app.console.node_url,
        "http://localhost:8081",
        app.focus == Focus::NodeUrl,
    );
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(HELP, Style::default().fg(Color::DarkGray))];

    if let Some(status) = app.console.requests().status_message() {
        let room = (area.width as usize).saturating_sub(HELP.len() + 3);
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            truncate_string_safe(&status, room),
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
