use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

/// Single-line text input with a titled border.
///
/// Empty inputs show `placeholder` dimmed. The focused input gets a yellow
/// border and the terminal cursor.
pub(super) fn draw_input(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    value: &str,
    placeholder: &str,
    focused: bool,
) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let line = if value.is_empty() {
        Line::from(Span::styled(
            placeholder.to_string(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))
    } else {
        Line::from(value.to_string())
    };

    let input = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {} ", title)),
    );

    frame.render_widget(input, area);

    if focused && area.width > 2 && area.height > 2 {
        let offset = (value.chars().count() as u16).min(area.width - 2);
        frame.set_cursor_position((area.x + 1 + offset, area.y + 1));
    }
}

/// The row just below the top border of `area`, clipped to `area`. Empty
/// when `area` is shorter than two rows.
pub(super) fn inner_row(area: Rect) -> Rect {
    Rect {
        y: area.y.saturating_add(1),
        height: 1,
        ..area
    }
    .intersection(area)
}

/// A submit "button": a centered label, dimmed while a request is in flight.
pub(super) fn draw_button(frame: &mut Frame, area: Rect, label: &str, accent: Color, busy: bool) {
    if area.is_empty() {
        return;
    }

    let style = if busy {
        Style::default().fg(Color::Gray).bg(Color::DarkGray)
    } else {
        Style::default()
            .fg(Color::Black)
            .bg(accent)
            .add_modifier(Modifier::BOLD)
    };

    let button = Paragraph::new(Line::from(format!(" {} ", label)))
        .style(style)
        .alignment(ratatui::layout::Alignment::Center);

    frame.render_widget(button, area);
}
