//! Presentation fragments used by more than one screen. Each takes only the
//! data it draws.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthChar;

/// Title row plus the "previous route" hint when one was carried back.
pub fn header(frame: &mut Frame, area: Rect, title: &str, previous: Option<u64>) {
    let mut spans = vec![Span::styled(
        format!(" {} ", title),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    if let Some(id) = previous {
        spans.push(Span::styled("  Previous route: ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            format!("/detail/{}", id),
            Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
        ));
        spans.push(Span::styled(" (p)", Style::default().fg(Color::DarkGray)));
    }

    let header = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(header, area);
}

pub fn loading_indicator(frame: &mut Frame, area: Rect) {
    let loading = Paragraph::new(Line::from(Span::styled(
        "Loading...",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::NONE));
    frame.render_widget(loading, area);
}

/// Height the banner needs for `error`.
pub fn banner_height(error: Option<&str>) -> u16 {
    if error.is_some() { 1 } else { 0 }
}

pub fn error_banner(frame: &mut Frame, area: Rect, error: Option<&str>) {
    let Some(message) = error else {
        return;
    };
    let banner = Paragraph::new(format!(" ✖ {}", message))
        .style(Style::default().fg(Color::White).bg(Color::Red))
        .wrap(Wrap { trim: true });
    frame.render_widget(banner, area);
}

/// Key hint line: highlighted keys, their labels, then a trailing message.
pub fn key_hints<'a>(hints: &[(&'a str, &'a str)], status: &'a str) -> Line<'a> {
    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut spans = Vec::with_capacity(hints.len() * 2 + 1);
    for (key, label) in hints {
        spans.push(Span::styled(format!(" {}", key), key_style));
        spans.push(Span::raw(format!(" {} ", label)));
    }
    spans.push(Span::styled(status, Style::default().fg(Color::DarkGray)));
    Line::from(spans)
}

/// Truncate a string to `max_width` terminal columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    let width: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if width <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        used += w;
        result.push(c);
    }
    result.push('…');
    result
}

/// Popup of the given percentage size, centered in `area`.
pub fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    popup
}

/// Column of a text cursor `offset` cells into a bordered box. Never past the
/// right border, however long the input.
pub fn cursor_column(area: Rect, offset: usize) -> u16 {
    let offset = u16::try_from(offset).unwrap_or(u16::MAX);
    let last = area.right().saturating_sub(2).max(area.x);
    area.x.saturating_add(offset).min(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("Nighthawks", 20), "Nighthawks");
        assert_eq!(truncate_str("Nighthawks", 6), "Night…");
        assert_eq!(truncate_str("葛飾北斎", 5), "葛飾…");
    }

    #[test]
    fn test_banner_height() {
        assert_eq!(banner_height(None), 0);
        assert_eq!(banner_height(Some("Failed to fetch data")), 1);
    }

    #[test]
    fn test_popup_area_is_centered() {
        let popup = popup_area(Rect::new(0, 0, 100, 50), 60, 40);
        assert_eq!(popup, Rect::new(20, 15, 60, 20));
    }

    #[test]
    fn test_cursor_column_stays_inside_box() {
        let area = Rect::new(4, 0, 40, 3);
        assert_eq!(cursor_column(area, 5), 9);
        assert_eq!(cursor_column(area, 36), 40);
        assert_eq!(cursor_column(area, 37), 41);
        assert_eq!(cursor_column(area, 38), 42);
        assert_eq!(cursor_column(area, 500), 42);
        assert_eq!(cursor_column(area, usize::MAX), 42);
        assert_eq!(cursor_column(Rect::new(10, 0, 0, 0), 3), 10);
    }

    #[test]
    fn test_key_hints_layout() {
        let line = key_hints(&[("q", "Quit")], "ready");
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[2].content, "ready");
    }
}
