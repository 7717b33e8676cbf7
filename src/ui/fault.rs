use super::shared::popup_area;
use crate::app::App;
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Fallback page for errors raised while resolving a route.
pub fn render(app: &App, frame: &mut Frame) {
    let area = popup_area(frame.area(), 60, 40);
    frame.render_widget(Clear, area);

    let message = app.fault.as_deref().unwrap_or("Unknown error");
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Oops!",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Sorry, an unexpected error has occurred."),
        Line::from(""),
        Line::from(Span::styled(
            message,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
        )),
    ];

    let page = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Error ")
                .title_bottom(
                    Line::from(" Press any key to return to / ")
                        .style(Style::default().fg(Color::DarkGray)),
                ),
        );
    frame.render_widget(page, area);
}
