use super::shared::popup_area;
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        format!("  {}", title),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

fn binding<'a>(keys: &'a str, action: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {:<10}", keys), Style::default().fg(Color::Yellow)),
        Span::raw(action),
    ])
}

pub fn render(frame: &mut Frame) {
    let area = popup_area(frame.area(), 70, 80);

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from(""),
        section("Global"),
        binding("?", "Toggle this help"),
        binding(":", "Go to a path (/ or /detail/<id>)"),
        binding("r", "Reload the current screen"),
        binding("q", "Quit application"),
        Line::from(""),
        section("Listing"),
        binding("↑/k ↓/j", "Move selection"),
        binding("←/h →/l", "Previous / next page"),
        binding("/", "Search (each keystroke searches)"),
        binding("Esc", "Clear search"),
        binding("c / C", "Next / previous category"),
        binding("a", "Show all categories"),
        binding("Enter", "Open artwork detail"),
        binding("p", "Reopen the previous artwork"),
        Line::from(""),
        section("Detail"),
        binding("↑/↓", "Scroll fields"),
        binding("c", "Write a comment (Enter submits)"),
        binding("Esc / b", "Back to listing"),
        Line::from(""),
    ];

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help: Keybindings ")
                .title_bottom(Line::from(" Press any key to close ").style(Style::default().fg(Color::DarkGray))),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(help, area);
}
