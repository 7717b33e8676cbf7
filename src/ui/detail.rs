use super::shared::{
    banner_height, cursor_column, error_banner, header, key_hints, loading_indicator,
};
use crate::api::image_url;
use crate::app::{App, InputMode};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let detail = &app.detail;

    // Layout: header(2) + banner + fields(min) + comments(min) + form(4) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(banner_height(detail.error())),
            Constraint::Min(7),
            Constraint::Min(4),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(area);

    let path = app.route().map(|route| route.to_string()).unwrap_or_default();
    header(frame, chunks[0], &format!("Details page  {}", path), None);
    error_banner(frame, chunks[1], detail.error());

    if detail.is_loading() {
        loading_indicator(frame, chunks[2]);
    } else {
        render_fields(app, frame, chunks[2]);
    }
    render_comments(app, frame, chunks[3]);
    render_form(app, frame, chunks[4]);

    let hints: &[(&str, &str)] = if app.input_mode == InputMode::Comment {
        &[("Enter", "Submit"), ("Esc", "Stop typing")]
    } else {
        &[
            ("↑↓", "Scroll"),
            ("c", "Comment"),
            ("r", "Reload"),
            ("Esc/b", "Back"),
            ("?", "Help"),
        ]
    };
    frame.render_widget(Paragraph::new(key_hints(hints, &app.status_msg)), chunks[5]);
}

fn field<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!(" {}: ", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn render_fields(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Artwork ");

    let Some(record) = app.detail.record() else {
        frame.render_widget(block, area);
        return;
    };

    let thumbnail = match (&record.thumbnail, &record.image_id) {
        (_, Some(image_id)) => image_url(&app.iiif_base, image_id),
        (Some(thumbnail), None) if !thumbnail.lqip.is_empty() => {
            format!("placeholder ({} bytes)", thumbnail.lqip.len())
        }
        _ => "none".to_string(),
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!(" {}", record.title),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field("artist_display", record.artist_display.replace('\n', " / ")),
        field("main_reference_number", record.main_reference_number.clone()),
        field("dimensions", record.dimensions.clone()),
        field("thumbnail", thumbnail),
    ];
    if let Some(alt) = record.thumbnail.as_ref().and_then(|t| t.alt_text.clone()) {
        lines.push(field("description", alt));
    }

    let fields = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.detail.scroll, 0))
        .block(block);
    frame.render_widget(fields, area);
}

fn render_comments(app: &App, frame: &mut Frame, area: Rect) {
    let comments = app.detail.comments();
    let items: Vec<ListItem> = if comments.is_empty() {
        vec![ListItem::new(Span::styled(
            " No comments yet.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        comments
            .iter()
            .map(|c| ListItem::new(format!(" • {}", c)))
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" Comments ({}) ", comments.len())),
    );
    frame.render_widget(list, area);
}

fn render_form(app: &App, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Comment;
    let style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut lines = vec![Line::from(format!(" {}", app.detail.comment_input))];
    if let Some(error) = app.detail.comment_error() {
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            Style::default().fg(Color::Red),
        )));
    }

    let form = Paragraph::new(lines).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title(" Comments form (c) "),
    );
    frame.render_widget(form, area);

    if editing {
        let cursor_x = cursor_column(area, 2 + app.detail.comment_input.chars().count());
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}
