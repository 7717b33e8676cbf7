use super::shared::{
    banner_height, cursor_column, error_banner, header, key_hints, loading_indicator, truncate_str,
};
use crate::app::{App, InputMode};
use crate::listing::{ListingView, NoMatchReason};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

const HINTS: [(&str, &str); 7] = [
    ("↑↓", "Navigate"),
    ("←→", "Page"),
    ("/", "Search"),
    ("c/C", "Category"),
    ("Enter", "Detail"),
    ("?", "Help"),
    ("q", "Quit"),
];

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let listing = &app.listing;
    let view = listing.view();

    if listing.is_loading() {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);
        header(frame, chunks[0], "Artwork Explorer", app.previous);
        loading_indicator(frame, chunks[1]);
        frame.render_widget(Paragraph::new(key_hints(&HINTS[5..], "")), chunks[2]);
        return;
    }

    let notice_height = if matches!(view, ListingView::NoMatches { .. }) { 1 } else { 0 };

    // Layout: header(2) + banner + search(3) + controls(1) + notice + list(min) + image(1) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(banner_height(listing.error())),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(notice_height),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    header(frame, chunks[0], "Artwork Explorer", app.previous);
    error_banner(frame, chunks[1], listing.error());
    render_search(app, frame, chunks[2]);
    render_controls(app, frame, chunks[3]);

    if let ListingView::NoMatches { reason, .. } = view {
        let text = match reason {
            NoMatchReason::Search(query) => {
                format!(" No results for \"{}\". Showing the current page instead.", query)
            }
            NoMatchReason::Category(name) => {
                format!(" Nothing on this page is tagged \"{}\". Showing the whole page.", name)
            }
        };
        let notice = Paragraph::new(text).style(Style::default().fg(Color::Yellow));
        frame.render_widget(notice, chunks[4]);
    }

    render_rows(app, frame, chunks[5], view);

    // ── Thumbnail of the highlighted row ──
    let image = match app.selected_image_url() {
        Some(url) => Line::from(vec![
            Span::styled(" Image: ", Style::default().fg(Color::DarkGray)),
            Span::styled(url, Style::default().fg(Color::Blue)),
        ]),
        None => Line::from(Span::styled(" No image", Style::default().fg(Color::DarkGray))),
    };
    frame.render_widget(Paragraph::new(image), chunks[6]);

    // ── Status bar ──
    let status = if listing.in_flight() {
        "Fetching..."
    } else {
        app.status_msg.as_str()
    };
    frame.render_widget(Paragraph::new(key_hints(&HINTS, status)), chunks[7]);
}

fn render_search(app: &App, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Search;
    let style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let label = if editing {
        " Search artwork (Enter to keep, Esc to clear): "
    } else {
        " Search artwork (/): "
    };
    let search_bar = Paragraph::new(format!("{}{}", label, app.listing.query()))
        .style(style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(style)
                .title(" Search "),
        );
    frame.render_widget(search_bar, area);

    if editing {
        let offset = 1 + label.chars().count() + app.listing.query().chars().count();
        let cursor_x = cursor_column(area, offset);
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}

fn render_controls(app: &App, frame: &mut Frame, area: Rect) {
    let pagination = app.listing.pagination();
    let enabled = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let disabled = Style::default().fg(Color::DarkGray);

    let line = Line::from(vec![
        Span::styled(
            " ◀ Previous ",
            if pagination.can_go_previous() { enabled } else { disabled },
        ),
        Span::raw(format!(" Page {} of {} ", pagination.current(), pagination.total())),
        Span::styled(
            " Next ▶ ",
            if pagination.can_go_next() { enabled } else { disabled },
        ),
        Span::styled("   Category filter: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("[{}]", app.listing.selected_category().label()),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" of {}", app.listing.categories().len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_rows(app: &App, frame: &mut Frame, area: Rect, view: ListingView<'_>) {
    let rows = view.rows();
    let title_width = (area.width as usize).saturating_sub(14);

    let items: Vec<ListItem> = rows
        .iter()
        .map(|item| {
            let mut spans = vec![
                Span::styled(format!("{:>7} ", item.id), Style::default().fg(Color::DarkGray)),
                Span::raw(truncate_str(&item.title, title_width)),
            ];
            if !item.category_titles.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", item.category_titles.join(", ")),
                    Style::default().fg(Color::Magenta),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = if app.listing.query().is_empty() {
        " Artworks ".to_string()
    } else {
        format!(" Artworks matching \"{}\" ", app.listing.query())
    };

    let list_widget = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(title)
                .title_bottom(Line::from(format!(" {} shown ", rows.len())).alignment(Alignment::Right)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut list_state = ListState::default();
    if !rows.is_empty() {
        list_state.select(Some(app.listing.selected));
    }
    frame.render_stateful_widget(list_widget, area, &mut list_state);
}
