mod api;
mod app;
mod config;
mod detail;
mod fetch;
mod listing;
mod route;
mod ui;

use app::{App, InputMode, View};
use clap::Parser;
use config::Configuration;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use fetch::{FetchChannels, FetchRequest};
use route::Route;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// TUI browser for the Art Institute of Chicago artworks catalogue
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Catalogue endpoint, e.g. https://api.artic.edu/api/v1/artworks
    #[arg(long)]
    api_base: Option<String>,

    /// IIIF image service base used for thumbnail links
    #[arg(long)]
    iiif_base: Option<String>,

    /// Items requested per page
    #[arg(long)]
    per_page: Option<u32>,

    /// Abort requests that take longer than this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Path to open at startup: "/" or "/detail/<id>"
    #[arg(short, long, default_value = "/")]
    route: String,

    /// Configuration file (defaults to the per-user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log file (defaults to the per-user cache directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut Configuration) {
        if let Some(base) = &self.api_base {
            config.api_base = base.clone();
        }
        if let Some(base) = &self.iiif_base {
            config.iiif_base = base.clone();
        }
        if let Some(n) = self.per_page {
            config.items_per_page = n;
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout_secs = Some(secs);
        }
        if let Some(path) = &self.log_file {
            config.log_file = Some(path.clone());
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match Configuration::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    };
    cli.apply_overrides(&mut config);
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }

    if let Some(path) = config.log_path() {
        if let Err(e) = init_logging(&path) {
            eprintln!("Warning: logging disabled ({}): {}", path.display(), e);
        }
    }
    tracing::info!(api_base = %config.api_base, per_page = config.items_per_page, "starting");

    let client = api::CatalogueClient::new(&config.api_base, config.request_timeout())?;
    let mut channels = FetchChannels::new();
    let mut app = App::new(&config);

    if let Some(request) = app.open_path(&cli.route) {
        fetch::spawn_fetch(&client, request, &channels.tx);
    }

    // Init terminal
    let mut terminal = ratatui::init();

    // Main loop
    let result = run_app(&mut terminal, &mut app, &client, &mut channels).await;

    // Restore terminal
    ratatui::restore();

    if let Err(e) = result {
        tracing::error!(error = %e, "terminated");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}

/// Send tracing output to `path`; the terminal belongs to the TUI.
fn init_logging(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| e.to_string())?;
    Ok(())
}

async fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    client: &api::CatalogueClient,
    channels: &mut FetchChannels,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Deliver completed fetches before drawing
        while let Ok(response) = channels.rx.try_recv() {
            app.apply(response);
        }

        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Short poll keeps fetch completions flowing between key presses
        if crossterm::event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(request) = handle_key(app, key) {
                    fetch::spawn_fetch(client, request, &channels.tx);
                }
            }
        } else {
            tokio::task::yield_now().await;
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) -> Option<FetchRequest> {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return None;
    }

    // Typed text goes to the focused input
    match app.input_mode {
        InputMode::Search => return handle_search_input(app, key),
        InputMode::Comment => {
            handle_comment_input(app, key);
            return None;
        }
        InputMode::Goto => return handle_goto_input(app, key),
        InputMode::Normal => {}
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return None;
    }

    match key.code {
        KeyCode::Char('?') => {
            app.show_help = true;
            return None;
        }
        KeyCode::Char('q') => {
            app.should_quit = true;
            return None;
        }
        _ => {}
    }

    match app.view {
        View::Listing => handle_listing_key(app, key),
        View::Detail => handle_detail_key(app, key),
        // Any key leaves the fallback page
        View::Fault => app.recover(),
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) -> Option<FetchRequest> {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            None
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.listing.clear_search();
            None
        }
        KeyCode::Backspace => app.listing.pop_query_char(),
        KeyCode::Char(c) => app.listing.push_query_char(c),
        _ => None,
    }
}

fn handle_comment_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_comment(),
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Backspace => {
            app.detail.comment_input.pop();
        }
        KeyCode::Char(c) => app.detail.comment_input.push(c),
        _ => {}
    }
}

fn handle_goto_input(app: &mut App, key: KeyEvent) -> Option<FetchRequest> {
    match key.code {
        KeyCode::Enter => app.submit_goto(),
        KeyCode::Esc => {
            app.goto_input.clear();
            app.input_mode = InputMode::Normal;
            app.status_msg.clear();
            None
        }
        KeyCode::Backspace => {
            app.goto_input.pop();
            app.status_msg = format!("Go to: {}", app.goto_input);
            None
        }
        KeyCode::Char(c) => {
            app.goto_input.push(c);
            app.status_msg = format!("Go to: {}", app.goto_input);
            None
        }
        _ => None,
    }
}

fn handle_listing_key(app: &mut App, key: KeyEvent) -> Option<FetchRequest> {
    match key.code {
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
            None
        }
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Goto;
            app.status_msg = "Go to: ".to_string();
            None
        }
        KeyCode::Esc => {
            app.listing.clear_search();
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.listing.select_next();
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.listing.select_previous();
            None
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => app.listing.next_page(),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => app.listing.previous_page(),
        KeyCode::Char('c') => {
            app.listing.next_category();
            None
        }
        KeyCode::Char('C') => {
            app.listing.previous_category();
            None
        }
        KeyCode::Char('a') => {
            app.listing.select_category(listing::Category::All);
            None
        }
        KeyCode::Char('p') => {
            let id = app.previous?;
            app.navigate(Route::Detail { id })
        }
        KeyCode::Char('r') => app.reload(),
        KeyCode::Enter => app.open_selected(),
        _ => None,
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) -> Option<FetchRequest> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => app.back(),
        KeyCode::Char('c') | KeyCode::Char('i') => {
            app.input_mode = InputMode::Comment;
            None
        }
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Goto;
            app.status_msg = "Go to: ".to_string();
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.detail.scroll_down();
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.detail.scroll_up();
            None
        }
        KeyCode::Char('r') => app.reload(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_search_mode_types_into_query() {
        let mut app = App::new(&Configuration::default());
        app.open_path("/");

        assert!(handle_key(&mut app, press(KeyCode::Char('/'))).is_none());
        assert_eq!(app.input_mode, InputMode::Search);

        let request = handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(matches!(request, Some(FetchRequest::Search { ref query, .. }) if query == "q"));
        assert!(!app.should_quit);

        handle_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.listing.query(), "");
    }

    #[test]
    fn test_comment_mode_submits_on_enter() {
        let mut app = App::new(&Configuration::default());
        app.open_path("/detail/42");

        handle_key(&mut app, press(KeyCode::Char('c')));
        for c in "nice".chars() {
            handle_key(&mut app, press(KeyCode::Char(c)));
        }
        handle_key(&mut app, press(KeyCode::Enter));

        assert_eq!(app.detail.comments(), &["nice"]);
        assert_eq!(app.input_mode, InputMode::Comment);
    }

    #[test]
    fn test_fault_view_recovers_on_any_key() {
        let mut app = App::new(&Configuration::default());
        app.open_path("/nowhere");
        assert_eq!(app.view, View::Fault);

        let request = handle_key(&mut app, press(KeyCode::Char('x')));
        assert_eq!(app.view, View::Listing);
        assert!(matches!(request, Some(FetchRequest::Page { .. })));
    }

    #[test]
    fn test_init_logging_writes_to_nested_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("artwork-explorer.log");

        init_logging(&path).unwrap();
        tracing::warn!("log file ready");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("log file ready"));
        assert!(init_logging(&path).is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from(["artwork-explorer", "--per-page", "25", "--timeout-secs", "3"]);
        let mut config = Configuration::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.items_per_page, 25);
        assert_eq!(config.request_timeout_secs, Some(3));
        assert_eq!(cli.route, "/");
    }
}
