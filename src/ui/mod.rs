mod detail;
mod fault;
mod help;
mod list;
mod shared;

use crate::app::{App, View};
use ratatui::Frame;

/// Draw the active screen, then the help overlay when it is open.
pub fn render(app: &App, frame: &mut Frame) {
    let screen: fn(&App, &mut Frame) = match app.view {
        View::Listing => list::render,
        View::Detail => detail::render,
        View::Fault => fault::render,
    };
    screen(app, frame);

    if app.show_help {
        help::render(frame);
    }
}
