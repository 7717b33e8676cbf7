use crate::api::image_url;
use crate::config::Configuration;
use crate::detail::DetailScreen;
use crate::fetch::{FetchRequest, FetchResponse};
use crate::listing::ListingScreen;
use crate::route::{Route, RouteError};

/// Which screen is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Listing,
    Detail,
    /// Fallback shown when a route cannot be resolved.
    Fault,
}

/// Where typed characters go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Comment,
    Goto,
}

/// Main application state.
pub struct App {
    pub should_quit: bool,
    pub view: View,
    pub show_help: bool,
    pub input_mode: InputMode,

    pub listing: ListingScreen,
    pub detail: DetailScreen,

    // Back-reference carried by the listing route
    pub previous: Option<u64>,
    pub fault: Option<String>,
    pub goto_input: String,

    pub iiif_base: String,
    pub status_msg: String,
}

impl App {
    pub fn new(config: &Configuration) -> Self {
        Self {
            should_quit: false,
            view: View::Listing,
            show_help: false,
            input_mode: InputMode::Normal,

            listing: ListingScreen::new(config.items_per_page),
            detail: DetailScreen::new(),

            previous: None,
            fault: None,
            goto_input: String::new(),

            iiif_base: config.iiif_base.clone(),
            status_msg: String::new(),
        }
    }

    /// The route currently displayed, if any.
    pub fn route(&self) -> Option<Route> {
        match self.view {
            View::Listing => Some(Route::Listing {
                previous: self.previous,
            }),
            View::Detail => Some(Route::Detail {
                id: self.detail.id(),
            }),
            View::Fault => None,
        }
    }

    /// Switch screens. The listing keeps its data across a detail round-trip
    /// and only fetches when nothing has loaded yet.
    pub fn navigate(&mut self, route: Route) -> Option<FetchRequest> {
        self.input_mode = InputMode::Normal;
        self.fault = None;
        self.status_msg.clear();
        match route {
            Route::Listing { previous } => {
                self.previous = previous;
                self.view = View::Listing;
                if self.listing.has_loaded() || self.listing.in_flight() {
                    None
                } else {
                    Some(self.listing.mount())
                }
            }
            Route::Detail { id } => {
                self.view = View::Detail;
                Some(self.detail.mount(id))
            }
        }
    }

    /// Resolve `path` and navigate to it, or show the fallback view.
    pub fn open_path(&mut self, path: &str) -> Option<FetchRequest> {
        match Route::parse(path) {
            Ok(route) => self.navigate(route),
            Err(err) => {
                self.raise(err);
                None
            }
        }
    }

    pub fn raise(&mut self, err: RouteError) {
        tracing::error!(error = %err, "route resolution failed");
        self.fault = Some(err.to_string());
        self.status_msg.clear();
        self.view = View::Fault;
        self.input_mode = InputMode::Normal;
    }

    /// Leave the fallback view for the root route.
    pub fn recover(&mut self) -> Option<FetchRequest> {
        self.navigate(Route::root())
    }

    pub fn open_selected(&mut self) -> Option<FetchRequest> {
        let id = self.listing.selected_item()?.id;
        self.navigate(Route::Detail { id })
    }

    pub fn back(&mut self) -> Option<FetchRequest> {
        let route = self.detail.back();
        self.navigate(route)
    }

    /// Re-issue the active screen's fetch.
    pub fn reload(&mut self) -> Option<FetchRequest> {
        match self.view {
            View::Listing => Some(self.listing.mount()),
            View::Detail => Some(self.detail.reload()),
            View::Fault => None,
        }
    }

    pub fn submit_goto(&mut self) -> Option<FetchRequest> {
        let path = std::mem::take(&mut self.goto_input);
        self.input_mode = InputMode::Normal;
        self.open_path(&path)
    }

    pub fn submit_comment(&mut self) {
        if self.detail.submit_comment() {
            self.status_msg = format!("{} comment(s)", self.detail.comments().len());
        }
    }

    /// Route a fetch completion to the screen that issued it.
    pub fn apply(&mut self, response: FetchResponse) {
        match response {
            FetchResponse::Artwork { .. } => {
                self.detail.apply(response);
            }
            FetchResponse::Page { .. } | FetchResponse::Search { .. } => {
                self.listing.apply(response);
            }
        }
    }

    /// Thumbnail URL for the highlighted listing row.
    pub fn selected_image_url(&self) -> Option<String> {
        let item = self.listing.selected_item()?;
        let image_id = item.image_id.as_deref()?;
        Some(image_url(&self.iiif_base, image_id))
    }
}
