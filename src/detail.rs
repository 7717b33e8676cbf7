use crate::api::ArtworkDetail;
use crate::fetch::{FetchRequest, FetchResponse};
use crate::route::Route;

pub const COMMENT_REQUIRED: &str = "Comment is required";

/// State of the detail screen: one artwork plus its local comment thread.
///
/// Comments live only as long as the screen stays on one artwork; mounting
/// another id starts an empty thread.
pub struct DetailScreen {
    id: u64,
    record: Option<ArtworkDetail>,
    loading: bool,
    error: Option<String>,

    pub comment_input: String,
    comments: Vec<String>,
    comment_error: Option<String>,

    generation: u64,
    pub scroll: u16,
}

impl DetailScreen {
    pub fn new() -> Self {
        Self {
            id: 0,
            record: None,
            loading: false,
            error: None,
            comment_input: String::new(),
            comments: Vec::new(),
            comment_error: None,
            generation: 0,
            scroll: 0,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn record(&self) -> Option<&ArtworkDetail> {
        self.record.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn comment_error(&self) -> Option<&str> {
        self.comment_error.as_deref()
    }

    /// Show artwork `id`, resetting everything held for the previous one.
    pub fn mount(&mut self, id: u64) -> FetchRequest {
        self.id = id;
        self.record = None;
        self.error = None;
        self.comment_input.clear();
        self.comments.clear();
        self.comment_error = None;
        self.scroll = 0;
        self.reload()
    }

    /// Re-issue the fetch for the current id, keeping the comment thread.
    pub fn reload(&mut self) -> FetchRequest {
        self.loading = true;
        self.generation += 1;
        FetchRequest::Artwork {
            generation: self.generation,
            id: self.id,
        }
    }

    /// Apply a fetch completion. Returns false when it was stale.
    pub fn apply(&mut self, response: FetchResponse) -> bool {
        let FetchResponse::Artwork {
            generation,
            id,
            result,
        } = response
        else {
            return false;
        };
        if generation != self.generation || id != self.id {
            tracing::debug!(generation, id, latest = self.generation, "stale artwork response");
            return false;
        }

        self.loading = false;
        match result {
            Ok(record) => {
                self.record = Some(record);
                self.error = None;
            }
            Err(err) => {
                tracing::warn!(error = %err, id, "artwork fetch failed");
                self.record = None;
                self.error = Some(if err.is_not_found() {
                    format!("Artwork {} not found. {}", id, err.user_message())
                } else {
                    err.user_message()
                });
            }
        }
        true
    }

    /// Validate and append the typed comment. Returns whether it was accepted.
    pub fn submit_comment(&mut self) -> bool {
        if self.comment_input.trim().is_empty() {
            self.comment_error = Some(COMMENT_REQUIRED.to_string());
            return false;
        }
        self.comment_error = None;
        let comment = std::mem::take(&mut self.comment_input);
        tracing::debug!(id = self.id, comment = %comment, "comment added");
        self.comments.push(comment);
        true
    }

    /// Listing route carrying this artwork as the back-reference.
    pub fn back(&self) -> Route {
        Route::Listing {
            previous: Some(self.id),
        }
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}

impl Default for DetailScreen {
    fn default() -> Self {
        Self::new()
    }
}
