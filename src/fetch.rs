use crate::api::{ApiError, ArtworkDetail, CatalogueClient, Page};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// A fetch issued by a screen, tagged with that screen's generation number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    /// Page-change trigger on the listing screen. An empty query means the
    /// plain listing endpoint.
    Page {
        generation: u64,
        page: u32,
        limit: u32,
        query: String,
    },

    /// Keystroke trigger on the listing screen, always page 1.
    Search {
        generation: u64,
        query: String,
        limit: u32,
    },

    /// Single record for the detail screen.
    Artwork { generation: u64, id: u64 },
}

impl FetchRequest {
    pub fn generation(&self) -> u64 {
        match self {
            Self::Page { generation, .. }
            | Self::Search { generation, .. }
            | Self::Artwork { generation, .. } => *generation,
        }
    }
}

/// Completion of a [`FetchRequest`], sent back to the UI loop.
#[derive(Debug)]
pub enum FetchResponse {
    Page {
        generation: u64,
        result: Result<Page, ApiError>,
    },
    Search {
        generation: u64,
        result: Result<Page, ApiError>,
    },
    Artwork {
        generation: u64,
        id: u64,
        result: Result<ArtworkDetail, ApiError>,
    },
}

/// Channels connecting spawned fetch tasks to the UI loop.
pub struct FetchChannels {
    pub tx: UnboundedSender<FetchResponse>,
    pub rx: UnboundedReceiver<FetchResponse>,
}

impl FetchChannels {
    pub fn new() -> Self {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for FetchChannels {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogueClient {
    /// Run a request against the catalogue and wrap the outcome.
    pub async fn execute(&self, request: FetchRequest) -> FetchResponse {
        match request {
            FetchRequest::Page {
                generation,
                page,
                limit,
                query,
            } => {
                let result = if query.is_empty() {
                    self.list(page, limit).await
                } else {
                    self.search(&query, page, limit).await
                };
                FetchResponse::Page { generation, result }
            }
            FetchRequest::Search {
                generation,
                query,
                limit,
            } => FetchResponse::Search {
                generation,
                result: self.search(&query, 1, limit).await,
            },
            FetchRequest::Artwork { generation, id } => FetchResponse::Artwork {
                generation,
                id,
                result: self.artwork(id).await,
            },
        }
    }
}

/// Spawn a request on the runtime; the response is delivered over `tx`.
pub fn spawn_fetch(
    client: &CatalogueClient,
    request: FetchRequest,
    tx: &UnboundedSender<FetchResponse>,
) {
    tracing::debug!(generation = request.generation(), ?request, "fetch issued");
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let response = client.execute(request).await;
        // The receiver only goes away on shutdown.
        let _ = tx.send(response);
    });
}
