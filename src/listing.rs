use crate::api::ArtworkSummary;
use crate::fetch::{FetchRequest, FetchResponse};
use std::collections::HashSet;

pub const ALL_CATEGORIES: &str = "All";
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Category filter selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    All,
    Named(String),
}

impl Category {
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Named(name) => name,
        }
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        if label == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Named(label.to_string())
        }
    }
}

/// Server-side page position. `current <= total` once a total is known,
/// except transiently after a search shrinks the page count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current: u32,
    total: u32,
}

impl Pagination {
    pub fn new() -> Self {
        Self { current: 1, total: 1 }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn can_go_previous(&self) -> bool {
        self.current > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.current < self.total
    }

    fn set_total(&mut self, total: u32) {
        self.total = total.max(1);
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new()
    }
}

/// "All" followed by every category tag on the page, first appearance first.
pub fn derive_categories(items: &[ArtworkSummary]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut categories = vec![ALL_CATEGORIES.to_string()];
    for title in items.iter().flat_map(|item| &item.category_titles) {
        if title != ALL_CATEGORIES && seen.insert(title.as_str()) {
            categories.push(title.clone());
        }
    }
    categories
}

/// Why a narrowing produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoMatchReason<'a> {
    Search(&'a str),
    Category(&'a str),
}

/// What the listing should show right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingView<'a> {
    Loading,
    Results(&'a [ArtworkSummary]),
    /// A narrowing is active but empty. `fallback` is the loaded page, shown
    /// underneath a notice.
    NoMatches {
        reason: NoMatchReason<'a>,
        fallback: &'a [ArtworkSummary],
    },
}

impl<'a> ListingView<'a> {
    /// Rows actually drawn in the grid.
    pub fn rows(&self) -> &'a [ArtworkSummary] {
        match *self {
            Self::Loading => &[],
            Self::Results(items) => items,
            Self::NoMatches { fallback, .. } => fallback,
        }
    }
}

/// State of the root listing screen.
pub struct ListingScreen {
    per_page: u32,
    pagination: Pagination,
    query: String,

    // Last page fetched through the page-change trigger
    page_items: Vec<ArtworkSummary>,
    // None until a response for the active query arrives
    search_results: Option<Vec<ArtworkSummary>>,
    category_items: Vec<ArtworkSummary>,

    categories: Vec<String>,
    selected_category: Category,

    loading: bool,
    loaded: bool,
    error: Option<String>,

    generation: u64,
    latest_page: u64,
    latest_search: u64,
    page_pending: bool,
    search_pending: bool,

    pub selected: usize,
}

impl ListingScreen {
    pub fn new(per_page: u32) -> Self {
        Self {
            per_page: per_page.max(1),
            pagination: Pagination::new(),
            query: String::new(),
            page_items: Vec::new(),
            search_results: None,
            category_items: Vec::new(),
            categories: vec![ALL_CATEGORIES.to_string()],
            selected_category: Category::All,
            loading: true,
            loaded: false,
            error: None,
            generation: 0,
            latest_page: 0,
            latest_search: 0,
            page_pending: false,
            search_pending: false,
            selected: 0,
        }
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn selected_category(&self) -> &Category {
        &self.selected_category
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_loaded(&self) -> bool {
        self.loaded
    }

    pub fn in_flight(&self) -> bool {
        self.page_pending || self.search_pending
    }

    /// Fetch the current page. Used on first mount and for manual reloads.
    pub fn mount(&mut self) -> FetchRequest {
        if !self.loaded {
            self.loading = true;
        }
        self.page_request()
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn page_request(&mut self) -> FetchRequest {
        let generation = self.next_generation();
        self.latest_page = generation;
        self.page_pending = true;
        FetchRequest::Page {
            generation,
            page: self.pagination.current,
            limit: self.per_page,
            query: self.query.clone(),
        }
    }

    // ── Pagination ──

    pub fn next_page(&mut self) -> Option<FetchRequest> {
        if !self.pagination.can_go_next() {
            return None;
        }
        self.select_category(Category::All);
        self.pagination.current += 1;
        Some(self.page_request())
    }

    pub fn previous_page(&mut self) -> Option<FetchRequest> {
        if !self.pagination.can_go_previous() {
            return None;
        }
        self.select_category(Category::All);
        self.pagination.current -= 1;
        Some(self.page_request())
    }

    // ── Search ──

    /// Replace the query as typed. Every change issues its own search.
    pub fn input_query(&mut self, text: &str) -> Option<FetchRequest> {
        if text.is_empty() {
            self.clear_search();
            return None;
        }
        self.query = text.to_string();
        self.pagination.current = 1;
        self.select_category(Category::All);

        let generation = self.next_generation();
        self.latest_search = generation;
        self.search_pending = true;
        Some(FetchRequest::Search {
            generation,
            query: self.query.clone(),
            limit: self.per_page,
        })
    }

    pub fn push_query_char(&mut self, c: char) -> Option<FetchRequest> {
        let mut text = self.query.clone();
        text.push(c);
        self.input_query(&text)
    }

    pub fn pop_query_char(&mut self) -> Option<FetchRequest> {
        if self.query.is_empty() {
            return None;
        }
        let mut text = self.query.clone();
        text.pop();
        self.input_query(&text)
    }

    /// Drop the query and its results. No fetch: the last page stays visible.
    /// Anything still in flight for the old query is superseded.
    pub fn clear_search(&mut self) {
        self.latest_search = self.next_generation();
        self.query.clear();
        self.pagination.current = 1;
        self.search_results = None;
        self.search_pending = false;
        self.select_category(Category::All);
    }

    // ── Category filter ──

    /// Narrow the loaded page (never the search results) to one category.
    pub fn select_category(&mut self, category: Category) {
        self.category_items = match &category {
            Category::All => Vec::new(),
            Category::Named(name) => self
                .page_items
                .iter()
                .filter(|item| item.category_titles.iter().any(|t| t == name))
                .cloned()
                .collect(),
        };
        self.selected_category = category;
        self.selected = 0;
    }

    pub fn next_category(&mut self) {
        let index = self.category_index();
        let next = (index + 1) % self.categories.len();
        self.select_category(Category::from(self.categories[next].as_str()));
    }

    pub fn previous_category(&mut self) {
        let index = self.category_index();
        let prev = (index + self.categories.len() - 1) % self.categories.len();
        self.select_category(Category::from(self.categories[prev].as_str()));
    }

    fn category_index(&self) -> usize {
        self.categories
            .iter()
            .position(|c| c == self.selected_category.label())
            .unwrap_or(0)
    }

    // ── Responses ──

    /// Apply a fetch completion. Returns false when it was stale.
    pub fn apply(&mut self, response: FetchResponse) -> bool {
        match response {
            FetchResponse::Page { generation, result } => {
                if generation != self.latest_page {
                    tracing::debug!(generation, latest = self.latest_page, "stale page response");
                    return false;
                }
                self.page_pending = false;
                // Issued before the query last changed. Only useful as the
                // initial fallback page.
                let superseded = generation < self.latest_search;
                if superseded && self.loaded {
                    tracing::debug!(
                        generation,
                        latest = self.latest_search,
                        "page response superseded by query change"
                    );
                    return false;
                }
                self.loading = false;
                match result {
                    Ok(page) => {
                        if !superseded {
                            self.pagination.set_total(page.pagination.page_count());
                            if !self.query.is_empty() {
                                self.search_results = Some(page.data.clone());
                            }
                        }
                        self.categories = derive_categories(&page.data);
                        self.page_items = page.data;
                        self.loaded = true;
                        self.error = None;
                        let category = self.selected_category.clone();
                        self.select_category(category);
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, page = self.pagination.current, "page fetch failed");
                        self.error = Some(err.user_message());
                    }
                }
            }
            FetchResponse::Search { generation, result } => {
                if generation != self.latest_search || self.query.is_empty() {
                    tracing::debug!(generation, latest = self.latest_search, "stale search response");
                    return false;
                }
                self.search_pending = false;
                match result {
                    Ok(page) => {
                        self.pagination.set_total(page.pagination.page_count());
                        self.search_results = Some(page.data);
                        self.error = None;
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, query = %self.query, "search failed");
                        self.error = Some(err.user_message());
                    }
                }
                self.selected = 0;
            }
            FetchResponse::Artwork { .. } => return false,
        }
        self.clamp_selection();
        true
    }

    // ── Rendering state ──

    pub fn view(&self) -> ListingView<'_> {
        if self.loading {
            return ListingView::Loading;
        }
        match &self.selected_category {
            Category::Named(name) => {
                narrowed(&self.category_items, NoMatchReason::Category(name), &self.page_items)
            }
            Category::All => match &self.search_results {
                Some(results) if !self.query.is_empty() => {
                    narrowed(results, NoMatchReason::Search(&self.query), &self.page_items)
                }
                _ => ListingView::Results(&self.page_items),
            },
        }
    }

    pub fn selected_item(&self) -> Option<&ArtworkSummary> {
        self.view().rows().get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.view().rows().len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let len = self.view().rows().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}

fn narrowed<'a>(
    items: &'a [ArtworkSummary],
    reason: NoMatchReason<'a>,
    fallback: &'a [ArtworkSummary],
) -> ListingView<'a> {
    if items.is_empty() {
        ListingView::NoMatches { reason, fallback }
    } else {
        ListingView::Results(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, Page, PaginationInfo};
    use proptest::prelude::*;

    fn summary(id: u64, categories: &[&str]) -> ArtworkSummary {
        ArtworkSummary {
            id,
            title: format!("Artwork {}", id),
            image_id: Some(format!("img-{}", id)),
            category_titles: categories.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn page(data: Vec<ArtworkSummary>, total_pages: u64) -> Page {
        Page {
            data,
            pagination: PaginationInfo {
                total: total_pages * 10,
                total_pages: Some(total_pages),
            },
        }
    }

    fn ten_items() -> Vec<ArtworkSummary> {
        (1..=10)
            .map(|id| match id % 3 {
                0 => summary(id, &["Essentials", "Prints and Drawings"]),
                1 => summary(id, &["Painting and Sculpture of Europe"]),
                _ => summary(id, &["Essentials"]),
            })
            .collect()
    }

    fn page_response(request: &FetchRequest, data: Vec<ArtworkSummary>, total: u64) -> FetchResponse {
        FetchResponse::Page {
            generation: request.generation(),
            result: Ok(page(data, total)),
        }
    }

    fn search_response(request: &FetchRequest, data: Vec<ArtworkSummary>) -> FetchResponse {
        FetchResponse::Search {
            generation: request.generation(),
            result: Ok(page(data, 1)),
        }
    }

    fn loaded_screen() -> ListingScreen {
        let mut screen = ListingScreen::new(DEFAULT_PER_PAGE);
        let request = screen.mount();
        assert!(screen.apply(page_response(&request, ten_items(), 5)));
        screen
    }

    #[test]
    fn test_initial_load() {
        let mut screen = ListingScreen::new(DEFAULT_PER_PAGE);
        assert_eq!(screen.view(), ListingView::Loading);

        let request = screen.mount();
        assert_eq!(
            request,
            FetchRequest::Page {
                generation: 1,
                page: 1,
                limit: 10,
                query: String::new(),
            }
        );
        assert!(screen.in_flight());

        screen.apply(page_response(&request, ten_items(), 5));
        assert!(!screen.is_loading());
        assert!(!screen.in_flight());
        assert_eq!(screen.view().rows().len(), 10);
        assert!(!screen.pagination().can_go_previous());
        assert!(screen.pagination().can_go_next());
        assert_eq!(
            screen.categories(),
            &["All", "Painting and Sculpture of Europe", "Essentials", "Prints and Drawings"]
        );
    }

    #[test]
    fn test_failed_load_sets_error_and_clears_loading() {
        let mut screen = ListingScreen::new(DEFAULT_PER_PAGE);
        let request = screen.mount();
        screen.apply(FetchResponse::Page {
            generation: request.generation(),
            result: Err(ApiError::Status { status: 500 }),
        });

        assert!(!screen.is_loading());
        assert!(screen.error().unwrap().starts_with("Failed to fetch data"));
        assert_eq!(screen.view(), ListingView::Results(&[]));
    }

    #[test]
    fn test_page_buttons_reset_category_and_fetch() {
        let mut screen = loaded_screen();
        screen.select_category(Category::from("Essentials"));

        let request = screen.next_page().unwrap();
        assert_eq!(screen.selected_category(), &Category::All);
        assert_eq!(screen.pagination().current(), 2);
        assert!(matches!(request, FetchRequest::Page { page: 2, .. }));

        screen.apply(page_response(&request, ten_items(), 5));
        assert!(screen.pagination().can_go_previous());

        let request = screen.previous_page().unwrap();
        assert!(matches!(request, FetchRequest::Page { page: 1, .. }));
        assert!(screen.previous_page().is_none());
    }

    #[test]
    fn test_next_disabled_on_last_page() {
        let mut screen = ListingScreen::new(DEFAULT_PER_PAGE);
        let request = screen.mount();
        screen.apply(page_response(&request, ten_items(), 1));

        assert!(!screen.pagination().can_go_next());
        assert!(!screen.pagination().can_go_previous());
        assert!(screen.next_page().is_none());
    }

    #[test]
    fn test_category_narrows_loaded_page() {
        let mut screen = loaded_screen();
        screen.select_category(Category::from("Prints and Drawings"));

        let ids: Vec<u64> = screen.view().rows().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 6, 9]);
    }

    #[test]
    fn test_category_cycle_wraps() {
        let mut screen = loaded_screen();
        screen.previous_category();
        assert_eq!(screen.selected_category().label(), "Prints and Drawings");
        screen.next_category();
        assert_eq!(screen.selected_category(), &Category::All);
        screen.next_category();
        assert_eq!(screen.selected_category().label(), "Painting and Sculpture of Europe");
    }

    #[test]
    fn test_search_resets_page_and_replaces_results() {
        let mut screen = loaded_screen();
        let request = screen.next_page().unwrap();
        screen.apply(page_response(&request, ten_items(), 5));
        assert_eq!(screen.pagination().current(), 2);

        let request = screen.input_query("vase").unwrap();
        assert_eq!(screen.pagination().current(), 1);
        assert!(matches!(&request, FetchRequest::Search { query, .. } if query == "vase"));

        screen.apply(search_response(&request, vec![summary(77, &[]), summary(78, &[])]));
        let ids: Vec<u64> = screen.view().rows().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![77, 78]);
    }

    #[test]
    fn test_each_keystroke_issues_search() {
        let mut screen = loaded_screen();
        let first = screen.push_query_char('v').unwrap();
        let second = screen.push_query_char('a').unwrap();

        assert!(second.generation() > first.generation());
        assert_eq!(screen.query(), "va");
        assert!(!screen.apply(search_response(&first, vec![summary(1, &[])])));
        assert!(screen.apply(search_response(&second, vec![summary(2, &[])])));
        assert_eq!(screen.view().rows()[0].id, 2);
    }

    #[test]
    fn test_backspace_to_empty_clears_search() {
        let mut screen = loaded_screen();
        let request = screen.push_query_char('v').unwrap();
        screen.apply(search_response(&request, vec![summary(99, &[])]));

        assert!(screen.pop_query_char().is_none());
        assert_eq!(screen.query(), "");
        assert_eq!(screen.view().rows().len(), 10);
    }

    #[test]
    fn test_empty_search_falls_back_with_notice() {
        let mut screen = loaded_screen();
        let request = screen.input_query("vase").unwrap();
        screen.apply(search_response(&request, Vec::new()));

        match screen.view() {
            ListingView::NoMatches { reason, fallback } => {
                assert_eq!(reason, NoMatchReason::Search("vase"));
                assert_eq!(fallback, ten_items().as_slice());
            }
            other => panic!("expected NoMatches, got {:?}", other),
        }
    }

    #[test]
    fn test_clear_search_falls_back_to_last_page() {
        let mut screen = loaded_screen();
        let request = screen.input_query("vase").unwrap();
        screen.apply(search_response(&request, vec![summary(77, &[])]));

        screen.clear_search();
        assert_eq!(screen.query(), "");
        assert_eq!(screen.pagination().current(), 1);
        assert_eq!(screen.view(), ListingView::Results(ten_items().as_slice()));
    }

    #[test]
    fn test_search_response_after_clear_is_dropped() {
        let mut screen = loaded_screen();
        let request = screen.input_query("vase").unwrap();
        screen.clear_search();

        assert!(!screen.apply(search_response(&request, vec![summary(77, &[])])));
        assert_eq!(screen.view().rows().len(), 10);
        assert!(!screen.in_flight());
    }

    #[test]
    fn test_stale_page_response_discarded() {
        let mut screen = loaded_screen();
        let to_two = screen.next_page().unwrap();
        let to_three = screen.next_page().unwrap();
        assert!(to_three.generation() > to_two.generation());

        let back = screen.previous_page().unwrap();
        screen.apply(page_response(&back, vec![summary(1, &[])], 5));
        assert!(!screen.apply(page_response(&to_two, vec![summary(2, &[])], 5)));
        assert_eq!(screen.view().rows()[0].id, 1);
    }

    #[test]
    fn test_page_response_superseded_by_newer_search() {
        let mut screen = loaded_screen();
        let request = screen.input_query("vase").unwrap();
        screen.apply(FetchResponse::Search {
            generation: request.generation(),
            result: Ok(page(vec![summary(50, &[])], 3)),
        });
        let to_two = screen.next_page().unwrap();

        let request = screen.input_query("vasex").unwrap();
        screen.apply(search_response(&request, vec![summary(60, &[])]));
        assert_eq!(screen.pagination().total(), 1);

        assert!(!screen.apply(page_response(&to_two, vec![summary(51, &["Essentials"])], 3)));
        assert_eq!(screen.pagination().current(), 1);
        assert_eq!(screen.pagination().total(), 1);
        assert!(!screen.pagination().can_go_next());
        assert_eq!(screen.view().rows()[0].id, 60);
        assert_eq!(screen.categories().len(), 4);
        assert!(!screen.in_flight());
    }

    #[test]
    fn test_page_response_after_clear_keeps_fallback() {
        let mut screen = loaded_screen();
        let request = screen.input_query("vase").unwrap();
        screen.apply(search_response(&request, vec![summary(77, &[])]));
        let to_two = screen.next_page().unwrap();

        screen.clear_search();
        assert!(!screen.apply(page_response(&to_two, vec![summary(78, &[])], 3)));
        assert_eq!(screen.view(), ListingView::Results(ten_items().as_slice()));
    }

    #[test]
    fn test_initial_page_lands_after_early_search() {
        let mut screen = ListingScreen::new(DEFAULT_PER_PAGE);
        let initial = screen.mount();
        let search = screen.input_query("vase").unwrap();
        screen.apply(FetchResponse::Search {
            generation: search.generation(),
            result: Ok(page(vec![summary(50, &[])], 2)),
        });

        assert!(screen.apply(page_response(&initial, ten_items(), 5)));
        assert!(!screen.is_loading());
        assert!(screen.has_loaded());
        assert_eq!(screen.pagination().total(), 2);
        assert_eq!(screen.view().rows()[0].id, 50);
    }

    #[test]
    fn test_page_fetch_with_query_feeds_search_results() {
        let mut screen = loaded_screen();
        let request = screen.input_query("vase").unwrap();
        screen.apply(FetchResponse::Search {
            generation: request.generation(),
            result: Ok(page(vec![summary(50, &[])], 3)),
        });

        let request = screen.next_page().unwrap();
        assert!(matches!(&request, FetchRequest::Page { page: 2, query, .. } if query == "vase"));
        screen.apply(page_response(&request, vec![summary(51, &["Essentials"])], 3));
        assert_eq!(screen.view().rows()[0].id, 51);
        assert_eq!(screen.categories(), &["All", "Essentials"]);
    }

    #[test]
    fn test_selection_follows_rows() {
        let mut screen = loaded_screen();
        for _ in 0..20 {
            screen.select_next();
        }
        assert_eq!(screen.selected, 9);
        assert_eq!(screen.selected_item().unwrap().id, 10);

        screen.select_category(Category::from("Prints and Drawings"));
        assert_eq!(screen.selected, 0);
        screen.select_previous();
        assert_eq!(screen.selected_item().unwrap().id, 3);
    }

    #[test]
    fn test_derive_categories_deduplicates() {
        let items = vec![
            summary(1, &["B", "A"]),
            summary(2, &["A", "All", "C"]),
            summary(3, &[]),
        ];
        assert_eq!(derive_categories(&items), vec!["All", "B", "A", "C"]);
        assert_eq!(derive_categories(&[]), vec!["All"]);
    }

    fn arb_items() -> impl Strategy<Value = Vec<ArtworkSummary>> {
        let tags = prop::sample::subsequence(vec!["Essentials", "Textiles", "Arms", "Photography"], 0..4);
        prop::collection::vec(tags, 0..15).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, tags)| summary(i as u64 + 1, &tags))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_pagination_controls_at_boundaries(total in 1u32..40, target in 1u32..40) {
            let target = target.min(total);
            let mut screen = ListingScreen::new(DEFAULT_PER_PAGE);
            let request = screen.mount();
            screen.apply(page_response(&request, ten_items(), total as u64));

            while screen.pagination().current() < target {
                let request = screen.next_page().unwrap();
                screen.apply(page_response(&request, ten_items(), total as u64));
            }

            let pagination = screen.pagination();
            prop_assert_eq!(pagination.current(), target);
            prop_assert_eq!(!pagination.can_go_previous(), target == 1);
            prop_assert_eq!(!pagination.can_go_next(), target == total);
        }

        #[test]
        fn prop_all_restores_full_page(items in arb_items(), pick in 0usize..8) {
            let mut screen = ListingScreen::new(DEFAULT_PER_PAGE);
            let request = screen.mount();
            screen.apply(page_response(&request, items.clone(), 3));

            let categories = screen.categories().to_vec();
            let chosen = categories[pick % categories.len()].clone();
            screen.select_category(Category::from(chosen.as_str()));
            for row in screen.view().rows() {
                if chosen != ALL_CATEGORIES && !matches!(screen.view(), ListingView::NoMatches { .. }) {
                    prop_assert!(row.category_titles.contains(&chosen));
                }
            }

            screen.select_category(Category::All);
            prop_assert_eq!(screen.view(), ListingView::Results(items.as_slice()));
        }
    }
}
