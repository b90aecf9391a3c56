/// Per-session idea list pipeline: load once, derive facets, filter, paginate.
///
/// The collection is fetched by `load()` at most once and never mutated afterwards, so the
/// facet list is computed there and kept for the session. Everything else is a pure function
/// of the collection plus the view state held here.
///
/// Invariants:
/// - `current_page` stays within `1..=total_pages`, with at least one page
/// - changing the category or committing a search resets `current_page` to 1
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use ideas_common::client::IdeaSource;
use ideas_common::model::{CategoryFacet, Idea, ALL_CATEGORIES};

use crate::debounce::Debouncer;
use crate::error::AppError;
use crate::facets::derive_facets;
use crate::search::{clamp_page, filter_ideas, page_slice, total_pages};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ViewState {
    pub active_category: String,
    pub search_query: String,
    pub pending_query: String,
    /// Set on every search input, cleared when the debounced query is committed.
    pub searching: bool,
    pub current_page: usize,
    pub load_state: LoadState,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            active_category: ALL_CATEGORIES.to_string(),
            search_query: String::new(),
            pending_query: String::new(),
            searching: false,
            current_page: 1,
            load_state: LoadState::Loading,
        }
    }
}

/// Everything a render cycle needs, read under one lock.
#[derive(Debug, Clone)]
pub struct GallerySnapshot {
    pub view: ViewState,
    pub facets: Vec<CategoryFacet>,
    pub ideas: Vec<Idea>,
    pub total_pages: usize,
    pub total_matches: usize,
    pub page_size: usize,
}

#[derive(Default)]
struct SessionState {
    ideas: Vec<Idea>,
    facets: Vec<CategoryFacet>,
    view: ViewState,
    #[cfg(test)]
    search_commits: u64,
}

impl SessionState {
    fn matching(&self) -> Vec<&Idea> {
        filter_ideas(
            &self.ideas,
            &self.view.active_category,
            &self.view.search_query,
        )
    }

    /// Facets memoized at load; before that, the facets of the empty collection.
    fn facet_list(&self) -> Vec<CategoryFacet> {
        if self.facets.is_empty() {
            return derive_facets(&self.ideas);
        }
        self.facets.clone()
    }
}

pub struct IdeaListPipeline<S: IdeaSource> {
    source: Arc<S>,
    page_size: usize,
    state: Arc<RwLock<SessionState>>,
    search_debounce: Debouncer,
    load_started: AtomicBool,
}

impl<S: IdeaSource> IdeaListPipeline<S> {
    pub fn new(source: Arc<S>, page_size: usize, search_debounce: Duration) -> Self {
        Self {
            source,
            page_size: page_size.max(1),
            state: Arc::new(RwLock::new(SessionState::default())),
            search_debounce: Debouncer::new(search_debounce),
            load_started: AtomicBool::new(false),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Fetch the idea collection. Only the first call per pipeline does anything; there is
    /// no retry after a failure.
    pub async fn load(&self) -> LoadState {
        if self.load_started.swap(true, Ordering::SeqCst) {
            debug!("load already started for this session, skipping");
            return self.state.read().await.view.load_state.clone();
        }

        let fetched = self.source.fetch_ideas().await;

        let mut state = self.state.write().await;
        match fetched {
            Ok(ideas) => {
                state.facets = derive_facets(&ideas);
                state.ideas = ideas;
                state.view.load_state = LoadState::Ready;
                info!(
                    ideas = state.ideas.len(),
                    categories = state.facets.len() - 1,
                    "idea collection loaded"
                );
            }
            Err(e) => {
                warn!(error = %e, "failed to load ideas");
                state.facets = derive_facets(&[]);
                state.view.load_state = LoadState::Failed(e.load_failure_message());
            }
        }
        state.view.load_state.clone()
    }

    /// Record a keystroke. The query is committed after the debounce window passes with
    /// no further input.
    pub async fn set_search_input(&self, raw: impl Into<String>) {
        let raw = raw.into();
        {
            let mut state = self.state.write().await;
            state.view.pending_query = raw.clone();
            state.view.searching = true;
        }

        let state = Arc::clone(&self.state);
        self.search_debounce.schedule(async move {
            let mut state = state.write().await;
            state.view.search_query = raw;
            state.view.searching = false;
            state.view.current_page = 1;
            #[cfg(test)]
            {
                state.search_commits += 1;
            }
            debug!(query = %state.view.search_query, "search query committed");
        });
    }

    pub async fn set_active_category(&self, name: impl Into<String>) {
        let mut state = self.state.write().await;
        state.view.active_category = name.into();
        state.view.current_page = 1;
        debug!(category = %state.view.active_category, "category selected");
    }

    /// Move to page `n`, clamped into the valid range for the current filters.
    pub async fn set_page(&self, n: i64) -> usize {
        let mut state = self.state.write().await;
        let pages = total_pages(state.matching().len(), self.page_size);
        state.view.current_page = clamp_page(n, pages);
        state.view.current_page
    }

    pub async fn visible_ideas(&self) -> Vec<Idea> {
        let state = self.state.read().await;
        let matching = state.matching();
        page_slice(&matching, state.view.current_page, self.page_size)
            .iter()
            .map(|idea| (*idea).clone())
            .collect()
    }

    pub async fn total_pages(&self) -> usize {
        let state = self.state.read().await;
        total_pages(state.matching().len(), self.page_size)
    }

    pub async fn facets(&self) -> Vec<CategoryFacet> {
        self.state.read().await.facet_list()
    }

    pub async fn view_state(&self) -> ViewState {
        self.state.read().await.view.clone()
    }

    pub async fn snapshot(&self) -> GallerySnapshot {
        let state = self.state.read().await;
        let matching = state.matching();
        let ideas = page_slice(&matching, state.view.current_page, self.page_size)
            .iter()
            .map(|idea| (*idea).clone())
            .collect();
        GallerySnapshot {
            view: state.view.clone(),
            facets: state.facet_list(),
            ideas,
            total_pages: total_pages(matching.len(), self.page_size),
            total_matches: matching.len(),
            page_size: self.page_size,
        }
    }

    pub async fn get_idea(&self, id: &str) -> Result<Idea, AppError> {
        let state = self.state.read().await;
        state
            .ideas
            .iter()
            .find(|idea| idea.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }
}
