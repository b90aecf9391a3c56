use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{CategoryFacet, Idea};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchIdeasParams {
    /// Raw search input. Matched case-insensitively against titles and descriptions
    /// once the input has been quiet for the debounce window. Empty clears the search.
    pub query: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SelectCategoryParams {
    /// Category label such as "AI", or "All" to clear the category filter.
    pub category: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SetPageParams {
    /// 1-based page number. Out-of-range values are clamped.
    pub page: i64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetIdeaParams {
    /// Idea identifier as listed in the gallery.
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IdeaCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Vec<String>,
    pub prize: f64,
    pub difficulty: String,
}

impl From<&Idea> for IdeaCard {
    fn from(idea: &Idea) -> Self {
        Self {
            id: idea.id.clone(),
            title: idea.title.clone(),
            description: idea.description.clone(),
            category: idea.category.clone(),
            prize: idea.prize,
            difficulty: idea.difficulty.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FacetInfo {
    pub name: String,
    pub count: usize,
}

impl From<&CategoryFacet> for FacetInfo {
    fn from(facet: &CategoryFacet) -> Self {
        Self {
            name: facet.name.clone(),
            count: facet.count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GalleryView {
    pub load_state: LoadStatus,
    pub active_category: String,
    /// Committed search query the results are filtered by.
    pub search_query: String,
    /// Latest raw input, possibly not yet committed.
    pub pending_query: String,
    /// True while a search input is waiting out the debounce window.
    pub searching: bool,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    /// Number of ideas matching the current filters across all pages.
    pub total_matches: usize,
    pub ideas: Vec<IdeaCard>,
    pub facets: Vec<FacetInfo>,
    /// Where new ideas can be submitted, when configured.
    pub submit_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FacetListResponse {
    pub facets: Vec<FacetInfo>,
}
