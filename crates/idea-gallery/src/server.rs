/// MCP server exposing one idea gallery session.
///
/// Exposes six tools:
/// - `view_gallery`: Current page of ideas plus load state, facets and pagination
/// - `list_facets`: Category filter options with their idea counts
/// - `search_ideas`: Feed search input (committed after the debounce window)
/// - `select_category`: Switch the category filter
/// - `set_page`: Jump to a page (clamped)
/// - `get_idea`: Look up a single loaded idea by ID
use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use tracing::info;

use ideas_common::client::IdeasClient;
use ideas_common::mcp_api::{
    FacetInfo, FacetListResponse, GalleryView, GetIdeaParams, IdeaCard, LoadStatus,
    SearchIdeasParams, SelectCategoryParams, SetPageParams,
};

use crate::config::Config;
use crate::pipeline::{GallerySnapshot, IdeaListPipeline, LoadState};

#[derive(Clone)]
pub struct IdeaGalleryServer {
    pipeline: Arc<IdeaListPipeline<IdeasClient>>,
    submit_url: Option<String>,
    tool_router: ToolRouter<IdeaGalleryServer>,
}

impl IdeaGalleryServer {
    pub fn new(pipeline: Arc<IdeaListPipeline<IdeasClient>>, submit_url: Option<String>) -> Self {
        Self {
            pipeline,
            submit_url,
            tool_router: Self::tool_router(),
        }
    }

    /// Start a fresh session: new pipeline, with its one load running in the background.
    pub fn start_session(client: Arc<IdeasClient>, config: &Config) -> Self {
        let pipeline = Arc::new(IdeaListPipeline::new(
            client,
            config.page_size,
            config.search_debounce,
        ));

        let loader = Arc::clone(&pipeline);
        tokio::spawn(async move {
            loader.load().await;
        });

        Self::new(pipeline, config.submit_url.clone())
    }

    async fn current_view(&self) -> GalleryView {
        let snapshot = self.pipeline.snapshot().await;
        to_gallery_view(snapshot, self.submit_url.clone())
    }
}

#[tool_router]
impl IdeaGalleryServer {
    #[tool(description = "Show the current page of the idea gallery: visible ideas, load state, category facets, active filters and pagination.")]
    async fn view_gallery(&self) -> Result<Json<GalleryView>, String> {
        Ok(Json(self.current_view().await))
    }

    #[tool(description = "List idea categories with the number of ideas in each. The first entry, 'All', means no category filter.")]
    async fn list_facets(&self) -> Result<Json<FacetListResponse>, String> {
        let facets = self.pipeline.facets().await;
        Ok(Json(FacetListResponse {
            facets: facets.iter().map(FacetInfo::from).collect(),
        }))
    }

    #[tool(description = "Search ideas by title or description (case-insensitive). The query is applied after a short quiet period; until then the view reports searching=true. Resets to page 1.")]
    async fn search_ideas(
        &self,
        Parameters(params): Parameters<SearchIdeasParams>,
    ) -> Result<Json<GalleryView>, String> {
        self.pipeline.set_search_input(params.query).await;
        Ok(Json(self.current_view().await))
    }

    #[tool(description = "Filter ideas by category (e.g. 'AI'), or pass 'All' to clear the filter. Resets to page 1.")]
    async fn select_category(
        &self,
        Parameters(params): Parameters<SelectCategoryParams>,
    ) -> Result<Json<GalleryView>, String> {
        if params.category.trim().is_empty() {
            return Err("category must not be empty".to_string());
        }

        self.pipeline.set_active_category(params.category).await;
        Ok(Json(self.current_view().await))
    }

    #[tool(description = "Go to a page of the filtered results. Out-of-range page numbers are clamped to the first or last page.")]
    async fn set_page(
        &self,
        Parameters(params): Parameters<SetPageParams>,
    ) -> Result<Json<GalleryView>, String> {
        let page = self.pipeline.set_page(params.page).await;
        info!(requested = params.page, page, "page changed");
        Ok(Json(self.current_view().await))
    }

    #[tool(description = "Get a single idea by its ID.")]
    async fn get_idea(
        &self,
        Parameters(params): Parameters<GetIdeaParams>,
    ) -> Result<Json<IdeaCard>, String> {
        let id = params.id.trim().to_string();
        if id.is_empty() {
            return Err("id must not be empty".to_string());
        }

        if let LoadState::Failed(message) = self.pipeline.view_state().await.load_state {
            return Err(format!("ideas failed to load: {message}"));
        }

        let idea = self
            .pipeline
            .get_idea(&id)
            .await
            .map_err(|e| e.to_string())?;
        Ok(Json(IdeaCard::from(&idea)))
    }
}

fn to_load_status(state: &LoadState) -> LoadStatus {
    match state {
        LoadState::Loading => LoadStatus::Loading,
        LoadState::Ready => LoadStatus::Ready,
        LoadState::Failed(message) => LoadStatus::Failed {
            message: message.clone(),
        },
    }
}

fn to_gallery_view(snapshot: GallerySnapshot, submit_url: Option<String>) -> GalleryView {
    GalleryView {
        load_state: to_load_status(&snapshot.view.load_state),
        active_category: snapshot.view.active_category,
        search_query: snapshot.view.search_query,
        pending_query: snapshot.view.pending_query,
        searching: snapshot.view.searching,
        current_page: snapshot.view.current_page,
        total_pages: snapshot.total_pages,
        page_size: snapshot.page_size,
        total_matches: snapshot.total_matches,
        ideas: snapshot.ideas.iter().map(IdeaCard::from).collect(),
        facets: snapshot.facets.iter().map(FacetInfo::from).collect(),
        submit_url,
    }
}

#[tool_handler]
impl ServerHandler for IdeaGalleryServer {
    fn get_info(&self) -> ServerInfo {
        let mut instructions = "Idea gallery MCP server. Browses a list of project ideas loaded \
             once per session. Use view_gallery to see the current page, search_ideas to \
             search titles and descriptions, select_category with a name from list_facets \
             to filter, set_page to paginate, and get_idea for a single idea."
            .to_string();
        if let Some(url) = &self.submit_url {
            instructions.push_str(&format!(" New ideas can be submitted at {url}."));
        }

        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: "idea-gallery".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(instructions),
        }
    }
}
