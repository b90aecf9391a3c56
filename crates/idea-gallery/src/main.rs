use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use idea_gallery::config::Config;
use idea_gallery::error::AppError;
use idea_gallery::server::IdeaGalleryServer;
use ideas_common::client::IdeasClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting idea-gallery MCP server");

    let config = Config::from_env()?;
    info!(
        api_url = %config.api_url,
        page_size = config.page_size,
        debounce_ms = config.search_debounce.as_millis(),
        submit_url = config.submit_url.is_some(),
        "configuration loaded"
    );

    let client = Arc::new(IdeasClient::new(config.client_config()).map_err(AppError::from)?);
    info!(
        timeout_ms = client.config().timeout.as_millis(),
        "ideas client configured"
    );

    if let Some(addr) = config.tcp_listen_addr.clone() {
        let listener = TcpListener::bind(&addr).await?;
        info!(listen_addr = %addr, "MCP server ready, serving on TCP");
        loop {
            let (stream, peer) = listener.accept().await?;
            let server = IdeaGalleryServer::start_session(Arc::clone(&client), &config);
            tokio::spawn(async move {
                tracing::info!(peer = %peer, "MCP client connected, session started");
                let service = server.serve(stream).await.inspect_err(|e| {
                    tracing::error!(error = %e, "MCP server error");
                })?;
                service.waiting().await?;
                tracing::info!(peer = %peer, "MCP client disconnected, session ended");
                Ok::<(), anyhow::Error>(())
            });
        }
    } else {
        let server = IdeaGalleryServer::start_session(client, &config);
        info!("MCP server ready, serving on stdio");
        let service = server.serve(stdio()).await.inspect_err(|e| {
            tracing::error!(error = %e, "MCP server error");
        })?;
        service.waiting().await?;
        info!("MCP server shut down");
    }
    Ok(())
}
