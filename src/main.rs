use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use meteor_gateway::api::{AppState, create_router};
use meteor_gateway::config::Config;
use meteor_gateway::fetch::{Endpoints, UpstreamClient};
use meteor_gateway::render::{RemoteRenderer, Renderer, UnavailableRenderer};
use meteor_gateway::safety::DomainBlocklist;

/// Capture service calls get the same budget as the screenshot route.
const RENDER_SERVICE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

#[derive(Debug, Parser)]
#[command(name = "meteor-gateway", about = "Aggregation gateway for the Meteor bot")]
struct Cli {
    /// Address to listen on. Overrides BIND_ADDR.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,meteor_gateway=debug")),
        )
        .with_target(true)
        .init();

    let upstream = UpstreamClient::new(Endpoints::default())?;
    let renderer = select_renderer(&config, &upstream).await;

    let mut blocklist = DomainBlocklist::default();
    blocklist.extend(config.extra_blocked_domains.iter());
    tracing::info!(domains = blocklist.len(), "screenshot blocklist loaded");

    let state = Arc::new(AppState {
        upstream,
        renderer,
        blocklist,
        api_key: config.api_key.clone(),
    });

    let bind_addr = cli.bind.unwrap_or(config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn select_renderer(config: &Config, upstream: &UpstreamClient) -> Arc<dyn Renderer> {
    if let Some(base_url) = &config.render_service_url {
        tracing::info!(base_url = %base_url, "using remote render service");
        return Arc::new(RemoteRenderer::new(
            upstream.clone(),
            base_url,
            RENDER_SERVICE_TIMEOUT,
        ));
    }

    #[cfg(feature = "browser")]
    {
        match meteor_gateway::render::BrowserRenderer::launch().await {
            Ok(browser) => {
                tracing::info!("using headless browser for screenshots");
                return Arc::new(browser);
            }
            Err(e) => tracing::warn!("failed to launch browser: {}", e),
        }
    }

    tracing::warn!("no render capability configured, screenshots will be unavailable");
    Arc::new(UnavailableRenderer)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
