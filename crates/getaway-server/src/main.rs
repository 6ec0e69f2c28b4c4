use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use getaway_export::pdf::ChromeRenderer;
use getaway_server::config::ServerConfig;
use getaway_server::state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let config = ServerConfig::from_env()?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    tracing::info!(
        environment = %config.environment,
        template = %config.template_path.display(),
        pages_dir = %config.pages_dir.display(),
        logo = %config.logo_path.display(),
        "starting server"
    );

    let renderer = Arc::new(ChromeRenderer::new(config.chrome_path.clone()));
    let state = AppState::new(config, renderer)?;
    let app = getaway_server::router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
