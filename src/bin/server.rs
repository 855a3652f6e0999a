use std::sync::Arc;
use std::time::Duration;

use docify::{
    api::{create_app, DocService},
    store::MemoryProjectStore,
    Config,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::load()?;
    let bind = config.server.bind.clone();

    let service = Arc::new(DocService::new(config, Arc::new(MemoryProjectStore::new()))?);
    let providers = service.providers();

    info!("docify server starting...");
    if providers.is_empty() {
        info!("No AI providers configured; set GEMINI_API_KEY or MISTRAL_API_KEY");
    } else {
        info!("AI providers: {}", providers.join(", "));
    }
    info!("Health check: http://{}/health", bind);

    let pruned = service.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            pruned.prune_rate_limits().await;
        }
    });

    let app = create_app(service);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("Server listening on http://{}", bind);

    axum::serve(listener, app).await?;

    Ok(())
}
