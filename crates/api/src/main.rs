use anyhow::Context;

use stockkeep_infra::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stockkeep_observability::init();

    let config = ServiceConfig::from_env().context("invalid configuration")?;
    let services = stockkeep_api::app::services::build_services(&config.store).await?;
    let app = stockkeep_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
