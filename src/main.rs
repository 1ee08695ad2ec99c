use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pdf_optimizer::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pdf_optimizer=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = Arc::new(Config::from_env()?);

    tracing::info!("Starting PDF Optimizer Service");
    tracing::info!("Max upload size: {}MB", config.max_upload_size_mb);
    tracing::info!("Temp root: {}", config.temp_root.display());
    tracing::info!(
        "External tools: optimizer={}, archiver={}",
        config.optimizer_bin,
        config.archiver_bin
    );

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let app = pdf_optimizer::app(config);

    tracing::info!("Server listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
