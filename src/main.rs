use anyhow::Result;
use tracing::{info, warn};

use feddit_pulse::config::AppConfig;
use feddit_pulse::feddit::FedditClient;
use feddit_pulse::pipeline::SentimentPipeline;
use feddit_pulse::sentiment::SentimentClassifier;
use feddit_pulse::web;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "feddit_pulse=info".into()),
        )
        .init();

    info!("Loading configuration...");
    let config = AppConfig::load()?;

    let feddit = FedditClient::new(&config.feddit);
    match feddit.get_version().await {
        Ok(version) => info!("Feddit API reachable, version {}", version),
        Err(e) => warn!("Feddit API version probe failed: {}", e),
    }

    let classifier = SentimentClassifier::new(&config.classifier);
    let pipeline = SentimentPipeline::new(feddit, classifier, config.classifier.max_concurrent);
    let state = web::state::AppState::new(pipeline);

    let router = web::create_router(state);
    let addr = format!("{}:{}", config.web.host, config.web.port);
    info!("Starting web server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
