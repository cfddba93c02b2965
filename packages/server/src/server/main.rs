// Main entry point for the grow advisor server

use std::sync::Arc;

use anyhow::{Context, Result};
use grow_advisor::domains::products::ProductCatalog;
use grow_advisor::kernel::{GenerationSettings, OpenAiCompletionService, ServerDeps};
use grow_advisor::{server::build_app, Config};
use openai_client::OpenAIClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,grow_advisor=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Grow Advisor");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        model = %config.llm_model,
        timeout_secs = config.llm_timeout.as_secs(),
        "Configuration loaded"
    );

    // Completion service
    let mut client =
        OpenAIClient::new(config.openai_api_key.clone()).with_timeout(config.llm_timeout);
    if let Some(base_url) = &config.openai_base_url {
        client = client.with_base_url(base_url);
    }
    let ai = OpenAiCompletionService::new(
        client,
        GenerationSettings {
            model: config.llm_model.clone(),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
        },
    );

    // Product catalog; a missing or unreadable file means no curated products
    let catalog = match &config.product_catalog_path {
        Some(path) => ProductCatalog::load(path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Continuing without a product catalog");
            ProductCatalog::empty()
        }),
        None => ProductCatalog::empty(),
    };
    tracing::info!(entries = catalog.len(), "Product catalog ready");

    let deps = ServerDeps::new(Arc::new(ai), Arc::new(catalog), config.llm_timeout);
    let app = build_app(deps, config.request_timeout());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Upload form: http://localhost:{}/", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
