use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use intake_core::{
    CoreConfig, KnowledgeBase,
    config::{data_dir_from_env_value, match_mode_from_env_value},
};

/// Main entry point for the intake service
///
/// Resolves configuration once, builds the knowledge base and serves the REST API.
///
/// # Environment Variables
/// - `INTAKE_REST_ADDR`: REST server address (default: "0.0.0.0:5000")
/// - `INTAKE_DATA_DIR`: Directory for record storage (default: "intake_data")
/// - `INTAKE_MATCH_MODE`: `substring`, `case-insensitive` or `word` (default: "substring")
/// - `API_KEY`: when set, `/api` routes require a matching `x-api-key` header
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("intake=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr: SocketAddr = std::env::var("INTAKE_REST_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:5000".into())
        .parse()?;

    let data_dir = data_dir_from_env_value(std::env::var("INTAKE_DATA_DIR").ok());
    let match_mode = match_mode_from_env_value(std::env::var("INTAKE_MATCH_MODE").ok())?;
    let cfg = Arc::new(CoreConfig::new(data_dir, match_mode)?);
    let knowledge = Arc::new(KnowledgeBase::builtin());

    tracing::info!(
        "++ Starting intake REST on {} (data: {}, matching: {}, {} conditions)",
        rest_addr,
        cfg.data_dir().display(),
        cfg.match_mode().as_str(),
        knowledge.condition_count()
    );

    let state = AppState::new(cfg, knowledge, std::env::var("API_KEY").ok());

    let listener = tokio::net::TcpListener::bind(rest_addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
