//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own, with OpenAPI/Swagger UI at `/swagger-ui`.
//!
//! ## Intended use
//! Useful for development and debugging. Production deployments run the workspace's `intake-run`
//! binary, which serves the same router.

use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use intake_core::{
    config::{data_dir_from_env_value, match_mode_from_env_value},
    CoreConfig, KnowledgeBase,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("INTAKE_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".into());

    tracing::info!("-- Starting intake REST API on {}", addr);

    let data_dir: PathBuf = data_dir_from_env_value(std::env::var("INTAKE_DATA_DIR").ok());
    let match_mode = match_mode_from_env_value(std::env::var("INTAKE_MATCH_MODE").ok())?;
    let cfg = Arc::new(CoreConfig::new(data_dir, match_mode)?);

    let state = AppState::new(
        cfg,
        Arc::new(KnowledgeBase::builtin()),
        std::env::var("API_KEY").ok(),
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
