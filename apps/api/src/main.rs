use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use calculator_api::{
    config::Config,
    infrastructure::{
        ml::gemini_analyzer::GeminiAnalyzer,
        storage::{local_snapshot_store::LocalSnapshotStore, traits::SnapshotStore},
    },
    presentation::http::{routes::create_router, state::AppState},
};
use http::{HeaderValue, Method, header};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Uses RUST_LOG if set, otherwise sensible defaults
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| {
            tracing_subscriber::EnvFilter::try_new("info,calculator_api=debug,tower_http=debug")
        })
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Config::from_env()?;

    let analyzer = Arc::new(
        GeminiAnalyzer::new(
            config.gemini_api_key.clone(),
            &config.gemini_base_url,
            &config.gemini_model,
            Duration::from_secs(config.analysis_timeout_seconds),
        )
        .context("failed to build Gemini client")?,
    );
    let snapshots = Arc::new(LocalSnapshotStore::new(config.snapshot_path.clone()));
    tracing::info!(
        model = %config.gemini_model,
        snapshot = %snapshots.path().display(),
        "Analyzer and snapshot store ready"
    );

    let state = AppState {
        analyzer,
        snapshots,
        config: config.clone(),
    };

    let cors = if config.is_dev() {
        CorsLayer::new().allow_origin(tower_http::cors::Any)
    } else {
        CorsLayer::new().allow_origin(AllowOrigin::list(Vec::<HeaderValue>::new()))
    }
    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
    .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
    .max_age(Duration::from_secs(3600));

    let app = create_router(state)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        "Calculator listening on {} (route {}, env {})",
        addr,
        config.route_prefix,
        config.env
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("SIGTERM received, initiating graceful shutdown");
        }
    }
}
