use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderName, HeaderValue, Method};
use pitchlab_backend::config::Config;
use pitchlab_backend::logging::{init_tracing, LogConfig};
use pitchlab_backend::middleware::rate_limit::rate_limit_cleanup_loop;
use pitchlab_backend::routes::build_router;
use pitchlab_backend::services::llm_provider::LlmProvider;
use pitchlab_backend::state::AppState;
use pitchlab_backend::store::Store;
use tokio::sync::broadcast;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

const HSTS_HEADER: &str = "max-age=31536000; includeSubDomains";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    init_tracing(&LogConfig::from(&config));
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting pitchlab-backend");
    tracing::debug!(config = ?config, "Loaded configuration");

    if let Err(e) = LlmProvider::validate_config(&config.llm) {
        tracing::error!(error = %e, "Invalid LLM configuration");
        std::process::exit(1);
    }

    let store = match Store::open(&config.sled_path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!(error = %e, path = %config.sled_path, "Failed to open sled database");
            std::process::exit(1);
        }
    };
    if let Err(e) = store.run_migrations() {
        tracing::error!(error = %e, "Failed to run migrations");
        std::process::exit(1);
    }

    let (shutdown_tx, _) = broadcast::channel::<()>(8);
    let state = AppState::new(store.clone(), &config, shutdown_tx.clone());

    let cleanup = tokio::spawn(rate_limit_cleanup_loop(
        state.rate_limiter().clone(),
        state.shutdown_rx(),
    ));

    let cors_layer = match build_cors_layer(&config) {
        Ok(layer) => layer,
        Err(message) => {
            tracing::error!(cors_origin = %config.cors_origin, "{message}");
            std::process::exit(1);
        }
    };

    let app = build_router(state)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("strict-transport-security"),
            HeaderValue::from_static(HSTS_HEADER),
        ));

    let addr = SocketAddr::new(config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "Failed to bind TCP listener");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, "Listening");

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(shutdown_tx.clone()));

    if let Err(e) = server.await {
        tracing::error!(error = %e, "HTTP server crashed");
    }

    // 服务器异常退出时也要停止后台任务
    let _ = shutdown_tx.send(());
    if let Err(e) = cleanup.await {
        tracing::warn!(error = %e, "Rate limiter cleanup task ended abnormally");
    }

    tracing::info!("Flushing store before exit");
    if let Err(e) = store.flush() {
        tracing::error!(error = %e, "Failed to flush store before exit");
    }
    tracing::info!("Shutdown complete");
}

fn build_cors_layer(config: &Config) -> Result<CorsLayer, String> {
    let base = CorsLayer::new()
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    if config.cors_origin.trim() == "*" {
        // 仅开发环境；通配符不能与 credentials 同用
        return Ok(base.allow_origin(Any));
    }

    config
        .cors_origin
        .parse::<HeaderValue>()
        .map(|origin| base.allow_origin(origin))
        .map_err(|e| format!("Invalid CORS_ORIGIN: {e}"))
}

async fn shutdown_signal(shutdown_tx: broadcast::Sender<()>) {
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable, waiting for Ctrl-C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Shutdown signal received");
    let _ = shutdown_tx.send(());
}
