use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use http::HeaderValue;
use tokio::signal;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
};
use tracing::{error, info};

use shipping_ledger as ledger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = ledger::config::load_config().context("failed to load configuration")?;
    ledger::config::init_tracing(cfg.log_level(), cfg.log_json);
    ledger::handlers::health::init_start_time();

    // A store that cannot be reached is fatal
    let db_pool = ledger::db::establish_connection_from_app_config(&cfg)
        .await
        .map_err(|e| {
            error!("Failed to connect to the database: {}", e);
            e
        })
        .context("database connection failed")?;
    if cfg.auto_migrate {
        ledger::db::run_migrations(&db_pool)
            .await
            .context("failed running migrations")?;
    }

    let db_arc = Arc::new(db_pool);
    let app_state = ledger::AppState::new(db_arc.clone(), cfg.clone());

    // Build CORS layer from config
    let cors_layer = if cfg.cors_allow_any_origin {
        info!("Using permissive CORS (development environment)");
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = cfg
            .cors_origins()
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = ledger::app_router(app_state)
        .layer(CompressionLayer::new())
        .layer(cors_layer);

    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", cfg.host, cfg.port))?;
    info!("shipping-ledger listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Ok(pool) = Arc::try_unwrap(db_arc) {
        ledger::db::close_pool(pool).await?;
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
