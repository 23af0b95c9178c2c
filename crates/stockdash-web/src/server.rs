use std::sync::Arc;

use axum::middleware;
use axum::routing::get;
use axum::Router;
use stockdash_core::{Warehouse, WarehouseConfig, YahooAdapter};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::api;
use crate::cli::ServeArgs;
use crate::error::{legacy_error_status, CliError};
use crate::state::AppState;

/// Route table for the dashboard API.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/", get(api::root_handler))
        .route("/companies", get(api::companies_handler))
        .route("/stock/:symbol", get(api::stock_handler))
        .route("/refresh/:symbol", get(api::refresh_handler))
        .route("/stored", get(api::stored_handler));

    if app_state.legacy_error_status {
        router = router.layer(middleware::map_response(legacy_error_status));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Install the global fmt subscriber, honoring `RUST_LOG`.
///
/// Returns `false` when a subscriber was already installed.
pub fn init_tracing() -> bool {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .try_init()
        .is_ok();
    if !installed {
        debug!("tracing subscriber already installed, keeping it");
    }
    installed
}

/// Open the cache, wire the Yahoo adapter, and serve until the process ends.
pub async fn serve(args: ServeArgs) -> Result<(), CliError> {
    init_tracing();
    info!("Starting stockdash server");

    let config = args
        .db_path
        .map(WarehouseConfig::new)
        .unwrap_or_default();
    info!(db_path = %config.db_path.display(), "Opening price cache");
    let warehouse = Warehouse::open(config)?;

    let provider = YahooAdapter::default().with_timeout_ms(args.timeout_ms);
    let mut app_state = AppState::new(warehouse, Arc::new(provider))
        .with_legacy_error_status(args.legacy_error_status);
    if args.no_sample_data {
        info!("Sample fallback disabled");
        app_state = app_state.without_sample_data();
    } else if let Some(path) = args.sample_data {
        info!(path = %path.display(), "Sample fallback from file");
        app_state = app_state.with_sample_data(path);
    } else {
        info!("Sample fallback from bundled dataset");
    }

    info!("Registering routes:");
    info!("  GET /");
    info!("  GET /companies");
    info!("  GET /stock/{{symbol}}");
    info!("  GET /refresh/{{symbol}}");
    info!("  GET /stored?limit=200");

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    info!(addr = %args.bind, "Server listening");
    axum::serve(listener, build_router(app_state)).await?;

    Ok(())
}
