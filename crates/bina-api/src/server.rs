//! Router assembly and serving.

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use bina_config::allows_any_origin;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::routes::{api_routes, ml_routes};
use crate::state::{AppState, MlState};

/// CORS for a configured origin list.
///
/// `"*"` anywhere in the list allows any origin without credentials.
/// Otherwise only the listed origins are allowed, with credentials.
/// Unparseable origins are dropped with a warning.
#[must_use]
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if allows_any_origin(origins) {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_credentials(false);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// The screening API with CORS and request tracing.
pub fn api_router(state: AppState, cors_origins: &[String]) -> Router {
    api_routes()
        .with_state(state)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// The scoring service with CORS and request tracing.
pub fn ml_router(state: MlState, cors_origins: &[String]) -> Router {
    ml_routes()
        .with_state(state)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// Bind `addr` and serve `router` until Ctrl-C.
///
/// # Errors
///
/// Returns an I/O error if the address cannot be bound or the server fails.
pub async fn serve(addr: &str, router: Router, name: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(service = name, addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
