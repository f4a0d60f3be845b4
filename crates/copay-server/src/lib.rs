//! JSON endpoints over the coparticipation spreadsheet.
//!
//! `GET /api/getProcedures` and `GET /api/getPartners` read their ranges on
//! every request, map them through `copay-core`, and answer with camelCase
//! record arrays. Caching is left to whatever sits in front, via
//! `Cache-Control`.

pub mod error;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::http::{Method, header};
use axum::routing::get;
use copay_sheets::{GridSource, SheetsClient, SheetsConfig};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::{ApiError, PartnersError, ProceduresError};

/// Shared by every request.
pub struct AppState {
    pub config: SheetsConfig,
    pub source: Arc<dyn GridSource>,
}

impl AppState {
    /// Configuration from the environment, reading through the Sheets API.
    ///
    /// Missing variables are not an error here; each endpoint reports what
    /// it lacks when called.
    pub fn from_env() -> Self {
        let config = SheetsConfig::from_env();
        let source = Arc::new(SheetsClient::new(config.api_base.clone()));
        Self { config, source }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let partners_cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/getProcedures", get(handlers::get_procedures))
        .route(
            "/api/getPartners",
            get(handlers::get_partners).layer(partners_cors),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
