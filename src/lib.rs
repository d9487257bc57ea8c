//! Configuration-driven registration service for a school event.
//!
//! A JSON catalog of grades and classes is loaded once at startup and shared
//! read-only across requests. Attendees submit a registration form validated
//! against the catalog; an admin view lists and manages registrations; a QR
//! endpoint links to the public form.

pub mod catalog;
pub mod db;
pub mod error;
pub mod qr;
pub mod register;
pub mod routes;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::info;

use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(routes::admin_page))
        .route(
            "/register",
            get(routes::register_page).post(routes::register_submit),
        )
        .route("/api/refresh", get(routes::api_refresh))
        .route("/admin/remove", post(routes::admin_remove))
        .route("/qr", get(routes::qr_page))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(state: Arc<AppState>) -> anyhow::Result<()> {
    let address = format!("{}:{}", state.host, state.port);
    let app = router(state);

    let listener = TcpListener::bind(&address).await?;
    info!("listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
