//! Route modules for the PDF Converter Server

pub mod convert;
pub mod health;

use std::net::SocketAddr;

use axum::{extract::{ConnectInfo, DefaultBodyLimit}, Router};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config().server.max_body_bytes;

    Router::new()
        .merge(health::router())
        .merge(convert::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `host:port` of the caller, when the server was started with connect info
pub(crate) fn client_label(connect_info: &Option<ConnectInfo<SocketAddr>>) -> String {
    match connect_info {
        Some(ConnectInfo(addr)) => addr.to_string(),
        None => "unknown".to_string(),
    }
}
