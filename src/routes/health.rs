//! Liveness check

use std::net::SocketAddr;

use axum::{extract::ConnectInfo, http::StatusCode, routing::get, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health_check).head(health_check))
}

/// `GET /` and `HEAD /`: 200 with an empty body
pub async fn health_check(connect_info: Option<ConnectInfo<SocketAddr>>) -> StatusCode {
    tracing::debug!(client = %super::client_label(&connect_info), "Healthcheck request");
    StatusCode::OK
}
