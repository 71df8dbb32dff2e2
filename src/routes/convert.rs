//! Conversion endpoint
//!
//! `POST /convert` takes the raw document as the request body (any content
//! type) and answers with the rendered PDF as `application/octet-stream`.

use std::net::SocketAddr;

use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::header,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};

use tracing::Instrument;
use uuid::Uuid;

use crate::convert::convert_document;
use crate::error::{AppError, Result};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/convert", post(convert))
}

async fn convert(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    body: Bytes,
) -> Result<Response> {
    let client = super::client_label(&connect_info);

    if body.is_empty() {
        tracing::warn!(client = %client, "No request body");
        return Err(AppError::NoBody);
    }

    let span = tracing::info_span!("conversion_job", job_id = %Uuid::new_v4(), client = %client);
    let expose_context = state.config().server.expose_error_context;

    async move {
        tracing::debug!(bytes = body.len(), "Conversion request");

        let pdf = convert_document(state.converter(), state.scratch_dir().to_path_buf(), body)
            .await
            .map_err(|e| AppError::from_job(e, expose_context))?;

        tracing::info!(bytes = pdf.len(), "Converted document");

        Ok::<_, AppError>(
            ([(header::CONTENT_TYPE, "application/octet-stream")], pdf).into_response(),
        )
    }
    .instrument(span)
    .await
}
