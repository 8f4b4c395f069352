use axum::{
    Json, Router,
    extract::State,
    response::Json as ResponseJson,
    routing::{delete, post},
};
use db::models::processo::{ClearFilter, Processo};
use serde::Serialize;

use crate::{AppState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ClearFilteredResponse {
    pub apagados: u64,
}

/// Full-replace upsert keyed on `processNumber`. Validation happens before
/// any backend call.
pub async fn create_or_update_processo(
    State(state): State<AppState>,
    Json(payload): Json<Processo>,
) -> Result<ResponseJson<StatusResponse>, ApiError> {
    payload.validate()?;

    tracing::debug!(processo = %payload.process_number, "Upserting processo");
    Processo::upsert(&state.db.conn, &payload).await?;
    Ok(ResponseJson(StatusResponse { status: "ok" }))
}

pub async fn list_processos(
    State(state): State<AppState>,
) -> Result<ResponseJson<Vec<Processo>>, ApiError> {
    let processos = Processo::find_all(&state.db.conn).await?;
    Ok(ResponseJson(processos))
}

/// Delegates to the backend-side `limpar_mes_atual` procedure for the current
/// local month. Acknowledgement only; the backend does not report a count.
pub async fn clear_current_month(
    State(state): State<AppState>,
) -> Result<ResponseJson<StatusResponse>, ApiError> {
    Processo::clear_current_month(&state.db.conn).await?;
    Ok(ResponseJson(StatusResponse { status: "limpo" }))
}

pub async fn clear_filtered(
    State(state): State<AppState>,
    Json(filter): Json<ClearFilter>,
) -> Result<ResponseJson<ClearFilteredResponse>, ApiError> {
    let apagados = Processo::clear_filtered(&state.db.conn, &filter).await?;
    tracing::info!(apagados, "Cleared filtered processos");
    Ok(ResponseJson(ClearFilteredResponse { apagados }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/processos",
            post(create_or_update_processo).get(list_processos),
        )
        .route("/limpar-mes", delete(clear_current_month))
        .route("/limpar-filtrados", post(clear_filtered))
}
