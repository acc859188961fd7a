use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use crate::blocking::run_blocking;
use crate::state::SharedState;

pub async fn get_datasets(State(state): State<SharedState>) -> Json<Vec<String>> {
    Json(state.config.datasets.clone())
}

/// Paths the existing frontend reads, mapped to dataset names.
pub const LEGACY_PATHS: [(&str, &str); 3] = [
    ("/dataSep", "September"),
    ("/dataJan", "January"),
    ("/dataSecond", "Second"),
];

pub async fn get_document(
    State(state): State<SharedState>,
    Path(dataset): Path<String>,
) -> Response {
    serve_document(state, dataset).await
}

/// Serves `data_<dataset>.json` as written by the last merge or update.
pub async fn serve_document(state: SharedState, dataset: String) -> Response {
    if !state.knows(&dataset) {
        return (StatusCode::NOT_FOUND, format!("Unknown dataset: {dataset}")).into_response();
    }

    let docs = state.documents.clone();
    let name = dataset.clone();
    match run_blocking(move || docs.read_raw(&name)).await {
        Ok(Some(raw)) => ([(header::CONTENT_TYPE, "application/json")], raw).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, format!("No data for {dataset} yet")).into_response(),
        Err(e) => {
            error!(dataset = %dataset, "document read failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read data").into_response()
        }
    }
}
