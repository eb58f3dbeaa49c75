//! Handler for the field catalog.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/catalog
///
/// The palette templates, in display order.
pub async fn get_catalog(State(state): State<AppState>) -> impl IntoResponse {
    Json(DataResponse {
        data: state.catalog.templates().to_vec(),
    })
}
