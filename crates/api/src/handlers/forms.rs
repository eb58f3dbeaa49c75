//! Handlers for saved forms.
//!
//! The legacy `/forms/save` and `/forms/update/{id}` routes reuse these
//! handlers unchanged. Legacy `/forms/list` returns every form unpaged.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use formsmith_core::error::CoreError;
use formsmith_core::paging::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use formsmith_core::types::DbId;
use formsmith_db::models::form::{CreateForm, UpdateForm};

use crate::error::{AppError, AppResult};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn form_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Form", id })
}

/// GET /api/v1/forms
///
/// List form summaries ordered by id.
pub async fn list_forms(
    State(state): State<AppState>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = params?;
    let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
    let offset = clamp_offset(params.offset);
    let forms = state.store.list(limit, offset).await?;

    Ok(Json(DataResponse { data: forms }))
}

/// GET /api/v1/forms/list
///
/// Every form summary ordered by id, read from the store a page at a time.
pub async fn list_all_forms(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let mut forms = Vec::new();
    loop {
        let page = state.store.list(MAX_LIMIT, forms.len() as i64).await?;
        let last_page = (page.len() as i64) < MAX_LIMIT;
        forms.extend(page);
        if last_page {
            break;
        }
    }

    Ok(Json(DataResponse { data: forms }))
}

/// POST /api/v1/forms
///
/// Create a form. Returns 201 with the stored record.
pub async fn create_form(
    State(state): State<AppState>,
    payload: Result<Json<CreateForm>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let form = input.validate()?;
    let record = state.store.create(&form).await?;

    tracing::info!(
        form_id = record.id,
        name = %record.name,
        field_count = record.fields.len(),
        "Form created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// GET /api/v1/forms/{id}
pub async fn get_form(
    State(state): State<AppState>,
    form_id: Result<Path<DbId>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(form_id) = form_id?;
    let record = state
        .store
        .get(form_id)
        .await?
        .ok_or_else(|| form_not_found(form_id))?;

    Ok(Json(DataResponse { data: record }))
}

/// PUT /api/v1/forms/{id}
///
/// Replace the name, the fields, or both. Omitted attributes are kept.
pub async fn update_form(
    State(state): State<AppState>,
    form_id: Result<Path<DbId>, PathRejection>,
    payload: Result<Json<UpdateForm>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(form_id) = form_id?;
    let Json(input) = payload?;
    let changes = input.validate()?;
    let record = state
        .store
        .update(form_id, &changes)
        .await?
        .ok_or_else(|| form_not_found(form_id))?;

    tracing::info!(
        form_id,
        field_count = record.fields.len(),
        "Form updated",
    );

    Ok(Json(DataResponse { data: record }))
}

/// DELETE /api/v1/forms/{id}
pub async fn delete_form(
    State(state): State<AppState>,
    form_id: Result<Path<DbId>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(form_id) = form_id?;
    if !state.store.delete(form_id).await? {
        return Err(form_not_found(form_id));
    }

    tracing::info!(form_id, "Form deleted");

    Ok(StatusCode::NO_CONTENT)
}
