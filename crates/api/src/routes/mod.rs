pub mod catalog;
pub mod forms;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /catalog                                         palette templates (GET)
///
/// /forms                                           list, create
/// /forms/{id}                                      get, update, delete
/// /forms/list                                      legacy list (GET)
/// /forms/save                                      legacy create (POST)
/// /forms/update/{id}                               legacy update (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/catalog", catalog::router())
        .nest("/forms", forms::router())
}
