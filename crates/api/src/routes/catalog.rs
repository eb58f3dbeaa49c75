//! Route definitions for the field catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Catalog routes mounted at `/catalog`.
///
/// ```text
/// GET /  -> get_catalog
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(catalog::get_catalog))
}
