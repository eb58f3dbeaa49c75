//! Route definitions for saved forms.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::forms;
use crate::state::AppState;

/// Form routes mounted at `/forms`.
///
/// ```text
/// GET    /              -> list_forms
/// POST   /              -> create_form
/// GET    /{id}          -> get_form
/// PUT    /{id}          -> update_form
/// DELETE /{id}          -> delete_form
///
/// GET    /list          -> list_all_forms (legacy, unpaged)
/// POST   /save          -> create_form  (legacy)
/// PUT    /update/{id}   -> update_form  (legacy)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(forms::list_forms).post(forms::create_form))
        .route("/list", get(forms::list_all_forms))
        .route("/save", post(forms::create_form))
        .route("/update/{id}", put(forms::update_form))
        .route(
            "/{id}",
            get(forms::get_form)
                .put(forms::update_form)
                .delete(forms::delete_form),
        )
}
