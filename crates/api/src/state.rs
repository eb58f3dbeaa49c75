use std::sync::Arc;

use formsmith_core::catalog::FieldCatalog;
use formsmith_db::store::FormStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Form storage backend.
    pub store: Arc<dyn FormStore>,
    /// Palette templates served to the builder UI.
    pub catalog: Arc<FieldCatalog>,
}
