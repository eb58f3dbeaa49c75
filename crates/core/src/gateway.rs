//! Persistence gateway contract.
//!
//! The builder never talks to storage directly. A [`FormGateway`]
//! implementation (the HTTP client in `formsmith-client`, or an in-memory
//! fake in tests) fetches and saves whole form records.
//!
//! [`SaveTracker`] enforces the at-most-one-in-flight-save-per-form rule.

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use crate::field::FieldInstance;
use crate::form::{FormRecord, FormSummary};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures surfaced to the action that triggered a gateway call.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// No stored form has this id.
    #[error("Form {id} not found")]
    NotFound { id: DbId },

    /// Network failure or a non-2xx response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Another save for the same form has not finished yet.
    #[error("A save for {0} is already in flight")]
    SaveInFlight(SaveKey),
}

// ---------------------------------------------------------------------------
// Gateway trait
// ---------------------------------------------------------------------------

/// Fetch, list, create and update whole form records.
pub trait FormGateway: Send + Sync {
    fn list_forms(&self) -> impl Future<Output = Result<Vec<FormSummary>, GatewayError>> + Send;

    fn get_form(&self, id: DbId) -> impl Future<Output = Result<FormRecord, GatewayError>> + Send;

    /// Store a new form; the storage assigns the id.
    fn create_form(
        &self,
        name: &str,
        fields: &[FieldInstance],
    ) -> impl Future<Output = Result<FormRecord, GatewayError>> + Send;

    /// Replace the name and fields of an existing form.
    fn update_form(
        &self,
        id: DbId,
        name: &str,
        fields: &[FieldInstance],
    ) -> impl Future<Output = Result<FormRecord, GatewayError>> + Send;
}

// ---------------------------------------------------------------------------
// Save discipline
// ---------------------------------------------------------------------------

/// Identifies the form a save targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveKey {
    /// A form that has never been stored.
    New,
    Existing(DbId),
}

impl SaveKey {
    pub fn for_form(id: Option<DbId>) -> Self {
        id.map_or(Self::New, Self::Existing)
    }
}

impl std::fmt::Display for SaveKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => f.write_str("new form"),
            Self::Existing(id) => write!(f, "form {id}"),
        }
    }
}

/// Tracks which forms currently have a save outstanding.
#[derive(Debug, Default)]
pub struct SaveTracker {
    in_flight: Mutex<HashSet<SaveKey>>,
}

impl SaveTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the save slot for `key`. The slot is released when the returned
    /// guard is dropped, whether the save succeeded or not.
    pub fn begin(&self, key: SaveKey) -> Result<SaveGuard<'_>, GatewayError> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(key) {
            return Err(GatewayError::SaveInFlight(key));
        }
        Ok(SaveGuard { tracker: self, key })
    }

    pub fn is_in_flight(&self, key: SaveKey) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&key)
    }
}

/// Holds a form's save slot for as long as it lives.
#[derive(Debug)]
pub struct SaveGuard<'a> {
    tracker: &'a SaveTracker,
    key: SaveKey,
}

impl Drop for SaveGuard<'_> {
    fn drop(&mut self) {
        self.tracker
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}
