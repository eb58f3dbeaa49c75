//! Form composition core.
//!
//! Everything in this crate is I/O-free: the field catalog, the canvas of
//! placed fields, selection-driven editing, the drag-reorder controller and
//! the persistence gateway contract. The API server and the HTTP client both
//! depend on it for the shared wire types.

pub mod builder;
pub mod canvas;
pub mod catalog;
pub mod drag;
pub mod error;
pub mod field;
pub mod form;
pub mod gateway;
pub mod paging;
pub mod types;
pub mod values;
