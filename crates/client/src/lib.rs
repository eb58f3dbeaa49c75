//! Client side of form persistence.
//!
//! [`HttpFormGateway`] talks to the Formsmith API over HTTP; [`FormSaver`]
//! wraps any gateway and turns a builder snapshot into a create or update
//! call while keeping at most one save per form in flight.

pub mod api;
pub mod saver;

pub use api::HttpFormGateway;
pub use saver::FormSaver;
