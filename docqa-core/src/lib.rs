//! Core of the docqa document question-answering client.
//!
//! Holds everything that does not touch a terminal: the backend HTTP contract
//! ([`api`]), the wire and domain types ([`types`]), client-side validation
//! ([`validate`]), the conversation log ([`chat`]), the active-document
//! session ([`session`]) and the [`workflow`] state machine that ties them
//! together.

pub mod api;
pub mod chat;
pub mod error;
pub mod session;
pub mod types;
pub mod validate;
pub mod workflow;

pub use api::{Backend, HttpBackend};
pub use error::{ApiError, ValidationError};
pub use workflow::{Command, Outcome, Workflow};
