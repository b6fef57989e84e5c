//! # Session Client
//!
//! Request/response and server-push operations against the chat widget
//! backend. Stateless: each call is independent and carries the
//! identifiers it needs as parameters.

pub mod api;
pub mod client;
pub mod error;
pub mod models;

pub use api::{AnswerStream, SessionApi};
pub use client::HttpSessionClient;
pub use error::{ClientError, Result};
pub use models::AnswerEvent;
