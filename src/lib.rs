//! Faceted retrieval over payment transaction records.
//!
//! The crate fronts an external retrieval engine: it models the index
//! schema, turns operator input (free text, facet toggles, pagination) into
//! structured retrieval requests, and orchestrates the request lifecycle,
//! debouncing keystrokes and discarding superseded responses. Engine
//! internals stay behind the [`gateway::RetrievalGateway`] boundary.

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod query;
pub mod schema;
pub mod session;

pub use error::{AppError, Result};
