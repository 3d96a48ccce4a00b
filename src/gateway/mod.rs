//! Boundary contract to the external retrieval engine.
//!
//! The engine's internal execution (inverted-index storage, ranking,
//! tokenization) lives behind [`RetrievalGateway`]. The contract is narrow:
//! a request goes in, a page of records plus facet bucket counts comes back,
//! with the counts computed over the same filtered result set. Repeated
//! identical requests against unchanged data return identical responses, and
//! retrieval never mutates index state.

mod http;
mod memory;

pub use http::HttpGateway;
pub use memory::MemoryGateway;

use crate::error::AppError;
use crate::models::PaymentRecord;
use crate::query::RetrievalRequest;
use crate::schema::FacetGroup;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result type for gateway operations
pub type GatewayResult<T> = std::result::Result<T, RetrievalError>;

/// Errors surfaced by a retrieval attempt.
///
/// A failure is never a valid empty response: callers must present a
/// distinct "results unavailable" state, not zero results.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    /// The engine could not be reached (connect failure, timeout)
    #[error("transport failure: {0}")]
    Transport(String),

    /// The engine rejected the query
    #[error("engine rejected request (status {status}): {detail}")]
    Engine { status: u16, detail: String },

    /// The engine answered with an undecodable body
    #[error("undecodable engine response: {0}")]
    Decode(String),
}

impl From<RetrievalError> for AppError {
    fn from(err: RetrievalError) -> Self {
        match err {
            RetrievalError::Transport(msg) => AppError::RetrievalTransport(msg),
            RetrievalError::Engine { status, detail } => {
                AppError::RetrievalEngine(format!("status {status}: {detail}"))
            }
            RetrievalError::Decode(msg) => AppError::RetrievalEngine(msg),
        }
    }
}

/// One `{value, count}` pair within a facet's aggregated counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetBucket {
    #[serde(rename = "_id")]
    pub value: String,

    pub count: u64,
}

/// A facet group's aggregated counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetBuckets {
    pub buckets: Vec<FacetBucket>,
}

/// Matched-and-paginated records plus facet counts.
///
/// Serializes directly into the wire shape:
/// `{ payments, totalPages, facets: { <group>Facet: { buckets } } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalResponse {
    /// Page-sized ordered records; may be shorter on the last page
    pub payments: Vec<PaymentRecord>,

    pub total_pages: u32,

    /// Keyed by response key (`pspFacet`, `schemeFacet`, ...). Counts are
    /// computed with the full filter set applied consistently, including
    /// the bucket's own group ("current-state" counts).
    pub facets: BTreeMap<String, FacetBuckets>,
}

impl RetrievalResponse {
    /// Buckets for one facet group, empty when the group is absent
    pub fn buckets(&self, group: FacetGroup) -> &[FacetBucket] {
        self.facets
            .get(group.response_key())
            .map(|b| b.buckets.as_slice())
            .unwrap_or_default()
    }
}

/// The retrieval engine boundary.
///
/// Synchronous from the caller's perspective; implementations may do
/// asynchronous I/O internally. Idempotent and read-only.
#[async_trait]
pub trait RetrievalGateway: Send + Sync {
    async fn retrieve(&self, request: &RetrievalRequest) -> GatewayResult<RetrievalResponse>;
}
