//! Declarative description of the payment search index.
//!
//! The schema is a pure, versioned document: a tree of [`FieldDescriptor`]s
//! stating what is searchable, what is facetable, and how autocomplete and
//! numeric fields are indexed. It carries no behavior beyond validation and
//! path lookups. A malformed schema is a fatal configuration error at
//! startup; it is never surfaced per-query.

mod field;
mod group;
mod index;

pub use field::{AutocompleteConfig, FieldDescriptor, FieldKind, NumericConfig};
pub use group::FacetGroup;
pub use index::{payments_schema, IndexSchema};

use crate::error::AppError;

/// Errors raised while validating or loading an index schema
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("duplicate field name '{name}' in scope '{scope}'")]
    DuplicateField { scope: String, name: String },

    #[error("empty field name in scope '{scope}'")]
    EmptyName { scope: String },

    #[error("field '{path}': invalid autocomplete config ({detail})")]
    InvalidAutocomplete { path: String, detail: String },

    #[error("field '{path}': integers indexed without doubles")]
    InvalidNumeric { path: String },

    #[error("field '{path}': kind '{kind}' cannot be facetable")]
    NotFacetable { path: String, kind: String },

    #[error("field '{path}': kind '{kind}' cannot be searchable")]
    NotSearchable { path: String, kind: String },

    #[error("facet group '{group}' does not resolve to a facetable field at '{path}'")]
    MissingFacetField { group: FacetGroup, path: String },

    #[error("schema document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read schema document: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SchemaError> for AppError {
    fn from(err: SchemaError) -> Self {
        AppError::SchemaValidation(err.to_string())
    }
}
