//! The versioned index schema document and its load-time validation

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{FacetGroup, FieldDescriptor, FieldKind, SchemaError};

/// Static, versioned mapping from field path to [`FieldDescriptor`].
///
/// Loaded once at process start. Schema changes require redeploying the
/// retrieval engine's index configuration, not a runtime reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSchema {
    /// Schema document version
    pub version: u32,

    /// Root field descriptors
    pub fields: Vec<FieldDescriptor>,
}

impl IndexSchema {
    pub fn new(version: u32, fields: Vec<FieldDescriptor>) -> Self {
        Self { version, fields }
    }

    /// The payment-transaction index mapping
    pub fn payments() -> Self {
        Self::new(
            1,
            vec![
                FieldDescriptor::exact("transactionType").facetable(),
                FieldDescriptor::exact("last4"),
                FieldDescriptor::nested(
                    "amount",
                    vec![
                        FieldDescriptor::exact("currency").facetable(),
                        FieldDescriptor::numeric("value"),
                    ],
                ),
                FieldDescriptor::exact("scheme").facetable(),
                FieldDescriptor::exact("countryCode").facetable(),
                FieldDescriptor::autocomplete("bin", 3, 6).searchable(),
                FieldDescriptor::autocomplete("customerEmail", 3, 15).searchable(),
                FieldDescriptor::autocomplete("grabLinkID", 3, 20).searchable(),
                FieldDescriptor::nested(
                    "glResponse",
                    vec![
                        FieldDescriptor::numeric("code"),
                        FieldDescriptor::exact("status").facetable(),
                    ],
                ),
                FieldDescriptor::exact("psp").facetable(),
                FieldDescriptor::date("transactionDate"),
                FieldDescriptor::autocomplete("merchantName", 3, 20).searchable(),
            ],
        )
    }

    /// Parse and validate a schema document
    pub fn from_json(doc: &str) -> Result<Self, SchemaError> {
        let schema: Self = serde_json::from_str(doc)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Read, parse, and validate a schema document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let doc = std::fs::read_to_string(path)?;
        Self::from_json(&doc)
    }

    /// Validate the whole tree. Called once at startup; failure is fatal.
    pub fn validate(&self) -> Result<(), SchemaError> {
        validate_scope("", &self.fields)?;

        for group in FacetGroup::ALL {
            let path = group.field_path();
            match self.descriptor(path) {
                Some(field) if field.facetable => {}
                _ => {
                    return Err(SchemaError::MissingFacetField {
                        group,
                        path: path.to_string(),
                    })
                }
            }
        }

        Ok(())
    }

    /// Resolve a dot path to its descriptor
    pub fn descriptor(&self, path: &str) -> Option<&FieldDescriptor> {
        let mut fields = self.fields.as_slice();
        let mut segments = path.split('.').peekable();

        while let Some(segment) = segments.next() {
            let field = fields.iter().find(|f| f.name == segment)?;
            if segments.peek().is_none() {
                return Some(field);
            }
            fields = field.children();
        }

        None
    }

    /// The facetable field backing a facet group
    pub fn facet_field(&self, group: FacetGroup) -> Option<&FieldDescriptor> {
        self.descriptor(group.field_path())
            .filter(|field| field.facetable)
    }

    /// All searchable relevance-text fields, as (full path, descriptor)
    pub fn searchable_text_fields(&self) -> Vec<(String, &FieldDescriptor)> {
        let mut out = Vec::new();
        collect_searchable("", &self.fields, &mut out);
        out
    }
}

fn validate_scope(scope: &str, fields: &[FieldDescriptor]) -> Result<(), SchemaError> {
    for (i, field) in fields.iter().enumerate() {
        if field.name.is_empty() {
            return Err(SchemaError::EmptyName {
                scope: scope.to_string(),
            });
        }
        if fields[..i].iter().any(|f| f.name == field.name) {
            return Err(SchemaError::DuplicateField {
                scope: scope.to_string(),
                name: field.name.clone(),
            });
        }

        let path = join_path(scope, &field.name);

        match &field.kind {
            FieldKind::AutocompleteText(cfg) => {
                if cfg.min_prefix_length < 1 {
                    return Err(SchemaError::InvalidAutocomplete {
                        path,
                        detail: "minPrefixLength must be at least 1".to_string(),
                    });
                }
                if cfg.min_prefix_length > cfg.max_prefix_length {
                    return Err(SchemaError::InvalidAutocomplete {
                        path,
                        detail: format!(
                            "minPrefixLength {} exceeds maxPrefixLength {}",
                            cfg.min_prefix_length, cfg.max_prefix_length
                        ),
                    });
                }
            }
            FieldKind::Numeric(cfg) => {
                // Integer-only indexing would lose range queries over
                // mixed-precision input.
                if cfg.index_integers && !cfg.index_doubles {
                    return Err(SchemaError::InvalidNumeric { path });
                }
            }
            _ => {}
        }

        // Kind checks apply to every node, nested-document parents included.
        if field.facetable && !field.kind.is_text() {
            return Err(SchemaError::NotFacetable {
                path,
                kind: field.kind.name().to_string(),
            });
        }
        if field.searchable && !field.kind.is_relevance_text() {
            return Err(SchemaError::NotSearchable {
                path,
                kind: field.kind.name().to_string(),
            });
        }

        if let FieldKind::NestedDocument { children } = &field.kind {
            validate_scope(&path, children)?;
        }
    }

    Ok(())
}

fn collect_searchable<'a>(
    scope: &str,
    fields: &'a [FieldDescriptor],
    out: &mut Vec<(String, &'a FieldDescriptor)>,
) {
    for field in fields {
        let path = join_path(scope, &field.name);
        if field.searchable && field.kind.is_relevance_text() {
            out.push((path.clone(), field));
        }
        collect_searchable(&path, field.children(), out);
    }
}

fn join_path(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    }
}

/// The process-wide payments schema
pub fn payments_schema() -> &'static IndexSchema {
    static SCHEMA: Lazy<IndexSchema> = Lazy::new(IndexSchema::payments);
    &SCHEMA
}
