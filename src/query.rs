//! Query intent and retrieval-request building

use crate::schema::{FacetGroup, IndexSchema};
use crate::session::FacetSelection;
use serde::{Deserialize, Serialize};

/// Transient value object capturing the operator's input at the moment a
/// request is issued. Constructed fresh per request; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryIntent {
    /// Free-text search term; empty means no text constraint
    pub term: String,

    /// Currently selected facet values
    pub facets: FacetSelection,

    /// 1-indexed result page
    pub page: u32,

    /// Records per page
    pub page_size: usize,
}

impl QueryIntent {
    /// Create a new intent: empty term, no facets, first page of ten
    pub fn new() -> Self {
        Self {
            term: String::new(),
            facets: FacetSelection::new(),
            page: 1,
            page_size: 10,
        }
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    pub fn with_facets(mut self, facets: FacetSelection) -> Self {
        self.facets = facets;
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

impl Default for QueryIntent {
    fn default() -> Self {
        Self::new()
    }
}

/// Free-text relevance clause: one term matched across the searchable
/// fields, split by capability. A field lands in `prefix_paths` when its
/// edge-gram range covers the term length (partial-prefix matching) and in
/// `analyzed_paths` otherwise (full-term analyzed matching). A record
/// matches when any path matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextClause {
    pub term: String,
    pub prefix_paths: Vec<String>,
    pub analyzed_paths: Vec<String>,
}

/// Exact-match filter against one facet group's facetable sibling field.
/// Values are OR-ed within the clause; clauses are AND-ed across groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterClause {
    pub group: FacetGroup,
    pub path: String,
    pub values: Vec<String>,
}

/// One facet aggregation to compute over the filtered result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetSpec {
    pub group: FacetGroup,
    pub path: String,
    pub max_buckets: usize,
}

/// A single retrieval request: filter + relevance clauses, pagination, and
/// the parallel facet-aggregation specs computed over the same result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalRequest {
    /// 1-indexed page; page `p` covers records `[(p-1)*limit, p*limit)` of
    /// the filtered, deterministically ordered result set
    pub page: u32,

    pub limit: usize,

    pub text: Option<TextClause>,

    pub filters: Vec<FilterClause>,

    pub facets: Vec<FacetSpec>,
}

impl RetrievalRequest {
    /// An unconstrained request matches all records (still paginated)
    pub fn is_match_all(&self) -> bool {
        self.text.is_none() && self.filters.is_empty()
    }

    /// Serialize as wire query parameters: `q?`, `page`, `limit`, and one
    /// repeated `<group>=<value>` pair per selected facet value
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if let Some(text) = &self.text {
            pairs.push(("q".to_string(), text.term.clone()));
        }
        pairs.push(("page".to_string(), self.page.to_string()));
        pairs.push(("limit".to_string(), self.limit.to_string()));

        for filter in &self.filters {
            for value in &filter.values {
                pairs.push((filter.group.to_string(), value.clone()));
            }
        }

        pairs
    }
}

/// Turns a [`QueryIntent`] into a [`RetrievalRequest`], honoring the
/// schema's field capabilities
pub struct QueryBuilder<'a> {
    schema: &'a IndexSchema,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(schema: &'a IndexSchema) -> Self {
        Self { schema }
    }

    pub fn build(&self, intent: &QueryIntent) -> RetrievalRequest {
        let term = intent.term.trim();

        let text = if term.is_empty() {
            None
        } else {
            Some(self.text_clause(term))
        };

        let filters = intent
            .facets
            .groups()
            .map(|(group, values)| FilterClause {
                group,
                path: group.field_path().to_string(),
                values: values.iter().cloned().collect(),
            })
            .collect();

        let facets = FacetGroup::ALL
            .into_iter()
            .map(|group| FacetSpec {
                group,
                path: group.field_path().to_string(),
                max_buckets: group.bucket_limit(),
            })
            .collect();

        RetrievalRequest {
            page: intent.page.max(1),
            limit: intent.page_size.max(1),
            text,
            filters,
            facets,
        }
    }

    fn text_clause(&self, term: &str) -> TextClause {
        let term_len = term.chars().count();
        // Multi-word input cannot be served from the edge-gram index.
        let single_word = !term.contains(char::is_whitespace);

        let mut prefix_paths = Vec::new();
        let mut analyzed_paths = Vec::new();

        for (path, field) in self.schema.searchable_text_fields() {
            match field.autocomplete_config() {
                Some(cfg) if single_word && cfg.covers_len(term_len) => prefix_paths.push(path),
                _ => analyzed_paths.push(path),
            }
        }

        TextClause {
            term: term.to_string(),
            prefix_paths,
            analyzed_paths,
        }
    }
}
