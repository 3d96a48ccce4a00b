//! Field descriptors: one entry per indexed attribute

use serde::{Deserialize, Serialize};

/// Prefix-matching configuration for autocomplete fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteConfig {
    /// Shortest indexed prefix (edge gram), ≥ 1
    pub min_prefix_length: usize,

    /// Longest indexed prefix, ≥ min
    pub max_prefix_length: usize,

    /// Fold diacritics before matching ("é" matches "e")
    #[serde(default = "default_true")]
    pub fold_diacritics: bool,
}

impl AutocompleteConfig {
    /// Whether a term of this length can be served from the prefix index
    pub fn covers_len(&self, len: usize) -> bool {
        (self.min_prefix_length..=self.max_prefix_length).contains(&len)
    }
}

/// Dual-representation configuration for numeric fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericConfig {
    /// Index the integer representation (exact queries on whole values)
    pub index_integers: bool,

    /// Index the double representation (range queries, mixed precision)
    pub index_doubles: bool,
}

/// Semantic type and analysis mode of an indexed field.
///
/// A recursive tagged variant: nested documents carry their children here,
/// so the schema is a tree by construction and cannot contain cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FieldKind {
    /// Keyword-analyzed text, matched verbatim
    ExactText,

    /// Tokenized text for relevance matching
    AnalyzedText,

    /// Edge-gram indexed text for partial-prefix matching
    AutocompleteText(AutocompleteConfig),

    /// Numeric value, possibly dual-indexed
    Numeric(NumericConfig),

    /// Point-in-time value
    Date,

    /// Parent of an ordered set of child descriptors
    NestedDocument { children: Vec<FieldDescriptor> },
}

impl FieldKind {
    /// Discriminator name as it appears in the schema document
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::ExactText => "exact-text",
            FieldKind::AnalyzedText => "analyzed-text",
            FieldKind::AutocompleteText(_) => "autocomplete-text",
            FieldKind::Numeric(_) => "numeric",
            FieldKind::Date => "date",
            FieldKind::NestedDocument { .. } => "nested-document",
        }
    }

    /// Text kinds carry an implied exact-match sibling and may be facetable
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            FieldKind::ExactText | FieldKind::AnalyzedText | FieldKind::AutocompleteText(_)
        )
    }

    /// Kinds usable in the free-text relevance clause
    pub fn is_relevance_text(&self) -> bool {
        matches!(self, FieldKind::AnalyzedText | FieldKind::AutocompleteText(_))
    }
}

/// One indexed attribute, possibly nested under a parent document path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Path segment, unique within its parent scope
    pub name: String,

    #[serde(flatten)]
    pub kind: FieldKind,

    /// Whether a parallel un-analyzed sub-field exists for bucketed counting.
    /// Relevance-text fields are never used as facet keys directly; only
    /// this exact-match sibling is.
    #[serde(default)]
    pub facetable: bool,

    /// Whether the field participates in the free-text relevance clause
    #[serde(default)]
    pub searchable: bool,
}

impl FieldDescriptor {
    pub fn exact(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::ExactText)
    }

    pub fn analyzed(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::AnalyzedText)
    }

    pub fn autocomplete(name: impl Into<String>, min: usize, max: usize) -> Self {
        Self::new(
            name,
            FieldKind::AutocompleteText(AutocompleteConfig {
                min_prefix_length: min,
                max_prefix_length: max,
                fold_diacritics: true,
            }),
        )
    }

    pub fn numeric(name: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Numeric(NumericConfig {
                index_integers: true,
                index_doubles: true,
            }),
        )
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub fn nested(name: impl Into<String>, children: Vec<FieldDescriptor>) -> Self {
        Self::new(name, FieldKind::NestedDocument { children })
    }

    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            facetable: false,
            searchable: false,
        }
    }

    pub fn facetable(mut self) -> Self {
        self.facetable = true;
        self
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    /// Autocomplete configuration, when this is an autocomplete field
    pub fn autocomplete_config(&self) -> Option<&AutocompleteConfig> {
        match &self.kind {
            FieldKind::AutocompleteText(cfg) => Some(cfg),
            _ => None,
        }
    }

    /// Children, when this is a nested document
    pub fn children(&self) -> &[FieldDescriptor] {
        match &self.kind {
            FieldKind::NestedDocument { children } => children,
            _ => &[],
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_discriminator_serialization() {
        let field = FieldDescriptor::autocomplete("bin", 3, 6).searchable();
        let json = serde_json::to_value(&field).unwrap();

        assert_eq!(json["kind"], "autocomplete-text");
        assert_eq!(json["minPrefixLength"], 3);
        assert_eq!(json["maxPrefixLength"], 6);
        assert_eq!(json["searchable"], true);
    }

    #[test]
    fn test_nested_round_trip() {
        let field = FieldDescriptor::nested(
            "amount",
            vec![
                FieldDescriptor::exact("currency").facetable(),
                FieldDescriptor::numeric("value"),
            ],
        );

        let json = serde_json::to_string(&field).unwrap();
        let back: FieldDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, field);
        assert_eq!(back.children().len(), 2);
    }

    #[test]
    fn test_covers_len() {
        let cfg = AutocompleteConfig {
            min_prefix_length: 3,
            max_prefix_length: 6,
            fold_diacritics: true,
        };
        assert!(!cfg.covers_len(2));
        assert!(cfg.covers_len(3));
        assert!(cfg.covers_len(6));
        assert!(!cfg.covers_len(7));
    }

    #[test]
    fn test_relevance_text_kinds() {
        assert!(FieldDescriptor::analyzed("a").kind.is_relevance_text());
        assert!(FieldDescriptor::autocomplete("b", 1, 4).kind.is_relevance_text());
        assert!(!FieldDescriptor::exact("c").kind.is_relevance_text());
        assert!(!FieldDescriptor::date("d").kind.is_relevance_text());
    }
}
