//! In-process retrieval gateway for tests and offline development.
//!
//! Executes the structured clauses of a [`RetrievalRequest`] over a fixed
//! record set with the same semantics the remote engine guarantees: AND
//! across facet groups, OR within a group, per-field prefix matching, a
//! deterministic sort (transaction date descending, link id ascending), and
//! facet counts computed over the full filtered result set.

use crate::models::PaymentRecord;
use crate::query::{FilterClause, RetrievalRequest, TextClause};
use crate::schema::IndexSchema;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

use super::{FacetBucket, FacetBuckets, GatewayResult, RetrievalGateway, RetrievalResponse};

pub struct MemoryGateway {
    schema: IndexSchema,
    records: Vec<PaymentRecord>,
}

impl MemoryGateway {
    pub fn new(schema: IndexSchema, records: Vec<PaymentRecord>) -> Self {
        Self { schema, records }
    }

    fn matches(&self, doc: &Value, request: &RetrievalRequest) -> bool {
        if let Some(text) = &request.text {
            if !self.matches_text(doc, text) {
                return false;
            }
        }
        request
            .filters
            .iter()
            .all(|filter| matches_filter(doc, filter))
    }

    fn matches_text(&self, doc: &Value, text: &TextClause) -> bool {
        let prefix_hit = text.prefix_paths.iter().any(|path| {
            let fold = self
                .schema
                .descriptor(path)
                .and_then(|f| f.autocomplete_config())
                .map(|cfg| cfg.fold_diacritics)
                .unwrap_or(false);

            string_at(doc, path)
                .is_some_and(|value| normalize(&value, fold).starts_with(&normalize(&text.term, fold)))
        });

        let analyzed_hit = text.analyzed_paths.iter().any(|path| {
            string_at(doc, path).is_some_and(|value| analyzed_match(&value, &text.term))
        });

        prefix_hit || analyzed_hit
    }
}

#[async_trait]
impl RetrievalGateway for MemoryGateway {
    async fn retrieve(&self, request: &RetrievalRequest) -> GatewayResult<RetrievalResponse> {
        let docs: Vec<(usize, Value)> = self
            .records
            .iter()
            .enumerate()
            .filter_map(|(i, record)| {
                serde_json::to_value(record).ok().map(|doc| (i, doc))
            })
            .filter(|(_, doc)| self.matches(doc, request))
            .collect();

        let mut matched: Vec<&PaymentRecord> = docs.iter().map(|(i, _)| &self.records[*i]).collect();
        matched.sort_by(|a, b| {
            b.transaction_date
                .cmp(&a.transaction_date)
                .then_with(|| a.grab_link_id.cmp(&b.grab_link_id))
        });

        // Facet counts over the whole filtered set, before pagination.
        let mut facets = BTreeMap::new();
        for spec in &request.facets {
            let mut counts: BTreeMap<String, u64> = BTreeMap::new();
            for (_, doc) in &docs {
                if let Some(value) = string_at(doc, &spec.path) {
                    *counts.entry(value).or_insert(0) += 1;
                }
            }

            let mut buckets: Vec<FacetBucket> = counts
                .into_iter()
                .map(|(value, count)| FacetBucket { value, count })
                .collect();
            buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
            buckets.truncate(spec.max_buckets);

            facets.insert(spec.group.response_key().to_string(), FacetBuckets { buckets });
        }

        let limit = request.limit.max(1);
        let total = matched.len();
        let total_pages = (total.div_ceil(limit)) as u32;
        let skip = (request.page.max(1) as usize - 1) * limit;

        let payments = matched
            .into_iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect();

        Ok(RetrievalResponse {
            payments,
            total_pages,
            facets,
        })
    }
}

/// Resolve a dot path against a serialized record
fn string_at(doc: &Value, path: &str) -> Option<String> {
    let pointer = format!("/{}", path.replace('.', "/"));
    doc.pointer(&pointer)?.as_str().map(str::to_string)
}

/// Lowercase, optionally folding common diacritics
fn normalize(input: &str, fold: bool) -> String {
    input
        .chars()
        .map(|c| if fold { fold_char(c) } else { c })
        .flat_map(char::to_lowercase)
        .collect()
}

fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ç' | 'Ç' => 'c',
        'ñ' | 'Ñ' => 'n',
        _ => c,
    }
}

/// Full-term analyzed match: every term token occurs in the value's tokens
fn analyzed_match(value: &str, term: &str) -> bool {
    let value_tokens: Vec<String> = tokenize(value);
    tokenize(term)
        .iter()
        .all(|t| value_tokens.iter().any(|v| v == t))
}

fn tokenize(input: &str) -> Vec<String> {
    input
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(|s| normalize(s, true))
        .collect()
}

fn matches_filter(doc: &Value, filter: &FilterClause) -> bool {
    string_at(doc, &filter.path)
        .is_some_and(|value| filter.values.iter().any(|v| *v == value))
}
