use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::gateway::RetrievalResponse;
use crate::query::{QueryBuilder, QueryIntent};
use crate::schema::FacetGroup;
use crate::session::FacetSelection;
use axum::{extract::State, Json};
use axum_extra::extract::Query;
use serde::Serialize;
use std::str::FromStr;
use validator::Validate;

/// Health check endpoint
pub async fn health_check() -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// List payments matching a search term and facet selection.
///
/// `GET /api/payments?q=&page=&limit=&<group>=<value>...` where facet keys
/// repeat, one pair per selected value. Facet bucket counts in the response
/// are computed over the same filtered result set as the page itself.
pub async fn list_payments(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<RetrievalResponse>> {
    let params = ListPaymentsParams::from_pairs(pairs, state.search.page_size)?;

    let intent = QueryIntent::new()
        .with_term(params.term)
        .with_facets(params.facets)
        .with_page(params.page)
        .with_page_size(params.limit);

    let request = QueryBuilder::new(&state.schema).build(&intent);

    let response = state.gateway.retrieve(&request).await?;

    Ok(Json(response))
}

/// Decoded and validated `/api/payments` query parameters
#[derive(Debug, Validate)]
pub struct ListPaymentsParams {
    pub term: String,

    #[validate(range(min = 1))]
    pub page: u32,

    #[validate(range(min = 1, max = 100))]
    pub limit: usize,

    pub facets: FacetSelection,
}

impl ListPaymentsParams {
    /// Parse raw query pairs. Reserved keys are `q`, `page`, and `limit`;
    /// every other key must name a known facet group, so a typo in a facet
    /// key is rejected instead of silently widening the result set.
    fn from_pairs(pairs: Vec<(String, String)>, default_limit: usize) -> Result<Self> {
        let mut params = Self {
            term: String::new(),
            page: 1,
            limit: default_limit,
            facets: FacetSelection::new(),
        };

        for (key, value) in pairs {
            match key.as_str() {
                "q" => params.term = value,
                "page" => {
                    params.page = value
                        .parse()
                        .map_err(|_| AppError::Validation(format!("invalid page: {value}")))?;
                }
                "limit" => {
                    params.limit = value
                        .parse()
                        .map_err(|_| AppError::Validation(format!("invalid limit: {value}")))?;
                }
                _ => {
                    let group = FacetGroup::from_str(&key)
                        .map_err(|_| AppError::InvalidFacetSelection(key.clone()))?;
                    params.facets.select_all(group, [value]);
                }
            }
        }

        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_params_defaults() {
        let params = ListPaymentsParams::from_pairs(vec![], 10).unwrap();

        assert_eq!(params.term, "");
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 10);
        assert!(params.facets.is_empty());
    }

    #[test]
    fn test_params_collect_repeated_facet_keys() {
        let params = ListPaymentsParams::from_pairs(
            pairs(&[
                ("q", "abc"),
                ("page", "2"),
                ("scheme", "visa"),
                ("scheme", "mc"),
                ("country", "MY"),
            ]),
            10,
        )
        .unwrap();

        assert_eq!(params.term, "abc");
        assert_eq!(params.page, 2);
        assert!(params.facets.is_selected(FacetGroup::Scheme, "visa"));
        assert!(params.facets.is_selected(FacetGroup::Scheme, "mc"));
        assert!(params.facets.is_selected(FacetGroup::Country, "MY"));
    }

    #[test]
    fn test_unknown_facet_group_is_rejected() {
        let err =
            ListPaymentsParams::from_pairs(pairs(&[("merchant", "acme")]), 10).unwrap_err();
        assert!(matches!(err, AppError::InvalidFacetSelection(_)));
    }

    #[test]
    fn test_non_numeric_page_is_rejected() {
        let err = ListPaymentsParams::from_pairs(pairs(&[("page", "two")]), 10).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        let err = ListPaymentsParams::from_pairs(pairs(&[("page", "0")]), 10).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = ListPaymentsParams::from_pairs(pairs(&[("limit", "500")]), 10).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_type_key_maps_to_transaction_type_group() {
        let params =
            ListPaymentsParams::from_pairs(pairs(&[("type", "capture")]), 10).unwrap();
        assert!(params.facets.is_selected(FacetGroup::Type, "capture"));
    }
}
