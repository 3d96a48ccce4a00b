//! The schema's fixed set of facet groups

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A named, discrete-valued dimension over which results are filtered and
/// counted. The set is closed: selecting a group outside it is a programming
/// error, not a runtime state.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FacetGroup {
    Psp,
    Scheme,
    Status,
    Type,
    Country,
}

impl FacetGroup {
    pub const ALL: [FacetGroup; 5] = [
        FacetGroup::Psp,
        FacetGroup::Scheme,
        FacetGroup::Status,
        FacetGroup::Type,
        FacetGroup::Country,
    ];

    /// Dot path of the facetable field backing this group
    pub fn field_path(self) -> &'static str {
        match self {
            FacetGroup::Psp => "psp",
            FacetGroup::Scheme => "scheme",
            FacetGroup::Status => "glResponse.status",
            FacetGroup::Type => "transactionType",
            FacetGroup::Country => "countryCode",
        }
    }

    /// Key under which this group's buckets appear in the response
    pub fn response_key(self) -> &'static str {
        match self {
            FacetGroup::Psp => "pspFacet",
            FacetGroup::Scheme => "schemeFacet",
            FacetGroup::Status => "statusFacet",
            FacetGroup::Type => "typeFacet",
            FacetGroup::Country => "countryFacet",
        }
    }

    /// Maximum buckets aggregated for this group
    pub fn bucket_limit(self) -> usize {
        match self {
            FacetGroup::Country => 50,
            _ => 10,
        }
    }
}
