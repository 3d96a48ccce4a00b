//! Facet selection state: which facet values are currently toggled on

use crate::schema::FacetGroup;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Selected facet values across independent facet groups.
///
/// Set semantics per group: no duplicates, order irrelevant. Initialized
/// empty, mutated by user toggles, and reset only by an explicit
/// [`clear`](Self::clear) — never partially cleared as a side effect of
/// searching. Group validity is enforced by [`FacetGroup`] being a closed
/// enum; unknown group names must be rejected at the wire boundary before
/// they reach this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetSelection {
    selected: BTreeMap<FacetGroup, BTreeSet<String>>,
}

impl FacetSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `value` in `group`'s selected set.
    /// Returns true when the value is selected after the toggle.
    pub fn toggle(&mut self, group: FacetGroup, value: impl Into<String>) -> bool {
        let value = value.into();
        let values = self.selected.entry(group).or_default();

        let now_selected = if values.remove(&value) {
            false
        } else {
            values.insert(value);
            true
        };

        // Empty sets are pruned so is_empty stays a map-level check.
        if values.is_empty() {
            self.selected.remove(&group);
        }

        now_selected
    }

    /// Select every value in `values` for `group` (wire-request ingestion)
    pub fn select_all<I, S>(&mut self, group: FacetGroup, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = self.selected.entry(group).or_default();
        set.extend(values.into_iter().map(Into::into));
        if set.is_empty() {
            self.selected.remove(&group);
        }
    }

    pub fn is_selected(&self, group: FacetGroup, value: &str) -> bool {
        self.selected
            .get(&group)
            .is_some_and(|values| values.contains(value))
    }

    /// True when no group has any selected value
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Explicit user-driven reset
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Non-empty groups with their selected values, in stable order
    pub fn groups(&self) -> impl Iterator<Item = (FacetGroup, &BTreeSet<String>)> {
        self.selected.iter().map(|(group, values)| (*group, values))
    }
}
