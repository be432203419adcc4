//! Filter evaluation.
//!
//! Every view is computed from the full dataset. A categorical dimension
//! with an empty accepted set does not restrict anything; with a non-empty
//! set, an incident whose value is blank never matches.

use std::collections::BTreeSet;

use violence_map_dataset::Dataset;
use violence_map_incident_models::Incident;
use violence_map_query_models::{FilterSpec, YearRange};

/// The incidents of a dataset that satisfy a [`FilterSpec`], in dataset
/// order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    spec: FilterSpec,
    incidents: Vec<&'a Incident>,
}

impl<'a> FilteredView<'a> {
    /// The filter this view was computed from.
    #[must_use]
    pub const fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    /// Matching incidents.
    #[must_use]
    pub fn incidents(&self) -> &[&'a Incident] {
        &self.incidents
    }

    /// Iterates over matching incidents.
    pub fn iter(&self) -> impl Iterator<Item = &'a Incident> + '_ {
        self.incidents.iter().copied()
    }

    /// Number of matching incidents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    /// `true` when nothing matched. This is a valid result, not an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }
}

/// Selects the incidents of `dataset` accepted by `spec`.
#[must_use]
pub fn apply<'a>(dataset: &'a Dataset, spec: &FilterSpec) -> FilteredView<'a> {
    let incidents: Vec<&Incident> = dataset
        .incidents()
        .iter()
        .filter(|incident| matches(spec, incident))
        .collect();

    log::debug!(
        "Filter {}-{} matched {} of {} incidents",
        spec.year_range.min,
        spec.year_range.max,
        incidents.len(),
        dataset.len()
    );

    FilteredView {
        spec: spec.clone(),
        incidents,
    }
}

/// Returns `true` if `incident` satisfies every dimension of `spec`.
#[must_use]
pub fn matches(spec: &FilterSpec, incident: &Incident) -> bool {
    spec.year_range.contains(incident.year)
        && accepts(&spec.action_types, incident.action_type.as_deref())
        && accepts(&spec.genders, incident.victim_gender.as_deref())
        && accepts(&spec.ethnicities, incident.victim_ethnicity.as_deref())
}

fn accepts(accepted: &BTreeSet<String>, value: Option<&str>) -> bool {
    accepted.is_empty() || value.is_some_and(|v| accepted.contains(v))
}

/// The filter a fresh dashboard starts with: the dataset's full year span,
/// every action type selected, and no gender or ethnicity restriction.
///
/// Because action types are listed explicitly, incidents with a blank
/// action type are not part of the default view.
#[must_use]
pub fn default_filter(dataset: &Dataset) -> FilterSpec {
    let facets = dataset.facets();
    let (min, max) = facets.year_bounds;
    FilterSpec::new(YearRange::new(min, max)).with_action_types(facets.action_types)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::dataset;

    fn ids(view: &FilteredView<'_>) -> Vec<u64> {
        view.iter().map(|i| i.id).collect()
    }

    #[test]
    fn empty_sets_do_not_restrict() {
        let dataset = dataset();
        let view = apply(&dataset, &FilterSpec::new(YearRange::new(2000, 2023)));
        assert_eq!(ids(&view), vec![0, 1, 2, 3, 5]);
    }

    #[test]
    fn single_action_type_excludes_others() {
        let dataset = dataset();
        let spec =
            FilterSpec::new(YearRange::new(2000, 2023)).with_action_types(["Assassinato"]);
        let view = apply(&dataset, &spec);
        assert_eq!(ids(&view), vec![0, 3]);
        assert!(
            view.iter()
                .all(|i| i.action_type.as_deref() == Some("Assassinato"))
        );
    }

    #[test]
    fn year_bounds_are_inclusive() {
        let dataset = dataset();
        let view = apply(&dataset, &FilterSpec::new(YearRange::new(2010, 2015)));
        assert_eq!(ids(&view), vec![0, 1, 3]);
    }

    #[test]
    fn inverted_year_range_matches_nothing() {
        let dataset = dataset();
        let view = apply(&dataset, &FilterSpec::new(YearRange::new(2015, 2010)));
        assert!(view.is_empty());
        assert_eq!(view.len(), 0);
    }

    #[test]
    fn dimensions_are_combined_with_and() {
        let dataset = dataset();
        let spec = FilterSpec::new(YearRange::new(2000, 2023))
            .with_genders(["Feminino"])
            .with_ethnicities(["Indígena"]);
        assert_eq!(ids(&apply(&dataset, &spec)), vec![3]);
    }

    #[test]
    fn values_within_a_dimension_are_combined_with_or() {
        let dataset = dataset();
        let spec = FilterSpec::new(YearRange::new(2000, 2023))
            .with_genders(["Feminino", "Masculino"]);
        assert_eq!(ids(&apply(&dataset, &spec)), vec![0, 1, 2, 3, 5]);
    }

    #[test]
    fn blank_value_fails_a_restricted_dimension() {
        let dataset = dataset();
        let spec = FilterSpec::new(YearRange::new(2000, 2023))
            .with_ethnicities(["Parda", "Indígena"]);
        assert_eq!(ids(&apply(&dataset, &spec)), vec![0, 1, 3, 5]);
    }

    #[test]
    fn unknown_value_matches_nothing() {
        let dataset = dataset();
        let spec = FilterSpec::new(YearRange::new(2000, 2023)).with_action_types(["homicide"]);
        assert!(apply(&dataset, &spec).is_empty());
    }

    #[test]
    fn views_are_always_computed_from_the_dataset() {
        let dataset = dataset();
        let narrow = apply(
            &dataset,
            &FilterSpec::new(YearRange::new(2000, 2023)).with_genders(["Masculino"]),
        );
        let wide = apply(&dataset, &FilterSpec::new(YearRange::new(2000, 2023)));
        assert_eq!(narrow.len(), 2);
        assert_eq!(wide.len(), 5);
    }

    #[test]
    fn default_filter_selects_every_action_type() {
        let dataset = dataset();
        let spec = default_filter(&dataset);
        assert_eq!(spec.year_range, YearRange::new(2000, 2023));
        assert_eq!(spec.action_types.len(), 4);
        assert!(spec.genders.is_empty());
        assert!(spec.ethnicities.is_empty());
        assert_eq!(apply(&dataset, &spec).len(), 5);
    }
}
