//! Dataset-wide summary figures and filter options.

use serde::Serialize;
use violence_map_incident_models::{ActionKind, Incident};

use crate::Dataset;

/// Headline figures for the whole dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Incidents in the dataset.
    pub total: u64,
    /// Incidents classified as homicides.
    pub homicides: u64,
    /// Earliest incident year.
    pub first_year: i32,
    /// Latest incident year.
    pub last_year: i32,
    /// Source rows left out during loading.
    pub rejected: u64,
}

/// Distinct categorical values available for filtering.
///
/// Values appear in the order they are first seen in the source, and
/// blank values are not listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    /// Distinct action types.
    pub action_types: Vec<String>,
    /// Distinct victim genders.
    pub genders: Vec<String>,
    /// Distinct victim ethnicities.
    pub ethnicities: Vec<String>,
    /// Earliest and latest incident year.
    pub year_bounds: (i32, i32),
}

impl Dataset {
    /// Computes the headline figures.
    #[must_use]
    pub fn summary(&self) -> Summary {
        let (first_year, last_year) = self.year_bounds();
        Summary {
            total: self.len() as u64,
            homicides: self
                .incidents()
                .iter()
                .filter(|i| i.action_kind() == ActionKind::Homicide)
                .count() as u64,
            first_year,
            last_year,
            rejected: self.report().rejected.total(),
        }
    }

    /// Lists the filter options.
    #[must_use]
    pub fn facets(&self) -> Facets {
        Facets {
            action_types: distinct(self.incidents(), |i| i.action_type.as_deref()),
            genders: distinct(self.incidents(), |i| i.victim_gender.as_deref()),
            ethnicities: distinct(self.incidents(), |i| i.victim_ethnicity.as_deref()),
            year_bounds: self.year_bounds(),
        }
    }
}

fn distinct<'a>(
    incidents: &'a [Incident],
    value: impl Fn(&'a Incident) -> Option<&'a str>,
) -> Vec<String> {
    let mut seen = std::collections::BTreeSet::new();
    incidents
        .iter()
        .filter_map(value)
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use violence_map_source::columns::ColumnMapping;

    use super::*;

    const CSV: &str = "\
Latitude,Longitude,Ano,Tipo_ação_vítima,Vítima_Gênero/Sexo,Vítimas_Etnia
-10,-50,2008,Assassinato,Masculino,Parda
-11,-51,2004,Ameaça de assassinato,Feminino,
-12,-52,2019,Assassinato,Masculino,Indígena
-13,-53,2011,,Feminino,Parda
99999999,-53,2011,Assassinato,Feminino,Branca
";

    fn dataset() -> Dataset {
        Dataset::from_reader(CSV.as_bytes(), &ColumnMapping::default()).unwrap()
    }

    #[test]
    fn summary_counts_homicides_and_period() {
        let summary = dataset().summary();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.homicides, 2);
        assert_eq!(summary.first_year, 2004);
        assert_eq!(summary.last_year, 2019);
        assert_eq!(summary.rejected, 1);
    }

    #[test]
    fn facets_keep_first_seen_order_and_skip_blanks() {
        let facets = dataset().facets();
        assert_eq!(
            facets.action_types,
            vec!["Assassinato", "Ameaça de assassinato"]
        );
        assert_eq!(facets.genders, vec!["Masculino", "Feminino"]);
        assert_eq!(facets.ethnicities, vec!["Parda", "Indígena"]);
        assert_eq!(facets.year_bounds, (2004, 2019));
    }
}
