//! Map and timeline projections of a filtered view.

use std::collections::BTreeMap;

use violence_map_incident_models::Incident;
use violence_map_query_models::{LatLon, LayerGroup, MapFrame, MapPoint, TimelineEvent};

use crate::filter::FilteredView;

/// Placeholder for a missing victim name or description.
pub const NOT_AVAILABLE: &str = "not available";

/// Placeholder for any other missing field.
pub const NOT_INFORMED: &str = "not informed";

/// Map center used when there is nothing to frame.
pub const DEFAULT_CENTER: LatLon = LatLon::new(-14.235, -51.9253);

/// South-west corner of the default map area.
pub const DEFAULT_SOUTH_WEST: LatLon = LatLon::new(-33.75, -73.99);

/// North-east corner of the default map area.
pub const DEFAULT_NORTH_EAST: LatLon = LatLon::new(5.27, -34.0);

/// Name of the layer group holding every marker.
pub const ALL_CASES_LAYER: &str = "all cases";

/// Builds one marker per incident, in view order.
#[must_use]
pub fn to_map_points(view: &FilteredView<'_>) -> Vec<MapPoint> {
    map_points(view.iter())
}

pub(crate) fn map_points<'a>(incidents: impl Iterator<Item = &'a Incident>) -> Vec<MapPoint> {
    incidents
        .map(|incident| MapPoint {
            id: incident.id,
            lat: incident.latitude,
            lon: incident.longitude,
            action_kind: incident.action_kind(),
            color: incident.marker_color(),
            popup_text: popup_text(incident),
        })
        .collect()
}

/// Builds timeline events sorted by date, then by id.
///
/// Incidents without a sortable date are left out.
#[must_use]
pub fn to_timeline_events(view: &FilteredView<'_>) -> Vec<TimelineEvent> {
    timeline_events(view.iter())
}

fn timeline_events<'a>(incidents: impl Iterator<Item = &'a Incident>) -> Vec<TimelineEvent> {
    let mut events: Vec<TimelineEvent> = incidents
        .filter_map(|incident| {
            let date = incident.date.sortable?;
            Some(TimelineEvent {
                id: incident.id,
                date,
                date_kind: incident.date.kind,
                date_label: incident.date.label.clone(),
                city: incident.city.clone(),
                action_type: incident.action_type.clone(),
                color: incident.marker_color(),
                hover_text: hover_text(incident),
            })
        })
        .collect();

    events.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
    events
}

/// Marker popup: victim, description, date, instrument, and dispute.
#[must_use]
pub fn popup_text(incident: &Incident) -> String {
    lines(&[
        ("Victim", or(incident.victim_name.as_deref(), NOT_AVAILABLE)),
        ("Description", or(incident.description.as_deref(), NOT_AVAILABLE)),
        ("Date", &incident.date.label),
        ("Instrument", or(incident.instrument.as_deref(), NOT_INFORMED)),
        ("Dispute", or(incident.dispute.as_deref(), NOT_INFORMED)),
    ])
}

/// Timeline hover: action type, date, ethnicity, affiliation, city, and
/// dispute.
#[must_use]
pub fn hover_text(incident: &Incident) -> String {
    lines(&[
        ("Action", or(incident.action_type.as_deref(), NOT_INFORMED)),
        ("Date", &incident.date.label),
        ("Ethnicity", or(incident.victim_ethnicity.as_deref(), NOT_INFORMED)),
        ("Affiliation", or(incident.affiliation.as_deref(), NOT_INFORMED)),
        ("City", or(incident.city.as_deref(), NOT_INFORMED)),
        ("Dispute", or(incident.dispute.as_deref(), NOT_INFORMED)),
    ])
}

fn or<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    value.unwrap_or(placeholder)
}

fn lines(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Centers the map on the mean position of the view and fits its extent.
///
/// An empty view gets the default frame over Brazil.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn frame_map(view: &FilteredView<'_>) -> MapFrame {
    if view.is_empty() {
        return MapFrame {
            center: DEFAULT_CENTER,
            south_west: DEFAULT_SOUTH_WEST,
            north_east: DEFAULT_NORTH_EAST,
        };
    }

    let count = view.len() as f64;
    let (mut lat_sum, mut lon_sum) = (0.0, 0.0);
    let mut south_west = LatLon::new(f64::INFINITY, f64::INFINITY);
    let mut north_east = LatLon::new(f64::NEG_INFINITY, f64::NEG_INFINITY);

    for incident in view.iter() {
        lat_sum += incident.latitude;
        lon_sum += incident.longitude;
        south_west.lat = south_west.lat.min(incident.latitude);
        south_west.lon = south_west.lon.min(incident.longitude);
        north_east.lat = north_east.lat.max(incident.latitude);
        north_east.lon = north_east.lon.max(incident.longitude);
    }

    MapFrame {
        center: LatLon::new(lat_sum / count, lon_sum / count),
        south_west,
        north_east,
    }
}

/// Groups markers into toggleable layers: all cases, then one layer per
/// victim gender and one per victim ethnicity, in first-seen order.
///
/// Incidents with a blank gender or ethnicity only appear in the all-cases
/// layer. Only that layer is visible initially.
#[must_use]
pub fn layer_groups(view: &FilteredView<'_>) -> Vec<LayerGroup> {
    let mut groups = vec![LayerGroup {
        name: ALL_CASES_LAYER.to_string(),
        visible: true,
        incident_ids: view.iter().map(|i| i.id).collect(),
    }];
    groups.extend(grouped_by(view, "gender", |i| i.victim_gender.as_deref()));
    groups.extend(grouped_by(view, "ethnicity", |i| {
        i.victim_ethnicity.as_deref()
    }));
    groups
}

fn grouped_by<'a>(
    view: &FilteredView<'a>,
    dimension: &str,
    value: impl Fn(&'a Incident) -> Option<&'a str>,
) -> Vec<LayerGroup> {
    let mut order = Vec::new();
    let mut members: BTreeMap<&str, Vec<u64>> = BTreeMap::new();

    for incident in view.iter() {
        let Some(key) = value(incident) else {
            continue;
        };
        members
            .entry(key)
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(incident.id);
    }

    order
        .into_iter()
        .map(|key| LayerGroup {
            name: format!("{dimension} | {key}"),
            visible: false,
            incident_ids: members.remove(key).unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use violence_map_dataset::Dataset;
    use violence_map_incident_models::{
        ActionKind, DateComponent, DateKind, MarkerColor, ResolvedDate,
    };
    use violence_map_query_models::{FilterSpec, YearRange};
    use violence_map_source::columns::ColumnMapping;

    use super::*;
    use crate::filter::apply;
    use crate::fixtures::dataset;

    fn everything(dataset: &Dataset) -> FilteredView<'_> {
        apply(dataset, &FilterSpec::new(YearRange::new(1900, 2100)))
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn map_points_follow_view_order_with_colors() {
        let dataset = dataset();
        let points = to_map_points(&everything(&dataset));

        let summary: Vec<(u64, MarkerColor)> = points.iter().map(|p| (p.id, p.color)).collect();
        assert_eq!(
            summary,
            vec![
                (0, MarkerColor::Red),
                (1, MarkerColor::Blue),
                (2, MarkerColor::Green),
                (3, MarkerColor::Red),
                (5, MarkerColor::Gray),
            ]
        );
        assert_eq!(points[4].action_kind, ActionKind::Other);
        assert!(close(points[0].lat, -10.5));
        assert!(close(points[0].lon, -50.5));
    }

    #[test]
    fn popup_lists_fields_with_placeholders() {
        let dataset = dataset();
        let points = to_map_points(&everything(&dataset));

        assert_eq!(
            points[0].popup_text,
            "Victim: Maria\nDescription: Emboscada na estrada\nDate: 15/6/2015\n\
             Instrument: Arma de fogo\nDispute: Terra"
        );
        assert_eq!(
            points[1].popup_text,
            "Victim: João\nDescription: not available\nDate: 2010\n\
             Instrument: not informed\nDispute: Terra"
        );
        assert_eq!(
            points[2].popup_text,
            "Victim: not available\nDescription: not available\nDate: 2023\n\
             Instrument: Faca\nDispute: not informed"
        );
    }

    #[test]
    fn map_projection_is_repeatable() {
        let dataset = dataset();
        let view = everything(&dataset);
        assert_eq!(to_map_points(&view), to_map_points(&view));
    }

    #[test]
    fn rejected_rows_never_project() {
        let dataset = dataset();
        let view = everything(&dataset);
        assert!(to_map_points(&view).iter().all(|p| p.id != 4));
        assert!(to_timeline_events(&view).iter().all(|e| e.id != 4));
    }

    #[test]
    fn timeline_is_sorted_by_date() {
        let dataset = dataset();
        let events = to_timeline_events(&everything(&dataset));
        let ids: Vec<u64> = events.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![5, 1, 3, 0, 2]);
        assert_eq!(events[1].date_kind, DateKind::Partial);
        assert_eq!(events[1].date_label, "2010");
        assert_eq!(events[0].city.as_deref(), Some("Xinguara"));
    }

    #[test]
    fn timeline_ties_break_by_id() {
        let csv = "Latitude,Longitude,Ano,Mês,Dia\n1,1,2020,SI,SI\n2,2,2020,1,1\n3,3,2019,1,1\n";
        let dataset = Dataset::from_reader(csv.as_bytes(), &ColumnMapping::default()).unwrap();
        let events = to_timeline_events(&everything(&dataset));
        let ids: Vec<u64> = events.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 0, 1]);
    }

    #[test]
    fn hover_text_describes_context() {
        let dataset = dataset();
        let events = to_timeline_events(&everything(&dataset));
        let maria = events.iter().find(|e| e.id == 0).unwrap();
        assert_eq!(
            maria.hover_text,
            "Action: Assassinato\nDate: 15/6/2015\nEthnicity: Parda\n\
             Affiliation: MST\nCity: Marabá\nDispute: Terra"
        );
    }

    #[test]
    fn lines_join_labels_without_trailing_newline() {
        assert_eq!(lines(&[("A", "1"), ("B", "2")]), "A: 1\nB: 2");
        assert_eq!(lines(&[("Only", "one")]), "Only: one");
        assert_eq!(lines(&[]), "");
    }

    #[test]
    fn undated_incidents_are_left_off_the_timeline() {
        let undated = Incident {
            id: 7,
            latitude: -10.0,
            longitude: -50.0,
            year: 2015,
            month: DateComponent::Absent,
            day: DateComponent::Absent,
            date: ResolvedDate::unknown(),
            victim_name: None,
            description: None,
            action_type: None,
            victim_gender: None,
            victim_ethnicity: None,
            affiliation: None,
            city: None,
            dispute: None,
            instrument: None,
        };
        let dated = Incident {
            id: 8,
            date: ResolvedDate::partial(2015),
            ..undated.clone()
        };

        let events = timeline_events([&undated, &dated].into_iter());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, 8);
        assert_eq!(map_points([&undated, &dated].into_iter()).len(), 2);
    }

    #[test]
    fn frame_centers_on_mean_position() {
        let dataset = dataset();
        let frame = frame_map(&everything(&dataset));
        assert!(close(frame.center.lat, -10.1));
        assert!(close(frame.center.lon, -50.1));
        assert!(close(frame.south_west.lat, -12.0));
        assert!(close(frame.south_west.lon, -52.0));
        assert!(close(frame.north_east.lat, -8.0));
        assert!(close(frame.north_east.lon, -48.0));
    }

    #[test]
    fn empty_view_uses_default_frame() {
        let dataset = dataset();
        let view = apply(&dataset, &FilterSpec::new(YearRange::new(1800, 1801)));
        let frame = frame_map(&view);
        assert_eq!(frame.center, DEFAULT_CENTER);
        assert_eq!(frame.south_west, DEFAULT_SOUTH_WEST);
        assert_eq!(frame.north_east, DEFAULT_NORTH_EAST);
    }

    #[test]
    fn layer_groups_split_by_gender_and_ethnicity() {
        let dataset = dataset();
        let groups = layer_groups(&everything(&dataset));

        let summary: Vec<(&str, bool, &[u64])> = groups
            .iter()
            .map(|g| (g.name.as_str(), g.visible, g.incident_ids.as_slice()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("all cases", true, &[0, 1, 2, 3, 5][..]),
                ("gender | Feminino", false, &[0, 2, 3][..]),
                ("gender | Masculino", false, &[1, 5][..]),
                ("ethnicity | Parda", false, &[0, 5][..]),
                ("ethnicity | Indígena", false, &[1, 3][..]),
            ]
        );
    }
}
