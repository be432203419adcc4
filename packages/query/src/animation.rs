//! Per-year frames for the animated map.
//!
//! The caller drives the animation and decides when to stop; each call
//! here is independent.

use std::collections::BTreeSet;

use violence_map_query_models::AnimationFrame;

use crate::filter::FilteredView;
use crate::projection::map_points;

/// Distinct years present in the view, ascending.
#[must_use]
pub fn animation_years(view: &FilteredView<'_>) -> Vec<i32> {
    view.iter()
        .map(|i| i.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Markers for the incidents of `year` in the view.
#[must_use]
pub fn animation_frame(view: &FilteredView<'_>, year: i32) -> AnimationFrame {
    AnimationFrame {
        year,
        points: map_points(view.iter().filter(|i| i.year == year)),
    }
}

/// One frame per year of [`animation_years`].
#[must_use]
pub fn animation_frames(view: &FilteredView<'_>) -> Vec<AnimationFrame> {
    animation_years(view)
        .into_iter()
        .map(|year| animation_frame(view, year))
        .collect()
}
