use crate::core::api::{RawResults, join_url};
use crate::models::{AnalysisResults, AnalysisWindow, NoGoZone, QuantifiedMapEntry};

/// Reshape the backend's `/results` document into display-ready tracks.
///
/// Zones keep the order in which the backend reported them and the first one
/// is selected. Image paths are joined onto `base_url`; dates without a path
/// get no image. A zero legal prediction counts as missing and falls through
/// to the monthly prediction.
pub fn assemble(raw: RawResults, base_url: &str) -> AnalysisResults {
    let RawResults {
        metadata,
        mine,
        no_go_zones,
    } = raw;

    let legal_prediction = mine
        .predicted_next_area
        .filter(|area| *area != 0.0)
        .or(mine.predicted_next_month_area.filter(|area| *area != 0.0))
        .unwrap_or(0.0);

    let quantified_maps = mine
        .timeseries
        .iter()
        .map(|point| QuantifiedMapEntry {
            date: point.date.clone(),
            src: mine
                .quantified_maps
                .get(&point.date)
                .filter(|path| !path.is_empty())
                .map(|path| join_url(base_url, path)),
        })
        .collect();

    let zones = no_go_zones
        .0
        .into_iter()
        .map(|(name, zone)| NoGoZone {
            name,
            track: zone.timeseries,
            predicted_next_area: zone.predicted_next_area.unwrap_or(0.0),
            first_violation: zone.first_violation,
        })
        .collect();

    let window = metadata
        .map(|m| AnalysisWindow {
            analysis_start: m.analysis_start,
            analysis_end: m.analysis_end,
        })
        .unwrap_or_default();

    AnalysisResults {
        legal: mine.timeseries,
        legal_prediction,
        zones,
        selected_zone: 0,
        quantified_maps,
        window,
    }
}
