use serde::{Deserialize, Serialize};

/// No-go activity above this area (km²) counts as a violation.
pub const VIOLATION_THRESHOLD_KM2: f64 = 0.002;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesPoint {
    pub date: String,
    pub area_km2: f64,
}

impl TimeseriesPoint {
    pub fn new(date: impl Into<String>, area_km2: f64) -> Self {
        Self {
            date: date.into(),
            area_km2,
        }
    }

    pub fn is_violation(&self) -> bool {
        self.area_km2 > VIOLATION_THRESHOLD_KM2
    }
}

pub type Track = Vec<TimeseriesPoint>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channel {
    #[default]
    Legal,
    NoGo,
}

impl Channel {
    pub fn label(self) -> &'static str {
        match self {
            Channel::Legal => "Legal Mining",
            Channel::NoGo => "No-Go Zone",
        }
    }
}

impl std::str::FromStr for Channel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legal" | "mine" => Ok(Channel::Legal),
            "nogo" | "no-go" | "no_go" => Ok(Channel::NoGo),
            other => anyhow::bail!("unknown channel '{}', expected 'legal' or 'nogo'", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PredictionSet {
    pub legal: f64,
    pub nogo: f64,
}

impl PredictionSet {
    pub fn for_channel(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Legal => self.legal,
            Channel::NoGo => self.nogo,
        }
    }
}

/// One quantified raster per legal-track date. `src` is `None` when the
/// backend produced no image for that period.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantifiedMapEntry {
    pub date: String,
    pub src: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoGoZone {
    pub name: String,
    pub track: Track,
    pub predicted_next_area: f64,
    pub first_violation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisWindow {
    pub analysis_start: Option<String>,
    pub analysis_end: Option<String>,
}

/// Display-ready results of one analysis job.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResults {
    pub legal: Track,
    pub legal_prediction: f64,
    pub zones: Vec<NoGoZone>,
    pub selected_zone: usize,
    pub quantified_maps: Vec<QuantifiedMapEntry>,
    pub window: AnalysisWindow,
}

impl AnalysisResults {
    /// Track of the selected no-go zone, empty when the backend reported none.
    pub fn nogo(&self) -> &[TimeseriesPoint] {
        self.zones
            .get(self.selected_zone)
            .map(|zone| zone.track.as_slice())
            .unwrap_or(&[])
    }

    pub fn predictions(&self) -> PredictionSet {
        PredictionSet {
            legal: self.legal_prediction,
            nogo: self
                .zones
                .get(self.selected_zone)
                .map(|zone| zone.predicted_next_area)
                .unwrap_or(0.0),
        }
    }

    pub fn selected_zone_name(&self) -> Option<&str> {
        self.zones
            .get(self.selected_zone)
            .map(|zone| zone.name.as_str())
    }

    /// Switch the no-go track to another zone. Out of range indices are ignored.
    pub fn select_zone(&mut self, index: usize) -> bool {
        if index < self.zones.len() {
            self.selected_zone = index;
            true
        } else {
            false
        }
    }

    pub fn last_index(&self) -> Option<usize> {
        self.legal.len().checked_sub(1)
    }
}
